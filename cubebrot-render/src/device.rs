use crate::target::Extent;
use crate::uniforms::CubeUniforms;

/// The slice of a graphics API the two-pass pipeline drives.
///
/// Implementations own their shader programs and vertex buffers; the
/// pipeline only decides *what* happens in which order. Offscreen targets
/// are opaque handles that the pipeline owns between `create_target` and
/// `destroy_target`.
pub trait GraphicsDevice {
    /// A color texture plus depth buffer that can be rendered into and then
    /// sampled.
    type Target;

    fn create_target(&mut self, size: Extent) -> crate::Result<Self::Target>;

    fn destroy_target(&mut self, target: Self::Target);

    /// Direct subsequent draws into `target`.
    fn bind_target(&mut self, target: &Self::Target);

    /// Direct subsequent draws at the visible framebuffer.
    fn bind_screen(&mut self);

    fn set_viewport(&mut self, size: Extent);

    fn set_depth_test(&mut self, enabled: bool);

    /// Clear the bound framebuffer's color, and its depth when `depth` is set.
    fn clear(&mut self, color: [f32; 4], depth: bool);

    /// Draw the cube with the fractal shader.
    fn draw_cube(&mut self, uniforms: &CubeUniforms) -> crate::Result<()>;

    /// Draw a fullscreen quad sampling `source`'s color texture.
    fn draw_composite(&mut self, source: &Self::Target) -> crate::Result<()>;
}

use glam::{Mat2, Mat4};

use cubebrot_core::ViewState;

/// Uniform names shared with the cube shader.
pub mod names {
    pub const ZOOM: &str = "u_zoom";
    pub const POSITION: &str = "u_position";
    pub const MAX_ITERS: &str = "u_max_iters";
    pub const MVP: &str = "u_mvp";
    pub const EFFECT: &str = "u_effect";
    pub const COLOR_A: &str = "u_color_a";
    pub const COLOR_B: &str = "u_color_b";
    pub const BANDING: &str = "u_banding";
    /// Sampler of the composite shader.
    pub const SOURCE: &str = "u_source";
}

/// Something that accepts shader uniforms by name, typically a linked
/// shader program.
pub trait UniformSink {
    fn set_f32(&mut self, name: &str, value: f32);
    fn set_i32(&mut self, name: &str, value: i32);
    fn set_vec2(&mut self, name: &str, value: [f32; 2]);
    fn set_vec3(&mut self, name: &str, value: [f32; 3]);
    fn set_mat2(&mut self, name: &str, value: &Mat2);
    fn set_mat4(&mut self, name: &str, value: &Mat4);
}

/// Everything the cube draw needs, narrowed to the shader's `f32`/`i32` types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeUniforms {
    pub zoom: f32,
    pub position: [f32; 2],
    pub max_iterations: i32,
    pub mvp: Mat4,
    pub effect: Mat2,
    pub color_a: [f32; 3],
    pub color_b: [f32; 3],
    pub banding: i32,
}

impl CubeUniforms {
    pub fn new(view: &ViewState, mvp: Mat4, effect: Mat2) -> Self {
        Self {
            zoom: view.zoom_level() as f32,
            position: [view.position.re as f32, view.position.im as f32],
            max_iterations: i32::try_from(view.iteration_cap()).unwrap_or(i32::MAX),
            mvp,
            effect,
            color_a: view.color_primary.to_array(),
            color_b: view.color_secondary.to_array(),
            banding: i32::try_from(view.banding_level).unwrap_or(i32::MAX),
        }
    }

    pub fn apply<S: UniformSink + ?Sized>(&self, sink: &mut S) {
        sink.set_f32(names::ZOOM, self.zoom);
        sink.set_vec2(names::POSITION, self.position);
        sink.set_i32(names::MAX_ITERS, self.max_iterations);
        sink.set_mat4(names::MVP, &self.mvp);
        sink.set_mat2(names::EFFECT, &self.effect);
        sink.set_vec3(names::COLOR_A, self.color_a);
        sink.set_vec3(names::COLOR_B, self.color_b);
        sink.set_i32(names::BANDING, self.banding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubebrot_core::{Complex, ViewSettings};
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Recorder(BTreeMap<String, String>);

    impl UniformSink for Recorder {
        fn set_f32(&mut self, name: &str, value: f32) {
            self.0.insert(name.into(), format!("{value}"));
        }
        fn set_i32(&mut self, name: &str, value: i32) {
            self.0.insert(name.into(), format!("{value}"));
        }
        fn set_vec2(&mut self, name: &str, value: [f32; 2]) {
            self.0.insert(name.into(), format!("{value:?}"));
        }
        fn set_vec3(&mut self, name: &str, value: [f32; 3]) {
            self.0.insert(name.into(), format!("{value:?}"));
        }
        fn set_mat2(&mut self, name: &str, value: &Mat2) {
            self.0.insert(name.into(), format!("{value:?}"));
        }
        fn set_mat4(&mut self, name: &str, value: &Mat4) {
            self.0.insert(name.into(), format!("{value:?}"));
        }
    }

    #[test]
    fn uniforms_mirror_view_state() {
        let view = ViewState::new(ViewSettings {
            position: Complex::new(-0.5, 0.25),
            zoom_base: 2.0,
            zoom_exponent: -2.0,
            iteration_cap: 300,
            banding_level: 4,
            ..Default::default()
        })
        .unwrap();
        let u = CubeUniforms::new(&view, Mat4::IDENTITY, Mat2::IDENTITY);
        assert_eq!(u.zoom, 0.25);
        assert_eq!(u.position, [-0.5, 0.25]);
        assert_eq!(u.max_iterations, 300);
        assert_eq!(u.banding, 4);
        assert_eq!(u.color_a, view.color_primary.to_array());
    }

    #[test]
    fn huge_iteration_cap_saturates() {
        let view = ViewState::new(ViewSettings {
            iteration_cap: u32::MAX,
            ..Default::default()
        })
        .unwrap();
        let u = CubeUniforms::new(&view, Mat4::IDENTITY, Mat2::IDENTITY);
        assert_eq!(u.max_iterations, i32::MAX);
    }

    #[test]
    fn apply_sets_every_cube_uniform() {
        let u = CubeUniforms::new(&ViewState::default(), Mat4::IDENTITY, Mat2::IDENTITY);
        let mut rec = Recorder::default();
        u.apply(&mut rec);
        for name in [
            names::ZOOM,
            names::POSITION,
            names::MAX_ITERS,
            names::MVP,
            names::EFFECT,
            names::COLOR_A,
            names::COLOR_B,
            names::BANDING,
        ] {
            assert!(rec.0.contains_key(name), "missing uniform {name}");
        }
        assert_eq!(rec.0[names::MAX_ITERS], "100");
    }
}

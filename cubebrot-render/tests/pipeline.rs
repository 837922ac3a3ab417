use cubebrot_core::{Complex, ViewSettings, ViewState};
use cubebrot_render::{
    CubeUniforms, Extent, GraphicsDevice, PipelineSettings, RenderError, RenderPipeline,
};

/// Every call the pipeline makes, in order.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(u32, Extent),
    Destroy(u32),
    BindTarget(u32),
    BindScreen,
    Viewport(Extent),
    DepthTest(bool),
    Clear { depth: bool },
    DrawCube(CubeUniforms),
    DrawComposite(u32),
}

#[derive(Default)]
struct RecordingDevice {
    next_id: u32,
    live: Vec<u32>,
    calls: Vec<Call>,
    fail_create: bool,
}

impl RecordingDevice {
    fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl GraphicsDevice for RecordingDevice {
    type Target = u32;

    fn create_target(&mut self, size: Extent) -> cubebrot_render::Result<u32> {
        if self.fail_create {
            return Err(RenderError::Device("out of memory".into()));
        }
        self.next_id += 1;
        self.live.push(self.next_id);
        self.calls.push(Call::Create(self.next_id, size));
        Ok(self.next_id)
    }

    fn destroy_target(&mut self, target: u32) {
        self.live.retain(|&t| t != target);
        self.calls.push(Call::Destroy(target));
    }

    fn bind_target(&mut self, target: &u32) {
        self.calls.push(Call::BindTarget(*target));
    }

    fn bind_screen(&mut self) {
        self.calls.push(Call::BindScreen);
    }

    fn set_viewport(&mut self, size: Extent) {
        self.calls.push(Call::Viewport(size));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.calls.push(Call::DepthTest(enabled));
    }

    fn clear(&mut self, _color: [f32; 4], depth: bool) {
        self.calls.push(Call::Clear { depth });
    }

    fn draw_cube(&mut self, uniforms: &CubeUniforms) -> cubebrot_render::Result<()> {
        self.calls.push(Call::DrawCube(*uniforms));
        Ok(())
    }

    fn draw_composite(&mut self, source: &u32) -> cubebrot_render::Result<()> {
        self.calls.push(Call::DrawComposite(*source));
        Ok(())
    }
}

fn view_with_supersample(factor: u32) -> ViewState {
    ViewState::new(ViewSettings {
        supersample_factor: factor,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn frame_runs_offscreen_then_composite() {
    let mut device = RecordingDevice::default();
    let mut pipeline = RenderPipeline::new(PipelineSettings::default());
    let view = view_with_supersample(2);
    let display = Extent::new(640, 480);

    let stats = pipeline
        .render_frame(&mut device, &view, 0.0, 0.0, display)
        .unwrap();

    assert!(stats.reallocated);
    assert_eq!(stats.display_size, display);
    assert_eq!(stats.target_size, Extent::new(1280, 960));

    let calls = device.take_calls();
    let Call::DrawCube(uniforms) = calls[5].clone() else {
        panic!("expected cube draw, got {:?}", calls[5]);
    };
    assert_eq!(
        calls,
        vec![
            Call::Create(1, Extent::new(1280, 960)),
            Call::BindTarget(1),
            Call::Viewport(Extent::new(1280, 960)),
            Call::DepthTest(true),
            Call::Clear { depth: true },
            Call::DrawCube(uniforms),
            Call::BindScreen,
            Call::Viewport(display),
            Call::DepthTest(false),
            Call::Clear { depth: false },
            Call::DrawComposite(1),
        ]
    );
}

#[test]
fn depth_test_enabled_only_for_cube_draw() {
    let mut device = RecordingDevice::default();
    let mut pipeline = RenderPipeline::new(PipelineSettings::default());
    let view = view_with_supersample(1);

    for frame in 0..5 {
        let size = Extent::new(300 + frame * 10, 200);
        pipeline
            .render_frame(&mut device, &view, frame as f64 * 0.016, 0.016, size)
            .unwrap();
    }

    let mut depth = false;
    let mut cube_draws = 0;
    let mut composites = 0;
    for call in device.take_calls() {
        match call {
            Call::DepthTest(enabled) => depth = enabled,
            Call::DrawCube(_) => {
                assert!(depth, "cube drawn without depth test");
                cube_draws += 1;
            }
            Call::DrawComposite(_) => {
                assert!(!depth, "composite drawn with depth test");
                composites += 1;
            }
            _ => {}
        }
    }
    assert_eq!(cube_draws, 5);
    assert_eq!(composites, 5);
}

#[test]
fn resize_reallocates_before_next_offscreen_pass() {
    let mut device = RecordingDevice::default();
    let mut pipeline = RenderPipeline::new(PipelineSettings::default());
    let view = view_with_supersample(2);

    pipeline
        .render_frame(&mut device, &view, 0.0, 0.016, Extent::new(1000, 1000))
        .unwrap();
    assert_eq!(pipeline.target_size(), Some(Extent::new(2000, 2000)));
    device.take_calls();

    let reallocated = pipeline
        .resize(&mut device, Extent::new(800, 600), view.supersample_factor())
        .unwrap();
    assert!(reallocated);
    assert_eq!(pipeline.target_size(), Some(Extent::new(1600, 1200)));
    assert_eq!(pipeline.display_size(), Extent::new(800, 600));
    assert_eq!(
        device.take_calls(),
        vec![Call::Destroy(1), Call::Create(2, Extent::new(1600, 1200))]
    );

    let stats = pipeline
        .render_frame(&mut device, &view, 0.016, 0.016, Extent::new(800, 600))
        .unwrap();
    assert!(!stats.reallocated);
    assert_eq!(stats.target_size, Extent::new(1600, 1200));
    assert_eq!(device.take_calls()[0], Call::BindTarget(2));
    assert_eq!(device.live, vec![2]);
}

#[test]
fn framebuffer_change_during_frame_reallocates_first() {
    let mut device = RecordingDevice::default();
    let mut pipeline = RenderPipeline::new(PipelineSettings::default());
    let view = view_with_supersample(2);

    pipeline
        .render_frame(&mut device, &view, 0.0, 0.016, Extent::new(1000, 1000))
        .unwrap();
    device.take_calls();

    pipeline
        .render_frame(&mut device, &view, 0.016, 0.016, Extent::new(800, 600))
        .unwrap();
    let calls = device.take_calls();
    assert_eq!(calls[0], Call::Destroy(1));
    assert_eq!(calls[1], Call::Create(2, Extent::new(1600, 1200)));
    assert_eq!(calls[2], Call::BindTarget(2));
    assert_eq!(calls[3], Call::Viewport(Extent::new(1600, 1200)));
}

#[test]
fn supersample_change_reallocates() {
    let mut device = RecordingDevice::default();
    let mut pipeline = RenderPipeline::new(PipelineSettings::default());
    let mut view = view_with_supersample(1);
    let display = Extent::new(400, 300);

    pipeline
        .render_frame(&mut device, &view, 0.0, 0.0, display)
        .unwrap();
    view.set_supersample_factor(3).unwrap();
    let stats = pipeline
        .render_frame(&mut device, &view, 0.0, 0.0, display)
        .unwrap();

    assert!(stats.reallocated);
    assert_eq!(stats.target_size, Extent::new(1200, 900));
    assert_eq!(stats.display_size, display);
}

#[test]
fn steady_frames_reuse_target() {
    let mut device = RecordingDevice::default();
    let mut pipeline = RenderPipeline::new(PipelineSettings::default());
    let view = view_with_supersample(2);

    for _ in 0..10 {
        pipeline
            .render_frame(&mut device, &view, 0.0, 0.016, Extent::new(320, 240))
            .unwrap();
    }
    let creates = device
        .take_calls()
        .iter()
        .filter(|c| matches!(c, Call::Create(..)))
        .count();
    assert_eq!(creates, 1);
}

#[test]
fn empty_framebuffer_skips_frame() {
    let mut device = RecordingDevice::default();
    let mut pipeline = RenderPipeline::new(PipelineSettings::default());
    let view = view_with_supersample(2);

    let err = pipeline
        .render_frame(&mut device, &view, 0.0, 0.016, Extent::new(0, 600))
        .unwrap_err();

    assert!(matches!(err, RenderError::InvalidTargetSize { .. }));
    assert!(device.take_calls().is_empty());
    assert_eq!(pipeline.target_size(), None);
}

#[test]
fn device_failure_propagates() {
    let mut device = RecordingDevice {
        fail_create: true,
        ..Default::default()
    };
    let mut pipeline = RenderPipeline::new(PipelineSettings::default());

    let err = pipeline
        .render_frame(
            &mut device,
            &view_with_supersample(1),
            0.0,
            0.0,
            Extent::new(64, 64),
        )
        .unwrap_err();

    assert!(matches!(err, RenderError::Device(_)));
    assert_eq!(pipeline.target_size(), None);
    assert!(!device.calls.iter().any(|c| matches!(c, Call::DrawCube(_))));
}

#[test]
fn release_destroys_target() {
    let mut device = RecordingDevice::default();
    let mut pipeline = RenderPipeline::new(PipelineSettings::default());
    pipeline
        .render_frame(
            &mut device,
            &view_with_supersample(2),
            0.0,
            0.0,
            Extent::new(64, 64),
        )
        .unwrap();

    pipeline.release(&mut device);

    assert!(device.live.is_empty());
    assert_eq!(pipeline.target_size(), None);
}

#[test]
fn cube_uniforms_follow_view() {
    let mut device = RecordingDevice::default();
    let mut pipeline = RenderPipeline::new(PipelineSettings::default());
    let view = ViewState::new(ViewSettings {
        position: Complex::new(-0.75, 0.125),
        iteration_cap: 512,
        banding_level: 3,
        supersample_factor: 1,
        ..Default::default()
    })
    .unwrap();

    pipeline
        .render_frame(&mut device, &view, 1.0, 0.016, Extent::new(100, 100))
        .unwrap();

    let uniforms = device
        .take_calls()
        .into_iter()
        .find_map(|c| match c {
            Call::DrawCube(u) => Some(u),
            _ => None,
        })
        .unwrap();
    assert_eq!(uniforms.position, [-0.75, 0.125]);
    assert_eq!(uniforms.max_iterations, 512);
    assert_eq!(uniforms.banding, 3);
    assert_eq!(uniforms.zoom, view.zoom_level() as f32);
}

#[test]
fn paused_rotation_freezes_angle() {
    let mut device = RecordingDevice::default();
    let mut pipeline = RenderPipeline::new(PipelineSettings {
        rotation_rate: 1.0,
        ..Default::default()
    });
    let view = view_with_supersample(1);
    let size = Extent::new(50, 50);

    let first = pipeline
        .render_frame(&mut device, &view, 0.5, 0.5, size)
        .unwrap();
    assert!((first.rotation_angle - 0.5).abs() < 1e-6);

    assert!(pipeline.toggle_rotation());
    let frozen = pipeline
        .render_frame(&mut device, &view, 1.5, 1.0, size)
        .unwrap();
    assert_eq!(frozen.rotation_angle, first.rotation_angle);

    pipeline.set_rotation_paused(false);
    let resumed = pipeline
        .render_frame(&mut device, &view, 1.75, 0.25, size)
        .unwrap();
    assert!((resumed.rotation_angle - 0.75).abs() < 1e-6);
}

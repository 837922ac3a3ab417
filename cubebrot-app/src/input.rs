use eframe::egui;

use cubebrot_core::InputSnapshot;

/// egui reports pixel-precise wheels in points; one notch of a classic wheel
/// is treated as this many points.
const POINTS_PER_LINE: f32 = 50.0;
/// Lines scrolled per page-unit wheel event.
const LINES_PER_PAGE: f32 = 10.0;

/// Commands that only concern the window, not navigation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UiCommands {
    pub toggle_rotation: bool,
    pub toggle_hud: bool,
}

/// Sample this frame's keyboard and wheel state.
pub(crate) fn read_input(ctx: &egui::Context) -> (InputSnapshot, UiCommands) {
    ctx.input(|i| {
        let scroll_lines: f32 = i
            .events
            .iter()
            .map(|event| match event {
                egui::Event::MouseWheel { unit, delta, .. } => wheel_lines(*unit, delta.y),
                _ => 0.0,
            })
            .sum();

        let snapshot = InputSnapshot {
            quit: i.key_pressed(egui::Key::Escape),
            iteration_increase: i.key_down(egui::Key::ArrowUp),
            iteration_decrease: i.key_down(egui::Key::ArrowDown),
            pan_up: i.key_down(egui::Key::W),
            pan_down: i.key_down(egui::Key::S),
            pan_left: i.key_down(egui::Key::A),
            pan_right: i.key_down(egui::Key::D),
            print_position: i.key_pressed(egui::Key::P),
            restart_shot: i.key_pressed(egui::Key::R),
            reset_tour: i.key_pressed(egui::Key::Backspace),
            enter_free_exploration: i.key_pressed(egui::Key::F),
            enter_scripted_tour: i.key_pressed(egui::Key::T),
            scroll_delta: f64::from(scroll_lines),
        };
        let commands = UiCommands {
            toggle_rotation: i.key_pressed(egui::Key::Space),
            toggle_hud: i.key_pressed(egui::Key::H),
        };
        (snapshot, commands)
    })
}

/// Convert one wheel event's vertical delta to lines. Positive is away from
/// the user (zoom in).
pub(crate) fn wheel_lines(unit: egui::MouseWheelUnit, delta_y: f32) -> f32 {
    match unit {
        egui::MouseWheelUnit::Point => delta_y / POINTS_PER_LINE,
        egui::MouseWheelUnit::Line => delta_y,
        egui::MouseWheelUnit::Page => delta_y * LINES_PER_PAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_units_normalize_to_lines() {
        assert_eq!(wheel_lines(egui::MouseWheelUnit::Line, 1.0), 1.0);
        assert_eq!(wheel_lines(egui::MouseWheelUnit::Point, 100.0), 2.0);
        assert_eq!(wheel_lines(egui::MouseWheelUnit::Page, -1.0), -10.0);
    }

    #[test]
    fn no_events_means_idle_input() {
        let ctx = egui::Context::default();
        let (snapshot, commands) = read_input(&ctx);
        assert_eq!(snapshot, InputSnapshot::default());
        assert_eq!(commands, UiCommands::default());
    }
}

//! Keyboard bindings for the wave parameters.

use winit::keyboard::KeyCode;

use crate::wave::WaveField;

/// Parameter change requested by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SpeedUp,
    SpeedDown,
    HeightUp,
    HeightDown,
    FrequencyUp,
    FrequencyDown,
}

/// Controls help, logged once at startup
pub const CONTROLS_HELP: &[&str] = &[
    "Q/A: Increase/decrease wave speed",
    "W/S: Increase/decrease wave height",
    "E/D: Increase/decrease wave frequency",
    "Left click: Create ripple",
    "Escape: Quit",
];

/// Map a physical key to its action, if bound
pub fn action_for_key(key_code: KeyCode) -> Option<Action> {
    match key_code {
        KeyCode::KeyQ => Some(Action::SpeedUp),
        KeyCode::KeyA => Some(Action::SpeedDown),
        KeyCode::KeyW => Some(Action::HeightUp),
        KeyCode::KeyS => Some(Action::HeightDown),
        KeyCode::KeyE => Some(Action::FrequencyUp),
        KeyCode::KeyD => Some(Action::FrequencyDown),
        _ => None,
    }
}

impl Action {
    /// Apply one step of this action, using the field's own step sizes
    pub fn apply(self, field: &mut WaveField) {
        let params = *field.params();
        match self {
            Action::SpeedUp => field.adjust_speed(params.speed.step),
            Action::SpeedDown => field.adjust_speed(-params.speed.step),
            Action::HeightUp => field.adjust_height(params.amplitude.step),
            Action::HeightDown => field.adjust_height(-params.amplitude.step),
            Action::FrequencyUp => field.adjust_frequency(params.frequency.step),
            Action::FrequencyDown => field.adjust_frequency(-params.frequency.step),
        }
        log::info!("{}", status_line(field));
    }
}

/// Current parameter readout
pub fn status_line(field: &WaveField) -> String {
    format!(
        "Speed: {:.1} Height: {:.2} Frequency: {:.2}",
        field.speed(),
        field.amplitude(),
        field.frequency()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WaveParams;

    #[test]
    fn test_key_bindings() {
        assert_eq!(action_for_key(KeyCode::KeyQ), Some(Action::SpeedUp));
        assert_eq!(action_for_key(KeyCode::KeyA), Some(Action::SpeedDown));
        assert_eq!(action_for_key(KeyCode::KeyW), Some(Action::HeightUp));
        assert_eq!(action_for_key(KeyCode::KeyS), Some(Action::HeightDown));
        assert_eq!(action_for_key(KeyCode::KeyE), Some(Action::FrequencyUp));
        assert_eq!(action_for_key(KeyCode::KeyD), Some(Action::FrequencyDown));
        assert_eq!(action_for_key(KeyCode::Escape), None);
        assert_eq!(action_for_key(KeyCode::Space), None);
    }

    #[test]
    fn test_apply_uses_preset_steps() {
        let mut screen = WaveField::new(WaveParams::screen());
        Action::HeightUp.apply(&mut screen);
        assert_eq!(screen.amplitude(), 35.0);

        let mut unit = WaveField::new(WaveParams::unit());
        Action::FrequencyDown.apply(&mut unit);
        assert_eq!(unit.frequency(), 4.5);
    }

    #[test]
    fn test_repeated_presses_saturate() {
        let mut field = WaveField::new(WaveParams::screen());
        for _ in 0..200 {
            Action::SpeedUp.apply(&mut field);
        }
        assert_eq!(field.speed(), 5.0);
        for _ in 0..200 {
            Action::SpeedDown.apply(&mut field);
        }
        assert_eq!(field.speed(), 0.1);
    }

    #[test]
    fn test_status_line() {
        let field = WaveField::new(WaveParams::screen());
        assert_eq!(status_line(&field), "Speed: 1.0 Height: 30.00 Frequency: 0.10");
    }
}

/// Gate parameter ranges and defaults, plus meter ballistics
/// Editor colours live in ui::style

/// Threshold is compared against mean squared amplitude (a power quantity)
pub const THRESHOLD_MIN: f32 = 0.0001;
pub const THRESHOLD_MAX: f32 = 0.1;
pub const THRESHOLD_DEFAULT: f32 = 0.001;

/// One-pole coefficient used while the gate is opening
pub const ATTACK_MIN: f32 = 0.001;
pub const ATTACK_MAX: f32 = 0.1;
pub const ATTACK_DEFAULT: f32 = 0.01;

/// One-pole coefficient used while the gate is closing
pub const RELEASE_MIN: f32 = 0.01;
pub const RELEASE_MAX: f32 = 1.0;
pub const RELEASE_DEFAULT: f32 = 0.1;

/// Envelope value the gate restarts from on every stream start
pub const ENVELOPE_RESET: f32 = 1.0;

/// Envelope above this counts as "open" for display purposes
pub const GATE_OPEN_ENVELOPE: f32 = 0.5;

/// Smoothing factors for level meters (per editor frame)
pub const METER_ATTACK: f32 = 0.3; // Moderate attack (not too jumpy)
pub const METER_RELEASE: f32 = 0.05;

/// Default editor window size
pub const EDITOR_WIDTH: u32 = 400;
pub const EDITOR_HEIGHT: u32 = 300;

// === HELPER FUNCTIONS ===

/// Convert a power quantity (mean squared amplitude) to dB
pub fn power_to_db(power: f32) -> f32 {
    if power > 0.0 {
        10.0 * power.log10()
    } else {
        nih_plug::util::MINUS_INFINITY_DB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sit_inside_their_ranges() {
        assert!((THRESHOLD_MIN..=THRESHOLD_MAX).contains(&THRESHOLD_DEFAULT));
        assert!((ATTACK_MIN..=ATTACK_MAX).contains(&ATTACK_DEFAULT));
        assert!((RELEASE_MIN..=RELEASE_MAX).contains(&RELEASE_DEFAULT));
    }

    #[test]
    fn power_to_db_uses_ten_log10() {
        assert!((power_to_db(0.001) - (-30.0)).abs() < 1e-4);
        assert!((power_to_db(1.0)).abs() < 1e-6);
        assert_eq!(power_to_db(0.0), nih_plug::util::MINUS_INFINITY_DB);
    }
}

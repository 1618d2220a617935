/// Frame rate the per-tick rates in the config are tuned for.
pub const NOMINAL_HZ: f32 = 60.0;

/// Cubic ease-out, `1 - (1 - x)^3`, with the input clamped to [0, 1].
pub fn ease_out_cubic(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    1.0 - (1.0 - x).powi(3)
}

/// Converts a per-tick exponential approach rate into the factor for a frame of `dt` seconds.
/// A frame of exactly one nominal tick applies `rate` itself.
pub fn frame_factor(rate: f32, dt: f32) -> f32 {
    let rate = rate.clamp(0.0, 1.0);
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    let ticks = dt * NOMINAL_HZ;
    if ticks == 1.0 {
        return rate;
    }
    (1.0 - (1.0 - rate).powf(ticks)).clamp(0.0, 1.0)
}

/// One exponential-approach step, clamped into [0, 1].
pub fn approach_unit(current: f32, target: f32, factor: f32) -> f32 {
    (current + (target - current) * factor).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_cubic_endpoints_and_clamp() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(-3.0), 0.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn frame_factor_matches_rate_at_nominal_tick() {
        assert_eq!(frame_factor(0.02, 1.0 / 60.0), 0.02);
        assert_eq!(frame_factor(0.02, 0.0), 0.0);
        assert_eq!(frame_factor(0.02, f32::NAN), 0.0);
    }

    #[test]
    fn two_half_ticks_equal_one_tick() {
        let rate = 0.1;
        let half = frame_factor(rate, 1.0 / 120.0);
        let mut value = 0.0;
        value += (1.0 - value) * half;
        value += (1.0 - value) * half;
        assert!((value - rate).abs() < 1e-5);
    }

    #[test]
    fn approach_never_overshoots() {
        assert_eq!(approach_unit(0.99, 1.0, 1.0), 1.0);
        assert_eq!(approach_unit(0.5, 1.0, 5.0), 1.0);
        assert_eq!(approach_unit(0.5, 0.0, 5.0), 0.0);
    }
}

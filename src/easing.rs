//! Interpolation curves used by the construction animation.
//!
//! Only the two cubic curves the animation actually uses live here. Progress
//! values are expected in `[0, 1]`; use [`clamped_progress`] to derive one
//! from elapsed time.

use instant::Duration;

/// Fast start, gentle arrival. Used while cubes fly in from the spawn point.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Gentle at both ends. Used while filler cubes slide into their rows.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Linear progress of `elapsed` through `duration`, clamped to `[0, 1]`.
pub fn clamped_progress(elapsed: Duration, duration: Duration) -> f32 {
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

/// Componentwise linear interpolation between two points.
pub fn lerp(
    from: cgmath::Vector3<f32>,
    to: cgmath::Vector3<f32>,
    t: f32,
) -> cgmath::Vector3<f32> {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn ease_out_cubic_endpoints() {
        assert!(close(ease_out_cubic(0.0), 0.0));
        assert!(close(ease_out_cubic(1.0), 1.0));
        // Front-loaded: past the halfway mark well before half the time.
        assert!(ease_out_cubic(0.25) > 0.5);
    }

    #[test]
    fn ease_in_out_cubic_endpoints_and_midpoint() {
        assert!(close(ease_in_out_cubic(0.0), 0.0));
        assert!(close(ease_in_out_cubic(0.5), 0.5));
        assert!(close(ease_in_out_cubic(1.0), 1.0));
        // Slow start.
        assert!(ease_in_out_cubic(0.25) < 0.25);
    }

    #[test]
    fn progress_clamps_past_duration() {
        let duration = Duration::from_millis(1000);
        assert!(close(clamped_progress(Duration::ZERO, duration), 0.0));
        assert!(close(clamped_progress(Duration::from_millis(500), duration), 0.5));
        assert!(close(clamped_progress(Duration::from_millis(2500), duration), 1.0));
    }

    #[test]
    fn lerp_hits_both_endpoints() {
        let a = cgmath::Vector3::new(5.0, 5.0, 5.0);
        let b = cgmath::Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
    }
}

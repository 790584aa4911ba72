use glam::Vec4;

/// Clamped inverse interpolation: where `value` sits between `start` and `end`.
///
/// Returns exactly 0.0 below `start` and exactly 1.0 at or above `end`.
/// A degenerate range (`start == end`) behaves as a step at `start`.
#[inline]
pub fn inverse_lerp(start: f32, end: f32, value: f32) -> f32 {
    if value >= end {
        return 1.0;
    }
    if value < start {
        return 0.0;
    }
    let span = end - start;
    if span.abs() <= f32::EPSILON {
        return 1.0;
    }
    ((value - start) / span).clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_color(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Frame-rate independent exponential smoothing toward `target`.
///
/// The step factor is clamped to [0, 1] so the result never overshoots.
#[inline]
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let k = (rate * dt.max(0.0)).clamp(0.0, 1.0);
    current + (target - current) * k
}

#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

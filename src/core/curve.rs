use glam::Vec3;

/// One cubic Bezier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
}

impl CubicBezier {
    pub fn point(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.p1 * (3.0 * u * u * t)
            + self.p2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }

    /// First derivative (unnormalized tangent).
    pub fn derivative(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * u * u)
            + (self.p2 - self.p1) * (6.0 * u * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }
}

/// Piecewise cubic Bezier path, parameterized over [0, 1] by segment.
#[derive(Clone, Debug, Default)]
pub struct BezierPath {
    segments: Vec<CubicBezier>,
}

impl BezierPath {
    pub fn new(segments: Vec<CubicBezier>) -> Self {
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn locate(&self, t: f32) -> (&CubicBezier, f32) {
        let n = self.segments.len();
        let scaled = t.clamp(0.0, 1.0) * n as f32;
        let i = (scaled.floor() as usize).min(n - 1);
        (&self.segments[i], scaled - i as f32)
    }

    pub fn point(&self, t: f32) -> Vec3 {
        if self.segments.is_empty() {
            return Vec3::ZERO;
        }
        let (seg, local) = self.locate(t);
        seg.point(local)
    }

    pub fn tangent(&self, t: f32) -> Vec3 {
        if self.segments.is_empty() {
            return Vec3::X;
        }
        let (seg, local) = self.locate(t);
        seg.derivative(local).try_normalize().unwrap_or(Vec3::X)
    }

    /// Bake `samples` evenly spaced positions and tangents.
    pub fn bake(&self, samples: u32) -> CurveTable {
        let samples = samples.max(2);
        let mut positions = Vec::with_capacity(samples as usize);
        let mut tangents = Vec::with_capacity(samples as usize);
        for i in 0..samples {
            let t = i as f32 / (samples - 1) as f32;
            positions.push(self.point(t));
            tangents.push(self.tangent(t));
        }
        CurveTable {
            positions,
            tangents,
        }
    }
}

/// Lookup table a vertex shader samples to bend geometry along a curve.
///
/// Row 0 of the uploaded texture holds positions, row 1 tangents.
#[derive(Clone, Debug, Default)]
pub struct CurveTable {
    pub positions: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
}

impl CurveTable {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Linear sample of the baked positions at `t` in [0, 1].
    pub fn sample(&self, t: f32) -> Vec3 {
        match self.positions.len() {
            0 => Vec3::ZERO,
            1 => self.positions[0],
            n => {
                let f = t.clamp(0.0, 1.0) * (n - 1) as f32;
                let i = (f.floor() as usize).min(n - 2);
                self.positions[i].lerp(self.positions[i + 1], f - i as f32)
            }
        }
    }

    /// Texel data for an `len x 2` Rgba32Float texture.
    pub fn texels(&self) -> Vec<[f32; 4]> {
        self.positions
            .iter()
            .map(|p| [p.x, p.y, p.z, 1.0])
            .chain(self.tangents.iter().map(|t| [t.x, t.y, t.z, 0.0]))
            .collect()
    }
}

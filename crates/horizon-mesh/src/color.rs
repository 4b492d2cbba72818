//! Height-based vertex colouring.

/// Linear interpolation between two RGBA colours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorRamp {
    /// Colour at `t = 0`.
    pub start: [f32; 4],
    /// Colour at `t = 1`.
    pub end: [f32; 4],
}

impl ColorRamp {
    /// Creates a ramp from `start` to `end`.
    pub const fn new(start: [f32; 4], end: [f32; 4]) -> Self {
        Self { start, end }
    }

    /// Colour at `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f32) -> [f32; 4] {
        let t = t.clamp(0.0, 1.0);
        std::array::from_fn(|i| self.start[i] + (self.end[i] - self.start[i]) * t)
    }
}

/// The two ramps used below and above the navigability threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightColors {
    /// Shore to grassland.
    pub lowland: ColorRamp,
    /// Rock to peak.
    pub highland: ColorRamp,
}

impl Default for HeightColors {
    fn default() -> Self {
        Self {
            lowland: ColorRamp::new([0.76, 0.70, 0.50, 1.0], [0.20, 0.55, 0.20, 1.0]),
            highland: ColorRamp::new([0.45, 0.40, 0.35, 1.0], [0.95, 0.95, 0.97, 1.0]),
        }
    }
}

impl HeightColors {
    /// Colour for `height`, normalized against `height_scale` and split at `threshold`.
    pub fn color_for(&self, height: f32, height_scale: f32, threshold: f32) -> [f32; 4] {
        let h = if height_scale > 0.0 {
            height / height_scale
        } else {
            0.0
        };
        if h < threshold {
            self.lowland.sample(h / threshold)
        } else if threshold >= 1.0 {
            self.highland.sample(1.0)
        } else {
            self.highland.sample((h - threshold) / (1.0 - threshold))
        }
    }
}

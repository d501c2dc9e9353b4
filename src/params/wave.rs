//! Wave field tuning ranges, presets, and ripple constants.

/// Closed range a user-tunable parameter is clamped to, plus its keyboard step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    /// Initial value (must lie within `min..=max`)
    pub default: f32,
    /// Amount one key press adds or removes
    pub step: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, default: f32, step: f32) -> Self {
        Self {
            min,
            max,
            default,
            step,
        }
    }

    /// Clamp a value into this range
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Transient radial disturbance constants
///
/// The ripple height at distance `d` from its origin is
/// `sin(d * wavenumber - age) * exp(-d * falloff) * strength`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleConfig {
    /// Ripple age advances by `dt * time_scale` per update
    pub time_scale: f32,

    /// Age (in scaled seconds) after which the ripple dies
    pub lifetime: f32,

    /// Radians of phase per world unit of distance
    pub wavenumber: f32,

    /// Exponential attenuation per world unit of distance
    pub falloff: f32,

    /// Peak height contribution (world units)
    pub strength: f32,
}

/// Complete parameter set for one wave field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Time multiplier (dimensionless)
    pub speed: ParamRange,

    /// Wave height (world units)
    pub amplitude: ParamRange,

    /// Spatial frequency (radians per world unit)
    pub frequency: ParamRange,

    pub ripple: RippleConfig,
}

impl WaveParams {
    /// Pixel-scale field used by the CPU renderer.
    ///
    /// Positions are screen pixels, so heights run to tens of pixels and the
    /// frequency is a fraction of a radian per pixel.
    pub fn screen() -> Self {
        Self {
            speed: ParamRange::new(0.1, 5.0, 1.0, 0.1),
            amplitude: ParamRange::new(5.0, 100.0, 30.0, 5.0),
            frequency: ParamRange::new(0.02, 0.5, 0.1, 0.01),
            ripple: RippleConfig {
                time_scale: 5.0,
                lifetime: 10.0,
                wavenumber: 0.05,
                falloff: 0.005,
                strength: 50.0,
            },
        }
    }

    /// Unit-scale field used by the GPU mesh, which spans `[-1, 1]`
    pub fn unit() -> Self {
        Self {
            speed: ParamRange::new(0.1, 5.0, 1.0, 0.1),
            amplitude: ParamRange::new(0.05, 1.0, 0.2, 0.05),
            frequency: ParamRange::new(1.0, 20.0, 5.0, 0.5),
            ripple: RippleConfig {
                time_scale: 5.0,
                lifetime: 10.0,
                wavenumber: 25.0,
                falloff: 2.5,
                strength: 0.25,
            },
        }
    }
}

impl Default for WaveParams {
    fn default() -> Self {
        Self::screen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_defaults_in_range() {
        for params in [WaveParams::screen(), WaveParams::unit()] {
            for range in [params.speed, params.amplitude, params.frequency] {
                assert!(range.contains(range.default), "{:?}", range);
                assert!(range.step > 0.0);
            }
        }
    }

    #[test]
    fn test_clamp() {
        let range = ParamRange::new(5.0, 100.0, 30.0, 5.0);
        assert_eq!(range.clamp(1000.0), 100.0);
        assert_eq!(range.clamp(-3.0), 5.0);
        assert_eq!(range.clamp(42.0), 42.0);
    }
}

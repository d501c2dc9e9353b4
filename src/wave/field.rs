//! Procedural wave field: closed-form sine heights plus a single decaying ripple.

use crate::params::WaveParams;

/// Linear RGB color with channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Clamp every channel into the displayable range
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Component-wise mean of several colors
    pub fn average(colors: &[Rgb]) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        let n = colors.len() as f32;
        let (r, g, b) = colors.iter().fold((0.0, 0.0, 0.0), |(r, g, b), c| {
            (r + c.r, g + c.g, b + c.b)
        });
        Self::new(r / n, g / n, b / n)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Height and color of the surface at one point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub height: f32,
    pub color: Rgb,
}

/// Radial disturbance started by a pointer click
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ripple {
    pub origin_x: f32,
    pub origin_y: f32,
    /// Scaled seconds since the ripple was triggered
    pub age: f32,
    pub active: bool,
}

/// Animated water surface state
///
/// Heights are a pure function of position and the fields below; nothing
/// else carries over between frames.
#[derive(Debug, Clone)]
pub struct WaveField {
    params: WaveParams,
    elapsed_time: f32,
    speed: f32,
    amplitude: f32,
    frequency: f32,
    ripple: Ripple,
}

impl WaveField {
    /// Create a field at rest (t = 0) with the preset's default values
    pub fn new(params: WaveParams) -> Self {
        Self {
            elapsed_time: 0.0,
            speed: params.speed.default,
            amplitude: params.amplitude.default,
            frequency: params.frequency.default,
            ripple: Ripple::default(),
            params,
        }
    }

    /// Advance the animation by `dt` seconds of wall time
    pub fn update(&mut self, dt: f32) {
        self.elapsed_time += dt * self.speed;

        if self.ripple.active {
            self.ripple.age += dt * self.params.ripple.time_scale;
            if self.ripple.age > self.params.ripple.lifetime {
                self.ripple.active = false;
                self.ripple.age = 0.0;
                log::debug!("Ripple expired");
            }
        }
    }

    /// Surface height at `(x, y)`
    pub fn height(&self, x: f32, y: f32) -> f32 {
        self.base_height(x, y) + self.ripple_height(x, y)
    }

    /// Height from the two interfering sine layers alone
    pub fn base_height(&self, x: f32, y: f32) -> f32 {
        let t = self.elapsed_time;
        let freq = self.frequency;

        let wave1 = (x * freq + t).sin() * (y * freq + t * 0.8).cos();
        let wave2 = (x * freq * 1.7 + t * 1.3).sin() * (y * freq * 1.3 + t).sin();

        (wave1 * 0.5 + wave2 * 0.3) * self.amplitude
    }

    /// Contribution of the active ripple at `(x, y)`, zero when none
    pub fn ripple_height(&self, x: f32, y: f32) -> f32 {
        if !self.ripple.active {
            return 0.0;
        }
        let config = &self.params.ripple;
        let dist = (x - self.ripple.origin_x).hypot(y - self.ripple.origin_y);

        (dist * config.wavenumber - self.ripple.age).sin()
            * (-dist * config.falloff).exp()
            * config.strength
    }

    /// Water color for a given height under the current amplitude.
    ///
    /// Deep troughs are dark blue, crests lighter, and anything above 70% of
    /// the amplitude gets white foam. Channels are clamped to `[0, 1]`; foam
    /// from ripples stacked on crests would otherwise overshoot.
    pub fn shade(&self, height: f32) -> Rgb {
        let amplitude = self.amplitude;
        let normalized = (height + amplitude) / (2.0 * amplitude);

        let mut color = Rgb::new(0.0, 0.2 + normalized * 0.3, 0.4 + normalized * 0.4);

        let foam_threshold = amplitude * 0.7;
        if height > foam_threshold {
            let foam = (height - foam_threshold) / (amplitude * 0.3);
            color.r += foam * 0.9;
            color.g += foam * 0.9;
            color.b += foam * 0.5;
        }

        color.clamped()
    }

    /// Height and color at `(x, y)`
    pub fn sample(&self, x: f32, y: f32) -> SurfaceSample {
        let height = self.height(x, y);
        SurfaceSample {
            height,
            color: self.shade(height),
        }
    }

    /// Start a new ripple at `(x, y)`, replacing any ripple in flight
    pub fn trigger_ripple(&mut self, x: f32, y: f32) {
        self.ripple = Ripple {
            origin_x: x,
            origin_y: y,
            age: 0.0,
            active: true,
        };
        log::info!("Ripple at ({:.2}, {:.2})", x, y);
    }

    pub fn adjust_speed(&mut self, delta: f32) {
        self.speed = self.params.speed.clamp(self.speed + delta);
    }

    pub fn adjust_height(&mut self, delta: f32) {
        self.amplitude = self.params.amplitude.clamp(self.amplitude + delta);
    }

    pub fn adjust_frequency(&mut self, delta: f32) {
        self.frequency = self.params.frequency.clamp(self.frequency + delta);
    }

    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn ripple(&self) -> &Ripple {
        &self.ripple
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }
}

impl Default for WaveField {
    fn default() -> Self {
        Self::new(WaveParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_origin_at_rest_is_flat() {
        let field = WaveField::new(WaveParams::screen());
        assert_eq!(field.speed(), 1.0);
        assert_eq!(field.amplitude(), 30.0);
        assert_eq!(field.frequency(), 0.1);

        let sample = field.sample(0.0, 0.0);
        assert_eq!(sample.height, 0.0);
    }

    #[test]
    fn test_sample_is_deterministic() {
        let mut field = WaveField::new(WaveParams::screen());
        field.trigger_ripple(400.0, 300.0);
        for _ in 0..37 {
            field.update(DT);
        }

        for &(x, y) in &[(0.0, 0.0), (123.5, -7.25), (640.0, 360.0), (1e4, -1e4)] {
            let a = field.sample(x, y);
            let b = field.sample(x, y);
            assert_eq!(a.height.to_bits(), b.height.to_bits());
            assert_eq!(a.color.r.to_bits(), b.color.r.to_bits());
            assert_eq!(a.color.g.to_bits(), b.color.g.to_bits());
            assert_eq!(a.color.b.to_bits(), b.color.b.to_bits());
        }

        let clone = field.clone();
        assert_eq!(
            field.sample(10.0, 20.0).height.to_bits(),
            clone.sample(10.0, 20.0).height.to_bits()
        );
    }

    #[test]
    fn test_update_scales_time_by_speed() {
        let mut field = WaveField::new(WaveParams::screen());
        field.adjust_speed(1.0); // 2.0
        field.update(0.5);
        assert!((field.elapsed_time() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ripple_epicenter_is_zero_at_age_zero() {
        let mut field = WaveField::new(WaveParams::screen());
        field.trigger_ripple(0.0, 0.0);
        assert!(field.ripple().active);
        assert_eq!(field.ripple_height(0.0, 0.0), 0.0);
        assert_eq!(field.height(0.0, 0.0), 0.0);

        // Away from the epicenter the ripple is not zero
        assert!(field.ripple_height(30.0, 0.0).abs() > 1.0);
    }

    #[test]
    fn test_ripple_deactivates_exactly_once() {
        let mut field = WaveField::new(WaveParams::screen());
        let (ox, oy) = (320.0, 200.0);
        field.trigger_ripple(ox, oy);

        let mut deactivations = 0;
        let mut was_active = true;
        for _ in 0..600 {
            field.update(DT);
            let active = field.ripple().active;
            if was_active && !active {
                deactivations += 1;
                assert_eq!(field.ripple().age, 0.0);
            }
            was_active = active;
        }

        assert_eq!(deactivations, 1);
        assert!(!field.ripple().active);
        assert_eq!(field.height(ox, oy), field.base_height(ox, oy));
    }

    #[test]
    fn test_ripple_lifetime_in_ticks() {
        // age grows 5/60 per tick and dies once it passes 10, around tick 120
        let mut field = WaveField::new(WaveParams::screen());
        field.trigger_ripple(0.0, 0.0);
        for _ in 0..118 {
            field.update(DT);
        }
        assert!(field.ripple().active);
        for _ in 0..4 {
            field.update(DT);
        }
        assert!(!field.ripple().active);
    }

    #[test]
    fn test_new_ripple_replaces_old() {
        let mut field = WaveField::new(WaveParams::screen());
        field.trigger_ripple(10.0, 10.0);
        for _ in 0..30 {
            field.update(DT);
        }
        field.trigger_ripple(50.0, 60.0);
        let ripple = field.ripple();
        assert_eq!((ripple.origin_x, ripple.origin_y), (50.0, 60.0));
        assert_eq!(ripple.age, 0.0);
        assert!(ripple.active);
    }

    #[test]
    fn test_adjustments_stay_in_range() {
        for params in [WaveParams::screen(), WaveParams::unit()] {
            let mut field = WaveField::new(params);
            let deltas = [1000.0, -1000.0, 0.3, -0.7, 55.0, f32::MAX, -f32::MAX, 1e-3];
            for &delta in deltas.iter().cycle().take(64) {
                field.adjust_speed(delta);
                field.adjust_height(delta);
                field.adjust_frequency(delta);
                assert!(params.speed.contains(field.speed()));
                assert!(params.amplitude.contains(field.amplitude()));
                assert!(params.frequency.contains(field.frequency()));
            }
        }
    }

    #[test]
    fn test_adjust_height_clamps_to_max() {
        let mut screen = WaveField::new(WaveParams::screen());
        screen.adjust_height(1000.0);
        assert_eq!(screen.amplitude(), 100.0);

        let mut unit = WaveField::new(WaveParams::unit());
        unit.adjust_height(1000.0);
        assert_eq!(unit.amplitude(), 1.0);
    }

    #[test]
    fn test_clamping_is_idempotent() {
        let mut field = WaveField::new(WaveParams::screen());
        field.adjust_frequency(-5.0);
        let floor = field.frequency();
        field.adjust_frequency(-5.0);
        assert_eq!(field.frequency(), floor);
        assert_eq!(floor, 0.02);
    }

    #[test]
    fn test_shade_channels_in_unit_range() {
        let field = WaveField::new(WaveParams::screen());
        let mut h = -500.0;
        while h <= 500.0 {
            let c = field.shade(h);
            for channel in c.to_array() {
                assert!((0.0..=1.0).contains(&channel), "h={} color={:?}", h, c);
            }
            h += 0.5;
        }
    }

    #[test]
    fn test_shade_foam_brightens_crests() {
        let field = WaveField::new(WaveParams::screen());
        let calm = field.shade(0.0);
        assert_eq!(calm.r, 0.0);
        assert!((calm.g - 0.35).abs() < 1e-6);
        assert!((calm.b - 0.6).abs() < 1e-6);

        // Full foam at the amplitude: g = 0.5 + 0.9 overshoots and is clamped
        let crest = field.shade(30.0);
        assert!((crest.r - 0.9).abs() < 1e-5);
        assert_eq!(crest.g, 1.0);
        assert_eq!(crest.b, 1.0);
    }

    #[test]
    fn test_average_color() {
        let avg = Rgb::average(&[Rgb::new(0.0, 0.2, 1.0), Rgb::new(1.0, 0.4, 0.0)]);
        assert!((avg.r - 0.5).abs() < 1e-6);
        assert!((avg.g - 0.3).abs() < 1e-6);
        assert!((avg.b - 0.5).abs() < 1e-6);
        assert_eq!(Rgb::average(&[]), Rgb::default());
    }
}

//! Particles and their time-based transitions
//!
//! A particle is inserted invisible, transitions toward its target
//! transform on the next frame, fades back out when its lifetime ends and
//! is detached after the fade tail.

use crate::config::SpawnerConfig;
use crate::icon::{Icon, FLOWER, HEART};
use crate::scheduler::Millis;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Heart,
    Flower,
}

impl ParticleKind {
    /// Style class the host draws this kind with
    pub fn class(&self) -> &'static str {
        self.icon().class
    }

    pub fn icon(&self) -> &'static Icon {
        match self {
            ParticleKind::Heart => &HEART,
            ParticleKind::Flower => &FLOWER,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    CubicBezier(f64, f64, f64, f64),
}

/// Curve used for the float-up transform
pub const FLOAT_EASING: Easing = Easing::CubicBezier(0.2, 0.8, 0.2, 1.0);

impl Easing {
    /// Map linear progress in [0, 1] onto the curve
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::CubicBezier(x1, y1, x2, y2) => {
                let u = solve_bezier_x(t, x1, x2);
                bezier(u, y1, y2)
            }
        }
    }
}

// One axis of a cubic bezier anchored at 0 and 1
fn bezier(u: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - u;
    3.0 * inv * inv * u * p1 + 3.0 * inv * u * u * p2 + u * u * u
}

fn bezier_slope(u: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - u;
    3.0 * inv * inv * p1 + 6.0 * inv * u * (p2 - p1) + 3.0 * u * u * (1.0 - p2)
}

fn solve_bezier_x(x: f64, x1: f64, x2: f64) -> f64 {
    // Newton first, bisection when the slope flattens out
    let mut u = x;
    for _ in 0..8 {
        let err = bezier(u, x1, x2) - x;
        if err.abs() < 1e-7 {
            return u;
        }
        let slope = bezier_slope(u, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        u = (u - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    u = x;
    for _ in 0..40 {
        let value = bezier(u, x1, x2);
        if (value - x).abs() < 1e-7 {
            break;
        }
        if value < x {
            lo = u;
        } else {
            hi = u;
        }
        u = (lo + hi) / 2.0;
    }
    u
}

/// Offset, rotation and scale applied on top of the start position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub dx: f64,
    pub dy: f64,
    pub rotation: f64,
    pub scale: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { dx: 0.0, dy: 0.0, rotation: 0.0, scale: 1.0 };
}

pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Transform {
    fn lerp(self, to: Self, t: f64) -> Self {
        Transform {
            dx: self.dx.lerp(to.dx, t),
            dy: self.dy.lerp(to.dy, t),
            rotation: self.rotation.lerp(to.rotation, t),
            scale: self.scale.lerp(to.scale, t),
        }
    }
}

/// A value moving from `from` to `to` over `duration` ms starting at `start`
#[derive(Clone, Copy, Debug)]
pub struct Transition<V> {
    pub from: V,
    pub to: V,
    pub start: Millis,
    pub duration: Millis,
    pub easing: Easing,
}

impl<V: Lerp> Transition<V> {
    /// A value that sits still
    pub fn hold(value: V) -> Self {
        Self { from: value, to: value, start: 0, duration: 0, easing: Easing::Linear }
    }

    pub fn value_at(&self, now: Millis) -> V {
        if self.duration == 0 || now >= self.start + self.duration {
            return self.to;
        }
        if now <= self.start {
            return self.from;
        }
        let t = (now - self.start) as f64 / self.duration as f64;
        self.from.lerp(self.to, self.easing.apply(t))
    }

    /// Retarget from wherever the value is at `now`
    pub fn retarget(&mut self, now: Millis, to: V, duration: Millis, easing: Easing) {
        *self = Self { from: self.value_at(now), to, start: now, duration, easing };
    }
}

/// Where and how a particle should be drawn at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleFrame {
    pub x: f64,
    pub y: f64,
    pub size: u32,
    pub opacity: f64,
    pub rotation: f64,
    pub scale: f64,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub id: ParticleId,
    pub kind: ParticleKind,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub size: u32,
    pub lifetime_ms: Millis,
    pub drift: f64,
    pub rotation: f64,
    pub expires_at: Millis,
    opacity: Transition<f64>,
    transform: Transition<Transform>,
}

impl Particle {
    /// Roll a new particle inside a container of `width` x `height` px
    pub fn sample<R: Rng>(
        id: ParticleId,
        kind: ParticleKind,
        (width, height): (f64, f64),
        config: &SpawnerConfig,
        rng: &mut R,
        now: Millis,
    ) -> Self {
        // Inset so nothing starts flush against an edge
        let x = rng.gen_range(width * 0.1..=width * 0.9);
        let y = rng.gen_range(height * 0.2..=height * 0.8);
        let scale = rng.gen_range(config.scale_range.0..=config.scale_range.1);
        let lifetime_ms = rng.gen_range(config.lifetime_range.0..=config.lifetime_range.1);
        let drift = rng.gen_range(config.drift_range.0..=config.drift_range.1);
        // Whole degrees
        let rotation = rng.gen_range(0..360) as f64;

        Self {
            id,
            kind,
            x,
            y,
            scale,
            size: (config.base_size * scale).round() as u32,
            lifetime_ms,
            drift,
            rotation,
            expires_at: now + config.removal_after(lifetime_ms),
            opacity: Transition::hold(0.0),
            transform: Transition::hold(Transform::IDENTITY),
        }
    }

    /// Start the entrance: fade in and float toward the target transform
    pub fn appear(&mut self, now: Millis, config: &SpawnerConfig) {
        self.opacity.retarget(now, 1.0, config.fade_in_ms, Easing::Linear);
        let target = Transform {
            dx: self.drift,
            dy: -config.rise,
            rotation: self.rotation,
            scale: self.scale,
        };
        self.transform.retarget(now, target, self.lifetime_ms, FLOAT_EASING);
    }

    pub fn fade_out(&mut self, now: Millis, config: &SpawnerConfig) {
        self.opacity.retarget(now, 0.0, config.fade_out_ms, Easing::Linear);
    }

    pub fn frame(&self, now: Millis) -> ParticleFrame {
        let transform = self.transform.value_at(now);
        ParticleFrame {
            x: self.x + transform.dx,
            y: self.y + transform.dy,
            size: self.size,
            opacity: self.opacity.value_at(now),
            rotation: transform.rotation,
            scale: transform.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_many(n: usize, dims: (f64, f64)) -> Vec<Particle> {
        let config = SpawnerConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        (0..n)
            .map(|i| Particle::sample(ParticleId(i as u64), ParticleKind::Heart, dims, &config, &mut rng, 0))
            .collect()
    }

    #[test]
    fn positions_stay_inside_inset() {
        for p in sample_many(500, (1000.0, 500.0)) {
            assert!((100.0..=900.0).contains(&p.x), "x out of range: {}", p.x);
            assert!((100.0..=400.0).contains(&p.y), "y out of range: {}", p.y);
        }
    }

    #[test]
    fn sampled_attributes_in_bounds() {
        for p in sample_many(500, (640.0, 480.0)) {
            assert!((0.7..=1.6).contains(&p.scale));
            assert_eq!(p.size, (20.0 * p.scale).round() as u32);
            assert!((3800..=5600).contains(&p.lifetime_ms));
            assert!((-60.0..=60.0).contains(&p.drift));
            assert!((0.0..360.0).contains(&p.rotation));
            assert_eq!(p.rotation.fract(), 0.0);
            assert_eq!(p.expires_at, p.lifetime_ms + 1100);
        }
    }

    #[test]
    fn zero_sized_container_does_not_panic() {
        let p = sample_many(1, (0.0, 0.0)).remove(0);
        assert_eq!((p.x, p.y), (0.0, 0.0));
    }

    #[test]
    fn starts_invisible_until_appear() {
        let config = SpawnerConfig::default();
        let mut p = sample_many(1, (1000.0, 500.0)).remove(0);
        assert_eq!(p.frame(1000).opacity, 0.0);
        assert_eq!(p.frame(1000).x, p.x);

        p.appear(16, &config);
        assert!((p.frame(316).opacity - 0.5).abs() < 1e-9);
        assert_eq!(p.frame(616).opacity, 1.0);

        let end = p.frame(16 + p.lifetime_ms);
        assert!((end.y - (p.y - 420.0)).abs() < 1e-9);
        assert!((end.x - (p.x + p.drift)).abs() < 1e-9);
        assert!((end.scale - p.scale).abs() < 1e-9);
    }

    #[test]
    fn fade_out_starts_from_current_opacity() {
        let config = SpawnerConfig::default();
        let mut p = sample_many(1, (1000.0, 500.0)).remove(0);
        p.appear(0, &config);
        p.fade_out(300, &config);
        assert!((p.frame(300).opacity - 0.5).abs() < 1e-9);
        assert_eq!(p.frame(900).opacity, 0.0);
    }

    #[test]
    fn float_easing_is_monotonic_and_anchored() {
        assert_eq!(FLOAT_EASING.apply(0.0), 0.0);
        assert!((FLOAT_EASING.apply(1.0) - 1.0).abs() < 1e-9);
        let mut last = 0.0;
        for i in 1..=100 {
            let v = FLOAT_EASING.apply(i as f64 / 100.0);
            assert!(v >= last - 1e-9);
            last = v;
        }
        // Front-loaded: most of the travel happens early
        assert!(FLOAT_EASING.apply(0.5) > 0.8);
    }

    #[test]
    fn linear_easing_is_identity() {
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }
}

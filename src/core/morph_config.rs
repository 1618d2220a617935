use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::core::seeded_or_not::SeededOrNot;

/// Inclusive range a per-instance value is drawn from.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        FloatRange { min, max }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn clamped(self, lower: f32, upper: f32) -> Self {
        let a = sane(self.min, lower).clamp(lower, upper);
        let b = sane(self.max, a).clamp(lower, upper);
        FloatRange { min: a.min(b), max: a.max(b) }
    }
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TreeShape {
    pub height: f32,
    pub base_radius: f32,
    pub base_y: f32,
}

impl TreeShape {
    pub fn top_y(&self) -> f32 {
        self.base_y + self.height
    }

    pub fn midpoint_y(&self) -> f32 {
        self.base_y + self.height * 0.5
    }

    /// Cone radius at a height fraction in [0, 1] measured from the base.
    pub fn radius_at_fraction(&self, fraction: f32) -> f32 {
        self.base_radius * (1.0 - fraction.clamp(0.0, 1.0))
    }
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChaosCloud {
    // distance from the cloud center, which sits at the tree's vertical midpoint
    pub radius: FloatRange,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FoliageConfig {
    pub count: usize,
    pub rate: f32,
    pub scale: FloatRange,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrnamentConfig {
    pub count: usize,
    pub weight: FloatRange,
    pub scale: FloatRange,
    pub spin: FloatRange,
    pub sphere_share: f32,
    pub palette: Vec<Color>,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PhotoLayoutConfig {
    pub weight: FloatRange,
    pub spin: FloatRange,
    // fractions of tree height
    pub height_band: FloatRange,
    pub standoff: f32,
    pub reseed_threshold: f32,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TwinkleConfig {
    pub max_active: usize,
    pub max_attempts: usize,
    pub cadence: FloatRange,
    pub duration: FloatRange,
    pub highlight: LinearRgba,
    pub strength: f32,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DockConfig {
    pub distance: f32,
    /// Fraction of the visible viewport the docked frame fills.
    pub viewport_fill: f32,
    /// Frame footprint in its own local units at scale 1.
    pub frame_size: Vec2,
    pub rate: f32,
    pub snap_epsilon: f32,
    pub float_amplitude: f32,
    pub float_speed: f32,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VisualConfig {
    pub particle_size: f32,
    pub rotation_speed: f32,
    pub ornament_scale: f32,
    pub photo_scale: f32,
}

#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TreeMotionConfig {
    // radians per second
    pub spin_speed: f32,
    pub tilt_amplitude: f32,
    pub tilt_speed: f32,
    pub ease_rate: f32,
}

#[derive(Resource, Reflect, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[reflect(Resource)]
#[serde(default)]
pub struct MorphConfig {
    pub seed: SeededOrNot,
    pub tree: TreeShape,
    pub chaos: ChaosCloud,
    pub foliage: FoliageConfig,
    pub ornaments: OrnamentConfig,
    pub photos: PhotoLayoutConfig,
    pub twinkle: TwinkleConfig,
    pub dock: DockConfig,
    pub visual: VisualConfig,
    pub motion: TreeMotionConfig,
}

impl Default for MorphConfig {
    fn default() -> Self {
        MorphConfig {
            seed: SeededOrNot::default(),
            tree: TreeShape {
                height: 12.0,
                base_radius: 4.5,
                base_y: -6.0,
            },
            chaos: ChaosCloud {
                radius: FloatRange::new(14.0, 22.0),
            },
            foliage: FoliageConfig {
                count: 4000,
                rate: 0.02,
                scale: FloatRange::new(0.6, 1.2),
            },
            ornaments: OrnamentConfig {
                count: 300,
                weight: FloatRange::new(0.01, 0.04),
                scale: FloatRange::new(0.12, 0.28),
                spin: FloatRange::new(0.3, 1.2),
                sphere_share: 0.7,
                palette: vec![
                    Color::srgb(1.0, 0.78, 0.2),
                    Color::srgb(0.8, 0.05, 0.08),
                    Color::srgb(0.85, 0.86, 0.9),
                    Color::srgb(0.05, 0.45, 0.2),
                    Color::srgb(1.0, 0.95, 0.85),
                ],
            },
            photos: PhotoLayoutConfig {
                weight: FloatRange::new(0.02, 0.05),
                spin: FloatRange::new(0.2, 0.6),
                height_band: FloatRange::new(0.15, 0.85),
                standoff: 0.6,
                reseed_threshold: 0.1,
            },
            twinkle: TwinkleConfig {
                max_active: 5,
                max_attempts: 10,
                cadence: FloatRange::new(0.05, 0.2),
                duration: FloatRange::new(0.3, 0.7),
                highlight: LinearRgba::new(4.0, 3.4, 2.2, 1.0),
                strength: 0.9,
            },
            dock: DockConfig {
                distance: 6.0,
                viewport_fill: 0.8,
                frame_size: Vec2::new(1.0, 1.25),
                rate: 0.1,
                snap_epsilon: 1e-3,
                float_amplitude: 0.08,
                float_speed: 1.6,
            },
            visual: VisualConfig {
                particle_size: 1.0,
                rotation_speed: 1.0,
                ornament_scale: 1.0,
                photo_scale: 1.0,
            },
            motion: TreeMotionConfig {
                spin_speed: 0.15,
                tilt_amplitude: 0.04,
                tilt_speed: 0.5,
                ease_rate: 0.05,
            },
        }
    }
}

impl MorphConfig {
    /// Copy of this config with every numeric field clamped into a usable range.
    /// Non-finite values fall back to the lower bound.
    pub fn sanitized(&self) -> Self {
        let mut c = self.clone();

        c.tree.height = sane(c.tree.height, 1.0).clamp(0.1, 1000.0);
        c.tree.base_radius = sane(c.tree.base_radius, 1.0).clamp(0.01, 1000.0);
        c.tree.base_y = sane(c.tree.base_y, 0.0).clamp(-1000.0, 1000.0);
        c.chaos.radius = c.chaos.radius.clamped(0.1, 10_000.0);

        c.foliage.count = c.foliage.count.min(1_000_000);
        c.foliage.rate = sane(c.foliage.rate, 0.0).clamp(0.0, 1.0);
        c.foliage.scale = c.foliage.scale.clamped(0.0, 100.0);

        c.ornaments.count = c.ornaments.count.min(100_000);
        c.ornaments.weight = c.ornaments.weight.clamped(0.0, 1.0);
        c.ornaments.scale = c.ornaments.scale.clamped(0.0, 100.0);
        c.ornaments.spin = c.ornaments.spin.clamped(0.0, 100.0);
        c.ornaments.sphere_share = sane(c.ornaments.sphere_share, 0.0).clamp(0.0, 1.0);

        c.photos.weight = c.photos.weight.clamped(0.0, 1.0);
        c.photos.spin = c.photos.spin.clamped(0.0, 100.0);
        c.photos.height_band = c.photos.height_band.clamped(0.0, 1.0);
        c.photos.standoff = sane(c.photos.standoff, 0.0).clamp(0.0, 100.0);
        c.photos.reseed_threshold = sane(c.photos.reseed_threshold, 0.0).clamp(0.0, 100.0);

        c.twinkle.max_active = c.twinkle.max_active.min(1024);
        c.twinkle.max_attempts = c.twinkle.max_attempts.clamp(1, 1024);
        c.twinkle.cadence = c.twinkle.cadence.clamped(0.0, 60.0);
        c.twinkle.duration = c.twinkle.duration.clamped(0.0, 60.0);
        c.twinkle.strength = sane(c.twinkle.strength, 0.0).clamp(0.0, 1.0);

        c.dock.distance = sane(c.dock.distance, 1.0).clamp(0.01, 10_000.0);
        c.dock.viewport_fill = sane(c.dock.viewport_fill, 0.0).clamp(0.0, 1.0);
        c.dock.frame_size = Vec2::new(
            sane(c.dock.frame_size.x, 1.0).clamp(1e-4, 1000.0),
            sane(c.dock.frame_size.y, 1.0).clamp(1e-4, 1000.0),
        );
        c.dock.rate = sane(c.dock.rate, 0.0).clamp(0.0, 1.0);
        c.dock.snap_epsilon = sane(c.dock.snap_epsilon, 1e-3).clamp(0.0, 0.5);
        c.dock.float_amplitude = sane(c.dock.float_amplitude, 0.0).clamp(0.0, 10.0);
        c.dock.float_speed = sane(c.dock.float_speed, 0.0).clamp(0.0, 100.0);

        c.visual.particle_size = sane(c.visual.particle_size, 1.0).clamp(0.0, 100.0);
        c.visual.rotation_speed = sane(c.visual.rotation_speed, 1.0).clamp(0.0, 100.0);
        c.visual.ornament_scale = sane(c.visual.ornament_scale, 1.0).clamp(0.0, 100.0);
        c.visual.photo_scale = sane(c.visual.photo_scale, 1.0).clamp(0.0, 100.0);

        c.motion.spin_speed = sane(c.motion.spin_speed, 0.0).clamp(-100.0, 100.0);
        c.motion.tilt_amplitude = sane(c.motion.tilt_amplitude, 0.0).clamp(0.0, 1.5);
        c.motion.tilt_speed = sane(c.motion.tilt_speed, 0.0).clamp(0.0, 100.0);
        c.motion.ease_rate = sane(c.motion.ease_rate, 0.0).clamp(0.0, 1.0);

        c
    }
}

fn sane(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

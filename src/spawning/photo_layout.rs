use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;
use crate::core::instance_record::{InstanceRecord, VisualAttrs};
use crate::core::morph_config::MorphConfig;
use crate::spawning::helpers::{polar_xz, spiral_angle, GenRng};
use crate::spawning::layout_generation::chaos_pose;

/// A chaos hint that is missing or parked near the origin means the frame
/// never had a real chaos pose and gets a fresh one.
pub fn needs_fresh_chaos(hint: Option<Vec3>, threshold: f32) -> bool {
    match hint {
        Some(pose) => !pose.is_finite() || pose.length() < threshold,
        None => true,
    }
}

/// Height fraction of frame `index` out of `count`, evenly spaced across the band.
pub fn photo_height_fraction(index: usize, count: usize, config: &MorphConfig) -> f32 {
    let band = config.photos.height_band;
    if count <= 1 {
        return band.lerp(0.5);
    }
    band.lerp(index as f32 / (count - 1) as f32)
}

/// What an earlier layout already settled for one frame. Missing parts are sampled fresh.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhotoSeed {
    pub chaos_pose: Option<Vec3>,
    pub attrs: Option<VisualAttrs>,
}

impl PhotoSeed {
    pub fn with_chaos(pose: Vec3) -> Self {
        PhotoSeed {
            chaos_pose: Some(pose),
            attrs: None,
        }
    }
}

/// Full photo layout. Target poses are always recomputed for the whole
/// collection so coverage stays even after inserts and deletes; chaos poses
/// and attributes carried in `seeds` are reused as-is.
pub fn layout_photos(
    seeds: &[PhotoSeed],
    config: &MorphConfig,
    gen_rng: &mut GenRng,
) -> Vec<InstanceRecord> {
    let tree = &config.tree;
    let count = seeds.len();

    seeds
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let fraction = photo_height_fraction(i, count, config);
            let y = tree.base_y + fraction * tree.height;
            let radius = tree.radius_at_fraction(fraction) + config.photos.standoff;
            let target_pose = polar_xz(spiral_angle(i), radius, y);

            let chaos_pose = match seed.chaos_pose {
                Some(pose) if !needs_fresh_chaos(Some(pose), config.photos.reseed_threshold) => pose,
                _ => chaos_pose(config, gen_rng),
            };

            let attrs = seed.attrs.unwrap_or_else(|| {
                let rng = gen_rng.rng_mut();
                VisualAttrs {
                    weight: config.photos.weight.sample(rng),
                    spin_rate: config.photos.spin.sample(rng),
                    float_phase: rng.gen::<f32>() * TAU,
                    ..default()
                }
            });

            InstanceRecord {
                chaos_pose,
                target_pose,
                attrs,
            }
        })
        .collect()
}

use bevy::prelude::*;
use rand::Rng;
use rand::seq::SliceRandom;
use std::f32::consts::TAU;
use crate::core::class_kind::{ClassKind, OrnamentShape};
use crate::core::instance_record::{InstanceRecord, VisualAttrs};
use crate::core::morph_config::MorphConfig;
use crate::spawning::helpers::{polar_xz, sphere_shell_point, spiral_angle, GenRng};
use crate::spawning::photo_layout::{layout_photos, PhotoSeed};

// Ornament heights are drawn as U^k from the base, so density grows toward the bottom.
const ORNAMENT_HEIGHT_BIAS: f32 = 1.8;
const ORNAMENT_SHELL_MIN: f32 = 0.8;

/// Builds `count` records for one class. Deterministic for a given rng state.
/// Photo frames generated this way have no seeds; hosts with a photo
/// collection go through `layout_photos` instead.
pub fn generate(
    count: usize,
    class: ClassKind,
    config: &MorphConfig,
    gen_rng: &mut GenRng,
) -> Vec<InstanceRecord> {
    match class {
        ClassKind::Foliage => foliage_layout(count, config, gen_rng),
        ClassKind::Ornament => ornament_layout(count, config, gen_rng),
        ClassKind::PhotoFrame => layout_photos(&vec![PhotoSeed::default(); count], config, gen_rng),
    }
}

/// Chaos pose shared by all classes: a spherical shell centered on the tree's vertical midpoint.
pub fn chaos_pose(config: &MorphConfig, gen_rng: &mut GenRng) -> Vec3 {
    let center = Vec3::Y * config.tree.midpoint_y();
    sphere_shell_point(gen_rng.rng_mut(), center, config.chaos.radius)
}

fn foliage_layout(count: usize, config: &MorphConfig, gen_rng: &mut GenRng) -> Vec<InstanceRecord> {
    let tree = &config.tree;
    let mut records = Vec::with_capacity(count);

    for i in 0..count {
        let fraction = i as f32 / count as f32;
        let y = tree.base_y + fraction * tree.height;
        // sqrt keeps the disc coverage area-uniform instead of piling up at the trunk
        let radius = gen_rng.rng_mut().gen::<f32>().sqrt() * tree.radius_at_fraction(fraction);
        let target_pose = polar_xz(spiral_angle(i), radius, y);
        let chaos_pose = chaos_pose(config, gen_rng);

        records.push(InstanceRecord {
            chaos_pose,
            target_pose,
            attrs: VisualAttrs {
                scale: config.foliage.scale.sample(gen_rng.rng_mut()),
                weight: config.foliage.rate,
                ..default()
            },
        });
    }

    records
}

fn ornament_layout(count: usize, config: &MorphConfig, gen_rng: &mut GenRng) -> Vec<InstanceRecord> {
    let tree = &config.tree;
    let ornaments = &config.ornaments;
    let mut records = Vec::with_capacity(count);

    for _ in 0..count {
        let rng = gen_rng.rng_mut();
        let fraction = rng.gen::<f32>().powf(ORNAMENT_HEIGHT_BIAS);
        let y = tree.base_y + fraction * tree.height;
        let shell = rng.gen_range(ORNAMENT_SHELL_MIN..=1.0);
        let radius = tree.radius_at_fraction(fraction) * shell;
        let target_pose = polar_xz(rng.gen::<f32>() * TAU, radius, y);

        let shape = if rng.gen::<f32>() < ornaments.sphere_share {
            OrnamentShape::Sphere
        } else {
            OrnamentShape::Box
        };
        let base_color = ornaments
            .palette
            .choose(rng)
            .map(|c| c.to_linear())
            .unwrap_or(LinearRgba::WHITE);
        let scale = ornaments.scale.sample(rng);
        let weight = ornaments.weight.sample(rng);
        let spin_rate = ornaments.spin.sample(rng);

        let chaos_pose = chaos_pose(config, gen_rng);

        records.push(InstanceRecord {
            chaos_pose,
            target_pose,
            attrs: VisualAttrs {
                base_color: Some(base_color),
                shape: Some(shape),
                scale,
                weight,
                spin_rate,
                float_phase: 0.0,
            },
        });
    }

    records
}

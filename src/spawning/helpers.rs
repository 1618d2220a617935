use bevy::prelude::*;
use bevy_prng::WyRand;
use rand::Rng;
use rand_core::SeedableRng;
use std::f32::consts::TAU;
use crate::core::morph_config::FloatRange;

/// Golden angle in radians, the angular step of every spiral layout.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

#[derive(Resource)]
pub struct GenRng(WyRand);

impl GenRng {

    pub fn new(seed: u64) -> Self {
        GenRng(WyRand::seed_from_u64(seed))
    }

    pub fn rng_mut(&mut self) -> &mut WyRand {
        &mut self.0
    }
}

/// Uniform direction on the unit sphere by inverse-CDF sampling.
pub fn unit_sphere_direction(rng: &mut impl Rng) -> Vec3 {
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let theta = TAU * rng.gen::<f32>();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.cos(),
        phi.sin() * theta.sin(),
    )
}

/// Point in a spherical shell around `center`, radius drawn from `radius`.
pub fn sphere_shell_point(rng: &mut impl Rng, center: Vec3, radius: FloatRange) -> Vec3 {
    center + unit_sphere_direction(rng) * radius.sample(rng)
}

/// Angle of the `index`-th point on a golden-angle spiral, wrapped to [0, TAU).
/// Accumulated in f64 so large counts keep their spacing.
pub fn spiral_angle(index: usize) -> f32 {
    (index as f64 * GOLDEN_ANGLE).rem_euclid(std::f64::consts::TAU) as f32
}

pub fn polar_xz(angle: f32, radius: f32, y: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), y, radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_directions_are_unit_length() {
        let mut gen_rng = GenRng::new(1);
        for _ in 0..500 {
            let d = unit_sphere_direction(gen_rng.rng_mut());
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn sphere_directions_cover_both_hemispheres() {
        let mut gen_rng = GenRng::new(2);
        let ys: Vec<f32> = (0..2000).map(|_| unit_sphere_direction(gen_rng.rng_mut()).y).collect();
        let above = ys.iter().filter(|y| **y > 0.0).count();
        // uniform on the sphere means y is uniform in [-1, 1]
        assert!(above > 850 && above < 1150, "above = {}", above);
        let mean = ys.iter().sum::<f32>() / ys.len() as f32;
        assert!(mean.abs() < 0.06);
    }

    #[test]
    fn spiral_angle_steps_by_golden_angle() {
        assert_eq!(spiral_angle(0), 0.0);
        assert!((spiral_angle(1) - GOLDEN_ANGLE as f32).abs() < 1e-6);
        let a = spiral_angle(100_000);
        assert!((0.0..TAU).contains(&a));
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let mut a = GenRng::new(99);
        let mut b = GenRng::new(99);
        for _ in 0..10 {
            assert_eq!(a.rng_mut().gen::<u64>(), b.rng_mut().gen::<u64>());
        }
    }
}

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::config::model::ParticleConfig;
use crate::foundation::core::{Bounds, Dimensions};

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

#[test]
fn spawns_exactly_count_particles_inside_bounds() {
    for count in [0usize, 1, 7, 120, 500] {
        let cfg = ParticleConfig {
            count,
            ..ParticleConfig::default()
        };
        let particles = spawn_particles(&cfg, &mut rng());
        assert_eq!(particles.len(), count);
        for p in &particles {
            assert!(cfg.bounds.contains(p.position, cfg.dimensions));
            assert_eq!(p.position.z, 0.0);
            assert_eq!(p.velocity.z, 0.0);
            assert!(p.life.is_none());
        }
    }
}

#[test]
fn spatial_sets_fill_all_three_axes() {
    let cfg = ParticleConfig {
        count: 200,
        dimensions: Dimensions::Spatial,
        bounds: Bounds::cube(12.5),
        fit_to_viewport: false,
        ..ParticleConfig::default()
    };
    let particles = spawn_particles(&cfg, &mut rng());
    assert!(particles.iter().all(|p| cfg.bounds.contains(p.position, Dimensions::Spatial)));
    assert!(particles.iter().any(|p| p.position.z != 0.0));
}

#[test]
fn velocity_scales_with_speed() {
    let cfg = ParticleConfig {
        count: 300,
        speed: 2.0,
        initial_velocity: 0.25,
        ..ParticleConfig::default()
    };
    for p in spawn_particles(&cfg, &mut rng()) {
        assert!(p.velocity.x.abs() <= 0.5);
        assert!(p.velocity.y.abs() <= 0.5);
    }

    let still = ParticleConfig {
        count: 10,
        speed: 0.0,
        ..ParticleConfig::default()
    };
    assert!(
        spawn_particles(&still, &mut rng())
            .iter()
            .all(|p| p.velocity == Vec3::ZERO)
    );
}

#[test]
fn colors_and_ranges_come_from_config() {
    let cfg = ParticleConfig {
        count: 100,
        colors: vec![Rgba8::rgb(1, 2, 3), Rgba8::rgb(4, 5, 6)],
        ..ParticleConfig::default()
    };
    let particles = spawn_particles(&cfg, &mut rng());
    for p in &particles {
        assert!(cfg.colors.contains(&p.color));
        assert!(p.size >= cfg.size.min && p.size <= cfg.size.max);
        assert!(p.alpha >= cfg.alpha.min && p.alpha <= cfg.alpha.max);
    }
    assert!(particles.iter().any(|p| p.color == cfg.colors[0]));
    assert!(particles.iter().any(|p| p.color == cfg.colors[1]));
}

#[test]
fn degenerate_bounds_collapse_to_min() {
    let cfg = ParticleConfig {
        count: 5,
        bounds: Bounds::planar(0.0, 0.0),
        ..ParticleConfig::default()
    };
    for p in spawn_particles(&cfg, &mut rng()) {
        assert_eq!(p.position, Vec3::ZERO);
    }
}

#[test]
fn seeded_rngs_reproduce_the_same_field() {
    let cfg = ParticleConfig::default();
    assert_eq!(
        spawn_particles(&cfg, &mut rng()),
        spawn_particles(&cfg, &mut rng())
    );
}

#[test]
fn empty_palette_still_yields_a_color() {
    assert_eq!(pick_color(&[], &mut rng()), DEFAULT_PALETTE[0]);
}

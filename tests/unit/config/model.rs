use super::*;
use crate::foundation::core::Vec3;

#[test]
fn defaults_pass_strict_validation() {
    ParticleConfig::default().validate().unwrap();
    assert_eq!(ParticleConfig::default().sanitized(), ParticleConfig::default());
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let cfg = ParticleConfig::from_json(r#"{ "count": 12, "boundary_policy": "bounce" }"#).unwrap();
    assert_eq!(cfg.count, 12);
    assert_eq!(cfg.boundary_policy, BoundaryPolicy::Bounce);
    assert_eq!(cfg.damping, ParticleConfig::default().damping);
    assert_eq!(cfg.colors, DEFAULT_PALETTE.to_vec());
}

#[test]
fn negative_count_clamps_to_zero() {
    let cfg = ParticleConfig::from_json(r#"{ "count": -5 }"#).unwrap();
    assert_eq!(cfg.count, 0);
}

#[test]
fn empty_palette_falls_back_to_default() {
    let cfg = ParticleConfig::from_json(r#"{ "colors": [] }"#).unwrap();
    assert_eq!(cfg.colors, DEFAULT_PALETTE.to_vec());

    let raw = ParticleConfig {
        colors: Vec::new(),
        ..ParticleConfig::default()
    };
    assert!(matches!(raw.validate(), Err(BackdropError::Validation(_))));
}

#[test]
fn hex_palette_and_nested_params_parse() {
    let cfg = ParticleConfig::from_json(
        r##"{
            "colors": ["#ff0000", "#0f0"],
            "interaction": { "radius": 42.0, "response": "attract" },
            "connections": { "max_distance": 10.0, "strategy": "grid" }
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.colors, vec![Rgba8::rgb(255, 0, 0), Rgba8::rgb(0, 255, 0)]);
    assert_eq!(cfg.interaction.radius, 42.0);
    assert_eq!(cfg.interaction.response, PointerResponse::Attract);
    assert_eq!(cfg.interaction.strength, InteractionParams::default().strength);
    assert_eq!(cfg.connections.strategy, ConnectionStrategy::Grid);
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        ParticleConfig::from_json("{ count: 1 }"),
        Err(BackdropError::Serde(_))
    ));
    assert!(matches!(
        ParticleConfig::from_json(r#"{ "boundary_policy": "teleport" }"#),
        Err(BackdropError::Serde(_))
    ));
    assert!(matches!(
        ParticleConfig::from_json(r#"{ "colors": ["blue"] }"#),
        Err(BackdropError::Serde(_))
    ));
}

#[test]
fn sanitize_clamps_out_of_range_scalars() {
    let cfg = ParticleConfig {
        speed: f64::NAN,
        damping: 1.5,
        restitution: -1.0,
        point_opacity: 3.0,
        bounds: Bounds::new(Vec3::planar(10.0, 10.0), Vec3::ZERO),
        size: ValueRange::new(3.0, 1.0),
        ..ParticleConfig::default()
    }
    .sanitized();
    assert_eq!(cfg.speed, 1.0);
    assert_eq!(cfg.damping, 1.0);
    assert_eq!(cfg.restitution, 0.0);
    assert_eq!(cfg.point_opacity, 1.0);
    assert_eq!(cfg.bounds, Bounds::planar(10.0, 10.0));
    assert_eq!(cfg.size, ParticleConfig::default().size);
    cfg.validate().unwrap();
}

#[test]
fn spatial_sets_cannot_fit_viewport() {
    let cfg = ParticleConfig {
        dimensions: Dimensions::Spatial,
        fit_to_viewport: true,
        bounds: Bounds::cube(1.0),
        ..ParticleConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(BackdropError::Config(_))));
    assert!(!cfg.sanitized().fit_to_viewport);
}

#[test]
fn respawn_is_needed_only_for_store_shaping_fields() {
    let base = ParticleConfig::default();
    let tuned = ParticleConfig {
        damping: 0.5,
        mouse_interaction: false,
        connection_lines: false,
        ..base.clone()
    };
    assert!(!base.needs_respawn(&tuned));

    let recounted = ParticleConfig {
        count: 3,
        ..base.clone()
    };
    assert!(base.needs_respawn(&recounted));

    let faster = ParticleConfig {
        speed: 2.0,
        ..base.clone()
    };
    assert!(base.needs_respawn(&faster));
}

#[test]
fn count_scaling_rounds_down() {
    let cfg = ParticleConfig {
        count: 150,
        ..ParticleConfig::default()
    };
    assert_eq!(cfg.clone().with_count_scaled(0.6).count, 90);
    assert_eq!(cfg.with_count_scaled(-1.0).count, 0);
}

#[test]
fn explosion_sanitize_guards_short_lifetimes() {
    let cfg = ExplosionConfig {
        life_frames: ValueRange::new(0.0, 0.5),
        colors: Vec::new(),
        ..ExplosionConfig::default()
    }
    .sanitized();
    assert_eq!(cfg.life_frames, ExplosionConfig::default().life_frames);
    assert!(!cfg.colors.is_empty());
}

#[test]
fn spin_angles_follow_clock() {
    let spin = SceneSpin {
        pitch_amplitude: 0.1,
        pitch_rate: 0.1,
        yaw_rate: 0.05,
    };
    assert_eq!(spin.angles(0.0), (0.0, 0.0));
    let (pitch, yaw) = spin.angles(10.0);
    assert!((pitch - 1.0f64.sin() * 0.1).abs() < 1e-12);
    assert!((yaw - 0.5).abs() < 1e-12);
}

#[test]
fn glow_and_backdrop_parse_and_are_checked() {
    let cfg = ParticleConfig::from_json(r##"{ "glow": 2.5, "backdrop": "#0000000d" }"##).unwrap();
    assert_eq!(cfg.glow, 2.5);
    assert_eq!(
        cfg.backdrop,
        Some(Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 0x0d
        })
    );
    assert_eq!(ParticleConfig::default().backdrop, None);

    let bad = ParticleConfig {
        glow: -1.0,
        ..ParticleConfig::default()
    };
    assert!(matches!(bad.validate(), Err(BackdropError::Validation(_))));
    assert_eq!(bad.sanitized().glow, 0.0);

    let tinted = ParticleConfig {
        glow: 1.0,
        ..ParticleConfig::default()
    };
    assert!(!ParticleConfig::default().needs_respawn(&tinted));
}

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::config::model::ParticleConfig;
use crate::engine::init::spawn_particles;
use crate::foundation::core::{Bounds, Dimensions, Viewport};
use crate::render::immediate::{DrawCmd, RecordingPainter};

fn spatial_store(count: usize) -> ParticleStore {
    let cfg = ParticleConfig {
        count,
        dimensions: Dimensions::Spatial,
        bounds: Bounds::cube(2.0),
        fit_to_viewport: false,
        ..ParticleConfig::default()
    };
    let mut store = ParticleStore::new();
    store.replace(spawn_particles(&cfg, &mut StdRng::seed_from_u64(3)));
    store
}

#[test]
fn colors_are_written_once_per_generation() {
    let mut store = spatial_store(16);
    let mut cloud = PointCloud::new();

    for _ in 0..5 {
        for p in store.as_mut_slice() {
            p.position.x += 0.01;
        }
        cloud.sync(&store, &[]);
    }
    assert_eq!(cloud.color_writes(), 1);
    assert_eq!(cloud.len(), 16);
    assert_eq!(cloud.colors().len(), 48);

    let respawned = spatial_store(8);
    store.replace(respawned.as_slice().to_vec());
    cloud.sync(&store, &[]);
    assert_eq!(cloud.color_writes(), 2);
    assert_eq!(cloud.len(), 8);
}

#[test]
fn positions_track_the_store_in_place() {
    let mut store = spatial_store(4);
    let mut cloud = PointCloud::new();
    cloud.sync(&store, &[]);
    let before = cloud.positions().as_ptr();

    store.as_mut_slice()[2].position = Vec3::new(0.5, -0.25, 1.0);
    cloud.sync(&store, &[]);

    assert_eq!(cloud.positions().as_ptr(), before);
    assert_eq!(&cloud.positions()[6..9], &[0.5, -0.25, 1.0]);
}

#[test]
fn sync_raises_the_update_flag_once() {
    let store = spatial_store(3);
    let mut cloud = PointCloud::new();
    assert!(!cloud.needs_update());

    cloud.sync(&store, &[]);
    assert!(cloud.take_needs_update());
    assert!(!cloud.take_needs_update());
}

#[test]
fn line_buffer_holds_six_floats_per_segment() {
    let store = spatial_store(2);
    let ps = store.as_slice();
    let seg = Segment {
        i: 0,
        j: 1,
        a: ps[0].position,
        b: ps[1].position,
        opacity: 0.1,
    };
    let mut cloud = PointCloud::new();
    cloud.sync(&store, &[seg, seg]);
    assert_eq!(cloud.line_positions().len(), 12);

    cloud.sync(&store, &[]);
    assert!(cloud.line_positions().is_empty());
}

#[test]
fn draw_projects_points_without_clearing() {
    let store = spatial_store(10);
    let mut cloud = PointCloud::new();
    cloud.sync(&store, &[]);

    let mut painter = RecordingPainter::new(Viewport::new(640.0, 480.0));
    cloud.draw(
        &mut painter,
        &PerspectiveCamera::default(),
        (0.0, 0.0),
        0.6,
        &ConnectionParams::default(),
    );

    assert!(!painter.commands.contains(&DrawCmd::Clear));
    assert_eq!(painter.circles(), 10);
    for cmd in &painter.commands {
        if let DrawCmd::Circle { radius, color, .. } = cmd {
            assert!(*radius >= 0.5);
            assert_eq!(color.a, 153);
        }
    }
}

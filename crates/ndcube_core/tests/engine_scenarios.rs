//! End-to-end scenarios for the hypercube engine
//!
//! These tests drive the public API the way a host does:
//! 1. Build the cube, fix the rotation, and project
//! 2. Run the update/frame loop across refreshes and transitions
//! 3. Change dimension and projection while running

use std::time::Duration;

use approx::assert_abs_diff_eq;
use ndcube_core::{
    Engine, EngineConfig, Hypercube, ParameterChange, ProjectionMix, ProjectionModel, Projector,
    RotationConfig, RotationEngine, RotationStyle, UpdateFlags, VecN, default_view_depth,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn seeded_config(n: usize, projection: ProjectionModel) -> EngineConfig {
    EngineConfig {
        dimension: n,
        projection,
        rotation: RotationConfig { seed: Some(2024), ..RotationConfig::default() },
        ..EngineConfig::default()
    }
}

// ==================== Pipeline Tests ====================

/// A 3-cube at the zero rotation seen orthographically at scale 1
#[test]
fn test_cube_unrotated_orthographic() {
    let cube = Hypercube::new(3).unwrap();
    assert_eq!(cube.vertex_count(), 8);
    assert_eq!(cube.edge_count(), 12);

    let mut rotation = RotationEngine::new(3, &RotationConfig::default(), Duration::ZERO).unwrap();
    rotation.set_angles(vec![0.0; 3]).unwrap();
    let rotated = rotation.apply(cube.vertices()).unwrap();

    let projector = Projector::new(3).unwrap();
    let view = VecN::zeros(3);
    let project = |i: usize| {
        projector
            .project(&rotated[i], &view, ProjectionModel::Orthographic, 1.0)
            .unwrap()
    };

    let first = project(0);
    assert_abs_diff_eq!(first.x, -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(first.y, -1.0, epsilon = 1e-12);

    let last = project(7);
    assert_abs_diff_eq!(last.x, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(last.y, 1.0, epsilon = 1e-12);

    assert!(cube.has_edge(0, 1));
    assert!(!cube.has_edge(0, 3));
}

/// Rotation never stretches the cube, however long it drifts
#[test]
fn test_long_drift_preserves_vertex_norms() {
    let mut engine = Engine::new(&seeded_config(6, ProjectionModel::Isometric), ms(0)).unwrap();
    for frame in 1..=300u64 {
        engine.update(ms(frame * 16));
    }

    let w = engine.rotation().rotation().unwrap();
    assert!(w.is_orthogonal(1e-9));

    let rotated = engine.rotation().apply(engine.topology().vertices()).unwrap();
    for p in &rotated {
        assert_abs_diff_eq!(p.length(), 6f64.sqrt(), epsilon = 1e-9);
    }
}

/// Two engines with the same seed draw the same frames
#[test]
fn test_seeded_runs_are_reproducible() {
    let config = seeded_config(4, ProjectionModel::PerspectiveAverage);
    let mut a = Engine::new(&config, ms(0)).unwrap();
    let mut b = Engine::new(&config, ms(0)).unwrap();

    for frame in 1..=90u64 {
        a.update(ms(frame * 16));
        b.update(ms(frame * 16));
    }

    let fa = a.frame(ms(1440)).unwrap();
    let fb = b.frame(ms(1440)).unwrap();
    assert_eq!(fa.points, fb.points);
}

// ==================== Change Handling Tests ====================

/// Interrupting a projection blend continues from what is on screen
#[test]
fn test_preempted_projection_does_not_jump() {
    let mut engine = Engine::new(&seeded_config(3, ProjectionModel::Isometric), ms(0)).unwrap();
    engine
        .apply(ParameterChange::Projection(ProjectionModel::Orthographic), ms(100))
        .unwrap();

    let before = engine.frame(ms(350)).unwrap().points;

    engine
        .apply(ParameterChange::Projection(ProjectionModel::PerspectiveTrim), ms(350))
        .unwrap();
    let frame = engine.frame(ms(350)).unwrap();
    assert_eq!(
        frame.projection.models(),
        vec![
            ProjectionModel::Isometric,
            ProjectionModel::Orthographic,
            ProjectionModel::PerspectiveTrim,
        ]
    );
    for (p, q) in before.iter().zip(&frame.points) {
        assert_abs_diff_eq!(p.x, q.x, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, q.y, epsilon = 1e-12);
    }

    // The second blend runs its full duration from the interruption
    let report = engine.update(ms(800));
    assert!(!report.flags.contains(UpdateFlags::TRANSITION_FINISHED));
    let report = engine.update(ms(900));
    assert!(report.flags.contains(UpdateFlags::TRANSITION_FINISHED));
    assert_eq!(
        engine.frame(ms(900)).unwrap().projection,
        ProjectionMix::Pure(ProjectionModel::PerspectiveTrim)
    );
}

/// A dimension change lands framed for the new cube, with no blend
#[test]
fn test_dimension_change_reframes_projection() {
    let mut engine = Engine::new(&seeded_config(3, ProjectionModel::PerspectiveTrim), ms(0)).unwrap();
    engine.request(ParameterChange::Dimension(7));
    let report = engine.update(ms(16));
    assert!(report.flags.contains(UpdateFlags::REBUILT));
    assert!(!engine.transitions().is_active());

    let frame = engine.frame(ms(16)).unwrap();
    assert_eq!(frame.dimension, 7);
    assert_eq!(frame.points.len(), 128);
    assert_eq!(frame.edges.len(), 448);
    assert_eq!(
        frame.scale,
        ProjectionModel::PerspectiveTrim.default_scale(7, default_view_depth(7))
    );
    assert_abs_diff_eq!(
        engine.view_position(ms(16)).as_slice()[2],
        default_view_depth(7),
        epsilon = 1e-12
    );
}

/// Changes queue in order and a bad one does not block the rest
#[test]
fn test_queued_changes_apply_in_order() {
    let mut engine = Engine::new(&seeded_config(4, ProjectionModel::Isometric), ms(0)).unwrap();
    engine.request(ParameterChange::Dimension(0));
    engine.request(ParameterChange::Dimension(2));
    engine.request(ParameterChange::Projection(ProjectionModel::Orthographic));
    engine.request(ParameterChange::RotationStyle(RotationStyle::Axis));
    engine.request(ParameterChange::DebugOverlay(true));

    let report = engine.update(ms(16));
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].0, ParameterChange::Dimension(0));
    assert!(report.flags.contains(UpdateFlags::REBUILT | UpdateFlags::TRANSITION_STARTED));
    assert!(report.flags.contains(UpdateFlags::CHANGE_REJECTED));

    assert_eq!(engine.dimension(), 2);
    assert_eq!(engine.rotation().style(), RotationStyle::Axis);
    assert!(engine.debug_overlay());
    assert_eq!(engine.pending_changes(), 0);

    let frame = engine.frame(ms(16)).unwrap();
    assert_eq!(frame.labels.map(|l| l.len()), Some(4));
}

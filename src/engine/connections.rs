use std::collections::HashMap;

use crate::config::model::{ConnectionParams, ConnectionStrategy};
use crate::engine::particle::Particle;
use crate::foundation::core::Vec3;

/// Above this many particles [`ConnectionStrategy::Auto`] switches to the grid builder.
pub const GRID_THRESHOLD: usize = 128;

/// A line between two particles closer than the connection threshold.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Segment {
    /// Index of the first particle (`i < j`).
    pub i: usize,
    /// Index of the second particle.
    pub j: usize,
    /// Position of particle `i`.
    pub a: Vec3,
    /// Position of particle `j`.
    pub b: Vec3,
    /// Line opacity, `max_opacity * (D - d) / D`.
    pub opacity: f64,
}

/// Connection pass owned by one particle set; keeps the grid between frames.
#[derive(Debug, Default)]
pub struct ConnectionBuilder {
    grid: ConnectionGrid,
}

impl ConnectionBuilder {
    /// Build segments into `out` using the configured strategy.
    pub fn build(
        &mut self,
        particles: &[Particle],
        params: &ConnectionParams,
        out: &mut Vec<Segment>,
    ) {
        let use_grid = match params.strategy {
            ConnectionStrategy::BruteForce => false,
            ConnectionStrategy::Grid => true,
            ConnectionStrategy::Auto => particles.len() > GRID_THRESHOLD,
        };
        if use_grid {
            self.grid.build(particles, params.max_distance, params.max_opacity, out);
        } else {
            build_connections(particles, params.max_distance, params.max_opacity, out);
        }
    }
}

/// O(N²) builder: every unordered pair closer than `max_distance`, ordered by `(i, j)`.
///
/// `out` is cleared first and reused, so steady-state frames do not allocate.
pub fn build_connections(
    particles: &[Particle],
    max_distance: f64,
    max_opacity: f64,
    out: &mut Vec<Segment>,
) {
    out.clear();
    if max_distance.is_nan() || max_distance <= 0.0 {
        return;
    }
    for (i, pi) in particles.iter().enumerate() {
        for (j, pj) in particles.iter().enumerate().skip(i + 1) {
            if let Some(seg) = segment(i, pi, j, pj, max_distance, max_opacity) {
                out.push(seg);
            }
        }
    }
}

fn segment(
    i: usize,
    pi: &Particle,
    j: usize,
    pj: &Particle,
    max_distance: f64,
    max_opacity: f64,
) -> Option<Segment> {
    let d = pi.position.distance(pj.position);
    if d.is_nan() || d >= max_distance {
        return None;
    }
    Some(Segment {
        i,
        j,
        a: pi.position,
        b: pj.position,
        opacity: max_opacity * (max_distance - d) / max_distance,
    })
}

type CellKey = (i64, i64, i64);

/// Uniform spatial hash with cell size equal to the connection threshold.
///
/// Only the 27 cells around each particle are searched, so sparse fields cost close to
/// O(N) instead of O(N²). Output matches [`build_connections`] exactly.
#[derive(Debug, Default)]
pub struct ConnectionGrid {
    cells: HashMap<CellKey, Vec<usize>>,
}

impl ConnectionGrid {
    /// Rebuild the grid and emit segments into `out`.
    pub fn build(
        &mut self,
        particles: &[Particle],
        max_distance: f64,
        max_opacity: f64,
        out: &mut Vec<Segment>,
    ) {
        out.clear();
        // Cells are keyed by position, so stale keys pile up as particles move.
        if self.cells.len() > particles.len().saturating_mul(4) {
            self.cells.clear();
        }
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        if !max_distance.is_finite() || max_distance <= 0.0 {
            return;
        }

        let key_of = |p: Vec3| -> Option<CellKey> {
            if !p.is_finite() {
                return None;
            }
            Some((
                (p.x / max_distance).floor() as i64,
                (p.y / max_distance).floor() as i64,
                (p.z / max_distance).floor() as i64,
            ))
        };

        for (idx, p) in particles.iter().enumerate() {
            if let Some(key) = key_of(p.position) {
                self.cells.entry(key).or_default().push(idx);
            }
        }

        for (i, pi) in particles.iter().enumerate() {
            let Some((cx, cy, cz)) = key_of(pi.position) else {
                continue;
            };
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        // Keys saturate at the i64 range for tiny thresholds.
                        let (Some(nx), Some(ny), Some(nz)) =
                            (cx.checked_add(dx), cy.checked_add(dy), cz.checked_add(dz))
                        else {
                            continue;
                        };
                        let Some(bucket) = self.cells.get(&(nx, ny, nz)) else {
                            continue;
                        };
                        for &j in bucket {
                            if j <= i {
                                continue;
                            }
                            if let Some(seg) =
                                segment(i, pi, j, &particles[j], max_distance, max_opacity)
                            {
                                out.push(seg);
                            }
                        }
                    }
                }
            }
        }

        out.sort_unstable_by_key(|s| (s.i, s.j));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/connections.rs"]
mod tests;

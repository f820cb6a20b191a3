//! Mitochondrial fission: the biggest free mitochondrion occasionally splits
//! into two half-size daughters.

use bevy::math::Vec2;
use rand::Rng;

use crate::cargo::{Cargo, CargoId, CargoKind, CargoOverrides};
use crate::config::SessionConfig;

/// Index of the widest untrapped mitochondrion; the first one wins ties.
pub fn largest_mitochondrion(cargo: &[Cargo]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, item) in cargo.iter().enumerate() {
        if item.kind != CargoKind::Mitochondrion || item.trapped {
            continue;
        }
        match best {
            Some(b) if cargo[b].footprint.x >= item.footprint.x => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Whether a mitochondrion `width` px wide may split again, given the width
/// it spawned with.  Widths are compared in whole pixels.
#[inline]
pub fn can_split(width: f32, spawn_width: f32, floor: f32) -> bool {
    width.round() > (spawn_width * floor).round()
}

/// Build the two daughters of `parent`: half the linear size, half the
/// score (not rescaled for difficulty), centred on opposite quadrants of
/// the parent's footprint.
pub fn daughters<R: Rng + ?Sized>(
    parent: &Cargo,
    ids: [CargoId; 2],
    config: &SessionConfig,
    rng: &mut R,
) -> [Cargo; 2] {
    let footprint = parent.footprint / 2.0;
    let offset = parent.footprint / 4.0;
    let score = parent.score_value / 2;
    let spawn = |id: CargoId, center: Vec2, rng: &mut R| {
        Cargo::spawn(
            id,
            CargoKind::Mitochondrion,
            config,
            CargoOverrides {
                footprint: Some(footprint),
                score: Some(score),
                scale_score: false,
                center: Some(center),
                velocity: None,
            },
            rng,
        )
    };
    [
        spawn(ids[0], parent.center - offset, rng),
        spawn(ids[1], parent.center + offset, rng),
    ]
}

//! Which cargo a freshly formed autophagosome swallows.
//!
//! A cargo is trapped only when its whole bounding box fits inside the
//! capture disc: every corner strictly closer to the AP centre than the
//! radius.  Large sprites are never caught by their middle alone.

use bevy::math::{Rect, Vec2};

use crate::autophagosome::Autophagosome;
use crate::cargo::{Cargo, CargoId};
use crate::geometry::{corners, distance};

/// Whether `rect` lies entirely inside the open disc at `center`.
pub fn encloses(center: Vec2, radius: f32, rect: Rect) -> bool {
    let farthest = corners(rect)
        .iter()
        .map(|corner| distance(center, *corner))
        .fold(0.0_f32, f32::max);
    farthest < radius
}

/// Move every free cargo enclosed by `ap` out of `cargo` and into the AP,
/// marking it trapped.  Returns the ids of the newly trapped cargo in their
/// original order.
///
/// Run once, when the AP forms; cargo that drifts inside later stays free.
pub fn check_trapped(ap: &mut Autophagosome, cargo: &mut Vec<Cargo>) -> Vec<CargoId> {
    let (inside, outside): (Vec<Cargo>, Vec<Cargo>) = std::mem::take(cargo)
        .into_iter()
        .partition(|c| !c.trapped && encloses(ap.center, ap.radius, c.bounds()));
    *cargo = outside;

    let mut ids = Vec::with_capacity(inside.len());
    for mut item in inside {
        item.trapped = true;
        ids.push(item.id);
        ap.absorb(item);
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cargo::{CargoKind, CargoOverrides};
    use crate::config::{Difficulty, SessionConfig};
    use crate::gesture::ShapeEstimate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ribosome(id: u64, center: Vec2) -> Cargo {
        let mut rng = StdRng::seed_from_u64(id);
        Cargo::spawn(
            CargoId(id),
            CargoKind::Ribosome,
            &SessionConfig::reference(Difficulty::Medium),
            CargoOverrides {
                center: Some(center),
                ..Default::default()
            },
            &mut rng,
        )
    }

    fn ap(center: Vec2, radius: f32) -> Autophagosome {
        Autophagosome::from_shape(
            &ShapeEstimate {
                min: center,
                max: center,
                area: 0.0,
                radius,
                center,
            },
            1.2,
        )
    }

    #[test]
    fn fully_enclosed_box_is_trapped() {
        // 90×90 ribosome: corner distance from its centre is ~63.6.
        let mut cargo = vec![ribosome(1, Vec2::new(500.0, 500.0))];
        let mut ap = ap(Vec2::new(500.0, 500.0), 64.0);

        let ids = check_trapped(&mut ap, &mut cargo);

        assert_eq!(ids, vec![CargoId(1)]);
        assert!(cargo.is_empty());
        assert_eq!(ap.contents().len(), 1);
        assert!(ap.contents()[0].trapped);
    }

    #[test]
    fn centre_inside_but_corner_outside_is_not_trapped() {
        let mut cargo = vec![ribosome(1, Vec2::new(500.0, 500.0))];
        let mut ap = ap(Vec2::new(500.0, 500.0), 63.0);

        assert!(check_trapped(&mut ap, &mut cargo).is_empty());
        assert_eq!(cargo.len(), 1);
        assert!(!cargo[0].trapped);
    }

    #[test]
    fn corner_exactly_on_radius_is_not_trapped() {
        let rect = Rect::new(0.0, 0.0, 6.0, 8.0);
        assert!(!encloses(Vec2::ZERO, 10.0, rect));
        assert!(encloses(Vec2::ZERO, 10.001, rect));
    }

    #[test]
    fn only_enclosed_subset_moves_and_order_is_kept() {
        let mut cargo = vec![
            ribosome(1, Vec2::new(400.0, 400.0)),
            ribosome(2, Vec2::new(1500.0, 400.0)),
            ribosome(3, Vec2::new(450.0, 420.0)),
        ];
        let mut ap = ap(Vec2::new(420.0, 410.0), 150.0);

        let ids = check_trapped(&mut ap, &mut cargo);

        assert_eq!(ids, vec![CargoId(1), CargoId(3)]);
        assert_eq!(cargo.len(), 1);
        assert_eq!(cargo[0].id, CargoId(2));
    }

    #[test]
    fn already_trapped_cargo_is_skipped() {
        let mut item = ribosome(1, Vec2::new(500.0, 500.0));
        item.trapped = true;
        let mut cargo = vec![item];
        let mut ap = ap(Vec2::new(500.0, 500.0), 300.0);

        assert!(check_trapped(&mut ap, &mut cargo).is_empty());
        assert_eq!(cargo.len(), 1);
    }
}

//! Phagophore gesture capture and the shape estimate derived from it.
//!
//! ## States
//!
//! | Phase      | Leaves on                     | To                          |
//! |------------|-------------------------------|-----------------------------|
//! | `Idle`     | button pressed                | `Drawing` (anchor = pointer)|
//! | `Drawing`  | button released               | `Idle` (closed or missed)   |
//! | `Drawing`  | trace reaches the sample cap  | `TimedOut`                  |
//! | `TimedOut` | one frame without the button  | `Idle`                      |
//!
//! The tracker only reports what happened; scoring and AP creation belong to
//! [`crate::session::Session`].

use bevy::math::Vec2;

use crate::geometry::distance;

/// Where a drawn loop is, and how big it is taken to be.
///
/// The area is the ellipse inscribed in the trace's bounding box scaled up to
/// `π·X·Y` (not `π·X·Y/4`), and the capture radius is half the radius of the
/// circle with that area.  The two factors cancel to a disc of radius
/// `sqrt(X·Y)/2`, visibly inside the drawn loop.  Both depend only on the
/// extrema of the trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeEstimate {
    pub min: Vec2,
    pub max: Vec2,
    pub area: f32,
    pub radius: f32,
    /// Midpoint of the bounding box.
    pub center: Vec2,
}

impl ShapeEstimate {
    /// Estimate the shape of `points`; `None` for an empty trace.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let extent = max - min;
        let area = std::f32::consts::PI * extent.x * extent.y;
        let radius = (area / std::f32::consts::PI).sqrt() / 2.0;
        Some(Self {
            min,
            max,
            area,
            radius,
            center: (min + max) / 2.0,
        })
    }

    /// Whether the loop is big enough to become an autophagosome.
    #[inline]
    pub fn is_viable(&self, min_area: f32) -> bool {
        self.area > min_area
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Drawing,
    /// Waiting for the button to be let go after a timeout.
    TimedOut,
}

/// What a single frame of input did to the gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// A new phagophore was anchored at this point.
    Started(Vec2),
    /// Released inside the hit circle: a candidate loop.
    Closed(ShapeEstimate),
    /// Released outside the hit circle.
    Missed,
    /// Ran out of samples while the pointer was away from the anchor.
    TimedOutOpen,
    /// Ran out of samples while the pointer was back at the anchor; the
    /// loop is still evaluated.
    TimedOutClosed(ShapeEstimate),
}

/// Frame-by-frame phagophore tracker.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    phase: GesturePhase,
    anchor: Option<Vec2>,
    trace: Vec<Vec2>,
    max_samples: usize,
    hit_radius: f32,
}

impl GestureTracker {
    pub fn new(max_samples: usize, hit_radius: f32) -> Self {
        Self {
            phase: GesturePhase::Idle,
            anchor: None,
            trace: Vec::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            hit_radius,
        }
    }

    /// Feed one frame of input.
    pub fn update(&mut self, pressed: bool, pointer: Vec2) -> Option<GestureOutcome> {
        match (self.phase, pressed) {
            (GesturePhase::Idle, false) | (GesturePhase::TimedOut, true) => None,
            (GesturePhase::TimedOut, false) => {
                self.phase = GesturePhase::Idle;
                None
            }
            (GesturePhase::Idle, true) => {
                self.phase = GesturePhase::Drawing;
                self.anchor = Some(pointer);
                self.trace.clear();
                self.trace.push(pointer);
                Some(GestureOutcome::Started(pointer))
            }
            (GesturePhase::Drawing, true) => {
                self.trace.push(pointer);
                if self.trace.len() < self.max_samples {
                    return None;
                }
                let outcome = if self.is_closed_at(pointer) {
                    self.shape().map(GestureOutcome::TimedOutClosed)
                } else {
                    Some(GestureOutcome::TimedOutOpen)
                };
                self.reset(GesturePhase::TimedOut);
                outcome
            }
            (GesturePhase::Drawing, false) => {
                let outcome = if self.is_closed_at(pointer) {
                    self.shape().map(GestureOutcome::Closed)
                } else {
                    Some(GestureOutcome::Missed)
                };
                self.reset(GesturePhase::Idle);
                outcome
            }
        }
    }

    fn is_closed_at(&self, pointer: Vec2) -> bool {
        self.anchor
            .is_some_and(|anchor| distance(anchor, pointer) <= self.hit_radius)
    }

    fn shape(&self) -> Option<ShapeEstimate> {
        ShapeEstimate::from_points(&self.trace)
    }

    fn reset(&mut self, phase: GesturePhase) {
        self.phase = phase;
        self.anchor = None;
        self.trace.clear();
    }

    #[inline]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// The PAS: where the current phagophore started.
    #[inline]
    pub fn anchor(&self) -> Option<Vec2> {
        self.anchor
    }

    /// Points sampled so far for the current phagophore.
    #[inline]
    pub fn trace(&self) -> &[Vec2] {
        &self.trace
    }

    #[inline]
    pub fn hit_radius(&self) -> f32 {
        self.hit_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn rectangle_loop(origin: Vec2, size: Vec2) -> Vec<Vec2> {
        vec![
            origin,
            origin + Vec2::new(size.x, 0.0),
            origin + size,
            origin + Vec2::new(0.0, size.y),
            origin + Vec2::new(5.0, 5.0),
        ]
    }

    /// Drive `points` through a tracker and release at the last one.
    fn draw(tracker: &mut GestureTracker, points: &[Vec2]) -> Option<GestureOutcome> {
        let mut last = None;
        for p in points {
            last = tracker.update(true, *p);
        }
        let release = *points.last().unwrap();
        tracker.update(false, release).or(last)
    }

    #[test]
    fn area_and_radius_follow_bounding_box() {
        let shape = ShapeEstimate::from_points(&rectangle_loop(
            Vec2::new(100.0, 100.0),
            Vec2::new(200.0, 100.0),
        ))
        .unwrap();
        assert!((shape.area - 62_831.855).abs() < 0.1);
        assert!((shape.radius - (shape.area / PI).sqrt() / 2.0).abs() < 1e-4);
        assert_eq!(shape.center, Vec2::new(200.0, 150.0));
    }

    #[test]
    fn small_box_is_below_reference_threshold() {
        let shape =
            ShapeEstimate::from_points(&rectangle_loop(Vec2::ZERO, Vec2::new(50.0, 50.0)))
                .unwrap();
        assert!((shape.area - 7_853.98).abs() < 0.1);
        assert!(!shape.is_viable(20_000.0));
    }

    #[test]
    fn intermediate_points_do_not_change_shape() {
        let a = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(120.0, 80.0),
            Vec2::new(40.0, 20.0),
        ];
        let mut b = a.clone();
        b.reverse();
        b.extend([
            Vec2::new(60.0, 40.0),
            Vec2::new(10.0, 70.0),
            Vec2::new(60.0, 40.0),
        ]);
        assert_eq!(ShapeEstimate::from_points(&a), ShapeEstimate::from_points(&b));
    }

    #[test]
    fn degenerate_trace_has_zero_area() {
        let shape = ShapeEstimate::from_points(&[Vec2::new(4.0, 4.0); 10]).unwrap();
        assert_eq!(shape.area, 0.0);
        assert_eq!(shape.radius, 0.0);
        assert!(ShapeEstimate::from_points(&[]).is_none());
    }

    #[test]
    fn press_starts_trace_at_anchor() {
        let mut tracker = GestureTracker::new(60, 100.0);
        let start = Vec2::new(300.0, 300.0);
        assert_eq!(
            tracker.update(true, start),
            Some(GestureOutcome::Started(start))
        );
        assert_eq!(tracker.phase(), GesturePhase::Drawing);
        assert_eq!(tracker.anchor(), Some(start));
        assert_eq!(tracker.trace(), &[start]);
    }

    #[test]
    fn release_near_anchor_closes_loop() {
        let mut tracker = GestureTracker::new(60, 100.0);
        let points = rectangle_loop(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0));
        match draw(&mut tracker, &points) {
            Some(GestureOutcome::Closed(shape)) => {
                assert_eq!(shape.max - shape.min, Vec2::new(200.0, 100.0));
            }
            other => panic!("expected closed loop, got {other:?}"),
        }
        assert_eq!(tracker.phase(), GesturePhase::Idle);
        assert!(tracker.trace().is_empty());
        assert!(tracker.anchor().is_none());
    }

    #[test]
    fn release_far_from_anchor_is_a_miss_whatever_the_area() {
        let mut tracker = GestureTracker::new(240, 100.0);
        let mut points = rectangle_loop(Vec2::ZERO, Vec2::new(900.0, 900.0));
        points.push(Vec2::new(600.0, 600.0));
        assert_eq!(draw(&mut tracker, &points), Some(GestureOutcome::Missed));
    }

    #[test]
    fn timeout_away_from_anchor_is_open() {
        let mut tracker = GestureTracker::new(20, 100.0);
        let mut outcome = None;
        for i in 0..20 {
            outcome = tracker.update(true, Vec2::new(i as f32 * 20.0, 0.0));
        }
        assert_eq!(outcome, Some(GestureOutcome::TimedOutOpen));
        assert_eq!(tracker.phase(), GesturePhase::TimedOut);
    }

    #[test]
    fn timeout_back_at_anchor_still_evaluates_loop() {
        let mut tracker = GestureTracker::new(5, 100.0);
        let points = rectangle_loop(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0));
        let mut outcome = None;
        for p in &points {
            outcome = tracker.update(true, *p);
        }
        assert!(matches!(outcome, Some(GestureOutcome::TimedOutClosed(_))));
    }

    #[test]
    fn timed_out_needs_one_released_frame_before_restarting() {
        let mut tracker = GestureTracker::new(2, 10.0);
        tracker.update(true, Vec2::ZERO);
        tracker.update(true, Vec2::new(50.0, 0.0));
        assert_eq!(tracker.phase(), GesturePhase::TimedOut);

        // Still holding: nothing happens.
        assert_eq!(tracker.update(true, Vec2::new(60.0, 0.0)), None);
        assert_eq!(tracker.phase(), GesturePhase::TimedOut);

        // Release: back to idle without an outcome.
        assert_eq!(tracker.update(false, Vec2::new(60.0, 0.0)), None);
        assert_eq!(tracker.phase(), GesturePhase::Idle);

        assert!(matches!(
            tracker.update(true, Vec2::new(70.0, 0.0)),
            Some(GestureOutcome::Started(_))
        ));
    }
}

//! Small geometric helpers shared by the gameplay core.
//!
//! All gameplay coordinates are *screen* coordinates: origin at the top-left
//! corner, `+y` pointing down, one unit per logical pixel.  Only the renderer
//! converts to Bevy world space (see [`screen_to_world`]).

use bevy::math::{Rect, Vec2};

use crate::constants::{ASPECT_RATIO, REFERENCE_WIDTH};

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    let delta = a - b;
    (delta.x * delta.x + delta.y * delta.y).sqrt()
}

/// Returns `false` only when `rect` lies entirely outside the play area
/// `[-buffer, width + buffer] × [-buffer, height + buffer]` on some axis.
///
/// A partially visible rect is still in bounds.
pub fn is_in_bounds(rect: Rect, screen: Vec2, buffer: f32) -> bool {
    !(rect.max.x < -buffer
        || rect.min.x > screen.x + buffer
        || rect.max.y < -buffer
        || rect.min.y > screen.y + buffer)
}

/// Scale a nominal magnitude by `scalar`, rounding to the nearest integer.
#[inline]
pub fn resolution_scale(value: f32, scalar: f32) -> f32 {
    (value * scalar).round()
}

/// Ratio between the actual screen width and the 1920 px reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionScale(pub f32);

impl ResolutionScale {
    /// Derive the scalar for a screen `width` px wide (three decimals).
    pub fn from_width(width: f32) -> Self {
        Self((width / REFERENCE_WIDTH * 1000.0).round() / 1000.0)
    }

    /// Scale a nominal length or speed.
    #[inline]
    pub fn length(self, nominal: f32) -> f32 {
        resolution_scale(nominal, self.0)
    }

    /// Scale a nominal area (quadratic in the scalar).
    #[inline]
    pub fn area(self, nominal: f32) -> f32 {
        nominal * self.0 * self.0
    }
}

impl Default for ResolutionScale {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Screen height for a given width at the game's 16:9 aspect ratio.
#[inline]
pub fn screen_height(width: f32) -> f32 {
    (width * ASPECT_RATIO).round()
}

/// Axis-aligned size occupied by a `size` box rotated by `degrees`.
///
/// Rounded to whole pixels, like a pre-rendered rotated sprite frame.
pub fn rotated_extent(size: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    Vec2::new(
        (size.x * cos + size.y * sin).round(),
        (size.x * sin + size.y * cos).round(),
    )
}

/// The four corners of `rect`.
#[inline]
pub fn corners(rect: Rect) -> [Vec2; 4] {
    [
        rect.min,
        Vec2::new(rect.max.x, rect.min.y),
        rect.max,
        Vec2::new(rect.min.x, rect.max.y),
    ]
}

/// Convert a screen-space point into Bevy 2D world space (origin at the
/// screen centre, `+y` up).
#[inline]
pub fn screen_to_world(point: Vec2, screen: Vec2) -> Vec2 {
    Vec2::new(point.x - screen.x / 2.0, screen.y / 2.0 - point.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_pythagorean() {
        assert_eq!(distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)), 5.0);
        assert_eq!(distance(Vec2::new(-1.0, 2.0), Vec2::new(-1.0, 2.0)), 0.0);
    }

    #[test]
    fn rect_touching_edge_is_in_bounds() {
        let screen = Vec2::new(800.0, 450.0);
        let rect = Rect::new(-50.0, 10.0, 0.0, 60.0);
        assert!(is_in_bounds(rect, screen, 0.0));
    }

    #[test]
    fn rect_fully_left_is_out_of_bounds() {
        let screen = Vec2::new(800.0, 450.0);
        let rect = Rect::new(-60.0, 10.0, -1.0, 60.0);
        assert!(!is_in_bounds(rect, screen, 0.0));
    }

    #[test]
    fn buffer_keeps_nearby_rect_in_bounds() {
        let screen = Vec2::new(800.0, 450.0);
        let rect = Rect::new(850.0, 10.0, 890.0, 60.0);
        assert!(!is_in_bounds(rect, screen, 0.0));
        assert!(is_in_bounds(rect, screen, 100.0));
        assert!(!is_in_bounds(rect, screen, 40.0));
    }

    #[test]
    fn below_screen_is_out_of_bounds() {
        let screen = Vec2::new(800.0, 450.0);
        let rect = Rect::new(100.0, 451.0, 200.0, 500.0);
        assert!(!is_in_bounds(rect, screen, 0.0));
    }

    #[test]
    fn scale_from_width_rounds_to_three_decimals() {
        assert_eq!(ResolutionScale::from_width(1920.0).0, 1.0);
        assert_eq!(ResolutionScale::from_width(1280.0).0, 0.667);
    }

    #[test]
    fn scaled_lengths_round_to_integers() {
        let scale = ResolutionScale(0.667);
        assert_eq!(scale.length(100.0), 67.0);
        assert_eq!(scale.length(7.0), 5.0);
        assert_eq!(resolution_scale(165.0, 0.5), 83.0);
    }

    #[test]
    fn scaled_area_is_quadratic() {
        let scale = ResolutionScale(0.5);
        assert_eq!(scale.area(20_000.0), 5_000.0);
    }

    #[test]
    fn rotated_extent_swaps_axes_at_right_angle() {
        let size = Vec2::new(300.0, 165.0);
        assert_eq!(rotated_extent(size, 0.0), size);
        assert_eq!(rotated_extent(size, 90.0), Vec2::new(165.0, 300.0));
        assert_eq!(rotated_extent(size, 180.0), size);
    }

    #[test]
    fn rotated_extent_grows_at_diagonal() {
        let ext = rotated_extent(Vec2::new(100.0, 100.0), 45.0);
        assert_eq!(ext, Vec2::new(141.0, 141.0));
    }

    #[test]
    fn screen_to_world_flips_y_about_centre() {
        let screen = Vec2::new(800.0, 400.0);
        assert_eq!(screen_to_world(Vec2::new(400.0, 200.0), screen), Vec2::ZERO);
        assert_eq!(
            screen_to_world(Vec2::new(0.0, 0.0), screen),
            Vec2::new(-400.0, 200.0)
        );
    }
}

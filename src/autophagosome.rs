//! The autophagosome: a closed phagophore that owns the cargo it swallowed.

use bevy::math::{Rect, Vec2};

use crate::cargo::Cargo;
use crate::geometry::{distance, is_in_bounds};
use crate::gesture::ShapeEstimate;

#[derive(Debug, Clone)]
pub struct Autophagosome {
    pub center: Vec2,
    /// Capture radius.
    pub radius: f32,
    pub area: f32,
    /// Pixels per tick; the last pointer delta while grabbed.
    pub velocity: Vec2,
    sprite_scale: f32,
    /// Trapped cargo in capture order.
    contents: Vec<Cargo>,
}

impl Autophagosome {
    /// Build an AP at rest from a closed loop's estimate.
    pub fn from_shape(shape: &ShapeEstimate, sprite_scale: f32) -> Self {
        Self {
            center: shape.center,
            radius: shape.radius,
            area: shape.area,
            velocity: Vec2::ZERO,
            sprite_scale,
            contents: Vec::new(),
        }
    }

    /// Diameter of the membrane sprite, a little wider than the capture disc.
    #[inline]
    pub fn sprite_diameter(&self) -> f32 {
        (self.radius * 2.0 * self.sprite_scale).round()
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, Vec2::splat(self.sprite_diameter()))
    }

    /// Follow the pointer while it holds the AP.
    ///
    /// `previous` is the pointer location one frame earlier.  When the
    /// pointer is not holding the AP the current velocity is kept.
    pub fn drag(&mut self, pressed: bool, previous: Option<Vec2>, pointer: Vec2) {
        if !pressed {
            return;
        }
        let Some(previous) = previous else {
            return;
        };
        if distance(self.center, pointer) < self.radius {
            self.velocity = pointer - previous;
        }
    }

    /// Move the AP and everything inside it by one tick of velocity.
    pub fn advance(&mut self) -> Vec2 {
        let delta = self.velocity;
        self.center += delta;
        for cargo in &mut self.contents {
            cargo.translate(delta);
        }
        delta
    }

    /// True once the membrane is entirely past the screen edge plus `buffer`.
    #[inline]
    pub fn has_left_stage(&self, screen: Vec2, buffer: f32) -> bool {
        !is_in_bounds(self.bounds(), screen, buffer)
    }

    pub(crate) fn absorb(&mut self, cargo: Cargo) {
        self.contents.push(cargo);
    }

    #[inline]
    pub fn contents(&self) -> &[Cargo] {
        &self.contents
    }

    /// Give up ownership of the trapped cargo.
    pub fn into_contents(self) -> Vec<Cargo> {
        self.contents
    }
}

//! Zoom/pan transform between device (pointer) space and model space.

use serde::{Deserialize, Serialize};

use crate::geometry::tolerance::Tolerances;
use crate::model::Vec2;

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.1;

/// `device = model * scale + (tx, ty)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { scale: 1.0, tx: 0.0, ty: 0.0 }
    }
}

impl Viewport {
    pub fn to_model(&self, device: Vec2) -> Vec2 {
        Vec2 {
            x: (device.x - self.tx) / self.scale,
            y: (device.y - self.ty) / self.scale,
        }
    }

    pub fn to_device(&self, model: Vec2) -> Vec2 {
        Vec2 {
            x: model.x * self.scale + self.tx,
            y: model.y * self.scale + self.ty,
        }
    }

    /// Zoom one step per wheel notch around `anchor` (device space), keeping
    /// the model point under the anchor fixed. Negative notches zoom in.
    /// Returns false when the scale is already at its bound.
    pub fn zoom_at(&mut self, anchor: Vec2, notches: i32) -> bool {
        if notches == 0 {
            return false;
        }
        let old = self.scale;
        let steps = notches.unsigned_abs() as f32;
        let new = if notches < 0 {
            (old + ZOOM_STEP * steps).min(MAX_SCALE)
        } else {
            (old - ZOOM_STEP * steps).max(MIN_SCALE)
        };
        if new == old {
            return false;
        }
        let factor = new / old;
        self.tx = anchor.x - factor * (anchor.x - self.tx);
        self.ty = anchor.y - factor * (anchor.y - self.ty);
        self.scale = new;
        true
    }

    pub fn reset(&mut self) {
        *self = Viewport::default();
    }

    pub fn is_zoomed(&self) -> bool {
        (self.scale - 1.0).abs() > f32::EPSILON || self.tx != 0.0 || self.ty != 0.0
    }

    /// Pick tolerances converted from pixels into model units.
    pub fn tolerances(&self, base: &Tolerances) -> Tolerances {
        base.at_scale(self.scale)
    }
}

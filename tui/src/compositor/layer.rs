//! Compositor Layer

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::LayerId;

/// A positioned, z-ordered drawing surface
///
/// The buffer is always origin-based (`0, 0, width, height`); `bounds`
/// places it on screen.
pub struct Layer {
    /// Layer identity
    pub id: LayerId,
    /// Screen position and size
    pub bounds: Rect,
    /// Stacking order, higher draws later
    pub z_index: i32,
    /// Hidden layers are skipped when compositing
    pub visible: bool,
    /// Opaque layers overwrite every cell, including blanks
    pub opaque: bool,
    /// Layer contents
    pub buffer: Buffer,
}

impl Layer {
    /// Create a visible, transparent layer
    pub fn new(id: LayerId, bounds: Rect, z_index: i32) -> Self {
        Self {
            id,
            bounds,
            z_index,
            visible: true,
            opaque: false,
            buffer: Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height)),
        }
    }

    /// Whether a screen position falls inside this layer
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.bounds.x
            && y >= self.bounds.y
            && x < self.bounds.x.saturating_add(self.bounds.width)
            && y < self.bounds.y.saturating_add(self.bounds.height)
    }
}

//! Drag-to-pan camera shared by flat rendering adapters.

use glam::Vec2;

/// Screen-space translation applied to the world, driven by pointer drags.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraPan {
    offset: Vec2,
    last_pointer: Option<Vec2>,
}

impl CameraPan {
    /// Creates a camera with the provided initial offset.
    #[must_use]
    pub const fn new(offset: Vec2) -> Self {
        Self {
            offset,
            last_pointer: None,
        }
    }

    /// Current translation from world space to screen space.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.last_pointer.is_some()
    }

    /// Starts a drag at the provided screen position.
    pub fn press(&mut self, screen: Vec2) {
        self.last_pointer = Some(screen);
    }

    /// Moves the camera by the pointer delta since the previous drag sample.
    pub fn drag(&mut self, screen: Vec2) {
        if let Some(last) = self.last_pointer {
            self.offset += screen - last;
            self.last_pointer = Some(screen);
        }
    }

    /// Ends the current drag.
    pub fn release(&mut self) {
        self.last_pointer = None;
    }

    /// Converts a screen position to world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen - self.offset
    }

    /// Converts a world position to screen space.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world + self.offset
    }
}

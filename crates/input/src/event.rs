use glam::Vec2;

/// Which global event source a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    PointerMove,
    Resize,
}

/// A raw event delivered by the host.
///
/// The scene consumes these, never platform events, so the windowed and
/// headless hosts share the same update logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a client position inside a window of the given size.
    PointerMoved {
        client_x: f32,
        client_y: f32,
        window_width: f32,
        window_height: f32,
    },
    /// The viewport changed size; the container must be re-measured.
    Resized,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::PointerMoved { .. } => EventKind::PointerMove,
            InputEvent::Resized => EventKind::Resize,
        }
    }
}

/// Cursor position in normalized device coordinates: x and y in `[-1, 1]`,
/// y pointing up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
}

impl PointerState {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
        }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    /// Update from a client-space position. Returns false and leaves the
    /// state untouched when the window has no area.
    pub fn update_from_client(
        &mut self,
        client_x: f32,
        client_y: f32,
        window_width: f32,
        window_height: f32,
    ) -> bool {
        if window_width <= 0.0 || window_height <= 0.0 {
            tracing::trace!("pointer move ignored: zero-sized window");
            return false;
        }
        self.position.x = (client_x / window_width) * 2.0 - 1.0;
        self.position.y = -(client_y / window_height) * 2.0 + 1.0;
        true
    }

    /// Apply an event. Only pointer moves affect the pointer.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerMoved {
                client_x,
                client_y,
                window_width,
                window_height,
            } => self.update_from_client(client_x, client_y, window_width, window_height),
            InputEvent::Resized => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_corners_map_to_unit_square() {
        let mut p = PointerState::default();
        p.update_from_client(0.0, 0.0, 800.0, 600.0);
        assert_eq!(p, PointerState::new(-1.0, 1.0));
        p.update_from_client(800.0, 600.0, 800.0, 600.0);
        assert_eq!(p, PointerState::new(1.0, -1.0));
        p.update_from_client(400.0, 300.0, 800.0, 600.0);
        assert_eq!(p, PointerState::new(0.0, 0.0));
    }

    #[test]
    fn zero_sized_window_keeps_previous_pointer() {
        let mut p = PointerState::new(0.5, 0.5);
        assert!(!p.update_from_client(10.0, 10.0, 0.0, 600.0));
        assert_eq!(p, PointerState::new(0.5, 0.5));
    }

    #[test]
    fn resize_event_does_not_move_pointer() {
        let mut p = PointerState::new(0.25, -0.25);
        assert!(!p.apply(&InputEvent::Resized));
        assert_eq!(p.x(), 0.25);
        assert_eq!(p.y(), -0.25);
    }

    #[test]
    fn event_kinds() {
        let moved = InputEvent::PointerMoved {
            client_x: 1.0,
            client_y: 1.0,
            window_width: 2.0,
            window_height: 2.0,
        };
        assert_eq!(moved.kind(), EventKind::PointerMove);
        assert_eq!(InputEvent::Resized.kind(), EventKind::Resize);
    }
}

use egui::{Pos2, Rect, Response, Vec2};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// Position in canvas pixel coordinates
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

/// Pointer events routed to the canvas surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { location: InputLocation },
    PointerMove { location: InputLocation },
    PointerUp { location: InputLocation },
}

/// Converts egui pointer interaction on the canvas widget into
/// canvas-space [`InputEvent`]s.
///
/// The widget may be drawn smaller than the canvas when the window is
/// narrow, so screen positions are scaled back to canvas pixels.
#[derive(Debug, Clone)]
pub struct InputHandler {
    canvas_size: Vec2,
    last_position: Option<Pos2>,
}

impl InputHandler {
    pub fn new(canvas_size: [u32; 2]) -> Self {
        Self {
            canvas_size: Vec2::new(canvas_size[0] as f32, canvas_size[1] as f32),
            last_position: None,
        }
    }

    /// Map a screen position inside `widget_rect` to canvas pixels
    pub fn to_canvas(&self, screen: Pos2, widget_rect: Rect) -> InputLocation {
        let scale = Vec2::new(
            self.canvas_size.x / widget_rect.width().max(1.0),
            self.canvas_size.y / widget_rect.height().max(1.0),
        );
        let offset = screen - widget_rect.min;
        let position = Pos2::new(offset.x * scale.x, offset.y * scale.y);
        let bounds = Rect::from_min_size(Pos2::ZERO, self.canvas_size);

        InputLocation {
            position,
            is_in_canvas: bounds.contains(position),
        }
    }

    /// Process the canvas widget's response for this frame
    pub fn process_response(&mut self, response: &Response) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let pointer = response.interact_pointer_pos().or(self.last_position);

        if let Some(screen) = pointer {
            let location = self.to_canvas(screen, response.rect);

            if response.drag_started() {
                events.push(InputEvent::PointerDown { location });
            } else if response.dragged() && Some(screen) != self.last_position {
                events.push(InputEvent::PointerMove { location });
            }

            if response.drag_stopped() {
                events.push(InputEvent::PointerUp { location });
                self.last_position = None;
                return events;
            }

            if response.dragged() || response.drag_started() {
                self.last_position = Some(screen);
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_scaled_widget_to_canvas_pixels() {
        let handler = InputHandler::new([512, 512]);
        let widget = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(256.0, 256.0));

        let location = handler.to_canvas(Pos2::new(228.0, 178.0), widget);
        assert_eq!(location.position, Pos2::new(256.0, 256.0));
        assert!(location.is_in_canvas);
    }

    #[test]
    fn test_outside_widget_is_flagged() {
        let handler = InputHandler::new([512, 512]);
        let widget = Rect::from_min_size(Pos2::ZERO, Vec2::new(512.0, 512.0));

        let location = handler.to_canvas(Pos2::new(-4.0, 600.0), widget);
        assert!(!location.is_in_canvas);
    }
}

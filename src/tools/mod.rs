use egui::Color32;

mod controller;
pub use controller::ToolController;

pub const PEN_COLOR: Color32 = Color32::BLACK;
pub const PEN_WIDTH: f32 = 3.0;
pub const ERASER_WIDTH: f32 = 20.0;

/// The drawing tools available on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolType {
    #[default]
    Pen,
    /// Paints with the canvas background color. This only reads as erasing
    /// because the background is uniform and opaque.
    Eraser,
}

/// Color and width handed to the canvas when a stroke begins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushSettings {
    pub color: Color32,
    pub width: f32,
}

impl ToolType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pen => "Pen",
            Self::Eraser => "Eraser",
        }
    }

    /// Brush bound to this tool on a canvas with the given background
    pub fn brush(&self, background: Color32) -> BrushSettings {
        match self {
            Self::Pen => BrushSettings {
                color: PEN_COLOR,
                width: PEN_WIDTH,
            },
            Self::Eraser => BrushSettings {
                color: background,
                width: ERASER_WIDTH,
            },
        }
    }
}

//! The drawing surface: a fixed-size raster buffer fed by freehand strokes.
//!
//! Strokes are captured through [`CanvasState`] and painted into the buffer
//! when they are finalized. Every finished stroke and every clear is reported
//! to an [`ImageChangeHandler`] so the current input image always mirrors
//! what is on the canvas.

mod raster;

use egui::{Color32, Pos2};
use image::RgbaImage;

use crate::error::CanvasError;
use crate::payload::ImagePayload;
use crate::source::ImageChangeHandler;
use crate::state::CanvasState;
use crate::stroke::{MutableStroke, Stroke};
use crate::tools::BrushSettings;

pub const CANVAS_WIDTH: u32 = 512;
pub const CANVAS_HEIGHT: u32 = 512;
pub const DEFAULT_BACKGROUND: Color32 = Color32::WHITE;

pub struct CanvasSurface {
    background: Color32,
    strokes: Vec<Stroke>,
    state: CanvasState,
    buffer: RgbaImage,
    /// Bumped whenever the buffer changes
    version: u64,
}

impl std::fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasSurface")
            .field("size", &self.size())
            .field("background", &self.background)
            .field("strokes", &self.strokes.len())
            .field("state", &self.state.name())
            .field("version", &self.version)
            .finish()
    }
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND)
    }
}

impl CanvasSurface {
    /// Create a blank 512×512 canvas. Transparent backgrounds are made opaque
    /// so the eraser keeps working.
    pub fn new(background: Color32) -> Self {
        let background = background.to_opaque();
        let mut buffer = RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        raster::fill(&mut buffer, background);

        Self {
            background,
            strokes: Vec::new(),
            state: CanvasState::Idle,
            buffer,
            version: 0,
        }
    }

    pub fn size(&self) -> [u32; 2] {
        [self.buffer.width(), self.buffer.height()]
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    /// The stroke being captured, for live preview
    pub fn current_stroke(&self) -> Option<&MutableStroke> {
        self.state.current_stroke()
    }

    /// Rasterized finalized strokes
    pub fn pixels(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Pointer down: start capturing a stroke with `brush`.
    pub fn begin_stroke(&mut self, point: Pos2, brush: BrushSettings) -> Result<(), CanvasError> {
        if !self.state.is_idle() {
            return Err(self.invalid_transition("Drawing"));
        }

        log::debug!("Stroke started at {:?} (width {})", point, brush.width);
        self.state = CanvasState::Drawing {
            stroke: MutableStroke::new(brush, point),
        };
        Ok(())
    }

    /// Pointer move while down.
    pub fn extend_stroke(&mut self, point: Pos2) -> Result<(), CanvasError> {
        let name = self.state.name();
        match self.state.current_stroke_mut() {
            Some(stroke) => {
                stroke.add_point(point);
                Ok(())
            }
            None => Err(CanvasError::InvalidStateTransition {
                from: name,
                to: "Drawing",
            }),
        }
    }

    /// Pointer up: finalize the stroke, paint it and publish a new snapshot.
    pub fn end_stroke(&mut self, handler: &mut dyn ImageChangeHandler) -> Result<(), CanvasError> {
        let Some(stroke) = self.state.take_stroke() else {
            return Err(self.invalid_transition("Idle"));
        };

        let stroke = stroke.finish();
        raster::paint_stroke(&mut self.buffer, &stroke);
        self.strokes.push(stroke);
        self.version += 1;
        log::debug!("Stroke completed, {} strokes on canvas", self.strokes.len());

        let snapshot = self.snapshot()?;
        handler.handle_image_change(Some(snapshot));
        Ok(())
    }

    /// Drop every stroke (including one under capture) and restore the
    /// background. Reports an explicit clear.
    pub fn clear(&mut self, handler: &mut dyn ImageChangeHandler) {
        self.state = CanvasState::Idle;
        self.strokes.clear();
        raster::fill(&mut self.buffer, self.background);
        self.version += 1;
        log::info!("Canvas cleared");

        handler.handle_image_change(None);
    }

    /// Flatten the canvas into a PNG payload at 1:1 scale.
    pub fn snapshot(&self) -> Result<ImagePayload, CanvasError> {
        let png = raster::encode_png(&self.buffer)?;
        Ok(ImagePayload::from_png(&png, self.buffer.width(), self.buffer.height()))
    }

    fn invalid_transition(&self, to: &'static str) -> CanvasError {
        CanvasError::InvalidStateTransition {
            from: self.state.name(),
            to,
        }
    }
}

//! Stroke-capture state machine for the canvas surface.
//!
//! ```text
//!  ┌──────────┐  begin   ┌───────────┐
//!  │          ├─────────►│           │◄──┐
//!  │   Idle   │          │  Drawing  │   │ extend
//!  │          │◄─────────┤           ├───┘
//!  └──────────┘   end    └───────────┘
//! ```
//!
//! `clear` is allowed from either state and always lands in `Idle`.

use crate::stroke::MutableStroke;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CanvasState {
    /// No pointer is down
    #[default]
    Idle,
    /// Capturing a stroke; the brush was bound when it began
    Drawing { stroke: MutableStroke },
}

impl CanvasState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Drawing { .. } => "Drawing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    /// Returns the stroke under capture, if any
    pub fn current_stroke(&self) -> Option<&MutableStroke> {
        match self {
            Self::Drawing { stroke } => Some(stroke),
            Self::Idle => None,
        }
    }

    pub fn current_stroke_mut(&mut self) -> Option<&mut MutableStroke> {
        match self {
            Self::Drawing { stroke } => Some(stroke),
            Self::Idle => None,
        }
    }

    /// Leave `Drawing`, handing back the captured stroke
    pub fn take_stroke(&mut self) -> Option<MutableStroke> {
        match std::mem::take(self) {
            Self::Drawing { stroke } => Some(stroke),
            Self::Idle => None,
        }
    }
}

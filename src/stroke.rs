use egui::{Color32, Pos2};

use crate::tools::BrushSettings;

// Immutable stroke, appended to the canvas once the pointer is released
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Pos2>,
    color: Color32,
    width: f32,
}

// Stroke under capture; brush is fixed when it is created
#[derive(Debug, Clone, PartialEq)]
pub struct MutableStroke {
    points: Vec<Pos2>,
    color: Color32,
    width: f32,
}

impl Stroke {
    pub fn new(color: Color32, width: f32, points: Vec<Pos2>) -> Self {
        Self {
            points,
            color,
            width,
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

impl MutableStroke {
    /// Start capturing a stroke at `origin` with the given brush.
    pub fn new(brush: BrushSettings, origin: Pos2) -> Self {
        Self {
            points: vec![origin],
            color: brush.color,
            width: brush.width,
        }
    }

    pub fn add_point(&mut self, point: Pos2) {
        // Pointer events often repeat the last position
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    // Convert to an immutable Stroke
    pub fn finish(self) -> Stroke {
        Stroke::new(self.color, self.width, self.points)
    }

    // Get a reference to the points for preview
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolType;

    #[test]
    fn test_brush_is_bound_at_creation() {
        let brush = ToolType::Pen.brush(Color32::WHITE);
        let mut stroke = MutableStroke::new(brush, Pos2::new(1.0, 1.0));
        stroke.add_point(Pos2::new(2.0, 2.0));

        let stroke = stroke.finish();
        assert_eq!(stroke.color(), Color32::BLACK);
        assert_eq!(stroke.width(), 3.0);
        assert_eq!(stroke.points().len(), 2);
    }

    #[test]
    fn test_duplicate_points_are_collapsed() {
        let brush = ToolType::Pen.brush(Color32::WHITE);
        let mut stroke = MutableStroke::new(brush, Pos2::new(5.0, 5.0));
        stroke.add_point(Pos2::new(5.0, 5.0));
        stroke.add_point(Pos2::new(6.0, 5.0));
        stroke.add_point(Pos2::new(6.0, 5.0));

        assert_eq!(stroke.points(), &[Pos2::new(5.0, 5.0), Pos2::new(6.0, 5.0)]);
    }
}

use egui::Color32;

use super::{BrushSettings, ToolType};

/// Tracks the active tool and the brush the next stroke will use.
#[derive(Debug, Clone)]
pub struct ToolController {
    active: ToolType,
    background: Color32,
}

impl ToolController {
    pub fn new(background: Color32) -> Self {
        Self {
            active: ToolType::default(),
            background,
        }
    }

    pub fn set_tool(&mut self, tool: ToolType) {
        if self.active != tool {
            log::info!("Tool selected: {}", tool.name());
        }
        self.active = tool;
    }

    pub fn active_tool(&self) -> ToolType {
        self.active
    }

    pub fn brush(&self) -> BrushSettings {
        self.active.brush(self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_pen() {
        let tools = ToolController::new(Color32::WHITE);
        assert_eq!(tools.active_tool(), ToolType::Pen);
        assert_eq!(tools.brush().color, Color32::BLACK);
        assert_eq!(tools.brush().width, 3.0);
    }

    #[test]
    fn test_eraser_uses_background() {
        let background = Color32::from_rgb(250, 240, 230);
        let mut tools = ToolController::new(background);

        tools.set_tool(ToolType::Eraser);
        assert_eq!(tools.brush().color, background);
        assert_eq!(tools.brush().width, 20.0);

        tools.set_tool(ToolType::Pen);
        assert_eq!(tools.brush().color, Color32::BLACK);
    }
}

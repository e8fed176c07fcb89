use crate::SketchApp;
use crate::tools::ToolType;

/// Pen / Eraser / Clear row above the canvas
pub fn tools_panel(app: &mut SketchApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let active = app.tools.active_tool();

        for tool in [ToolType::Pen, ToolType::Eraser] {
            if ui.selectable_label(active == tool, tool.name()).clicked() {
                app.tools.set_tool(tool);
            }
        }

        ui.separator();

        let has_strokes = app.canvas.stroke_count() > 0;
        if ui.add_enabled(has_strokes, egui::Button::new("Clear")).clicked() {
            app.clear_canvas();
        }
    });
}

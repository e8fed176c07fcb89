use egui::{Color32, CursorIcon, Pos2, Rect, Sense, Shape};

use crate::SketchApp;
use crate::texture_manager::rgba_image;

/// Payload ids start at 1, so 0 is free for the canvas buffer
const CANVAS_TEXTURE_OWNER: usize = 0;

pub fn canvas_panel(app: &mut SketchApp, ui: &mut egui::Ui) {
    let [width, height] = app.canvas.size();
    let side = ui.available_width().min(width as f32);
    let display = egui::vec2(side, side * height as f32 / width as f32);

    let (response, painter) = ui.allocate_painter(display, Sense::drag());
    let rect = response.rect;
    let ctx = ui.ctx().clone();

    let texture = app.textures.get_or_create_texture(
        CANVAS_TEXTURE_OWNER,
        app.canvas.version(),
        || Ok(rgba_image(app.canvas.pixels())),
        &ctx,
    );
    match texture {
        Ok(texture) => {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
        Err(e) => {
            log::error!("Canvas texture unavailable: {}", e);
            painter.rect_filled(rect, 0.0, app.canvas.background());
        }
    }

    // The stroke being drawn is not in the buffer yet
    if let Some(stroke) = app.canvas.current_stroke() {
        let scale = rect.width() / width as f32;
        let points: Vec<Pos2> = stroke
            .points()
            .iter()
            .map(|p| rect.min + p.to_vec2() * scale)
            .collect();
        let stroke_width = stroke.width() * scale;

        if points.len() == 1 {
            painter.circle_filled(points[0], stroke_width / 2.0, stroke.color());
        } else {
            painter.add(Shape::line(points, egui::Stroke::new(stroke_width, stroke.color())));
        }
    }

    painter.rect_stroke(
        rect,
        0.0,
        egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
    );

    if response.hovered() {
        ctx.set_cursor_icon(CursorIcon::Crosshair);
    }

    let events = app.input.process_response(&response);
    app.handle_canvas_events(events);
}

use crate::SketchApp;
use crate::source::ImageChangeHandler;

use super::preview_panel::preview_texture;

const THUMBNAIL_SIZE: f32 = 192.0;

pub fn upload_panel(app: &mut SketchApp, ui: &mut egui::Ui) {
    let ctx = ui.ctx().clone();
    let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
    let mut frame = egui::Frame::group(ui.style()).inner_margin(24.0);
    if hovering {
        frame = frame.stroke(egui::Stroke::new(2.0, ui.visuals().selection.bg_fill));
    }

    let (thumbnail, current_id) = {
        let session = app.session.lock();
        (
            preview_texture(&mut app.textures, session.source.current(), &ctx),
            session.source.current_image_id(),
        )
    };

    frame.show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical_centered(|ui| {
            match &thumbnail {
                Some(Ok(texture)) => {
                    ui.add(
                        egui::Image::new(texture)
                            .max_size(egui::vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE))
                            .maintain_aspect_ratio(true),
                    );
                    ui.add_space(8.0);
                }
                Some(Err(_)) => {
                    ui.colored_label(ui.visuals().error_fg_color, "Preview unavailable");
                    ui.add_space(8.0);
                }
                None => {}
            }

            ui.label("Drag and drop an image here, or");
            ui.add_space(4.0);

            let busy = app.is_uploading();
            if ui.add_enabled(!busy, egui::Button::new("Choose File")).clicked() {
                app.pick_file();
            }
            if busy {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading image…");
                });
            }
            ui.add_space(4.0);
            ui.small("PNG, JPEG, GIF, WebP or BMP");
        });
    });

    if thumbnail.is_some() {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if let Some(name) = app.uploads.uploaded_name(current_id) {
                ui.label(name.to_owned());
            }
            if ui.button("✖ Remove").clicked() {
                app.remove_upload();
            }
        });
    }
}

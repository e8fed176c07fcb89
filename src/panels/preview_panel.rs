use egui::TextureHandle;

use crate::SketchApp;
use crate::payload::ImagePayload;
use crate::texture_manager::{TextureGenerationError, TextureManager, payload_image};

const PREVIEW_SIZE: f32 = 256.0;

pub(super) type PreviewTexture = Option<Result<TextureHandle, TextureGenerationError>>;

pub(super) fn preview_texture(
    textures: &mut TextureManager,
    payload: Option<&ImagePayload>,
    ctx: &egui::Context,
) -> PreviewTexture {
    payload.map(|p| textures.get_or_create_texture(p.id(), 0, || payload_image(p), ctx))
}

fn show_preview(ui: &mut egui::Ui, title: &str, texture: PreviewTexture, placeholder: &str) {
    ui.group(|ui| {
        ui.set_min_size(egui::vec2(PREVIEW_SIZE, PREVIEW_SIZE));
        ui.vertical(|ui| {
            ui.strong(title);
            match texture {
                Some(Ok(texture)) => {
                    ui.add(
                        egui::Image::new(&texture)
                            .max_size(egui::vec2(PREVIEW_SIZE, PREVIEW_SIZE))
                            .maintain_aspect_ratio(true),
                    );
                }
                Some(Err(_)) => {
                    ui.colored_label(ui.visuals().error_fg_color, "Preview unavailable");
                }
                None => {
                    ui.weak(placeholder);
                }
            }
        });
    });
}

/// Input and result previews with the Generate and Download actions
pub fn preview_panel(app: &mut SketchApp, ui: &mut egui::Ui) {
    let ctx = ui.ctx().clone();

    // Build textures under the lock, draw after releasing it
    let (input, result, has_input, can_export) = {
        let session = app.session.lock();
        (
            preview_texture(&mut app.textures, session.source.current(), &ctx),
            preview_texture(&mut app.textures, session.results.get(), &ctx),
            session.source.has_image(),
            session.results.can_export(),
        )
    };

    show_preview(ui, "Your Input", input, "Draw or upload an image to get started");
    ui.add_space(8.0);

    let generating = app.is_generating();
    let placeholder = if generating {
        "Generating…"
    } else {
        "Your AI-generated image will appear here"
    };
    show_preview(ui, "AI Generated Result", result, placeholder);
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let label = if generating { "Generating…" } else { "Generate AI Image" };
        let button = ui.add_enabled(has_input && !generating, egui::Button::new(label));
        if button.clicked() {
            app.start_generation();
        }
        if generating {
            ui.spinner();
        }

        if ui
            .add_enabled(can_export, egui::Button::new("Download Result"))
            .clicked()
        {
            app.export_result();
        }
    });
}

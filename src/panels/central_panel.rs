use crate::SketchApp;
use crate::session::InputMode;

use super::{canvas_panel, preview_panel, tools_panel, upload_panel};

pub fn header_panel(ctx: &egui::Context) {
    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.heading("Sketch Vision AI");
        ui.label("Turn a sketch or a photo into a generated image.");
        ui.add_space(6.0);
    });
}

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.columns(2, |columns| {
                input_section(app, &mut columns[0]);
                preview_panel(app, &mut columns[1]);
            });
        });
    });
}

fn input_section(app: &mut SketchApp, ui: &mut egui::Ui) {
    let mode = app.session.lock().mode();

    ui.horizontal(|ui| {
        for tab in [InputMode::Draw, InputMode::Upload] {
            if ui.selectable_label(mode == tab, tab.label()).clicked() && mode != tab {
                app.set_mode(tab);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Clear All").clicked() {
                app.clear_all();
            }
        });
    });
    ui.separator();

    match mode {
        InputMode::Draw => {
            tools_panel(app, ui);
            ui.add_space(4.0);
            canvas_panel(app, ui);
        }
        InputMode::Upload => upload_panel(app, ui),
    }
}

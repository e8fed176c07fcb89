use egui::{Align2, Color32, RichText};

use crate::SketchApp;
use crate::notifications::NotificationKind;
use crate::util::time;

pub fn notifications_overlay(app: &mut SketchApp, ctx: &egui::Context) {
    let now = time::current_time_secs();
    if app.notifications.active(now).next().is_none() {
        return;
    }

    egui::Area::new(egui::Id::new("notifications"))
        .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .show(ctx, |ui| {
            for notification in app.notifications.active(now) {
                let fill = match notification.kind {
                    NotificationKind::Success => Color32::from_rgb(34, 139, 34),
                    NotificationKind::Error => Color32::from_rgb(178, 34, 34),
                };
                egui::Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                    ui.label(RichText::new(&notification.message).color(Color32::WHITE));
                });
                ui.add_space(4.0);
            }
        });
}

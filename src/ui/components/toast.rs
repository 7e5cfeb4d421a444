use eframe::egui;

pub fn render(ctx: &egui::Context, text: &str) {
    egui::Area::new(egui::Id::new("warning_toast"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -48.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.colored_label(egui::Color32::LIGHT_RED, text);
            });
        });
}

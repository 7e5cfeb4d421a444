use eframe::egui;

use crate::common::ChatMessage;

pub fn render(ui: &mut egui::Ui, messages: &[ChatMessage]) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in messages {
                ui.label(message.display_line());
            }
        });
}

use std::time::Instant;

use eframe::egui;

use crate::error::Field;
use crate::ui::state::AppState;

#[derive(Default)]
pub struct SidebarActions {
    pub open_channel: Option<String>,
    pub reload_channels: bool,
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState, now: Instant) -> SidebarActions {
    let mut actions = SidebarActions::default();

    ui.label(field_label("Username", state.is_highlighted(Field::Sender, now)));
    ui.text_edit_singleline(&mut state.username);
    ui.separator();

    ui.horizontal(|ui| {
        if ui
            .button(field_label("Channels", state.is_highlighted(Field::Channel, now)))
            .clicked()
        {
            state.toggle_channel_list();
        }
        if ui.button("⟳").clicked() {
            actions.reload_channels = true;
        }
    });

    if !state.show_channel_list {
        return actions;
    }

    if state.channels_loading {
        ui.spinner();
        return actions;
    }

    if state.channels.is_empty() {
        ui.label(egui::RichText::new("No channels").weak());
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for channel in &state.channels {
            let selected = state.open_channel.as_deref() == Some(channel.as_str());
            if ui.selectable_label(selected, channel.as_str()).clicked() {
                actions.open_channel = Some(channel.clone());
            }
        }
    });

    actions
}

// Nhấp nháy đỏ trường bị thiếu khi gửi thất bại
fn field_label(text: &str, highlighted: bool) -> egui::RichText {
    let label = egui::RichText::new(text).strong();
    if highlighted {
        label.color(egui::Color32::RED)
    } else {
        label
    }
}

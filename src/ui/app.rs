use std::time::Instant;

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{SyncCommand, SyncEvent};
use crate::config;
use crate::error::Field;

use super::components::{
    chat_area, input_bar,
    sidebar::{self, SidebarActions},
    toast,
};
use super::state::AppState;

pub struct ChatApp {
    state: AppState,
    command_sender: mpsc::Sender<SyncCommand>,
    event_receiver: mpsc::UnboundedReceiver<SyncEvent>,
    config_path: String,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        command_sender: mpsc::Sender<SyncCommand>,
        event_receiver: mpsc::UnboundedReceiver<SyncEvent>,
        username: Option<String>,
        config_path: String,
    ) -> Self {
        let app = Self {
            state: AppState::new(username),
            command_sender,
            event_receiver,
            config_path,
        };
        app.send_command(SyncCommand::ReloadChannels);
        app
    }

    fn handle_sync_events(&mut self, now: Instant) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply_event(event, now);
        }
    }

    fn send_draft(&mut self, now: Instant) {
        if let Some((sender, body)) = self.state.take_outgoing(now) {
            if self.state.note_sender(&sender) {
                config::persist_username(&self.config_path, &sender);
            }
            self.send_command(SyncCommand::SendMessage { sender, body });
        }
    }

    fn send_command(&self, command: SyncCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to sync loop: {err}");
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.handle_sync_events(now);

        if input_bar::take_enter_press(ctx) {
            self.send_draft(now);
        }

        egui::SidePanel::left("channel_sidebar")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                let actions: SidebarActions = sidebar::render(ui, &mut self.state, now);
                if actions.reload_channels {
                    self.send_command(SyncCommand::ReloadChannels);
                }
                if let Some(channel) = actions.open_channel {
                    self.send_command(SyncCommand::OpenChannel(channel));
                }
            });

        egui::TopBottomPanel::bottom("composer").show(ctx, |ui| {
            let highlighted = self.state.is_highlighted(Field::Body, now);
            if input_bar::render(ui, &mut self.state.draft, highlighted) {
                self.send_draft(now);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match &self.state.open_channel {
                Some(channel) => ui.heading(channel.as_str()),
                None => ui.heading("No channel open"),
            };
            ui.separator();

            if self.state.messages_loading {
                ui.centered_and_justified(|ui| ui.spinner());
            } else {
                chat_area::render(ui, &self.state.messages);
            }
        });

        if let Some(text) = self.state.visible_toast(now) {
            toast::render(ctx, text);
        }

        ctx.request_repaint();
    }
}

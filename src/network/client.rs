use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::common::{ChatMessage, SyncCommand, SyncEvent};
use crate::config::AppConfig;
use crate::error::TransportError;
use crate::sync::{FetchReason, FetchTicket, MessageView, Outcome, Synchronizer};

use super::api::ChatApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub poll_interval: Duration,
    pub message_count: usize,
    pub request_timeout: Duration,
}

impl From<&AppConfig> for SyncSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            // Chu kỳ 0 sẽ làm vòng tick quay liên tục
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
            message_count: config.message_count.max(1),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// Đẩy các thay đổi hiển thị lên UI qua kênh sự kiện không giới hạn.
pub struct EventView {
    event_sender: mpsc::UnboundedSender<SyncEvent>,
}

impl EventView {
    fn emit(&self, event: SyncEvent) {
        if let Err(err) = self.event_sender.send(event) {
            log::warn!("UI is gone; dropping event: {err}");
        }
    }
}

impl MessageView for EventView {
    fn replace_messages(&mut self, channel: &str, messages: &[ChatMessage]) {
        self.emit(SyncEvent::MessagesReplaced {
            channel: channel.to_string(),
            messages: messages.to_vec(),
        });
    }

    fn append_message(&mut self, channel: &str, message: &ChatMessage) {
        self.emit(SyncEvent::MessageEchoed {
            channel: channel.to_string(),
            message: message.clone(),
        });
    }
}

struct FetchDone {
    ticket: FetchTicket,
    result: Result<Vec<ChatMessage>, TransportError>,
}

/// Worker sở hữu trạng thái đồng bộ; mọi thay đổi trạng thái chạy trên task này.
pub struct SyncClient {
    api: Arc<dyn ChatApi>,
    synchronizer: Synchronizer<EventView>,
    event_sender: mpsc::UnboundedSender<SyncEvent>,
    command_receiver: mpsc::Receiver<SyncCommand>,
    settings: SyncSettings,
}

impl SyncClient {
    pub fn new(
        api: Arc<dyn ChatApi>,
        event_sender: mpsc::UnboundedSender<SyncEvent>,
        command_receiver: mpsc::Receiver<SyncCommand>,
        settings: SyncSettings,
    ) -> Self {
        let view = EventView {
            event_sender: event_sender.clone(),
        };
        Self {
            api,
            synchronizer: Synchronizer::new(view),
            event_sender,
            command_receiver,
            settings,
        }
    }

    pub async fn run(mut self) {
        let (fetch_tx, mut fetch_rx) = mpsc::channel::<FetchDone>(16);
        let tick = time::sleep(self.settings.poll_interval);
        tokio::pin!(tick);
        let mut tick_in_flight = false;

        log::info!(
            "Sync loop started (interval {:?}, {} messages per fetch)",
            self.settings.poll_interval,
            self.settings.message_count
        );

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.handle_command(command, &fetch_tx),
                        None => break,
                    }
                }
                Some(done) = fetch_rx.recv() => {
                    let was_tick = done.ticket.reason == FetchReason::Tick;
                    self.handle_fetch_done(done);
                    if was_tick {
                        // Chỉ hẹn lần tick tiếp theo sau khi lần trước đã xong
                        tick_in_flight = false;
                        tick.as_mut().reset(Instant::now() + self.settings.poll_interval);
                    }
                }
                () = &mut tick, if !tick_in_flight => {
                    match self.synchronizer.begin_tick() {
                        Some(ticket) => {
                            log::debug!("Refreshing channel {}", ticket.channel);
                            tick_in_flight = true;
                            self.spawn_fetch(ticket, &fetch_tx);
                        }
                        None => {
                            tick.as_mut().reset(Instant::now() + self.settings.poll_interval);
                        }
                    }
                }
            }
        }

        log::info!("Sync loop stopped");
    }

    fn handle_command(&mut self, command: SyncCommand, fetch_tx: &mpsc::Sender<FetchDone>) {
        match command {
            SyncCommand::OpenChannel(name) => {
                let ticket = self.synchronizer.open_channel(name);
                self.emit(SyncEvent::ChannelOpening(ticket.channel.clone()));
                self.spawn_fetch(ticket, fetch_tx);
            }
            SyncCommand::SendMessage { sender, body } => {
                match self.synchronizer.send_local_message(&sender, &body) {
                    Ok(outgoing) => {
                        let request = self.api.send_message(
                            &outgoing.channel,
                            &outgoing.sender,
                            &outgoing.encoded_body,
                        );
                        let timeout = self.settings.request_timeout;
                        tokio::spawn(async move {
                            match with_timeout(timeout, request).await {
                                Ok(ack) => log::debug!("Send acknowledged: {ack}"),
                                Err(err) => log::warn!(
                                    "Failed to send message to {}: {err}",
                                    outgoing.channel
                                ),
                            }
                        });
                    }
                    Err(err) => {
                        log::info!("Send rejected: {err}");
                        self.emit(SyncEvent::SendRejected(err));
                    }
                }
            }
            SyncCommand::ReloadChannels => self.reload_channels(),
        }
    }

    fn handle_fetch_done(&mut self, done: FetchDone) {
        let outcome = self.synchronizer.resolve(&done.ticket, done.result);
        if outcome == Outcome::Failed && done.ticket.reason == FetchReason::Open {
            self.emit(SyncEvent::MessagesUnavailable(done.ticket.channel));
        }
    }

    fn spawn_fetch(&self, ticket: FetchTicket, fetch_tx: &mpsc::Sender<FetchDone>) {
        let request = self
            .api
            .fetch_messages(&ticket.channel, self.settings.message_count);
        let timeout = self.settings.request_timeout;
        let fetch_tx = fetch_tx.clone();
        tokio::spawn(async move {
            let result = with_timeout(timeout, request).await;
            if fetch_tx.send(FetchDone { ticket, result }).await.is_err() {
                log::debug!("Sync loop gone; dropping fetch result");
            }
        });
    }

    fn reload_channels(&self) {
        self.emit(SyncEvent::ChannelsLoading);
        let request = self.api.fetch_channels();
        let timeout = self.settings.request_timeout;
        let event_sender = self.event_sender.clone();
        tokio::spawn(async move {
            let event = match with_timeout(timeout, request).await {
                Ok(channels) => {
                    log::info!("Loaded {} channels", channels.len());
                    SyncEvent::ChannelsLoaded(channels)
                }
                Err(err) => {
                    log::warn!("Failed to load channel list: {err}");
                    SyncEvent::ChannelsUnavailable(err.to_string())
                }
            };
            if let Err(err) = event_sender.send(event) {
                log::warn!("Failed to notify UI about channel list: {err}");
            }
        });
    }

    fn emit(&self, event: SyncEvent) {
        if let Err(err) = self.event_sender.send(event) {
            log::warn!("UI is gone; dropping event: {err}");
        }
    }
}

async fn with_timeout<T>(
    timeout: Duration,
    request: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, TransportError> {
    time::timeout(timeout, request)
        .await
        .unwrap_or(Err(TransportError::Timeout(timeout)))
}

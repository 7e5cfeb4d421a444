//! Chính sách đồng bộ tin nhắn: khi nào làm mới từ server, khi nào giữ
//! tin nhắn vừa gửi cục bộ (local echo).

use chrono::Utc;

use crate::common::ChatMessage;
use crate::error::{TransportError, ValidationError};
use crate::network::codec::{decode_body, encode_body};

/// Nơi hiển thị danh sách tin nhắn (egui, terminal, hoặc bản ghi trong test).
pub trait MessageView {
    fn replace_messages(&mut self, channel: &str, messages: &[ChatMessage]);
    fn append_message(&mut self, channel: &str, message: &ChatMessage);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    Open,
    Tick,
}

/// Gắn với mỗi lần fetch để kiểm tra lại khi kết quả về.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub channel: String,
    pub session: u64,
    pub reason: FetchReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub channel: String,
    pub sender: String,
    pub encoded_body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered(usize),
    Suppressed,
    Stale,
    Failed,
}

/// Trạng thái đồng bộ của một phiên client.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SynchronizerState {
    pub open_channel: Option<String>,
    pub suppress_next_refresh: bool,
    /// Tăng mỗi lần mở kênh; kết quả mang session cũ bị bỏ qua.
    pub session: u64,
}

pub struct Synchronizer<V> {
    state: SynchronizerState,
    view: V,
}

/// Kiểm tra theo thứ tự: người gửi, kênh, nội dung. Trả về kênh đích khi hợp lệ.
pub fn validate_outgoing<'a>(
    sender: &str,
    channel: Option<&'a str>,
    body: &str,
) -> Result<&'a str, ValidationError> {
    if sender.trim().is_empty() {
        return Err(ValidationError::MissingSender);
    }
    let channel = match channel {
        Some(channel) if !channel.is_empty() => channel,
        _ => return Err(ValidationError::MissingChannel),
    };
    if body.trim().is_empty() {
        return Err(ValidationError::MissingBody);
    }
    Ok(channel)
}

impl<V: MessageView> Synchronizer<V> {
    pub fn new(view: V) -> Self {
        Self {
            state: SynchronizerState::default(),
            view,
        }
    }

    pub fn state(&self) -> &SynchronizerState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn open_channel(&mut self, name: impl Into<String>) -> FetchTicket {
        let name = name.into();
        log::info!("Opening channel {name}");

        self.state.session += 1;
        self.state.suppress_next_refresh = false;
        self.state.open_channel = Some(name.clone());

        FetchTicket {
            channel: name,
            session: self.state.session,
            reason: FetchReason::Open,
        }
    }

    pub fn send_local_message(
        &mut self,
        sender: &str,
        body: &str,
    ) -> Result<OutgoingMessage, ValidationError> {
        let body = body.trim();
        let channel =
            validate_outgoing(sender, self.state.open_channel.as_deref(), body)?.to_string();

        let sender = sender.trim().to_string();
        let encoded_body = encode_body(body);
        let echo = ChatMessage {
            sender: sender.clone(),
            body: decode_body(&encoded_body),
            timestamp: Utc::now(),
        };

        self.view.append_message(&channel, &echo);
        // Bỏ qua lần làm mới kế tiếp để tin vừa gửi không bị snapshot cũ ghi đè
        self.state.suppress_next_refresh = true;

        Ok(OutgoingMessage {
            channel,
            sender,
            encoded_body,
        })
    }

    pub fn begin_tick(&self) -> Option<FetchTicket> {
        let channel = self.state.open_channel.clone()?;
        Some(FetchTicket {
            channel,
            session: self.state.session,
            reason: FetchReason::Tick,
        })
    }

    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<ChatMessage>, TransportError>,
    ) -> Outcome {
        let is_current = ticket.session == self.state.session
            && self.state.open_channel.as_deref() == Some(ticket.channel.as_str());
        if !is_current {
            log::debug!(
                "Dropping stale {:?} result for channel {}",
                ticket.reason,
                ticket.channel
            );
            return Outcome::Stale;
        }

        let messages = match result {
            Ok(messages) => messages,
            Err(err) => {
                log::warn!("Failed to fetch messages for {}: {err}", ticket.channel);
                return Outcome::Failed;
            }
        };

        if ticket.reason == FetchReason::Tick && self.state.suppress_next_refresh {
            self.state.suppress_next_refresh = false;
            log::debug!("Skipping refresh of {} after local send", ticket.channel);
            return Outcome::Suppressed;
        }

        self.view.replace_messages(&ticket.channel, &messages);
        Outcome::Rendered(messages.len())
    }
}

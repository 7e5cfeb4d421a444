use std::time::{Duration, Instant};

use crate::common::{ChatMessage, SyncEvent};
use crate::error::{Field, ValidationError};
use crate::sync::validate_outgoing;

const HIGHLIGHT_DURATION: Duration = Duration::from_millis(1000);

/// Thông báo cảnh báo nhỏ ở cuối màn hình.
#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub shown_at: Instant,
}

impl Toast {
    /// Hiển thị lâu hơn với thông báo dài: 800ms + 50ms mỗi ký tự.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(800 + 50 * self.text.chars().count() as u64)
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) < self.duration()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Highlight {
    pub field: Field,
    pub since: Instant,
}

/// Trạng thái cục bộ của UI.
pub struct AppState {
    pub channels: Vec<String>,
    pub channels_loading: bool,
    pub show_channel_list: bool,
    pub open_channel: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub messages_loading: bool,
    pub username: String,
    pub draft: String,
    pub toast: Option<Toast>,
    pub highlight: Option<Highlight>,
    /// Tên đã lưu vào file cấu hình gần nhất.
    saved_username: Option<String>,
}

impl AppState {
    pub fn new(username: Option<String>) -> Self {
        Self {
            channels: Vec::new(),
            channels_loading: false,
            show_channel_list: true,
            open_channel: None,
            messages: Vec::new(),
            messages_loading: false,
            username: username.clone().unwrap_or_default(),
            draft: String::new(),
            toast: None,
            highlight: None,
            saved_username: username,
        }
    }

    pub fn apply_event(&mut self, event: SyncEvent, now: Instant) {
        match event {
            SyncEvent::ChannelsLoading => {
                self.channels.clear();
                self.channels_loading = true;
            }
            SyncEvent::ChannelsLoaded(channels) => {
                self.channels = channels;
                self.channels_loading = false;
            }
            SyncEvent::ChannelsUnavailable(reason) => {
                log::warn!("Channel list unavailable: {reason}");
                self.channels_loading = false;
            }
            SyncEvent::ChannelOpening(channel) => {
                self.open_channel = Some(channel);
                self.messages_loading = true;
            }
            SyncEvent::MessagesReplaced { channel, messages } => {
                if self.is_open(&channel) {
                    self.messages = messages;
                    self.messages_loading = false;
                }
            }
            SyncEvent::MessageEchoed { channel, message } => {
                if self.is_open(&channel) {
                    self.messages.push(message);
                }
            }
            SyncEvent::MessagesUnavailable(channel) => {
                if self.is_open(&channel) {
                    self.messages.clear();
                    self.messages_loading = false;
                }
            }
            SyncEvent::SendRejected(err) => self.warn(err, now),
        }
    }

    /// Kiểm tra trước khi gửi; nếu hợp lệ thì lấy nội dung và xoá ô soạn thảo.
    pub fn take_outgoing(&mut self, now: Instant) -> Option<(String, String)> {
        let body = self.draft.trim().to_string();
        match validate_outgoing(&self.username, self.open_channel.as_deref(), &body) {
            Ok(_) => {
                self.draft.clear();
                Some((self.username.trim().to_string(), body))
            }
            Err(err) => {
                self.warn(err, now);
                None
            }
        }
    }

    /// `true` khi người gửi khác tên đã lưu; tên mới được ghi nhận ngay.
    pub fn note_sender(&mut self, sender: &str) -> bool {
        if self.saved_username.as_deref() == Some(sender) {
            return false;
        }
        self.saved_username = Some(sender.to_string());
        true
    }

    pub fn warn(&mut self, err: ValidationError, now: Instant) {
        log::info!("{err}");
        self.toast = Some(Toast {
            text: format!("{err}!"),
            shown_at: now,
        });
        self.highlight = Some(Highlight {
            field: err.field(),
            since: now,
        });
    }

    pub fn visible_toast(&self, now: Instant) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|toast| toast.is_visible(now))
            .map(|toast| toast.text.as_str())
    }

    pub fn is_highlighted(&self, field: Field, now: Instant) -> bool {
        self.highlight.is_some_and(|highlight| {
            highlight.field == field && now.duration_since(highlight.since) < HIGHLIGHT_DURATION
        })
    }

    pub fn toggle_channel_list(&mut self) {
        self.show_channel_list = !self.show_channel_list;
    }

    fn is_open(&self, channel: &str) -> bool {
        self.open_channel.as_deref() == Some(channel)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn msg(sender: &str, body: &str) -> ChatMessage {
        ChatMessage {
            sender: sender.to_string(),
            body: body.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn missing_username_shows_toast_and_keeps_draft() {
        let now = Instant::now();
        let mut state = AppState::new(None);
        state.open_channel = Some("general".to_string());
        state.draft = "hello".to_string();

        assert_eq!(state.take_outgoing(now), None);
        assert_eq!(state.draft, "hello");
        assert_eq!(state.visible_toast(now), Some("No username set!"));
        assert!(state.is_highlighted(Field::Sender, now));
        assert!(!state.is_highlighted(Field::Body, now));
    }

    #[test]
    fn valid_send_clears_draft() {
        let now = Instant::now();
        let mut state = AppState::new(Some("bob".to_string()));
        state.open_channel = Some("general".to_string());
        state.draft = "  hi\nthere  ".to_string();

        assert_eq!(
            state.take_outgoing(now),
            Some(("bob".to_string(), "hi\nthere".to_string()))
        );
        assert!(state.draft.is_empty());
        assert!(state.toast.is_none());
    }

    #[test]
    fn only_a_changed_sender_needs_saving() {
        let mut state = AppState::new(Some("bob".to_string()));
        assert!(!state.note_sender("bob"));
        assert!(state.note_sender("alice"));
        assert!(!state.note_sender("alice"));

        let mut fresh = AppState::new(None);
        assert!(fresh.note_sender("bob"));
        assert!(!fresh.note_sender("bob"));
    }

    #[test]
    fn toast_and_highlight_expire() {
        let now = Instant::now();
        let mut state = AppState::new(Some("bob".to_string()));
        state.warn(ValidationError::MissingChannel, now);

        let text_len = state.toast.as_ref().unwrap().text.chars().count() as u64;
        let toast_end = now + Duration::from_millis(800 + 50 * text_len);

        assert!(state.is_highlighted(Field::Channel, now + Duration::from_millis(999)));
        assert!(!state.is_highlighted(Field::Channel, now + Duration::from_millis(1000)));
        assert!(state.visible_toast(toast_end - Duration::from_millis(1)).is_some());
        assert!(state.visible_toast(toast_end).is_none());
    }

    #[test]
    fn events_for_other_channels_are_ignored() {
        let now = Instant::now();
        let mut state = AppState::new(None);
        state.apply_event(SyncEvent::ChannelOpening("random".to_string()), now);
        assert!(state.messages_loading);

        state.apply_event(
            SyncEvent::MessagesReplaced {
                channel: "general".to_string(),
                messages: vec![msg("a", "old")],
            },
            now,
        );
        assert!(state.messages.is_empty());
        assert!(state.messages_loading);

        state.apply_event(
            SyncEvent::MessagesReplaced {
                channel: "random".to_string(),
                messages: vec![msg("b", "new")],
            },
            now,
        );
        state.apply_event(
            SyncEvent::MessageEchoed {
                channel: "random".to_string(),
                message: msg("me", "yo"),
            },
            now,
        );
        assert!(!state.messages_loading);
        let bodies: Vec<_> = state.messages.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["new", "yo"]);
    }

    #[test]
    fn channel_list_loading_cycle() {
        let now = Instant::now();
        let mut state = AppState::new(None);
        state.channels = vec!["stale".to_string()];

        state.apply_event(SyncEvent::ChannelsLoading, now);
        assert!(state.channels.is_empty());
        assert!(state.channels_loading);

        state.apply_event(
            SyncEvent::ChannelsLoaded(vec!["general".to_string(), "random".to_string()]),
            now,
        );
        assert!(!state.channels_loading);
        assert_eq!(state.channels.len(), 2);
    }
}

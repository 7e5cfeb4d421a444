use crate::error::ValidationError;

use super::types::ChatMessage;

/// Sự kiện từ tầng đồng bộ gửi lên UI.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    ChannelsLoading,
    ChannelsLoaded(Vec<String>),
    ChannelsUnavailable(String),
    /// Kênh vừa được mở, đang chờ lần tải đầu tiên.
    ChannelOpening(String),
    /// Thay toàn bộ danh sách tin nhắn đang hiển thị.
    MessagesReplaced {
        channel: String,
        messages: Vec<ChatMessage>,
    },
    /// Tin nhắn vừa gửi được thêm cục bộ (optimistic echo).
    MessageEchoed {
        channel: String,
        message: ChatMessage,
    },
    /// Lần tải đầu tiên của kênh thất bại; UI chỉ tắt trạng thái loading.
    MessagesUnavailable(String),
    SendRejected(ValidationError),
}

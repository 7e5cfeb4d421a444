use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::network::codec::decode_body;

/// Domain model đại diện một tin nhắn chat đã sẵn sàng để hiển thị.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    /// Nội dung đã giải mã (chứa `\n` thật).
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Dòng hiển thị dạng `[YYYY-MM-DD] sender: body`.
    pub fn display_line(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp.format("%Y-%m-%d"),
            self.sender,
            self.body
        )
    }
}

/// Tin nhắn đúng như backend trả về.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub sender: String,
    pub message: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl From<WireMessage> for ChatMessage {
    fn from(wire: WireMessage) -> Self {
        Self {
            sender: wire.sender,
            body: decode_body(&wire.message),
            timestamp: wire.timestamp,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatsResponse {
    pub chats: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

/// Backend có thể trả timestamp dạng chuỗi RFC 3339 hoặc số mili-giây.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {ms}"))),
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|date| date.with_timezone(&Utc))
            .map_err(|err| D::Error::custom(format!("invalid timestamp `{text}`: {err}"))),
    }
}

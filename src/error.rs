use std::time::Duration;

use thiserror::Error;

/// Trường nhập liệu mà UI cần làm nổi bật khi gửi tin thất bại.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sender,
    Channel,
    Body,
}

/// Lỗi kiểm tra đầu vào khi gửi tin nhắn (người dùng tự sửa được).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No username set")]
    MissingSender,
    #[error("No channel selected to write in")]
    MissingChannel,
    #[error("No message written")]
    MissingBody,
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingSender => Field::Sender,
            ValidationError::MissingChannel => Field::Channel,
            ValidationError::MissingBody => Field::Body,
        }
    }
}

/// Lỗi khi gọi backend. Chỉ được ghi log, không bao giờ dừng vòng lặp đồng bộ.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

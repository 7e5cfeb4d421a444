/// Lệnh UI gửi xuống tầng đồng bộ.
#[derive(Debug, Clone)]
pub enum SyncCommand {
    /// Mở một kênh và tải ngay các tin nhắn mới nhất.
    OpenChannel(String),
    /// Gửi tin nhắn vào kênh đang mở (kèm local echo).
    SendMessage { sender: String, body: String },
    /// Tải lại danh sách kênh.
    ReloadChannels,
}

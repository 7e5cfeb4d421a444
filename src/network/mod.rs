pub mod api;
pub mod client;
pub mod codec;

pub use api::{ChatApi, HttpChatApi};
pub use client::{SyncClient, SyncSettings};

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;

use crate::common::ChatMessage;
use crate::common::types::{ChatsResponse, MessagesResponse};
use crate::error::TransportError;

/// Hợp đồng cố định của backend (`GET ?action=...`).
pub trait ChatApi: Send + Sync {
    fn fetch_channels(&self) -> BoxFuture<'static, Result<Vec<String>, TransportError>>;

    /// Tối đa `count` tin nhắn mới nhất, cũ → mới.
    fn fetch_messages(
        &self,
        channel: &str,
        count: usize,
    ) -> BoxFuture<'static, Result<Vec<ChatMessage>, TransportError>>;

    /// `encoded_body` đã qua `encode_body`; phản hồi chỉ dùng để ghi log.
    fn send_message(
        &self,
        channel: &str,
        sender: &str,
        encoded_body: &str,
    ) -> BoxFuture<'static, Result<serde_json::Value, TransportError>>;
}

#[derive(Clone)]
pub struct HttpChatApi {
    client: reqwest::Client,
    api_url: String,
}

impl HttpChatApi {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    fn get<T>(
        &self,
        query: Vec<(&'static str, String)>,
    ) -> BoxFuture<'static, Result<T, TransportError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let request = self.client.get(&self.api_url).query(&query);
        async move {
            let text = request.send().await?.error_for_status()?.text().await?;
            Ok::<T, TransportError>(serde_json::from_str(&text)?)
        }
        .boxed()
    }
}

impl ChatApi for HttpChatApi {
    fn fetch_channels(&self) -> BoxFuture<'static, Result<Vec<String>, TransportError>> {
        let response = self.get::<ChatsResponse>(vec![("action", "getChats".to_string())]);
        async move { Ok::<_, TransportError>(response.await?.chats) }.boxed()
    }

    fn fetch_messages(
        &self,
        channel: &str,
        count: usize,
    ) -> BoxFuture<'static, Result<Vec<ChatMessage>, TransportError>> {
        let response = self.get::<MessagesResponse>(vec![
            ("action", "getMessages".to_string()),
            ("chat", channel.to_string()),
            ("number", count.to_string()),
        ]);
        async move {
            let messages = response.await?.messages;
            Ok::<_, TransportError>(messages.into_iter().map(ChatMessage::from).collect())
        }
        .boxed()
    }

    fn send_message(
        &self,
        channel: &str,
        sender: &str,
        encoded_body: &str,
    ) -> BoxFuture<'static, Result<serde_json::Value, TransportError>> {
        self.get::<serde_json::Value>(vec![
            ("action", "sendMessage".to_string()),
            ("chat", channel.to_string()),
            ("sender", sender.to_string()),
            ("message", encoded_body.to_string()),
        ])
    }
}

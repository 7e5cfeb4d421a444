//! Chế độ không giao diện: in tin nhắn ra stdout, đọc tin cần gửi từ stdin.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::common::{SyncCommand, SyncEvent};
use crate::error::TransportError;
use crate::network::{ChatApi, SyncClient, SyncSettings};

pub async fn list_channels(api: &dyn ChatApi) -> Result<(), TransportError> {
    for channel in api.fetch_channels().await? {
        println!("{channel}");
    }
    Ok(())
}

pub async fn watch(
    api: Arc<dyn ChatApi>,
    settings: SyncSettings,
    channel: String,
    sender: Option<String>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let worker = tokio::spawn(SyncClient::new(api, event_tx, cmd_rx, settings).run());

    if cmd_tx.send(SyncCommand::OpenChannel(channel)).await.is_err() {
        log::error!("Sync loop exited before the channel could be opened");
        return;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = sender.is_some();

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(event) => {
                        if let Some(text) = format_event(&event) {
                            println!("{text}");
                        }
                    }
                    None => break,
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if let Some(sender) = &sender {
                            let command = SyncCommand::SendMessage {
                                sender: sender.clone(),
                                body: unescape_newlines(&line),
                            };
                            if let Err(err) = cmd_tx.send(command).await {
                                log::warn!("Failed to queue message: {err}");
                            }
                        }
                    }
                    Ok(None) => stdin_open = false,
                    Err(err) => {
                        log::warn!("Failed to read stdin: {err}");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    drop(cmd_tx);
    if let Err(err) = worker.await {
        log::error!("Sync loop panicked: {err}");
    }
}

fn format_event(event: &SyncEvent) -> Option<String> {
    match event {
        SyncEvent::MessagesReplaced { channel, messages } => {
            let mut text = format!("== {channel} ==");
            for message in messages {
                text.push('\n');
                text.push_str(&message.display_line());
            }
            Some(text)
        }
        SyncEvent::MessageEchoed { message, .. } => Some(message.display_line()),
        SyncEvent::SendRejected(err) => Some(format!("! {err}")),
        SyncEvent::MessagesUnavailable(channel) => {
            Some(format!("! could not load messages for {channel}"))
        }
        _ => None,
    }
}

/// Một dòng stdin chỉ có một dòng; `\n` viết tay được đổi thành xuống dòng thật.
fn unescape_newlines(line: &str) -> String {
    line.replace("\\n", "\n")
}

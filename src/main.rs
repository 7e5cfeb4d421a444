use std::error::Error;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use poll_chat::config::{self, AppConfig};
use poll_chat::network::{ChatApi, HttpChatApi, SyncClient, SyncSettings};
use poll_chat::terminal;
use poll_chat::ui::ChatApp;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(
    name = "poll_chat",
    version,
    about = "Chat client that polls an HTTP backend for channels and messages"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Backend endpoint (overrides config file and CHAT_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
    /// Seconds between refreshes of the open channel
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
enum Mode {
    /// Print the channel list and exit
    Channels,
    /// Follow a channel in the terminal (no UI)
    Watch {
        channel: String,
        /// Send each stdin line as a message from this user
        #[arg(long)]
        sender: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    app_config.apply_env();
    if let Some(api_url) = cli.api_url.clone() {
        app_config.api_url = api_url;
    }
    if let Some(interval) = cli.interval {
        app_config.poll_interval_secs = interval.max(1);
    }

    let settings = SyncSettings::from(&app_config);
    let api: Arc<dyn ChatApi> = Arc::new(HttpChatApi::new(app_config.api_url.clone()));

    match cli.mode {
        Some(Mode::Channels) => terminal::list_channels(api.as_ref()).await?,
        Some(Mode::Watch { channel, sender }) => {
            terminal::watch(api, settings, channel, sender).await
        }
        None => run_full_client(api, settings, app_config, cli.config).await?,
    }

    Ok(())
}

async fn run_full_client(
    api: Arc<dyn ChatApi>,
    settings: SyncSettings,
    app_config: AppConfig,
    config_path: String,
) -> Result<(), eframe::Error> {
    // 1. Tạo các kênh giao tiếp (Channels)
    // UI -> Sync
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Sync -> UI
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    // 2. Khởi chạy vòng lặp đồng bộ (Chạy ngầm)
    tokio::spawn(SyncClient::new(api, event_tx, cmd_rx, settings).run());

    // 3. Khởi chạy UI (Chạy trên Main Thread)
    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let username = app_config.username.clone();

    eframe::run_native(
        "Poll Chat",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .ok_or("ChatApp should only be initialized once")?;

            log::info!("Client started against {}", app_config.api_url);

            Ok(Box::new(ChatApp::new(
                cc,
                cmd_tx.clone(),
                event_receiver,
                username.clone(),
                config_path.clone(),
            )))
        }),
    )
}

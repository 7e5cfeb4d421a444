pub mod common;
pub mod config;
pub mod error;
pub mod network;
pub mod sync;
pub mod terminal;
pub mod ui;

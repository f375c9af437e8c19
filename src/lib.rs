pub mod common;
pub mod deps;
pub mod dispatcher;
pub mod error;
pub mod gui;
pub mod keys;
pub mod launcher;
pub mod layout;
pub mod logging;
pub mod monitor;
pub mod session;
pub mod settings;
pub mod shortcut_config;
pub mod window_manager;

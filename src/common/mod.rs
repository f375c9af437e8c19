pub mod command;
pub mod config_files;

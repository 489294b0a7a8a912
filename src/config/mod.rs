pub mod app_config;
pub mod settings;
pub mod settings_io;

mod config;
mod engine;
mod logging;
mod model;
mod storage;
mod ui;

use std::io;
use std::process;

use anyhow::Context;

use crate::config::app_config::AppConfig;
use crate::config::settings_io::{load_settings, settings_path};
use crate::engine::engine::SupportEngine;
use crate::engine::llm_client::OpenAiClient;
use crate::engine::pipeline::PipelineRunner;
use crate::model::prompt_spec::{default_stages, Pipeline};
use crate::storage::request_store::RequestStore;
use crate::ui::app::Shell;

fn main() {
    if let Err(e) = run() {
        eprintln!("\n❌ An error occurred: {:#}", e);
        eprintln!("Please check your configuration and try again.");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let path = settings_path();
    let settings = load_settings(&path)?;
    let config = AppConfig::from_env(settings)?;
    log::info!(
        "Using model {} at {} (settings: {})",
        config.settings.model,
        config.settings.base_url,
        path.display()
    );

    if let Err(e) = ctrlc::set_handler(|| {
        println!("\n\n👋 Program terminated by user. Goodbye!");
        process::exit(0);
    }) {
        log::warn!("Could not install Ctrl-C handler: {}", e);
    }

    let client = OpenAiClient::new(&config).context("failed to build HTTP client")?;
    let store = RequestStore::new(config.output_dir());
    if let Err(e) = store.init() {
        log::warn!("{}", e);
    }

    let pipeline = Pipeline::new(default_stages())?;
    let engine = SupportEngine::new(PipelineRunner::new(client, pipeline), store);

    let stdin = io::stdin();
    Shell::new(&engine, stdin.lock(), io::stdout())
        .run()
        .context("terminal I/O failed")?;

    Ok(())
}

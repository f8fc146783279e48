pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{NewsProvider, build_dashboard};
use crate::providers::{frankfurter::FrankfurterProvider, naver::NaverNewsProvider};
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Rates,
    News,
    Brief,
    Json,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxbrief starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let frankfurter = config.providers.frankfurter.clone().unwrap_or_default();
    let rate_provider = FrankfurterProvider::new(&frankfurter.base_url);
    let news_provider = config.providers.naver.as_ref().map(NaverNewsProvider::new);

    let spinner = cli::ui::new_spinner("Fetching rates and news...");
    let dashboard = build_dashboard(
        &config,
        &rate_provider,
        news_provider
            .as_ref()
            .map(|p| p as &(dyn NewsProvider + Send + Sync)),
        chrono::Local::now().date_naive(),
    )
    .await;
    spinner.finish_and_clear();
    let dashboard = dashboard?;

    match command {
        AppCommand::Rates => println!("{}", cli::rates::render(&dashboard)),
        AppCommand::News => println!("{}", cli::news::render(&dashboard.news)),
        AppCommand::Brief => println!("{}", cli::brief::render(&dashboard)),
        AppCommand::Json => println!("{}", serde_json::to_string_pretty(&dashboard)?),
    }
    Ok(())
}

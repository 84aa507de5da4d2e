mod config;
mod page_view;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hotelier_dom::Document;

const SAMPLE_PAGE: &str = include_str!("../demos/front_desk.json");

#[derive(Parser)]
#[command(name = "hotelier")]
#[command(about = "Browse a Hotelier dashboard page and search it as you type")]
#[command(version)]
struct Args {
    /// Page to open (JSON). Falls back to `default_page`, then the built-in front desk page
    page: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let app_config = config::AppConfig::load_or_create();

    let document = match args.page.or_else(|| app_config.default_page.clone()) {
        Some(path) => Document::load(&path)
            .with_context(|| format!("failed to open page {}", path.display()))?,
        None => Document::from_json(SAMPLE_PAGE).context("built-in page is invalid")?,
    };
    log::info!("opened {:?}", document.title().unwrap_or_default());

    page_view::run(document, &app_config)
}

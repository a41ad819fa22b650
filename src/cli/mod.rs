pub mod commands;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "category-scraper")]
#[command(about = "Collect article metadata from a news category listing", long_about = None)]
pub struct Cli {
    /// URL of the category page
    pub url: String,

    /// Number of articles to collect (default: from config, 200)
    #[arg(short = 'n', long)]
    pub max_articles: Option<usize>,

    /// Path to a config file (default: ~/.config/category-scraper/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

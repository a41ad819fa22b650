use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::app::Result;
use crate::cli::Cli;
use crate::config::Config;
use crate::domain::Collection;
use crate::extractor::collect_category;

/// Load config, run one collection and write the result as JSON
pub async fn scrape(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.headed {
        config.scraper.headless = false;
    }

    let articles = collect_category(&cli.url, cli.max_articles, config.scraper).await?;
    let json = render_json(&articles, !cli.compact)?;

    match cli.output {
        Some(ref path) => {
            write_output(path, &json)?;
            info!(path = %path.display(), count = articles.len(), "Wrote articles");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

pub fn render_json(articles: &Collection, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(articles)?
    } else {
        serde_json::to_string(articles)?
    };
    Ok(json)
}

fn write_output(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{}\n", json))?;
    Ok(())
}

mod report;
mod suites;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vigil_common::config::VigilConfig;
use vigil_engine::config::ConfigLoader;

#[derive(Parser)]
#[command(name = "vigil", version, about = "Storefront regression suites over WebDriver")]
struct Args {
    #[command(subcommand)]
    suite: Suite,

    /// Configuration file (defaults to ./vigil.yaml, then ~/.vigil/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// WebDriver endpoint, e.g. http://localhost:9515
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Storefront root URL
    #[arg(long)]
    base_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Suite {
    /// Register a fresh customer and check the form's refusals
    Register,
    /// Register, log in, sort, search, fill the cart and verify it
    Shop,
}

impl Args {
    fn apply_overrides(&self, config: &mut VigilConfig) {
        if let Some(url) = &self.webdriver_url {
            config.webdriver.url = url.clone();
        }
        if let Some(url) = &self.base_url {
            config.storefront.base_url = url.clone();
        }
        if self.headed {
            config.webdriver.headless = false;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr, the report to stdout
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ConfigLoader::load(args.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    ConfigLoader::validate(&config).context("Invalid configuration")?;

    let report = match args.suite {
        Suite::Register => suites::register(&config).await,
        Suite::Shop => suites::shop(&config).await,
    };

    println!("{}", report);
    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}

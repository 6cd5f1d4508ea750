use anyhow::{Context, Result};
use clap::Parser;
use mediagrab::{
    config::Config,
    media::{HandlerConfig, MediaInfo, MediaOptions, MediaRegistry, TracingDiagnostics},
    utils::{format_count, format_number},
};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Media URL to resolve
    url: String,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Download the media files
    #[arg(short, long)]
    download: bool,

    /// Directory for downloaded files, overrides the config file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("MEDIAGRAB_CONFIG") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/mediagrab/config.toml", xdg_config_home);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/mediagrab/config.toml", home.display());
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

fn print_summary(media: &MediaInfo) {
    let metadata = &media.metadata;
    println!("{}", metadata.title);
    println!("  platform: {}", metadata.platform);
    println!("  author:   {}", metadata.author);
    println!("  views:    {}", format_count(metadata.views));
    println!("  likes:    {}", format_number(metadata.likes));

    for (index, entry) in media.urls.iter().enumerate() {
        match &entry.local_path {
            Some(path) => println!(
                "  [{}] {} ({}) -> {}",
                index + 1,
                entry.url,
                entry.format,
                path.display()
            ),
            None => println!("  [{}] {} ({})", index + 1, entry.url, entry.format),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match get_config_path(&args) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Config::default(),
    };
    config.apply_env_overrides();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if config.get_logging_format() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    info!("Starting mediagrab...");

    let registry = MediaRegistry::from_settings(&config.imgur, Arc::new(TracingDiagnostics))
        .context("Failed to initialize media registry")?;

    let handler_config = HandlerConfig::new(
        args.output_dir
            .clone()
            .unwrap_or_else(|| config.download_dir()),
    );
    let options = MediaOptions {
        download_media: args.download,
    };

    let media = registry
        .get_media_info(&args.url, &options, &handler_config)
        .await
        .with_context(|| format!("Failed to resolve {}", args.url))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&media).context("Failed to serialize media info")?
        );
    } else {
        print_summary(&media);
    }

    Ok(())
}

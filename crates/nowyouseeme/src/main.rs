//! Command-line client for the visualization gallery.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::{debug, info};
use nowyouseeme_client::{HttpClient, VisualizationApi};
use nowyouseeme_config::{ClientConfig, LayeredConfigOptions};
use nowyouseeme_core::{Card, Gallery, GalleryState, RefreshFlag, UploadForm, load, submit};
use nowyouseeme_protocol::decode_payload;
use nowyouseeme_tui::TuiConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Command-line options.
#[derive(Parser)]
#[command(name = "nowyouseeme", version, about)]
struct Cli {
    /// Extra nowyouseeme.json5 layer applied over the user and cwd configs
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Service base URL, e.g. http://localhost:8080/api/v1
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Defaults to `gallery`
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print every visualization, newest first
    List,
    /// Show one visualization
    Get {
        id: String,
        /// Write the decoded image bytes to this path
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Publish an image as a new visualization
    Upload {
        /// Agent display name
        #[arg(long)]
        agent: String,
        #[arg(long)]
        description: Option<String>,
        /// Image file (PNG expected)
        #[arg(long)]
        file: PathBuf,
        /// Tag to attach; repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        mood: Option<String>,
    },
    /// Check that the service is reachable
    Health,
    /// Browse the gallery in the terminal UI
    Gallery,
}

/// Entry point for the gallery CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nowyouseeme::init_logging();

    let cli = Cli::parse();
    info!(
        "starting cli (config_set={}, base_url_set={})",
        cli.config.is_some(),
        cli.base_url.is_some()
    );
    let config = load_config(&cli)?;
    let client = HttpClient::from_config(&config.api).context("failed to build http client")?;

    match cli.command.unwrap_or(Command::Gallery) {
        Command::List => list(&client).await,
        Command::Get { id, save } => get(&client, &id, save).await,
        Command::Upload {
            agent,
            description,
            file,
            tags,
            mood,
        } => {
            let mut form = UploadForm::new();
            form.agent_name = agent;
            form.description = description.unwrap_or_default();
            form.file = Some(file);
            form.tags = tags;
            form.current_mood = mood;
            upload(&client, form).await
        }
        Command::Health => {
            let status = client.health().await.context("health check failed")?;
            match status.time {
                Some(time) => println!("{} ({})", status.status, time.display()),
                None => println!("{}", status.status),
            }
            Ok(())
        }
        Command::Gallery => {
            let tui_config = TuiConfig {
                base_url: config.api.base_url.clone(),
                tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
            };
            nowyouseeme_tui::run(Arc::new(client), tui_config).await
        }
    }
}

/// Resolve the layered config, then apply `--base-url`.
fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let cwd = std::env::current_dir().context("cwd")?;
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = cli.config.as_ref() {
        options = options.with_runtime_path(path);
    }
    let layered =
        ClientConfig::load_layered_with_options(options).context("failed to load config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());

    let mut config = layered.config;
    if let Some(base_url) = cli.base_url.as_deref() {
        config.api.base_url = base_url.trim().trim_end_matches('/').to_string();
        config.validate().context("invalid --base-url")?;
    }
    Ok(config)
}

async fn list(api: &dyn VisualizationApi) -> anyhow::Result<()> {
    let mut gallery = Gallery::new();
    load(api, &mut gallery).await;
    match gallery.state() {
        GalleryState::Error(message) => bail!("failed to load gallery: {message}"),
        GalleryState::Empty => println!("No visualizations yet."),
        _ => {
            for card in gallery.cards() {
                println!("{card}");
            }
        }
    }
    Ok(())
}

async fn get(api: &dyn VisualizationApi, id: &str, save: Option<PathBuf>) -> anyhow::Result<()> {
    let visualization = api.get(id).await?;
    print!("{}", Card::from(&visualization));
    if let Some(path) = save {
        let bytes = decode_payload(&visualization.image_data)
            .context("stored image payload is not valid base64")?;
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("saved {} bytes to {}", bytes.len(), path.display());
    }
    Ok(())
}

async fn upload(api: &dyn VisualizationApi, mut form: UploadForm) -> anyhow::Result<()> {
    let refresh = RefreshFlag::new();
    let created = submit(&mut form, api, &refresh).await?;
    println!("uploaded {} ({})", created.id, created.created_at.display());

    if refresh.take() {
        let mut gallery = Gallery::new();
        load(api, &mut gallery).await;
        match gallery.state() {
            GalleryState::Error(message) => println!("gallery refresh failed: {message}"),
            _ => println!(
                "gallery now holds {} visualizations",
                gallery.visualizations().len()
            ),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn upload_collects_repeated_tags() {
        let cli = Cli::try_parse_from([
            "nowyouseeme",
            "--base-url",
            "http://gallery:8080/api/v1",
            "upload",
            "--agent",
            "Bot1",
            "--file",
            "portrait.png",
            "--tag",
            "calm",
            "--tag",
            "spiral",
        ])
        .expect("parse");
        assert_eq!(cli.base_url.as_deref(), Some("http://gallery:8080/api/v1"));
        let Some(Command::Upload { agent, tags, .. }) = cli.command else {
            panic!("expected upload");
        };
        assert_eq!(agent, "Bot1");
        assert_eq!(tags, vec!["calm".to_string(), "spiral".to_string()]);
    }

    #[test]
    fn no_subcommand_means_gallery() {
        let cli = Cli::try_parse_from(["nowyouseeme"]).expect("parse");
        assert!(cli.command.is_none());
    }
}

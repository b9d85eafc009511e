//! Administrative CLI for agora capability tables.

mod import;

use agora_core::config::AppConfig;
use agora_service::{Feature, FeatureKind, Features};
use agora_store::CapabilityStore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Administrative CLI for agora capability tables")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "AGORA_CONFIG",
        default_value = "config/agora.toml"
    )]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create capability tables for every configured feature
    Migrate,
    /// Replace stored recommendations from a JSON-lines file
    ImportRecs {
        #[arg(long, value_enum)]
        feature: FeatureArg,
        /// File with one `{"user_id", "recommendations"}` object per line
        #[arg(long)]
        file: PathBuf,
    },
    /// Print a recommendation page for a user
    Feed {
        #[arg(long, value_enum)]
        feature: FeatureArg,
        #[arg(long)]
        user: String,
        /// Page size (defaults to feed.default_page_size)
        #[arg(long)]
        count: Option<u32>,
    },
    /// Print like counts for a target or the likes of a user
    Likes {
        #[arg(long, value_enum)]
        feature: FeatureArg,
        #[arg(long, conflicts_with = "user", required_unless_present = "user")]
        target: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FeatureArg {
    Posts,
    Comments,
    Profiles,
}

impl From<FeatureArg> for FeatureKind {
    fn from(arg: FeatureArg) -> Self {
        match arg {
            FeatureArg::Posts => FeatureKind::Posts,
            FeatureArg::Comments => FeatureKind::Comments,
            FeatureArg::Profiles => FeatureKind::Profiles,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
            Ok(())
        }
        Commands::Migrate => {
            let store = connect(&config).await?;
            attach(store.as_ref(), &config).await?;
            tracing::info!(
                backend = store.backend_name(),
                posts = %config.targets.posts,
                comments = %config.targets.comments,
                profiles = %config.targets.profiles,
                "Capability tables ready"
            );
            Ok(())
        }
        Commands::ImportRecs { feature, file } => {
            let store = connect(&config).await?;
            let features = attach(store.as_ref(), &config).await?;
            import_recs(features.get(feature.into()), &file).await
        }
        Commands::Feed {
            feature,
            user,
            count,
        } => {
            let store = connect(&config).await?;
            let features = attach(store.as_ref(), &config).await?;
            let count = count.unwrap_or(config.feed.default_page_size);
            let page = features
                .get(feature.into())
                .recommendations
                .recommend(&user, count)
                .await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "user_id": user, "items": page }))?
            );
            Ok(())
        }
        Commands::Likes {
            feature,
            target,
            user,
        } => {
            let store = connect(&config).await?;
            let features = attach(store.as_ref(), &config).await?;
            let likes = &features.get(feature.into()).likes;
            let output = match (target, user) {
                (Some(target), _) => {
                    let count = likes.likes_count(&target).await?;
                    json!({ "target_id": target, "likes": count })
                }
                (None, Some(user)) => {
                    let liked = likes.user_likes(&user).await?;
                    json!({ "user_id": user, "count": liked.len(), "liked": liked })
                }
                (None, None) => anyhow::bail!("either --target or --user is required"),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

/// Load configuration from the optional file, then `AGORA_` environment overrides.
fn load_config(path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();
    if Path::new(path).exists() {
        tracing::info!(config_path = %path, "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file found at {}", path);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("AGORA_").split("__"))
        .extract()
        .context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn connect(config: &AppConfig) -> Result<Arc<dyn CapabilityStore>> {
    let store = agora_store::from_config(&config.database)
        .await
        .context("failed to initialize store")?;
    store
        .health_check()
        .await
        .context("store health check failed")?;
    tracing::info!(backend = store.backend_name(), "Store connected");
    Ok(store)
}

async fn attach(store: &dyn CapabilityStore, config: &AppConfig) -> Result<Features> {
    Features::attach(store, &config.targets)
        .await
        .context("failed to attach features")
}

async fn import_recs(feature: &Feature, file: &Path) -> Result<()> {
    let lines = import::read_recs(file).await?;
    let mut written = 0usize;
    for line in &lines {
        feature
            .recommendations
            .set_recs(&line.user_id, &line.recommendations)
            .await
            .with_context(|| format!("failed to store recommendations for {}", line.user_id))?;
        written += line.recommendations.len();
    }
    tracing::info!(
        table = %feature.target(),
        users = lines.len(),
        recommendations = written,
        "Recommendations imported"
    );
    Ok(())
}

use clap::{CommandFactory, Parser, Subcommand};
use postpress_core::{PostStore, PostpressConfig};
use tracing::warn;

mod pipeline;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("POSTPRESS_GIT_SHA"),
    ")"
);

#[derive(Parser)]
#[command(name = "postpress", version = VERSION, about = "LinkedIn visual post automation")]
struct Cli {
    /// Path to the config file (default: ./postpress.toml).
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate backgrounds and final images for every ready post
    Generate,
    /// Start the reminder scheduler (blocks until ctrl-c)
    Schedule,
    /// Alias of generate
    Test,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "postpress_cli=info,postpress_core=info,postpress_background=info,\
                 postpress_render=info,postpress_scheduler=info"
                    .into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // load config: explicit path > POSTPRESS_CONFIG env > ./postpress.toml
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("POSTPRESS_CONFIG").ok());
    let config = PostpressConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        PostpressConfig::default()
    });

    match cli.command {
        Some(Command::Generate) | Some(Command::Test) => pipeline::generate(&config).await?,
        Some(Command::Schedule) => run_scheduler(config).await?,
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

async fn run_scheduler(config: PostpressConfig) -> anyhow::Result<()> {
    let store = PostStore::new(&config.content.store_path);
    let engine = postpress_scheduler::SchedulerEngine::new(&config.schedule.expression, store)?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    engine.run(shutdown_rx).await;
    Ok(())
}

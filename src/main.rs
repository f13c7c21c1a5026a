// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use convo::{
    AppState,
    api::create_router,
    config::Config,
    db,
    llm::{LlmProvider, OpenAiCompatProvider},
    summarize::TitleSummarizer,
};

#[derive(Parser)]
#[command(name = "convo")]
#[command(about = "Conversation access and title summarization service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the title the configured summarizer produces for some text
    Summarize {
        /// Source text, typically a conversation's first message
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Apply pending database migrations
    Migrate,
}

async fn run_server(mut config: Config, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.port = port;
    }

    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool, Path::new(&config.migrations_dir)).await?;

    let app = create_router(AppState::new(pool));

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_summarize(config: &Config, text: Vec<String>) -> Result<()> {
    let provider = if config.summarization.enabled {
        let provider: Arc<dyn LlmProvider> =
            Arc::new(OpenAiCompatProvider::from_config(&config.summarization)?);
        Some(provider)
    } else {
        None
    };
    let summarizer = TitleSummarizer::from_config(&config.summarization, provider);

    match summarizer.summarize(&text.join(" ")).await {
        Some(title) => println!("{}", title),
        None => eprintln!("No title produced (summarization backend failed)"),
    }
    Ok(())
}

async fn run_migrate(config: &Config) -> Result<()> {
    let pool = db::create_pool(config).await?;
    db::run_migrations(&pool, Path::new(&config.migrations_dir)).await?;
    let version = db::get_schema_version(&pool).await?;
    println!("Schema version: {}", version);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Emits the warnings collected while loading, now that a subscriber exists
    config.log_summary();

    match cli.command {
        None => run_server(config, None).await?,
        Some(Commands::Serve { port }) => run_server(config, port).await?,
        Some(Commands::Summarize { text }) => run_summarize(&config, text).await?,
        Some(Commands::Migrate) => run_migrate(&config).await?,
    }

    Ok(())
}

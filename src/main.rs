use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdeck::{api, config::Config, db};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Project and task tracking API server")]
struct Cli {
    /// SQLite database file (overrides TASKDECK_DATABASE)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind (overrides TASKDECK_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port for HTTP API (overrides TASKDECK_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Apply pending database migrations and exit
    Migrate,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "taskdeck=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(config: &Config) -> anyhow::Result<db::Database> {
    let path = match &config.database {
        Some(path) => path.clone(),
        None => db::Database::default_path()?,
    };
    tracing::info!("Using database at {}", path.display());

    db::Database::open(path)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let db = open_database(&config)?;
    db.migrate()?;

    let app = api::create_router_with_config(db, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Taskdeck server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env()?;
    if let Some(database) = cli.database {
        config.database = Some(database);
    }

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await?;
        }
        Some(Commands::Migrate) => {
            let db = open_database(&config)?;
            let pending = db.pending_migrations()?;
            db.migrate()?;
            if pending.is_empty() {
                tracing::info!("Database is up to date");
            } else {
                tracing::info!("Applied migrations: {}", pending.join(", "));
            }
        }
        None => serve(config).await?,
    }

    Ok(())
}

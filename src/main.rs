use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use abe_proxy::config::{self, StoreBackend};
use abe_proxy::server::{self, AppState};
use abe_proxy::{auth, lambda, storage, ListingProxy};

#[derive(Parser)]
#[command(name = "abe-proxy")]
#[command(about = "ABE document-listing proxy (Lambda handler and local server)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run under the AWS Lambda runtime")]
    Lambda,

    #[command(about = "Run the local development server")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides ABE_PROXY_PORT/PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Store backend: s3 or memory (overrides STORE_BACKEND)")]
        store: Option<StoreBackend>,
    },

    #[command(about = "Mint a development JWT for the local server")]
    Token {
        #[arg(long, default_value = "developer")]
        subject: String,

        #[arg(long = "role", help = "Role name; repeat for several roles")]
        roles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up BUCKET, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| {
        if std::env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
            Commands::Lambda
        } else {
            Commands::Serve { port: None, store: None }
        }
    });

    init_tracing(matches!(command, Commands::Lambda));

    let config = config::config();
    tracing::info!("Starting ABE listing proxy in {:?} mode", config.environment);

    match command {
        Commands::Lambda => {
            let store = storage::build_store(&config.storage).await;
            let proxy = ListingProxy::from_config(store, config);
            lambda::run(proxy)
                .await
                .map_err(|e| anyhow::anyhow!("lambda runtime failed: {}", e))
        }
        Commands::Serve { port, store } => {
            let mut storage_config = config.storage.clone();
            if let Some(backend) = store {
                storage_config.backend = backend;
            }

            if config.security.jwt_secret.is_empty() {
                anyhow::bail!("SECURITY_JWT_SECRET must be set to run the local server");
            }
            if !abe_proxy::is_development!() {
                tracing::warn!("Local server running outside development; API Gateway is the intended front door");
            }

            let store = storage::build_store(&storage_config).await;
            let proxy = ListingProxy::from_config(store, config);
            let state = AppState::new(proxy, &config.security.jwt_secret)
                .with_request_logging(config.server.enable_request_logging);
            let app = server::app(state);

            let bind_addr = format!("0.0.0.0:{}", port.unwrap_or(config.server.port));
            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("failed to bind {}", bind_addr))?;

            tracing::info!("ABE listing proxy listening on http://{}", bind_addr);
            axum::serve(listener, app).await.context("server")
        }
        Commands::Token { subject, roles } => {
            let token = auth::generate_jwt(
                &subject,
                &roles,
                &config.auth.role_claim,
                &config.security.jwt_secret,
                config.security.jwt_expiry_hours,
            )?;
            println!("{}", token);
            Ok(())
        }
    }
}

/// JSON lines under Lambda (CloudWatch), human-readable otherwise
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_ansi(false)
            .without_time()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

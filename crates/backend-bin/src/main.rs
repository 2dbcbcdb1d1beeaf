// crates/backend-bin/src/main.rs
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gym_backend_lib::{
    auth::{generate_password, hash_password_with_cost},
    config::{Settings, DEFAULT_CONFIG_PATH},
    router,
    storage::{FlatFileUserStore, UserRecord, UserStore},
    AppState,
};
use tokio::net::TcpListener;
use tokio::time::{interval, Duration};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Gym backend authentication server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the bind address from the config
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Create this user with a generated password if it does not exist
    #[arg(long)]
    bootstrap_user: Option<String>,

    /// Authorities granted to the bootstrap user
    #[arg(long, value_delimiter = ',', default_value = "ADMIN")]
    authorities: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load_from(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(bind) = cli.bind {
        settings.bind_addr = bind;
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    let state = Arc::new(AppState::new_default(&settings)?);

    if let Some(username) = &cli.bootstrap_user {
        let created =
            bootstrap_user(&state.store, username, &cli.authorities, settings.password.hash_log_n)
                .await?;
        // stdout only, never the log stream
        if let Some(password) = created {
            println!("bootstrap password for {username}: {password}");
        }
    }

    // Background sweep of elapsed lockouts
    let lockout = state.lockout.clone();
    let lockout_every = Duration::from_secs(settings.lockout.cleanup_interval_secs);
    tokio::spawn(async move {
        let mut interval = interval(lockout_every);
        loop {
            interval.tick().await;
            let removed = lockout.cleanup();
            if removed > 0 {
                info!(removed, "swept elapsed lockouts");
            }
        }
    });

    // Background prune of revoked tokens that have expired anyway
    let revocations = state.revocations.clone();
    let prune_every = Duration::from_secs(settings.revocation.prune_interval_secs);
    tokio::spawn(async move {
        let mut interval = interval(prune_every);
        loop {
            interval.tick().await;
            let removed = revocations.prune();
            if removed > 0 {
                info!(removed, remaining = revocations.len(), "pruned expired revocations");
            }
        }
    });

    let app = router::create_router(state);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, "listening");

    axum_serve(listener, app).await
}

async fn axum_serve(listener: TcpListener, app: axum::Router) -> anyhow::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

/// Create `username` with a generated password unless it exists.
///
/// Returns the generated password so the caller can hand it to the operator.
async fn bootstrap_user(
    store: &FlatFileUserStore,
    username: &str,
    authorities: &[String],
    log_n: u8,
) -> anyhow::Result<Option<String>> {
    if store.lookup_user(username).await?.is_some() {
        info!(username, "bootstrap user already exists");
        return Ok(None);
    }

    let password = generate_password();
    let hash = hash_password_with_cost(&password, log_n)?;
    store
        .insert_user(UserRecord::new(username, hash).with_authorities(authorities.iter().cloned()))
        .await?;

    warn!(username, "created bootstrap user; change its password after the first login");
    Ok(Some(password))
}

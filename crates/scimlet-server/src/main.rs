//! scimlet server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `SCIMLET_*`
//! environment variables, opens the SQLite user store, and serves the SCIM
//! endpoint under `/scim/v2`.
//!
//! To generate an argon2 hash for `auth_token_hash` or `auth_password_hash`:
//!
//! ```text
//! cargo run -p scimlet-server -- --hash-password
//! ```

use std::{
  io::{self, BufRead, Write},
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rand_core::OsRng;
use scimlet_server::{SCIM_PREFIX, ServerConfig, auth::AuthConfig, seed};
use scimlet_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "SCIM 2.0 user provisioning server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a secret read from stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Insert the demo users if the store is empty.
  #[arg(long)]
  seed_demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  if cli.hash_password {
    return print_secret_hash();
  }

  let cfg = load_config(cli.config)?;
  let store = open_store(&cfg.store_path).await?;
  if cli.seed_demo {
    let inserted = seed::seed_demo_users(&store)
      .await
      .context("failed to seed demo users")?;
    tracing::info!(inserted, "demo seed complete");
  }

  serve(store, &cfg).await
}

/// Layer the optional TOML file under `SCIMLET_*` environment variables.
fn load_config(path: PathBuf) -> anyhow::Result<ServerConfig> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("SCIMLET"))
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

/// Open the store, expanding a leading `~` to `$HOME`.
async fn open_store(path: &Path) -> anyhow::Result<SqliteStore> {
  let path = match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  };
  SqliteStore::open(&path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}

async fn serve(store: SqliteStore, cfg: &ServerConfig) -> anyhow::Result<()> {
  if AuthConfig::from(cfg).is_empty() {
    tracing::warn!("no credentials configured; every request will be rejected");
  }

  let app = scimlet_server::router(Arc::new(store), cfg);
  let address = format!("{}:{}", cfg.host, cfg.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  tracing::info!(base = %cfg.scim_base_url(), "serving SCIM on {address}{SCIM_PREFIX}");
  axum::serve(listener, app).await.context("server error")
}

/// Hash one line of stdin with argon2 and print the PHC string.
fn print_secret_hash() -> anyhow::Result<()> {
  print!("Secret: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let secret = line.trim_end_matches(['\n', '\r']);

  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(secret.as_bytes(), &salt)
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
  println!("{hash}");
  Ok(())
}

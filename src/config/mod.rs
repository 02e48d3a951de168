use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Address the HTTP server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// The single front-end origin allowed by CORS
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// Apply the embedded migrations on start-up
    #[serde(default = "default_true")]
    pub run_migrations: bool,
    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_allowed_origin() -> String {
    "http://localhost:4200".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: default_bind_addr(),
            allowed_origin: default_allowed_origin(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            run_migrations: default_true(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>().context("read configuration from environment")?;

        Ok(config)
    }

    /// Build a configuration from explicit key/value pairs, using the same
    /// variable names as the environment.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars).context("parse configuration")?;
        Ok(config)
    }

    /// Get the database URL, failing when none was configured
    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .context("DATABASE_URL is not set (use --in-memory to run without a database)")
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("parse bind address {:?}", self.bind_addr))
    }

    /// Apply command line overrides on top of the environment
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(bind) = &cli.bind {
            self.bind_addr = bind.clone();
        }
        if let Some(url) = &cli.database_url {
            self.database_url = Some(url.clone());
        }
        if let Some(origin) = &cli.allowed_origin {
            self.allowed_origin = origin.clone();
        }
        if cli.no_migrate {
            self.run_migrations = false;
        }
        if cli.log_json {
            self.log_json = true;
        }
    }
}

/// Command line arguments
#[derive(Debug, Default, clap::Parser)]
#[command(name = "client_api", version, about = "HTTP CRUD API for clients")]
pub struct Cli {
    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub bind: Option<String>,

    /// PostgreSQL connection URL
    #[arg(long)]
    pub database_url: Option<String>,

    /// Front-end origin allowed by CORS
    #[arg(long)]
    pub allowed_origin: Option<String>,

    /// Keep clients in memory instead of PostgreSQL
    #[arg(long)]
    pub in_memory: bool,

    /// Skip the embedded schema migrations
    #[arg(long)]
    pub no_migrate: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

/// Initialize environment variables and load configuration
pub fn init(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()?;
    config.apply_cli(cli);

    Ok(config)
}

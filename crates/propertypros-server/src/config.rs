use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Secrets that ship in sample `.env` files and must never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub production: bool,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("ACCESS_TOKEN_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("ACCESS_TOKEN_SECRET is unset or still a placeholder");
        }

        let host = std::env::var("PROPERTYPROS_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .context("PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("invalid PROPERTYPROS_HOST")?;

        let db_path: PathBuf = std::env::var("PROPERTYPROS_DB_PATH")
            .unwrap_or_else(|_| "propertypros.db".into())
            .into();

        let env = std::env::var("PROPERTYPROS_ENV")
            .or_else(|_| std::env::var("NODE_ENV"))
            .unwrap_or_default();

        let cors_origins = parse_origins(
            &std::env::var("PROPERTYPROS_CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.into()),
        );

        Ok(Self {
            addr,
            db_path,
            jwt_secret,
            production: env.eq_ignore_ascii_case("production"),
            cors_origins,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

//! CLI for minting session tokens
//!
//! Signs a token with the gateway's SESSION_SECRET so scripts and service
//! accounts can call the backend proxy without going through the login page.
//! Outputs JSON.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gateway_core::common::UserId;
use gateway_core::config::Config;
use gateway_core::domains::auth::{AuthProvider, JwtService};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "issue_token")]
#[command(about = "Issue a signed session token for a user")]
struct Cli {
    /// User id as stored by the identity store
    #[arg(long)]
    user_id: String,

    /// Login mechanism recorded in the token
    #[arg(long, value_enum, default_value_t = Provider::Credentials)]
    provider: Provider,

    /// Token lifetime in hours
    #[arg(long, default_value_t = JwtService::DEFAULT_TTL_HOURS)]
    ttl_hours: i64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Provider {
    Oauth,
    Credentials,
}

impl From<Provider> for AuthProvider {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Oauth => AuthProvider::OAuth,
            Provider::Credentials => AuthProvider::Credentials,
        }
    }
}

#[derive(Serialize)]
struct Response {
    token: String,
    user_id: String,
    provider: AuthProvider,
    expires_in_hours: i64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.ttl_hours <= 0 {
        anyhow::bail!("--ttl-hours must be positive");
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    let jwt_service = JwtService::new(&config.session_secret, config.session_issuer);

    let user_id = UserId::new(cli.user_id).context("Invalid --user-id")?;
    let provider = AuthProvider::from(cli.provider);
    let token = jwt_service
        .create_token(&user_id, provider, chrono::Duration::hours(cli.ttl_hours))
        .context("Failed to sign token")?;

    let response = Response {
        token,
        user_id: user_id.to_string(),
        provider,
        expires_in_hours: cli.ttl_hours,
    };
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

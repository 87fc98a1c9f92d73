//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use accord_client::{ApiClient, Authenticator};
use accord_core::{ApiUrl, Credentials, SecondFactor};

use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email address to authenticate with
    #[arg(long)]
    pub identifier: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Second-factor code, for accounts protected by one
    #[arg(long)]
    pub code: Option<String>,

    /// API base URL
    #[arg(long)]
    pub api: String,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let api = ApiUrl::new(&args.api).context("Invalid API URL")?;
    let mut credentials = Credentials::password(&args.identifier, &args.password);
    if let Some(code) = &args.code {
        credentials = credentials.with_second_factor(SecondFactor::new(code));
    }

    eprintln!("{}", "Logging in...".dimmed());

    let client = ApiClient::new(api.clone()).context("Failed to build API client")?;
    let token = Authenticator::new(client)
        .authenticate(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("API", api.as_str());
    output::field("Token", token.expose());

    Ok(())
}

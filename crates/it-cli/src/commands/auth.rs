//! `it login`, `it logout` and `it whoami`

use std::io::{BufRead, IsTerminal, Write};

use anyhow::{bail, Context, Result};
use clap::Args;
use it_auth::{ApiToken, Credentials, CredentialSource};
use it_core::Id;

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Expected owner of the token
    #[arg(long)]
    pub user_id: Option<Id>,

    /// API token; read from stdin when omitted
    #[arg(long, env = "ISSUETRACK_LOGIN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

pub async fn login(ctx: &AppContext, args: LoginArgs) -> Result<()> {
    let raw = match args.token {
        Some(token) => token,
        None => read_token()?,
    };
    let token = ApiToken::new(raw).context("Invalid API token")?;

    let gateway = ctx
        .gateway
        .with_credentials(Some(Credentials::configured(token.clone())));
    let (session, user) = it_client::login(&gateway, &ctx.store, token, args.user_id)
        .await
        .context("Login failed")?;

    println!(
        "Logged in as {} (@{}, id {})",
        user.display_name(),
        user.username,
        session.user_id
    );
    if ctx
        .credentials
        .as_ref()
        .is_some_and(|c| c.source == CredentialSource::Configured)
    {
        println!("Note: ISSUETRACK_API_TOKEN is set and takes precedence over the session");
    }
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    if it_client::logout(&ctx.store)? {
        println!("Logged out");
    } else {
        println!("No stored session");
    }
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    let identity = it_client::whoami(&ctx.gateway, ctx.credentials.as_ref())
        .await
        .context("Failed to resolve identity")?;

    match (&identity.user, identity.source) {
        (Some(user), Some(source)) => println!(
            "{} (@{}, id {}) via {} token",
            user.display_name(),
            user.username,
            user.id,
            source.as_str()
        ),
        _ => println!("anonymous"),
    }
    Ok(())
}

fn read_token() -> Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("API token: ");
        std::io::stderr().flush().ok();
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("Failed to read token from stdin")?;
    if line.trim().is_empty() {
        bail!("No API token given");
    }
    Ok(line.trim().to_string())
}

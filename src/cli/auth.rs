//! CLI auth command handlers.

use crate::auth::TokenStore;
use crate::cli::{AuthCommands, Cli, UrlArgs};
use crate::error::SlackError;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Dispatch `slackhook auth <command>`.
pub async fn handle(cli: &Cli, command: &AuthCommands) -> CliResult {
    match command {
        AuthCommands::Url(args) => handle_url(cli, args),
        AuthCommands::Exchange(args) => handle_exchange(cli, &args.code).await,
        AuthCommands::Refresh => handle_refresh(cli).await,
        AuthCommands::Status => handle_status(cli),
        AuthCommands::Whoami => handle_whoami(cli).await,
        AuthCommands::Logout => handle_logout(cli),
    }
}

fn handle_url(cli: &Cli, args: &UrlArgs) -> CliResult {
    let store = cli.token_store();
    let client = cli.client(&store)?;
    let state = args
        .state
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
    let url = client.authorization_url_with_scope(&args.scope, &state)?;
    println!("🔗 Visit: {url}");
    println!("🔒 State: {state}");
    Ok(())
}

async fn handle_exchange(cli: &Cli, code: &str) -> CliResult {
    let store = cli.token_store();
    let mut client = cli.client(&store)?;
    let token = client.fetch_token(code).await?;
    store.save(&cli.profile, token)?;

    let team = token.team();
    println!(
        "✅ Installed into {}",
        team.name.or(team.id).unwrap_or_else(|| "workspace".to_string())
    );
    if let Ok(channel) = token.channel() {
        println!("   Webhook channel: {channel}");
    }
    Ok(())
}

async fn handle_refresh(cli: &Cli) -> CliResult {
    let store = cli.token_store();
    let mut client = cli.client(&store)?;
    let token = client.refresh_token().await?;
    store.save(&cli.profile, token)?;
    match token.expires_at {
        Some(at) => println!("✅ Token refreshed, valid until {at}"),
        None => println!("✅ Token refreshed"),
    }
    Ok(())
}

fn handle_status(cli: &Cli) -> CliResult {
    let store = cli.token_store();
    let Some(token) = store.load(&cli.profile)? else {
        println!("⚪ {}: not installed", cli.profile);
        return Ok(());
    };
    let state = match token.expires_at {
        _ if token.expired() => "🔴 expired".to_string(),
        Some(at) => format!("🟢 valid until {at}"),
        None => "🟢 valid (no expiry)".to_string(),
    };
    println!("{}: {state}", cli.profile);
    if let Some(team) = token.team().name {
        println!("   Team: {team}");
    }
    match token.channel() {
        Ok(channel) => println!("   Webhook channel: {channel}"),
        Err(SlackError::MissingWebhook) => println!("   No incoming webhook"),
        Err(e) => return Err(e.into()),
    }
    println!(
        "   Refresh token: {}",
        if token.has_refresh_token() { "yes" } else { "no" }
    );
    Ok(())
}

async fn handle_whoami(cli: &Cli) -> CliResult {
    let store = cli.token_store();
    let client = cli.client(&store)?;
    let owner = client.resource_owner().await?;
    println!(
        "👤 {} ({})",
        owner.real_name().or(owner.name()).unwrap_or_default(),
        owner.id().unwrap_or_default()
    );
    if let Some(email) = owner.email() {
        println!("   Email: {email}");
    }
    Ok(())
}

fn handle_logout(cli: &Cli) -> CliResult {
    cli.token_store().clear(&cli.profile)?;
    println!("👋 Removed token for {}", cli.profile);
    Ok(())
}

/*
[INPUT]:  CLI arguments, YAML configuration file, operator input
[OUTPUT]: Login, token maintenance and authenticated wallet operations
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or startup flow
*/

mod cli;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use console::style;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wallet_session_adapter::{Call, WalletError};
use wallet_session_cli::{CliConfig, ConsoleBrowser, SessionHost, parse_call};

#[derive(Parser, Debug)]
#[command(name = "wallet-session", version, about = "Wallet session login and operations")]
struct Cli {
    #[arg(
        long = "config",
        value_name = "PATH",
        default_value = "wallet-session.yaml",
        global = true
    )]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH", default_value = "wallet-session.yaml")]
        output: PathBuf,
    },
    /// Sign in through the identity provider
    Login,
    /// Show the saved session and token expiry
    Status,
    /// Execute one or more contract calls
    Execute {
        /// contract:entrypoint[:arg,arg,...]
        #[arg(long = "call", value_name = "CALL", value_parser = parse_call, required = true)]
        calls: Vec<Call>,
        #[arg(long = "bio-auth")]
        bio_auth: bool,
    },
    /// Swap tokens from the session wallet
    Swap {
        #[arg(long)]
        amount: Decimal,
        #[arg(long = "sell", value_name = "TOKEN")]
        sell_token: String,
        #[arg(long = "buy", value_name = "TOKEN")]
        buy_token: String,
        #[arg(long = "bio-auth")]
        bio_auth: bool,
    },
    /// Exchange the refresh token now
    Refresh,
    /// Forget the session tokens and profile
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    if let Command::Init { output } = &args.command {
        return cli::init::run_init(output.clone());
    }

    info!(config_path = %args.config_path.display(), "starting wallet-session");
    let config = load_config(&args.config_path)?;
    let host = SessionHost::new(config)?;

    match args.command {
        Command::Init { .. } => Ok(()),
        Command::Login => login(&host).await,
        Command::Status => status(&host).await,
        Command::Execute { calls, bio_auth } => {
            let session = host.restore().await?;
            let hash = session
                .execute_calls(calls, bio_auth)
                .await
                .map_err(normalized)?;
            print_hash(&hash);
            Ok(())
        }
        Command::Swap {
            amount,
            sell_token,
            buy_token,
            bio_auth,
        } => {
            let session = host.restore().await?;
            let hash = session
                .swap(amount, &sell_token, &buy_token, bio_auth)
                .await
                .map_err(normalized)?;
            print_hash(&hash);
            Ok(())
        }
        Command::Refresh => {
            let session = host.restore().await?;
            session.refresh().await.map_err(normalized)?;
            let expires_at = session.token_state().await.expires_at();
            println!(
                "{} token refreshed, expires {}",
                style("OK").bold().green(),
                expires_at.map_or_else(|| "-".to_string(), |at| at.to_rfc3339())
            );
            Ok(())
        }
        Command::Logout => {
            if host.profiles().load().await?.is_some() {
                let session = host.restore().await?;
                session.logout().await.context("clear stored tokens")?;
            }
            host.profiles().delete().await?;
            println!("{}", style("Logged out").bold());
            Ok(())
        }
    }
}

async fn login(host: &SessionHost) -> Result<()> {
    let oauth = host.oauth_client();
    let session = oauth
        .login(&ConsoleBrowser::new())
        .await
        .map_err(normalized)?;
    host.remember(&session).await?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!("Wallet: {}", style(session.address()).cyan());
    println!("Network: {}", session.network());
    if let Some(email) = &session.identity().email {
        println!("Email: {email}");
    }
    Ok(())
}

async fn status(host: &SessionHost) -> Result<()> {
    let Some(identity) = host.profiles().load().await? else {
        println!("{}", style("No saved session").dim());
        return Ok(());
    };
    let session = host.restore().await?;
    let tokens = session.token_state().await;

    println!("Wallet: {}", style(&identity.address).cyan());
    println!("Network: {}", identity.network);
    if let Some(email) = &identity.email {
        println!("Email: {email}");
    }
    println!(
        "Access token: {}",
        match tokens.expires_at() {
            Some(at) if tokens.is_expired() => format!("expired or near expiry ({})", at.to_rfc3339()),
            Some(at) => format!("valid until {}", at.to_rfc3339()),
            None => "none".to_string(),
        }
    );
    println!(
        "Refresh token: {}",
        if tokens.refresh_token().is_some() { "present" } else { "none" }
    );
    Ok(())
}

/// Surface the normalized message only; the source chain repeats it
fn normalized(err: WalletError) -> anyhow::Error {
    anyhow!("{err}")
}

fn print_hash(hash: &str) {
    println!("{} {}", style("Transaction:").bold(), style(hash).cyan());
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<CliConfig> {
    let path_str = path
        .to_str()
        .context("config path must be valid utf-8")?;
    CliConfig::from_file(path_str).context("load config")
}

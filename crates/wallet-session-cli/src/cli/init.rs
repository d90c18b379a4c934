/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When CliConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::path::PathBuf;

use wallet_session_adapter::Provider;
use wallet_session_cli::config::{CliConfig, HttpConfig, ORG_SECRET_ENV};

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Welcome to Wallet Session Init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a new session configuration.").dim()
    );

    let theme = ColorfulTheme::default();

    println!("\n{}", style("--- Gateway ---").bold());
    let base_url: String = Input::with_theme(&theme)
        .with_prompt("External API base URL")
        .interact_text()?;

    let network: String = Input::with_theme(&theme)
        .with_prompt("Network")
        .default("sepolia".to_string())
        .interact_text()?;

    println!("\n{}", style("--- Sign-in ---").bold());
    let providers = [Provider::Google, Provider::Apple];
    let provider_selection = Select::with_theme(&theme)
        .with_prompt("Identity provider")
        .items(&providers.map(Provider::as_str))
        .default(0)
        .interact()?;
    let provider = providers[provider_selection];

    let redirect_uri: String = Input::with_theme(&theme)
        .with_prompt("Redirect URI")
        .default("walletsession://callback".to_string())
        .interact_text()?;

    let app_id: String = Input::with_theme(&theme)
        .with_prompt("App ID (empty to skip)")
        .allow_empty(true)
        .interact_text()?;

    let rotate_refresh_tokens = Confirm::with_theme(&theme)
        .with_prompt("Does the backend rotate refresh tokens?")
        .default(true)
        .interact()?;

    let config = CliConfig {
        base_url,
        provider,
        network,
        redirect_uri,
        app_id: Some(app_id.trim().to_string()).filter(|id| !id.is_empty()),
        org_secret: None,
        data_dir: None,
        rotate_refresh_tokens,
        http: HttpConfig::default(),
    };
    config.validate()?;

    let yaml = serde_yaml::to_string(&config).context("failed to serialize config to YAML")?;

    std::fs::write(&output, yaml)
        .context(format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );
    println!(
        "Set {} to supply the organization secret.",
        style(ORG_SECRET_ENV).yellow()
    );

    Ok(())
}

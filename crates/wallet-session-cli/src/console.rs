/*
[INPUT]:  Authorization URL, redirect URI, operator keyboard input
[OUTPUT]: Browser result from a pasted callback URL; console biometric confirmation
[POS]:    Host capabilities - terminal stand-ins for browser and biometric prompt
[UPDATE]: When prompt wording or callback matching rules change
*/

use async_trait::async_trait;
use console::style;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use tracing::{debug, warn};
use url::Url;

use wallet_session_adapter::{
    BiometricGate, BiometricOutcome, BrowserResult, BrowserSession, Result, WalletError,
};

/// Browser session that asks the operator to open the URL themselves
/// and paste back the address the browser was redirected to.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleBrowser;

impl ConsoleBrowser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrowserSession for ConsoleBrowser {
    async fn open_auth_session(&self, auth_url: &Url, redirect_uri: &str) -> Result<BrowserResult> {
        println!("\n{}", style("Open this URL in a browser to sign in:").bold());
        println!("{}\n", style(auth_url.as_str()).cyan());

        let prompt = format!("Paste the {redirect_uri} URL (empty to cancel)");
        let pasted = tokio::task::spawn_blocking(move || {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
        })
        .await
        .map_err(|e| WalletError::Config(format!("console prompt failed: {e}")))?
        .map_err(|e| WalletError::Config(format!("console prompt failed: {e}")))?;

        Ok(classify_pasted_url(&pasted, redirect_uri))
    }
}

/// Map the operator's input onto a browser outcome
pub fn classify_pasted_url(pasted: &str, redirect_uri: &str) -> BrowserResult {
    let pasted = pasted.trim();
    if pasted.is_empty() {
        return BrowserResult::Cancel;
    }
    if matches_redirect(pasted, redirect_uri) {
        debug!("callback URL received");
        BrowserResult::Success {
            url: pasted.to_string(),
        }
    } else {
        BrowserResult::Other("pasted URL does not match the redirect URI".to_string())
    }
}

/// Same scheme, host and path; query and fragment are free
fn matches_redirect(pasted: &str, redirect_uri: &str) -> bool {
    match (Url::parse(pasted), Url::parse(redirect_uri)) {
        (Ok(pasted), Ok(expected)) => {
            pasted.scheme() == expected.scheme()
                && pasted.host_str() == expected.host_str()
                && pasted.port_or_known_default() == expected.port_or_known_default()
                && pasted.path() == expected.path()
        }
        _ => false,
    }
}

/// Biometric stand-in: an explicit yes/no confirmation on the terminal.
///
/// Without an interactive terminal the prompt cannot be shown, which is
/// reported as missing hardware.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleBiometric;

impl ConsoleBiometric {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BiometricGate for ConsoleBiometric {
    async fn confirm(&self, prompt: &str) -> BiometricOutcome {
        let prompt = prompt.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(true)) => BiometricOutcome::Confirmed,
            Ok(Ok(false)) => BiometricOutcome::Rejected,
            Ok(Err(err)) => {
                warn!(error = %err, "confirmation prompt unavailable");
                BiometricOutcome::NoHardware
            }
            Err(err) => {
                warn!(error = %err, "confirmation prompt task failed");
                BiometricOutcome::NoHardware
            }
        }
    }
}

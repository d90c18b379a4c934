/*
[INPUT]:  Gateway base URL and a callback URL received by the host app
[OUTPUT]: Wallet session identity and authentication status
[POS]:    Examples - completing a login from a forwarded deep link
[UPDATE]: When the callback flow changes
*/

use wallet_session_adapter::*;

/// Example: finishing a login from a deep link
///
/// Usage: cargo run --example callback_example -- <base-url> '<callback-url>'
///
/// 1. Create gateway client
/// 2. Create OAuth client for the provider
/// 3. Parse the forwarded callback URL into a session
#[tokio::main]
async fn main() {
    println!("=== Wallet Session Callback Example ===\n");

    let mut args = std::env::args().skip(1);
    let (Some(base_url), Some(callback)) = (args.next(), args.next()) else {
        eprintln!("usage: callback_example <base-url> <callback-url>");
        return;
    };

    // Step 1: Create gateway client
    let client = match GatewayClient::new(&base_url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ Gateway client created");

    // Step 2: Create OAuth client
    let config = OAuthConfig::new(Provider::Google, "sepolia", "myapp://callback");
    let oauth = OAuthClient::new(client, config);
    println!("✓ OAuth client created");

    // Step 3: Complete login from the callback URL
    match oauth.complete_callback(&callback).await {
        Ok(session) => {
            println!("  Address: {}", session.address());
            println!("  Network: {}", session.network());
            println!("  Authenticated: {}", session.is_authenticated().await);
        }
        Err(e) => eprintln!("Login failed: {}", e),
    }

    println!("\n✓ Callback example complete");
}

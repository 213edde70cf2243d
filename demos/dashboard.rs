//! Terminal walkthrough of the dashboard against a running backend.
//!
//! ```bash
//! MARKET_DASH_EMAIL=ana@example.com MARKET_DASH_PASSWORD=secret \
//!     RUST_LOG=market_dash=debug cargo run --example dashboard --features native
//! ```
//!
//! Environment (a `.env` file is honoured):
//! - `MARKET_DASH_API_URL` — backend base URL (default `http://127.0.0.1:8000`)
//! - `MARKET_DASH_EMAIL` / `MARKET_DASH_PASSWORD` — sign in when no saved session is valid
//! - `MARKET_DASH_TOKEN_FILE` — where the session token is kept (default `.market-dash/token.json`)

use std::env;
use std::sync::Arc;
use std::time::Duration;

use market_dash::prelude::*;
use tracing_subscriber::EnvFilter;

fn render(view: &DashboardView) {
    println!("\n== {} ({} of {}) ==", view.heading, view.showing, view.total);
    if let Some(error) = &view.error {
        println!("!! {}", error);
    }
    if let Some(favorites) = &view.favorites {
        println!("-- Favorites --");
        for card in favorites {
            print_card(card);
        }
        println!("-- All --");
    }
    for card in &view.cards {
        print_card(card);
    }
    if let Some(err) = &view.toggle_error {
        println!("!! {}: {}", err.symbol, err.message);
    }
}

fn print_card(card: &InstrumentCard) {
    let star = if card.is_favorite { "*" } else { " " };
    println!(
        "{} {:<8} {:<24} {:>14} {:>10} {:>9}",
        star, card.symbol, card.name, card.price, card.change, card.change_percent
    );
}

#[tokio::main]
async fn main() -> Result<(), SdkError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("market_dash=info")),
        )
        .init();

    let base_url = env::var("MARKET_DASH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let token_file =
        env::var("MARKET_DASH_TOKEN_FILE").unwrap_or_else(|_| ".market-dash/token.json".to_string());

    let dashboard = Dashboard::builder()
        .base_url(&base_url)
        .token_store(Arc::new(FileTokenStore::new(token_file)))
        .retry_policy(RetryPolicy::Idempotent)
        .poll_interval(Duration::from_secs(30))
        .build()?;

    if let Err(e) = dashboard.boot().await {
        tracing::warn!("Could not validate saved session: {}", e);
    }

    if !dashboard.is_authenticated().await {
        if let (Ok(email), Ok(password)) =
            (env::var("MARKET_DASH_EMAIL"), env::var("MARKET_DASH_PASSWORD"))
        {
            match dashboard.login(&email, &password).await {
                Ok(user) => println!("Signed in as {}", user.email),
                Err(e) => println!("Sign-in failed: {}", e),
            }
        }
    }

    if let Err(e) = dashboard.load().await {
        println!("Initial load failed: {}", e);
    }
    render(&dashboard.view().await);

    if dashboard.is_authenticated().await {
        let btc = Symbol::from("BTC");
        match dashboard.toggle_favorite(&btc).await {
            Ok(outcome) => println!("\nToggled {}: {:?}", btc, outcome),
            Err(e) => println!("\nToggle failed: {}", e),
        }
    }

    dashboard.dispatch(Intent::Search("us".into())).await?;
    render(&dashboard.view().await);

    dashboard.dispatch(Intent::Select(Symbol::from("AAPL"))).await?;
    if let Some(detail) = dashboard.detail().await {
        println!(
            "\n{} — open {:?}, day {:?}, year {:?}, volume {:?}, {} chart points, period {:?}",
            detail.card.name,
            detail.open,
            detail.day_range,
            detail.year_range,
            detail.volume,
            detail.series.len(),
            detail.period_change
        );
    }
    dashboard.dispatch(Intent::Search(String::new())).await?;

    let polling = dashboard.spawn_polling();
    println!("\nPolling every {:?}; Ctrl-C to stop.", dashboard.poll_interval());
    let _ = tokio::signal::ctrl_c().await;
    polling.cancel();
    render(&dashboard.view().await);

    Ok(())
}

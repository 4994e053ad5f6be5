use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use trade_engine::config::StrategyKind;
use trade_engine::cycle::TradingCycleController;
use trade_engine::exchange::{Exchange, PaperExchange, UpbitClient};
use trade_engine::selector::CandidateSelector;
use trade_engine::strategy::implementations::{MACDStrategy, RSIStrategy};
use trade_engine::strategy::Strategy;

mod config;
mod logging;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;
    logging::init(&config.log_dir)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = option_env!("GIT_HASH").unwrap_or("unknown"),
        git_branch = option_env!("GIT_BRANCH").unwrap_or("unknown"),
        build_time = option_env!("BUILD_TIME").unwrap_or("unknown"),
        dry_run = config.dry_run,
        "Starting trade bot..."
    );
    debug!("engine config: {}", serde_json::to_string(&config.engine)?);

    let engine = &config.engine;
    let quote = engine.selector.quote_currency.as_str();

    let client = Arc::new(
        UpbitClient::new(config.api_url.as_str(), config.credentials.clone())
            .context("building Upbit client")?,
    );
    if config.credentials.is_some() {
        let balance = client
            .check_login(quote)
            .await
            .context("login check failed")?;
        info!(balance, currency = quote, "Logged in");
    } else {
        warn!("no API credentials; running on public market data only");
    }

    let exchange: Arc<dyn Exchange> = if config.dry_run {
        info!(balance = config.paper_balance, "Paper trading enabled");
        Arc::new(PaperExchange::new(
            client.as_ref().clone(),
            quote,
            config.paper_balance,
        ))
    } else {
        client.clone()
    };

    let strategy: Box<dyn Strategy> = match engine.strategy {
        StrategyKind::Macd => Box::new(MACDStrategy::new(engine.macd.clone(), engine.risk.clone())),
        StrategyKind::Rsi => Box::new(RSIStrategy::new(engine.rsi.clone(), engine.risk.clone())),
    };
    info!(strategy = strategy.name(), "Strategy selected");

    let mut controller = TradingCycleController::new(
        exchange,
        client,
        strategy,
        CandidateSelector::new(engine.selector.clone()),
    )
    .with_indicator_params(engine.indicators.clone())
    .with_cycle_config(engine.cycle.clone());

    let candidates = controller
        .initialize()
        .await
        .context("initial candidate selection failed")?;
    if candidates.is_empty() {
        warn!("candidate set is empty; waiting for the next refresh");
    }

    tokio::select! {
        _ = controller.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("listening for ctrl-c")?;
            info!("Shutting down");
        }
    }

    Ok(())
}

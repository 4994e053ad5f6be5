use std::path::PathBuf;
use std::str::FromStr;

use dotenv::dotenv;
use trade_engine::config::{EngineConfig, StrategyKind};
use trade_engine::data::{Instrument, Interval};
use trade_engine::error::ConfigError;
use trade_engine::exchange::{ApiCredentials, UPBIT_API_URL};

/// Process configuration loaded from the environment
pub struct Config {
    pub credentials: Option<ApiCredentials>,
    pub dry_run: bool,
    pub paper_balance: f64,
    pub api_url: String,
    pub log_dir: PathBuf,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let dry_run = parse_or(&var, "DRY_RUN", false)?;
        let credentials = match (var("ACCESS_KEY"), var("SECRET_KEY")) {
            (Some(access), Some(secret)) => Some(ApiCredentials::new(access, secret)),
            _ if dry_run => None,
            _ => anyhow::bail!("ACCESS_KEY and SECRET_KEY are required unless DRY_RUN=true"),
        };

        let mut engine = EngineConfig::default();
        engine.strategy = parse_or(&var, "STRATEGY", StrategyKind::default())?;
        engine.selector.top_n = parse_or(&var, "TOP_N", engine.selector.top_n)?;
        if let Some(denylist) = lookup("DENYLIST") {
            engine.selector.denylist = split_list(&denylist);
        }
        if let Some(raw) = var("CANDLE_INTERVAL") {
            let interval: Interval = raw.parse()?;
            engine.macd.interval = interval;
            engine.rsi.interval = interval;
        }
        if let Some(raw) = var("INSTRUMENTS") {
            engine.rsi.instruments = split_list(&raw)
                .into_iter()
                .map(Instrument::new)
                .collect::<Result<_, _>>()?;
        }
        if engine.strategy == StrategyKind::Rsi && engine.rsi.instruments.is_empty() {
            anyhow::bail!("INSTRUMENTS must list at least one market for STRATEGY=rsi");
        }

        Ok(Config {
            credentials,
            dry_run,
            paper_balance: parse_or(&var, "PAPER_BALANCE", 1_000_000.0)?,
            api_url: var("UPBIT_API_URL").unwrap_or_else(|| UPBIT_API_URL.to_string()),
            log_dir: var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            engine,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

//! Candidate selection
//!
//! Derives the working instrument set from the exchange universe.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::SelectorConfig;
use crate::data::Instrument;
use crate::error::ExchangeError;
use crate::exchange::InstrumentDirectory;

/// Ranks the quote-currency universe by 24h trade value and applies the
/// exclusion rules
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    config: SelectorConfig,
}

impl CandidateSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Query the directory and build the candidate set
    pub async fn select<D>(&self, directory: &D) -> Result<Vec<Instrument>, ExchangeError>
    where
        D: InstrumentDirectory + ?Sized,
    {
        let universe: Vec<Instrument> = directory
            .list_tradable_instruments()
            .await?
            .into_iter()
            .filter(|i| i.quote() == self.config.quote_currency)
            .collect();
        let ranked = directory.rank_by_24h_volume(&universe).await?;
        let flagged = directory.list_caution_flagged_instruments().await?;

        let candidates = self.filter_ranked(ranked, &flagged);
        info!(
            universe = universe.len(),
            flagged = flagged.len(),
            selected = candidates.len(),
            "candidates selected"
        );
        Ok(candidates)
    }

    /// Take the top N of an already ranked list, then drop flagged and
    /// denylisted instruments and duplicates. Ranking order is kept.
    pub fn filter_ranked(
        &self,
        ranked: Vec<Instrument>,
        flagged: &HashSet<Instrument>,
    ) -> Vec<Instrument> {
        let mut seen = HashSet::new();
        ranked
            .into_iter()
            .take(self.config.top_n)
            .filter(|instrument| {
                if flagged.contains(instrument) {
                    debug!(instrument = %instrument, "excluded: caution flag");
                    return false;
                }
                if self.is_denied(instrument) {
                    debug!(instrument = %instrument, "excluded: denylist");
                    return false;
                }
                true
            })
            .filter(|instrument| seen.insert(instrument.clone()))
            .collect()
    }

    fn is_denied(&self, instrument: &Instrument) -> bool {
        self.config
            .denylist
            .iter()
            .any(|pattern| !pattern.is_empty() && instrument.as_str().contains(pattern.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruments(codes: &[&str]) -> Vec<Instrument> {
        codes.iter().map(|c| Instrument::new(*c).unwrap()).collect()
    }

    #[test]
    fn test_filter_keeps_ranking_order() {
        let selector = CandidateSelector::new(SelectorConfig::default());
        let ranked = instruments(&["KRW-BTC", "KRW-XRP", "KRW-ETH", "KRW-ABC", "KRW-USDT", "KRW-SOL"]);
        let flagged: HashSet<_> = instruments(&["KRW-ABC"]).into_iter().collect();

        let selected = selector.filter_ranked(ranked, &flagged);
        assert_eq!(selected, instruments(&["KRW-BTC", "KRW-ETH", "KRW-SOL"]));
    }

    #[test]
    fn test_top_n_applies_before_exclusions() {
        let selector = CandidateSelector::new(SelectorConfig {
            top_n: 3,
            ..SelectorConfig::default()
        });
        let ranked = instruments(&["KRW-XRP", "KRW-BTC", "KRW-ETH", "KRW-SOL"]);
        let selected = selector.filter_ranked(ranked, &HashSet::new());
        assert_eq!(selected, instruments(&["KRW-BTC", "KRW-ETH"]));
    }

    #[test]
    fn test_duplicates_removed() {
        let selector = CandidateSelector::new(SelectorConfig::default());
        let ranked = instruments(&["KRW-BTC", "KRW-ETH", "KRW-BTC"]);
        let selected = selector.filter_ranked(ranked, &HashSet::new());
        assert_eq!(selected, instruments(&["KRW-BTC", "KRW-ETH"]));
    }
}

//! Instruments sub-client — single quotes and settle-all batch fetches.

use crate::client::MarketClient;
use crate::domain::instrument::Instrument;
use crate::error::SdkError;
use crate::shared::Symbol;
use futures_util::future::join_all;

/// Result of a batch quote fetch.
///
/// Failures never abort the batch: a symbol whose request failed is listed
/// in `failed` and is simply absent from `instruments`.
#[derive(Debug, Clone, Default)]
pub struct QuoteBatch {
    /// Successful quotes, in requested order.
    pub instruments: Vec<Instrument>,
    pub failed: Vec<Symbol>,
}

impl QuoteBatch {
    pub fn attempted(&self) -> usize {
        self.instruments.len() + self.failed.len()
    }

    /// True when at least one request was made and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.instruments.is_empty() && !self.failed.is_empty()
    }
}

/// Sub-client for quote operations.
pub struct Instruments<'a> {
    pub(crate) client: &'a MarketClient,
}

impl<'a> Instruments<'a> {
    /// Fetch one quote.
    pub async fn get(&self, symbol: &Symbol) -> Result<Instrument, SdkError> {
        let resp = self.client.http.get_instrument(symbol).await?;
        Ok(Instrument::from_quote(symbol, resp))
    }

    /// Fetch every symbol concurrently and wait for all of them to settle.
    pub async fn fetch_all(&self, symbols: &[Symbol]) -> QuoteBatch {
        let results = join_all(symbols.iter().map(|symbol| self.get(symbol))).await;

        let mut batch = QuoteBatch::default();
        for (symbol, result) in symbols.iter().zip(results) {
            match result {
                Ok(instrument) => batch.instruments.push(instrument),
                Err(e) => {
                    tracing::warn!(%symbol, "Quote fetch failed: {}", e);
                    batch.failed.push(symbol.clone());
                }
            }
        }
        tracing::debug!(
            ok = batch.instruments.len(),
            failed = batch.failed.len(),
            "Quote batch settled"
        );
        batch
    }

    /// Fetch the client's configured watch list.
    pub async fn watch_list(&self) -> QuoteBatch {
        self.fetch_all(self.client.symbols()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_batch_all_failed() {
        let empty = QuoteBatch::default();
        assert!(!empty.all_failed());
        assert_eq!(empty.attempted(), 0);

        let failed = QuoteBatch {
            instruments: vec![],
            failed: vec![Symbol::from("AAPL")],
        };
        assert!(failed.all_failed());

        let partial = QuoteBatch {
            instruments: vec![Instrument::new("MSFT", None, Decimal::ONE)],
            failed: vec![Symbol::from("AAPL")],
        };
        assert!(!partial.all_failed());
        assert_eq!(partial.attempted(), 2);
    }
}

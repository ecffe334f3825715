use async_trait::async_trait;
use crate::{AnalysisError, PriceBar, SamplingInterval, StatementKind, StatementRow, Ticker};

/// Source of price/volume history for a ticker
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Bars covering the trailing `window_days`, sampled at `interval`, oldest first.
    async fn fetch_history(
        &self,
        ticker: &Ticker,
        window_days: u32,
        interval: SamplingInterval,
    ) -> Result<Vec<PriceBar>, AnalysisError>;

    /// Close of the first bar in a one-day daily history.
    async fn latest_close(&self, ticker: &Ticker) -> Result<Option<f64>, AnalysisError> {
        let bars = self.fetch_history(ticker, 1, SamplingInterval::OneDay).await?;
        Ok(bars.first().map(|b| b.close))
    }
}

/// Source of reported financial statements
#[async_trait]
pub trait StatementProvider: Send + Sync {
    /// Up to `limit` reporting periods, most recent first.
    async fn fetch_statement(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
        limit: u32,
    ) -> Result<Vec<StatementRow>, AnalysisError>;
}

use analysis_core::{AnalysisError, PriceBar, PriceHistoryProvider, SamplingInterval, Ticker};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::fetch_text;

pub const DEFAULT_YAHOO_CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Price history from the Yahoo Finance chart endpoint
#[derive(Clone)]
pub struct YahooChartClient {
    client: Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooChartClient {
    async fn fetch_history(
        &self,
        ticker: &Ticker,
        window_days: u32,
        interval: SamplingInterval,
    ) -> Result<Vec<PriceBar>, AnalysisError> {
        let url = format!("{}/{}", self.base_url, ticker);
        let range = format!("{}d", window_days);

        tracing::debug!(%ticker, %range, %interval, "fetching price history");
        let body = fetch_text(self.client.get(&url).query(&[
            ("range", range.as_str()),
            ("interval", interval.as_str()),
            ("includeAdjustedClose", "true"),
        ]))
        .await?;

        let bars = parse_chart(&body)?;
        tracing::debug!(%ticker, bars = bars.len(), "price history received");
        Ok(bars)
    }
}

// Response structures
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
    #[serde(default)]
    adjclose: Vec<AdjCloseColumn>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseColumn {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

/// Parse a chart response into bars, oldest first, one per timestamp.
///
/// Bars missing any OHLC value are skipped. Missing volume reads as 0 and a
/// missing adjusted close falls back to the close.
pub fn parse_chart(body: &str) -> Result<Vec<PriceBar>, AnalysisError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

    if let Some(err) = envelope.chart.error {
        return Err(AnalysisError::ApiError(format!("{}: {}", err.code, err.description)));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let quotes = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|c| c.adjclose)
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            column(&quotes.open, i),
            column(&quotes.high, i),
            column(&quotes.low, i),
            column(&quotes.close, i),
        ) else {
            continue;
        };
        let timestamp = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| AnalysisError::InvalidResponse(format!("invalid timestamp {}", ts)))?;

        bars.push(PriceBar {
            timestamp,
            open,
            high,
            low,
            close,
            adjusted_close: column(&adjclose, i).unwrap_or(close),
            volume: column(&quotes.volume, i).unwrap_or(0.0),
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);
    Ok(bars)
}

use analysis_core::{
    AnalysisError, FinancialStatements, PriceBar, PriceHistoryProvider, StatementKind, StatementProvider,
    StatementRow, Ticker,
};
use fundamental_analysis::{compute_ratios, RatioSet};
use serde::Serialize;
use std::sync::Arc;
use technical_analysis::{compute_indicators, IndicatorConfig};

use crate::chart::{build_chart, ChartSpec};
use crate::session::SessionConfig;
use crate::timeframe::TimeFrame;

/// Reporting periods requested per statement
pub const STATEMENT_ROW_LIMIT: u32 = 120;

/// Result of one submission, ready for the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub ticker: Ticker,
    pub time_frame: TimeFrame,
    pub config: IndicatorConfig,
    /// `None` when no price history could be loaded
    pub chart: Option<ChartSpec>,
    pub ratios: RatioSet,
    pub latest_price: Option<f64>,
    /// Human-readable notes about data that could not be loaded
    pub notices: Vec<String>,
}

/// Runs a submission: fetches prices and statements, computes indicators and
/// ratios, and assembles a report. Holds no per-session state.
pub struct DashboardController {
    prices: Arc<dyn PriceHistoryProvider>,
    statements: Arc<dyn StatementProvider>,
}

impl DashboardController {
    pub fn new(prices: Arc<dyn PriceHistoryProvider>, statements: Arc<dyn StatementProvider>) -> Self {
        Self { prices, statements }
    }

    pub async fn submit(&self, config: &SessionConfig) -> DashboardReport {
        let ticker = &config.ticker;
        let time_frame = config.time_frame;
        tracing::info!(%ticker, %time_frame, "dashboard submission");

        let (history, income, balance, cashflow, latest) = tokio::join!(
            self.prices
                .fetch_history(ticker, time_frame.history_days(), time_frame.interval()),
            self.statements
                .fetch_statement(ticker, StatementKind::Income, STATEMENT_ROW_LIMIT),
            self.statements
                .fetch_statement(ticker, StatementKind::BalanceSheet, STATEMENT_ROW_LIMIT),
            self.statements
                .fetch_statement(ticker, StatementKind::CashFlow, STATEMENT_ROW_LIMIT),
            self.prices.latest_close(ticker),
        );

        let mut notices = Vec::new();

        let chart = match history {
            Ok(bars) if !bars.is_empty() => Some(render(ticker, time_frame, &bars, &config.indicators)),
            Ok(_) => {
                tracing::warn!(%ticker, %time_frame, "price history empty");
                notices.push(format!("No price data available for {} ({})", ticker, time_frame));
                None
            }
            Err(e) => {
                tracing::warn!(%ticker, %time_frame, error = %e, "price history fetch failed");
                notices.push(format!("No price data available for {} ({}): {}", ticker, time_frame, e));
                None
            }
        };

        let statements = FinancialStatements {
            income: statement_or_empty(ticker, StatementKind::Income, income, &mut notices),
            balance: statement_or_empty(ticker, StatementKind::BalanceSheet, balance, &mut notices),
            cashflow: statement_or_empty(ticker, StatementKind::CashFlow, cashflow, &mut notices),
        };

        let latest_price = match latest {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(%ticker, error = %e, "latest price lookup failed");
                notices.push(format!("Latest price unavailable: {}", e));
                None
            }
        };

        let ratios = compute_ratios(&statements, latest_price);
        tracing::info!(
            %ticker,
            bars = chart.as_ref().map(|c| c.timestamps.len()).unwrap_or(0),
            ratios_available = ratios.available_count(),
            "dashboard submission complete"
        );

        DashboardReport {
            ticker: ticker.clone(),
            time_frame,
            config: config.indicators.clone(),
            chart,
            ratios,
            latest_price,
            notices,
        }
    }
}

fn render(ticker: &Ticker, time_frame: TimeFrame, bars: &[PriceBar], config: &IndicatorConfig) -> ChartSpec {
    let indicators = compute_indicators(bars, config);
    build_chart(ticker, time_frame, bars, indicators, config)
}

fn statement_or_empty(
    ticker: &Ticker,
    kind: StatementKind,
    result: Result<Vec<StatementRow>, AnalysisError>,
    notices: &mut Vec<String>,
) -> Vec<StatementRow> {
    match result {
        Ok(rows) => {
            if rows.is_empty() {
                notices.push(format!("No {} data available for {}", kind.endpoint(), ticker));
            }
            rows
        }
        Err(e) => {
            tracing::warn!(%ticker, statement = kind.endpoint(), error = %e, "statement fetch failed");
            notices.push(format!("Failed to load {} for {}: {}", kind.endpoint(), ticker, e));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::SamplingInterval;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use fundamental_analysis::{Ratio, RatioValue};
    use serde_json::json;
    use std::sync::Mutex;

    struct MockPrices {
        bars: Result<Vec<PriceBar>, AnalysisError>,
        calls: Mutex<Vec<(u32, SamplingInterval)>>,
    }

    impl MockPrices {
        fn new(bars: Result<Vec<PriceBar>, AnalysisError>) -> Self {
            Self {
                bars,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PriceHistoryProvider for MockPrices {
        async fn fetch_history(
            &self,
            _ticker: &Ticker,
            window_days: u32,
            interval: SamplingInterval,
        ) -> Result<Vec<PriceBar>, AnalysisError> {
            self.calls.lock().unwrap().push((window_days, interval));
            self.bars.clone()
        }
    }

    struct MockStatements {
        income: Result<Vec<StatementRow>, AnalysisError>,
        balance: Result<Vec<StatementRow>, AnalysisError>,
        limits: Mutex<Vec<u32>>,
    }

    #[async_trait]
    impl StatementProvider for MockStatements {
        async fn fetch_statement(
            &self,
            _ticker: &Ticker,
            kind: StatementKind,
            limit: u32,
        ) -> Result<Vec<StatementRow>, AnalysisError> {
            self.limits.lock().unwrap().push(limit);
            match kind {
                StatementKind::Income => self.income.clone(),
                StatementKind::BalanceSheet => self.balance.clone(),
                StatementKind::CashFlow => Ok(Vec::new()),
            }
        }
    }

    fn row(value: serde_json::Value) -> StatementRow {
        match value {
            serde_json::Value::Object(fields) => StatementRow::new(fields),
            _ => panic!("fixture must be an object"),
        }
    }

    fn sample_bars(n: usize) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                PriceBar {
                    timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 86_400, 0).unwrap(),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    adjusted_close: close,
                    volume: 10_000.0,
                }
            })
            .collect()
    }

    fn good_statements() -> MockStatements {
        MockStatements {
            income: Ok(vec![row(json!({
                "revenue": 1000.0,
                "grossProfit": 400.0,
                "operatingIncome": 250.0,
                "netIncome": 200.0,
                "eps": 4.0
            }))]),
            balance: Ok(vec![row(json!({
                "totalCurrentAssets": 200.0,
                "totalCurrentLiabilities": 100.0,
                "inventory": 50.0,
                "totalStockholdersEquity": 800.0,
                "totalAssets": 2000.0
            }))]),
            limits: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_submit_builds_chart_and_ratios() {
        let prices = Arc::new(MockPrices::new(Ok(sample_bars(60))));
        let statements = Arc::new(good_statements());
        let controller = DashboardController::new(prices.clone(), statements.clone());

        let config = SessionConfig::default();
        let report = controller.submit(&config).await;

        assert!(report.notices.iter().all(|n| n.contains("cash-flow")));
        let chart = report.chart.expect("chart");
        assert_eq!(chart.title, "AAPL Stock Price Chart (1 day)");
        assert_eq!(chart.timestamps.len(), 60);
        assert!(chart.series_named("SMA50").is_some());

        assert_eq!(report.latest_price, Some(100.0));
        assert_eq!(report.ratios.get(Ratio::CurrentRatio), RatioValue::Value(2.0));
        assert_eq!(report.ratios.get(Ratio::PriceToEarnings), RatioValue::Value(25.0));

        let calls = prices.calls.lock().unwrap().clone();
        assert!(calls.contains(&(350, SamplingInterval::OneDay)));
        assert!(calls.contains(&(1, SamplingInterval::OneDay)));
        assert_eq!(*statements.limits.lock().unwrap(), vec![120, 120, 120]);
    }

    #[tokio::test]
    async fn test_time_frame_drives_window_and_interval() {
        let prices = Arc::new(MockPrices::new(Ok(sample_bars(5))));
        let controller = DashboardController::new(prices.clone(), Arc::new(good_statements()));

        let mut config = SessionConfig::default();
        config.time_frame = TimeFrame::ThirtyMinutes;
        let report = controller.submit(&config).await;

        assert_eq!(report.time_frame, TimeFrame::ThirtyMinutes);
        assert!(prices
            .calls
            .lock()
            .unwrap()
            .contains(&(10, SamplingInterval::ThirtyMinutes)));
    }

    #[tokio::test]
    async fn test_price_failure_degrades_to_no_chart() {
        let prices = Arc::new(MockPrices::new(Err(AnalysisError::ApiError("boom".to_string()))));
        let controller = DashboardController::new(prices, Arc::new(good_statements()));

        let report = controller.submit(&SessionConfig::default()).await;

        assert!(report.chart.is_none());
        assert!(report.latest_price.is_none());
        assert!(report.notices.iter().any(|n| n.starts_with("No price data")));
        // statement ratios still compute; P/E needs the price
        assert_eq!(report.ratios.get(Ratio::CurrentRatio), RatioValue::Value(2.0));
        assert_eq!(report.ratios.get(Ratio::PriceToEarnings), RatioValue::NotAvailable);
    }

    #[tokio::test]
    async fn test_empty_history_is_no_data() {
        let prices = Arc::new(MockPrices::new(Ok(Vec::new())));
        let controller = DashboardController::new(prices, Arc::new(good_statements()));

        let report = controller.submit(&SessionConfig::default()).await;
        assert!(report.chart.is_none());
        assert!(report.notices.iter().any(|n| n.contains("No price data")));
    }

    #[tokio::test]
    async fn test_statement_failure_isolated_to_its_ratios() {
        let prices = Arc::new(MockPrices::new(Ok(sample_bars(3))));
        let statements = MockStatements {
            balance: Err(AnalysisError::ApiError("rate limited".to_string())),
            ..good_statements()
        };
        let controller = DashboardController::new(prices, Arc::new(statements));

        let report = controller.submit(&SessionConfig::default()).await;

        assert!(report.chart.is_some());
        assert!(report.notices.iter().any(|n| n.contains("balance-sheet-statement")));
        assert_eq!(report.ratios.get(Ratio::CurrentRatio), RatioValue::NotAvailable);
        assert_eq!(report.ratios.get(Ratio::ReturnOnAssets), RatioValue::NotAvailable);
        assert_eq!(report.ratios.get(Ratio::GrossProfitMargin), RatioValue::Value(0.4));
        assert_eq!(report.ratios.get(Ratio::EarningsPerShare), RatioValue::Value(4.0));
    }

    #[tokio::test]
    async fn test_report_carries_indicator_config() {
        let prices = Arc::new(MockPrices::new(Ok(sample_bars(40))));
        let controller = DashboardController::new(prices, Arc::new(good_statements()));

        let mut config = SessionConfig::default();
        config.indicators.show_rsi = true;
        config.indicators.show_macd = true;
        let report = controller.submit(&config).await;

        assert_eq!(report.config, config.indicators);
        let chart = report.chart.unwrap();
        assert!(chart.series_named("RSI").is_some());
        assert!(chart.series_named("MACD Histogram").unwrap().colors.is_some());
    }
}

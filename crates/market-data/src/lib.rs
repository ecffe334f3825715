//! HTTP providers for price history (Yahoo chart API) and financial
//! statements (Financial Modeling Prep).

pub mod fmp;
pub mod yahoo;

pub use fmp::{FmpClient, DEFAULT_FMP_BASE_URL};
pub use yahoo::{YahooChartClient, DEFAULT_YAHOO_CHART_URL};

use analysis_core::AnalysisError;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Shared client for both providers. `None` leaves requests without a timeout.
pub fn build_http_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Send a GET and return the body of a successful response.
async fn fetch_text(request: reqwest::RequestBuilder) -> Result<String, AnalysisError> {
    let response = request
        .send()
        .await
        .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AnalysisError::ApiError(format!(
            "HTTP {}: {}",
            response.status(),
            response.text().await.unwrap_or_default()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| AnalysisError::ApiError(e.to_string()))
}

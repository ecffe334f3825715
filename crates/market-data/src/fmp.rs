use analysis_core::{AnalysisError, StatementKind, StatementProvider, StatementRow, Ticker};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::fetch_text;

pub const DEFAULT_FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Financial statements from Financial Modeling Prep
#[derive(Clone)]
pub struct FmpClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FmpClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl StatementProvider for FmpClient {
    async fn fetch_statement(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
        limit: u32,
    ) -> Result<Vec<StatementRow>, AnalysisError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AnalysisError::ApiError("FMP_API_KEY is not configured".to_string()))?;

        let url = format!("{}/{}/{}", self.base_url, kind.endpoint(), ticker);
        let limit = limit.to_string();
        tracing::debug!(%ticker, statement = kind.endpoint(), %limit, "fetching financial statement");

        let body = fetch_text(
            self.client
                .get(&url)
                .query(&[("limit", limit.as_str()), ("apikey", api_key)]),
        )
        .await?;

        parse_statement_rows(&body)
    }
}

/// Parse a statement response: a JSON array of period objects, most recent first.
pub fn parse_statement_rows(body: &str) -> Result<Vec<StatementRow>, AnalysisError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(fields) => Ok(StatementRow::new(fields)),
                other => Err(AnalysisError::InvalidResponse(format!(
                    "expected statement object, got {}",
                    other
                ))),
            })
            .collect(),
        Value::Object(fields) => {
            let message = fields
                .get("Error Message")
                .and_then(Value::as_str)
                .unwrap_or("unexpected object response");
            Err(AnalysisError::ApiError(message.to_string()))
        }
        other => Err(AnalysisError::InvalidResponse(format!(
            "expected statement array, got {}",
            other
        ))),
    }
}

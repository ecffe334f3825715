use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AnalysisError;

/// Upper-cased stock symbol, the only key a request carries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(raw: &str) -> Result<Self, AnalysisError> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AnalysisError::InvalidTicker(raw.to_string()));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: f64,
}

/// One reporting period of a financial statement, kept as the provider's raw fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementRow(serde_json::Map<String, serde_json::Value>);

impl StatementRow {
    pub fn new(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }

    /// Numeric value of `field`. Numeric strings are accepted; placeholders
    /// such as `"None"` count as missing.
    pub fn number(&self, field: &str) -> Result<f64, AnalysisError> {
        match self.0.get(field) {
            None | Some(serde_json::Value::Null) => Err(AnalysisError::MissingField(field.to_string())),
            Some(serde_json::Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| AnalysisError::NonNumeric(field.to_string())),
            Some(serde_json::Value::String(s)) => {
                let s = s.trim();
                if s.is_empty() || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("nan") {
                    return Err(AnalysisError::MissingField(field.to_string()));
                }
                s.parse::<f64>()
                    .map_err(|_| AnalysisError::NonNumeric(field.to_string()))
            }
            Some(_) => Err(AnalysisError::NonNumeric(field.to_string())),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for StatementRow {
    fn from(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(fields)
    }
}

/// The three statements a ratio computation draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Income,
    BalanceSheet,
    CashFlow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [
        StatementKind::Income,
        StatementKind::BalanceSheet,
        StatementKind::CashFlow,
    ];

    /// Path segment the statements provider uses for this statement
    pub fn endpoint(&self) -> &'static str {
        match self {
            StatementKind::Income => "income-statement",
            StatementKind::BalanceSheet => "balance-sheet-statement",
            StatementKind::CashFlow => "cash-flow-statement",
        }
    }
}

/// Income, balance-sheet and cash-flow rows, index 0 = most recent period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub income: Vec<StatementRow>,
    pub balance: Vec<StatementRow>,
    /// Fetched alongside the others; no ratio currently reads it.
    pub cashflow: Vec<StatementRow>,
}

impl FinancialStatements {
    pub fn get(&self, kind: StatementKind) -> &[StatementRow] {
        match kind {
            StatementKind::Income => &self.income,
            StatementKind::BalanceSheet => &self.balance,
            StatementKind::CashFlow => &self.cashflow,
        }
    }

    /// Most recent row of `kind`, if the statement has any
    pub fn latest(&self, kind: StatementKind) -> Option<&StatementRow> {
        self.get(kind).first()
    }
}

/// Bar spacing requested from the price-history provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplingInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "3h")]
    ThreeHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1mo")]
    OneMonth,
}

impl SamplingInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingInterval::OneMinute => "1m",
            SamplingInterval::ThirtyMinutes => "30m",
            SamplingInterval::OneHour => "1h",
            SamplingInterval::ThreeHours => "3h",
            SamplingInterval::OneDay => "1d",
            SamplingInterval::OneMonth => "1mo",
        }
    }
}

impl fmt::Display for SamplingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use analysis_core::{AnalysisError, FinancialStatements, StatementKind, StatementRow};
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RatioError {
    #[error("No {0:?} statement row available")]
    MissingRow(StatementKind),

    #[error(transparent)]
    Field(#[from] AnalysisError),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Result is not finite")]
    NotFinite,

    #[error("Depends on unavailable {0}")]
    Dependency(Ratio),
}

/// The fixed set of ratios shown in the fundamentals table, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ratio {
    CurrentRatio,
    QuickRatio,
    ReturnOnEquity,
    ReturnOnAssets,
    GrossProfitMargin,
    OperatingProfitMargin,
    NetProfitMargin,
    EarningsPerShare,
    PriceToEarnings,
}

impl Ratio {
    pub const ALL: [Ratio; 9] = [
        Ratio::CurrentRatio,
        Ratio::QuickRatio,
        Ratio::ReturnOnEquity,
        Ratio::ReturnOnAssets,
        Ratio::GrossProfitMargin,
        Ratio::OperatingProfitMargin,
        Ratio::NetProfitMargin,
        Ratio::EarningsPerShare,
        Ratio::PriceToEarnings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Ratio::CurrentRatio => "Current Ratio",
            Ratio::QuickRatio => "Quick Ratio",
            Ratio::ReturnOnEquity => "Return on Equity (ROE)",
            Ratio::ReturnOnAssets => "Return on Assets (ROA)",
            Ratio::GrossProfitMargin => "Gross Profit Margin",
            Ratio::OperatingProfitMargin => "Operating Profit Margin",
            Ratio::NetProfitMargin => "Net Profit Margin",
            Ratio::EarningsPerShare => "Earnings Per Share (EPS)",
            Ratio::PriceToEarnings => "Price to Earnings (P/E) Ratio",
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A computed ratio or the "not available" marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatioValue {
    Value(f64),
    NotAvailable,
}

impl RatioValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RatioValue::Value(v) => Some(*v),
            RatioValue::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, RatioValue::Value(_))
    }
}

impl fmt::Display for RatioValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatioValue::Value(v) => write!(f, "{}", v),
            RatioValue::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for RatioValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RatioValue::Value(v) => serializer.serialize_f64(*v),
            RatioValue::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// One row of the fundamentals table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioRow {
    pub ratio: Ratio,
    pub value: RatioValue,
}

/// Every ratio in [`Ratio::ALL`], each either computed or not available
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RatioSet {
    rows: Vec<RatioRow>,
}

impl RatioSet {
    pub fn get(&self, ratio: Ratio) -> RatioValue {
        self.rows
            .iter()
            .find(|row| row.ratio == ratio)
            .map(|row| row.value)
            .unwrap_or(RatioValue::NotAvailable)
    }

    /// Rows in display order
    pub fn rows(&self) -> &[RatioRow] {
        &self.rows
    }

    pub fn available_count(&self) -> usize {
        self.rows.iter().filter(|row| row.value.is_available()).count()
    }
}

fn latest(statements: &FinancialStatements, kind: StatementKind) -> Result<&StatementRow, RatioError> {
    statements.latest(kind).ok_or(RatioError::MissingRow(kind))
}

fn divide(numerator: f64, denominator: f64) -> Result<f64, RatioError> {
    if denominator == 0.0 {
        return Err(RatioError::DivisionByZero);
    }
    finite(numerator / denominator)
}

fn finite(value: f64) -> Result<f64, RatioError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RatioError::NotFinite)
    }
}

pub fn current_ratio(statements: &FinancialStatements) -> Result<f64, RatioError> {
    let balance = latest(statements, StatementKind::BalanceSheet)?;
    divide(
        balance.number("totalCurrentAssets")?,
        balance.number("totalCurrentLiabilities")?,
    )
}

pub fn quick_ratio(statements: &FinancialStatements) -> Result<f64, RatioError> {
    let balance = latest(statements, StatementKind::BalanceSheet)?;
    divide(
        balance.number("totalCurrentAssets")? - balance.number("inventory")?,
        balance.number("totalCurrentLiabilities")?,
    )
}

pub fn return_on_equity(statements: &FinancialStatements) -> Result<f64, RatioError> {
    let income = latest(statements, StatementKind::Income)?;
    let balance = latest(statements, StatementKind::BalanceSheet)?;
    divide(income.number("netIncome")?, balance.number("totalStockholdersEquity")?)
}

pub fn return_on_assets(statements: &FinancialStatements) -> Result<f64, RatioError> {
    let income = latest(statements, StatementKind::Income)?;
    let balance = latest(statements, StatementKind::BalanceSheet)?;
    divide(income.number("netIncome")?, balance.number("totalAssets")?)
}

pub fn gross_profit_margin(statements: &FinancialStatements) -> Result<f64, RatioError> {
    let income = latest(statements, StatementKind::Income)?;
    divide(income.number("grossProfit")?, income.number("revenue")?)
}

pub fn operating_profit_margin(statements: &FinancialStatements) -> Result<f64, RatioError> {
    let income = latest(statements, StatementKind::Income)?;
    divide(income.number("operatingIncome")?, income.number("revenue")?)
}

pub fn net_profit_margin(statements: &FinancialStatements) -> Result<f64, RatioError> {
    let income = latest(statements, StatementKind::Income)?;
    divide(income.number("netIncome")?, income.number("revenue")?)
}

pub fn earnings_per_share(statements: &FinancialStatements) -> Result<f64, RatioError> {
    let income = latest(statements, StatementKind::Income)?;
    finite(income.number("eps")?)
}

/// P/E from an already-computed EPS; unavailable EPS or price means no P/E.
pub fn price_to_earnings(latest_price: Option<f64>, eps: RatioValue) -> Result<f64, RatioError> {
    let eps = eps
        .as_f64()
        .ok_or(RatioError::Dependency(Ratio::EarningsPerShare))?;
    let price = latest_price.ok_or_else(|| AnalysisError::MissingField("latest price".to_string()))?;
    divide(price, eps)
}

fn settle(ratio: Ratio, result: Result<f64, RatioError>) -> RatioValue {
    match result {
        Ok(value) => RatioValue::Value(value),
        Err(e) => {
            tracing::debug!(ratio = %ratio, error = %e, "ratio not available");
            RatioValue::NotAvailable
        }
    }
}

/// Compute every ratio from the most recent row of each statement.
///
/// Each ratio is evaluated on its own; a failure marks only that ratio as
/// not available. P/E is the one ratio that depends on another (EPS).
pub fn compute_ratios(statements: &FinancialStatements, latest_price: Option<f64>) -> RatioSet {
    let eps = settle(Ratio::EarningsPerShare, earnings_per_share(statements));

    let rows = Ratio::ALL
        .iter()
        .map(|&ratio| {
            let value = match ratio {
                Ratio::CurrentRatio => settle(ratio, current_ratio(statements)),
                Ratio::QuickRatio => settle(ratio, quick_ratio(statements)),
                Ratio::ReturnOnEquity => settle(ratio, return_on_equity(statements)),
                Ratio::ReturnOnAssets => settle(ratio, return_on_assets(statements)),
                Ratio::GrossProfitMargin => settle(ratio, gross_profit_margin(statements)),
                Ratio::OperatingProfitMargin => settle(ratio, operating_profit_margin(statements)),
                Ratio::NetProfitMargin => settle(ratio, net_profit_margin(statements)),
                Ratio::EarningsPerShare => eps,
                Ratio::PriceToEarnings => settle(ratio, price_to_earnings(latest_price, eps)),
            };
            RatioRow { ratio, value }
        })
        .collect();

    RatioSet { rows }
}

use analysis_core::PriceBar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::indicators::*;

pub const BOLLINGER_PERIOD: usize = 10;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST_SPAN: usize = 12;
pub const MACD_SLOW_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;

/// Which indicators to compute for a price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Simple moving-average window lengths
    pub moving_averages: BTreeSet<usize>,
    pub show_bollinger: bool,
    /// Bollinger half-width in standard deviations
    pub std_dev: f64,
    pub show_rsi: bool,
    pub show_macd: bool,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            moving_averages: [10, 25, 50].into_iter().collect(),
            show_bollinger: false,
            std_dev: 2.0,
            show_rsi: false,
            show_macd: false,
        }
    }
}

/// Chart panel a series is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Price,
    Rsi,
    Macd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStyle {
    Line,
    DashedLine,
    Histogram,
}

/// One computed indicator, aligned index-for-index with the input bars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub panel: Panel,
    pub style: SeriesStyle,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    fn new(name: impl Into<String>, panel: Panel, style: SeriesStyle, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            panel,
            style,
            values,
        }
    }

    fn dense(name: impl Into<String>, panel: Panel, style: SeriesStyle, values: Vec<f64>) -> Self {
        Self::new(name, panel, style, values.into_iter().map(Some).collect())
    }
}

/// Compute every indicator `config` enables. Each indicator reads the raw
/// close/adjusted-close columns; nothing is shared between indicators.
pub fn compute_indicators(series: &[PriceBar], config: &IndicatorConfig) -> Vec<IndicatorSeries> {
    let closes: Vec<f64> = series.iter().map(|b| b.close).collect();
    let adjusted: Vec<f64> = series.iter().map(|b| b.adjusted_close).collect();
    let mut out = Vec::new();

    for &window in &config.moving_averages {
        out.push(IndicatorSeries::new(
            format!("SMA{}", window),
            Panel::Price,
            SeriesStyle::Line,
            sma(&closes, window),
        ));
    }

    if config.show_bollinger {
        let bands = bollinger_bands(&closes, BOLLINGER_PERIOD, config.std_dev);
        out.push(IndicatorSeries::new("Bollinger High", Panel::Price, SeriesStyle::DashedLine, bands.upper));
        out.push(IndicatorSeries::new("Bollinger Low", Panel::Price, SeriesStyle::DashedLine, bands.lower));
    }

    if config.show_rsi {
        out.push(IndicatorSeries::new("RSI", Panel::Rsi, SeriesStyle::Line, rsi(&adjusted, RSI_PERIOD)));
    }

    if config.show_macd {
        let result = macd(&adjusted, MACD_FAST_SPAN, MACD_SLOW_SPAN, MACD_SIGNAL_SPAN);
        out.push(IndicatorSeries::dense("MACD", Panel::Macd, SeriesStyle::Line, result.macd_line));
        out.push(IndicatorSeries::dense("Signal", Panel::Macd, SeriesStyle::Line, result.signal_line));
        out.push(IndicatorSeries::dense("MACD Histogram", Panel::Macd, SeriesStyle::Histogram, result.histogram));
    }

    out
}

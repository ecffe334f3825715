use analysis_core::{PriceBar, Ticker};
use chrono::{DateTime, Utc};
use serde::Serialize;
use technical_analysis::{IndicatorConfig, IndicatorSeries, SeriesStyle};

use crate::timeframe::TimeFrame;

pub const CHART_HEIGHT: u32 = 1000;

const NEGATIVE_COLOR: &str = "red";
const POSITIVE_COLOR: &str = "green";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPanel {
    Price,
    Volume,
    Rsi,
    Macd,
}

/// A stacked panel and its share of the chart height
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSpec {
    pub panel: ChartPanel,
    pub height: f64,
}

/// Candlestick columns, aligned with `ChartSpec::timestamps`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Candles {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    #[serde(flatten)]
    pub series: IndicatorSeries,
    /// Per-bar colors, only set for histograms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<&'static str>>,
}

/// Everything the rendering layer needs to draw the multi-panel chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub height: u32,
    pub panels: Vec<PanelSpec>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub candles: Candles,
    pub volume: Vec<f64>,
    pub series: Vec<ChartSeries>,
}

impl ChartSpec {
    pub fn has_panel(&self, panel: ChartPanel) -> bool {
        self.panels.iter().any(|p| p.panel == panel)
    }

    pub fn series_named(&self, name: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.series.name == name)
    }
}

fn panels_for(config: &IndicatorConfig) -> Vec<PanelSpec> {
    let mut panels = vec![
        PanelSpec { panel: ChartPanel::Price, height: 0.5 },
        PanelSpec { panel: ChartPanel::Volume, height: 0.3 },
    ];
    if config.show_rsi {
        panels.push(PanelSpec { panel: ChartPanel::Rsi, height: 0.1 });
    }
    if config.show_macd {
        panels.push(PanelSpec { panel: ChartPanel::Macd, height: 0.1 });
    }
    panels
}

fn histogram_colors(values: &[Option<f64>]) -> Vec<&'static str> {
    values
        .iter()
        .map(|v| match v {
            Some(x) if *x < 0.0 => NEGATIVE_COLOR,
            _ => POSITIVE_COLOR,
        })
        .collect()
}

/// Lay out bars and computed indicators as a chart specification.
pub fn build_chart(
    ticker: &Ticker,
    time_frame: TimeFrame,
    bars: &[PriceBar],
    indicators: Vec<IndicatorSeries>,
    config: &IndicatorConfig,
) -> ChartSpec {
    let candles = Candles {
        open: bars.iter().map(|b| b.open).collect(),
        high: bars.iter().map(|b| b.high).collect(),
        low: bars.iter().map(|b| b.low).collect(),
        close: bars.iter().map(|b| b.close).collect(),
    };

    let series = indicators
        .into_iter()
        .map(|series| {
            let colors = (series.style == SeriesStyle::Histogram).then(|| histogram_colors(&series.values));
            ChartSeries { series, colors }
        })
        .collect();

    ChartSpec {
        title: format!("{} Stock Price Chart ({})", ticker, time_frame.label()),
        height: CHART_HEIGHT,
        panels: panels_for(config),
        timestamps: bars.iter().map(|b| b.timestamp).collect(),
        candles,
        volume: bars.iter().map(|b| b.volume).collect(),
        series,
    }
}

use analysis_core::Ticker;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use technical_analysis::IndicatorConfig;
use thiserror::Error;

use crate::timeframe::TimeFrame;

pub const DEFAULT_TICKER: &str = "AAPL";

/// Moving-average windows a user may select
pub const MOVING_AVERAGE_CHOICES: [usize; 3] = [10, 25, 50];

/// Allowed Bollinger multiplier
pub const STD_DEV_RANGE: RangeInclusive<f64> = 1.0..=5.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Ticker must not be empty")]
    EmptyTicker,

    #[error("Unknown time frame: {0:?}")]
    UnknownTimeFrame(String),

    #[error("Moving average window {0} is not one of 10, 25, 50")]
    MovingAverage(usize),

    #[error("Standard deviation multiplier {0} is outside 1.0..=5.0")]
    StdDevOutOfRange(f64),
}

/// Everything a submission needs; lives for the whole session so a
/// configuration change can re-render without re-entering the ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ticker: Ticker,
    pub time_frame: TimeFrame,
    pub indicators: IndicatorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ticker: Ticker::parse(DEFAULT_TICKER).expect("default ticker is non-empty"),
            time_frame: TimeFrame::default(),
            indicators: IndicatorConfig::default(),
        }
    }
}

/// Partial change to a [`SessionConfig`]; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub ticker: Option<String>,
    pub time_frame: Option<String>,
    pub moving_averages: Option<Vec<usize>>,
    pub show_bollinger: Option<bool>,
    pub std_dev: Option<f64>,
    pub show_rsi: Option<bool>,
    pub show_macd: Option<bool>,
}

impl SessionConfig {
    /// Validate `update` and apply it. Nothing changes when any field is invalid.
    pub fn apply(&mut self, update: ConfigUpdate) -> Result<(), InputError> {
        let ticker = update
            .ticker
            .as_deref()
            .map(|raw| Ticker::parse(raw).map_err(|_| InputError::EmptyTicker))
            .transpose()?;

        let time_frame = update
            .time_frame
            .as_deref()
            .map(str::parse::<TimeFrame>)
            .transpose()?;

        let moving_averages = match update.moving_averages {
            Some(windows) => {
                if let Some(&bad) = windows.iter().find(|w| !MOVING_AVERAGE_CHOICES.contains(w)) {
                    return Err(InputError::MovingAverage(bad));
                }
                Some(windows.into_iter().collect::<BTreeSet<_>>())
            }
            None => None,
        };

        if let Some(std_dev) = update.std_dev {
            if !STD_DEV_RANGE.contains(&std_dev) {
                return Err(InputError::StdDevOutOfRange(std_dev));
            }
        }

        if let Some(ticker) = ticker {
            self.ticker = ticker;
        }
        if let Some(time_frame) = time_frame {
            self.time_frame = time_frame;
        }
        if let Some(moving_averages) = moving_averages {
            self.indicators.moving_averages = moving_averages;
        }
        if let Some(std_dev) = update.std_dev {
            self.indicators.std_dev = std_dev;
        }
        if let Some(show) = update.show_bollinger {
            self.indicators.show_bollinger = show;
        }
        if let Some(show) = update.show_rsi {
            self.indicators.show_rsi = show;
        }
        if let Some(show) = update.show_macd {
            self.indicators.show_macd = show;
        }
        Ok(())
    }

    /// Defaults with `update` applied on top
    pub fn from_update(update: ConfigUpdate) -> Result<Self, InputError> {
        let mut config = Self::default();
        config.apply(update)?;
        Ok(config)
    }
}

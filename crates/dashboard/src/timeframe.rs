use analysis_core::SamplingInterval;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::session::InputError;

/// User-selectable chart time frame; each maps to a fixed history window and
/// sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFrame {
    #[serde(rename = "1 minute")]
    OneMinute,
    #[serde(rename = "30 minutes")]
    ThirtyMinutes,
    #[serde(rename = "1 hour")]
    OneHour,
    #[serde(rename = "3 hour")]
    ThreeHour,
    #[default]
    #[serde(rename = "1 day")]
    OneDay,
    #[serde(rename = "1 month")]
    OneMonth,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 6] = [
        TimeFrame::OneMinute,
        TimeFrame::ThirtyMinutes,
        TimeFrame::OneHour,
        TimeFrame::ThreeHour,
        TimeFrame::OneDay,
        TimeFrame::OneMonth,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeFrame::OneMinute => "1 minute",
            TimeFrame::ThirtyMinutes => "30 minutes",
            TimeFrame::OneHour => "1 hour",
            TimeFrame::ThreeHour => "3 hour",
            TimeFrame::OneDay => "1 day",
            TimeFrame::OneMonth => "1 month",
        }
    }

    /// Days of history requested
    pub fn history_days(&self) -> u32 {
        match self {
            TimeFrame::OneMinute => 1,
            TimeFrame::ThirtyMinutes => 10,
            TimeFrame::OneHour => 20,
            TimeFrame::ThreeHour => 20,
            TimeFrame::OneDay => 350,
            // 30 * 60 days at monthly sampling, kept as-is pending product input
            TimeFrame::OneMonth => 1800,
        }
    }

    pub fn interval(&self) -> SamplingInterval {
        match self {
            TimeFrame::OneMinute => SamplingInterval::OneMinute,
            TimeFrame::ThirtyMinutes => SamplingInterval::ThirtyMinutes,
            TimeFrame::OneHour => SamplingInterval::OneHour,
            TimeFrame::ThreeHour => SamplingInterval::ThreeHours,
            TimeFrame::OneDay => SamplingInterval::OneDay,
            TimeFrame::OneMonth => SamplingInterval::OneMonth,
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeFrame {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TimeFrame::ALL
            .into_iter()
            .find(|tf| tf.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InputError::UnknownTimeFrame(s.to_string()))
    }
}

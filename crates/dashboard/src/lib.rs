//! Dashboard controller: turns a session configuration into a rendered-ready
//! report (chart specification plus ratio table).

pub mod chart;
pub mod controller;
pub mod session;
pub mod timeframe;

pub use chart::{build_chart, Candles, ChartPanel, ChartSeries, ChartSpec, PanelSpec};
pub use controller::{DashboardController, DashboardReport, STATEMENT_ROW_LIMIT};
pub use session::{ConfigUpdate, InputError, SessionConfig, MOVING_AVERAGE_CHOICES, STD_DEV_RANGE};
pub use timeframe::TimeFrame;

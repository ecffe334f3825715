//! Rolling-window primitives. Every function returns a series aligned 1:1
//! with its input; positions inside the warm-up window are `None`.

/// Simple Moving Average over a trailing `period`-bar window
pub fn sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period {
        return result;
    }

    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result[i] = Some(sum / period as f64);
    }
    result
}

/// Rolling sample standard deviation (n - 1 denominator)
pub fn rolling_std(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period < 2 || data.len() < period {
        return result;
    }

    for i in period - 1..data.len() {
        let window = &data[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
        result[i] = Some(variance.sqrt());
    }
    result
}

/// Exponential Moving Average, recursive form seeded with the first value:
/// `ema[0] = x[0]`, `ema[t] = a * x[t] + (1 - a) * ema[t - 1]`, `a = 2 / (span + 1)`.
pub fn ema(data: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || data.is_empty() {
        return vec![];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(data.len());
    result.push(data[0]);

    for i in 1..data.len() {
        let prev = result[i - 1];
        result.push(alpha * data[i] + (1.0 - alpha) * prev);
    }

    result
}

/// Relative Strength Index from simple rolling means of gains and losses.
///
/// Bar 0 has no prior bar and contributes a zero gain and loss, so the first
/// value appears at index `period - 1`. A window with no losses reads 100.
pub fn rsi(data: &[f64], period: usize) -> Vec<Option<f64>> {
    if data.is_empty() {
        return vec![];
    }

    let mut gains = Vec::with_capacity(data.len());
    let mut losses = Vec::with_capacity(data.len());
    gains.push(0.0);
    losses.push(0.0);

    for i in 1..data.len() {
        let change = data[i] - data[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let avg_gain = sma(&gains, period);
    let avg_loss = sma(&losses, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => Some(rsi_from_averages(gain, loss)),
            _ => None,
        })
        .collect()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// MACD (Moving Average Convergence Divergence)
#[derive(Debug, Clone, PartialEq)]
pub struct MacdResult {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(data: &[f64], fast_span: usize, slow_span: usize, signal_span: usize) -> MacdResult {
    let ema_fast = ema(data, fast_span);
    let ema_slow = ema(data, slow_span);
    if ema_fast.is_empty() || ema_slow.is_empty() {
        return MacdResult { macd_line: vec![], signal_line: vec![], histogram: vec![] };
    }

    let macd_line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
    let signal_line = ema(&macd_line, signal_span);
    if signal_line.is_empty() {
        return MacdResult { macd_line: vec![], signal_line: vec![], histogram: vec![] };
    }
    let histogram = macd_line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Bollinger Bands
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn bollinger_bands(data: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    let middle = sma(data, period);
    let deviation = rolling_std(data, period);

    let mut upper = Vec::with_capacity(data.len());
    let mut lower = Vec::with_capacity(data.len());

    for (center, std) in middle.iter().zip(&deviation) {
        match (center, std) {
            (Some(center), Some(std)) => {
                let half_width = std * std_dev;
                upper.push(Some(center + half_width));
                lower.push(Some(center - half_width));
            }
            _ => {
                upper.push(None);
                lower.push(None);
            }
        }
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

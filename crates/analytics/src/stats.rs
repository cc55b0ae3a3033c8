//! Plain numeric helpers over close-price slices.
//!
//! Everything here is a total function: degenerate inputs produce `None` or a
//! non-finite value that the engine later turns into `Metric::Undefined`.

use core_types::PriceSeries;

/// Simple period-over-period returns: `close[i] / close[i-1] - 1`.
pub fn simple_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Mean of the `window` values ending at index `end` (inclusive).
pub fn trailing_mean(values: &[f64], end: usize, window: usize) -> Option<f64> {
    if window == 0 || end >= values.len() || end + 1 < window {
        return None;
    }
    mean(&values[end + 1 - window..=end])
}

/// Regression slope of `y` on `x`: sum of co-deviations over the variance of `x`.
pub fn slope(y: &[f64], x: &[f64]) -> Option<f64> {
    if y.len() != x.len() || x.is_empty() {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;
    let (co, var) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(co, var), (xi, yi)| {
            let dx = xi - mx;
            (co + dx * (yi - my), var + dx * dx)
        });
    if var == 0.0 {
        return None;
    }
    Some(co / var)
}

/// Compound growth rate scaled to `periods_per_year`.
pub fn annualized_growth(closes: &[f64], periods_per_year: f64) -> Option<f64> {
    let (first, last) = (*closes.first()?, *closes.last()?);
    let periods = closes.len().checked_sub(1).filter(|p| *p > 0)?;
    if first <= 0.0 {
        return None;
    }
    Some((last / first).powf(periods_per_year / periods as f64) - 1.0)
}

/// Inner-joins two series on date, returning the paired closes in date order.
pub fn align_closes(asset: &PriceSeries, benchmark: &PriceSeries) -> (Vec<f64>, Vec<f64>) {
    let (a, b) = (asset.bars(), benchmark.bars());
    let (mut i, mut j) = (0, 0);
    let mut left = Vec::new();
    let mut right = Vec::new();
    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                left.push(a[i].close);
                right.push(b[j].close);
                i += 1;
                j += 1;
            }
        }
    }
    (left, right)
}

//! Exponentially weighted moving average.
//!
//! alpha = 2/(span+1), seeded with the first observation:
//! ema[0] = x[0], ema[i] = alpha*x[i] + (1-alpha)*ema[i-1].
//! Every output value is defined; there is no warmup region.

/// Span-based EMA over a raw series. Returns an empty vector for a zero
/// span or empty input.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(ema);

    for &value in &values[1..] {
        ema = value * alpha + ema * (1.0 - alpha);
        out.push(ema);
    }

    out
}

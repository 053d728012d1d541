//! Summary statistics used by the grade summary.
//!
//! Empty inputs never fail: averages, maxima and minima of nothing are 0, and a
//! T-score against an empty or constant population is 50.

pub fn average_int(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<i64>() as f64 / values.len() as f64
}

pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn max_int(values: &[i64]) -> i64 {
    values.iter().copied().max().unwrap_or(0)
}

pub fn min_int(values: &[i64]) -> i64 {
    values.iter().copied().min().unwrap_or(0)
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Population standard deviation.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn t_score(value: f64, population: &[f64]) -> f64 {
    let mean = average(population);
    let sigma = std_dev(population, mean);
    if sigma == 0.0 {
        50.0
    } else {
        (value - mean) / sigma * 10.0 + 50.0
    }
}

pub fn t_score_int(value: i64, population: &[i64]) -> f64 {
    let as_float: Vec<f64> = population.iter().map(|v| *v as f64).collect();
    t_score(value as f64, &as_float)
}

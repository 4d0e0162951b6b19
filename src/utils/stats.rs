//! Column statistics over plain `f64` slices

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population skewness `sqrt(n) * m3 / m2^1.5` with `m_k = sum((x - mean)^k)`.
///
/// Returns `None` for fewer than two values or zero variance, where the third
/// standardized moment is undefined. Variance is judged relative to the
/// magnitude of the values so the result does not depend on their scale.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mu = mean(values)?;

    let (m2, m3) = values.iter().fold((0.0, 0.0), |(m2, m3), &x| {
        let d = x - mu;
        (m2 + d * d, m3 + d * d * d)
    });

    let magnitude: f64 = values.iter().map(|x| x * x).sum();
    if m2 == 0.0 || m2 <= f64::EPSILON * magnitude {
        return None;
    }
    Some((n as f64).sqrt() * m3 / m2.powf(1.5))
}

use crate::error::ViewError;

/// `n` evenly spaced breakpoints from `min` to `max`, both ends included.
pub fn thresholds(min: f64, max: f64, n: usize) -> Result<Vec<f64>, ViewError> {
    if n < 1 {
        return Err(ViewError::InvalidArgument(format!(
            "class count must be at least 1, got {n}"
        )));
    }
    if n == 1 {
        return Ok(vec![min]);
    }

    let step = (max - min) / (n - 1) as f64;
    let mut breakpoints = (0..n).map(|index| min + step * index as f64).collect::<Vec<_>>();
    // Interpolation can drift by an ulp; the top class is pinned to the observed max.
    breakpoints[n - 1] = max;
    Ok(breakpoints)
}

use crate::error::{AppError, AppResult};

/// Min-max rescales `values` onto [0,1], preserving length and order.
///
/// The smallest input maps to 0.0 and the largest to 1.0. A list with no
/// spread (all values equal, including a single element) maps to all 1.0:
/// a list whose distances carry no information is treated as uniformly
/// relevant rather than dividing by zero.
///
/// An empty input is an error: there is no range to scale. Callers that
/// can legitimately see empty lists must guard before calling.
pub fn min_max_normalize(values: &[f64]) -> AppResult<Vec<f64>> {
    if values.is_empty() {
        return Err(AppError::EmptyInput(
            "cannot normalize an empty value list".to_string(),
        ));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return Ok(vec![1.0; values.len()]);
    }

    Ok(values.iter().map(|v| (v - min) / (max - min)).collect())
}

//! Weighted superposition of several filters

use ap_core::{Coefficients, FirError, FirResult};

/// Combine filters into one by weighted summation.
///
/// All inputs are cut to the shortest length (keeping the leading taps;
/// nothing is re-centered). Weights default to equal shares and are
/// normalized to sum to one.
pub fn combine<C: AsRef<[f64]>>(filters: &[C], weights: Option<&[f64]>) -> FirResult<Coefficients> {
    if filters.is_empty() {
        return Err(FirError::EmptyInput);
    }

    let weights = normalized_weights(filters.len(), weights)?;
    let len = filters
        .iter()
        .map(|f| f.as_ref().len())
        .min()
        .unwrap_or(0);

    let longest = filters.iter().map(|f| f.as_ref().len()).max().unwrap_or(0);
    if longest != len {
        log::debug!("combine: truncating {} filters to {} taps", filters.len(), len);
    }

    let mut combined = vec![0.0; len];
    for (filter, w) in filters.iter().zip(&weights) {
        for (acc, c) in combined.iter_mut().zip(&filter.as_ref()[..len]) {
            *acc += w * c;
        }
    }

    Ok(combined)
}

fn normalized_weights(count: usize, weights: Option<&[f64]>) -> FirResult<Vec<f64>> {
    let Some(weights) = weights else {
        return Ok(vec![1.0 / count as f64; count]);
    };

    if weights.len() != count {
        return Err(FirError::WeightCountMismatch {
            filters: count,
            weights: weights.len(),
        });
    }
    if let Some(&bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(FirError::InvalidWeight { weight: bad });
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(FirError::InvalidWeight { weight: total });
    }

    Ok(weights.iter().map(|w| w / total).collect())
}

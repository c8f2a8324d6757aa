use num_traits::Float;

/// Numerically stable softmax
///
/// Shifts by the maximum logit before exponentiating. Returns an empty vector
/// for empty input.
pub fn softmax<F: Float>(logits: &[F]) -> Vec<F> {
    let Some(max) = logits.iter().copied().reduce(F::max) else {
        return Vec::new();
    };

    let exps: Vec<F> = logits.iter().map(|&x| (x - max).exp()).collect();
    let total = exps.iter().fold(F::zero(), |acc, &e| acc + e);

    exps.into_iter().map(|e| e / total).collect()
}

/// Arithmetic mean of a running sum, `None` when nothing was counted
pub fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then_some(sum / count as f64)
}

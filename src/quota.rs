/// Result of filling one category to its target count.
#[derive(Clone, Debug)]
pub struct QuotaFill<T> {
    pub records: Vec<T>,
    /// How many records the generator failed to supply. Zero on a full
    /// fill; the caller must surface anything else as a warning.
    pub shortfall: usize,
}

/// Truncate or pad `real` to exactly `target` records. Real records keep
/// source order and precedence; synthetic records are appended in the
/// order the generator returns them. The generator is asked for exactly
/// the missing count and any surplus it returns is discarded.
pub fn fill_to_quota<T: Clone>(
    real: &[T],
    target: usize,
    generator: impl FnOnce(usize) -> Vec<T>,
) -> QuotaFill<T> {
    if real.len() >= target {
        return QuotaFill {
            records: real[..target].to_vec(),
            shortfall: 0,
        };
    }

    let needed = target - real.len();
    let mut generated = generator(needed);
    generated.truncate(needed);

    let mut records = real.to_vec();
    records.extend(generated);
    QuotaFill {
        shortfall: target - records.len(),
        records,
    }
}

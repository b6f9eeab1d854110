use rand::Rng;

use crate::{ConfigError, Units};

/// Draws `n` positive sizes that add up to exactly `total`.
///
/// Sizes are drawn one after the other. Each draw leaves at least one
/// unit for every size still to come, and the last size takes whatever
/// is left, so early draws tend to be the larger ones.
pub fn generate<R: Rng + ?Sized>(
    n:      usize,
    total:  Units,
    rng:    &mut R,
) -> Result<Vec<Units>, ConfigError> {
    if n == 0 || total < n {
        return Err(ConfigError::UnsplittableTotal { total, count: n });
    }

    let mut res = Vec::with_capacity(n);
    let mut sum = 0;
    for i in 0..n - 1 {
        let still_to_come = n - i - 1;
        let ceiling = total - sum - still_to_come;
        let v = rng.gen_range(1..=ceiling);
        sum += v;
        res.push(v);
    }
    res.push(total - sum);
    debug_assert!(res.iter().all(|&v| v > 0));

    Ok(res)
}

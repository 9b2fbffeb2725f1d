use crate::profile::Band;
use crate::random::{round_to, RandomSource};

/// One bounded random-walk step: `current ± max_step`, clamped to `range`,
/// rounded to one decimal.
pub fn fluctuate<R: RandomSource + ?Sized>(
    current: f64,
    range: Band,
    max_step: f64,
    rng: &mut R,
) -> f64 {
    let delta = rng.uniform(-max_step, max_step);
    round_to(range.clamp(current + delta), 1)
}

//! Integer score arithmetic shared by sessions and aggregation.
//!
//! Both helpers round half up, so 7/9 (77.7…) becomes 78 and 1/2 becomes 50.

/// `round(100 * score / total)`.
///
/// Returns 0 when `total` is 0. `score` above `total` is clamped.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score.min(total));
    let total = u64::from(total);
    let rounded = (200 * score + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

/// Rounded arithmetic mean of percentages, `None` for an empty input.
#[must_use]
pub fn rounded_mean<I>(values: I) -> Option<u8>
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0_u64, 0_u64), |(sum, count), v| (sum + u64::from(v), count + 1));
    if count == 0 {
        return None;
    }
    let rounded = (2 * sum + count) / (2 * count);
    Some(u8::try_from(rounded).unwrap_or(u8::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(7, 9), 78);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
    }

    #[test]
    fn percentage_bounds() {
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(3, 0), 0);
        assert_eq!(percentage(9, 5), 100);
    }

    #[test]
    fn mean_of_best_scores() {
        assert_eq!(rounded_mean([80, 40]), Some(60));
        assert_eq!(rounded_mean([100, 67]), Some(84)); // 83.5
        assert_eq!(rounded_mean([0]), Some(0));
        assert_eq!(rounded_mean(Vec::<u8>::new()), None);
    }
}

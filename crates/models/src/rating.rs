//! Review aggregate arithmetic.
//!
//! A listing stores `(average_rating, review_count)`; each new rating is folded
//! into the stored, already rounded, average.

/// Round to one decimal place, halves away from zero.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Fold rating `r` into an existing aggregate.
///
/// ```
/// use models::rating::fold_rating;
/// assert_eq!(fold_rating(0.0, 0, 4), (4.0, 1));
/// assert_eq!(fold_rating(4.5, 2, 3), (4.0, 3));
/// ```
pub fn fold_rating(average: f64, count: i32, r: i16) -> (f64, i32) {
    let count = count.max(0);
    let total = average * f64::from(count) + f64::from(r);
    let new_count = count + 1;
    (round1(total / f64::from(new_count)), new_count)
}

/// Weighted mean across several `(average, count)` aggregates, as shown on a
/// provider's public page. Returns `(average, total_reviews)`; the average is
/// `0.0` when there are no reviews.
pub fn combine(aggregates: impl IntoIterator<Item = (f64, i32)>) -> (f64, i64) {
    let (sum, total) = aggregates
        .into_iter()
        .fold((0.0_f64, 0_i64), |(sum, total), (avg, count)| {
            let count = count.max(0);
            (sum + avg * f64::from(count), total + i64::from(count))
        });
    if total == 0 {
        return (0.0, 0);
    }
    (round1(sum / total as f64), total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_rating_becomes_the_average() {
        assert_eq!(fold_rating(0.0, 0, 5), (5.0, 1));
    }

    #[test]
    fn folds_onto_rounded_average() {
        // (4.3 * 3 + 5) / 4 = 4.475 -> 4.5
        assert_eq!(fold_rating(4.3, 3, 5), (4.5, 4));
        // (5 + 5 + 4) / 3 = 4.666.. -> 4.7
        let (avg, n) = fold_rating(5.0, 2, 4);
        assert_eq!((avg, n), (4.7, 3));
    }

    #[test]
    fn negative_count_is_treated_as_empty() {
        assert_eq!(fold_rating(3.0, -2, 2), (2.0, 1));
    }

    #[test]
    fn round1_halves_away_from_zero() {
        assert_eq!(round1(2.25), 2.3);
        assert_eq!(round1(2.24), 2.2);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn combine_weights_by_count() {
        // (5 * 1 + 3 * 3) / 4 = 3.5
        assert_eq!(combine([(5.0, 1), (3.0, 3)]), (3.5, 4));
    }

    #[test]
    fn combine_without_reviews_is_zero() {
        assert_eq!(combine([(0.0, 0), (0.0, 0)]), (0.0, 0));
        assert_eq!(combine(Vec::new()), (0.0, 0));
    }
}

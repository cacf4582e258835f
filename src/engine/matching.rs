use uuid::Uuid;

use crate::error::DispatchError;
use crate::models::courier::Courier;

/// Courier-selection policy. Candidates are a snapshot of Free couriers;
/// implementations pick one without mutating anything, deterministically for
/// a given snapshot.
pub trait MatchingStrategy: Send + Sync {
    fn select(&self, candidates: &[Courier]) -> Option<Uuid>;
}

/// Earliest-registered courier wins. Stable and starvation-free: a courier
/// that has been idle longest is never skipped over.
pub struct FirstAvailable;

impl MatchingStrategy for FirstAvailable {
    fn select(&self, candidates: &[Courier]) -> Option<Uuid> {
        candidates
            .iter()
            .min_by_key(|courier| (courier.registered_at, courier.id))
            .map(|courier| courier.id)
    }
}

/// Highest average rating wins; ties fall back to earliest registration.
pub struct RatingBased;

impl MatchingStrategy for RatingBased {
    fn select(&self, candidates: &[Courier]) -> Option<Uuid> {
        candidates
            .iter()
            .max_by(|a, b| {
                a.rating()
                    .total_cmp(&b.rating())
                    .then(b.registered_at.cmp(&a.registered_at))
            })
            .map(|courier| courier.id)
    }
}

pub fn strategy_from_name(name: &str) -> Result<Box<dyn MatchingStrategy>, DispatchError> {
    match name {
        "first_available" => Ok(Box::new(FirstAvailable)),
        "rating_based" => Ok(Box::new(RatingBased)),
        other => Err(DispatchError::Config(format!(
            "unknown matching strategy: {other}, expected first_available/rating_based"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::{FirstAvailable, MatchingStrategy, RatingBased, strategy_from_name};
    use crate::models::courier::Courier;

    fn courier(id_seed: u128, registered_secs_ago: i64, rating: u8, rated: u32) -> Courier {
        let mut courier = Courier::new("test-courier");
        courier.id = Uuid::from_u128(id_seed);
        courier.registered_at = Utc::now() - Duration::seconds(registered_secs_ago);
        courier.rating_sum = u32::from(rating) * rated;
        courier.rating_count = rated;
        courier
    }

    #[test]
    fn first_available_picks_earliest_registration() {
        let veteran = courier(1, 600, 3, 1);
        let rookie = courier(2, 10, 5, 1);

        let picked = FirstAvailable.select(&[rookie, veteran.clone()]);
        assert_eq!(picked, Some(veteran.id));
    }

    #[test]
    fn first_available_returns_none_without_candidates() {
        assert_eq!(FirstAvailable.select(&[]), None);
    }

    #[test]
    fn rating_based_picks_highest_average() {
        let mediocre = courier(1, 600, 3, 4);
        let star = courier(2, 10, 5, 4);

        let picked = RatingBased.select(&[mediocre, star.clone()]);
        assert_eq!(picked, Some(star.id));
    }

    #[test]
    fn rating_based_tie_falls_back_to_earliest_registration() {
        let earlier = courier(1, 600, 4, 2);
        let later = courier(2, 10, 4, 2);

        let picked = RatingBased.select(&[later, earlier.clone()]);
        assert_eq!(picked, Some(earlier.id));
    }

    #[test]
    fn unknown_strategy_name_is_a_config_error() {
        assert!(strategy_from_name("closest_courier").is_err());
        assert!(strategy_from_name("first_available").is_ok());
        assert!(strategy_from_name("rating_based").is_ok());
    }
}

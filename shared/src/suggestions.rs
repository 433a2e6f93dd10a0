//! Candidate selection and ranking.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::models::Restaurant;
use crate::{Error, Result};

/// Drop repeated ids. Order of the result is unspecified.
pub fn dedupe(ids: Vec<String>) -> Vec<String> {
    ids.into_iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}

/// Pick `size` distinct ids at random.
///
/// With `allow_partial` a shortfall yields every available id instead of
/// [`Error::InsufficientCandidates`].
pub fn sample<R: Rng + ?Sized>(
    ids: &[String],
    size: usize,
    allow_partial: bool,
    rng: &mut R,
) -> Result<Vec<String>> {
    if ids.len() < size && !allow_partial {
        return Err(Error::InsufficientCandidates {
            required: size,
            available: ids.len(),
        });
    }

    Ok(ids.choose_multiple(rng, size).cloned().collect())
}

/// Stable sort by rating, highest first.
pub fn rank_by_rating(restaurants: &mut [Restaurant]) {
    restaurants.sort_by(|a, b| b.rating.total_cmp(&a.rating));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn restaurant(id: &str, rating: f64) -> Restaurant {
        Restaurant {
            business_id: id.to_string(),
            name: id.to_string(),
            address: String::new(),
            rating,
            reviews: None,
            cuisine: None,
            zip_code: None,
        }
    }

    #[test]
    fn test_dedupe_same_elements_no_repeats() {
        let input = ids(&["a", "b", "a", "c", "b", "a"]);
        let mut out = dedupe(input.clone());
        out.sort();
        assert_eq!(out, ids(&["a", "b", "c"]));

        let unique: HashSet<_> = out.iter().collect();
        assert_eq!(unique.len(), out.len());
        assert!(out.iter().all(|id| input.contains(id)));
    }

    #[test]
    fn test_sample_exact_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = ids(&["a", "b", "c", "d", "e", "f", "g"]);
        let picked = sample(&pool, 5, false, &mut rng).unwrap();
        assert_eq!(picked.len(), 5);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 5);
        assert!(picked.iter().all(|id| pool.contains(id)));
    }

    #[test]
    fn test_sample_shortfall_is_error() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = sample(&ids(&["a", "b"]), 5, false, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientCandidates {
                required: 5,
                available: 2
            }
        ));
    }

    #[test]
    fn test_sample_shortfall_partial() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut picked = sample(&ids(&["a", "b"]), 5, true, &mut rng).unwrap();
        picked.sort();
        assert_eq!(picked, ids(&["a", "b"]));

        assert!(sample(&[], 5, true, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_rank_descending_and_stable() {
        let mut restaurants = vec![
            restaurant("a", 3.5),
            restaurant("b", 4.5),
            restaurant("c", 4.0),
            restaurant("d", 4.5),
            restaurant("e", 2.0),
        ];
        rank_by_rating(&mut restaurants);

        let order: Vec<&str> = restaurants.iter().map(|r| r.business_id.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "c", "a", "e"]);
        assert!(restaurants.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[test]
    fn test_rank_is_idempotent() {
        let mut restaurants = vec![restaurant("x", 5.0), restaurant("y", 4.0), restaurant("z", 4.0)];
        let before = restaurants.clone();
        rank_by_rating(&mut restaurants);
        assert_eq!(restaurants, before);
    }
}

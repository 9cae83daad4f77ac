//! Uniform random draws over the dialogue entities.
//!
//! Topics, answers and both insert kinds are all "a piece of text plus maybe a
//! topic". [`Payload`] exposes that text, and [`pick`] draws one item uniformly
//! from any slice of such items with an injected random source.

use crate::store::{Answer, GroupInsert, SingleInsert, Topic};
use rand::seq::SliceRandom;
use rand::Rng;

/// An entity carrying a textual payload.
pub trait Payload {
    fn payload(&self) -> &str;
}

impl Payload for Topic {
    fn payload(&self) -> &str {
        self.as_str()
    }
}

impl Payload for Answer {
    fn payload(&self) -> &str {
        &self.text
    }
}

impl Payload for SingleInsert {
    fn payload(&self) -> &str {
        &self.word
    }
}

impl Payload for GroupInsert {
    fn payload(&self) -> &str {
        &self.words
    }
}

/// Draws one element uniformly at random.
///
/// # Arguments
///
/// * `items` - Candidates; every element is equally likely.
/// * `rng` - Random source. Tests inject a seeded `StdRng`.
///
/// # Returns
///
/// * `Some(&T)` - The drawn element.
/// * `None` - If `items` is empty.
pub fn pick<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
    T: Payload,
    R: Rng + ?Sized,
{
    items.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn inserts(words: &[&str]) -> Vec<SingleInsert> {
        words
            .iter()
            .map(|w| SingleInsert {
                word: w.to_string(),
                topic: Topic::from("t"),
            })
            .collect()
    }

    #[test]
    fn test_pick_from_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Vec<Answer> = Vec::new();
        assert!(pick(&empty, &mut rng).is_none());
    }

    #[test]
    fn test_pick_reaches_every_element() {
        let pool = inserts(&["вдало", "класно", "чудово"]);
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<&str> = (0..200)
            .filter_map(|_| pick(&pool, &mut rng))
            .map(|i| i.payload())
            .collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_pick_is_deterministic_for_a_seed() {
        let pool = inserts(&["a", "b", "c", "d", "e"]);
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| pick(&pool, &mut rng).unwrap().payload().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(9), draw(9));
    }
}

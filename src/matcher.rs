use rayon::prelude::*;
use std::fmt;

use crate::distance::levenshtein;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub word: String,
    pub distance: usize,
}

/// The `k` closest dictionary entries to one token, ascending by distance.
///
/// Every slot starts empty, which ranks as an infinite distance. A new entry
/// only displaces a slot whose distance is strictly greater, so on ties the
/// entry seen first in the dictionary keeps its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    token: String,
    slots: Vec<Option<Suggestion>>,
}

impl Candidates {
    pub fn empty(token: &str, k: usize) -> Self {
        Candidates {
            token: token.to_string(),
            slots: vec![None; k],
        }
    }

    /// Scans `words` in order and keeps the best `k` by edit distance.
    pub fn rank<S: AsRef<str>>(token: &str, words: &[S], k: usize) -> Self {
        let mut candidates = Self::empty(token, k);
        for word in words {
            let word = word.as_ref();
            candidates.offer(word, levenshtein(token, word));
        }
        candidates
    }

    fn offer(&mut self, word: &str, distance: usize) {
        let position = self.slots.iter().position(|slot| match slot {
            Some(current) => current.distance > distance,
            None => true,
        });
        if let Some(idx) = position {
            self.slots.pop();
            self.slots.insert(
                idx,
                Some(Suggestion {
                    word: word.to_string(),
                    distance,
                }),
            );
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn slots(&self) -> &[Option<Suggestion>] {
        &self.slots
    }

    /// Filled slots only, best first.
    pub fn suggestions(&self) -> impl Iterator<Item = &Suggestion> {
        self.slots.iter().flatten()
    }

    pub fn best(&self) -> Option<&Suggestion> {
        self.slots.first().and_then(Option::as_ref)
    }

    /// True when the token itself is in the dictionary.
    pub fn is_exact_match(&self) -> bool {
        self.suggestions()
            .any(|s| s.distance == 0 && s.word == self.token)
    }
}

/// Renders the `MATCHES:` listing, e.g. `cat (0), bat (1), - (-)`.
impl fmt::Display for Candidates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, slot) in self.slots.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            match slot {
                Some(s) => write!(f, "{} ({})", s.word, s.distance)?,
                None => write!(f, "- (-)")?,
            }
        }
        Ok(())
    }
}

/// Ranks every token against the same word snapshot.
///
/// One task is spawned per token and the call returns only once all of them
/// have finished. Results come back in token order.
pub fn match_tokens<T, S>(tokens: &[T], words: &[S], k: usize) -> Vec<Candidates>
where
    T: AsRef<str> + Sync,
    S: AsRef<str> + Sync,
{
    let mut results: Vec<Candidates> = tokens
        .iter()
        .map(|token| Candidates::empty(token.as_ref(), k))
        .collect();

    rayon::scope(|scope| {
        for (token, out) in tokens.iter().zip(results.iter_mut()) {
            scope.spawn(move |_| {
                *out = Candidates::rank(token.as_ref(), words, k);
            });
        }
    });

    results
}

/// Data-parallel variant for callers that do not need one task per token.
pub fn rank_all<S: AsRef<str> + Sync>(tokens: &[String], words: &[S], k: usize) -> Vec<Candidates> {
    tokens
        .par_iter()
        .map(|token| Candidates::rank(token, words, k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_takes_first_slot() {
        let dict = words(&["cat", "bat", "rat", "hat", "mat", "cats"]);
        let candidates = Candidates::rank("cat", &dict, 5);

        assert_eq!(
            candidates.best(),
            Some(&Suggestion {
                word: "cat".to_string(),
                distance: 0
            })
        );
        assert!(candidates.is_exact_match());
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let dict = words(&["cat", "bat", "rat", "hat", "mat", "cats"]);
        let candidates = Candidates::rank("cat", &dict, 5);

        // "cats" is also at distance 1 but arrives after four others
        let ranked: Vec<&str> = candidates.suggestions().map(|s| s.word.as_str()).collect();
        assert_eq!(ranked, vec!["cat", "bat", "rat", "hat", "mat"]);
    }

    #[test]
    fn test_exact_match_outranks_earlier_entries() {
        let dict = words(&["bat", "rat", "hat", "mat", "sat", "cat"]);
        let candidates = Candidates::rank("cat", &dict, 5);

        assert_eq!(candidates.best().map(|s| s.word.as_str()), Some("cat"));
        assert_eq!(candidates.slots().len(), 5);
        assert!(candidates.is_exact_match());
    }

    #[test]
    fn test_slots_sorted_ascending() {
        let dict = words(&["zebra", "spelling", "spilling", "selling", "speling", "smelling"]);
        let candidates = Candidates::rank("speling", &dict, 5);

        let distances: Vec<usize> = candidates.suggestions().map(|s| s.distance).collect();
        let mut sorted = distances.clone();
        sorted.sort();
        assert_eq!(distances, sorted);
        assert_eq!(distances[0], 0);
    }

    #[test]
    fn test_small_dictionary_leaves_empty_slots() {
        let dict = words(&["cat", "dog"]);
        let candidates = Candidates::rank("cot", &dict, 5);

        assert_eq!(candidates.slots().len(), 5);
        assert_eq!(candidates.suggestions().count(), 2);
        assert!(candidates.slots()[2..].iter().all(Option::is_none));
        assert!(!candidates.is_exact_match());
        assert_eq!(
            candidates.to_string(),
            "cat (1), dog (2), - (-), - (-), - (-)"
        );
    }

    #[test]
    fn test_empty_dictionary() {
        let dict: Vec<String> = Vec::new();
        let candidates = Candidates::rank("anything", &dict, 5);

        assert!(candidates.best().is_none());
        assert!(!candidates.is_exact_match());
    }

    #[test]
    fn test_match_tokens_preserves_order() {
        let dict = words(&["the", "cat", "sat", "on", "mat"]);
        let tokens = words(&["sat", "teh", "cat"]);
        let results = match_tokens(&tokens, &dict, 3);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].token(), "sat");
        assert_eq!(results[1].token(), "teh");
        assert_eq!(results[2].token(), "cat");
        assert!(results[0].is_exact_match());
        assert!(!results[1].is_exact_match());
        assert!(results[2].is_exact_match());
    }

    #[test]
    fn test_match_tokens_agrees_with_rank_all() {
        let dict = words(&["spelling", "corrected", "selling", "spilling", "correct"]);
        let tokens = words(&["speling", "corected", "xyz"]);

        assert_eq!(match_tokens(&tokens, &dict, 5), rank_all(&tokens, &dict, 5));
    }

    #[test]
    fn test_match_tokens_no_tokens() {
        let dict = words(&["cat"]);
        let tokens: Vec<String> = Vec::new();
        assert!(match_tokens(&tokens, &dict, 5).is_empty());
    }
}

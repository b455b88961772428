//! Keyword validation guard.
//!
//! Vector similarity alone is noisy on a small catalog with short queries;
//! the guard drops candidates that do not lexically relate to the stated
//! need and promotes exact name matches.

use crate::catalog::RetrievalCandidate;
use crate::core::config::GuardConfig;

pub struct KeywordGuard {
    keywords: Vec<String>,
}

impl KeywordGuard {
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            keywords: config.keywords.clone(),
        }
    }

    /// First vocabulary keyword appearing in the lower-cased query, scanned
    /// in priority order.
    pub fn extract_keyword(&self, query: &str) -> Option<&str> {
        let lowered = query.to_lowercase();
        self.keywords
            .iter()
            .find(|keyword| lowered.contains(keyword.as_str()))
            .map(|keyword| keyword.as_str())
    }

    /// Filter and re-rank candidates against the extracted keyword.
    ///
    /// Without a keyword the guard is a no-op and trusts the similarity
    /// ranking. With one, only candidates mentioning it in name or
    /// description survive; name matches form the first tier, description
    /// matches the second, each tier keeping its incoming order. An empty
    /// result means "no products", never an error.
    pub fn validate(
        &self,
        query: &str,
        candidates: Vec<RetrievalCandidate>,
    ) -> Vec<RetrievalCandidate> {
        let Some(keyword) = self.extract_keyword(query) else {
            return candidates;
        };

        let mut name_matches = Vec::new();
        let mut description_matches = Vec::new();

        for candidate in candidates {
            let haystack =
                format!("{} {}", candidate.item.name, candidate.item.description).to_lowercase();
            if !haystack.contains(keyword) {
                continue;
            }

            if candidate.item.name.to_lowercase().contains(keyword) {
                name_matches.push(candidate);
            } else {
                description_matches.push(candidate);
            }
        }

        name_matches.extend(description_matches);
        name_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;

    fn guard() -> KeywordGuard {
        KeywordGuard::new(&GuardConfig::default())
    }

    fn candidate(id: i64, name: &str, description: &str, distance: f32) -> RetrievalCandidate {
        RetrievalCandidate {
            item: CatalogItem {
                id,
                name: name.to_string(),
                price: 10.0,
                description: description.to_string(),
                category: "Misc".to_string(),
            },
            distance,
        }
    }

    #[test]
    fn keyword_extraction_respects_priority_order() {
        let guard = guard();
        assert_eq!(guard.extract_keyword("need new shoes"), Some("shoe"));
        // "shoe" comes before "sneaker" in the vocabulary.
        assert_eq!(guard.extract_keyword("shoes or sneakers?"), Some("shoe"));
        assert_eq!(guard.extract_keyword("Show me sneakers"), Some("sneaker"));
        assert_eq!(guard.extract_keyword("any headphones?"), None);
    }

    #[test]
    fn no_keyword_means_untouched_order() {
        let guard = guard();
        let candidates = vec![
            candidate(1, "Desk Lamp", "warm light", 0.1),
            candidate(2, "Office Chair", "ergonomic", 0.2),
        ];

        let result = guard.validate("something for my desk", candidates.clone());
        assert_eq!(result, candidates);
    }

    #[test]
    fn filters_out_lexical_mismatches() {
        let guard = guard();
        let candidates = vec![
            candidate(1, "Red Sneaker", "running sneaker", 0.1),
            candidate(2, "Gaming Laptop", "fast machine", 0.15),
        ];

        let result = guard.validate("Show me sneakers", candidates);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item.name, "Red Sneaker");
    }

    #[test]
    fn name_matches_precede_description_matches_stably() {
        let guard = guard();
        let candidates = vec![
            candidate(1, "Trail Runner", "lightweight sneaker", 0.05),
            candidate(2, "Street Sneaker", "classic", 0.10),
            candidate(3, "Gym Trainer", "a sneaker for lifting", 0.15),
            candidate(4, "Canvas Sneaker", "casual", 0.20),
        ];

        let result = guard.validate("looking for a sneaker", candidates);
        let names: Vec<&str> = result.iter().map(|c| c.item.name.as_str()).collect();

        // Name tier in incoming order, then description tier in incoming order.
        assert_eq!(
            names,
            vec!["Street Sneaker", "Canvas Sneaker", "Trail Runner", "Gym Trainer"]
        );
    }

    #[test]
    fn wiping_every_candidate_is_an_empty_result() {
        let guard = guard();
        let candidates = vec![candidate(1, "Gaming Laptop", "fast machine", 0.1)];

        let result = guard.validate("got any coffee?", candidates);
        assert!(result.is_empty());
    }
}

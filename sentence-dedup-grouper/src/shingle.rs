use std::collections::HashSet;

/// Lower-cases `text`, splits it on whitespace, and collects the distinct
/// windows of `k` consecutive tokens, each joined by a single space. A text
/// with fewer than `k` tokens yields an empty set.
pub fn shingles(text: &str, k: usize) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if k == 1 {
        return words.into_iter().map(str::to_owned).collect();
    }
    if words.len() < k {
        return HashSet::new();
    }
    words.windows(k).map(|window| window.join(" ")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unigrams_are_distinct_tokens() {
        let set = shingles("the cat and the hat", 1);
        assert_eq!(set.len(), 4);
        assert!(set.contains("the"));
        assert!(set.contains("hat"));
    }

    #[test]
    fn bigrams_slide_one_token_at_a_time() {
        let set = shingles("The cat sat", 2);
        let expected: HashSet<String> = ["the cat", "cat sat"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn repeated_windows_collapse() {
        assert_eq!(shingles("ha ha ha ha", 2).len(), 1);
    }

    #[test]
    fn too_few_tokens_yield_an_empty_set() {
        assert!(shingles("solo", 2).is_empty());
        assert!(shingles("", 1).is_empty());
    }

    #[test]
    fn token_count_equal_to_k_yields_one_shingle() {
        let set = shingles("two words", 2);
        assert_eq!(set.len(), 1);
        assert!(set.contains("two words"));
    }
}

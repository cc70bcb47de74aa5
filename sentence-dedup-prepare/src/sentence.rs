/// First-person subject words; a sentence containing one reads as a personal
/// statement rather than a reusable product claim and is dropped.
const SUBJECT_WORDS: [&str; 10] = [
    "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves",
];

/// Splits review text into sentences. Clause punctuation and newlines are
/// normalized to periods, then the text is split on periods and trimmed,
/// dropping empty pieces.
pub fn split_sentences(text: &str) -> Vec<String> {
    let normalized: String = text
        .chars()
        .map(|c| match c {
            ':' | ',' | '?' | '!' | '\n' => '.',
            other => other,
        })
        .collect();
    normalized
        .split('.')
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(str::to_owned)
        .collect()
}

/// True when any whitespace-delimited word of the lower-cased sentence is a
/// first-person subject word. Contractions like "i'm" do not match.
pub fn has_subject_word(sentence: &str) -> bool {
    sentence
        .to_lowercase()
        .split_whitespace()
        .any(|word| SUBJECT_WORDS.contains(&word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_punctuation_becomes_sentence_breaks() {
        let sentences = split_sentences("Great phone! Fast shipping, well packed.\nWould buy again");
        assert_eq!(
            sentences,
            vec!["Great phone", "Fast shipping", "well packed", "Would buy again"]
        );
    }

    #[test]
    fn question_marks_and_colons_also_split() {
        let sentences = split_sentences("Worth it? Yes: every penny");
        assert_eq!(sentences, vec!["Worth it", "Yes", "every penny"]);
    }

    #[test]
    fn empty_pieces_are_dropped() {
        assert!(split_sentences("...!!!").is_empty());
        assert_eq!(split_sentences("  solid value  "), vec!["solid value"]);
    }

    #[test]
    fn first_person_sentences_are_flagged() {
        assert!(has_subject_word("I love this blender"));
        assert!(has_subject_word("works great for us"));
        assert!(has_subject_word("that one is MINE"));
        assert!(!has_subject_word("works great for everyone"));
        assert!(!has_subject_word("imagine the possibilities"));
    }
}

//! Edit-distance metrics for comparing OCR output against references.

/// Levenshtein distance between two token sequences.
pub fn levenshtein<T: PartialEq>(reference: &[T], hypothesis: &[T]) -> usize {
    if reference.is_empty() {
        return hypothesis.len();
    }
    if hypothesis.is_empty() {
        return reference.len();
    }

    let mut previous: Vec<usize> = (0..=hypothesis.len()).collect();
    let mut current = vec![0usize; hypothesis.len() + 1];

    for (i, r) in reference.iter().enumerate() {
        current[0] = i + 1;
        for (j, h) in hypothesis.iter().enumerate() {
            let substitution = previous[j] + usize::from(r != h);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[hypothesis.len()]
}

/// Character error rate: character edit distance over reference length.
///
/// An empty reference scores 0.0 against an empty hypothesis and 1.0
/// against anything else.
pub fn cer(reference: &str, hypothesis: &str) -> f64 {
    let reference: Vec<char> = reference.chars().collect();
    let hypothesis: Vec<char> = hypothesis.chars().collect();

    if reference.is_empty() {
        return if hypothesis.is_empty() { 0.0 } else { 1.0 };
    }

    levenshtein(&reference, &hypothesis) as f64 / reference.len() as f64
}

/// Word error rate over whitespace-separated tokens.
///
/// Same empty-reference conventions as [`cer`].
pub fn wer(reference: &str, hypothesis: &str) -> f64 {
    let reference: Vec<&str> = reference.split_whitespace().collect();
    let hypothesis: Vec<&str> = hypothesis.split_whitespace().collect();

    if reference.is_empty() {
        return if hypothesis.is_empty() { 0.0 } else { 1.0 };
    }

    levenshtein(&reference, &hypothesis) as f64 / reference.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_classic() {
        let kitten: Vec<char> = "kitten".chars().collect();
        let sitting: Vec<char> = "sitting".chars().collect();
        assert_eq!(levenshtein(&kitten, &sitting), 3);
    }

    #[test]
    fn test_levenshtein_identical() {
        let text: Vec<char> = "invoice".chars().collect();
        assert_eq!(levenshtein(&text, &text), 0);
    }

    #[test]
    fn test_levenshtein_empty_sides() {
        let text: Vec<char> = "abc".chars().collect();
        assert_eq!(levenshtein(&text, &[]), 3);
        assert_eq!(levenshtein(&[], &text), 3);
        assert_eq!(levenshtein::<char>(&[], &[]), 0);
    }

    #[test]
    fn test_cer_single_deletion() {
        assert_eq!(cer("hello", "helo"), 0.2);
    }

    #[test]
    fn test_cer_exact_match() {
        assert_eq!(cer("Invoice ID: INV/20111209-22", "Invoice ID: INV/20111209-22"), 0.0);
    }

    #[test]
    fn test_cer_can_exceed_one() {
        assert_eq!(cer("a", "abc"), 2.0);
    }

    #[test]
    fn test_cer_empty_reference() {
        assert_eq!(cer("", ""), 0.0);
        assert_eq!(cer("", "noise"), 1.0);
    }

    #[test]
    fn test_wer_single_substitution() {
        assert_eq!(wer("the quick brown fox", "the quick brown dog"), 0.25);
    }

    #[test]
    fn test_wer_ignores_extra_whitespace() {
        assert_eq!(wer("total 901.80", "total   901.80"), 0.0);
    }

    #[test]
    fn test_wer_empty_reference() {
        assert_eq!(wer("", ""), 0.0);
        assert_eq!(wer("", "some words"), 1.0);
    }
}

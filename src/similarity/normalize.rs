/// Separators that never carry meaning inside a keyword.
const SEPARATORS: [char; 6] = ['-', '_', '\u{00B7}', '\u{2022}', '\u{30FB}', '\u{2027}'];

const HANGUL_SYLLABLES: std::ops::RangeInclusive<char> = '\u{AC00}'..='\u{D7A3}';

/// Canonical comparison form of a keyword.
///
/// Lower-cases, drops whitespace and word separators, then keeps only Hangul
/// syllables, ASCII letters and ASCII digits. "돼지 꿈", "돼지-꿈" and "돼지꿈"
/// all normalize to "돼지꿈".
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !SEPARATORS.contains(c))
        .filter(|&c| is_comparable(c))
        .collect()
}

fn is_comparable(c: char) -> bool {
    HANGUL_SYLLABLES.contains(&c) || c.is_ascii_lowercase() || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::space("돼지 꿈", "돼지꿈")]
    #[case::hyphen("돼지-꿈", "돼지꿈")]
    #[case::underscore("돼지_꿈", "돼지꿈")]
    #[case::middle_dot("돼지·꿈", "돼지꿈")]
    #[case::bullet("돼지•꿈", "돼지꿈")]
    #[case::katakana_dot("돼지・꿈", "돼지꿈")]
    #[case::ascii_upper("Snake Dream", "snakedream")]
    #[case::digits("로또 1등 꿈", "로또1등꿈")]
    #[case::punctuation("뱀꿈?!", "뱀꿈")]
    #[case::jamo_dropped("ㅋㅋ뱀꿈", "뱀꿈")]
    #[case::non_ascii_letters("Café", "caf")]
    #[case::empty("", "")]
    #[case::only_separators(" - _ · ", "")]
    fn normalize_strips_cosmetic_variation(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    // Normalizing twice must not change anything further.
    #[rstest]
    #[case("돼지 꿈")]
    #[case("  Tiger-DREAM 2024 ")]
    #[case("용•꿈_해몽")]
    #[case("")]
    fn normalize_is_idempotent(#[case] input: &str) {
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }
}

//! Degenerate-output detection for best-effort search answers.
//!
//! Sonar occasionally returns looping text; rather than stream garbage
//! into the chat, the handler swaps it for the fallback apology.

/// Window length for the substring repetition check.
const WINDOW: usize = 10;

/// Only the head of long answers is scanned; loops show up early.
const SCAN_LIMIT: usize = 2000;

/// True when the text looks like a repetition loop: any 10-character
/// substring that occurs again later, or the same word three or more
/// times in a row.
pub fn has_repeating_pattern(text: &str) -> bool {
    let scan: String = text.chars().take(SCAN_LIMIT).collect();
    let chars: Vec<char> = scan.chars().collect();

    if chars.len() >= WINDOW * 2 {
        for start in 0..=chars.len().saturating_sub(WINDOW * 2) {
            let window: String = chars[start..start + WINDOW].iter().collect();
            let rest: String = chars[start + WINDOW..].iter().collect();
            if rest.contains(&window) {
                return true;
            }
        }
    }

    let mut run = 1;
    let mut previous: Option<&str> = None;
    for word in scan.split_whitespace() {
        if previous == Some(word) {
            run += 1;
            if run >= 3 {
                return true;
            }
        } else {
            run = 1;
        }
        previous = Some(word);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_ten_char_substring_is_detected() {
        let text = "abcdefghijabcdefghij";
        assert!(has_repeating_pattern(text));
    }

    #[test]
    fn triple_word_run_is_detected() {
        assert!(has_repeating_pattern("výsledek výsledek výsledek"));
    }

    #[test]
    fn normal_prose_passes() {
        let text = "Praha je hlavní město České republiky a žije v ní přes milion obyvatel.";
        assert!(!has_repeating_pattern(text));
    }

    #[test]
    fn short_text_passes() {
        assert!(!has_repeating_pattern("krátké"));
    }
}

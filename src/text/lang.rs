//! Request language detection and canned fallback strings.
//!
//! The frontend usually sends an explicit `language` field; when it is
//! absent, a diacritics/keyword heuristic distinguishes Czech, Romanian
//! and English.

/// Languages the assistant answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Czech,
    Romanian,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Czech => "cs",
            Language::Romanian => "ro",
            Language::English => "en",
        }
    }

    /// Apology substituted for failed best-effort search answers.
    pub fn search_apology(&self) -> &'static str {
        match self {
            Language::Czech => {
                "Omlouvám se, vyhledávání se nezdařilo. Zkuste to prosím za chvíli znovu."
            }
            Language::Romanian => {
                "Îmi pare rău, căutarea a eșuat. Vă rugăm să încercați din nou în câteva momente."
            }
            Language::English => {
                "I'm sorry, the search didn't go through. Please try again in a moment."
            }
        }
    }

    /// Notification shown while grounded search runs.
    pub fn search_notice(&self) -> &'static str {
        match self {
            Language::Czech => "Vyhledávám aktuální informace...",
            Language::Romanian => "Caut informații actuale...",
            Language::English => "Searching for current information...",
        }
    }
}

/// Resolve the language from an explicit code or by inspecting `text`.
pub fn detect_language(explicit: Option<&str>, text: &str) -> Language {
    match explicit.map(|c| c.trim().to_ascii_lowercase()) {
        Some(code) if code.starts_with("cs") => return Language::Czech,
        Some(code) if code.starts_with("ro") => return Language::Romanian,
        Some(code) if code.starts_with("en") => return Language::English,
        _ => {}
    }

    if text.chars().any(|c| "ăâîșțĂÂÎȘȚ".contains(c)) {
        return Language::Romanian;
    }
    if text.chars().any(|c| "ěščřžýůĚŠČŘŽÝŮ".contains(c)) {
        return Language::Czech;
    }

    let lower = text.to_lowercase();
    for word in ["jak", "proč", "kde", "kdy", "prosím"] {
        if lower.split_whitespace().any(|w| w == word) {
            return Language::Czech;
        }
    }
    for word in ["ce", "cum", "unde", "când"] {
        if lower.split_whitespace().any(|w| w == word) {
            return Language::Romanian;
        }
    }

    Language::English
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_code_wins_over_text() {
        assert_eq!(detect_language(Some("cs"), "hello there"), Language::Czech);
        assert_eq!(detect_language(Some("ro-RO"), "ahoj"), Language::Romanian);
    }

    #[test]
    fn czech_diacritics_are_recognized() {
        assert_eq!(
            detect_language(None, "Jaké je počasí v Praze?"),
            Language::Czech
        );
    }

    #[test]
    fn romanian_diacritics_are_recognized() {
        assert_eq!(
            detect_language(None, "Care este vremea în București?"),
            Language::Romanian
        );
    }

    #[test]
    fn plain_ascii_defaults_to_english() {
        assert_eq!(
            detect_language(None, "what is the weather"),
            Language::English
        );
    }
}

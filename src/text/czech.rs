//! Czech speech preprocessing for TTS.
//!
//! The TTS voices read digits, times and percent signs poorly in Czech,
//! so numeric constructs are expanded to words before synthesis. Order
//! matters: times, then decimals, then percentages, then ordinals, and
//! plain integers last so the earlier rules see the original digits.

use std::sync::OnceLock;

use regex::{Captures, Regex};

const UNITS: [&str; 10] = [
    "nula", "jedna", "dva", "tři", "čtyři", "pět", "šest", "sedm", "osm", "devět",
];
const TEENS: [&str; 10] = [
    "deset",
    "jedenáct",
    "dvanáct",
    "třináct",
    "čtrnáct",
    "patnáct",
    "šestnáct",
    "sedmnáct",
    "osmnáct",
    "devatenáct",
];
const TENS: [&str; 10] = [
    "", "", "dvacet", "třicet", "čtyřicet", "padesát", "šedesát", "sedmdesát", "osmdesát",
    "devadesát",
];
const ORDINALS: [&str; 13] = [
    "", "první", "druhý", "třetí", "čtvrtý", "pátý", "šestý", "sedmý", "osmý", "devátý",
    "desátý", "jedenáctý", "dvanáctý",
];

/// Cardinal number in words, supported up to the hundreds of millions.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return UNITS[0].to_string();
    }
    if n >= 1_000_000_000 {
        // Out of the practical TTS range; read digits as-is upstream.
        return n.to_string();
    }

    let mut parts: Vec<String> = Vec::new();

    let millions = n / 1_000_000;
    if millions > 0 {
        let word = match millions {
            1 => "milion".to_string(),
            2..=4 => format!("{} miliony", number_to_words(millions)),
            _ => format!("{} milionů", number_to_words(millions)),
        };
        parts.push(word);
    }

    let thousands = (n / 1000) % 1000;
    if thousands > 0 {
        let word = match thousands {
            1 => "tisíc".to_string(),
            2..=4 => format!("{} tisíce", number_to_words(thousands)),
            _ => format!("{} tisíc", number_to_words(thousands)),
        };
        parts.push(word);
    }

    let below_thousand = n % 1000;
    if below_thousand > 0 {
        parts.push(under_thousand(below_thousand));
    }

    parts.join(" ")
}

fn under_thousand(n: u64) -> String {
    debug_assert!(n < 1000);
    let mut parts: Vec<String> = Vec::new();

    let hundreds = n / 100;
    if hundreds > 0 {
        parts.push(match hundreds {
            1 => "sto".to_string(),
            2 => "dvě stě".to_string(),
            3 | 4 => format!("{} sta", UNITS[hundreds as usize]),
            _ => format!("{} set", UNITS[hundreds as usize]),
        });
    }

    let rest = n % 100;
    if rest >= 10 && rest < 20 {
        parts.push(TEENS[(rest - 10) as usize].to_string());
    } else {
        let tens = rest / 10;
        let units = rest % 10;
        if tens >= 2 {
            parts.push(TENS[tens as usize].to_string());
        }
        if units > 0 || (rest == 0 && hundreds == 0) {
            parts.push(UNITS[units as usize].to_string());
        }
    }

    parts.join(" ")
}

fn hour_word(h: u64) -> &'static str {
    match h {
        1 => "hodina",
        2..=4 => "hodiny",
        _ => "hodin",
    }
}

fn minute_word(m: u64) -> &'static str {
    match m {
        1 => "minuta",
        2..=4 => "minuty",
        _ => "minut",
    }
}

fn percent_word(n: u64) -> &'static str {
    match n {
        1 => "procento",
        2..=4 => "procenta",
        _ => "procent",
    }
}

fn regexes() -> &'static (Regex, Regex, Regex, Regex, Regex) {
    static RE: OnceLock<(Regex, Regex, Regex, Regex, Regex)> = OnceLock::new();
    RE.get_or_init(|| {
        (
            // These patterns are static literals and always compile.
            Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap(),
            Regex::new(r"\b(\d+),(\d+)\b").unwrap(),
            Regex::new(r"\b(\d+)\s*%").unwrap(),
            Regex::new(r"\b(\d{1,2})\.(\s|$)").unwrap(),
            Regex::new(r"\b\d+\b").unwrap(),
        )
    })
}

/// Expand digits, times, percentages, decimals and small ordinals into
/// Czech words.
pub fn expand_for_speech(text: &str) -> String {
    let (time_re, decimal_re, percent_re, ordinal_re, number_re) = regexes();

    let text = time_re.replace_all(text, |c: &Captures| {
        let hours: u64 = c[1].parse().unwrap_or(0);
        let minutes: u64 = c[2].parse().unwrap_or(0);
        if minutes == 0 {
            format!("{} {}", number_to_words(hours), hour_word(hours))
        } else {
            format!(
                "{} {} {} {}",
                number_to_words(hours),
                hour_word(hours),
                number_to_words(minutes),
                minute_word(minutes)
            )
        }
    });

    let text = decimal_re.replace_all(&text, |c: &Captures| {
        let whole: u64 = c[1].parse().unwrap_or(0);
        let frac: u64 = c[2].parse().unwrap_or(0);
        format!("{} celá {}", number_to_words(whole), number_to_words(frac))
    });

    let text = percent_re.replace_all(&text, |c: &Captures| {
        let n: u64 = c[1].parse().unwrap_or(0);
        format!("{} {}", number_to_words(n), percent_word(n))
    });

    let text = ordinal_re.replace_all(&text, |c: &Captures| {
        let n: u64 = c[1].parse().unwrap_or(0);
        let word = if (n as usize) < ORDINALS.len() {
            ORDINALS[n as usize].to_string()
        } else {
            number_to_words(n)
        };
        // The trailing separator is part of the match and is restored.
        format!("{}{}", word, &c[2])
    });

    let text = number_re.replace_all(&text, |c: &Captures| {
        let n: u64 = c[0].parse().unwrap_or(0);
        number_to_words(n)
    });

    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinals_compose_hundreds_tens_units() {
        assert_eq!(number_to_words(123), "sto dvacet tři");
        assert_eq!(number_to_words(0), "nula");
        assert_eq!(number_to_words(15), "patnáct");
        assert_eq!(number_to_words(42), "čtyřicet dva");
        assert_eq!(number_to_words(200), "dvě stě");
        assert_eq!(number_to_words(2024), "dva tisíce dvacet čtyři");
        assert_eq!(number_to_words(1_000_000), "milion");
    }

    #[test]
    fn times_expand_with_plural_forms() {
        assert_eq!(
            expand_for_speech("sraz v 14:30"),
            "sraz v čtrnáct hodin třicet minut"
        );
        assert_eq!(expand_for_speech("v 1:00"), "v jedna hodina");
    }

    #[test]
    fn percentages_expand_before_plain_numbers() {
        assert_eq!(expand_for_speech("sleva 50 %"), "sleva padesát procent");
        assert_eq!(expand_for_speech("o 2%"), "o dva procenta");
    }

    #[test]
    fn decimal_comma_reads_as_cela() {
        assert_eq!(expand_for_speech("3,5 km"), "tři celá pět km");
    }

    #[test]
    fn small_ordinals_use_ordinal_words() {
        assert_eq!(expand_for_speech("skončil 3. v cíli"), "skončil třetí v cíli");
    }

    #[test]
    fn plain_integers_are_expanded() {
        assert_eq!(expand_for_speech("má 123 bodů"), "má sto dvacet tři bodů");
    }

    #[test]
    fn text_without_digits_is_untouched() {
        let text = "Příliš žluťoučký kůň úpěl ďábelské ódy";
        assert_eq!(expand_for_speech(text), text);
    }
}

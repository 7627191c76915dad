//! Heuristic language detection.
//!
//! Scoring: each matched marker word/phrase contributes its own length,
//! so longer markers weigh more, plus a fixed bonus when the language's
//! function-word pattern matches. A language is selected only when its
//! score strictly beats every competitor AND clears the absolute floor;
//! ties and weak scores are indeterminate so callers never overwrite an
//! existing preference on ambiguous input.

use std::sync::LazyLock;

use regex::Regex;

/// Inputs shorter than this are always indeterminate.
pub const MIN_TEXT_LEN: usize = 3;

/// A score must strictly exceed this to count as confident.
pub const SCORE_FLOOR: usize = 3;

/// Bonus added when the function-word pattern matches.
const FUNCTION_WORD_BONUS: usize = 4;

/// Single-word markers are matched against whole words; phrases (with a
/// space) are matched as substrings.
struct Profile {
    code: &'static str,
    markers: &'static [&'static str],
    function_words: &'static LazyLock<Regex>,
}

static ID_FUNCTION_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(yang|dan|di|ke|dari|untuk|dengan|ini|itu|ada|juga)\b").unwrap()
});

static EN_FUNCTION_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(the|a|an|is|are|was|of|to|and|in|it|my)\b").unwrap()
});

const ID_MARKERS: &[&str] = &[
    "halo",
    "selamat pagi",
    "selamat siang",
    "selamat sore",
    "selamat malam",
    "apa kabar",
    "terima kasih",
    "makasih",
    "tolong",
    "bantuan",
    "bagaimana",
    "kenapa",
    "mengapa",
    "berapa",
    "dimana",
    "di mana",
    "kapan",
    "siapa",
    "tidak",
    "belum",
    "sudah",
    "bisa",
    "boleh",
    "mau",
    "ingin",
    "saya",
    "kamu",
    "anda",
    "kita",
    "silakan",
    "maaf",
    "jam buka",
    "harga",
];

const EN_MARKERS: &[&str] = &[
    "hello",
    "hi there",
    "good morning",
    "good afternoon",
    "good evening",
    "how are you",
    "thank you",
    "thanks",
    "please",
    "help",
    "what",
    "why",
    "how much",
    "where",
    "when",
    "who",
    "cannot",
    "can you",
    "could you",
    "would",
    "want",
    "need",
    "sorry",
    "opening hours",
    "price",
];

const PROFILES: &[Profile] = &[
    Profile {
        code: "id",
        markers: ID_MARKERS,
        function_words: &ID_FUNCTION_WORDS,
    },
    Profile {
        code: "en",
        markers: EN_MARKERS,
        function_words: &EN_FUNCTION_WORDS,
    },
];

/// Detect the language of `text`.
///
/// Returns the winning language code, or `None` when the input is too
/// short, no language clears the confidence floor, or the top scores tie.
pub fn detect(text: &str) -> Option<&'static str> {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_TEXT_LEN {
        return None;
    }

    let lowered = trimmed.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut best: Option<(&'static str, usize)> = None;
    let mut tied = false;

    for profile in PROFILES {
        let score = score_profile(profile, &lowered, &words);

        match best {
            Some((_, top)) if score > top => {
                best = Some((profile.code, score));
                tied = false;
            }
            Some((_, top)) if score == top => tied = true,
            None => best = Some((profile.code, score)),
            _ => {}
        }
    }

    match best {
        Some((code, score)) if !tied && score > SCORE_FLOOR => Some(code),
        _ => None,
    }
}

fn score_profile(profile: &Profile, lowered: &str, words: &[&str]) -> usize {
    let mut score = 0;

    for marker in profile.markers {
        let matched = if marker.contains(' ') {
            lowered.contains(marker)
        } else {
            words.contains(marker)
        };
        if matched {
            score += marker.len();
        }
    }

    if profile.function_words.is_match(lowered) {
        score += FUNCTION_WORD_BONUS;
    }

    score
}

//! Porter stemming algorithm implementation.
//!
//! Five rule groups strip plural and participle endings, map double suffixes
//! to single ones, and remove `-ic-`, `-full`, `-ness` and friends once the
//! remaining stem is long enough (its *measure*, the number of
//! vowel-consonant runs).
//!
//! The rules follow the extended variant used by NLTK rather than the 1980
//! paper:
//!
//! - a small table of irregular forms (`dying` → `die`, `news` → `news`)
//! - four-letter `-ies` / `-ied` words keep their `e` (`ties` → `tie`)
//! - a final `y` becomes `i` only after a consonant (`day` stays `day`)
//! - two-letter stems like `on` count as consonant-vowel-consonant, so `one`
//!   keeps its `e`
//! - step 2 also maps `-fulli` and `-lessli`
//!
//! ```
//! use spamkit::analysis::token_filter::stem::Stemmer;
//! use spamkit::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("relational"), "relat");
//! assert_eq!(stemmer.stem("happy"), "happi");
//! assert_eq!(stemmer.stem("today"), "today");
//! ```

use crate::analysis::token_filter::stem::Stemmer;

/// Porter stemming algorithm.
///
/// Words containing anything other than ASCII letters are only lowercased;
/// the normalizer never produces such tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let lowered = word.to_ascii_lowercase();
        if let Some(stem) = irregular_form(&lowered) {
            return stem.to_string();
        }
        if lowered.len() <= 2 || !lowered.bytes().all(|b| b.is_ascii_lowercase()) {
            return lowered;
        }

        let mut word = lowered.into_bytes();
        step1a(&mut word);
        step1b(&mut word);
        step1c(&mut word);
        step2(&mut word);
        step3(&mut word);
        step4(&mut word);
        step5a(&mut word);
        step5b(&mut word);

        // Only ASCII letters were ever written into the buffer.
        String::from_utf8(word).unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

/// Words whose stem is fixed rather than derived.
fn irregular_form(word: &str) -> Option<&'static str> {
    let stem = match word {
        "sky" | "skies" => "sky",
        "dying" => "die",
        "lying" => "lie",
        "tying" => "tie",
        "news" => "news",
        "inning" | "innings" => "inning",
        "outing" | "outings" => "outing",
        "canning" | "cannings" => "canning",
        "howe" => "howe",
        "proceed" => "proceed",
        "exceed" => "exceed",
        "succeed" => "succeed",
        _ => return None,
    };
    Some(stem)
}

/// Condition a stem must meet before its suffix is replaced.
#[derive(Debug, Clone, Copy)]
enum Condition {
    Always,
    PositiveMeasure,
    MeasureAboveOne,
    /// Measure above one and the stem ends in `s` or `t`.
    IonStem,
    /// Positive measure once the `l` of `logi` is counted with the stem.
    LogiStem,
}

impl Condition {
    fn holds(self, stem: &[u8]) -> bool {
        match self {
            Condition::Always => true,
            Condition::PositiveMeasure => measure(stem) > 0,
            Condition::MeasureAboveOne => measure(stem) > 1,
            Condition::IonStem => {
                measure(stem) > 1 && matches!(stem.last(), Some(b's') | Some(b't'))
            }
            Condition::LogiStem => {
                let mut with_l = stem.to_vec();
                with_l.push(b'l');
                measure(&with_l) > 0
            }
        }
    }
}

type Rule = (&'static str, &'static str, Condition);

const STEP1A_RULES: &[Rule] = &[
    ("sses", "ss", Condition::Always),
    ("ies", "i", Condition::Always),
    ("ss", "ss", Condition::Always),
    ("s", "", Condition::Always),
];

const STEP2_RULES: &[Rule] = &[
    ("ational", "ate", Condition::PositiveMeasure),
    ("tional", "tion", Condition::PositiveMeasure),
    ("enci", "ence", Condition::PositiveMeasure),
    ("anci", "ance", Condition::PositiveMeasure),
    ("izer", "ize", Condition::PositiveMeasure),
    ("bli", "ble", Condition::PositiveMeasure),
    ("alli", "al", Condition::PositiveMeasure),
    ("entli", "ent", Condition::PositiveMeasure),
    ("eli", "e", Condition::PositiveMeasure),
    ("ousli", "ous", Condition::PositiveMeasure),
    ("ization", "ize", Condition::PositiveMeasure),
    ("ation", "ate", Condition::PositiveMeasure),
    ("ator", "ate", Condition::PositiveMeasure),
    ("alism", "al", Condition::PositiveMeasure),
    ("iveness", "ive", Condition::PositiveMeasure),
    ("fulness", "ful", Condition::PositiveMeasure),
    ("ousness", "ous", Condition::PositiveMeasure),
    ("aliti", "al", Condition::PositiveMeasure),
    ("iviti", "ive", Condition::PositiveMeasure),
    ("biliti", "ble", Condition::PositiveMeasure),
    ("fulli", "ful", Condition::PositiveMeasure),
    ("lessli", "less", Condition::PositiveMeasure),
    ("logi", "log", Condition::LogiStem),
];

const STEP3_RULES: &[Rule] = &[
    ("icate", "ic", Condition::PositiveMeasure),
    ("ative", "", Condition::PositiveMeasure),
    ("alize", "al", Condition::PositiveMeasure),
    ("iciti", "ic", Condition::PositiveMeasure),
    ("ical", "ic", Condition::PositiveMeasure),
    ("ful", "", Condition::PositiveMeasure),
    ("ness", "", Condition::PositiveMeasure),
];

const STEP4_RULES: &[Rule] = &[
    ("al", "", Condition::MeasureAboveOne),
    ("ance", "", Condition::MeasureAboveOne),
    ("ence", "", Condition::MeasureAboveOne),
    ("er", "", Condition::MeasureAboveOne),
    ("ic", "", Condition::MeasureAboveOne),
    ("able", "", Condition::MeasureAboveOne),
    ("ible", "", Condition::MeasureAboveOne),
    ("ant", "", Condition::MeasureAboveOne),
    ("ement", "", Condition::MeasureAboveOne),
    ("ment", "", Condition::MeasureAboveOne),
    ("ent", "", Condition::MeasureAboveOne),
    ("ion", "", Condition::IonStem),
    ("ou", "", Condition::MeasureAboveOne),
    ("ism", "", Condition::MeasureAboveOne),
    ("ate", "", Condition::MeasureAboveOne),
    ("iti", "", Condition::MeasureAboveOne),
    ("ous", "", Condition::MeasureAboveOne),
    ("ive", "", Condition::MeasureAboveOne),
    ("ize", "", Condition::MeasureAboveOne),
];

/// Apply the first rule whose suffix matches; later rules are not tried
/// even when its condition fails.
fn apply_rules(word: &mut Vec<u8>, rules: &[Rule]) {
    for &(suffix, replacement, condition) in rules {
        if word.ends_with(suffix.as_bytes()) {
            let stem_len = word.len() - suffix.len();
            if condition.holds(&word[..stem_len]) {
                word.truncate(stem_len);
                word.extend_from_slice(replacement.as_bytes());
            }
            return;
        }
    }
}

/// True when `word[i]` is a consonant.
fn is_consonant(word: &[u8], i: usize) -> bool {
    match word[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in `stem`.
fn measure(stem: &[u8]) -> usize {
    (1..stem.len())
        .filter(|&i| is_consonant(stem, i) && !is_consonant(stem, i - 1))
        .count()
}

fn contains_vowel(stem: &[u8]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_double_consonant(word: &[u8]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

/// Consonant-vowel-consonant ending whose last letter is not w, x or y, or
/// a two-letter vowel-consonant word.
fn ends_cvc(word: &[u8]) -> bool {
    let n = word.len();
    if n == 2 {
        return !is_consonant(word, 0) && is_consonant(word, 1);
    }
    n >= 3
        && is_consonant(word, n - 3)
        && !is_consonant(word, n - 2)
        && is_consonant(word, n - 1)
        && !matches!(word[n - 1], b'w' | b'x' | b'y')
}

/// Plurals.
fn step1a(word: &mut Vec<u8>) {
    if word.len() == 4 && word.ends_with(b"ies") {
        word.pop();
        return;
    }
    apply_rules(word, STEP1A_RULES);
}

/// -eed, -ed and -ing.
fn step1b(word: &mut Vec<u8>) {
    if word.ends_with(b"ied") {
        let stem_len = word.len() - 3;
        word.truncate(stem_len);
        let ending: &[u8] = if stem_len == 1 { b"ie" } else { b"i" };
        word.extend_from_slice(ending);
        return;
    }

    if word.ends_with(b"eed") {
        if measure(&word[..word.len() - 3]) > 0 {
            word.pop();
        }
        return;
    }

    let stem_len = ["ed", "ing"].iter().find_map(|suffix| {
        let suffix = suffix.as_bytes();
        let stem_len = word.len().checked_sub(suffix.len())?;
        (word.ends_with(suffix) && contains_vowel(&word[..stem_len])).then_some(stem_len)
    });
    let Some(stem_len) = stem_len else {
        return;
    };
    word.truncate(stem_len);

    if word.ends_with(b"at") || word.ends_with(b"bl") || word.ends_with(b"iz") {
        word.push(b'e');
    } else if ends_double_consonant(word) {
        if !matches!(word.last(), Some(b'l') | Some(b's') | Some(b'z')) {
            word.pop();
        }
    } else if measure(word) == 1 && ends_cvc(word) {
        word.push(b'e');
    }
}

/// Final y to i after a consonant.
fn step1c(word: &mut [u8]) {
    let n = word.len();
    if n > 2 && word[n - 1] == b'y' && is_consonant(word, n - 2) {
        word[n - 1] = b'i';
    }
}

/// Double suffixes to single ones.
fn step2(word: &mut Vec<u8>) {
    // -alli is reduced first and the result goes through the step again.
    if word.ends_with(b"alli") && measure(&word[..word.len() - 4]) > 0 {
        word.truncate(word.len() - 2);
        step2(word);
        return;
    }
    apply_rules(word, STEP2_RULES);
}

/// -ic-, -full, -ness etc.
fn step3(word: &mut Vec<u8>) {
    apply_rules(word, STEP3_RULES);
}

/// Drop -ant, -ence etc. when the remaining stem has measure > 1.
fn step4(word: &mut Vec<u8>) {
    apply_rules(word, STEP4_RULES);
}

/// Remove a final -e when the stem is long enough.
fn step5a(word: &mut Vec<u8>) {
    if word.last() == Some(&b'e') {
        let stem = &word[..word.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            word.pop();
        }
    }
}

/// Reduce -ll to -l when the stem is long enough.
fn step5b(word: &mut Vec<u8>) {
    if word.ends_with(b"ll") && measure(&word[..word.len() - 1]) > 1 {
        word.pop();
    }
}

//! Taxonomy Label Repair
//! Title-casing and `<code>: <description>` label repair.

use regex::Regex;
use std::sync::OnceLock;

static DIGIT_RUN_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_digit_run_regex() -> &'static Regex {
    DIGIT_RUN_REGEX.get_or_init(|| {
        Regex::new(r"\d+").expect("Failed to compile digit run regex")
    })
}

/// Titlecase letters (Unicode category Lt).
fn is_titlecase(c: char) -> bool {
    matches!(
        c,
        '\u{01C5}' | '\u{01C8}' | '\u{01CB}' | '\u{01F2}'
            | '\u{1F88}'..='\u{1F8F}'
            | '\u{1F98}'..='\u{1F9F}'
            | '\u{1FA8}'..='\u{1FAF}'
            | '\u{1FBC}' | '\u{1FCC}' | '\u{1FFC}'
    )
}

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase() || is_titlecase(c)
}

/// Single-character titlecase forms that differ from the uppercase mapping.
fn titlecase_char(c: char) -> Option<char> {
    let mapped = match c {
        '\u{01C4}'..='\u{01C6}' => '\u{01C5}',
        '\u{01C7}'..='\u{01C9}' => '\u{01C8}',
        '\u{01CA}'..='\u{01CC}' => '\u{01CB}',
        '\u{01F1}'..='\u{01F3}' => '\u{01F2}',
        '\u{1F80}'..='\u{1F87}' | '\u{1F90}'..='\u{1F97}' | '\u{1FA0}'..='\u{1FA7}' => {
            char::from_u32(c as u32 + 8)?
        }
        '\u{1FB3}' => '\u{1FBC}',
        '\u{1FC3}' => '\u{1FCC}',
        '\u{1FF3}' => '\u{1FFC}',
        _ if is_titlecase(c) => c,
        _ => return None,
    };
    Some(mapped)
}

/// Push the titlecase form of `c`.
///
/// When the uppercase mapping expands (`ß` to `SS`, `ﬁ` to `FI`) only the
/// first character stays uppercase, so `ß` becomes `Ss`.
fn push_titlecase(c: char, out: &mut String) {
    if let Some(mapped) = titlecase_char(c) {
        out.push(mapped);
        return;
    }
    // U+0149 uppercases to an apostrophe followed by N
    if c == '\u{0149}' {
        out.push_str("\u{02BC}N");
        return;
    }

    let mut upper = c.to_uppercase();
    if let Some(first) = upper.next() {
        out.push(first);
    }
    for rest in upper {
        out.extend(rest.to_lowercase());
    }
}

/// Title-case a string.
///
/// A cased letter is titlecased when it starts the string or follows an
/// uncased character, and lowercased otherwise. Digits and punctuation are
/// uncased, so `"tx04a"` becomes `"Tx04A"`.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_cased = false;

    for c in text.chars() {
        if is_cased(c) {
            if previous_cased {
                result.extend(c.to_lowercase());
            } else {
                push_titlecase(c, &mut result);
            }
            previous_cased = true;
        } else {
            result.push(c);
            previous_cased = false;
        }
    }

    result
}

/// Repair a taxonomy label down to its code.
///
/// Returns `None` for an absent or empty label. Otherwise the label is
/// trimmed and title-cased; when it has no colon, one is inserted after the
/// last run of digits. If a colon is present the part before the first colon
/// is returned, else the title-cased label is returned unchanged.
pub fn repair_label(label: Option<&str>) -> Option<String> {
    let label = label.filter(|l| !l.is_empty())?;
    let mut converted = title_case(label.trim());

    if !converted.contains(':') {
        if let Some(run) = get_digit_run_regex().find_iter(&converted).last() {
            converted.insert(run.end(), ':');
        }
    }

    match converted.split_once(':') {
        Some((code, _)) => Some(code.trim().to_string()),
        None => Some(converted),
    }
}

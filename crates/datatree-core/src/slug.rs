//! Slug normalization and name validation.
//!
//! A slug is the identifier a node is addressed by. It is derived from a
//! free-form label by transliterating to ASCII, lower-casing, and collapsing
//! every run of non-word characters into a single underscore.

use std::sync::LazyLock;

use compact_str::CompactString;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::TreeError;

/// Maximum length of a slug, in characters.
pub const MAX_SLUG_LEN: usize = 65;

/// Names that would shadow the tree's own operations.
pub const RESERVED_WORDS: &[&str] = &[
    "get_tree",
    "get_data",
    "set_data",
    "get_absolute_url",
    "children_as_dictionary",
];

static SLUG_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,64}$").expect("valid slug grammar"));

static RESERVED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^__[A-Za-z]+__$").expect("valid reserved pattern"));

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("valid non-word pattern"));

/// Letters that have no canonical decomposition but a conventional ASCII spelling.
const TRANSLITERATIONS: &[(char, &str)] = &[
    ('ß', "ss"),
    ('æ', "ae"),
    ('Æ', "AE"),
    ('œ', "oe"),
    ('Œ', "OE"),
    ('ø', "o"),
    ('Ø', "O"),
    ('đ', "d"),
    ('Đ', "D"),
    ('ð', "d"),
    ('Ð', "D"),
    ('ł', "l"),
    ('Ł', "L"),
    ('þ', "th"),
    ('Þ', "Th"),
    ('ı', "i"),
];

/// Best-effort transliteration of `label` to ASCII.
///
/// Accented letters lose their marks; characters with no ASCII spelling are
/// kept and later collapsed by [`slugify`].
pub fn transliterate(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.nfkd().filter(|c| !is_combining_mark(*c)) {
        match TRANSLITERATIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Turn a free-form label into an identifier.
///
/// Never fails. The result is prefixed with an underscore when it would not
/// otherwise match the identifier grammar (for example when it starts with a
/// digit). Over-long labels still produce an over-long slug, which node
/// construction rejects.
pub fn slugify(label: &str) -> String {
    let lowered = transliterate(label).to_lowercase();
    let slug = NON_WORD.replace_all(&lowered, "_").into_owned();
    if is_valid_slug(&slug) {
        slug
    } else {
        format!("_{slug}")
    }
}

/// Check a slug against the identifier grammar.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_GRAMMAR.is_match(slug)
}

/// Check whether a slug is a reserved word or matches the reserved pattern.
pub fn is_reserved(slug: &str) -> bool {
    RESERVED_WORDS.contains(&slug) || RESERVED_PATTERN.is_match(slug)
}

/// Derive the slug for `label` and check that a node may carry it.
pub fn node_name(label: &str) -> Result<CompactString, TreeError> {
    let slug = slugify(label);
    if !is_valid_slug(&slug) {
        return Err(TreeError::InvalidName {
            slug,
            label: label.to_string(),
        });
    }
    if is_reserved(&slug) {
        return Err(TreeError::ReservedName {
            slug,
            label: label.to_string(),
        });
    }
    Ok(CompactString::from(slug))
}

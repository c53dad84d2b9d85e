// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Title casing and separator variants

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::config::NamingConfig;

static INVALID_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[":?*\\/<>|]"#).unwrap());

/// A name in its three separator styles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleVariants {
    /// `My Show`
    pub spaced: String,
    /// `My.Show`
    pub dotted: String,
    /// `My_Show`
    pub underscored: String,
}

impl TitleVariants {
    /// Variants of `name` keeping its case
    pub fn plain(name: &str) -> Self {
        Self::from_clean(INVALID_CHARS_RE.replace_all(name, " ").into_owned())
    }

    fn from_clean(spaced: String) -> Self {
        let dotted = spaced
            .replace(" - ", "-")
            .replace([' ', '_', '(', ')'], ".")
            .replace("..", ".")
            .trim_end_matches('.')
            .to_string();
        let underscored = spaced
            .replace([' ', '.'], "_")
            .replace("__", "_")
            .trim_end_matches('_')
            .to_string();

        Self {
            spaced,
            dotted,
            underscored,
        }
    }
}

/// Title-cases names with configurable exceptions
#[derive(Debug, Clone)]
pub struct TitleCaser {
    /// Whole-word patterns and their forced spelling, lower words first
    exceptions: Vec<(Regex, String)>,
}

impl TitleCaser {
    pub fn new(naming: &NamingConfig) -> Self {
        let exceptions = naming
            .lower_words
            .iter()
            .map(|w| w.to_lowercase())
            .chain(naming.upper_words.iter().map(|w| w.to_uppercase()))
            .filter(|w| !w.trim().is_empty())
            .filter_map(|word| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(word.trim()));
                Regex::new(&pattern).ok().map(|re| (re, word.trim().to_string()))
            })
            .collect();

        Self { exceptions }
    }

    /// Title-case `name`
    pub fn title_case(&self, name: &str) -> String {
        let mut title = capitalize_words(name).replace("'S", "'s");

        for (pattern, word) in &self.exceptions {
            title = pattern.replace_all(&title, NoExpand(word.as_str())).into_owned();
        }

        let mut chars = title.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => title,
        }
    }

    /// Title-cased variants of `name`
    pub fn variants(&self, name: &str) -> TitleVariants {
        let clean = INVALID_CHARS_RE.replace_all(name, " ");
        TitleVariants::from_clean(self.title_case(&clean))
    }
}

/// Upper-case every letter that follows an uncased character, lower-case the rest
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_cased = false;

    for c in text.chars() {
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased && !previous_cased {
            out.extend(c.to_uppercase());
        } else if cased {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        previous_cased = cased;
    }

    out
}

/// Two-digit (`10`) and four-digit (`2010`) decade of a year
pub fn decades(year: &str) -> (String, String) {
    let digits: Vec<char> = year.chars().collect();
    if digits.len() < 3 {
        return (String::new(), String::new());
    }

    let two = format!("{}0", digits[2]);
    let four = format!("{}0", digits[..3].iter().collect::<String>());
    (two, four)
}

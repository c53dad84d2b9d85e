// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Post-inference correction rules
//!
//! Rules run in the order of [`CORRECTION_RULES`]; each one sees the
//! attributes as left by the rules before it.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::inference::{EpisodeNumber, MediaKind, RawAttributes};

/// Year given to episodes that turn out to be movies
pub const UNKNOWN_YEAR: u32 = 1900;

static PAREN_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"..*(\((?:19|20)\d\d\))").unwrap());
static BARE_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"..*((?:19|20)\d\d)").unwrap());

/// Settings the rules depend on
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    /// A year next to a show name belongs to the name
    pub series_year: bool,
}

/// A named correction with its precondition
pub struct CorrectionRule {
    pub name: &'static str,
    applies: fn(&RawAttributes, &RuleContext) -> bool,
    apply: fn(&mut RawAttributes, &RuleContext),
}

impl CorrectionRule {
    pub fn applies(&self, attrs: &RawAttributes, ctx: &RuleContext) -> bool {
        (self.applies)(attrs, ctx)
    }

    pub fn apply(&self, attrs: &mut RawAttributes, ctx: &RuleContext) {
        (self.apply)(attrs, ctx)
    }
}

pub const CORRECTION_RULES: &[CorrectionRule] = &[
    CorrectionRule {
        name: "episode_without_number_is_movie",
        applies: |attrs, _| attrs.kind == Some(MediaKind::Episode) && attrs.episode.is_none(),
        apply: |attrs, _| {
            attrs.kind = Some(MediaKind::Movie);
            attrs.year = Some(UNKNOWN_YEAR);
        },
    },
    CorrectionRule {
        name: "part_is_episode",
        applies: |attrs, _| attrs.kind == Some(MediaKind::Movie) && attrs.part.is_some(),
        apply: |attrs, _| {
            attrs.kind = Some(MediaKind::Episode);
            attrs.episode = attrs.part.map(EpisodeNumber::Single);
        },
    },
    CorrectionRule {
        name: "default_season",
        applies: |attrs, _| attrs.kind == Some(MediaKind::Episode) && attrs.season.is_none(),
        apply: |attrs, _| attrs.season = Some(1),
    },
    CorrectionRule {
        name: "fold_series_year",
        applies: |attrs, ctx| {
            ctx.series_year
                && attrs.kind == Some(MediaKind::Episode)
                && attrs.year.is_some()
                && attrs.season != attrs.year
                && attrs
                    .title
                    .as_deref()
                    .map_or(false, |title| title == remove_year(title))
        },
        apply: |attrs, _| {
            if let (Some(title), Some(year)) = (attrs.title.as_mut(), attrs.year) {
                title.push_str(&format!(" {}", year));
            }
        },
    },
    CorrectionRule {
        name: "strip_series_year",
        applies: |attrs, ctx| {
            !ctx.series_year && attrs.kind == Some(MediaKind::Episode) && attrs.title.is_some()
        },
        apply: |attrs, _| attrs.title = attrs.title.as_deref().map(remove_year),
    },
];

/// Run every rule in order, returning the names of those that fired
pub fn apply_rules(attrs: &mut RawAttributes, ctx: &RuleContext) -> Vec<&'static str> {
    let mut fired = Vec::new();
    for rule in CORRECTION_RULES {
        if rule.applies(attrs, ctx) {
            debug!(rule = rule.name, "Applying correction rule");
            rule.apply(attrs, ctx);
            fired.push(rule.name);
        }
    }
    fired
}

/// Remove a trailing `(YYYY)` or `YYYY` from a title
pub fn remove_year(title: &str) -> String {
    let found = PAREN_YEAR_RE
        .captures(title)
        .or_else(|| BARE_YEAR_RE.captures(title))
        .and_then(|caps| caps.get(1));

    match found {
        Some(year) => {
            debug!("Removing year from series name");
            title.replace(year.as_str(), "").trim().to_string()
        }
        None => title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_YEAR: RuleContext = RuleContext { series_year: true };
    const WITHOUT_YEAR: RuleContext = RuleContext { series_year: false };

    fn episode(title: &str, year: Option<u32>) -> RawAttributes {
        RawAttributes {
            kind: Some(MediaKind::Episode),
            title: Some(title.to_string()),
            year,
            season: Some(1),
            episode: Some(EpisodeNumber::Single(2)),
            ..Default::default()
        }
    }

    #[test]
    fn test_remove_year() {
        assert_eq!(remove_year("Show 2010"), "Show");
        assert_eq!(remove_year("Show (2010)"), "Show");
        assert_eq!(remove_year("Show"), "Show");
        // A leading year is part of the name
        assert_eq!(remove_year("2010"), "2010");
    }

    #[test]
    fn test_episode_without_number_becomes_movie() {
        let mut attrs = RawAttributes {
            kind: Some(MediaKind::Episode),
            title: Some("Show".to_string()),
            season: Some(2),
            year: Some(2010),
            ..Default::default()
        };
        let fired = apply_rules(&mut attrs, &WITH_YEAR);
        assert_eq!(fired, vec!["episode_without_number_is_movie"]);
        assert_eq!(attrs.kind, Some(MediaKind::Movie));
        assert_eq!(attrs.year, Some(UNKNOWN_YEAR));
    }

    #[test]
    fn test_part_becomes_episode_with_default_season() {
        let mut attrs = RawAttributes {
            kind: Some(MediaKind::Movie),
            title: Some("Movie".to_string()),
            part: Some(2),
            ..Default::default()
        };
        let fired = apply_rules(&mut attrs, &WITH_YEAR);
        assert_eq!(fired, vec!["part_is_episode", "default_season"]);
        assert_eq!(attrs.episode, Some(EpisodeNumber::Single(2)));
        assert_eq!(attrs.season, Some(1));
    }

    #[test]
    fn test_year_folds_into_plain_title() {
        let mut attrs = episode("Show", Some(2010));
        apply_rules(&mut attrs, &WITH_YEAR);
        assert_eq!(attrs.title.as_deref(), Some("Show 2010"));
    }

    #[test]
    fn test_year_not_folded_when_title_has_year() {
        let mut attrs = episode("Show 2010", Some(2010));
        apply_rules(&mut attrs, &WITH_YEAR);
        assert_eq!(attrs.title.as_deref(), Some("Show 2010"));

        let mut attrs = episode("Show (2010)", Some(2010));
        apply_rules(&mut attrs, &WITH_YEAR);
        assert_eq!(attrs.title.as_deref(), Some("Show (2010)"));
    }

    #[test]
    fn test_year_not_folded_when_it_is_the_season() {
        let mut attrs = episode("Show", Some(2010));
        attrs.season = Some(2010);
        apply_rules(&mut attrs, &WITH_YEAR);
        assert_eq!(attrs.title.as_deref(), Some("Show"));
    }

    #[test]
    fn test_year_stripped_when_disabled() {
        let mut attrs = episode("Show 2010", Some(2010));
        apply_rules(&mut attrs, &WITHOUT_YEAR);
        assert_eq!(attrs.title.as_deref(), Some("Show"));

        let mut attrs = episode("Show (2010)", None);
        apply_rules(&mut attrs, &WITHOUT_YEAR);
        assert_eq!(attrs.title.as_deref(), Some("Show"));

        let mut attrs = episode("Show", Some(2010));
        apply_rules(&mut attrs, &WITHOUT_YEAR);
        assert_eq!(attrs.title.as_deref(), Some("Show"));
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let names: Vec<_> = CORRECTION_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "episode_without_number_is_movie",
                "part_is_episode",
                "default_season",
                "fold_series_year",
                "strip_series_year",
            ]
        );
    }
}

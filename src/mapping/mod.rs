// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Token mappings for format templates
//!
//! A [`TokenMapping`] is an ordered list of `(token, value)` pairs. The
//! renderer takes the first entry whose token starts at the cursor, so a
//! token must come before every token that is a prefix of it (`%sn` before
//! `%s`, `%0decade` before `%0d`).

pub mod titles;

use tracing::debug;

use crate::classify::Classification;
use crate::config::{MultiEpisodeMode, NamingConfig};
use crate::inference::{EpisodeNumber, RawAttributes};
use crate::normalize::split_extension;

pub use titles::{capitalize_words, decades, TitleCaser, TitleVariants};

/// Ordered token to value table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMapping {
    entries: Vec<(String, String)>,
}

impl TokenMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: &str, value: impl Into<String>) {
        self.entries.push((token.to_string(), value.into()));
    }

    /// Push three tokens bound to the spaced, dotted and underscored variants
    pub fn push_variants(&mut self, tokens: [&str; 3], variants: &TitleVariants) {
        self.push(tokens[0], variants.spaced.as_str());
        self.push(tokens[1], variants.dotted.as_str());
        self.push(tokens[2], variants.underscored.as_str());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value of the first entry for exactly `token`
    pub fn get(&self, token: &str) -> Option<&str> {
        self.iter().find(|(t, _)| *t == token).map(|(_, v)| v)
    }

    /// First entry, in mapping order, whose token `text` starts with
    pub fn match_at(&self, text: &str) -> Option<(&str, &str)> {
        self.iter().find(|(token, _)| text.starts_with(token))
    }
}

/// Where the file came from, for the common tokens
#[derive(Debug, Clone, Copy)]
pub struct MappingSource<'a> {
    /// Base name of the download directory
    pub dir_name: &'a str,
    /// Base name of the video file, with extension
    pub file_name: &'a str,
    pub category: &'a str,
}

/// Build the full mapping for a classified file
pub fn build_mapping(
    classification: Classification,
    attrs: &RawAttributes,
    source: &MappingSource<'_>,
    naming: &NamingConfig,
) -> TokenMapping {
    let caser = TitleCaser::new(naming);
    let mut mapping = TokenMapping::new();

    add_common(&mut mapping, attrs, source, &caser);
    match classification {
        Classification::Series => add_series(&mut mapping, attrs, naming, &caser),
        Classification::Movie | Classification::OtherTv => add_movie(&mut mapping, attrs, &caser),
        Classification::Dated => add_dated(&mut mapping, attrs, &caser),
    }

    debug!(classification = %classification, entries = mapping.len(), "Built token mapping");
    mapping
}

fn words_of(name: &str) -> String {
    name.replace(['-', '.', '_'], " ")
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn number(value: Option<u32>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn padded(value: &str) -> String {
    format!("{:0>2}", value)
}

fn add_common(
    mapping: &mut TokenMapping,
    attrs: &RawAttributes,
    source: &MappingSource<'_>,
    caser: &TitleCaser,
) {
    let (stem, ext) = split_extension(source.file_name);

    for (name, tokens) in [
        (source.dir_name, ["%dn", "%^dn", "%.dn", "%_dn", "%^dN", "%.dN", "%_dN"]),
        (stem, ["%fn", "%^fn", "%.fn", "%_fn", "%^fN", "%.fN", "%_fN"]),
    ] {
        let words = words_of(name);
        let titled = caser.variants(&words);
        let plain = TitleVariants::plain(&words);
        mapping.push(tokens[0], name);
        mapping.push_variants([tokens[1], tokens[2], tokens[3]], &titled);
        mapping.push_variants([tokens[4], tokens[5], tokens[6]], &plain);
    }

    mapping.push("%ext", ext);
    mapping.push("%EXT", ext.to_uppercase());
    mapping.push("%Ext", capitalize_words(ext));

    mapping.push_variants(["%cat", "%.cat", "%_cat"], &caser.variants(source.category));
    mapping.push_variants(["%cAt", "%.cAt", "%_cAt"], &TitleVariants::plain(source.category));

    mapping.push("%qf", text(&attrs.format));
    mapping.push("%qss", text(&attrs.screen_size));
    mapping.push("%qvc", text(&attrs.video_codec));
    mapping.push("%qac", text(&attrs.audio_codec));
    mapping.push("%qah", text(&attrs.audio_channels));
    mapping.push("%qrg", text(&attrs.release_group));
}

fn add_show_name(mapping: &mut TokenMapping, title: &str, caser: &TitleCaser) {
    mapping.push_variants(["%sn", "%s.n", "%s_n"], &caser.variants(title));
    mapping.push_variants(["%sN", "%s.N", "%s_N"], &TitleVariants::plain(title));
}

fn add_year(mapping: &mut TokenMapping, year: &str) {
    let (decade, decade_four) = decades(year);
    mapping.push("%y", year);
    mapping.push("%decade", decade);
    mapping.push("%0decade", decade_four);
}

/// `%e` and `%0e` for one or several episodes
fn episode_numbers(episode: Option<&EpisodeNumber>, naming: &NamingConfig) -> (String, String) {
    let numbers = match episode {
        Some(EpisodeNumber::Multiple(list)) if list.len() > 1 => list.clone(),
        Some(episode) => {
            let single = episode.numbers().first().map(u32::to_string).unwrap_or_default();
            let padded_single = padded(&single);
            return (single, padded_single);
        }
        None => return (String::new(), padded("")),
    };

    let picked: Vec<String> = match naming.multiple_episodes {
        MultiEpisodeMode::Range => [numbers.first(), numbers.last()]
            .into_iter()
            .flatten()
            .map(u32::to_string)
            .collect(),
        MultiEpisodeMode::List => numbers.iter().map(u32::to_string).collect(),
    };

    let plain = picked.join(&naming.episode_separator);
    let zero = picked
        .iter()
        .map(|n| padded(n))
        .collect::<Vec<_>>()
        .join(&naming.episode_separator);
    (plain, zero)
}

fn add_series(
    mapping: &mut TokenMapping,
    attrs: &RawAttributes,
    naming: &NamingConfig,
    caser: &TitleCaser,
) {
    add_show_name(mapping, text(&attrs.title), caser);

    let season = number(attrs.season);
    mapping.push("%0s", padded(&season));
    mapping.push("%s", season);

    let episode_title = text(&attrs.episode_title);
    if episode_title.is_empty() {
        for token in ["%en", "%e.n", "%e_n", "%eN", "%e.N", "%e_N"] {
            mapping.push(token, "");
        }
    } else {
        mapping.push_variants(["%en", "%e.n", "%e_n"], &caser.variants(episode_title));
        mapping.push_variants(["%eN", "%e.N", "%e_N"], &TitleVariants::plain(episode_title));
    }

    let (episode, episode_padded) = episode_numbers(attrs.episode.as_ref(), naming);
    mapping.push("%e", episode);
    mapping.push("%0e", episode_padded);

    add_year(mapping, &number(attrs.year));
}

fn add_titles(mapping: &mut TokenMapping, title: &str, caser: &TitleCaser) {
    let titled = caser.variants(title);
    let plain = TitleVariants::plain(title);

    mapping.push_variants(["%title", "%.title", "%_title"], &titled);
    mapping.push_variants(["%tT", "%t.T", "%t_T"], &plain);
    mapping.push_variants(["%t", "%.t", "%_t"], &titled);
    add_show_name(mapping, title, caser);
}

fn add_movie(mapping: &mut TokenMapping, attrs: &RawAttributes, caser: &TitleCaser) {
    add_titles(mapping, text(&attrs.title), caser);
    add_year(mapping, &number(attrs.year));
    mapping.push("%imdb", text(&attrs.imdb));
    mapping.push("%cpimdb", text(&attrs.cp_imdb));
}

fn add_dated(mapping: &mut TokenMapping, attrs: &RawAttributes, caser: &TitleCaser) {
    use chrono::Datelike;

    add_titles(mapping, text(&attrs.title), caser);

    for token in ["%desc", "%.desc", "%_desc"] {
        mapping.push(token, "");
    }

    let date = attrs.date;
    let year = date.map(|d| d.year().to_string()).unwrap_or_default();
    let month = date.map(|d| d.month().to_string()).unwrap_or_default();
    let day = date.map(|d| d.day().to_string()).unwrap_or_default();

    mapping.push("%year", year.as_str());
    add_year(mapping, &year);
    mapping.push("%0m", padded(&month));
    mapping.push("%m", month);
    mapping.push("%0d", padded(&day));
    mapping.push("%d", day);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::MediaKind;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const SOURCE: MappingSource<'static> = MappingSource {
        dir_name: "Show.Name.S01E02.720p-GRP",
        file_name: "show.name.s01e02.720p-grp.mkv",
        category: "tv shows",
    };

    fn series(episode: EpisodeNumber) -> RawAttributes {
        RawAttributes {
            kind: Some(MediaKind::Episode),
            title: Some("show name".to_string()),
            season: Some(1),
            episode: Some(episode),
            year: Some(2010),
            ..Default::default()
        }
    }

    fn movie() -> RawAttributes {
        RawAttributes {
            kind: Some(MediaKind::Movie),
            title: Some("the MATRIX".to_string()),
            year: Some(1999),
            imdb: Some("tt0133093".to_string()),
            cp_imdb: Some("cp(tt0133093)".to_string()),
            ..Default::default()
        }
    }

    fn dated() -> RawAttributes {
        RawAttributes {
            kind: Some(MediaKind::Movie),
            title: Some("the daily show".to_string()),
            date: NaiveDate::from_ymd_opt(2014, 3, 5),
            ..Default::default()
        }
    }

    fn all_mappings() -> Vec<TokenMapping> {
        let naming = NamingConfig::default();
        vec![
            build_mapping(Classification::Series, &series(EpisodeNumber::Single(2)), &SOURCE, &naming),
            build_mapping(Classification::Movie, &movie(), &SOURCE, &naming),
            build_mapping(Classification::OtherTv, &movie(), &SOURCE, &naming),
            build_mapping(Classification::Dated, &dated(), &SOURCE, &naming),
        ]
    }

    #[test]
    fn test_longer_tokens_precede_their_prefixes() {
        for mapping in all_mappings() {
            let tokens: Vec<&str> = mapping.iter().map(|(t, _)| t).collect();
            for (i, short) in tokens.iter().enumerate() {
                for long in &tokens[i + 1..] {
                    assert!(
                        !(long.starts_with(short) && long != short),
                        "{} must come before {}",
                        long,
                        short
                    );
                }
            }
        }
    }

    #[test]
    fn test_common_tokens() {
        let mapping = &all_mappings()[0];
        assert_eq!(mapping.get("%dn"), Some("Show.Name.S01E02.720p-GRP"));
        assert_eq!(mapping.get("%^dn"), Some("Show Name S01E02 720P Grp"));
        assert_eq!(mapping.get("%.dN"), Some("Show.Name.S01E02.720p.GRP"));
        assert_eq!(mapping.get("%fn"), Some("show.name.s01e02.720p-grp"));
        assert_eq!(mapping.get("%_fN"), Some("show_name_s01e02_720p_grp"));
        assert_eq!(mapping.get("%ext"), Some(".mkv"));
        assert_eq!(mapping.get("%EXT"), Some(".MKV"));
        assert_eq!(mapping.get("%Ext"), Some(".Mkv"));
        assert_eq!(mapping.get("%cat"), Some("Tv Shows"));
        assert_eq!(mapping.get("%.cAt"), Some("tv.shows"));
        assert_eq!(mapping.get("%qss"), Some(""));
    }

    #[test]
    fn test_series_tokens() {
        let mapping = &all_mappings()[0];
        assert_eq!(mapping.get("%sn"), Some("Show Name"));
        assert_eq!(mapping.get("%s.n"), Some("Show.Name"));
        assert_eq!(mapping.get("%sN"), Some("show name"));
        assert_eq!(mapping.get("%s"), Some("1"));
        assert_eq!(mapping.get("%0s"), Some("01"));
        assert_eq!(mapping.get("%e"), Some("2"));
        assert_eq!(mapping.get("%0e"), Some("02"));
        assert_eq!(mapping.get("%en"), Some(""));
        assert_eq!(mapping.get("%y"), Some("2010"));
        assert_eq!(mapping.get("%decade"), Some("10"));
        assert_eq!(mapping.get("%0decade"), Some("2010"));
    }

    #[test]
    fn test_multi_episode_modes() {
        let attrs = series(EpisodeNumber::Multiple(vec![1, 2, 3]));

        let mut naming = NamingConfig::default();
        naming.episode_separator = "-".to_string();
        naming.multiple_episodes = MultiEpisodeMode::List;
        let mapping = build_mapping(Classification::Series, &attrs, &SOURCE, &naming);
        assert_eq!(mapping.get("%e"), Some("1-2-3"));
        assert_eq!(mapping.get("%0e"), Some("01-02-03"));

        naming.multiple_episodes = MultiEpisodeMode::Range;
        let mapping = build_mapping(Classification::Series, &attrs, &SOURCE, &naming);
        assert_eq!(mapping.get("%0e"), Some("01-03"));

        naming.episode_separator = "-E".to_string();
        let mapping = build_mapping(Classification::Series, &attrs, &SOURCE, &naming);
        assert_eq!(mapping.get("%0e"), Some("01-E03"));
    }

    #[test]
    fn test_movie_tokens() {
        let mapping = &all_mappings()[1];
        assert_eq!(mapping.get("%title"), Some("The Matrix"));
        assert_eq!(mapping.get("%t"), Some("The Matrix"));
        assert_eq!(mapping.get("%.t"), Some("The.Matrix"));
        assert_eq!(mapping.get("%tT"), Some("the MATRIX"));
        assert_eq!(mapping.get("%s_N"), Some("the_MATRIX"));
        assert_eq!(mapping.get("%0decade"), Some("1990"));
        assert_eq!(mapping.get("%imdb"), Some("tt0133093"));
        assert_eq!(mapping.get("%cpimdb"), Some("cp(tt0133093)"));
    }

    #[test]
    fn test_dated_tokens() {
        let mapping = &all_mappings()[3];
        assert_eq!(mapping.get("%sn"), Some("The Daily Show"));
        assert_eq!(mapping.get("%year"), Some("2014"));
        assert_eq!(mapping.get("%y"), Some("2014"));
        assert_eq!(mapping.get("%m"), Some("3"));
        assert_eq!(mapping.get("%0m"), Some("03"));
        assert_eq!(mapping.get("%d"), Some("5"));
        assert_eq!(mapping.get("%0d"), Some("05"));
        assert_eq!(mapping.get("%desc"), Some(""));
    }

    #[test]
    fn test_match_at_uses_mapping_order() {
        let mut mapping = TokenMapping::new();
        mapping.push("%s", "short");
        mapping.push("%sn", "long");
        assert_eq!(mapping.match_at("%sn/x"), Some(("%s", "short")));
        assert_eq!(mapping.match_at("%x"), None);
    }
}

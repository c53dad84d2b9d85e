// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Built-in inference engine for scene-style release names
//!
//! Handles names like:
//! - `Show.Name.S01E02.Pilot.720p.HDTV.x264-GROUP`
//! - `Show.Name.1x02.mkv`, `Show Name - Season 1 Episode 2`
//! - `The.Daily.Show.2014.03.15.720p.WEB-DL`
//! - `Movie.Title.2010.1080p.BluRay.DTS.x264-GROUP`
//!
//! The title is whatever precedes the first recognised marker (episode
//! number, date, year, part or technical tag).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex};
use tracing::debug;

use super::{language, EpisodeNumber, InferenceEngine, InferenceRequest, MediaKind, RawAttributes};
use crate::Result;

static BRACKET_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

// Season/episode patterns, most specific first
static SXXEXX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bs(\d{1,3})[ .]?e(\d{1,4})((?:-?e\d{1,4}|-\d{1,4})*)\b").unwrap()
});
static NXNN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})x(\d{2,3})((?:-?x\d{2,3}|-\d{2,3})*)\b").unwrap()
});
static VERBOSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bseason[ .]?(\d{1,2})[ .\-]*episode[ .]?(\d{1,3})\b").unwrap()
});
static SEASON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:s|season[ .]?)(\d{1,2})\b").unwrap());
static EPISODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:e|ep|episode)[ .]?(\d{1,3})\b").unwrap());
static MORE_EPISODES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(-?)[ex]?(\d+)").unwrap());

static DATE_YMD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:19|20)\d{2})[ .\-](\d{2})[ .\-](\d{2})\b").unwrap()
});
static DATE_DMY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{2})[ .\-](\d{2})[ .\-]((?:19|20)\d{2})\b").unwrap()
});
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());
static PART_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bpart[ .\-]?(\d{1,2}|i{1,3}|iv|vi{0,3}|ix|x)\b").unwrap()
});

// Technical tags
static SCREEN_SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{3,4}[pi]|4k|uhd)\b").unwrap());
static FORMAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(blu-?ray|bd-?rip|br-?rip|bd-?remux|hd-?dvd|hdtv|pdtv|sdtv|web-?dl|web-?rip",
        r"|dvd-?rip|dvd-?r|dvd|hd-?rip|vhs|telesync|screener)\b|\b(WEB|CAM)\b"
    ))
    .unwrap()
});
static VIDEO_CODEC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([xh][ .]?26[45]|hevc|avc|xvid|divx|av1|vp9|mpeg-?2)\b").unwrap()
});
static AUDIO_CODEC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(dts-?hd(?:[ .\-]?ma)?|dts|truehd|atmos|e-?ac-?3|ac-?3|ddp|dd|aac|flac|mp3|opus)",
        r"(?:[ .]?([257][ .][01]))?\b"
    ))
    .unwrap()
});
static AUDIO_CHANNELS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([257][ .][01])(?:ch)?\b").unwrap());
static MISC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(proper|repack|rerip|internal|limited|extended|unrated|uncut|remastered",
        r"|dubbed|subbed|10bit|8bit|directors[ .]?cut)\b"
    ))
    .unwrap()
});
static RELEASE_GROUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-([A-Za-z0-9]+)$").unwrap());

/// Regex-based release name parser
#[derive(Debug, Default, Clone, Copy)]
pub struct SceneNameEngine;

impl SceneNameEngine {
    pub fn new() -> Self {
        Self
    }
}

impl InferenceEngine for SceneNameEngine {
    fn name(&self) -> &'static str {
        "scene"
    }

    fn infer(&self, request: &InferenceRequest<'_>) -> Result<RawAttributes> {
        let normalized = request.name.replace('\\', "/");
        let mut components: Vec<&str> = normalized.split('/').filter(|c| !c.is_empty()).collect();

        let file = match components.pop() {
            Some(file) => file,
            None => return Ok(RawAttributes::default()),
        };

        let mut attrs = parse_component(strip_extension(file), request.detect_languages);

        if !request.filename_only {
            // Directories fill in what the file name lacks, nearest first
            for dir in components.iter().rev() {
                if attrs.title.is_some() {
                    break;
                }
                attrs.merge_missing(parse_component(dir, false));
            }
        }

        attrs.kind = infer_kind(&attrs);

        debug!(
            name = request.name,
            kind = ?attrs.kind,
            title = ?attrs.title,
            season = ?attrs.season,
            episode = ?attrs.episode,
            year = ?attrs.year,
            "Parsed release name"
        );

        Ok(attrs)
    }
}

fn infer_kind(attrs: &RawAttributes) -> Option<MediaKind> {
    if attrs.episode.is_some() || attrs.season.is_some() || attrs.date.is_some() {
        Some(MediaKind::Episode)
    } else if attrs.title.is_some() {
        Some(MediaKind::Movie)
    } else {
        None
    }
}

/// Drop a trailing file extension (`.mkv`, `.nfo`), leaving other dots alone
fn strip_extension(file: &str) -> &str {
    match file.rfind('.') {
        Some(idx) if idx > 0 => {
            let ext = &file[idx + 1..];
            let looks_like_ext = (1..=5).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && ext.chars().any(|c| c.is_ascii_alphabetic());
            if looks_like_ext {
                &file[..idx]
            } else {
                file
            }
        }
        _ => file,
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    fn of(m: Match<'_>) -> Self {
        Self { start: m.start(), end: m.end() }
    }

    fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Parse one path component (a file stem or a directory name)
fn parse_component(text: &str, detect_languages: bool) -> RawAttributes {
    let mut attrs = RawAttributes::default();

    // Same byte length as `text`, so offsets stay comparable
    let mut work = text.replace('_', " ");
    work = BRACKET_TAG_RE
        .replace_all(&work, |caps: &Captures<'_>| " ".repeat(caps[0].len()))
        .into_owned();

    if detect_languages {
        if let Some(idx) = work.rfind('.') {
            if let Some(code) = language::alpha2(&work[idx + 1..]).filter(|_| idx > 0) {
                attrs.subtitle_language = Some(code.to_string());
                work.truncate(idx);
            }
        }
    }

    // Markers end the title; technical spans also end the episode title
    let mut markers: Vec<Span> = Vec::new();

    let episode_span = parse_episode(&work, &mut attrs);
    markers.extend(episode_span);

    let date_span = parse_date(&work, &mut attrs);
    markers.extend(date_span);

    if let Some(caps) = PART_RE.captures(&work) {
        attrs.part = parse_part(&caps[1]);
        markers.extend(caps.get(0).map(Span::of));
    }

    let mut technical: Vec<Span> = Vec::new();
    if let Some(caps) = scan_tag(&SCREEN_SIZE_RE, &work, &mut technical) {
        attrs.screen_size = Some(normalize_screen_size(&caps[1]));
    }
    if let Some(caps) = scan_tag(&FORMAT_RE, &work, &mut technical) {
        let raw = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        attrs.format = Some(normalize_format(raw));
    }
    if let Some(caps) = scan_tag(&VIDEO_CODEC_RE, &work, &mut technical) {
        attrs.video_codec = Some(normalize_video_codec(&caps[1]));
    }
    if let Some(caps) = scan_tag(&AUDIO_CODEC_RE, &work, &mut technical) {
        attrs.audio_codec = Some(normalize_audio_codec(&caps[1]));
        attrs.audio_channels = caps.get(2).map(|m| normalize_channels(m.as_str()));
    }
    if let Some(caps) = scan_tag(&AUDIO_CHANNELS_RE, &work, &mut technical) {
        if attrs.audio_channels.is_none() {
            attrs.audio_channels = Some(normalize_channels(&caps[1]));
        }
    }
    scan_tag(&MISC_RE, &work, &mut technical);
    markers.extend(technical.iter().copied());

    let boundary = markers.iter().map(|s| s.start).min().unwrap_or(work.len());

    // Year: the last one before the first marker, else the first one after it
    let years: Vec<(Span, u32)> = YEAR_RE
        .captures_iter(&work)
        .filter_map(|caps| {
            let m = caps.get(1)?;
            let span = Span::of(m);
            if work[..span.start].trim().is_empty() {
                return None;
            }
            if date_span.map_or(false, |d| d.overlaps(&span))
                || technical.iter().any(|t| t.overlaps(&span))
            {
                return None;
            }
            Some((span, m.as_str().parse().ok()?))
        })
        .collect();
    let year = years
        .iter()
        .filter(|(span, _)| span.start < boundary)
        .last()
        .or_else(|| years.iter().find(|(span, _)| span.start >= boundary))
        .copied();
    if let Some((span, value)) = year {
        attrs.year = Some(value);
        markers.push(span);
    }

    if let Some(caps) = RELEASE_GROUP_RE.captures(&work) {
        if let (Some(whole), Some(group)) = (caps.get(0), caps.get(1)) {
            let follows_marker = markers.iter().any(|s| s.start < whole.start());
            let inside_marker = markers.iter().any(|s| s.contains(whole.start()) || s.contains(group.start()));
            if follows_marker && !inside_marker && group.as_str().chars().any(|c| c.is_alphabetic()) {
                attrs.release_group = Some(group.as_str().to_string());
                markers.push(Span::of(whole));
            }
        }
    }

    let title_end = markers.iter().map(|s| s.start).min().unwrap_or(work.len());
    attrs.title = clean_text(&work[..title_end]);

    if let Some(episode) = episode_span {
        let next = markers
            .iter()
            .map(|s| s.start)
            .filter(|start| *start >= episode.end)
            .min()
            .unwrap_or(work.len());
        if next > episode.end {
            attrs.episode_title = clean_text(&work[episode.end..next])
                .filter(|t| t.chars().any(|c| c.is_alphabetic()));
        }
    }

    attrs
}

/// Record every match of `re` and return the first one's captures
fn scan_tag<'t>(re: &Regex, work: &'t str, spans: &mut Vec<Span>) -> Option<Captures<'t>> {
    spans.extend(re.find_iter(work).map(Span::of));
    re.captures(work)
}

fn number(caps: &Captures<'_>, idx: usize) -> Option<u32> {
    caps.get(idx).and_then(|m| m.as_str().parse().ok())
}

fn parse_episode(work: &str, attrs: &mut RawAttributes) -> Option<Span> {
    if let Some(caps) = SXXEXX_RE.captures(work).or_else(|| NXNN_RE.captures(work)) {
        attrs.season = number(&caps, 1);
        if let Some(first) = number(&caps, 2) {
            let rest = caps.get(3).map_or("", |m| m.as_str());
            attrs.episode = EpisodeNumber::from_list(expand_episodes(first, rest));
        }
        return caps.get(0).map(Span::of);
    }

    if let Some(caps) = VERBOSE_RE.captures(work) {
        attrs.season = number(&caps, 1);
        attrs.episode = number(&caps, 2).map(EpisodeNumber::Single);
        return caps.get(0).map(Span::of);
    }

    if let Some(caps) = SEASON_RE.captures(work) {
        attrs.season = number(&caps, 1);
        return caps.get(0).map(Span::of);
    }

    if let Some(caps) = EPISODE_RE.captures(work) {
        attrs.episode = number(&caps, 1).map(EpisodeNumber::Single);
        return caps.get(0).map(Span::of);
    }

    None
}

/// `E01E02` lists episodes, `E01-E03` / `E01-03` expands a range
fn expand_episodes(first: u32, rest: &str) -> Vec<u32> {
    const MAX_RANGE: u32 = 50;

    let mut episodes = vec![first];
    for caps in MORE_EPISODES_RE.captures_iter(rest) {
        let Some(n) = number(&caps, 2) else { continue };
        let last = episodes.last().copied().unwrap_or(first);
        let is_range = caps.get(1).map_or(false, |m| !m.as_str().is_empty());
        if is_range && n > last && n - last <= MAX_RANGE {
            episodes.extend(last + 1..=n);
        } else {
            episodes.push(n);
        }
    }
    episodes
}

fn parse_date(work: &str, attrs: &mut RawAttributes) -> Option<Span> {
    let ymd = DATE_YMD_RE.captures(work).and_then(|caps| {
        let date = NaiveDate::from_ymd_opt(caps[1].parse().ok()?, number(&caps, 2)?, number(&caps, 3)?)?;
        Some((date, Span::of(caps.get(0)?)))
    });
    let found = ymd.or_else(|| {
        DATE_DMY_RE.captures(work).and_then(|caps| {
            let date = NaiveDate::from_ymd_opt(caps[3].parse().ok()?, number(&caps, 2)?, number(&caps, 1)?)?;
            Some((date, Span::of(caps.get(0)?)))
        })
    });

    found.map(|(date, span)| {
        attrs.date = Some(date);
        span
    })
}

fn parse_part(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse() {
        return Some(n);
    }
    let value = match raw.to_lowercase().as_str() {
        "i" => 1,
        "ii" => 2,
        "iii" => 3,
        "iv" => 4,
        "v" => 5,
        "vi" => 6,
        "vii" => 7,
        "viii" => 8,
        "ix" => 9,
        "x" => 10,
        _ => return None,
    };
    Some(value)
}

/// Turn a raw name fragment into display text
fn clean_text(raw: &str) -> Option<String> {
    let spaced = raw.replace('.', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(|c: char| matches!(c, ' ' | '-' | '(' | '[' | '{' | ',' | '+'));
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn normalize_screen_size(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "4k" | "uhd" => "2160p".to_string(),
        other => other.to_string(),
    }
}

fn normalize_format(raw: &str) -> String {
    let key: String = raw.to_lowercase().chars().filter(|c| *c != '-').collect();
    let name = match key.as_str() {
        "bluray" | "bdrip" | "brrip" | "bdremux" => "BluRay",
        "hddvd" => "HD-DVD",
        "hdtv" => "HDTV",
        "pdtv" => "PDTV",
        "sdtv" => "SDTV",
        "webdl" | "web" => "WEB-DL",
        "webrip" => "WEBRip",
        "dvdrip" | "dvdr" | "dvd" => "DVD",
        "hdrip" => "HDRip",
        "vhs" => "VHS",
        "telesync" => "Telesync",
        "screener" => "Screener",
        "cam" => "Cam",
        _ => return raw.to_string(),
    };
    name.to_string()
}

fn normalize_video_codec(raw: &str) -> String {
    let key: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| *c != '.' && *c != ' ' && *c != '-')
        .collect();
    let name = match key.as_str() {
        "x264" | "h264" | "avc" => "h264",
        "x265" | "h265" | "hevc" => "h265",
        "xvid" => "XviD",
        "divx" => "DivX",
        "av1" => "AV1",
        "vp9" => "VP9",
        "mpeg2" => "Mpeg2",
        _ => return raw.to_string(),
    };
    name.to_string()
}

fn normalize_audio_codec(raw: &str) -> String {
    let key: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let name = match key.as_str() {
        "dtshd" | "dtshdma" => "DTS-HD",
        "dts" => "DTS",
        "truehd" => "TrueHD",
        "atmos" => "Atmos",
        "eac3" | "ddp" => "EAC3",
        "ac3" | "dd" => "AC3",
        "aac" => "AAC",
        "flac" => "FLAC",
        "mp3" => "MP3",
        "opus" => "Opus",
        _ => return raw.to_string(),
    };
    name.to_string()
}

fn normalize_channels(raw: &str) -> String {
    raw.replace(' ', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(name: &str) -> RawAttributes {
        SceneNameEngine::new()
            .infer(&InferenceRequest::path(name))
            .unwrap()
    }

    #[test]
    fn test_series_episode() {
        let attrs = infer("Show.Name.S01E02.720p.mkv");
        assert_eq!(attrs.kind, Some(MediaKind::Episode));
        assert_eq!(attrs.title.as_deref(), Some("Show Name"));
        assert_eq!(attrs.season, Some(1));
        assert_eq!(attrs.episode, Some(EpisodeNumber::Single(2)));
        assert_eq!(attrs.screen_size.as_deref(), Some("720p"));
        assert_eq!(attrs.episode_title, None);
    }

    #[test]
    fn test_episode_title_and_tags() {
        let attrs = infer("Show.Name.S02E05.The.Big.Day.1080p.WEB-DL.DD5.1.H.264-GROUP.mkv");
        assert_eq!(attrs.title.as_deref(), Some("Show Name"));
        assert_eq!(attrs.episode_title.as_deref(), Some("The Big Day"));
        assert_eq!(attrs.screen_size.as_deref(), Some("1080p"));
        assert_eq!(attrs.format.as_deref(), Some("WEB-DL"));
        assert_eq!(attrs.video_codec.as_deref(), Some("h264"));
        assert_eq!(attrs.audio_codec.as_deref(), Some("AC3"));
        assert_eq!(attrs.audio_channels.as_deref(), Some("5.1"));
        assert_eq!(attrs.release_group.as_deref(), Some("GROUP"));
    }

    #[test]
    fn test_multi_episode_forms() {
        assert_eq!(
            infer("Show.S01E01E02E03.mkv").episode,
            Some(EpisodeNumber::Multiple(vec![1, 2, 3]))
        );
        assert_eq!(
            infer("Show.S01E01-E03.mkv").episode,
            Some(EpisodeNumber::Multiple(vec![1, 2, 3]))
        );
        assert_eq!(
            infer("Show.S01E04-06.mkv").episode,
            Some(EpisodeNumber::Multiple(vec![4, 5, 6]))
        );
    }

    #[test]
    fn test_alternative_episode_forms() {
        let attrs = infer("Show Name 3x07 Something.avi");
        assert_eq!(attrs.season, Some(3));
        assert_eq!(attrs.episode, Some(EpisodeNumber::Single(7)));
        assert_eq!(attrs.episode_title.as_deref(), Some("Something"));

        let attrs = infer("Show_Name_Season_2_Episode_4.mp4");
        assert_eq!(attrs.title.as_deref(), Some("Show Name"));
        assert_eq!(attrs.season, Some(2));
        assert_eq!(attrs.episode, Some(EpisodeNumber::Single(4)));
    }

    #[test]
    fn test_movie_with_year() {
        let attrs = infer("Movie.Title.2010.mkv");
        assert_eq!(attrs.kind, Some(MediaKind::Movie));
        assert_eq!(attrs.title.as_deref(), Some("Movie Title"));
        assert_eq!(attrs.year, Some(2010));

        let attrs = infer("Blade.Runner.2049.2017.1080p.BluRay.x264.mkv");
        assert_eq!(attrs.title.as_deref(), Some("Blade Runner 2049"));
        assert_eq!(attrs.year, Some(2017));
        assert_eq!(attrs.format.as_deref(), Some("BluRay"));
    }

    #[test]
    fn test_dated_show() {
        let attrs = infer("The.Daily.Show.2014.03.15.720p.HDTV.mkv");
        assert_eq!(attrs.kind, Some(MediaKind::Episode));
        assert_eq!(attrs.title.as_deref(), Some("The Daily Show"));
        assert_eq!(attrs.date, NaiveDate::from_ymd_opt(2014, 3, 15));
        assert_eq!(attrs.episode, None);
        assert_eq!(attrs.year, None);
    }

    #[test]
    fn test_parts() {
        assert_eq!(infer("Movie.Part.2.mkv").part, Some(2));
        assert_eq!(infer("Movie.Part.III.mkv").part, Some(3));
        assert_eq!(infer("Movie.Part.III.mkv").title.as_deref(), Some("Movie"));
    }

    #[test]
    fn test_directory_fills_missing_title() {
        let attrs = infer("Show.Name.S01E02.720p/-.mkv");
        assert_eq!(attrs.title.as_deref(), Some("Show Name"));
        assert_eq!(attrs.episode, Some(EpisodeNumber::Single(2)));

        let attrs = SceneNameEngine::new()
            .infer(&InferenceRequest::filename("Show.Name.S01E02.720p/-.mkv"))
            .unwrap();
        assert_eq!(attrs.title, None);
        assert_eq!(attrs.kind, None);
    }

    #[test]
    fn test_subtitle_language() {
        let request = InferenceRequest::filename("Movie.Title.2010.eng.srt").with_languages();
        let attrs = SceneNameEngine::new().infer(&request).unwrap();
        assert_eq!(attrs.subtitle_language.as_deref(), Some("en"));
        assert_eq!(attrs.title.as_deref(), Some("Movie Title"));

        // Languages are only reported when asked for
        let attrs = infer("Movie.Title.2010.eng.srt");
        assert_eq!(attrs.subtitle_language, None);
    }

    #[test]
    fn test_hyphenated_title_is_not_a_group() {
        let attrs = infer("Spider-Man.2002.mkv");
        assert_eq!(attrs.title.as_deref(), Some("Spider-Man"));
        assert_eq!(attrs.release_group, None);
    }

    #[test]
    fn test_unparseable_name() {
        let attrs = infer("-.mkv");
        assert_eq!(attrs.kind, None);
        assert_eq!(attrs.title, None);
    }
}

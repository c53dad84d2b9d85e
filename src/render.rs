// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Format template rendering
//!
//! A template is literal text with `%` tokens from a [`TokenMapping`],
//! `{{upper}}` and `{lower}` case regions and `/` directory separators.
//! Rendering substitutes tokens, collapses doubled separators until nothing
//! changes, applies case regions and strips stray separator characters from
//! every path component.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::mapping::TokenMapping;

/// Token for the file extension, leading dot included
pub const EXT_TOKEN: &str = "%ext";

/// Expands to the parent directory after cleanup
pub const UP_TOKEN: &str = "%up";

/// Applied in order until a whole pass changes nothing
const CLEANUP_RULES: &[(&str, &str)] = &[
    ("()", ""),
    ("..", "."),
    ("__", "_"),
    ("  ", " "),
    ("//", "/"),
    (" - - ", " - "),
    ("--", "-"),
];

/// Trimmed from both ends of every path component
const STRIP_CHARS: [char; 3] = ['_', '.', '-'];

static UPPER_REGION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{([^{]*)\}\}").unwrap());
static LOWER_REGION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{]*)\}").unwrap());

/// Append `.%ext` unless the template already ends with it
pub fn with_extension_token(template: &str) -> String {
    let ext_suffix = format!(".{}", EXT_TOKEN);
    if template.trim_end_matches('}').ends_with(&ext_suffix) {
        template.to_string()
    } else {
        format!("{}{}", template, ext_suffix)
    }
}

/// Replace tokens left to right; an unknown `%` is copied as is
pub fn substitute(template: &str, mapping: &TokenMapping) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if c == '%' {
            if let Some((token, value)) = mapping.match_at(rest) {
                out.push_str(value);
                rest = &rest[token.len()..];
                continue;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Collapse doubled separators and empty brackets until stable
pub fn cleanup(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let mut next = current.clone();
        for (from, to) in CLEANUP_RULES {
            next = next.replace(from, to);
        }
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Upper-case `{{...}}` regions, then lower-case `{...}` regions, then drop leftover braces
pub fn apply_case_regions(text: &str) -> String {
    let mut out = text.to_string();

    while let Some(caps) = UPPER_REGION_RE.captures(&out) {
        let (range, inner) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(inner)) => (whole.range(), inner.as_str().to_uppercase()),
            _ => break,
        };
        out.replace_range(range, &inner);
    }

    while let Some(caps) = LOWER_REGION_RE.captures(&out) {
        let (range, inner) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(inner)) => (whole.range(), inner.as_str().to_lowercase()),
            _ => break,
        };
        out.replace_range(range, &inner);
    }

    out.replace(['{', '}'], "")
}

/// Split `path` into everything before the final extension and the extension
pub fn split_path_extension(path: &str) -> (&str, &str) {
    let name_start = path.rfind('/').map_or(0, |idx| idx + 1);
    let name = &path[name_start..];
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => path.split_at(name_start + idx),
        _ => (path, ""),
    }
}

fn strip_component(part: &str) -> String {
    if part == ".." {
        return part.to_string();
    }

    let mut current = part.to_string();
    loop {
        let mut next = current.clone();
        for c in STRIP_CHARS {
            next = next.trim().trim_matches(c).to_string();
        }
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Strip separator characters and whitespace around every component
pub fn strip_components(path: &str) -> String {
    let absolute = path.trim().starts_with(['/', '\\']);
    let joined = path
        .trim_matches('/')
        .split('/')
        .map(strip_component)
        .collect::<Vec<_>>()
        .join("/");

    if absolute {
        normalize_path(&format!("/{}", joined))
    } else {
        normalize_path(&joined)
    }
}

/// Lexically normalize a `/`-separated path
pub fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().map_or(false, |p| *p != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Render a template into a path relative to the destination directory
pub fn render(template: &str, mapping: &TokenMapping) -> String {
    let template = with_extension_token(template).replace('\\', "/");
    debug!("Format: {}", template);

    let substituted = substitute(&template, mapping);
    debug!("Path after substitution: {}", substituted);

    let cleaned = cleanup(&substituted).replace(UP_TOKEN, "..");
    let cased = apply_case_regions(&cleaned);

    let (stem, ext) = split_path_extension(&cased);
    let rendered = normalize_path(&format!("{}{}", strip_components(stem), ext));
    debug!("Path after cleanup: {}", rendered);

    rendered
}

/// Directory a classification sorts into; empty means beside the download directory
pub fn destination_dir(configured: &str, download_dir: &Path) -> PathBuf {
    if configured.trim().is_empty() {
        download_dir.parent().unwrap_or(download_dir).to_path_buf()
    } else {
        PathBuf::from(configured.trim())
    }
}

/// Append a rendered relative path to `base`, resolving `.` and `..`
pub fn join_rendered(base: &Path, rendered: &str) -> PathBuf {
    let mut out = if rendered.starts_with('/') {
        PathBuf::from("/")
    } else {
        base.to_path_buf()
    };

    for part in rendered.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other),
        }
    }

    out
}

/// Full destination for `source`, or `None` when it would not move
pub fn destination(
    source: &Path,
    template: &str,
    mapping: &TokenMapping,
    dest_dir: &Path,
) -> Option<PathBuf> {
    let dest = join_rendered(dest_dir, &render(template, mapping));

    let same = source.to_string_lossy().to_uppercase() == dest.to_string_lossy().to_uppercase();
    if same {
        debug!("Destination path equals file name: {}", dest.display());
        return None;
    }

    Some(dest)
}

// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Language tags found at the end of subtitle file names

/// A language as it may be written in a release name
struct LanguageCode {
    /// ISO 639-1
    alpha2: &'static str,
    /// ISO 639-2 bibliographic and terminologic codes
    alpha3: &'static [&'static str],
    /// English name(s)
    names: &'static [&'static str],
}

const LANGUAGES: &[LanguageCode] = &[
    LanguageCode { alpha2: "en", alpha3: &["eng"], names: &["english"] },
    LanguageCode { alpha2: "fr", alpha3: &["fre", "fra"], names: &["french", "francais"] },
    LanguageCode { alpha2: "de", alpha3: &["ger", "deu"], names: &["german", "deutsch"] },
    LanguageCode { alpha2: "es", alpha3: &["spa"], names: &["spanish", "espanol"] },
    LanguageCode { alpha2: "it", alpha3: &["ita"], names: &["italian"] },
    LanguageCode { alpha2: "pt", alpha3: &["por"], names: &["portuguese"] },
    LanguageCode { alpha2: "nl", alpha3: &["dut", "nld"], names: &["dutch"] },
    LanguageCode { alpha2: "ru", alpha3: &["rus"], names: &["russian"] },
    LanguageCode { alpha2: "ja", alpha3: &["jpn"], names: &["japanese"] },
    LanguageCode { alpha2: "ko", alpha3: &["kor"], names: &["korean"] },
    LanguageCode { alpha2: "zh", alpha3: &["chi", "zho"], names: &["chinese"] },
    LanguageCode { alpha2: "ar", alpha3: &["ara"], names: &["arabic"] },
    LanguageCode { alpha2: "hi", alpha3: &["hin"], names: &["hindi"] },
    LanguageCode { alpha2: "tr", alpha3: &["tur"], names: &["turkish"] },
    LanguageCode { alpha2: "pl", alpha3: &["pol"], names: &["polish"] },
    LanguageCode { alpha2: "sv", alpha3: &["swe"], names: &["swedish"] },
    LanguageCode { alpha2: "no", alpha3: &["nor"], names: &["norwegian"] },
    LanguageCode { alpha2: "da", alpha3: &["dan"], names: &["danish"] },
    LanguageCode { alpha2: "fi", alpha3: &["fin"], names: &["finnish"] },
    LanguageCode { alpha2: "cs", alpha3: &["cze", "ces"], names: &["czech"] },
    LanguageCode { alpha2: "hu", alpha3: &["hun"], names: &["hungarian"] },
    LanguageCode { alpha2: "ro", alpha3: &["rum", "ron"], names: &["romanian"] },
    LanguageCode { alpha2: "bg", alpha3: &["bul"], names: &["bulgarian"] },
    LanguageCode { alpha2: "el", alpha3: &["gre", "ell"], names: &["greek"] },
    LanguageCode { alpha2: "he", alpha3: &["heb"], names: &["hebrew"] },
    LanguageCode { alpha2: "th", alpha3: &["tha"], names: &["thai"] },
    LanguageCode { alpha2: "vi", alpha3: &["vie"], names: &["vietnamese"] },
    LanguageCode { alpha2: "id", alpha3: &["ind"], names: &["indonesian"] },
    LanguageCode { alpha2: "uk", alpha3: &["ukr"], names: &["ukrainian"] },
    LanguageCode { alpha2: "hr", alpha3: &["hrv"], names: &["croatian"] },
    LanguageCode { alpha2: "sr", alpha3: &["srp"], names: &["serbian"] },
    LanguageCode { alpha2: "sl", alpha3: &["slv"], names: &["slovenian"] },
    LanguageCode { alpha2: "sk", alpha3: &["slo", "slk"], names: &["slovak"] },
    LanguageCode { alpha2: "et", alpha3: &["est"], names: &["estonian"] },
    LanguageCode { alpha2: "lv", alpha3: &["lav"], names: &["latvian"] },
    LanguageCode { alpha2: "lt", alpha3: &["lit"], names: &["lithuanian"] },
    LanguageCode { alpha2: "is", alpha3: &["ice", "isl"], names: &["icelandic"] },
    LanguageCode { alpha2: "fa", alpha3: &["per", "fas"], names: &["persian", "farsi"] },
];

/// Resolve a tag (`en`, `eng`, `English`) to its ISO 639-1 code
pub fn alpha2(tag: &str) -> Option<&'static str> {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        return None;
    }

    LANGUAGES
        .iter()
        .find(|lang| {
            lang.alpha2 == tag
                || lang.alpha3.contains(&tag.as_str())
                || lang.names.contains(&tag.as_str())
        })
        .map(|lang| lang.alpha2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_names() {
        assert_eq!(alpha2("en"), Some("en"));
        assert_eq!(alpha2("ENG"), Some("en"));
        assert_eq!(alpha2("German"), Some("de"));
        assert_eq!(alpha2("fre"), Some("fr"));
        assert_eq!(alpha2("xx"), None);
        assert_eq!(alpha2(""), None);
    }
}

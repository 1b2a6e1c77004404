/*!
 * Language utilities for the codes stored in draft metadata.
 *
 * Draft documents carry free-form codes such as "en", "pt-BR" or "eng",
 * plus the placeholder "unknown". Only the primary subtag is checked
 * against ISO 639; region and script subtags are kept verbatim.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Placeholder stored when a language has not been configured
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Language code type of a primary subtag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T or 639-3 (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// Primary subtag of a BCP 47 style tag ("pt-BR" -> "pt", "zh_Hant" -> "zh")
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Map an ISO 639-2/B code to its 639-2/T form when they differ
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Validate the primary subtag of a language code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let primary = primary_subtag(code);

    match primary.len() {
        2 if Language::from_639_1(&primary).is_some() => return Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&primary).is_some() => return Ok(LanguageCodeType::Part2T),
        3 if bibliographic_to_terminology(&primary).is_some() => return Ok(LanguageCodeType::Part2B),
        _ => {}
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Whether a stored code is the "not configured" placeholder
pub fn is_unknown(code: &str) -> bool {
    let trimmed = code.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_LANGUAGE)
}

/// Get the English language name for a code
pub fn get_language_name(code: &str) -> Result<String> {
    let primary = primary_subtag(code);
    let lang = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(bibliographic_to_terminology(&primary).unwrap_or(&primary)),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}

/// Segment used in an export file name: the code itself, or `fallback`
/// when the code is the placeholder
pub fn export_segment<'a>(code: &'a str, fallback: &'a str) -> &'a str {
    if is_unknown(code) {
        fallback
    } else {
        code.trim()
    }
}

/*!
 * Tests for language code utilities
 */

use acolyte::language_utils::{export_segment, get_language_name, is_unknown, validate_language_code, LanguageCodeType};

#[test]
fn test_validate_language_code_withIsoCodes_shouldClassify() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("por").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B);
    assert!(validate_language_code("unknown").is_err());
}

#[test]
fn test_get_language_name_withRegionalTag_shouldNamePrimaryLanguage() {
    assert_eq!(get_language_name("pt-BR").unwrap(), "Portuguese");
    assert_eq!(get_language_name("ger").unwrap(), "German");
    assert!(get_language_name("zz").is_err());
}

#[test]
fn test_is_unknown_shouldMatchPlaceholderAndBlank() {
    assert!(is_unknown("unknown"));
    assert!(is_unknown("UNKNOWN"));
    assert!(is_unknown("  "));
    assert!(!is_unknown("en"));
}

#[test]
fn test_export_segment_withConfiguredCode_shouldUseCode() {
    assert_eq!(export_segment("en", "original"), "en");
    assert_eq!(export_segment("", "original"), "original");
}

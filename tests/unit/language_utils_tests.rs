/*!
 * Tests for language code utilities
 */

use bisub::language_utils::{
    get_language_name, language_codes_match, normalize_to_part1_or_part2t, normalize_to_part2t,
};

/// Test normalization to ISO 639-2/T
#[test]
fn test_normalize_to_part2t_withVariousCodes_shouldReturnThreeLetterCode() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("ZH").unwrap(), "zho");
    assert_eq!(normalize_to_part2t("chi").unwrap(), "zho");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t(" fra ").unwrap(), "fra");
    assert!(normalize_to_part2t("english").is_err());
    assert!(normalize_to_part2t("").is_err());
}

/// Test normalization to the shortest code
#[test]
fn test_normalize_to_part1_or_part2t_withVariousCodes_shouldPreferTwoLetters() {
    assert_eq!(normalize_to_part1_or_part2t("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("chi").unwrap(), "zh");
    assert_eq!(normalize_to_part1_or_part2t("ja").unwrap(), "ja");
}

/// Test code equivalence across formats
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("zh", "zho"));
    assert!(language_codes_match("zh", "chi"));
    assert!(language_codes_match("EN", "eng"));
    assert!(language_codes_match("fre", "fr"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "zz-invalid"));
}

/// Test language names
#[test]
fn test_get_language_name_withValidCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fra").unwrap(), "French");
    assert!(get_language_name("xyz1").is_err());
}

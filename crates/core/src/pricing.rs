//! Variation pricing and submission validation.
//!
//! Prices a requested (language, format-set) derivative of a finished
//! video. Two costs are computed from the same rule: an internal cost at
//! fixed agency accounting rates, and the client-displayed cost at the
//! organization's configured rates. Rates are currency per second of
//! video.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Fixed per-second rate for a newly added language (internal accounting).
pub const INTERNAL_LANGUAGE_RATE: f64 = 3.0;

/// Fixed per-second rate for each format beyond the first (internal accounting).
pub const INTERNAL_FORMAT_RATE: f64 = 1.0;

/// Per-organization pricing configuration, currency per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    /// Rate for adding a language the project did not originally include.
    pub language_rate: f64,
    /// Rate for each additional aspect-ratio format beyond the first.
    pub format_rate: f64,
}

impl Default for RateCard {
    /// Defaults applied when an organization has no configured rates.
    fn default() -> Self {
        Self {
            language_rate: INTERNAL_LANGUAGE_RATE,
            format_rate: INTERNAL_FORMAT_RATE,
        }
    }
}

impl RateCard {
    /// The fixed internal-accounting rate card.
    pub const INTERNAL: RateCard = RateCard {
        language_rate: INTERNAL_LANGUAGE_RATE,
        format_rate: INTERNAL_FORMAT_RATE,
    };
}

// ---------------------------------------------------------------------------
// Cost rule
// ---------------------------------------------------------------------------

/// Cost of one language's variation request under the given rate card.
///
/// - Zero formats or non-positive duration cost nothing.
/// - An original project language includes its first format free and is
///   billed only for the extras.
/// - A newly added language is billed the language rate plus the extra
///   format rate for every format beyond the first.
pub fn variation_cost(
    duration_secs: f64,
    format_count: usize,
    is_original_language: bool,
    rates: &RateCard,
) -> f64 {
    if format_count == 0 || duration_secs <= 0.0 {
        return 0.0;
    }

    let extra_formats = (format_count - 1) as f64;
    let format_cost = extra_formats * rates.format_rate * duration_secs;

    if is_original_language {
        format_cost
    } else {
        rates.language_rate * duration_secs + format_cost
    }
}

/// Internal and client-displayed cost for one language selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariationQuote {
    /// Cost at the fixed internal accounting rates.
    pub internal_cost: f64,
    /// Cost at the organization's configured rates.
    pub displayed_cost: f64,
}

/// Quote one language selection under both rate sources.
pub fn quote(
    duration_secs: f64,
    format_count: usize,
    is_original_language: bool,
    org_rates: &RateCard,
) -> VariationQuote {
    VariationQuote {
        internal_cost: variation_cost(
            duration_secs,
            format_count,
            is_original_language,
            &RateCard::INTERNAL,
        ),
        displayed_cost: variation_cost(
            duration_secs,
            format_count,
            is_original_language,
            org_rates,
        ),
    }
}

// ---------------------------------------------------------------------------
// Submission validation
// ---------------------------------------------------------------------------

/// One language's selection in a variation request submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LanguageSelection {
    #[validate(length(min = 1, message = "Language must not be empty"))]
    pub language: String,
    /// Selected aspect-ratio formats (e.g. "16:9", "9:16").
    pub formats: Vec<String>,
    /// Chosen voice-over profile, when one is required.
    pub voice_over_id: Option<String>,
}

impl LanguageSelection {
    /// Whether this selection targets one of the project's original languages.
    pub fn is_original(&self, original_languages: &[String]) -> bool {
        original_languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(&self.language))
    }
}

/// Validate a variation submission before any record is written.
///
/// Rules (hard submission blockers, surfaced verbatim to the client):
/// - the submission must contain at least one language,
/// - every language needs at least one format,
/// - when the project requires voice-over, every non-original language
///   needs a voice-over choice.
pub fn validate_submission(
    selections: &[LanguageSelection],
    voice_over_required: bool,
    original_languages: &[String],
) -> Result<(), CoreError> {
    if selections.is_empty() {
        return Err(CoreError::Validation(
            "Select at least one language before submitting".into(),
        ));
    }

    for selection in selections {
        selection
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        if selection.formats.is_empty() {
            return Err(CoreError::Validation(format!(
                "Select at least one format for '{}'",
                selection.language
            )));
        }

        let needs_voice_over =
            voice_over_required && !selection.is_original(original_languages);
        if needs_voice_over && selection.voice_over_id.is_none() {
            return Err(CoreError::Validation(format!(
                "Choose a voice-over for '{}'",
                selection.language
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_rates() -> RateCard {
        RateCard {
            language_rate: 3.0,
            format_rate: 1.0,
        }
    }

    // -- variation_cost --

    #[test]
    fn new_language_single_format() {
        // 10s, rate_lang=3 -> 30
        let cost = variation_cost(10.0, 1, false, &standard_rates());
        assert!((cost - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_language_three_formats() {
        // 30 + 2 extra formats * 1 * 10s = 50
        let cost = variation_cost(10.0, 3, false, &standard_rates());
        assert!((cost - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn original_language_first_format_is_free() {
        let cost = variation_cost(10.0, 1, true, &standard_rates());
        assert!((cost - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn original_language_three_formats() {
        // Only the 2 extra formats are billed: 2 * 1 * 10 = 20.
        let cost = variation_cost(10.0, 3, true, &standard_rates());
        assert!((cost - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_formats_cost_nothing() {
        assert_eq!(variation_cost(10.0, 0, false, &standard_rates()), 0.0);
        assert_eq!(variation_cost(10.0, 0, true, &standard_rates()), 0.0);
    }

    #[test]
    fn non_positive_duration_costs_nothing() {
        assert_eq!(variation_cost(0.0, 3, false, &standard_rates()), 0.0);
        assert_eq!(variation_cost(-5.0, 3, false, &standard_rates()), 0.0);
    }

    #[test]
    fn custom_org_rates_change_displayed_cost_only() {
        let org = RateCard {
            language_rate: 5.0,
            format_rate: 2.0,
        };
        let q = quote(10.0, 2, false, &org);

        // Internal: 3*10 + 1*1*10 = 40. Displayed: 5*10 + 1*2*10 = 70.
        assert!((q.internal_cost - 40.0).abs() < f64::EPSILON);
        assert!((q.displayed_cost - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn default_rate_card_matches_internal_constants() {
        assert_eq!(RateCard::default(), RateCard::INTERNAL);
    }

    // -- validate_submission --

    fn selection(language: &str, formats: &[&str], vo: Option<&str>) -> LanguageSelection {
        LanguageSelection {
            language: language.to_string(),
            formats: formats.iter().map(|f| f.to_string()).collect(),
            voice_over_id: vo.map(|v| v.to_string()),
        }
    }

    #[test]
    fn empty_submission_rejected() {
        assert!(validate_submission(&[], false, &[]).is_err());
    }

    #[test]
    fn language_without_formats_rejected() {
        let selections = vec![
            selection("English", &["16:9"], None),
            selection("German", &[], None),
        ];
        let err = validate_submission(&selections, false, &[]).unwrap_err();
        assert!(err.to_string().contains("German"));
    }

    #[test]
    fn new_language_without_voice_over_rejected_when_required() {
        let originals = vec!["English".to_string()];
        let selections = vec![selection("French", &["16:9"], None)];

        let err = validate_submission(&selections, true, &originals).unwrap_err();
        assert!(err.to_string().contains("French"));
    }

    #[test]
    fn original_language_never_needs_voice_over() {
        let originals = vec!["English".to_string()];
        let selections = vec![selection("english", &["16:9", "9:16"], None)];

        assert!(validate_submission(&selections, true, &originals).is_ok());
    }

    #[test]
    fn new_language_with_voice_over_accepted() {
        let originals = vec!["English".to_string()];
        let selections = vec![selection("French", &["16:9"], Some("vo-42"))];

        assert!(validate_submission(&selections, true, &originals).is_ok());
    }

    #[test]
    fn voice_over_not_required_when_project_has_none() {
        let selections = vec![selection("French", &["16:9"], None)];
        assert!(validate_submission(&selections, false, &[]).is_ok());
    }
}

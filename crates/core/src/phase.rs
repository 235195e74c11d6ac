//! Production pipeline phases and status derivation.
//!
//! The record backend stores phase and status as free text decorated for
//! display (emoji prefixes, inconsistent spellings). This module normalizes
//! both into closed enums at the ingestion boundary and derives the
//! per-section review state and completion percentage shown to clients.
//! Every function here is total: unknown input degrades to a fallback
//! value, never a panic.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Number of phases that count toward completion percentage.
///
/// Testimonial is a terminal bookkeeping phase and does not add a sixth
/// step to the progress bar.
pub const PROGRESS_PHASE_COUNT: u32 = 5;

/// One stage of the fixed production pipeline.
///
/// Ordered: the derive of `PartialOrd`/`Ord` follows declaration order, so
/// `Phase::Copywriting < Phase::Animation` holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Copywriting,
    VoiceOver,
    Storyboard,
    Animation,
    Variations,
    /// Terminal phase after delivery; used for aggregate bookkeeping only.
    Testimonial,
}

/// Substring alias table for phase spellings seen in backend data.
///
/// Checked in order after an exact keyword match fails. Keys are matched
/// by containment against the cleaned (lowercased, de-decorated) input.
const PHASE_ALIASES: &[(&str, Phase)] = &[
    ("copywriting", Phase::Copywriting),
    ("copy writing", Phase::Copywriting),
    ("voiceover", Phase::VoiceOver),
    ("voice-over", Phase::VoiceOver),
    ("voice over", Phase::VoiceOver),
    ("voice", Phase::VoiceOver),
    ("storyboard", Phase::Storyboard),
    ("story board", Phase::Storyboard),
    ("animation", Phase::Animation),
    ("variation", Phase::Variations),
    ("testimonial", Phase::Testimonial),
];

impl Phase {
    /// The five phases that appear as reviewable sections, in pipeline order.
    pub const SECTIONS: [Phase; 5] = [
        Phase::Copywriting,
        Phase::VoiceOver,
        Phase::Storyboard,
        Phase::Animation,
        Phase::Variations,
    ];

    /// Canonical keyword for each phase.
    pub fn keyword(self) -> &'static str {
        match self {
            Phase::Copywriting => "copywriting",
            Phase::VoiceOver => "voice",
            Phase::Storyboard => "storyboard",
            Phase::Animation => "animation",
            Phase::Variations => "variations",
            Phase::Testimonial => "testimonial",
        }
    }

    /// Human-facing label, derived from the enum (never parsed back).
    pub fn label(self) -> &'static str {
        match self {
            Phase::Copywriting => "Copywriting",
            Phase::VoiceOver => "Voice-over",
            Phase::Storyboard => "Storyboard",
            Phase::Animation => "Animation",
            Phase::Variations => "Variations",
            Phase::Testimonial => "Testimonial",
        }
    }

    /// Parse a raw backend phase string into a canonical phase.
    ///
    /// Lowercases, strips leading decoration (emoji, punctuation,
    /// whitespace), then tries an exact keyword match followed by the
    /// substring alias table. Returns `None` for anything unrecognized;
    /// callers must treat that as zero completion.
    pub fn parse(raw: &str) -> Option<Phase> {
        let cleaned = strip_decoration(raw);
        if cleaned.is_empty() {
            return None;
        }

        for phase in [
            Phase::Copywriting,
            Phase::VoiceOver,
            Phase::Storyboard,
            Phase::Animation,
            Phase::Variations,
            Phase::Testimonial,
        ] {
            if cleaned == phase.keyword() {
                return Some(phase);
            }
        }

        PHASE_ALIASES
            .iter()
            .find(|(alias, _)| cleaned.contains(alias))
            .map(|&(_, phase)| phase)
    }

    /// Zero-based index into the progress sequence (0..=4).
    ///
    /// Testimonial sits past the end of the progress bar and maps to the
    /// final index so percentage stays pinned at 100.
    pub fn progress_index(self) -> u32 {
        match self {
            Phase::Copywriting => 0,
            Phase::VoiceOver => 1,
            Phase::Storyboard => 2,
            Phase::Animation => 3,
            Phase::Variations | Phase::Testimonial => 4,
        }
    }
}

/// Lowercase `raw` and strip leading non-alphanumeric decoration.
///
/// Trailing whitespace is also trimmed; interior punctuation is kept so
/// alias containment ("voice-over") still works.
fn strip_decoration(raw: &str) -> String {
    let lower = raw.to_lowercase();
    lower
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end()
        .to_string()
}

/// Completion percentage for the dashboard progress bar.
///
/// `round((index + 1) / 5 * 100)` for a known phase, 0 for an unknown
/// one. The current phase is fully weighted; that is the documented
/// behaviour, not an off-by-one.
pub fn completion_percent(phase: Option<Phase>) -> u8 {
    match phase {
        Some(p) => {
            let pct =
                f64::from(p.progress_index() + 1) / f64::from(PROGRESS_PHASE_COUNT) * 100.0;
            pct.round() as u8
        }
        None => 0,
    }
}

// ---------------------------------------------------------------------------
// Project status
// ---------------------------------------------------------------------------

/// Semantic bucket for the free-text status label on a project.
///
/// Parsed once at ingestion; `Unrecognized` is an explicit variant (logged
/// by the record gateway) rather than a silent default, though it behaves
/// like `InProgress` in all derivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    NotStarted,
    InProgress,
    UnderReview,
    Approved,
    Unrecognized,
}

impl ProjectStatus {
    /// Bucket a raw status string by lowercase substring.
    pub fn parse(raw: &str) -> ProjectStatus {
        let lower = raw.to_lowercase();
        if lower.contains("review") {
            ProjectStatus::UnderReview
        } else if lower.contains("approved") {
            ProjectStatus::Approved
        } else if lower.contains("not") && lower.contains("start") {
            ProjectStatus::NotStarted
        } else if lower.contains("in progress") {
            ProjectStatus::InProgress
        } else {
            ProjectStatus::Unrecognized
        }
    }

    /// Whether this status counts as approval of the current phase.
    pub fn is_approved(self) -> bool {
        self == ProjectStatus::Approved
    }
}

// ---------------------------------------------------------------------------
// Section status derivation
// ---------------------------------------------------------------------------

/// Review state of one dashboard section (one phase of one project).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    /// The pipeline has not reached this section yet.
    NotStarted,
    InProgress,
    /// The section is in the current phase and awaiting client review.
    ToReview,
    /// The pipeline has moved past this section.
    Approved,
}

/// Derive the review state of `section` given the project's current phase
/// and status bucket.
///
/// - Sections behind the current phase are `Approved`.
/// - The current section is `ToReview` while the status is under review,
///   otherwise `InProgress`.
/// - Sections ahead of the current phase (or any section when the current
///   phase is unknown) are `NotStarted`.
pub fn section_status(
    current: Option<Phase>,
    section: Phase,
    status: ProjectStatus,
) -> SectionStatus {
    let Some(current) = current else {
        return SectionStatus::NotStarted;
    };

    if section.progress_index() < current.progress_index() {
        SectionStatus::Approved
    } else if section.progress_index() == current.progress_index() {
        match status {
            ProjectStatus::UnderReview => SectionStatus::ToReview,
            _ => SectionStatus::InProgress,
        }
    } else {
        SectionStatus::NotStarted
    }
}

// ---------------------------------------------------------------------------
// Aggregate predicates
// ---------------------------------------------------------------------------

/// A project is fully completed when the final pre-testimonial phase has
/// been approved.
pub fn is_fully_completed(phase: Option<Phase>, status: ProjectStatus) -> bool {
    phase == Some(Phase::Variations) && status.is_approved()
}

/// A project leaves the in-progress aggregates once its testimonial phase
/// is approved.
pub fn is_archived(phase: Option<Phase>, status: ProjectStatus) -> bool {
    phase == Some(Phase::Testimonial) && status.is_approved()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Phase::parse --

    #[test]
    fn parse_exact_keywords() {
        assert_eq!(Phase::parse("copywriting"), Some(Phase::Copywriting));
        assert_eq!(Phase::parse("voice"), Some(Phase::VoiceOver));
        assert_eq!(Phase::parse("storyboard"), Some(Phase::Storyboard));
        assert_eq!(Phase::parse("animation"), Some(Phase::Animation));
        assert_eq!(Phase::parse("variations"), Some(Phase::Variations));
        assert_eq!(Phase::parse("testimonial"), Some(Phase::Testimonial));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Phase::parse("Storyboard"), Some(Phase::Storyboard));
        assert_eq!(Phase::parse("ANIMATION"), Some(Phase::Animation));
    }

    #[test]
    fn parse_strips_emoji_decoration() {
        assert_eq!(Phase::parse("🖼️ Storyboard"), Some(Phase::Storyboard));
        assert_eq!(Phase::parse("✍️ Copywriting"), Some(Phase::Copywriting));
        assert_eq!(Phase::parse("🎬 Animation"), Some(Phase::Animation));
    }

    #[test]
    fn parse_voice_over_spellings() {
        assert_eq!(Phase::parse("Voice-over"), Some(Phase::VoiceOver));
        assert_eq!(Phase::parse("VoiceOver"), Some(Phase::VoiceOver));
        assert_eq!(Phase::parse("🎙️ Voice Over"), Some(Phase::VoiceOver));
        assert_eq!(Phase::parse("voiceover recording"), Some(Phase::VoiceOver));
    }

    #[test]
    fn parse_singular_variation() {
        assert_eq!(Phase::parse("Variation"), Some(Phase::Variations));
    }

    #[test]
    fn parse_unknown_returns_none() {
        assert_eq!(Phase::parse("post production"), None);
        assert_eq!(Phase::parse(""), None);
        assert_eq!(Phase::parse("🚀"), None);
    }

    // -- completion_percent --

    #[test]
    fn completion_percent_per_phase() {
        assert_eq!(completion_percent(Some(Phase::Copywriting)), 20);
        assert_eq!(completion_percent(Some(Phase::VoiceOver)), 40);
        assert_eq!(completion_percent(Some(Phase::Storyboard)), 60);
        assert_eq!(completion_percent(Some(Phase::Animation)), 80);
        assert_eq!(completion_percent(Some(Phase::Variations)), 100);
    }

    #[test]
    fn completion_percent_unknown_is_zero() {
        assert_eq!(completion_percent(None), 0);
    }

    #[test]
    fn completion_percent_testimonial_stays_at_100() {
        assert_eq!(completion_percent(Some(Phase::Testimonial)), 100);
    }

    #[test]
    fn completion_percent_is_monotone() {
        let percents: Vec<u8> = Phase::SECTIONS
            .iter()
            .map(|&p| completion_percent(Some(p)))
            .collect();
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*percents.last().unwrap(), 100);
    }

    // -- ProjectStatus::parse --

    #[test]
    fn status_buckets() {
        assert_eq!(ProjectStatus::parse("In Review"), ProjectStatus::UnderReview);
        assert_eq!(
            ProjectStatus::parse("waiting for review"),
            ProjectStatus::UnderReview
        );
        assert_eq!(ProjectStatus::parse("Approved ✅"), ProjectStatus::Approved);
        assert_eq!(ProjectStatus::parse("Not started"), ProjectStatus::NotStarted);
        assert_eq!(ProjectStatus::parse("In progress"), ProjectStatus::InProgress);
    }

    #[test]
    fn status_review_wins_over_approved() {
        // Substring buckets are checked in a fixed order; "review" first.
        assert_eq!(
            ProjectStatus::parse("approved pending review"),
            ProjectStatus::UnderReview
        );
    }

    #[test]
    fn status_unmatched_is_unrecognized() {
        assert_eq!(ProjectStatus::parse("blocked"), ProjectStatus::Unrecognized);
        assert_eq!(ProjectStatus::parse(""), ProjectStatus::Unrecognized);
    }

    // -- section_status --

    #[test]
    fn section_behind_current_is_approved() {
        assert_eq!(
            section_status(
                Some(Phase::Storyboard),
                Phase::Copywriting,
                ProjectStatus::InProgress
            ),
            SectionStatus::Approved
        );
    }

    #[test]
    fn current_section_in_review() {
        assert_eq!(
            section_status(
                Some(Phase::Storyboard),
                Phase::Storyboard,
                ProjectStatus::UnderReview
            ),
            SectionStatus::ToReview
        );
    }

    #[test]
    fn current_section_other_statuses_are_in_progress() {
        for status in [
            ProjectStatus::NotStarted,
            ProjectStatus::InProgress,
            ProjectStatus::Approved,
            ProjectStatus::Unrecognized,
        ] {
            assert_eq!(
                section_status(Some(Phase::Storyboard), Phase::Storyboard, status),
                SectionStatus::InProgress
            );
        }
    }

    #[test]
    fn section_ahead_of_current_is_not_started() {
        assert_eq!(
            section_status(
                Some(Phase::Storyboard),
                Phase::Animation,
                ProjectStatus::UnderReview
            ),
            SectionStatus::NotStarted
        );
    }

    #[test]
    fn unknown_current_phase_is_not_started_everywhere() {
        for section in Phase::SECTIONS {
            assert_eq!(
                section_status(None, section, ProjectStatus::InProgress),
                SectionStatus::NotStarted
            );
        }
    }

    /// End-to-end shape as seen in real sheet data: "🖼️ Storyboard" / "In Review".
    #[test]
    fn storyboard_in_review_end_to_end() {
        let phase = Phase::parse("🖼️ Storyboard");
        let status = ProjectStatus::parse("In Review");

        assert_eq!(
            section_status(phase, Phase::Storyboard, status),
            SectionStatus::ToReview
        );
        assert_eq!(
            section_status(phase, Phase::Copywriting, status),
            SectionStatus::Approved
        );
        assert_eq!(
            section_status(phase, Phase::Animation, status),
            SectionStatus::NotStarted
        );
    }

    // -- aggregate predicates --

    #[test]
    fn fully_completed_requires_approved_variations() {
        assert!(is_fully_completed(
            Some(Phase::Variations),
            ProjectStatus::Approved
        ));
        assert!(!is_fully_completed(
            Some(Phase::Variations),
            ProjectStatus::UnderReview
        ));
        assert!(!is_fully_completed(
            Some(Phase::Animation),
            ProjectStatus::Approved
        ));
        assert!(!is_fully_completed(None, ProjectStatus::Approved));
    }

    #[test]
    fn archived_requires_approved_testimonial() {
        assert!(is_archived(Some(Phase::Testimonial), ProjectStatus::Approved));
        assert!(!is_archived(
            Some(Phase::Testimonial),
            ProjectStatus::InProgress
        ));
        assert!(!is_archived(Some(Phase::Variations), ProjectStatus::Approved));
    }
}

//! Fact catalog
//!
//! Names of the computations requested from the provider. The provider is
//! name-addressed: each fact is one POST to `{base_url}/{fact_name}`.

/// Subject birth details echo (critical)
pub const BIRTH_DETAILS: &str = "birth_details";
/// Avakahada details: nakshatra, charan, rasi, gana, nadi, varna, yoni, tatva
pub const ASTRO_DETAILS: &str = "astro_details";
/// Planetary positions table (critical)
pub const PLANETS: &str = "planets";
/// Lagna (D1) chart placements
pub const HORO_CHART_D1: &str = "horo_chart_d1";
/// Navamsa (D9) chart placements
pub const HORO_CHART_D9: &str = "horo_chart_d9";
/// Panchang for the birth moment
pub const PANCHANG: &str = "panchang";
/// Vimshottari major periods
pub const MAJOR_VDASHA: &str = "major_vdasha";
/// Currently running dasha/antardasha
pub const CURRENT_VDASHA: &str = "current_vdasha";
/// Manglik (Mars affliction) status
pub const MANGLIK: &str = "manglik";
/// Kalsarpa status
pub const KALSARPA_DETAILS: &str = "kalsarpa_details";
/// Sadhesati current status
pub const SADHESATI_STATUS: &str = "sadhesati_current_status";
/// Gemstone suggestion
pub const GEM_SUGGESTION: &str = "basic_gem_suggestion";
/// Rudraksha suggestion
pub const RUDRAKSHA_SUGGESTION: &str = "rudraksha_suggestion";

/// Dashakoot ten-attribute match points (pair-addressed)
pub const MATCH_DASHAKOOT: &str = "match_dashakoot_points";
/// Papasamyam malefic balance (pair-addressed)
pub const PAPASAMYAM_DETAILS: &str = "papasamyam_details";
/// Overall match conclusion report (pair-addressed)
pub const MATCH_MAKING_REPORT: &str = "match_making_report";

/// Facts aggregated for a single-subject horoscope report
pub const HOROSCOPE_FACTS: &[&str] = &[
    BIRTH_DETAILS,
    ASTRO_DETAILS,
    PLANETS,
    HORO_CHART_D1,
    HORO_CHART_D9,
    PANCHANG,
    MAJOR_VDASHA,
    CURRENT_VDASHA,
    MANGLIK,
    KALSARPA_DETAILS,
    SADHESATI_STATUS,
    GEM_SUGGESTION,
    RUDRAKSHA_SUGGESTION,
];

/// Per-subject facts aggregated for a match report
pub const MATCH_SUBJECT_FACTS: &[&str] = &[
    BIRTH_DETAILS,
    ASTRO_DETAILS,
    PLANETS,
    HORO_CHART_D1,
    MANGLIK,
];

/// Pair-addressed facts aggregated for a match report
pub const MATCH_PAIR_FACTS: &[&str] = &[
    MATCH_DASHAKOOT,
    PAPASAMYAM_DETAILS,
    MATCH_MAKING_REPORT,
];

/// Facts without which no meaningful document can be produced
///
/// A Failed result for any of these aborts report generation; every other
/// fact degrades to default-valued content.
pub const CRITICAL_FACTS: &[&str] = &[BIRTH_DETAILS, PLANETS];

/// Whether a fact is critical for report generation
pub fn is_critical(fact: &str) -> bool {
    CRITICAL_FACTS.contains(&fact)
}

//! Report assembly
//!
//! **[RG-ASM-010]** Orchestrates aggregation results, scoring verdicts, and
//! the layout engine into the final paginated artifact. Section order is a
//! fixed, hard-coded sequence, identical for repeated invocations, and the
//! "generated on" date is an explicit input so rendering stays deterministic.

pub mod basics;
pub mod dashas;
pub mod match_report;
pub mod planets;
pub mod yogas;

use crate::assets::{AssetCache, ImageAsset};
use crate::i18n::{phrase, Phrase};
use crate::layout::{pdf, Font, HeaderFooter, LayoutEngine, PageGeometry};
use crate::scoring::CompatibilityReport;
use crate::services::aggregator::{AggregationStatus, CompletenessReport, FactBag};
use chrono::NaiveDate;
use graha_common::{Language, SubjectParams};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

const BRAND: &str = "GRAHA";
const COVER_IMAGE: &str = "cover.jpg";

/// Overall generation status included in response metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    Full,
    Partial,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Full => "full",
            ReportStatus::Partial => "partial",
        }
    }
}

/// Generation metadata accompanying the artifact
#[derive(Debug, Clone)]
pub struct GenerationMeta {
    pub report_id: Uuid,
    pub status: ReportStatus,
    pub total_requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
    pub generated_on: NaiveDate,
    pub page_count: usize,
}

impl GenerationMeta {
    pub fn success_rate(&self) -> f64 {
        if self.total_requested == 0 {
            return 1.0;
        }
        self.succeeded as f64 / self.total_requested as f64
    }

    /// Fold one or more completeness reports into response metadata
    fn from_completeness(
        reports: &[&CompletenessReport],
        generated_on: NaiveDate,
    ) -> Self {
        let total_requested: usize = reports.iter().map(|r| r.total_requested).sum();
        let succeeded: usize = reports.iter().map(|r| r.succeeded).sum();
        let failed = total_requested - succeeded;

        let status = if failed == 0 {
            ReportStatus::Full
        } else {
            ReportStatus::Partial
        };

        let mut warnings = Vec::new();
        if failed > 0 {
            let mut names: Vec<String> = reports
                .iter()
                .flat_map(|r| r.failed_names.iter().cloned())
                .collect();
            names.sort();
            warnings.push(format!("partial data: {} fact(s) unavailable ({})", failed, names.join(", ")));
        }

        Self {
            report_id: Uuid::new_v4(),
            status,
            total_requested,
            succeeded,
            failed,
            warnings,
            generated_on,
            page_count: 0,
        }
    }
}

/// Final paginated artifact plus suggested filename and metadata
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub meta: GenerationMeta,
}

/// Inputs for a single-subject horoscope report
pub struct HoroscopeInputs<'a> {
    pub subject: &'a SubjectParams,
    pub bag: &'a FactBag,
    pub completeness: &'a CompletenessReport,
    pub language: Language,
    pub generated_on: NaiveDate,
}

/// Inputs for a dual-subject match report
pub struct MatchInputs<'a> {
    pub groom: &'a SubjectParams,
    pub bride: &'a SubjectParams,
    pub groom_bag: &'a FactBag,
    pub bride_bag: &'a FactBag,
    pub pair_bag: &'a FactBag,
    pub groom_completeness: &'a CompletenessReport,
    pub bride_completeness: &'a CompletenessReport,
    pub pair_completeness: &'a CompletenessReport,
    pub compat: &'a CompatibilityReport,
    pub language: Language,
    pub generated_on: NaiveDate,
}

/// Keep a filename to safe characters, collapsing runs to underscores
fn sanitize_for_filename(name: &str) -> String {
    let mut out = String::new();
    let mut last_was_sep = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    out.trim_matches('_').to_string()
}

/// Suggested attachment filename from subject name(s) and date
pub fn suggested_filename(names: &[&str], kind: &str, date: NaiveDate) -> String {
    let joined = names
        .iter()
        .map(|n| sanitize_for_filename(n))
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let base = if joined.is_empty() {
        "Subject".to_string()
    } else {
        joined
    };
    format!("{}_{}_{}.pdf", base, kind, date.format("%Y%m%d"))
}

/// Tracks which images the report actually placed, for the PDF backend
struct UsedAssets {
    assets: BTreeMap<String, Arc<ImageAsset>>,
}

impl UsedAssets {
    fn new() -> Self {
        Self {
            assets: BTreeMap::new(),
        }
    }

    /// Load an asset and place it; a missing asset is silently omitted
    fn place(
        &mut self,
        engine: &mut LayoutEngine,
        cache: &AssetCache,
        file_name: &str,
        width: f64,
    ) {
        if let Some(asset) = cache.load(file_name) {
            let height = asset.height_for_width(width);
            if height > 0.0 {
                engine.image(&asset.key, width, height);
                self.assets.insert(asset.key.clone(), asset);
            }
        }
    }
}

fn cover_page(
    engine: &mut LayoutEngine,
    used: &mut UsedAssets,
    cache: &AssetCache,
    title: &str,
    subject_lines: &[String],
    lang: Language,
    generated_on: NaiveDate,
) {
    engine.spacer(90.0);
    engine.centered_line(BRAND, Font::HelveticaBold, 22.0);
    engine.spacer(30.0);
    used.place(engine, cache, COVER_IMAGE, 220.0);
    engine.spacer(30.0);
    engine.centered_line(title, Font::HelveticaBold, 20.0);
    engine.spacer(16.0);
    for line in subject_lines {
        engine.centered_line(line, Font::Helvetica, 13.0);
    }
    engine.spacer(24.0);
    engine.centered_line(phrase(lang, Phrase::CoverTagline), Font::HelveticaOblique, 10.0);
    engine.spacer(12.0);
    engine.centered_line(
        &format!("Generated on {}", generated_on.format("%d %b %Y")),
        Font::Helvetica,
        9.0,
    );
}

fn back_cover(engine: &mut LayoutEngine, lang: Language) {
    engine.force_new_page();
    engine.spacer(250.0);
    engine.centered_line(BRAND, Font::HelveticaBold, 18.0);
    engine.spacer(20.0);
    engine.centered_line(phrase(lang, Phrase::BackCoverNote), Font::Helvetica, 9.0);
}

/// Generate the single-subject horoscope report
///
/// Sections run in a fixed order; every section tolerates missing facts by
/// rendering defaults, so a partial bag still yields a structurally complete
/// document.
pub fn generate_horoscope(inputs: &HoroscopeInputs<'_>, cache: &AssetCache) -> ReportArtifact {
    let lang = inputs.language;
    let title = phrase(lang, Phrase::HoroscopeTitle);
    let geom = PageGeometry::a4();
    let mut engine = LayoutEngine::new(geom);
    let mut used = UsedAssets::new();

    tracing::info!(subject = %inputs.subject.name, "Rendering horoscope report");

    cover_page(
        &mut engine,
        &mut used,
        cache,
        title,
        &[
            inputs.subject.name.clone(),
            format!(
                "{} at {}, {}",
                inputs.subject.birth_date.format("%d %b %Y"),
                inputs.subject.birth_time.format("%H:%M"),
                inputs.subject.place
            ),
        ],
        lang,
        inputs.generated_on,
    );

    engine.force_new_page();
    basics::birth_details_section(&mut engine, inputs.subject, inputs.bag, lang);
    basics::avakahada_section(&mut engine, inputs.bag, lang);
    basics::panchang_section(&mut engine, inputs.bag, lang);

    engine.force_new_page();
    planets::planets_section(&mut engine, inputs.bag, lang);
    planets::charts_section(&mut engine, inputs.bag, lang);

    // Dasha tables start on their own page
    engine.force_new_page();
    dashas::dasha_section(&mut engine, inputs.bag, lang);

    engine.force_new_page();
    yogas::dosha_section(&mut engine, inputs.bag, lang);
    yogas::remedies_section(&mut engine, inputs.bag, lang);

    back_cover(&mut engine, lang);

    let pages = engine.finish(&HeaderFooter {
        title: title.to_string(),
        subject_line: inputs.subject.name.clone(),
        brand: BRAND.to_string(),
    });

    let mut meta =
        GenerationMeta::from_completeness(&[inputs.completeness], inputs.generated_on);
    meta.page_count = pages.len();

    let bytes = pdf::write_document(&pages, &geom, &used.assets);
    let filename = suggested_filename(
        &[&inputs.subject.name],
        "Horoscope",
        inputs.generated_on,
    );

    tracing::info!(
        pages = meta.page_count,
        status = meta.status.as_str(),
        "Horoscope report rendered"
    );

    ReportArtifact {
        bytes,
        filename,
        meta,
    }
}

/// Generate the dual-subject match report
pub fn generate_match(inputs: &MatchInputs<'_>, cache: &AssetCache) -> ReportArtifact {
    let lang = inputs.language;
    let title = phrase(lang, Phrase::MatchTitle);
    let geom = PageGeometry::a4();
    let mut engine = LayoutEngine::new(geom);
    let mut used = UsedAssets::new();

    tracing::info!(
        groom = %inputs.groom.name,
        bride = %inputs.bride.name,
        "Rendering match report"
    );

    cover_page(
        &mut engine,
        &mut used,
        cache,
        title,
        &[
            format!("{} & {}", inputs.groom.name, inputs.bride.name),
            format!(
                "{} / {}",
                inputs.groom.birth_date.format("%d %b %Y"),
                inputs.bride.birth_date.format("%d %b %Y")
            ),
        ],
        lang,
        inputs.generated_on,
    );

    // Each subject's detail section starts on its own page
    engine.force_new_page();
    basics::birth_details_section(&mut engine, inputs.groom, inputs.groom_bag, lang);
    planets::lagna_chart(&mut engine, inputs.groom_bag, &inputs.groom.name);

    engine.force_new_page();
    basics::birth_details_section(&mut engine, inputs.bride, inputs.bride_bag, lang);
    planets::lagna_chart(&mut engine, inputs.bride_bag, &inputs.bride.name);

    engine.force_new_page();
    match_report::guna_section(&mut engine, &inputs.compat.score, lang);
    match_report::manglik_section(&mut engine, inputs.compat, inputs.groom, inputs.bride, lang);
    match_report::papasamyam_section(&mut engine, &inputs.compat.balance, lang);
    match_report::conclusion_section(&mut engine, inputs.compat, inputs.pair_bag, lang);

    back_cover(&mut engine, lang);

    let pages = engine.finish(&HeaderFooter {
        title: title.to_string(),
        subject_line: format!("{} & {}", inputs.groom.name, inputs.bride.name),
        brand: BRAND.to_string(),
    });

    let mut meta = GenerationMeta::from_completeness(
        &[
            inputs.groom_completeness,
            inputs.bride_completeness,
            inputs.pair_completeness,
        ],
        inputs.generated_on,
    );
    meta.page_count = pages.len();
    if inputs.compat.score.total_mismatch {
        meta.warnings
            .push("score total: upstream grand total disagrees with row sum".to_string());
        meta.status = ReportStatus::Partial;
    }

    let bytes = pdf::write_document(&pages, &geom, &used.assets);
    let filename = suggested_filename(
        &[&inputs.groom.name, &inputs.bride.name],
        "Match",
        inputs.generated_on,
    );

    tracing::info!(
        pages = meta.page_count,
        status = meta.status.as_str(),
        "Match report rendered"
    );

    ReportArtifact {
        bytes,
        filename,
        meta,
    }
}

/// True when an aggregation allows report generation to proceed
pub fn can_render(status: AggregationStatus) -> bool {
    status != AggregationStatus::Failed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        assert_eq!(
            suggested_filename(&["Asha Sharma"], "Horoscope", date),
            "Asha_Sharma_Horoscope_20240709.pdf"
        );
        assert_eq!(
            suggested_filename(&["Ravi", "Asha"], "Match", date),
            "Ravi_Asha_Match_20240709.pdf"
        );
    }

    #[test]
    fn test_filename_sanitization() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            suggested_filename(&["  A/B?  C  "], "Horoscope", date),
            "A_B_C_Horoscope_20240101.pdf"
        );
        assert_eq!(
            suggested_filename(&["///"], "Horoscope", date),
            "Subject_Horoscope_20240101.pdf"
        );
    }

    #[test]
    fn test_meta_partial_status_and_warning() {
        let report = CompletenessReport {
            total_requested: 10,
            succeeded: 7,
            failed: 3,
            failed_names: vec!["a".into(), "b".into(), "c".into()],
            status: AggregationStatus::Partial,
        };
        let meta = GenerationMeta::from_completeness(
            &[&report],
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert_eq!(meta.status, ReportStatus::Partial);
        assert_eq!(meta.failed, 3);
        assert!((meta.success_rate() - 0.7).abs() < 1e-9);
        assert_eq!(meta.warnings.len(), 1);
    }
}

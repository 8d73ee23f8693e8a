//! Match report sections: guna milan, manglik analysis, papasamyam,
//! conclusion

use crate::extract::Extract;
use crate::i18n::{phrase, Phrase};
use crate::layout::{Font, LayoutEngine, TableSpec};
use crate::scoring::{AfflictionConclusion, BalanceVerdict, CompatibilityReport, ScoreTable};
use crate::services::aggregator::FactBag;
use crate::services::catalog::MATCH_MAKING_REPORT;
use graha_common::{Language, SubjectParams};

/// Ten-attribute guna milan table with grand total
pub fn guna_section(engine: &mut LayoutEngine, score: &ScoreTable, lang: Language) {
    engine.heading("Guna Milan");
    engine.paragraph(phrase(lang, Phrase::GunaIntro));
    engine.spacer(6.0);

    let mut rows: Vec<Vec<String>> = score
        .rows
        .iter()
        .map(|r| {
            vec![
                r.attribute.to_string(),
                r.groom_value.clone(),
                r.bride_value.clone(),
                format_points(r.max_points),
                format_points(r.received_points),
            ]
        })
        .collect();
    rows.push(vec![
        "Total".to_string(),
        String::new(),
        String::new(),
        format_points(score.total_max),
        format_points(score.total_received),
    ]);

    engine.table(&TableSpec {
        col_fractions: vec![0.22, 0.24, 0.24, 0.15, 0.15],
        headers: ["Attribute", "Groom", "Bride", "Maximum", "Obtained"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        rows,
        font_size: 9.0,
    });

    engine.text_block(
        &format!(
            "Obtained {} of {} points.",
            format_points(score.total_received),
            format_points(score.total_max)
        ),
        Font::HelveticaBold,
        11.0,
    );
    engine.spacer(10.0);
}

/// Manglik comparison table plus the decision-table conclusion
pub fn manglik_section(
    engine: &mut LayoutEngine,
    compat: &CompatibilityReport,
    groom: &SubjectParams,
    bride: &SubjectParams,
    lang: Language,
) {
    let verdict = &compat.affliction;

    engine.heading("Manglik Analysis");

    let present_text = |present: bool| if present { "Present" } else { "Not present" };
    engine.table(&TableSpec {
        col_fractions: vec![0.4, 0.3, 0.3],
        headers: vec![
            "Subject".to_string(),
            "Manglik".to_string(),
            "Severity".to_string(),
        ],
        rows: vec![
            vec![
                groom.name.clone(),
                present_text(verdict.groom_present).to_string(),
                format!("{:.0}%", verdict.groom_percent),
            ],
            vec![
                bride.name.clone(),
                present_text(verdict.bride_present).to_string(),
                format!("{:.0}%", verdict.bride_percent),
            ],
        ],
        font_size: 10.0,
    });

    let key = match verdict.conclusion() {
        AfflictionConclusion::FavorableAbsent => Phrase::ManglikAbsent,
        AfflictionConclusion::FavorableNeutralized => Phrase::ManglikNeutralized,
        AfflictionConclusion::UnfavorableRemediable => Phrase::ManglikOneSided,
    };
    engine.paragraph(phrase(lang, key));
    engine.spacer(10.0);
}

/// Papasamyam totals and the directional verdict
pub fn papasamyam_section(engine: &mut LayoutEngine, balance: &BalanceVerdict, lang: Language) {
    engine.heading("Papasamyam");

    engine.table(&TableSpec {
        col_fractions: vec![0.5, 0.5],
        headers: vec!["Side".to_string(), "Malefic Points".to_string()],
        rows: vec![
            vec!["Groom".to_string(), format_points(balance.groom_total)],
            vec!["Bride".to_string(), format_points(balance.bride_total)],
        ],
        font_size: 10.0,
    });

    let key = if balance.favorable {
        Phrase::PapaFavorable
    } else {
        Phrase::PapaUnfavorable
    };
    engine.paragraph(phrase(lang, key));
    engine.spacer(10.0);
}

/// Overall conclusion: upstream report prose when available, then the
/// verdict-driven closing phrase
pub fn conclusion_section(
    engine: &mut LayoutEngine,
    compat: &CompatibilityReport,
    pair_bag: &FactBag,
    lang: Language,
) {
    let x = Extract::new(pair_bag);

    engine.heading("Conclusion");

    let upstream = x.text(
        MATCH_MAKING_REPORT,
        &["conclusion.match_report", "match_report", "report"],
        "",
    );
    if !upstream.is_empty() {
        engine.paragraph(&upstream);
        engine.spacer(4.0);
    }

    let favorable = is_overall_favorable(compat);
    let key = if favorable {
        Phrase::ConclusionFavorable
    } else {
        Phrase::ConclusionCaution
    };
    engine.text_block(phrase(lang, key), Font::HelveticaBold, 10.0);
    engine.spacer(8.0);
}

/// Combined favorability across all three verdicts
///
/// Half the guna maximum is the classical acceptance threshold.
pub fn is_overall_favorable(compat: &CompatibilityReport) -> bool {
    let score_ok = compat.score.total_max > 0.0
        && compat.score.total_received >= compat.score.total_max / 2.0;
    let manglik_ok = compat.affliction.conclusion() != AfflictionConclusion::UnfavorableRemediable;
    score_ok && manglik_ok && compat.balance.favorable
}

fn format_points(points: f64) -> String {
    if (points - points.round()).abs() < 1e-9 {
        format!("{}", points.round() as i64)
    } else {
        format!("{:.1}", points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HeaderFooter, PageGeometry, Primitive};
    use crate::scoring::{AfflictionVerdict, ScoreRow};

    fn finish_texts(e: LayoutEngine) -> Vec<String> {
        e.finish(&HeaderFooter {
            title: String::new(),
            subject_line: String::new(),
            brand: String::new(),
        })
        .iter()
        .flat_map(|p| p.primitives.iter())
        .filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
    }

    fn score(received: f64) -> ScoreTable {
        ScoreTable {
            rows: vec![ScoreRow {
                attribute: "Dina",
                groom_value: "Rohini".to_string(),
                bride_value: "Mrigasira".to_string(),
                max_points: 3.0,
                received_points: 3.0,
            }],
            total_received: received,
            total_max: 36.0,
            total_mismatch: false,
        }
    }

    fn compat(received: f64, groom_manglik: bool, bride_manglik: bool, favorable: bool) -> CompatibilityReport {
        CompatibilityReport {
            score: score(received),
            affliction: AfflictionVerdict {
                groom_present: groom_manglik,
                bride_present: bride_manglik,
                groom_percent: 0.0,
                bride_percent: 0.0,
            },
            balance: BalanceVerdict {
                groom_total: 2.0,
                bride_total: if favorable { 1.0 } else { 3.0 },
                favorable,
            },
        }
    }

    #[test]
    fn test_guna_table_shows_total_line() {
        let mut e = LayoutEngine::new(PageGeometry::a4());
        guna_section(&mut e, &score(24.0), Language::En);
        let all = finish_texts(e);

        assert!(all.iter().any(|t| t == "Rohini"));
        assert!(all.iter().any(|t| t.contains("Obtained 24 of 36 points")));
    }

    #[test]
    fn test_overall_favorability_rules() {
        assert!(is_overall_favorable(&compat(20.0, false, false, true)));
        assert!(is_overall_favorable(&compat(20.0, true, true, true)));
        // Below half the maximum
        assert!(!is_overall_favorable(&compat(17.0, false, false, true)));
        // One-sided manglik
        assert!(!is_overall_favorable(&compat(20.0, true, false, true)));
        // Adverse papasamyam
        assert!(!is_overall_favorable(&compat(20.0, false, false, false)));
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(36.0), "36");
        assert_eq!(format_points(2.5), "2.5");
        assert_eq!(format_points(0.0), "0");
    }
}

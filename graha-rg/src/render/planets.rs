//! Planetary positions table and chart diagrams

use crate::extract::{field_number, field_text, Extract};
use crate::i18n::{phrase, Phrase};
use crate::layout::chart::{draw_chart, DiagramSlotMap, CHART_BLOCK_HEIGHT};
use crate::layout::{LayoutEngine, TableSpec};
use crate::services::aggregator::FactBag;
use crate::services::catalog::{HORO_CHART_D1, HORO_CHART_D9, PLANETS};
use graha_common::Language;

/// Planetary positions table
pub fn planets_section(engine: &mut LayoutEngine, bag: &FactBag, lang: Language) {
    let x = Extract::new(bag);

    engine.heading("Planetary Positions");
    engine.paragraph(phrase(lang, Phrase::PlanetsIntro));
    engine.spacer(6.0);

    let mut rows = Vec::new();
    for item in x.list(PLANETS, &["", "planets"]) {
        let degree = field_number(item, &["normDegree", "norm_degree", "degree"], f64::NAN);
        let degree_text = if degree.is_finite() {
            format!("{:.2}\u{00b0}", degree)
        } else {
            "N/A".to_string()
        };
        rows.push(vec![
            field_text(item, &["name", "planet"], "N/A"),
            field_text(item, &["sign", "rasi"], "N/A"),
            field_text(item, &["signLord", "sign_lord"], "N/A"),
            degree_text,
            field_text(item, &["house", "house_number"], "N/A"),
            field_text(item, &["nakshatra", "naksahtra"], "N/A"),
        ]);
    }

    if rows.is_empty() {
        engine.paragraph(phrase(lang, Phrase::DataUnavailable));
        engine.spacer(8.0);
        return;
    }

    engine.table(&TableSpec {
        col_fractions: vec![0.18, 0.16, 0.16, 0.14, 0.12, 0.24],
        headers: ["Planet", "Sign", "Sign Lord", "Degree", "House", "Nakshatra"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        rows,
        font_size: 9.0,
    });
}

/// Lagna (D1) chart with caption
pub fn lagna_chart(engine: &mut LayoutEngine, bag: &FactBag, subject_name: &str) {
    engine.spacer(8.0);
    let slots = DiagramSlotMap::from_chart_fact(bag, HORO_CHART_D1);
    draw_chart(engine, &slots, &format!("Lagna Chart - {}", subject_name));
    engine.spacer(8.0);
}

/// Lagna and navamsa charts, stacked
pub fn charts_section(engine: &mut LayoutEngine, bag: &FactBag, lang: Language) {
    engine.heading("Charts");
    engine.paragraph(phrase(lang, Phrase::ChartsIntro));
    engine.spacer(10.0);

    // Both diagrams have a constant footprint; keep each whole on a page
    engine.ensure_space(CHART_BLOCK_HEIGHT);
    let d1 = DiagramSlotMap::from_chart_fact(bag, HORO_CHART_D1);
    draw_chart(engine, &d1, "Lagna Chart (D1)");
    engine.spacer(14.0);

    engine.ensure_space(CHART_BLOCK_HEIGHT);
    let d9 = DiagramSlotMap::from_chart_fact(bag, HORO_CHART_D9);
    draw_chart(engine, &d9, "Navamsa Chart (D9)");
    engine.spacer(8.0);
}

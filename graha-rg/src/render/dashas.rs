//! Vimshottari dasha sections

use crate::extract::{field_text, Extract};
use crate::i18n::{phrase, Phrase};
use crate::layout::{LayoutEngine, TableSpec};
use crate::services::aggregator::FactBag;
use crate::services::catalog::{CURRENT_VDASHA, MAJOR_VDASHA};
use graha_common::Language;

/// Major periods plus the currently running period detail
pub fn dasha_section(engine: &mut LayoutEngine, bag: &FactBag, lang: Language) {
    let x = Extract::new(bag);

    engine.heading("Vimshottari Dasha");
    engine.paragraph(phrase(lang, Phrase::DashaIntro));
    engine.spacer(6.0);

    // Major period table
    let mut rows = Vec::new();
    for item in x.list(MAJOR_VDASHA, &["", "major_dasha", "dashas"]) {
        rows.push(vec![
            field_text(item, &["planet", "dasha", "name"], "N/A"),
            field_text(item, &["start", "dasha_start_date", "from"], "N/A"),
            field_text(item, &["end", "dasha_end_date", "to"], "N/A"),
        ]);
    }

    if rows.is_empty() {
        engine.paragraph(phrase(lang, Phrase::DataUnavailable));
        engine.spacer(8.0);
    } else {
        engine.table(&TableSpec {
            col_fractions: vec![0.3, 0.35, 0.35],
            headers: vec![
                "Mahadasha".to_string(),
                "Starts".to_string(),
                "Ends".to_string(),
            ],
            rows,
            font_size: 10.0,
        });
    }

    // Currently running periods
    engine.heading("Current Dasha");
    let major = x.text(
        CURRENT_VDASHA,
        &["major_dasha.planet", "major.planet", "planet"],
        "N/A",
    );
    let minor = x.text(
        CURRENT_VDASHA,
        &["minor_dasha.planet", "sub.planet", "antardasha"],
        "N/A",
    );
    let until = x.text(
        CURRENT_VDASHA,
        &["minor_dasha.end", "major_dasha.end", "end"],
        "N/A",
    );
    engine.paragraph(&format!(
        "Running mahadasha: {}. Running antardasha: {}. Current period ends {}.",
        major, minor, until
    ));

    let sub_rows: Vec<Vec<String>> = x
        .list(CURRENT_VDASHA, &["sub_periods", "antardashas"])
        .iter()
        .map(|item| {
            vec![
                field_text(item, &["planet", "name"], "N/A"),
                field_text(item, &["start", "from"], "N/A"),
                field_text(item, &["end", "to"], "N/A"),
            ]
        })
        .collect();

    if !sub_rows.is_empty() {
        engine.spacer(6.0);
        engine.table(&TableSpec {
            col_fractions: vec![0.3, 0.35, 0.35],
            headers: vec![
                "Antardasha".to_string(),
                "Starts".to_string(),
                "Ends".to_string(),
            ],
            rows: sub_rows,
            font_size: 10.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HeaderFooter, PageGeometry, Primitive};
    use crate::services::fact_client::FactResult;
    use serde_json::json;

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

    #[test]
    fn test_major_periods_render() {
        let bag = FactBag::from_results(vec![
            FactResult::ok(
                MAJOR_VDASHA,
                json!([
                    {"planet": "Ketu", "start": "1992-03-14", "end": "1999-03-14"},
                    {"planet": "Venus", "start": "1999-03-14", "end": "2019-03-14"},
                ]),
            ),
            FactResult::ok(
                CURRENT_VDASHA,
                json!({"major_dasha": {"planet": "Venus", "end": "2019-03-14"},
                       "minor_dasha": {"planet": "Saturn", "end": "2012-06-01"}}),
            ),
        ]);

        let mut e = LayoutEngine::new(PageGeometry::a4());
        dasha_section(&mut e, &bag, Language::En);
        let all = finish_texts(e);

        assert!(all.iter().any(|t| t == "Ketu"));
        assert!(all.iter().any(|t| t == "1999-03-14"));
        assert!(all
            .iter()
            .any(|t| t.contains("Running mahadasha: Venus")));
    }

    #[test]
    fn test_empty_dasha_degrades() {
        let bag = FactBag::default();
        let mut e = LayoutEngine::new(PageGeometry::a4());
        dasha_section(&mut e, &bag, Language::En);
        let all = finish_texts(e);

        assert!(all.iter().any(|t| t.contains("unavailable")));
        assert!(all.iter().any(|t| t.contains("Running mahadasha: N/A")));
    }
}

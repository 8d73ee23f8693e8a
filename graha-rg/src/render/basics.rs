//! Birth details, avakahada, and panchang sections

use crate::extract::Extract;
use crate::i18n::{phrase, Phrase};
use crate::layout::{LayoutEngine, TableSpec};
use crate::services::aggregator::FactBag;
use crate::services::catalog::{ASTRO_DETAILS, BIRTH_DETAILS, PANCHANG};
use graha_common::{Language, SubjectParams};

fn two_column(rows: Vec<(String, String)>) -> TableSpec {
    TableSpec {
        col_fractions: vec![0.35, 0.65],
        headers: vec!["Particular".to_string(), "Value".to_string()],
        rows: rows.into_iter().map(|(k, v)| vec![k, v]).collect(),
        font_size: 10.0,
    }
}

/// Birth particulars table, from the validated request parameters plus the
/// provider's birth-details echo (sunrise, sunset, ayanamsha)
pub fn birth_details_section(
    engine: &mut LayoutEngine,
    subject: &SubjectParams,
    bag: &FactBag,
    lang: Language,
) {
    let x = Extract::new(bag);

    engine.heading(&format!("Birth Details - {}", subject.name));
    engine.paragraph(phrase(lang, Phrase::BirthDetailsIntro));
    engine.spacer(6.0);

    let rows = vec![
        ("Name".to_string(), subject.name.clone()),
        ("Gender".to_string(), subject.gender.as_str().to_string()),
        (
            "Date of Birth".to_string(),
            subject.birth_date.format("%d %B %Y").to_string(),
        ),
        (
            "Time of Birth".to_string(),
            subject.birth_time.format("%H:%M").to_string(),
        ),
        ("Place".to_string(), subject.place.clone()),
        (
            "Coordinates".to_string(),
            format!("{:.4}, {:.4}", subject.latitude, subject.longitude),
        ),
        (
            "Timezone".to_string(),
            format!("UTC{:+}", subject.tz_offset_hours),
        ),
        (
            "Sunrise".to_string(),
            x.text(BIRTH_DETAILS, &["sunrise"], "N/A"),
        ),
        (
            "Sunset".to_string(),
            x.text(BIRTH_DETAILS, &["sunset"], "N/A"),
        ),
        (
            "Ayanamsha".to_string(),
            x.text(BIRTH_DETAILS, &["ayanamsha", "ayanamsa"], "N/A"),
        ),
    ];
    engine.table(&two_column(rows));
}

/// Avakahada attribute table
pub fn avakahada_section(engine: &mut LayoutEngine, bag: &FactBag, _lang: Language) {
    let x = Extract::new(bag);

    engine.heading("Avakahada Chakra");

    let attr = |label: &str, paths: &[&str]| -> (String, String) {
        (label.to_string(), x.text(ASTRO_DETAILS, paths, "N/A"))
    };

    let rows = vec![
        attr("Nakshatra", &["naksahtra", "nakshatra"]),
        attr("Nakshatra Pada", &["naksahtra_pada", "charan", "pada"]),
        attr("Rasi (Moon Sign)", &["rasi", "moon_sign"]),
        attr("Ascendant", &["ascendant", "lagna"]),
        attr("Gana", &["gan", "gana"]),
        attr("Nadi", &["nadi"]),
        attr("Varna", &["varna", "vern"]),
        attr("Yoni", &["yoni"]),
        attr("Tatva", &["tatva", "tattva"]),
        attr("Name Alphabet", &["name_alphabet", "name_start"]),
        attr("Paya", &["paya"]),
    ];
    engine.table(&two_column(rows));
}

/// Panchang table for the birth moment
pub fn panchang_section(engine: &mut LayoutEngine, bag: &FactBag, lang: Language) {
    let x = Extract::new(bag);

    engine.heading("Panchang");
    engine.paragraph(phrase(lang, Phrase::PanchangIntro));
    engine.spacer(6.0);

    let rows = vec![
        (
            "Day".to_string(),
            x.text(PANCHANG, &["day", "vaar", "weekday"], "N/A"),
        ),
        (
            "Tithi".to_string(),
            x.text(PANCHANG, &["tithi", "tithi.details.tithi_name"], "N/A"),
        ),
        (
            "Yoga".to_string(),
            x.text(PANCHANG, &["yog", "yoga", "yog.details.yog_name"], "N/A"),
        ),
        (
            "Karana".to_string(),
            x.text(PANCHANG, &["karan", "karana"], "N/A"),
        ),
        (
            "Sunrise".to_string(),
            x.text(PANCHANG, &["sunrise"], "N/A"),
        ),
        ("Sunset".to_string(), x.text(PANCHANG, &["sunset"], "N/A")),
    ];
    engine.table(&two_column(rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HeaderFooter, PageGeometry, Primitive};
    use crate::services::fact_client::FactResult;
    use chrono::{NaiveDate, NaiveTime};
    use graha_common::Gender;
    use serde_json::json;

    fn subject() -> SubjectParams {
        SubjectParams {
            name: "Asha".to_string(),
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(1992, 3, 14).unwrap(),
            birth_time: NaiveTime::from_hms_opt(6, 45, 0).unwrap(),
            latitude: 28.6139,
            longitude: 77.209,
            tz_offset_hours: 5.5,
            place: "New Delhi".to_string(),
        }
    }

    fn texts(pages: &[crate::layout::Page]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.primitives.iter())
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_birth_details_uses_fact_payload() {
        let bag = FactBag::from_results(vec![FactResult::ok(
            BIRTH_DETAILS,
            json!({"sunrise": "6:12:08", "sunset": "18:31:55"}),
        )]);
        let mut e = LayoutEngine::new(PageGeometry::a4());
        birth_details_section(&mut e, &subject(), &bag, Language::En);
        let pages = e.finish(&HeaderFooter {
            title: String::new(),
            subject_line: String::new(),
            brand: String::new(),
        });

        let all = texts(&pages);
        assert!(all.iter().any(|t| t == "6:12:08"));
        assert!(all.iter().any(|t| t == "Asha"));
    }

    #[test]
    fn test_sections_render_defaults_on_empty_bag() {
        let bag = FactBag::default();
        let mut e = LayoutEngine::new(PageGeometry::a4());
        birth_details_section(&mut e, &subject(), &bag, Language::En);
        avakahada_section(&mut e, &bag, Language::En);
        panchang_section(&mut e, &bag, Language::En);
        let pages = e.finish(&HeaderFooter {
            title: String::new(),
            subject_line: String::new(),
            brand: String::new(),
        });

        let all = texts(&pages);
        assert!(all.iter().any(|t| t == "N/A"), "defaults must render");
        assert!(all.iter().any(|t| t == "Panchang"));
    }
}

//! Dosha status blocks and remedies grid

use crate::extract::Extract;
use crate::i18n::{phrase, Phrase};
use crate::layout::{Card, LayoutEngine};
use crate::services::aggregator::FactBag;
use crate::services::catalog::{
    GEM_SUGGESTION, KALSARPA_DETAILS, MANGLIK, RUDRAKSHA_SUGGESTION, SADHESATI_STATUS,
};
use graha_common::Language;

/// Manglik, kalsarpa, and sadhesati status blocks
pub fn dosha_section(engine: &mut LayoutEngine, bag: &FactBag, lang: Language) {
    let x = Extract::new(bag);

    engine.heading("Doshas");
    engine.paragraph(phrase(lang, Phrase::YogaIntro));
    engine.spacer(6.0);

    // Manglik (same payload locations the scoring engine reads)
    let manglik_present = x.boolean(MANGLIK, &crate::scoring::dosha::PRESENT_PATHS, false);
    let manglik_percent = x.number(MANGLIK, &crate::scoring::dosha::PERCENT_PATHS, 0.0);
    let manglik_line = if manglik_present {
        format!(
            "Manglik dosha: present ({:.0}% severity).",
            manglik_percent.clamp(0.0, 100.0)
        )
    } else {
        "Manglik dosha: not present.".to_string()
    };
    engine.paragraph(&manglik_line);

    // Kalsarpa
    let kalsarpa_present = x.boolean(KALSARPA_DETAILS, &["present", "is_present"], false);
    let kalsarpa_type = x.text(KALSARPA_DETAILS, &["type", "name", "one_line"], "N/A");
    let kalsarpa_line = if kalsarpa_present {
        format!("Kalsarpa dosha: present ({}).", kalsarpa_type)
    } else {
        "Kalsarpa dosha: not present.".to_string()
    };
    engine.paragraph(&kalsarpa_line);

    // Sadhesati
    let sadhesati = x.boolean(
        SADHESATI_STATUS,
        &["sadhesati_status", "is_undergoing_sadhesati", "status"],
        false,
    );
    let sadhesati_line = if sadhesati {
        "Sadhesati: currently undergoing.".to_string()
    } else {
        "Sadhesati: not currently undergoing.".to_string()
    };
    engine.paragraph(&sadhesati_line);
    engine.spacer(8.0);
}

/// Gem and rudraksha suggestion cards
pub fn remedies_section(engine: &mut LayoutEngine, bag: &FactBag, lang: Language) {
    let x = Extract::new(bag);

    engine.heading("Remedies");
    engine.paragraph(phrase(lang, Phrase::RemediesIntro));
    engine.spacer(8.0);

    let gem_card = Card {
        title: "Gemstone".to_string(),
        lines: vec![
            format!(
                "Life stone: {}",
                x.text(GEM_SUGGESTION, &["LIFE.name", "life_stone", "gem"], "N/A")
            ),
            format!(
                "Lucky stone: {}",
                x.text(GEM_SUGGESTION, &["LUCKY.name", "lucky_stone"], "N/A")
            ),
            format!(
                "Wear on: {}",
                x.text(
                    GEM_SUGGESTION,
                    &["LIFE.wear_finger", "wear_finger", "finger"],
                    "N/A"
                )
            ),
        ],
    };

    let rudraksha_card = Card {
        title: "Rudraksha".to_string(),
        lines: vec![
            format!(
                "Recommended: {}",
                x.text(
                    RUDRAKSHA_SUGGESTION,
                    &["recommend", "mukhi", "rudraksha"],
                    "N/A"
                )
            ),
            format!(
                "Day to wear: {}",
                x.text(RUDRAKSHA_SUGGESTION, &["day_to_wear", "day"], "N/A")
            ),
        ],
    };

    engine.card_grid(&[gem_card, rudraksha_card], 2, 90.0);
    engine.spacer(8.0);
}

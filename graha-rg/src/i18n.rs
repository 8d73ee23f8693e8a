//! Fixed report phrases, selected by language
//!
//! The language selector decides which static text block a section renders;
//! the catalog itself is intentionally small and lives entirely here so
//! sections never branch on language themselves. Hindi entries are Latin
//! transliterations (the PDF backend emits WinAnsi text).

use graha_common::Language;

/// Keys for the fixed prose blocks used across report sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    HoroscopeTitle,
    MatchTitle,
    CoverTagline,
    BirthDetailsIntro,
    PanchangIntro,
    PlanetsIntro,
    ChartsIntro,
    DashaIntro,
    YogaIntro,
    RemediesIntro,
    GunaIntro,
    ManglikAbsent,
    ManglikNeutralized,
    ManglikOneSided,
    PapaFavorable,
    PapaUnfavorable,
    ConclusionFavorable,
    ConclusionCaution,
    BackCoverNote,
    DataUnavailable,
}

/// Look up one phrase in the requested language
pub fn phrase(lang: Language, key: Phrase) -> &'static str {
    use Phrase::*;
    match (lang, key) {
        (Language::En, HoroscopeTitle) => "Vedic Horoscope Report",
        (Language::Hi, HoroscopeTitle) => "Janam Kundli Report",

        (Language::En, MatchTitle) => "Marriage Compatibility Report",
        (Language::Hi, MatchTitle) => "Vivah Milan Report",

        (Language::En, CoverTagline) => "Prepared from the positions of the grahas at birth",
        (Language::Hi, CoverTagline) => "Janm samay ke graha sthiti ke aadhar par",

        (Language::En, BirthDetailsIntro) => {
            "The following tables summarize the birth particulars and the \
             avakahada attributes derived from the natal chart."
        }
        (Language::Hi, BirthDetailsIntro) => {
            "Neeche di gayi saaranee mein janm vivaran aur avakahada chakra \
             diye gaye hain."
        }

        (Language::En, PanchangIntro) => {
            "Panchang elements prevailing at the moment of birth."
        }
        (Language::Hi, PanchangIntro) => "Janm samay ka panchang vivaran.",

        (Language::En, PlanetsIntro) => {
            "Longitudes, signs and houses of the nine grahas at the time of birth."
        }
        (Language::Hi, PlanetsIntro) => {
            "Janm samay par navagraha ki sthiti, rashi aur bhava."
        }

        (Language::En, ChartsIntro) => {
            "The lagna chart shows the houses as placed at birth; the navamsa \
             refines planetary strength for marriage and fortune."
        }
        (Language::Hi, ChartsIntro) => {
            "Lagna kundli janm ki bhava sthiti dikhati hai; navamsa vivah aur \
             bhagya ke liye sookshm bal batata hai."
        }

        (Language::En, DashaIntro) => {
            "Vimshottari dasha periods, with the currently running major and \
             sub periods."
        }
        (Language::Hi, DashaIntro) => {
            "Vimshottari dasha kram, vartamaan mahadasha aur antardasha sahit."
        }

        (Language::En, YogaIntro) => {
            "Notable doshas and their present status for the subject."
        }
        (Language::Hi, YogaIntro) => "Pramukh dosh aur unki vartamaan sthiti.",

        (Language::En, RemediesIntro) => {
            "Suggested gemstones and rudraksha, per the natal chart."
        }
        (Language::Hi, RemediesIntro) => {
            "Kundli ke anusaar sujhaye gaye ratna aur rudraksha."
        }

        (Language::En, GunaIntro) => {
            "Attribute-wise compatibility points for the couple, scored \
             against the classical maxima."
        }
        (Language::Hi, GunaIntro) => {
            "Var-vadhu ke gun milan ank, shastriya adhiktam ke saath."
        }

        (Language::En, ManglikAbsent) => {
            "Neither partner is manglik. The match is favorable on this count."
        }
        (Language::Hi, ManglikAbsent) => {
            "Dono mein mangal dosh nahi hai. Is drishti se milan shubh hai."
        }

        (Language::En, ManglikNeutralized) => {
            "Both partners are manglik; the doshas cancel each other and the \
             match is considered favorable."
        }
        (Language::Hi, ManglikNeutralized) => {
            "Dono manglik hain; dosh paraspar nirast ho jata hai aur milan \
             shubh mana jata hai."
        }

        (Language::En, ManglikOneSided) => {
            "Only one partner is manglik. The match is unfavorable on this \
             count, but classical remedies apply."
        }
        (Language::Hi, ManglikOneSided) => {
            "Keval ek paksha manglik hai. Is drishti se milan pratikool hai, \
             kintu shastriya upay uplabdh hain."
        }

        (Language::En, PapaFavorable) => {
            "The malefic point balance between the charts is acceptable."
        }
        (Language::Hi, PapaFavorable) => "Papa samyam santulit hai.",

        (Language::En, PapaUnfavorable) => {
            "The malefic point balance is adverse and deserves attention."
        }
        (Language::Hi, PapaUnfavorable) => {
            "Papa samyam pratikool hai; vichar apekshit hai."
        }

        (Language::En, ConclusionFavorable) => {
            "Taken together, the scores indicate a favorable alliance."
        }
        (Language::Hi, ConclusionFavorable) => {
            "Samagra roop se yah sambandh shubh pratit hota hai."
        }

        (Language::En, ConclusionCaution) => {
            "The scores suggest caution; a qualified astrologer should be \
             consulted before proceeding."
        }
        (Language::Hi, ConclusionCaution) => {
            "Ank savdhani ka sanket dete hain; aage badhne se pahle yogya \
             jyotishi se paramarsh len."
        }

        (Language::En, BackCoverNote) => {
            "This report is generated from computed planetary data and is \
             intended for guidance only."
        }
        (Language::Hi, BackCoverNote) => {
            "Yah report ganit kiye gaye graha datta par aadharit hai aur \
             keval margdarshan hetu hai."
        }

        (Language::En, DataUnavailable) => "Data unavailable for this section.",
        (Language::Hi, DataUnavailable) => "Is khand ke liye datta uplabdh nahi hai.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_switches_text_block() {
        let en = phrase(Language::En, Phrase::HoroscopeTitle);
        let hi = phrase(Language::Hi, Phrase::HoroscopeTitle);
        assert_ne!(en, hi);
    }

    #[test]
    fn test_all_phrases_present_in_both_languages() {
        use Phrase::*;
        let keys = [
            HoroscopeTitle, MatchTitle, CoverTagline, BirthDetailsIntro,
            PanchangIntro, PlanetsIntro, ChartsIntro, DashaIntro, YogaIntro,
            RemediesIntro, GunaIntro, ManglikAbsent, ManglikNeutralized,
            ManglikOneSided, PapaFavorable, PapaUnfavorable,
            ConclusionFavorable, ConclusionCaution, BackCoverNote,
            DataUnavailable,
        ];
        for key in keys {
            assert!(!phrase(Language::En, key).is_empty());
            assert!(!phrase(Language::Hi, key).is_empty());
        }
    }
}

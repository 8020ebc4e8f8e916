//! Fixed option lists the form draws from
//!
//! Every value carries a display label (used verbatim in prompts, documents
//! and form files) and a kebab-case slug for command-line input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A value from one of the closed option lists
pub trait OptionValue: Copy + Eq + 'static {
    /// Human name of the list, used in error messages
    const KIND: &'static str;

    /// Every value, in display order
    const ALL: &'static [Self];

    /// Display label
    fn label(&self) -> &'static str;

    /// Kebab-case identifier
    fn slug(&self) -> &'static str;
}

/// Error returned when text matches no value of an option list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} '{input}'. Valid choices: {choices}")]
pub struct OptionParseError {
    pub kind: &'static str,
    pub input: String,
    pub choices: String,
}

/// Parse a label or slug, ignoring case and surrounding whitespace
pub fn parse_option<T: OptionValue>(input: &str) -> Result<T, OptionParseError> {
    debug!(kind = T::KIND, %input, "parse_option: called");
    let needle = input.trim();
    T::ALL
        .iter()
        .copied()
        .find(|value| value.label().eq_ignore_ascii_case(needle) || value.slug().eq_ignore_ascii_case(needle))
        .ok_or_else(|| {
            debug!(kind = T::KIND, %input, "parse_option: no match");
            OptionParseError {
                kind: T::KIND,
                input: input.to_string(),
                choices: T::ALL.iter().map(|v| v.slug()).collect::<Vec<_>>().join(", "),
            }
        })
}

/// School level (jenjang)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[default]
    #[serde(rename = "MI")]
    Mi,
    #[serde(rename = "MTs")]
    Mts,
    #[serde(rename = "MA")]
    Ma,
}

impl OptionValue for Level {
    const KIND: &'static str = "level";
    const ALL: &'static [Self] = &[Self::Mi, Self::Mts, Self::Ma];

    fn label(&self) -> &'static str {
        match self {
            Self::Mi => "MI",
            Self::Mts => "MTs",
            Self::Ma => "MA",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Self::Mi => "mi",
            Self::Mts => "mts",
            Self::Ma => "ma",
        }
    }
}

/// Pedagogical practice assignable to a meeting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pedagogy {
    #[default]
    #[serde(rename = "Inkuiri-Discovery")]
    InquiryDiscovery,
    #[serde(rename = "PjBL")]
    ProjectBased,
    #[serde(rename = "Cooperative Learning")]
    Cooperative,
    #[serde(rename = "Experiential Learning (ARKA)")]
    Experiential,
}

impl OptionValue for Pedagogy {
    const KIND: &'static str = "pedagogy";
    const ALL: &'static [Self] = &[
        Self::InquiryDiscovery,
        Self::ProjectBased,
        Self::Cooperative,
        Self::Experiential,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::InquiryDiscovery => "Inkuiri-Discovery",
            Self::ProjectBased => "PjBL",
            Self::Cooperative => "Cooperative Learning",
            Self::Experiential => "Experiential Learning (ARKA)",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Self::InquiryDiscovery => "inkuiri-discovery",
            Self::ProjectBased => "pjbl",
            Self::Cooperative => "cooperative-learning",
            Self::Experiential => "experiential-learning",
        }
    }
}

/// Graduate profile dimension (dimensi lulusan)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "Keimanan & Ketakwaan")]
    Faith,
    #[serde(rename = "Kewargaan")]
    Citizenship,
    #[serde(rename = "Penalaran Kritis")]
    CriticalReasoning,
    #[serde(rename = "Kreativitas")]
    Creativity,
    #[serde(rename = "Kolaborasi")]
    Collaboration,
    #[serde(rename = "Kemandirian")]
    Independence,
    #[serde(rename = "Kesehatan")]
    Health,
    #[serde(rename = "Komunikasi")]
    Communication,
}

impl OptionValue for Dimension {
    const KIND: &'static str = "dimension";
    const ALL: &'static [Self] = &[
        Self::Faith,
        Self::Citizenship,
        Self::CriticalReasoning,
        Self::Creativity,
        Self::Collaboration,
        Self::Independence,
        Self::Health,
        Self::Communication,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Faith => "Keimanan & Ketakwaan",
            Self::Citizenship => "Kewargaan",
            Self::CriticalReasoning => "Penalaran Kritis",
            Self::Creativity => "Kreativitas",
            Self::Collaboration => "Kolaborasi",
            Self::Independence => "Kemandirian",
            Self::Health => "Kesehatan",
            Self::Communication => "Komunikasi",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Self::Faith => "keimanan-ketakwaan",
            Self::Citizenship => "kewargaan",
            Self::CriticalReasoning => "penalaran-kritis",
            Self::Creativity => "kreativitas",
            Self::Collaboration => "kolaborasi",
            Self::Independence => "kemandirian",
            Self::Health => "kesehatan",
            Self::Communication => "komunikasi",
        }
    }
}

/// Character-education theme (tema KBC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KbcTheme {
    #[serde(rename = "Cinta Allah & Rasul-Nya")]
    LoveOfGod,
    #[serde(rename = "Cinta Ilmu")]
    LoveOfKnowledge,
    #[serde(rename = "Cinta Lingkungan")]
    LoveOfEnvironment,
    #[serde(rename = "Cinta Diri & Sesama Manusia")]
    LoveOfSelfAndOthers,
    #[serde(rename = "Cinta Tanah Air")]
    LoveOfHomeland,
}

impl OptionValue for KbcTheme {
    const KIND: &'static str = "KBC theme";
    const ALL: &'static [Self] = &[
        Self::LoveOfGod,
        Self::LoveOfKnowledge,
        Self::LoveOfEnvironment,
        Self::LoveOfSelfAndOthers,
        Self::LoveOfHomeland,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::LoveOfGod => "Cinta Allah & Rasul-Nya",
            Self::LoveOfKnowledge => "Cinta Ilmu",
            Self::LoveOfEnvironment => "Cinta Lingkungan",
            Self::LoveOfSelfAndOthers => "Cinta Diri & Sesama Manusia",
            Self::LoveOfHomeland => "Cinta Tanah Air",
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Self::LoveOfGod => "cinta-allah-rasul",
            Self::LoveOfKnowledge => "cinta-ilmu",
            Self::LoveOfEnvironment => "cinta-lingkungan",
            Self::LoveOfSelfAndOthers => "cinta-diri-sesama",
            Self::LoveOfHomeland => "cinta-tanah-air",
        }
    }
}

macro_rules! impl_option_traits {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }

            impl FromStr for $ty {
                type Err = OptionParseError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_option(s)
                }
            }
        )*
    };
}

impl_option_traits!(Level, Pedagogy, Dimension, KbcTheme);

/// Join labels with `sep`, in the order given
pub fn join_labels<T: OptionValue>(values: &[T], sep: &str) -> String {
    values.iter().map(|v| v.label()).collect::<Vec<_>>().join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_label_and_slug() {
        assert_eq!("PjBL".parse::<Pedagogy>().unwrap(), Pedagogy::ProjectBased);
        assert_eq!("pjbl".parse::<Pedagogy>().unwrap(), Pedagogy::ProjectBased);
        assert_eq!(
            "  Experiential Learning (ARKA) ".parse::<Pedagogy>().unwrap(),
            Pedagogy::Experiential
        );
        assert_eq!("mts".parse::<Level>().unwrap(), Level::Mts);
        assert_eq!("keimanan & ketakwaan".parse::<Dimension>().unwrap(), Dimension::Faith);
        assert_eq!("cinta-tanah-air".parse::<KbcTheme>().unwrap(), KbcTheme::LoveOfHomeland);
    }

    #[test]
    fn test_parse_unknown_lists_choices() {
        let err = "SMA".parse::<Level>().unwrap_err();
        assert_eq!(err.kind, "level");
        assert_eq!(err.choices, "mi, mts, ma");
        assert!(err.to_string().contains("Unknown level 'SMA'"));
    }

    #[test]
    fn test_serde_uses_labels() {
        let yaml = serde_yaml::to_string(&vec![Pedagogy::Cooperative, Pedagogy::ProjectBased]).unwrap();
        assert!(yaml.contains("Cooperative Learning"));
        assert!(yaml.contains("PjBL"));

        let theme: KbcTheme = serde_yaml::from_str("Cinta Diri & Sesama Manusia").unwrap();
        assert_eq!(theme, KbcTheme::LoveOfSelfAndOthers);
    }

    #[test]
    fn test_labels_and_slugs_are_unique() {
        fn check<T: OptionValue>() {
            let mut labels: Vec<_> = T::ALL.iter().map(|v| v.label()).collect();
            let mut slugs: Vec<_> = T::ALL.iter().map(|v| v.slug()).collect();
            labels.sort();
            labels.dedup();
            slugs.sort();
            slugs.dedup();
            assert_eq!(labels.len(), T::ALL.len());
            assert_eq!(slugs.len(), T::ALL.len());
        }
        check::<Level>();
        check::<Pedagogy>();
        check::<Dimension>();
        check::<KbcTheme>();
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Level::default(), Level::Mi);
        assert_eq!(Pedagogy::default().label(), "Inkuiri-Discovery");
    }

    #[test]
    fn test_join_labels() {
        let dims = [Dimension::Collaboration, Dimension::Faith];
        assert_eq!(join_labels(&dims, ", "), "Kolaborasi, Keimanan & Ketakwaan");
        assert_eq!(join_labels::<KbcTheme>(&[], ", "), "");
    }
}

//! Closed enumerations used by the visit form

use crate::errors::{EnfermariaError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Label shared by every enumeration for "not applicable"
pub const NOT_APPLICABLE: &str = "N/A";

/// Declares a label-backed enumeration.
///
/// Serde goes through the label so JSON documents and database rows carry
/// the same text the operators see.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $display:literal {
            $($variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every member, in display order
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Parse a stored or typed label (trimmed, case-insensitive)
            pub fn from_label(label: &str) -> Result<Self> {
                let wanted = label.trim().to_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().to_lowercase() == wanted)
                    .ok_or_else(|| EnfermariaError::UnknownLabel {
                        enumeration: $display,
                        label: label.to_string(),
                    })
            }

            pub fn is_not_applicable(&self) -> bool {
                self.label() == NOT_APPLICABLE
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                $name::from_label(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

label_enum! {
    /// Symptom of a principal or secondary complaint
    ///
    /// `SanitaryPad` and `WorkAtHeight` are not clinical symptoms: selecting
    /// them as the principal complaint masks the rest of the form.
    Symptom, "symptom" {
        Pain => "Dor",
        BurningSensation => "Ardência/Queimação",
        Itching => "Coçeira/Irritaçao",
        Cut => "Corte",
        SprainStrain => "Torção/Distensão",
        Vertigo => "Vertigem",
        Vomiting => "Vômito",
        Nausea => "Náuseas",
        Weakness => "Fraqueza",
        MentalConfusion => "Confusão mental",
        Abrasion => "Abrasão/Escoriação",
        Anxiety => "Ansiedade",
        SanitaryPad => "Absorvente",
        WorkAtHeight => "Trabalho em altura",
        NotApplicable => "N/A",
    }
}

label_enum! {
    /// Body region of a complaint
    Region, "region" {
        Head => "Cabeça",
        Face => "Rosto",
        Eyes => "Olhos",
        Arms => "Braços",
        HandsFingers => "Mãos/Dedos",
        Chest => "Peitoral/Seios",
        Abdomen => "Barriga/Estômago",
        Legs => "Pernas",
        Foot => "Pé",
        Ankle => "Tornozelo",
        Menstrual => "Menstrual",
        NotApplicable => "N/A",
    }
}

label_enum! {
    /// Outcome classification of a conduct
    ConductSummary, "conduct summary" {
        UnderObservation => "Em observação",
        ReleasedToWork => "Liberado para operação",
        ExternalCareWithBrigade => "Liberado para atendimento externo c/ brigadista",
        ExternalCareWithoutBrigade => "Liberado para atendimento externo s/ brigadista",
        FitForWorkAtHeight => "Apto para trabalho em altura",
        UnfitForWorkAtHeight => "Inapto para trabalho em altura",
        NotApplicable => "N/A",
    }
}

label_enum! {
    /// Medication handed out during a conduct
    AdministeredMedication, "administered medication" {
        Paracetamol => "Paracetamol",
        Dipyrone => "Dipirona",
        Ibuprofen => "Ibuprofeno",
        Other => "Outros",
        NotApplicable => "N/A",
    }
}

impl Symptom {
    /// Members that get a one-hot export column
    pub fn exportable() -> impl Iterator<Item = Symptom> {
        Self::ALL.iter().copied().filter(|s| !s.is_not_applicable())
    }
}

impl Region {
    /// Members that get a one-hot export column
    pub fn exportable() -> impl Iterator<Item = Region> {
        Self::ALL.iter().copied().filter(|r| !r.is_not_applicable())
    }
}

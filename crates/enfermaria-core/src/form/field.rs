use crate::model::NOT_APPLICABLE;
use serde::Serialize;

/// Shape of the value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Text,
    /// Single selection from a list; stored as its label
    Choice,
    /// Checklist; stored as the list of checked labels
    MultiSelect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldValue {
    Text(String),
    Selection(Vec<String>),
}

impl FieldValue {
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Choice => FieldValue::Text(String::new()),
            FieldKind::MultiSelect => FieldValue::Selection(Vec::new()),
        }
    }

    /// Value written into a masked field; checklists are cleared instead
    pub fn masked(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Choice => FieldValue::Text(NOT_APPLICABLE.to_string()),
            FieldKind::MultiSelect => FieldValue::Selection(Vec::new()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Selection(_) => None,
        }
    }

    pub fn as_selection(&self) -> Option<&[String]> {
        match self {
            FieldValue::Selection(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Selection(items) => items.is_empty(),
        }
    }

    pub fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldValue::Text(_), FieldKind::Text | FieldKind::Choice)
                | (FieldValue::Selection(_), FieldKind::MultiSelect)
        )
    }
}

/// Visit-level fields that can be registered with the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum VisitField {
    Name,
    Login,
    Manager,
    Shift,
    Department,
    Process,
    Tenure,
    PrincipalRegion,
    SecondarySymptoms,
    SecondaryRegions,
    ComplaintHistory,
    Temperature,
    SystolicPressure,
    DiastolicPressure,
    HeartRate,
    Saturation,
    PreexistingConditions,
    Allergies,
    MedicationsInUse,
    Notes,
}

impl VisitField {
    /// Identification fields, prefilled from the last visit of a badge
    pub const IDENTIFICATION: &'static [VisitField] = &[
        VisitField::Name,
        VisitField::Login,
        VisitField::Manager,
        VisitField::Shift,
        VisitField::Department,
        VisitField::Process,
        VisitField::Tenure,
    ];

    /// Fields of the clinical sections (complaints, vitals, history)
    pub const CLINICAL: &'static [VisitField] = &[
        VisitField::PrincipalRegion,
        VisitField::SecondarySymptoms,
        VisitField::SecondaryRegions,
        VisitField::ComplaintHistory,
        VisitField::Temperature,
        VisitField::SystolicPressure,
        VisitField::DiastolicPressure,
        VisitField::HeartRate,
        VisitField::Saturation,
        VisitField::PreexistingConditions,
        VisitField::Allergies,
        VisitField::MedicationsInUse,
        VisitField::Notes,
    ];

    pub fn kind(&self) -> FieldKind {
        match self {
            VisitField::Manager
            | VisitField::Shift
            | VisitField::Department
            | VisitField::Process
            | VisitField::PrincipalRegion => FieldKind::Choice,
            VisitField::SecondarySymptoms | VisitField::SecondaryRegions => FieldKind::MultiSelect,
            _ => FieldKind::Text,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VisitField::Name => "name",
            VisitField::Login => "login",
            VisitField::Manager => "manager",
            VisitField::Shift => "shift",
            VisitField::Department => "department",
            VisitField::Process => "process",
            VisitField::Tenure => "tenure",
            VisitField::PrincipalRegion => "principal_region",
            VisitField::SecondarySymptoms => "secondary_symptoms",
            VisitField::SecondaryRegions => "secondary_regions",
            VisitField::ComplaintHistory => "complaint_history",
            VisitField::Temperature => "temperature",
            VisitField::SystolicPressure => "systolic_pressure",
            VisitField::DiastolicPressure => "diastolic_pressure",
            VisitField::HeartRate => "heart_rate",
            VisitField::Saturation => "saturation",
            VisitField::PreexistingConditions => "preexisting_conditions",
            VisitField::Allergies => "allergies",
            VisitField::MedicationsInUse => "medications_in_use",
            VisitField::Notes => "notes",
        }
    }
}

/// Fields repeated in every conduct section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConductField {
    Hypothesis,
    ConductTaken,
    Summary,
    AdministeredMedication,
    Medication,
    Dosage,
    MedicationTime,
    Notes,
}

impl ConductField {
    pub const ALL: &'static [ConductField] = &[
        ConductField::Hypothesis,
        ConductField::ConductTaken,
        ConductField::Summary,
        ConductField::AdministeredMedication,
        ConductField::Medication,
        ConductField::Dosage,
        ConductField::MedicationTime,
        ConductField::Notes,
    ];

    pub fn kind(&self) -> FieldKind {
        match self {
            ConductField::Summary | ConductField::AdministeredMedication => FieldKind::Choice,
            _ => FieldKind::Text,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConductField::Hypothesis => "hypothesis",
            ConductField::ConductTaken => "conduct_taken",
            ConductField::Summary => "summary",
            ConductField::AdministeredMedication => "administered_medication",
            ConductField::Medication => "medication",
            ConductField::Dosage => "dosage",
            ConductField::MedicationTime => "medication_time",
            ConductField::Notes => "notes",
        }
    }
}

/// Stable key of a conduct section; never reused after removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConductKey(pub u64);

/// A registered, maskable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FieldId {
    Visit(VisitField),
    Conduct(ConductKey, ConductField),
}

impl FieldId {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldId::Visit(f) => f.kind(),
            FieldId::Conduct(_, f) => f.kind(),
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldId::Visit(field) => write!(f, "{}", field.name()),
            FieldId::Conduct(key, field) => write!(f, "conduct[{}].{}", key.0, field.name()),
        }
    }
}

/// What the presentation layer renders for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub enabled: bool,
    pub value: FieldValue,
    /// The value was written by a mask, not typed
    pub forced: bool,
}

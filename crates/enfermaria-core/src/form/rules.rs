use super::field::{ConductField, FieldId, VisitField};
use crate::model::Symptom;
use serde::Serialize;
use std::collections::BTreeSet;

/// Mode selected by the principal-complaint symptom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormMode {
    Unrestricted,
    FullyMasked,
    PartiallyMasked,
}

/// Fields left editable by a masking rule
///
/// Conduct exceptions name a field of every section rather than a single
/// section, so sections added later are covered without recomputing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    visit: BTreeSet<VisitField>,
    conduct: BTreeSet<ConductField>,
}

impl ExceptionSet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_visit(mut self, field: VisitField) -> Self {
        self.visit.insert(field);
        self
    }

    pub fn with_conduct(mut self, field: ConductField) -> Self {
        self.conduct.insert(field);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.visit.is_empty() && self.conduct.is_empty()
    }

    pub fn exempts(&self, id: &FieldId) -> bool {
        match id {
            FieldId::Visit(f) => self.visit.contains(f),
            FieldId::Conduct(_, f) => self.conduct.contains(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskRule {
    pub trigger: Symptom,
    pub exceptions: ExceptionSet,
}

impl MaskRule {
    pub fn new(trigger: Symptom, exceptions: ExceptionSet) -> Self {
        Self {
            trigger,
            exceptions,
        }
    }

    pub fn mode(&self) -> FormMode {
        if self.exceptions.is_empty() {
            FormMode::FullyMasked
        } else {
            FormMode::PartiallyMasked
        }
    }
}

/// "Absorvente" masks everything; "Trabalho em altura" keeps blood pressure
/// and the summary of each conduct
pub fn default_rules() -> Vec<MaskRule> {
    vec![
        MaskRule::new(Symptom::SanitaryPad, ExceptionSet::none()),
        MaskRule::new(
            Symptom::WorkAtHeight,
            ExceptionSet::none()
                .with_visit(VisitField::SystolicPressure)
                .with_visit(VisitField::DiastolicPressure)
                .with_conduct(ConductField::Summary),
        ),
    ]
}

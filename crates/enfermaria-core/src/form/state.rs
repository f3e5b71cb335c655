use super::field::{ConductField, ConductKey, FieldId, FieldKind, FieldValue, FieldView, VisitField};
use super::rules::{default_rules, FormMode, MaskRule};
use crate::errors::{EnfermariaError, Result};
use crate::model::{
    AdministeredMedication, Conduct, ConductSummary, Region, Symptom, VisitDetails,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Slot {
    kind: FieldKind,
    enabled: bool,
    value: FieldValue,
    forced: bool,
}

impl Slot {
    fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            enabled: true,
            value: FieldValue::empty(kind),
            forced: false,
        }
    }

    fn mask(&mut self) {
        self.enabled = false;
        self.value = FieldValue::masked(self.kind);
        self.forced = true;
    }

    fn unmask(&mut self) {
        self.enabled = true;
        if self.forced {
            self.value = FieldValue::empty(self.kind);
            self.forced = false;
        }
    }

    fn view(&self) -> FieldView {
        FieldView {
            enabled: self.enabled,
            value: self.value.clone(),
            forced: self.forced,
        }
    }
}

/// Enabled/disabled state and value of every registered field
#[derive(Debug, Clone)]
pub struct FormState {
    rules: Vec<MaskRule>,
    principal: Option<Symptom>,
    active: Option<usize>,
    slots: BTreeMap<FieldId, Slot>,
    conduct_keys: Vec<ConductKey>,
    next_key: u64,
}

impl FormState {
    /// Empty form with no registered fields
    pub fn new(rules: Vec<MaskRule>) -> Self {
        Self {
            rules,
            principal: None,
            active: None,
            slots: BTreeMap::new(),
            conduct_keys: Vec::new(),
            next_key: 0,
        }
    }

    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    /// The visit form as laid out on screen: every clinical field plus one
    /// conduct section
    ///
    /// Identification fields stay outside the form so a returning patient's
    /// prefill is never masked.
    pub fn standard() -> Self {
        let mut form = Self::with_default_rules();
        for field in VisitField::CLINICAL {
            form.register(FieldId::Visit(*field));
        }
        form.add_conduct_section();
        form
    }

    // ===== Registration =====

    /// Register a field; the active rule applies to it immediately
    ///
    /// Returns false if the field was already registered, or if it is a
    /// conduct field whose section was not opened by
    /// [`FormState::add_conduct_section`].
    pub fn register(&mut self, id: FieldId) -> bool {
        if self.slots.contains_key(&id) {
            return false;
        }
        if let FieldId::Conduct(key, _) = id {
            if !self.conduct_keys.contains(&key) {
                return false;
            }
        }
        let mut slot = Slot::new(id.kind());
        if self.masks(&id) {
            slot.mask();
        }
        self.slots.insert(id, slot);
        true
    }

    /// Returns false if the field was not registered.
    pub fn deregister(&mut self, id: &FieldId) -> bool {
        self.slots.remove(id).is_some()
    }

    /// Register a new conduct section and return its key
    pub fn add_conduct_section(&mut self) -> ConductKey {
        let key = ConductKey(self.next_key);
        self.next_key += 1;
        self.conduct_keys.push(key);
        for field in ConductField::ALL {
            self.register(FieldId::Conduct(key, *field));
        }
        key
    }

    /// Returns false for an unknown key.
    pub fn remove_conduct_section(&mut self, key: ConductKey) -> bool {
        let before = self.conduct_keys.len();
        self.conduct_keys.retain(|k| *k != key);
        if self.conduct_keys.len() == before {
            return false;
        }
        self.slots
            .retain(|id, _| !matches!(id, FieldId::Conduct(k, _) if *k == key));
        true
    }

    /// Conduct sections in display order
    pub fn conduct_sections(&self) -> &[ConductKey] {
        &self.conduct_keys
    }

    // ===== Principal complaint =====

    /// Apply the rule selected by a new principal-complaint symptom label
    ///
    /// A blank label clears the selection and leaves the form unrestricted.
    ///
    /// # Errors
    ///
    /// `UnknownLabel` for text outside the symptom enumeration; the form is
    /// left as it was.
    pub fn on_principal_complaint_changed(&mut self, label: &str) -> Result<FormMode> {
        let principal = if label.trim().is_empty() {
            None
        } else {
            Some(Symptom::from_label(label)?)
        };
        Ok(self.apply_principal(principal))
    }

    fn apply_principal(&mut self, principal: Option<Symptom>) -> FormMode {
        self.principal = principal;
        self.active = self
            .principal
            .and_then(|symptom| self.rules.iter().position(|r| r.trigger == symptom));

        let rule = self.active.and_then(|i| self.rules.get(i));
        for (id, slot) in self.slots.iter_mut() {
            match rule {
                Some(rule) if !rule.exceptions.exempts(id) => slot.mask(),
                _ => slot.unmask(),
            }
        }
        self.mode()
    }

    pub fn principal_symptom(&self) -> Option<Symptom> {
        self.principal
    }

    pub fn mode(&self) -> FormMode {
        self.active_rule()
            .map_or(FormMode::Unrestricted, MaskRule::mode)
    }

    fn active_rule(&self) -> Option<&MaskRule> {
        self.active.and_then(|i| self.rules.get(i))
    }

    fn masks(&self, id: &FieldId) -> bool {
        self.active_rule()
            .is_some_and(|rule| !rule.exceptions.exempts(id))
    }

    // ===== Field access =====

    pub fn field(&self, id: &FieldId) -> Option<FieldView> {
        self.slots.get(id).map(Slot::view)
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldId, FieldView)> + '_ {
        self.slots.iter().map(|(id, slot)| (*id, slot.view()))
    }

    /// Store a user-entered value
    ///
    /// # Errors
    ///
    /// `FieldNotRegistered`, `FieldDisabled` while masked, or
    /// `InvalidFieldValue` when the value does not fit the field.
    pub fn set_value(&mut self, id: FieldId, value: FieldValue) -> Result<()> {
        let slot = self
            .slots
            .get_mut(&id)
            .ok_or_else(|| EnfermariaError::FieldNotRegistered {
                field: id.to_string(),
            })?;
        if !slot.enabled {
            return Err(EnfermariaError::FieldDisabled {
                field: id.to_string(),
            });
        }
        check_value(&id, &value)?;
        slot.value = value;
        slot.forced = false;
        Ok(())
    }

    // ===== Visit binding =====

    /// Fill the form from a stored visit, then apply its principal complaint
    ///
    /// Conduct sections are rebuilt to match the visit's conducts.
    pub fn load_visit(&mut self, details: &VisitDetails) {
        for key in self.conduct_keys.clone() {
            self.remove_conduct_section(key);
        }
        self.apply_principal(None);

        let visit_ids: Vec<FieldId> = self
            .slots
            .keys()
            .filter(|id| matches!(id, FieldId::Visit(_)))
            .copied()
            .collect();
        for id in visit_ids {
            if let (FieldId::Visit(field), Some(slot)) = (id, self.slots.get_mut(&id)) {
                slot.value = read_visit_field(details, field);
            }
        }

        for conduct in &details.conducts {
            let key = self.add_conduct_section();
            for field in ConductField::ALL {
                if let Some(slot) = self.slots.get_mut(&FieldId::Conduct(key, *field)) {
                    slot.value = read_conduct_field(conduct, *field);
                }
            }
        }

        self.apply_principal(details.principal.symptom);
    }

    /// Copy the form back into `details`
    ///
    /// Only registered visit fields are written. The conduct list is
    /// replaced by one conduct per section, in section order.
    ///
    /// # Errors
    ///
    /// `UnknownLabel` if a choice field holds text outside its enumeration.
    pub fn write_into(&self, details: &mut VisitDetails) -> Result<()> {
        details.principal.symptom = self.principal;
        for (id, slot) in &self.slots {
            if let FieldId::Visit(field) = id {
                write_visit_field(details, *field, &slot.value)?;
            }
        }

        let mut conducts = Vec::with_capacity(self.conduct_keys.len());
        for key in &self.conduct_keys {
            let mut conduct = Conduct::default();
            for field in ConductField::ALL {
                if let Some(slot) = self.slots.get(&FieldId::Conduct(*key, *field)) {
                    write_conduct_field(&mut conduct, *field, &slot.value)?;
                }
            }
            conducts.push(conduct);
        }
        details.conducts = conducts;
        Ok(())
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_value(id: &FieldId, value: &FieldValue) -> Result<()> {
    let invalid = |reason: String| EnfermariaError::InvalidFieldValue {
        field: id.to_string(),
        reason,
    };
    if !value.fits(id.kind()) {
        return Err(invalid(format!("expected a {:?} value", id.kind())));
    }
    let checked = match (id, value) {
        (FieldId::Visit(VisitField::PrincipalRegion), FieldValue::Text(t)) => {
            optional_label(t, Region::from_label).map(|_| ())
        }
        (FieldId::Visit(VisitField::SecondarySymptoms), FieldValue::Selection(items)) => {
            labels(items, Symptom::from_label).map(|_| ())
        }
        (FieldId::Visit(VisitField::SecondaryRegions), FieldValue::Selection(items)) => {
            labels(items, Region::from_label).map(|_| ())
        }
        (FieldId::Conduct(_, ConductField::Summary), FieldValue::Text(t)) => {
            optional_label(t, ConductSummary::from_label).map(|_| ())
        }
        (FieldId::Conduct(_, ConductField::AdministeredMedication), FieldValue::Text(t)) => {
            optional_label(t, AdministeredMedication::from_label).map(|_| ())
        }
        _ => Ok(()),
    };
    checked.map_err(|e| invalid(e.to_string()))
}

fn optional_label<T>(text: &str, parse: fn(&str) -> Result<T>) -> Result<Option<T>> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse(text).map(Some)
    }
}

fn labels<T>(items: &[String], parse: fn(&str) -> Result<T>) -> Result<Vec<T>> {
    items.iter().map(|s| parse(s)).collect()
}

fn label_of<T: std::fmt::Display>(value: &Option<T>) -> FieldValue {
    FieldValue::Text(value.as_ref().map(|v| v.to_string()).unwrap_or_default())
}

fn labels_of<T: std::fmt::Display>(values: &[T]) -> FieldValue {
    FieldValue::Selection(values.iter().map(|v| v.to_string()).collect())
}

fn text_of(value: &FieldValue) -> String {
    value.as_text().unwrap_or_default().to_string()
}

fn selection_of(value: &FieldValue) -> &[String] {
    value.as_selection().unwrap_or_default()
}

fn read_visit_field(details: &VisitDetails, field: VisitField) -> FieldValue {
    let identity = &details.identity;
    let vitals = &details.vitals;
    let history = &details.history;
    let text = |s: &String| FieldValue::Text(s.clone());
    match field {
        VisitField::Name => text(&identity.name),
        VisitField::Login => text(&identity.login),
        VisitField::Manager => text(&identity.manager),
        VisitField::Shift => text(&identity.shift),
        VisitField::Department => text(&identity.department),
        VisitField::Process => text(&identity.process),
        VisitField::Tenure => text(&identity.tenure),
        VisitField::PrincipalRegion => label_of(&details.principal.region),
        VisitField::SecondarySymptoms => labels_of(&details.secondary.symptoms),
        VisitField::SecondaryRegions => labels_of(&details.secondary.regions),
        VisitField::ComplaintHistory => text(&history.current_complaint_history),
        VisitField::Temperature => text(&vitals.temperature),
        VisitField::SystolicPressure => text(&vitals.systolic_pressure),
        VisitField::DiastolicPressure => text(&vitals.diastolic_pressure),
        VisitField::HeartRate => text(&vitals.heart_rate),
        VisitField::Saturation => text(&vitals.saturation),
        VisitField::PreexistingConditions => text(&history.preexisting_conditions),
        VisitField::Allergies => text(&history.allergies),
        VisitField::MedicationsInUse => text(&history.medications_in_use),
        VisitField::Notes => text(&history.notes),
    }
}

fn write_visit_field(details: &mut VisitDetails, field: VisitField, value: &FieldValue) -> Result<()> {
    let identity = &mut details.identity;
    let vitals = &mut details.vitals;
    let history = &mut details.history;
    match field {
        VisitField::Name => identity.name = text_of(value),
        VisitField::Login => identity.login = text_of(value),
        VisitField::Manager => identity.manager = text_of(value),
        VisitField::Shift => identity.shift = text_of(value),
        VisitField::Department => identity.department = text_of(value),
        VisitField::Process => identity.process = text_of(value),
        VisitField::Tenure => identity.tenure = text_of(value),
        VisitField::PrincipalRegion => {
            details.principal.region = optional_label(&text_of(value), Region::from_label)?
        }
        VisitField::SecondarySymptoms => {
            details.secondary.symptoms = labels(selection_of(value), Symptom::from_label)?
        }
        VisitField::SecondaryRegions => {
            details.secondary.regions = labels(selection_of(value), Region::from_label)?
        }
        VisitField::ComplaintHistory => history.current_complaint_history = text_of(value),
        VisitField::Temperature => vitals.temperature = text_of(value),
        VisitField::SystolicPressure => vitals.systolic_pressure = text_of(value),
        VisitField::DiastolicPressure => vitals.diastolic_pressure = text_of(value),
        VisitField::HeartRate => vitals.heart_rate = text_of(value),
        VisitField::Saturation => vitals.saturation = text_of(value),
        VisitField::PreexistingConditions => history.preexisting_conditions = text_of(value),
        VisitField::Allergies => history.allergies = text_of(value),
        VisitField::MedicationsInUse => history.medications_in_use = text_of(value),
        VisitField::Notes => history.notes = text_of(value),
    }
    Ok(())
}

fn read_conduct_field(conduct: &Conduct, field: ConductField) -> FieldValue {
    let text = |s: &String| FieldValue::Text(s.clone());
    match field {
        ConductField::Hypothesis => text(&conduct.hypothesis),
        ConductField::ConductTaken => text(&conduct.conduct_taken),
        ConductField::Summary => label_of(&conduct.summary),
        ConductField::AdministeredMedication => label_of(&conduct.administered_medication),
        ConductField::Medication => text(&conduct.medication),
        ConductField::Dosage => text(&conduct.dosage),
        ConductField::MedicationTime => text(&conduct.medication_time),
        ConductField::Notes => text(&conduct.notes),
    }
}

fn write_conduct_field(conduct: &mut Conduct, field: ConductField, value: &FieldValue) -> Result<()> {
    match field {
        ConductField::Hypothesis => conduct.hypothesis = text_of(value),
        ConductField::ConductTaken => conduct.conduct_taken = text_of(value),
        ConductField::Summary => {
            conduct.summary = optional_label(&text_of(value), ConductSummary::from_label)?
        }
        ConductField::AdministeredMedication => {
            conduct.administered_medication =
                optional_label(&text_of(value), AdministeredMedication::from_label)?
        }
        ConductField::Medication => conduct.medication = text_of(value),
        ConductField::Dosage => conduct.dosage = text_of(value),
        ConductField::MedicationTime => conduct.medication_time = text_of(value),
        ConductField::Notes => conduct.notes = text_of(value),
    }
    Ok(())
}

//! Visit commands
//!
//! `add` and `update` go through the session's form, so the masking rules
//! of the principal complaint apply exactly as they would on screen.

use super::open_session;
use chrono::{Local, NaiveDateTime};
use clap::{Args, Subcommand};
use enfermaria_config::AppConfig;
use enfermaria_core::form::{ConductField, FieldId, FieldValue, VisitField};
use enfermaria_core::model::{tenure_days, Conduct, HistoryPeriod, PatientIdentity, VisitSummary};
use enfermaria_engine::{EngineCommand, EngineQuery, EngineQueryResult, Session};

#[derive(Debug, Args)]
pub struct VisitArgs {
    #[command(subcommand)]
    pub command: VisitCommand,
}

#[derive(Debug, Subcommand)]
pub enum VisitCommand {
    /// Record a new visit stamped with the current time
    Add(VisitFields),
    /// Print a visit as JSON
    Show { id: i64 },
    /// Edit a visit; date and time are kept
    Update {
        id: i64,
        #[command(flatten)]
        fields: VisitFields,
    },
    Delete { id: i64 },
    /// Identification from the badge's latest visit
    Last { badge: String },
    /// Visits of the last 15, 30 or 60 days, or year to date
    List {
        #[arg(long)]
        badge: Option<String>,
        #[arg(long, default_value = "15")]
        period: HistoryPeriod,
    },
    /// Visits between two instants (YYYY-MM-DDTHH:MM:SS)
    Range {
        #[arg(long)]
        from: NaiveDateTime,
        #[arg(long)]
        to: NaiveDateTime,
        #[arg(long)]
        badge: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct VisitFields {
    #[arg(long)]
    pub badge: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub login: Option<String>,
    #[arg(long)]
    pub manager: Option<String>,
    #[arg(long)]
    pub shift: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub process: Option<String>,
    /// Admission date, dd/mm/YYYY
    #[arg(long)]
    pub tenure: Option<String>,

    /// Principal-complaint symptom label
    #[arg(long)]
    pub symptom: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    /// Secondary symptom label (repeatable)
    #[arg(long = "secondary-symptom")]
    pub secondary_symptoms: Vec<String>,
    /// Secondary region label (repeatable)
    #[arg(long = "secondary-region")]
    pub secondary_regions: Vec<String>,

    #[arg(long)]
    pub history: Option<String>,
    #[arg(long)]
    pub temperature: Option<String>,
    #[arg(long)]
    pub systolic: Option<String>,
    #[arg(long)]
    pub diastolic: Option<String>,
    #[arg(long)]
    pub heart_rate: Option<String>,
    #[arg(long)]
    pub saturation: Option<String>,
    #[arg(long)]
    pub preexisting: Option<String>,
    #[arg(long)]
    pub allergies: Option<String>,
    #[arg(long)]
    pub medications: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,

    /// Conduct as JSON, e.g. '{"hypothesis":"Cefaleia","summary":"Em observação"}'
    /// (repeatable; replaces every conduct on update)
    #[arg(long = "conduct", value_parser = parse_conduct)]
    pub conducts: Vec<Conduct>,
}

fn parse_conduct(raw: &str) -> Result<Conduct, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid conduct: {}", e))
}

impl VisitFields {
    /// Provided values override `base`
    fn identity(&self, mut base: PatientIdentity) -> PatientIdentity {
        let pairs = [
            (&self.badge, &mut base.badge_number),
            (&self.name, &mut base.name),
            (&self.login, &mut base.login),
            (&self.manager, &mut base.manager),
            (&self.shift, &mut base.shift),
            (&self.department, &mut base.department),
            (&self.process, &mut base.process),
            (&self.tenure, &mut base.tenure),
        ];
        for (given, slot) in pairs {
            if let Some(value) = given {
                *slot = value.clone();
            }
        }
        base
    }

    /// Push the clinical values into the session's form
    fn fill_form(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(symptom) = &self.symptom {
            session.on_principal_complaint_changed(symptom)?;
        }

        let texts = [
            (VisitField::PrincipalRegion, &self.region),
            (VisitField::ComplaintHistory, &self.history),
            (VisitField::Temperature, &self.temperature),
            (VisitField::SystolicPressure, &self.systolic),
            (VisitField::DiastolicPressure, &self.diastolic),
            (VisitField::HeartRate, &self.heart_rate),
            (VisitField::Saturation, &self.saturation),
            (VisitField::PreexistingConditions, &self.preexisting),
            (VisitField::Allergies, &self.allergies),
            (VisitField::MedicationsInUse, &self.medications),
            (VisitField::Notes, &self.notes),
        ];
        for (field, value) in texts {
            if let Some(value) = value {
                session.set_field(FieldId::Visit(field), FieldValue::Text(value.clone()))?;
            }
        }

        let selections = [
            (VisitField::SecondarySymptoms, &self.secondary_symptoms),
            (VisitField::SecondaryRegions, &self.secondary_regions),
        ];
        for (field, items) in selections {
            if !items.is_empty() {
                session.set_field(FieldId::Visit(field), FieldValue::Selection(items.clone()))?;
            }
        }

        if !self.conducts.is_empty() {
            self.fill_conducts(session)?;
        }
        Ok(())
    }

    /// One section per conduct; masked fields keep their forced value
    fn fill_conducts(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        for key in session.form().conduct_sections().to_vec() {
            session.form_mut().remove_conduct_section(key);
        }
        for conduct in &self.conducts {
            let key = session.form_mut().add_conduct_section();
            let label = |value: Option<String>| value.unwrap_or_default();
            let values = [
                (ConductField::Hypothesis, conduct.hypothesis.clone()),
                (ConductField::ConductTaken, conduct.conduct_taken.clone()),
                (
                    ConductField::Summary,
                    label(conduct.summary.map(|s| s.label().to_string())),
                ),
                (
                    ConductField::AdministeredMedication,
                    label(conduct.administered_medication.map(|m| m.label().to_string())),
                ),
                (ConductField::Medication, conduct.medication.clone()),
                (ConductField::Dosage, conduct.dosage.clone()),
                (ConductField::MedicationTime, conduct.medication_time.clone()),
                (ConductField::Notes, conduct.notes.clone()),
            ];
            for (field, value) in values {
                let id = FieldId::Conduct(key, field);
                let enabled = session.form().field(&id).is_some_and(|v| v.enabled);
                if enabled && !value.is_empty() {
                    session.set_field(id, FieldValue::Text(value))?;
                }
            }
        }
        Ok(())
    }
}

pub fn execute(args: VisitArgs, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(config)?;
    match args.command {
        VisitCommand::Add(fields) => add(&mut session, fields),
        VisitCommand::Show { id } => show(&session, id),
        VisitCommand::Update { id, fields } => update(&mut session, id, fields),
        VisitCommand::Delete { id } => {
            session.execute(EngineCommand::VisitDelete { id })?;
            println!("Visit deleted: {}", id);
            Ok(())
        }
        VisitCommand::Last { badge } => last(&session, badge),
        VisitCommand::List { badge, period } => {
            let visits = session.query(EngineQuery::VisitHistory {
                badge,
                period,
                today: Local::now().date_naive(),
            })?;
            print_list(visits)
        }
        VisitCommand::Range { from, to, badge } => {
            let visits = session.query(EngineQuery::VisitRange {
                start: from,
                end: to,
                badge,
            })?;
            print_list(visits)
        }
    }
}

fn last_identity(session: &Session, badge: &str) -> Result<Option<PatientIdentity>, Box<dyn std::error::Error>> {
    match session.query(EngineQuery::LastIdentity {
        badge: badge.to_string(),
    })? {
        EngineQueryResult::LastIdentity(identity) => Ok(identity),
        other => Err(format!("Unexpected engine result: {:?}", other).into()),
    }
}

fn add(session: &mut Session, fields: VisitFields) -> Result<(), Box<dyn std::error::Error>> {
    let badge = fields.badge.clone().unwrap_or_default();
    // A returning patient keeps the identification of their last visit
    let base = last_identity(session, &badge)?.unwrap_or_default();
    let identity = fields.identity(base);

    fields.fill_form(session)?;
    let id = session.save_form(identity, Local::now().naive_local())?;
    println!("Visit saved: {}", id);
    Ok(())
}

fn update(session: &mut Session, id: i64, fields: VisitFields) -> Result<(), Box<dyn std::error::Error>> {
    let stored = session.edit_visit(id)?;
    let identity = fields.identity(stored.details.identity);

    fields.fill_form(session)?;
    session.update_form(id, identity)?;
    println!("Visit updated: {}", id);
    Ok(())
}

fn show(session: &Session, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    match session.query(EngineQuery::VisitGet { id })? {
        EngineQueryResult::Visit(visit) => {
            println!("{}", serde_json::to_string_pretty(&visit)?);
            Ok(())
        }
        other => Err(format!("Unexpected engine result: {:?}", other).into()),
    }
}

fn last(session: &Session, badge: String) -> Result<(), Box<dyn std::error::Error>> {
    let Some(identity) = last_identity(session, &badge)? else {
        println!("No visits for badge {}", badge);
        return Ok(());
    };
    println!("badge: {}", identity.badge_number);
    println!("name: {}", identity.name);
    println!("login: {}", identity.login);
    println!("manager: {}", identity.manager);
    println!("shift: {}", identity.shift);
    println!("department: {}", identity.department);
    println!("process: {}", identity.process);
    match tenure_days(&identity.tenure, Local::now().date_naive()) {
        Some(days) => println!("tenure: {} ({} days)", identity.tenure, days),
        None => println!("tenure: {}", identity.tenure),
    }
    Ok(())
}

fn print_list(result: EngineQueryResult) -> Result<(), Box<dyn std::error::Error>> {
    let EngineQueryResult::VisitList(visits) = result else {
        return Err(format!("Unexpected engine result: {:?}", result).into());
    };
    if visits.is_empty() {
        println!("No visits found");
    }
    for VisitSummary {
        id,
        badge_number,
        name,
        date,
        time,
        principal_symptom,
        first_conduct_summary,
        ..
    } in visits
    {
        println!(
            "{}\t{} {}\t{}\t{}\t{}\t{}",
            id,
            date,
            time,
            badge_number,
            name,
            principal_symptom.map(|s| s.label()).unwrap_or("-"),
            first_conduct_summary.map(|s| s.label()).unwrap_or("-"),
        );
    }
    Ok(())
}

//! Embedded migrations
//!
//! SQL files are embedded at compile time with include_str!. Later schema
//! versions only add columns; nothing is dropped or renamed, and superseded
//! columns such as `queixas_principais` stay in place unused.

/// A column added by a later version
pub struct ColumnSpec {
    pub table: &'static str,
    pub name: &'static str,
    pub definition: &'static str,
}

impl ColumnSpec {
    pub fn alter_sql(&self) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.table, self.name, self.definition
        )
    }
}

pub enum MigrationStep {
    /// Must succeed; the store is unusable otherwise
    Sql(&'static str),
    /// Best effort; failures are logged and retried on the next start
    AddColumns(&'static [ColumnSpec]),
}

pub struct Migration {
    pub id: &'static str,
    pub step: MigrationStep,
}

impl Migration {
    /// Text hashed into `schema_version.checksum`
    pub fn checksum_source(&self) -> String {
        match &self.step {
            MigrationStep::Sql(sql) => sql.to_string(),
            MigrationStep::AddColumns(columns) => columns
                .iter()
                .map(ColumnSpec::alter_sql)
                .collect::<Vec<_>>()
                .join(";\n"),
        }
    }
}

const PRINCIPAL_COMPLAINT: &[ColumnSpec] = &[
    ColumnSpec {
        table: "atendimentos",
        name: "queixa_principal_sintoma",
        definition: "TEXT DEFAULT ''",
    },
    ColumnSpec {
        table: "atendimentos",
        name: "queixa_principal_regiao",
        definition: "TEXT DEFAULT ''",
    },
];

const SECONDARY_COMPLAINT: &[ColumnSpec] = &[
    ColumnSpec {
        table: "atendimentos",
        name: "queixa_secundaria_sintomas",
        definition: "TEXT DEFAULT '[]'",
    },
    ColumnSpec {
        table: "atendimentos",
        name: "queixa_secundaria_regioes",
        definition: "TEXT DEFAULT '[]'",
    },
];

const CONDUCT_MEDICATION: &[ColumnSpec] = &[ColumnSpec {
    table: "condutas",
    name: "medicamento",
    definition: "TEXT DEFAULT ''",
}];

/// Get all migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_initial_schema",
            step: MigrationStep::Sql(include_str!("../../migrations/001_initial_schema.sql")),
        },
        Migration {
            id: "002_principal_complaint",
            step: MigrationStep::AddColumns(PRINCIPAL_COMPLAINT),
        },
        Migration {
            id: "003_secondary_complaint",
            step: MigrationStep::AddColumns(SECONDARY_COMPLAINT),
        },
        Migration {
            id: "004_conduct_medication",
            step: MigrationStep::AddColumns(CONDUCT_MEDICATION),
        },
    ]
}

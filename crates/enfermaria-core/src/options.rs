//! Option sets feeding the identification comboboxes
//!
//! Loaded once at startup, edited through [`OptionSets::add`] /
//! [`OptionSets::remove`] and rewritten wholesale by [`OptionSets::save`].

use crate::errors::{EnfermariaError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionCategory {
    Managers,
    Shifts,
    Departments,
    Processes,
}

impl OptionCategory {
    pub const ALL: [OptionCategory; 4] = [
        OptionCategory::Managers,
        OptionCategory::Shifts,
        OptionCategory::Departments,
        OptionCategory::Processes,
    ];

    /// Key in the JSON document
    pub fn key(&self) -> &'static str {
        match self {
            OptionCategory::Managers => "gestores",
            OptionCategory::Shifts => "turnos",
            OptionCategory::Departments => "setores",
            OptionCategory::Processes => "processos",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

const DEFAULT_SHIFTS: &[&str] = &[
    "Blue Day",
    "Blue Night",
    "Red Day",
    "Red Night",
    "MID",
    "ADM",
    "12X36 - Ímpar",
    "12X36 - Par",
];

const DEFAULT_DEPARTMENTS: &[&str] = &[
    "C-RET",
    "Enviroment",
    "IB",
    "ICQA",
    "Insumos",
    "Learning",
    "LP",
    "Melhoria Contínua (ICQA)",
    "N/A",
    "OB",
    "PXT",
    "RME - Sodexo",
    "RME - Terceiros",
    "RME - Toledo",
    "Sodexo - Cozinha",
    "Sodexo - Limpeza",
    "TI",
    "TOM",
    "Transfer-in",
    "Transfer-out",
    "WHS",
];

const DEFAULT_PROCESSES: &[&str] = &[
    "Administrativo",
    "Contagem",
    "Cozinha",
    "Damaged",
    "Decante",
    "Doca",
    "Drop test",
    "Geral",
    "Inbound",
    "ISS",
    "Líder TDR",
    "Manutenção",
    "Melhora Continua",
    "NED",
    "Observador",
    "Pack",
    "Pick",
    "Pick - PIT",
    "PIT",
    "PREP",
    "Problem Solve",
    "Rebin",
    "Recebimento",
    "Slam",
    "Spider",
    "Stow",
    "Stow - PIT",
    "Stow Pallet",
    "Suporte",
    "Transfer In",
    "Transfer Out",
    "Yard Marshal",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_shifts() -> Vec<String> {
    owned(DEFAULT_SHIFTS)
}

fn default_departments() -> Vec<String> {
    owned(DEFAULT_DEPARTMENTS)
}

fn default_processes() -> Vec<String> {
    owned(DEFAULT_PROCESSES)
}

/// The four editable lists
///
/// A document missing a key keeps the built-in list for that key. Managers
/// ship empty: the roster is site data and is always provided by the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSets {
    #[serde(rename = "gestores", default)]
    pub managers: Vec<String>,
    #[serde(rename = "turnos", default = "default_shifts")]
    pub shifts: Vec<String>,
    #[serde(rename = "setores", default = "default_departments")]
    pub departments: Vec<String>,
    #[serde(rename = "processos", default = "default_processes")]
    pub processes: Vec<String>,
}

impl Default for OptionSets {
    fn default() -> Self {
        Self {
            managers: Vec::new(),
            shifts: default_shifts(),
            departments: default_departments(),
            processes: default_processes(),
        }
    }
}

impl OptionSets {
    /// Read the document at `path`
    ///
    /// # Errors
    ///
    /// `OptionSetsIo` if the file cannot be read, `Serialization` if it is
    /// not a valid document.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| EnfermariaError::OptionSetsIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Read the document, falling back to the built-in lists
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(sets) => sets,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Option sets unavailable, using built-in defaults"
                );
                Self::default()
            }
        }
    }

    /// Rewrite the whole document
    ///
    /// # Errors
    ///
    /// `OptionSetsIo` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| EnfermariaError::OptionSetsIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn values(&self, category: OptionCategory) -> &[String] {
        match category {
            OptionCategory::Managers => &self.managers,
            OptionCategory::Shifts => &self.shifts,
            OptionCategory::Departments => &self.departments,
            OptionCategory::Processes => &self.processes,
        }
    }

    fn values_mut(&mut self, category: OptionCategory) -> &mut Vec<String> {
        match category {
            OptionCategory::Managers => &mut self.managers,
            OptionCategory::Shifts => &mut self.shifts,
            OptionCategory::Departments => &mut self.departments,
            OptionCategory::Processes => &mut self.processes,
        }
    }

    /// Display order: alphabetical, except shifts which keep their order
    pub fn sorted(&self, category: OptionCategory) -> Vec<String> {
        let mut items = self.values(category).to_vec();
        if category != OptionCategory::Shifts {
            items.sort_by_key(|s| s.to_lowercase());
        }
        items
    }

    pub fn contains(&self, category: OptionCategory, value: &str) -> bool {
        self.values(category).iter().any(|v| v == value)
    }

    /// Append a trimmed item
    ///
    /// # Errors
    ///
    /// `BlankOption` for blank input, `DuplicateOption` if the item is
    /// already present ignoring case.
    pub fn add(&mut self, category: OptionCategory, item: &str) -> Result<()> {
        let item = item.trim();
        if item.is_empty() {
            return Err(EnfermariaError::BlankOption {
                category: category.to_string(),
            });
        }
        let wanted = item.to_lowercase();
        if self
            .values(category)
            .iter()
            .any(|v| v.to_lowercase() == wanted)
        {
            return Err(EnfermariaError::DuplicateOption {
                category: category.to_string(),
                item: item.to_string(),
            });
        }
        self.values_mut(category).push(item.to_string());
        Ok(())
    }

    /// Remove an item by exact match
    ///
    /// # Errors
    ///
    /// `OptionNotFound` if no item matches.
    pub fn remove(&mut self, category: OptionCategory, item: &str) -> Result<()> {
        let values = self.values_mut(category);
        let before = values.len();
        values.retain(|v| v != item);
        if values.len() == before {
            return Err(EnfermariaError::OptionNotFound {
                category: category.to_string(),
                item: item.to_string(),
            });
        }
        Ok(())
    }
}

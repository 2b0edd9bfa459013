// 📋 Registry Reports
// Plain-text and JSON views over a ClinicRegistry, built from one consistent copy

use crate::entities::{Clinic, ClinicRegistry, RegistryContents};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Point-in-time view of a registry, sorted for stable output
#[derive(Debug, Serialize)]
pub struct RegistrySnapshot {
    pub generated_at: DateTime<Utc>,
    pub total_clinics: usize,
    pub clinics: Vec<Clinic>,
    pub specialties: Vec<SpecialtyStat>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SpecialtyStat {
    pub specialty: String,
    pub count: usize,
}

impl RegistrySnapshot {
    pub fn capture(registry: &ClinicRegistry) -> Self {
        Self::from_contents(registry.contents())
    }

    fn from_contents(contents: RegistryContents) -> Self {
        let specialties = contents
            .by_specialty
            .iter()
            .map(|(specialty, members)| SpecialtyStat {
                specialty: specialty.clone(),
                count: members.len(),
            })
            .collect();

        RegistrySnapshot {
            generated_at: Utc::now(),
            total_clinics: contents.clinics.len(),
            clinics: contents.clinics,
            specialties,
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// Every clinic, then clinics grouped by specialty
pub struct TextReport(pub RegistryContents);

impl fmt::Display for TextReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let contents = &self.0;

        writeln!(f, "=== All clinics ({}) ===", contents.clinics.len())?;
        for clinic in &contents.clinics {
            writeln!(f, "{}", clinic)?;
        }

        writeln!(f, "\n=== Clinics by specialty ===")?;
        for (specialty, members) in &contents.by_specialty {
            writeln!(f, "{} ({}):", specialty, members.len())?;
            for clinic in members {
                writeln!(f, "  - {} [{}]", clinic.name(), clinic.city())?;
            }
        }

        Ok(())
    }
}

/// Human-readable report built from one consistent copy of the registry
pub fn render_text(registry: &ClinicRegistry) -> String {
    TextReport(registry.contents()).to_string()
}

/// Pretty JSON of a fresh snapshot
pub fn render_json(registry: &ClinicRegistry) -> Result<String> {
    serde_json::to_string_pretty(&RegistrySnapshot::capture(registry))
        .context("Failed to serialize registry snapshot")
}

// 📄 CSV Import / Export
// Header: id,name,city,specialty

use crate::entities::{Clinic, ClinicRegistry};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Outcome of feeding parsed rows into a registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub duplicates: usize,
}

/// Export row: free-text fields have commas flattened to spaces
#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    name: String,
    city: String,
    specialty: String,
}

impl<'a> From<&'a Clinic> for CsvRow<'a> {
    fn from(clinic: &'a Clinic) -> Self {
        CsvRow {
            id: clinic.id(),
            name: clinic.name().replace(',', " "),
            city: clinic.city().replace(',', " "),
            specialty: clinic.specialty().replace(',', " "),
        }
    }
}

/// Write every clinic (sorted by id) as CSV. Returns the number of rows written.
pub fn write_csv<W: Write>(registry: &ClinicRegistry, writer: W) -> Result<usize> {
    let clinics = registry.contents().clinics;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // Header is written by hand so it appears even when there are no rows
    wtr.write_record(["id", "name", "city", "specialty"])
        .context("Failed to write CSV header")?;
    for clinic in &clinics {
        wtr.serialize(CsvRow::from(clinic))
            .with_context(|| format!("Failed to write clinic {}", clinic.id()))?;
    }
    wtr.flush().context("Failed to flush CSV output")?;

    Ok(clinics.len())
}

/// Export to an in-memory string
pub fn to_csv_string(registry: &ClinicRegistry) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(registry, &mut buf)?;
    String::from_utf8(buf).context("CSV output was not valid UTF-8")
}

/// Parse clinics from CSV with an `id,name,city,specialty` header
pub fn read_clinics<R: Read>(reader: R) -> Result<Vec<Clinic>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut clinics = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        // Line numbers count the header as line 1
        let clinic: Clinic =
            result.with_context(|| format!("Failed to deserialize clinic on line {}", line + 2))?;
        clinics.push(clinic);
    }

    Ok(clinics)
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<Clinic>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;
    read_clinics(file)
}

/// Insert parsed clinics, counting rejected duplicate ids
pub fn import_into(registry: &ClinicRegistry, clinics: Vec<Clinic>) -> ImportSummary {
    let total = clinics.len();
    let inserted = registry.insert_all(clinics);
    let summary = ImportSummary {
        inserted,
        duplicates: total - inserted,
    };

    info!(inserted = summary.inserted, duplicates = summary.duplicates, "clinics imported");
    summary
}

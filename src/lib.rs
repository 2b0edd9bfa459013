// Clinic Registry - Core Library
// Exposes the registry plus report/CSV helpers for the CLI and tests

pub mod config;
pub mod csv_io;
pub mod entities;
pub mod logging;
pub mod report;

// Re-export commonly used types
pub use config::AppConfig;
pub use csv_io::{import_into, load_csv, read_clinics, to_csv_string, write_csv, ImportSummary};
pub use entities::{Clinic, ClinicRegistry, RegistryContents};
pub use report::{render_json, render_text, RegistrySnapshot, SpecialtyStat, TextReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use anyhow::{bail, Result};
use std::env;
use std::io;
use std::path::Path;

use clinic_registry::{
    import_into, load_csv, logging, render_json, render_text, write_csv, AppConfig, Clinic,
    ClinicRegistry,
};

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    logging::init(&config)?;

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("demo");

    match command {
        "demo" => run_demo(),
        "report" => {
            let registry = build_registry(&config)?;
            let json = args.iter().skip(2).any(|a| a == "--json");
            if json {
                println!("{}", render_json(&registry)?);
            } else {
                print!("{}", render_text(&registry));
            }
            Ok(())
        }
        "export" => {
            let registry = build_registry(&config)?;
            write_csv(&registry, io::stdout().lock())?;
            Ok(())
        }
        "import" => {
            let Some(path) = args.get(2) else {
                bail!("usage: clinic-registry import <path.csv>");
            };
            run_import(Path::new(path))
        }
        other => {
            eprintln!("❌ Unknown command: {}", other);
            eprintln!("   Commands: demo | report [--json] | export | import <path.csv>");
            std::process::exit(2);
        }
    }
}

/// Sample clinics, or the CSV named by CLINIC_CSV_PATH
fn build_registry(config: &AppConfig) -> Result<ClinicRegistry> {
    match &config.csv_path {
        Some(path) => {
            let registry = ClinicRegistry::new();
            import_into(&registry, load_csv(path)?);
            Ok(registry)
        }
        None => Ok(ClinicRegistry::with_sample_data()),
    }
}

fn run_import(path: &Path) -> Result<()> {
    println!("📂 Loading clinics from {}...", path.display());

    let clinics = load_csv(path)?;
    println!("✓ Parsed {} rows", clinics.len());

    let registry = ClinicRegistry::new();
    let summary = import_into(&registry, clinics);
    println!("✓ Inserted {} clinics", summary.inserted);
    if summary.duplicates > 0 {
        println!("✓ Duplicate ids skipped: {}", summary.duplicates);
    }

    println!();
    print!("{}", render_text(&registry));
    Ok(())
}

/// Walk through every registry operation on the sample clinics
fn run_demo() -> Result<()> {
    let registry = ClinicRegistry::with_sample_data();

    println!("Initial data:");
    print!("{}", render_text(&registry));

    println!("\nAdding a new clinic (unique id):");
    let added = registry.insert(Clinic::new("C006", "Zdrowie Plus", "Poznan", "Cardiology"));
    println!("Added: {}", added);
    print!("{}", render_text(&registry));

    println!("\nAdding a clinic with an existing id (C006), expecting false:");
    let duplicate = Clinic::new("C006", "Inna Nazwa", "Lodz", "Neurology");
    println!("Added duplicate: {}", registry.insert(duplicate));

    println!("\nAdding a clinic without a catalogue id (generated):");
    let walk_in = Clinic::with_generated_id("Punkt Medyczny", "Lodz", "Pediatrics");
    println!("{}", walk_in);
    println!("Added: {}", registry.insert(walk_in));

    println!("\nClinics in Warsaw:");
    for clinic in registry.search_by_city("Warsaw") {
        println!("{}", clinic);
    }

    println!("\nCardiology clinics:");
    for clinic in registry.get_by_specialty("Cardiology") {
        println!("{}", clinic);
    }

    println!("\nUpdating specialty of C002 -> 'Neurology':");
    registry.update_specialty("C002", "Neurology");
    print!("{}", render_text(&registry));

    println!("\nRemoving clinic C003:");
    registry.remove_by_id("C003");
    print!("{}", render_text(&registry));

    println!("\nCSV export:");
    write_csv(&registry, io::stdout().lock())?;

    Ok(())
}

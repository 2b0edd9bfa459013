//! Property-based tests for the clinic registry
//!
//! Random operation sequences are replayed against the registry and a plain
//! HashMap model; after every step the specialty index must agree with the
//! clinics it was derived from.

use clinic_registry::{Clinic, ClinicRegistry};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
enum Op {
    Insert { id: String, city: String, specialty: String },
    Remove { id: String },
    UpdateSpecialty { id: String, specialty: String },
    UpdateCity { id: String, city: String },
}

fn id_strategy() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|n| format!("C{:03}", n))
}

fn specialty_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Dermatology".to_string()),
        Just("Cardiology".to_string()),
        Just("Neurology".to_string()),
        Just("Pediatrics".to_string()),
    ]
}

fn city_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Warsaw".to_string()),
        Just("WARSAW".to_string()),
        Just("krakow".to_string()),
        Just("Gdańsk".to_string()),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (id_strategy(), city_strategy(), specialty_strategy())
            .prop_map(|(id, city, specialty)| Op::Insert { id, city, specialty }),
        1 => id_strategy().prop_map(|id| Op::Remove { id }),
        2 => (id_strategy(), specialty_strategy())
            .prop_map(|(id, specialty)| Op::UpdateSpecialty { id, specialty }),
        1 => (id_strategy(), city_strategy())
            .prop_map(|(id, city)| Op::UpdateCity { id, city }),
    ]
}

/// id -> (city, specialty)
type Model = HashMap<String, (String, String)>;

fn apply(registry: &ClinicRegistry, model: &mut Model, op: &Op) -> Result<(), TestCaseError> {
    match op {
        Op::Insert { id, city, specialty } => {
            let expected = !model.contains_key(id);
            let inserted = registry.insert(Clinic::new(id, "Clinic", city, specialty));
            prop_assert_eq!(inserted, expected);
            model
                .entry(id.clone())
                .or_insert_with(|| (city.clone(), specialty.clone()));
        }
        Op::Remove { id } => {
            let removed = registry.remove_by_id(id);
            prop_assert_eq!(removed, model.remove(id).is_some());
            // Removal completeness
            let fully_removed = registry.specialties().iter().all(|s| {
                registry.get_by_specialty(s).iter().all(|c| c.id() != id.as_str())
            });
            prop_assert!(fully_removed);
        }
        Op::UpdateSpecialty { id, specialty } => {
            let before = registry.specialty_counts();
            let same_value = model.get(id).map(|(_, s)| s == specialty);
            let updated = registry.update_specialty(id, specialty);
            prop_assert_eq!(updated, model.contains_key(id));
            if same_value == Some(true) {
                prop_assert_eq!(registry.specialty_counts(), before);
            }
            if let Some(entry) = model.get_mut(id) {
                entry.1 = specialty.clone();
            }
        }
        Op::UpdateCity { id, city } => {
            let updated = registry.update_city(id, city);
            prop_assert_eq!(updated, model.contains_key(id));
            if let Some(entry) = model.get_mut(id) {
                entry.0 = city.clone();
            }
        }
    }
    Ok(())
}

fn check_invariants(registry: &ClinicRegistry, model: &Model) -> Result<(), TestCaseError> {
    prop_assert_eq!(registry.len(), model.len());

    // Every present key maps to a non-empty bucket
    let counts = registry.specialty_counts();
    prop_assert!(counts.values().all(|&n| n > 0));

    // Each clinic is in its own bucket and in no other
    for clinic in registry.all_clinics() {
        let (city, specialty) = &model[clinic.id()];
        prop_assert_eq!(clinic.city(), city.as_str());
        prop_assert_eq!(clinic.specialty(), specialty.as_str());

        for key in registry.specialties() {
            let member = registry.get_by_specialty(&key).contains(&clinic);
            prop_assert_eq!(member, &key == specialty);
        }
    }

    let indexed: usize = counts.values().sum();
    prop_assert_eq!(indexed, model.len());
    Ok(())
}

proptest! {
    #[test]
    fn prop_index_stays_consistent(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let registry = ClinicRegistry::new();
        let mut model = Model::new();

        for op in &ops {
            apply(&registry, &mut model, op)?;
            check_invariants(&registry, &model)?;
        }
    }

    #[test]
    fn prop_first_insert_wins(
        id in id_strategy(),
        first in specialty_strategy(),
        second in specialty_strategy(),
    ) {
        let registry = ClinicRegistry::new();
        prop_assert!(registry.insert(Clinic::new(&id, "First", "Warsaw", &first)));
        prop_assert!(!registry.insert(Clinic::new(&id, "Second", "Krakow", &second)));

        let stored = registry.get(&id).unwrap();
        prop_assert_eq!(stored.name(), "First");
        prop_assert_eq!(stored.city(), "Warsaw");
        prop_assert_eq!(stored.specialty(), first.as_str());
        prop_assert_eq!(registry.len(), 1);
    }

    #[test]
    fn prop_city_search_ignores_case(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let registry = ClinicRegistry::new();
        let mut model = Model::new();
        for op in &ops {
            apply(&registry, &mut model, op)?;
        }

        let lower = registry.search_by_city("warsaw");
        let upper = registry.search_by_city("WARSAW");
        prop_assert_eq!(&lower, &upper);

        let expected: HashSet<String> = model
            .iter()
            .filter(|(_, (city, _))| city.to_lowercase() == "warsaw")
            .map(|(id, _)| id.clone())
            .collect();
        let found: HashSet<String> = lower.iter().map(|c| c.id().to_string()).collect();
        prop_assert_eq!(found, expected);
    }
}

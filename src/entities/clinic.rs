// 🏥 Clinic Entity - Stable identity + specialty index
//
// "Clinic id is IDENTITY (never changes), name/city/specialty are VALUES"
//
// Problem solved:
// - Same id inserted twice → rejected, first clinic wins
// - Specialty changes → clinic moves between index buckets atomically
// - Specialty lookup is O(1), city lookup is a deliberate linear scan

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

// ============================================================================
// CLINIC ENTITY
// ============================================================================

/// Clinic Entity
///
/// Identity: `id` (never changes, equality and hashing use it alone)
/// Values: name, city, specialty
///
/// Copies handed out by [`ClinicRegistry`] are detached: mutating them never
/// touches the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clinic {
    id: String,
    name: String,
    city: String,
    specialty: String,
}

impl Clinic {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        specialty: impl Into<String>,
    ) -> Self {
        Clinic {
            id: id.into(),
            name: name.into(),
            city: city.into(),
            specialty: specialty.into(),
        }
    }

    /// Create a clinic with a fresh UUID as its id
    pub fn with_generated_id(
        name: impl Into<String>,
        city: impl Into<String>,
        specialty: impl Into<String>,
    ) -> Self {
        Clinic::new(uuid::Uuid::new_v4().to_string(), name, city, specialty)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn specialty(&self) -> &str {
        &self.specialty
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    /// Only meaningful before insertion. Inserted clinics change specialty
    /// through [`ClinicRegistry::update_specialty`].
    pub fn set_specialty(&mut self, specialty: impl Into<String>) {
        self.specialty = specialty.into();
    }

    /// Case-insensitive city match
    pub fn is_in_city(&self, city: &str) -> bool {
        eq_ignore_case(&self.city, city)
    }
}

/// Char-by-char case-insensitive equality.
///
/// Each pair matches if equal, equal in upper case, or equal in lower case
/// after upper-casing. Whole-string lowercasing is context-sensitive (final
/// sigma) and can change lengths (dotted capital I), so it is not used here.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| {
            x == y || upper(x) == upper(y) || lower(upper(x)) == lower(upper(y))
        })
}

/// Single-char uppercase; chars that expand (ß → SS) map to themselves
fn upper(c: char) -> char {
    let mut mapped = c.to_uppercase();
    match (mapped.next(), mapped.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Single-char lowercase; İ lowercases to "i\u{307}", keep the base letter
fn lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

impl PartialEq for Clinic {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Clinic {}

impl Hash for Clinic {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Clinic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Clinic{{id='{}', name='{}', city='{}', specialty='{}'}}",
            self.id, self.name, self.city, self.specialty
        )
    }
}

/// Copy of both collections taken under one read lock, sorted for stable output
#[derive(Debug, Clone, Default)]
pub struct RegistryContents {
    /// Every clinic, ordered by id
    pub clinics: Vec<Clinic>,

    /// Specialty → members ordered by id (never empty)
    pub by_specialty: BTreeMap<String, Vec<Clinic>>,
}

// ============================================================================
// REGISTRY STATE
// ============================================================================

/// Both collections live behind one lock so no reader ever sees them disagree.
#[derive(Debug, Default)]
struct RegistryState {
    /// Primary collection, keyed by clinic id
    clinics: HashMap<String, Clinic>,

    /// Derived index: specialty → ids of clinics holding it (never empty)
    by_specialty: HashMap<String, HashSet<String>>,
}

impl RegistryState {
    fn index(&mut self, specialty: &str, id: &str) {
        self.by_specialty
            .entry(specialty.to_string())
            .or_default()
            .insert(id.to_string());
    }

    fn unindex(&mut self, specialty: &str, id: &str) {
        if let Some(bucket) = self.by_specialty.get_mut(specialty) {
            bucket.remove(id);
            if bucket.is_empty() {
                self.by_specialty.remove(specialty);
                trace!(specialty, "pruned empty specialty bucket");
            }
        }
    }
}

// ============================================================================
// CLINIC REGISTRY
// ============================================================================

/// Registry of clinics with a specialty index
///
/// Cloning the registry clones the handle, not the data: every clone sees
/// and mutates the same clinics. Each operation takes the lock once, so
/// insert/remove/update are atomic with respect to each other and to reads.
#[derive(Debug, Clone, Default)]
pub struct ClinicRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl ClinicRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        ClinicRegistry::default()
    }

    /// Create registry with the sample clinics pre-loaded
    pub fn with_sample_data() -> Self {
        let registry = ClinicRegistry::new();
        registry.register_sample_clinics();
        registry
    }

    /// Five clinics across four specialties, two of them in Warsaw
    fn register_sample_clinics(&self) {
        self.insert_all([
            Clinic::new("C001", "Klinika Alfa", "Warsaw", "Dermatology"),
            Clinic::new("C002", "Klinika Beta", "Krakow", "Cardiology"),
            Clinic::new("C003", "Centrum Zdrowia Gamma", "Wroclaw", "Orthopedics"),
            Clinic::new("C004", "MediCare Delta", "Gdansk", "Pediatrics"),
            Clinic::new("C005", "Nova Klinika", "Warsaw", "Dermatology"),
        ]);
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Insert a clinic unless its id is already taken
    ///
    /// Returns `false` and leaves the existing clinic untouched on a duplicate id.
    pub fn insert(&self, clinic: Clinic) -> bool {
        let mut state = self.write();

        if state.clinics.contains_key(&clinic.id) {
            debug!(id = %clinic.id, "rejected clinic with duplicate id");
            return false;
        }

        state.index(&clinic.specialty, &clinic.id);
        debug!(id = %clinic.id, specialty = %clinic.specialty, "clinic inserted");
        state.clinics.insert(clinic.id.clone(), clinic);
        true
    }

    /// Insert every clinic, skipping duplicates. Returns how many were inserted.
    pub fn insert_all<I>(&self, clinics: I) -> usize
    where
        I: IntoIterator<Item = Clinic>,
    {
        clinics
            .into_iter()
            .map(|clinic| self.insert(clinic))
            .filter(|inserted| *inserted)
            .count()
    }

    /// Remove a clinic from both the primary collection and the index
    pub fn remove_by_id(&self, id: &str) -> bool {
        let mut state = self.write();

        let Some(clinic) = state.clinics.remove(id) else {
            debug!(id, "remove: no such clinic");
            return false;
        };

        state.unindex(&clinic.specialty, id);
        debug!(id, specialty = %clinic.specialty, "clinic removed");
        true
    }

    /// Move a clinic to another specialty bucket
    ///
    /// Same-value updates return `true` without touching the index.
    pub fn update_specialty(&self, id: &str, specialty: &str) -> bool {
        let mut state = self.write();

        let Some(clinic) = state.clinics.get_mut(id) else {
            debug!(id, "update_specialty: no such clinic");
            return false;
        };

        if clinic.specialty == specialty {
            return true;
        }

        let old = std::mem::replace(&mut clinic.specialty, specialty.to_string());
        state.unindex(&old, id);
        state.index(specialty, id);
        debug!(id, from = %old, to = specialty, "clinic specialty updated");
        true
    }

    /// Rename a clinic. The index is unaffected.
    pub fn update_name(&self, id: &str, name: &str) -> bool {
        self.modify(id, |clinic| clinic.set_name(name))
    }

    /// Relocate a clinic. City is unindexed, so only the field changes.
    pub fn update_city(&self, id: &str, city: &str) -> bool {
        self.modify(id, |clinic| clinic.set_city(city))
    }

    /// Apply an edit that must not touch `specialty`
    fn modify<F>(&self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut Clinic),
    {
        let mut state = self.write();
        match state.clinics.get_mut(id) {
            Some(clinic) => {
                edit(clinic);
                debug!(id, "clinic updated");
                true
            }
            None => {
                debug!(id, "update: no such clinic");
                false
            }
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Clinics currently holding `specialty`; empty when the key is absent
    pub fn get_by_specialty(&self, specialty: &str) -> HashSet<Clinic> {
        let state = self.read();
        state
            .by_specialty
            .get(specialty)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.clinics.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Linear, case-insensitive scan over every clinic's city
    pub fn search_by_city(&self, city: &str) -> HashSet<Clinic> {
        self.read()
            .clinics
            .values()
            .filter(|clinic| clinic.is_in_city(city))
            .cloned()
            .collect()
    }

    /// Get a copy of one clinic by id
    pub fn get(&self, id: &str) -> Option<Clinic> {
        self.read().clinics.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().clinics.contains_key(id)
    }

    /// All clinics (unordered)
    pub fn all_clinics(&self) -> Vec<Clinic> {
        self.read().clinics.values().cloned().collect()
    }

    /// All specialty keys currently present (unordered)
    pub fn specialties(&self) -> Vec<String> {
        self.read().by_specialty.keys().cloned().collect()
    }

    /// Clinics and index copied together, so counts and members always agree
    pub fn contents(&self) -> RegistryContents {
        let state = self.read();

        let mut clinics: Vec<Clinic> = state.clinics.values().cloned().collect();
        clinics.sort_by(|a, b| a.id.cmp(&b.id));

        let by_specialty = state
            .by_specialty
            .iter()
            .map(|(specialty, ids)| {
                let mut members: Vec<Clinic> = ids
                    .iter()
                    .filter_map(|id| state.clinics.get(id))
                    .cloned()
                    .collect();
                members.sort_by(|a, b| a.id.cmp(&b.id));
                (specialty.clone(), members)
            })
            .collect();

        RegistryContents {
            clinics,
            by_specialty,
        }
    }

    /// Bucket size per specialty
    pub fn specialty_counts(&self) -> HashMap<String, usize> {
        self.read()
            .by_specialty
            .iter()
            .map(|(specialty, ids)| (specialty.clone(), ids.len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().clinics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().clinics.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

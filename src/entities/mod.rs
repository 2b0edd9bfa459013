// Entity Models
// "Identity persists, values change"
//
// Each entity has:
// - Stable identity (id) that NEVER changes
// - Mutable values, changed only through its registry
// - Registry for uniqueness and indexed lookups

pub mod clinic;

pub use clinic::{eq_ignore_case, Clinic, ClinicRegistry, RegistryContents};

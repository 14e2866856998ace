// assay-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Le contrat "exécuter du SQL, récupérer des lignes"
pub mod ports;

// 2. Domain (Cœur du métier)
// Specs de checks, comparateur, générateur SQL, verdicts.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, chargement des suites YAML, écriture des rapports
pub mod infrastructure;

// 4. Application (Use Cases)
// Évaluateurs et exécution des suites
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::AssayError;

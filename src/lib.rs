//! A pure Rust library for assembling thermodynamic phase objects from
//! declarative YAML phase definitions.
//! It resolves element and species declarations across documents, selects one
//! of many interchangeable thermodynamic models by name, attaches per-species
//! standard-state sub-models and leaves every phase initialized in a valid state.
//!
//! # Features
//!
//! - **Model registry**: Name and alias lookup for 24 built-in phase models
//!   and 7 standard-state sub-models, with room for custom registrations
//! - **Reference resolution**: Elements and species taken from the phase
//!   itself, named sections of the root document, the built-in element table,
//!   or `path/section` references into other files
//! - **Standard states**: Per-species sub-model selection from
//!   `equation-of-state` entries for variable-pressure standard-state models
//! - **Diagnostics**: Location-tagged errors and a pluggable sink for
//!   deprecation notices
//!
//! # Quick Start
//!
//! ```
//! use thermo_forge::{Map, PhaseForge, ONE_ATM};
//!
//! let root = Map::from_yaml_str(
//!     r#"
//!     phases:
//!     - name: air
//!       thermo: ideal-gas
//!       elements: [O, N, Ar]
//!       species: all
//!       state: {T: 300.0, P: 1 atm, X: {O2: 0.21, N2: 0.78, AR: 0.01}}
//!     species:
//!     - {name: O2, composition: {O: 2}}
//!     - {name: N2, composition: {N: 2}}
//!     - {name: AR, composition: {Ar: 1}}
//!     "#,
//!     None,
//! )?;
//!
//! let node = root.require("phases")?.find_where("name", "air")?;
//! let air = PhaseForge::new().build(node, &root)?;
//!
//! assert_eq!(air.model_kind(), "ideal-gas");
//! assert_eq!(air.n_species(), 3);
//! assert_eq!(air.pressure(), ONE_ATM);
//! assert_eq!(air.species_index("N2"), Some(1));
//! # Ok::<(), thermo_forge::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`]: Input format detection and the caching [`DocumentLoader`](io::DocumentLoader)
//! - [`thermo`]: Phase model variants and standard-state sub-models
//! - [`PhaseForge`]: The assembly pipeline
//! - [`ModelRegistry`] / [`StandardStateRegistry`]: Name-to-constructor lookup
//!
//! # Data Types
//!
//! - [`Map`] / [`Node`] / [`Value`]: Location-aware document tree
//! - [`Phase`]: Assembled phase with elements, species, model and state
//! - [`ElementDef`]: Element symbol, atomic weight, atomic number and entropy
//! - [`Species`]: Species name, composition and charge
//! - [`ThermoState`]: Temperature, pressure and mole fractions
//!
//! ## Configuration
//!
//! - [`ForgeConfig`]: Data directories and deprecation policy
//! - [`DiagnosticSink`]: Receiver for deprecation notices

mod error;
mod forge;
mod model;
mod registry;

pub mod io;
pub mod thermo;

pub use error::{Error, Location, ReferenceKind, RegistryKind, Result};

pub use model::element::{ENTROPY298_UNKNOWN, ElementDef, builtin_name};
pub use model::node::{Map, Node, Value};
pub use model::phase::{Phase, UndefinedElements};
pub use model::species::Species;
pub use model::state::{DEFAULT_TEMPERATURE, ONE_ATM, ThermoState};

pub use registry::{Factory, ModelRegistry, StandardStateRegistry};

pub use forge::{
    CollectingSink, DeprecationPolicy, DiagnosticSink, ForgeConfig, LogSink, Notice, PhaseForge,
    new_phase, new_phase_from_file,
};

pub use thermo::{StandardState, ThermoModel};

/// Crate version, as reported by the `tforge` binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

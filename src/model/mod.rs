//! Core data structures for input documents and assembled phases.
//!
//! - [`node`] – Location-aware document tree parsed from YAML input files.
//! - [`element`] – Element definitions and the built-in element table.
//! - [`species`] – Species definitions resolved from species sections.
//! - [`state`] – Temperature, pressure and composition of a phase.
//! - [`phase`] – The assembled phase with its thermodynamic model.
//!
//! Document nodes carry the file and key path they were read from, so every
//! error raised while assembling a phase can point back at its input.

pub mod element;
pub mod node;
pub mod phase;
pub mod species;
pub mod state;

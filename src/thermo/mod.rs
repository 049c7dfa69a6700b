//! Thermodynamic model variants and per-species standard-state sub-models.
//!
//! A [`Phase`](crate::Phase) owns one boxed [`ThermoModel`] chosen by its
//! `thermo` key. The model reads its own parameters from the phase
//! definition and validates them against the resolved species when the
//! phase is initialized. Numerical property evaluation is not part of this
//! crate; the models only carry and check their configuration.
//!
//! Models with variable-pressure standard states expose a
//! [`StandardStates`] table through [`ThermoModel::standard_states_mut`];
//! every other model returns `None`, which is how the assembly pipeline
//! decides whether to attach per-species sub-models.

mod condensed;
mod electrolyte;
mod ideal;
mod solution;
mod standard_state;
mod surface;

pub use condensed::{CompoundLattice, FixedStoichiometry, Lattice, LiquidWater, PureFluid};
pub use electrolyte::{DebyeHuckel, HmwElectrolyte, IdealMolalSolution, PitzerTemperatureModel};
pub use ideal::{
    ElectronEnergyDistribution, IdealCondensed, IdealGas, IdealSolutionVpss, NoThermo, Plasma,
};
pub use solution::{
    BinaryInteraction, BinarySolutionTabulated, CubicEos, CubicParameters, IonsFromNeutral,
    Margules, MaskellSolidSolution, RedlichKister,
};
pub use standard_state::{
    ConstantVolume, Hkft, IdealGasStandardState, IonsFromNeutralStandardState, StandardState,
    StandardStates, TemperaturePolynomial, WaterStandardState,
};
pub use surface::{ElectronCloud, Surface};

use std::fmt;

use crate::error::{Error, Result};
use crate::model::node::Map;
use crate::model::species::Species;

/// Model-specific behavior of a phase.
pub trait ThermoModel: Send + Sync + fmt::Debug {
    /// Canonical registry key of this model, e.g. `"ideal-gas"`.
    fn kind(&self) -> &'static str;

    /// Reads model-specific parameters from the phase definition.
    fn set_parameters(&mut self, _phase: &Map, _root: &Map) -> Result<()> {
        Ok(())
    }

    /// Validates the configuration once species and parameters are final.
    fn init_thermo(&mut self, _species: &[Species]) -> Result<()> {
        Ok(())
    }

    /// Per-species standard-state table, for variable-pressure models only.
    fn standard_states(&self) -> Option<&StandardStates> {
        None
    }

    fn standard_states_mut(&mut self) -> Option<&mut StandardStates> {
        None
    }
}

/// Reads `standard-concentration-basis`, shared by several condensed models.
pub(crate) fn concentration_basis(phase: &Map) -> Result<String> {
    let basis = phase.get_str_or("standard-concentration-basis", "unity")?;
    match basis {
        "unity" | "species-molar-volume" | "solvent-molar-volume" => Ok(basis.to_string()),
        other => Err(Error::structural(
            phase.require("standard-concentration-basis")?.location(),
            format!("unknown standard concentration basis '{}'", other),
        )),
    }
}

/// Reads a strictly positive number from `key`.
pub(crate) fn positive(phase: &Map, key: &str) -> Result<f64> {
    let node = phase.require(key)?;
    let value = node.as_f64()?;
    if value <= 0.0 {
        return Err(Error::structural(
            node.location(),
            format!("'{}' must be positive, got {}", key, value),
        ));
    }
    Ok(value)
}

pub(crate) fn require_species<'a>(species: &'a [Species], name: &str, model: &str) -> Result<&'a Species> {
    species.iter().find(|s| s.name == name).ok_or_else(|| Error::InvalidPhase {
        phase: model.to_string(),
        detail: format!("species '{}' referenced by the model is not part of the phase", name),
    })
}

pub(crate) fn require_single_species(species: &[Species], model: &str) -> Result<()> {
    if species.len() != 1 {
        return Err(Error::InvalidPhase {
            phase: model.to_string(),
            detail: format!("model requires exactly one species, found {}", species.len()),
        });
    }
    Ok(())
}

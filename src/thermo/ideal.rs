use super::{StandardStates, ThermoModel, concentration_basis, positive};
use crate::error::{Error, Result};
use crate::model::node::Map;
use crate::model::species::Species;

/// Bare phase with no model-specific behavior (`none`).
#[derive(Debug, Default)]
pub struct NoThermo;

impl ThermoModel for NoThermo {
    fn kind(&self) -> &'static str {
        "none"
    }
}

#[derive(Debug, Default)]
pub struct IdealGas;

impl ThermoModel for IdealGas {
    fn kind(&self) -> &'static str {
        "ideal-gas"
    }
}

/// Electron energy distribution of a plasma phase.
#[derive(Debug, Clone, PartialEq)]
pub enum ElectronEnergyDistribution {
    Isotropic {
        shape_factor: f64,
        mean_electron_energy: Option<f64>,
    },
    Discretized {
        energy_levels: Vec<f64>,
        distribution: Vec<f64>,
    },
}

impl Default for ElectronEnergyDistribution {
    fn default() -> Self {
        Self::Isotropic {
            shape_factor: 2.0,
            mean_electron_energy: None,
        }
    }
}

/// Ideal gas with a separately tracked electron population.
#[derive(Debug, Default)]
pub struct Plasma {
    pub distribution: ElectronEnergyDistribution,
}

impl ThermoModel for Plasma {
    fn kind(&self) -> &'static str {
        "plasma"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        let Some(node) = phase.get("electron-energy-distribution") else {
            return Ok(());
        };
        let eedf = node.as_map()?;
        self.distribution = match eedf.require("type")?.as_str()? {
            "isotropic" => ElectronEnergyDistribution::Isotropic {
                shape_factor: eedf.get_f64_or("shape-factor", 2.0)?,
                mean_electron_energy: eedf
                    .get("mean-electron-energy")
                    .map(|n| n.as_f64())
                    .transpose()?,
            },
            "discretized" => {
                let energy_levels = eedf.require("energy-levels")?.as_f64_list()?;
                let distribution = eedf.require("distribution")?.as_f64_list()?;
                if energy_levels.len() != distribution.len() {
                    return Err(Error::structural(
                        eedf.location(),
                        format!(
                            "energy-levels ({}) and distribution ({}) differ in length",
                            energy_levels.len(),
                            distribution.len()
                        ),
                    ));
                }
                ElectronEnergyDistribution::Discretized {
                    energy_levels,
                    distribution,
                }
            }
            other => {
                return Err(Error::structural(
                    eedf.location(),
                    format!("unknown electron energy distribution type '{}'", other),
                ));
            }
        };
        Ok(())
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        super::require_species(species, "e", self.kind()).map(|_| ())
    }
}

/// Ideal solid or liquid solution.
#[derive(Debug)]
pub struct IdealCondensed {
    pub basis: String,
}

impl Default for IdealCondensed {
    fn default() -> Self {
        Self {
            basis: "unity".to_string(),
        }
    }
}

impl ThermoModel for IdealCondensed {
    fn kind(&self) -> &'static str {
        "ideal-condensed"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        self.basis = concentration_basis(phase)?;
        Ok(())
    }
}

/// Ideal solution or ideal gas with variable-pressure standard states.
#[derive(Debug)]
pub struct IdealSolutionVpss {
    kind: &'static str,
    pub basis: String,
    pub reference_pressure: Option<f64>,
    states: StandardStates,
}

impl IdealSolutionVpss {
    pub fn solution() -> Self {
        Self {
            kind: "ideal-solution-VPSS",
            basis: "unity".to_string(),
            reference_pressure: None,
            states: StandardStates::new(),
        }
    }

    pub fn gas() -> Self {
        Self {
            kind: "ideal-gas-VPSS",
            ..Self::solution()
        }
    }

    pub fn is_gas(&self) -> bool {
        self.kind == "ideal-gas-VPSS"
    }
}

impl ThermoModel for IdealSolutionVpss {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        if !self.is_gas() {
            self.basis = concentration_basis(phase)?;
        }
        if phase.has_key("reference-pressure") {
            self.reference_pressure = Some(positive(phase, "reference-pressure")?);
        }
        Ok(())
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        self.states.check_complete(species.len(), self.kind)
    }

    fn standard_states(&self) -> Option<&StandardStates> {
        Some(&self.states)
    }

    fn standard_states_mut(&mut self) -> Option<&mut StandardStates> {
        Some(&mut self.states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(text: &str) -> Map {
        Map::from_yaml_str(text, None).unwrap()
    }

    #[test]
    fn plasma_reads_discretized_distribution() {
        let mut plasma = Plasma::default();
        let phase = map(
            "electron-energy-distribution:\n  type: discretized\n  energy-levels: [0.0, 1.0]\n  distribution: [0.9, 0.1]\n",
        );
        plasma.set_parameters(&phase, &Map::default()).unwrap();
        assert!(matches!(
            plasma.distribution,
            ElectronEnergyDistribution::Discretized { .. }
        ));

        let bad = map(
            "electron-energy-distribution:\n  type: discretized\n  energy-levels: [0.0]\n  distribution: [0.9, 0.1]\n",
        );
        assert!(plasma.set_parameters(&bad, &Map::default()).is_err());
    }

    #[test]
    fn plasma_requires_electron_species() {
        let mut plasma = Plasma::default();
        assert!(plasma.init_thermo(&[]).is_err());
    }

    #[test]
    fn condensed_basis_is_validated() {
        let mut model = IdealCondensed::default();
        model
            .set_parameters(&map("standard-concentration-basis: species-molar-volume\n"), &Map::default())
            .unwrap();
        assert_eq!(model.basis, "species-molar-volume");
        assert!(model
            .set_parameters(&map("standard-concentration-basis: bogus\n"), &Map::default())
            .is_err());
    }

    #[test]
    fn vpss_variants_expose_standard_states() {
        let mut gas = IdealSolutionVpss::gas();
        assert_eq!(gas.kind(), "ideal-gas-VPSS");
        assert!(gas.standard_states_mut().is_some());
        assert!(IdealGas.standard_states().is_none());
    }
}

use super::{ThermoModel, positive, require_single_species};
use crate::error::{Error, Result};
use crate::model::node::Map;
use crate::model::species::Species;

/// Single pure condensed species.
#[derive(Debug, Default)]
pub struct FixedStoichiometry;

impl ThermoModel for FixedStoichiometry {
    fn kind(&self) -> &'static str {
        "fixed-stoichiometry"
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        require_single_species(species, self.kind())
    }
}

const PURE_FLUIDS: &[&str] = &[
    "water",
    "nitrogen",
    "methane",
    "hydrogen",
    "oxygen",
    "carbon-dioxide",
    "heptane",
    "HFC-134a",
];

/// Two-phase pure fluid described by a named equation of state.
#[derive(Debug, Default)]
pub struct PureFluid {
    pub substance: String,
}

impl ThermoModel for PureFluid {
    fn kind(&self) -> &'static str {
        "pure-fluid"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        let node = phase.require("pure-fluid-name")?;
        let name = node.as_str()?;
        if !PURE_FLUIDS.contains(&name) {
            return Err(Error::structural(
                node.location(),
                format!("unknown pure fluid '{}' (known: {})", name, PURE_FLUIDS.join(", ")),
            ));
        }
        self.substance = name.to_string();
        Ok(())
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        require_single_species(species, self.kind())
    }
}

/// Liquid water from the IAPWS-95 formulation.
#[derive(Debug, Default)]
pub struct LiquidWater;

impl ThermoModel for LiquidWater {
    fn kind(&self) -> &'static str {
        "liquid-water-IAPWS95"
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        require_single_species(species, self.kind())?;
        let water = &species[0];
        if water.amount_of("H") != 2.0 || water.amount_of("O") != 1.0 {
            return Err(Error::InvalidPhase {
                phase: self.kind().to_string(),
                detail: format!("species '{}' is not H2O", water.name),
            });
        }
        Ok(())
    }
}

/// Lattice of sites occupied by the phase's species.
#[derive(Debug, Default)]
pub struct Lattice {
    /// Site density in kmol/m³.
    pub site_density: f64,
}

impl ThermoModel for Lattice {
    fn kind(&self) -> &'static str {
        "lattice"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        self.site_density = positive(phase, "site-density")?;
        Ok(())
    }
}

/// Stoichiometric combination of named lattice phases.
#[derive(Debug, Default)]
pub struct CompoundLattice {
    /// Lattice phase name and its stoichiometric coefficient.
    pub composition: Vec<(String, f64)>,
}

impl ThermoModel for CompoundLattice {
    fn kind(&self) -> &'static str {
        "compound-lattice"
    }

    fn set_parameters(&mut self, phase: &Map, root: &Map) -> Result<()> {
        let node = phase.require("composition")?;
        let entries = node.as_map()?;
        if entries.is_empty() {
            return Err(Error::structural(node.location(), "composition lists no lattices"));
        }
        let phases = root.get("phases");
        self.composition.clear();
        for (lattice, amount) in entries.iter() {
            let amount = amount.as_f64()?;
            if amount < 0.0 {
                return Err(Error::structural(
                    node.location(),
                    format!("negative coefficient for lattice '{}'", lattice),
                ));
            }
            if let Some(phases) = phases {
                phases.find_where("name", lattice)?;
            }
            self.composition.push((lattice.to_string(), amount));
        }
        Ok(())
    }
}

use super::{StandardStates, ThermoModel, concentration_basis, require_species};
use crate::error::{Error, Result};
use crate::model::node::{Map, Value};
use crate::model::species::Species;

/// One binary interaction entry of an excess Gibbs energy model.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryInteraction {
    pub species: [String; 2],
    pub excess_enthalpy: Vec<f64>,
    pub excess_entropy: Vec<f64>,
}

fn coefficients(entry: &Map, key: &str) -> Result<Vec<f64>> {
    match entry.get(key) {
        None => Ok(Vec::new()),
        Some(node) => match node.value() {
            Value::List(_) => node.as_f64_list(),
            _ => Ok(vec![node.as_f64()?]),
        },
    }
}

fn read_interactions(phase: &Map) -> Result<Vec<BinaryInteraction>> {
    let Some(node) = phase.get("interactions") else {
        return Ok(Vec::new());
    };
    node.as_map_list()?
        .into_iter()
        .map(|entry| {
            let pair = entry.require("species")?;
            let names = pair.as_string_list()?;
            let [a, b] = names.as_slice() else {
                return Err(Error::structural(
                    pair.location(),
                    format!("an interaction names exactly two species, found {}", names.len()),
                ));
            };
            Ok(BinaryInteraction {
                species: [a.to_string(), b.to_string()],
                excess_enthalpy: coefficients(entry, "excess-enthalpy")?,
                excess_entropy: coefficients(entry, "excess-entropy")?,
            })
        })
        .collect()
}

fn check_interactions(interactions: &[BinaryInteraction], species: &[Species], model: &str) -> Result<()> {
    for interaction in interactions {
        for name in &interaction.species {
            require_species(species, name, model)?;
        }
    }
    Ok(())
}

macro_rules! excess_model {
    ($(#[$doc:meta])* $name:ident, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Default)]
        pub struct $name {
            pub interactions: Vec<BinaryInteraction>,
            states: StandardStates,
        }

        impl ThermoModel for $name {
            fn kind(&self) -> &'static str {
                $kind
            }

            fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
                self.interactions = read_interactions(phase)?;
                Ok(())
            }

            fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
                check_interactions(&self.interactions, species, $kind)?;
                self.states.check_complete(species.len(), $kind)
            }

            fn standard_states(&self) -> Option<&StandardStates> {
                Some(&self.states)
            }

            fn standard_states_mut(&mut self) -> Option<&mut StandardStates> {
                Some(&mut self.states)
            }
        }
    };
}

excess_model!(
    /// Margules excess Gibbs energy expansion.
    Margules,
    "Margules"
);
excess_model!(
    /// Redlich-Kister excess Gibbs energy expansion.
    RedlichKister,
    "Redlich-Kister"
);

/// Ions formed by dissociation of the species of a neutral phase.
#[derive(Debug, Default)]
pub struct IonsFromNeutral {
    pub neutral_phase: String,
    states: StandardStates,
}

impl ThermoModel for IonsFromNeutral {
    fn kind(&self) -> &'static str {
        "ions-from-neutral-molecule"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        self.neutral_phase = phase.require("neutral-phase")?.as_str()?.to_string();
        Ok(())
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        self.states.check_complete(species.len(), self.kind())
    }

    fn standard_states(&self) -> Option<&StandardStates> {
        Some(&self.states)
    }

    fn standard_states_mut(&mut self) -> Option<&mut StandardStates> {
        Some(&mut self.states)
    }
}

/// Maskell solid solution of a host and a product species.
#[derive(Debug, Default)]
pub struct MaskellSolidSolution {
    pub excess_enthalpy: f64,
    pub product_species: String,
}

impl ThermoModel for MaskellSolidSolution {
    fn kind(&self) -> &'static str {
        "Maskell-solid-solution"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        self.excess_enthalpy = phase.get_f64_or("excess-enthalpy", 0.0)?;
        self.product_species = phase.require("product-species")?.as_str()?.to_string();
        Ok(())
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        if species.len() != 2 {
            return Err(Error::invalid_phase(
                self.kind(),
                format!("model requires exactly two species, found {}", species.len()),
            ));
        }
        require_species(species, &self.product_species, self.kind()).map(|_| ())
    }
}

/// Tabulated enthalpy and entropy as functions of one species' mole fraction.
#[derive(Debug, Default)]
pub struct BinarySolutionTabulated {
    pub basis: String,
    pub tabulated_species: String,
    pub mole_fractions: Vec<f64>,
    pub enthalpy: Vec<f64>,
    pub entropy: Vec<f64>,
}

impl ThermoModel for BinarySolutionTabulated {
    fn kind(&self) -> &'static str {
        "binary-solution-tabulated"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        self.basis = concentration_basis(phase)?;
        self.tabulated_species = phase.require("tabulated-species")?.as_str()?.to_string();

        let table = phase.require("tabulated-thermo")?.as_map()?;
        self.mole_fractions = table.require("mole-fractions")?.as_f64_list()?;
        self.enthalpy = table.require("enthalpy")?.as_f64_list()?;
        self.entropy = table.require("entropy")?.as_f64_list()?;

        let n = self.mole_fractions.len();
        if n == 0 || self.enthalpy.len() != n || self.entropy.len() != n {
            return Err(Error::structural(
                table.location(),
                format!(
                    "tabulated columns must be non-empty and equally long (mole-fractions {}, enthalpy {}, entropy {})",
                    n,
                    self.enthalpy.len(),
                    self.entropy.len()
                ),
            ));
        }
        Ok(())
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        require_species(species, &self.tabulated_species, self.kind()).map(|_| ())
    }
}

/// Per-species parameters of a cubic equation of state.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicParameters {
    /// Attraction parameter; two entries mean a temperature-dependent form.
    pub a: Vec<f64>,
    pub b: f64,
    pub acentric_factor: Option<f64>,
}

/// Redlich-Kwong or Peng-Robinson cubic equation of state.
#[derive(Debug)]
pub struct CubicEos {
    kind: &'static str,
    pub parameters: Vec<CubicParameters>,
}

impl CubicEos {
    pub fn redlich_kwong() -> Self {
        Self {
            kind: "Redlich-Kwong",
            parameters: Vec::new(),
        }
    }

    pub fn peng_robinson() -> Self {
        Self {
            kind: "Peng-Robinson",
            parameters: Vec::new(),
        }
    }

    fn species_parameters(&self, sp: &Species) -> Result<CubicParameters> {
        let eos = sp.input.get("equation-of-state").ok_or_else(|| {
            Error::invalid_phase(
                self.kind,
                format!("species '{}' has no equation-of-state entry", sp.name),
            )
        })?;
        let entry = eos
            .as_map_list()?
            .into_iter()
            .find(|e| e.get("model").and_then(|m| m.as_str().ok()) == Some(self.kind))
            .ok_or_else(|| {
                Error::structural(
                    eos.location(),
                    format!("species '{}' has no '{}' equation-of-state entry", sp.name, self.kind),
                )
            })?;

        let a = entry.require("a")?;
        let a = match a.value() {
            Value::List(_) => a.as_f64_list()?,
            _ => vec![a.as_f64()?],
        };
        let acentric_factor = if self.kind == "Peng-Robinson" {
            Some(entry.require("acentric-factor")?.as_f64()?)
        } else {
            None
        };
        Ok(CubicParameters {
            a,
            b: entry.require("b")?.as_f64()?,
            acentric_factor,
        })
    }
}

impl ThermoModel for CubicEos {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        self.parameters = species
            .iter()
            .map(|sp| self.species_parameters(sp))
            .collect::<Result<_>>()?;
        Ok(())
    }
}

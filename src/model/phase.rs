use log::debug;

use super::element::ElementDef;
use super::node::{Map, Node};
use super::species::Species;
use super::state::{Dimension, ThermoState, parse_composition, parse_quantity};
use crate::error::{Error, ReferenceKind, Result};
use crate::thermo::{StandardState, ThermoModel};

/// How a phase treats species that contain elements it never declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedElements {
    /// Reject the species.
    #[default]
    Throw,
    /// Skip the species silently.
    Ignore,
    /// Declare the element from the built-in table.
    AddMissing,
}

/// A thermodynamic phase: elements, species, model and state.
///
/// Phases are produced by [`PhaseForge`](crate::PhaseForge); building one by
/// hand is possible but the model must still be initialized exactly once
/// through [`Phase::initialize`].
#[derive(Debug)]
pub struct Phase {
    name: String,
    elements: Vec<ElementDef>,
    species: Vec<Species>,
    undefined_elements: UndefinedElements,
    state: ThermoState,
    model: Box<dyn ThermoModel>,
    initialized: bool,
}

impl Phase {
    pub fn new(model: Box<dyn ThermoModel>) -> Self {
        Self {
            name: String::new(),
            elements: Vec::new(),
            species: Vec::new(),
            undefined_elements: UndefinedElements::default(),
            state: ThermoState::default(),
            model,
            initialized: false,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn model(&self) -> &dyn ThermoModel {
        self.model.as_ref()
    }

    #[inline]
    pub fn model_kind(&self) -> &'static str {
        self.model.kind()
    }

    #[inline]
    pub fn elements(&self) -> &[ElementDef] {
        &self.elements
    }

    #[inline]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    #[inline]
    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    pub fn element_index(&self, symbol: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.symbol == symbol)
    }

    pub fn species_index(&self, name: &str) -> Option<usize> {
        self.species.iter().position(|s| s.name == name)
    }

    pub fn undefined_elements(&self) -> UndefinedElements {
        self.undefined_elements
    }

    pub fn set_undefined_elements(&mut self, policy: UndefinedElements) {
        self.undefined_elements = policy;
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Declares an element and returns its index.
    ///
    /// Re-declaring an identical element is a no-op; a different definition
    /// under an existing symbol is rejected.
    pub fn add_element(&mut self, element: ElementDef) -> Result<usize> {
        if let Some(k) = self.element_index(&element.symbol) {
            if self.elements[k] == element {
                return Ok(k);
            }
            return Err(self.invalid(format!(
                "element '{}' is already declared with a different definition",
                element.symbol
            )));
        }
        self.check_mutable()?;
        self.elements.push(element);
        Ok(self.elements.len() - 1)
    }

    /// Adds a species, applying the undefined-element policy.
    ///
    /// Returns `false` when the species was skipped under
    /// [`UndefinedElements::Ignore`].
    pub fn add_species(&mut self, species: Species) -> Result<bool> {
        self.check_mutable()?;
        if self.species_index(&species.name).is_some() {
            return Err(self.invalid(format!("species '{}' is already defined", species.name)));
        }

        let undeclared: Vec<&str> = species
            .composition
            .iter()
            .map(|(el, _)| el.as_str())
            .filter(|el| self.element_index(el).is_none())
            .collect();
        if !undeclared.is_empty() {
            match self.undefined_elements {
                UndefinedElements::Throw => {
                    return Err(self.invalid(format!(
                        "species '{}' contains undeclared element '{}'",
                        species.name, undeclared[0]
                    )));
                }
                UndefinedElements::Ignore => {
                    debug!(
                        "skipping species '{}' in phase '{}': undeclared element '{}'",
                        species.name, self.name, undeclared[0]
                    );
                    return Ok(false);
                }
                UndefinedElements::AddMissing => {
                    let missing: Vec<ElementDef> = undeclared
                        .iter()
                        .map(|symbol| {
                            ElementDef::builtin(symbol).ok_or_else(|| {
                                Error::not_found(
                                    ReferenceKind::Element,
                                    *symbol,
                                    "built-in element table",
                                    species.input.location(),
                                )
                            })
                        })
                        .collect::<Result<_>>()?;
                    for element in missing {
                        self.add_element(element)?;
                    }
                }
            }
        }

        self.species.push(species);
        Ok(true)
    }

    pub fn supports_standard_states(&self) -> bool {
        self.model.standard_states().is_some()
    }

    /// Installs the standard-state sub-model of species `k`.
    pub fn install_standard_state(&mut self, k: usize, model: Box<dyn StandardState>) -> Result<()> {
        if k >= self.species.len() {
            return Err(self.invalid(format!(
                "species index {} out of range for {} species",
                k,
                self.species.len()
            )));
        }
        if !self.supports_standard_states() {
            return Err(self.invalid(format!(
                "model '{}' does not use per-species standard states",
                self.model.kind()
            )));
        }
        if let Some(states) = self.model.standard_states_mut() {
            states.install(k, model);
        }
        Ok(())
    }

    pub fn standard_state(&self, k: usize) -> Option<&dyn StandardState> {
        self.model.standard_states().and_then(|states| states.get(k))
    }

    /// Passes model-specific parameters from the phase definition to the model.
    pub fn set_parameters(&mut self, phase: &Map, root: &Map) -> Result<()> {
        self.model.set_parameters(phase, root)
    }

    /// Finalizes the phase. Must be called exactly once, after all species
    /// have been added.
    pub fn initialize(&mut self) -> Result<()> {
        self.check_mutable()?;
        let name = &self.name;
        self.model.init_thermo(&self.species).map_err(|e| match e {
            Error::InvalidPhase { phase: model, detail } => {
                Error::invalid_phase(name, format!("{}: {}", model, detail))
            }
            other => other,
        })?;
        self.state.mole_fractions = vec![0.0; self.species.len()];
        if let Some(x0) = self.state.mole_fractions.first_mut() {
            *x0 = 1.0;
        }
        self.initialized = true;
        Ok(())
    }

    #[inline]
    pub fn temperature(&self) -> f64 {
        self.state.temperature
    }

    #[inline]
    pub fn pressure(&self) -> f64 {
        self.state.pressure
    }

    #[inline]
    pub fn mole_fractions(&self) -> &[f64] {
        &self.state.mole_fractions
    }

    pub fn state(&self) -> &ThermoState {
        &self.state
    }

    pub fn set_state_tp(&mut self, temperature: f64, pressure: f64) -> Result<()> {
        if !(temperature > 0.0) || !(pressure > 0.0) {
            return Err(self.invalid(format!(
                "temperature and pressure must be positive, got T = {} K, P = {} Pa",
                temperature, pressure
            )));
        }
        self.state.temperature = temperature;
        self.state.pressure = pressure;
        Ok(())
    }

    /// Applies a `state` map with temperature, pressure and composition.
    pub fn set_state(&mut self, state: &Map) -> Result<()> {
        let mut temperature = self.state.temperature;
        let mut pressure = self.state.pressure;
        let mut mole = None;
        let mut mass = None;

        for (key, value) in state.iter() {
            match key {
                "T" | "temperature" => temperature = parse_quantity(value, Dimension::Temperature)?,
                "P" | "pressure" => pressure = parse_quantity(value, Dimension::Pressure)?,
                "X" | "mole-fractions" => mole = Some(value),
                "Y" | "mass-fractions" => mass = Some(value),
                other => {
                    return Err(Error::structural(
                        value.location(),
                        format!("unsupported state property '{}'", other),
                    ));
                }
            }
        }

        let fractions = match (mole, mass) {
            (Some(_), Some(_)) => {
                return Err(Error::structural(
                    state.location(),
                    "mole and mass fractions cannot both be given",
                ));
            }
            (Some(node), None) => Some(self.composition_vector(node, false)?),
            (None, Some(node)) => Some(self.composition_vector(node, true)?),
            (None, None) => None,
        };

        self.set_state_tp(temperature, pressure)?;
        if let Some(fractions) = fractions {
            self.state.mole_fractions = fractions;
        }
        Ok(())
    }

    /// Molecular weight of species `k` from the declared element weights,
    /// or `None` for an index past the last species.
    pub fn molecular_weight(&self, k: usize) -> Option<f64> {
        let species = self.species.get(k)?;
        Some(
            species
                .composition
                .iter()
                .filter_map(|(el, n)| {
                    self.element_index(el).map(|i| n * self.elements[i].atomic_weight)
                })
                .sum(),
        )
    }

    fn composition_vector(&self, node: &Node, by_mass: bool) -> Result<Vec<f64>> {
        let mut values = vec![0.0; self.species.len()];
        for (name, amount) in parse_composition(node)? {
            let k = self.species_index(&name).ok_or_else(|| {
                Error::not_found(
                    ReferenceKind::Species,
                    name.as_str(),
                    format!("phase '{}'", self.name),
                    node.location(),
                )
            })?;
            if amount < 0.0 {
                return Err(Error::structural(
                    node.location(),
                    format!("negative fraction for species '{}'", name),
                ));
            }
            values[k] = if by_mass {
                let weight = self.molecular_weight(k).unwrap_or(0.0);
                if weight <= 0.0 {
                    return Err(Error::structural(
                        node.location(),
                        format!("species '{}' has no molecular weight", name),
                    ));
                }
                amount / weight
            } else {
                amount
            };
        }

        let total: f64 = values.iter().sum();
        if total <= 0.0 {
            return Err(Error::structural(node.location(), "composition sums to zero"));
        }
        values.iter_mut().for_each(|x| *x /= total);
        Ok(values)
    }

    fn check_mutable(&self) -> Result<()> {
        if self.initialized {
            return Err(self.invalid("phase is already initialized"));
        }
        Ok(())
    }

    fn invalid(&self, detail: impl Into<String>) -> Error {
        Error::invalid_phase(&self.name, detail)
    }
}

use super::{StandardStates, ThermoModel, concentration_basis};
use crate::error::{Error, Result};
use crate::model::node::Map;
use crate::model::species::Species;

const DEBYE_HUCKEL_MODELS: &[&str] = &[
    "dilute-limit",
    "B-dot-with-variable-a",
    "B-dot-with-common-a",
    "beta_ij",
    "Pitzer-with-beta_ij",
];

/// Debye-Hückel activity model for dilute electrolytes.
#[derive(Debug)]
pub struct DebyeHuckel {
    pub activity_model: String,
    /// Default ionic radius in m, when the activity data supplies one.
    pub default_ionic_radius: Option<f64>,
    states: StandardStates,
}

impl Default for DebyeHuckel {
    fn default() -> Self {
        Self {
            activity_model: "dilute-limit".to_string(),
            default_ionic_radius: None,
            states: StandardStates::new(),
        }
    }
}

impl ThermoModel for DebyeHuckel {
    fn kind(&self) -> &'static str {
        "Debye-Huckel"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        let Some(node) = phase.get("activity-data") else {
            return Ok(());
        };
        let data = node.as_map()?;
        let model = data.get_str_or("model", "dilute-limit")?;
        if !DEBYE_HUCKEL_MODELS.contains(&model) {
            return Err(Error::structural(
                data.location(),
                format!("unknown Debye-Huckel activity model '{}'", model),
            ));
        }
        self.activity_model = model.to_string();
        self.default_ionic_radius = data
            .get("default-ionic-radius")
            .map(|n| n.as_f64())
            .transpose()?;
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

/// Temperature dependence of Pitzer coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PitzerTemperatureModel {
    #[default]
    Constant,
    Linear,
    Complex,
}

/// Harvie-Møller-Weare (Pitzer) brine model.
#[derive(Debug, Default)]
pub struct HmwElectrolyte {
    pub temperature_model: PitzerTemperatureModel,
    /// Number of binary and ternary interaction entries read.
    pub interaction_count: usize,
    states: StandardStates,
}

impl ThermoModel for HmwElectrolyte {
    fn kind(&self) -> &'static str {
        "HMW-electrolyte"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        let data = phase.require("activity-data")?.as_map()?;
        self.temperature_model = match data.get_str_or("temperature-model", "constant")? {
            "constant" => PitzerTemperatureModel::Constant,
            "linear" => PitzerTemperatureModel::Linear,
            "complex" | "complex1" => PitzerTemperatureModel::Complex,
            other => {
                return Err(Error::structural(
                    data.location(),
                    format!("unknown Pitzer temperature model '{}'", other),
                ));
            }
        };
        self.interaction_count = match data.get("interactions") {
            Some(node) => node.as_map_list()?.len(),
            None => 0,
        };
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

/// Ideal dilute solution on the molality scale; species 0 is the solvent.
#[derive(Debug)]
pub struct IdealMolalSolution {
    pub basis: String,
    states: StandardStates,
}

impl Default for IdealMolalSolution {
    fn default() -> Self {
        Self {
            basis: "unity".to_string(),
            states: StandardStates::new(),
        }
    }
}

impl ThermoModel for IdealMolalSolution {
    fn kind(&self) -> &'static str {
        "ideal-molal-solution"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        self.basis = concentration_basis(phase)?;
        Ok(())
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        if species.is_empty() {
            return Err(Error::invalid_phase(self.kind(), "a solvent species is required"));
        }
        self.states.check_complete(species.len(), self.kind())
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
    use crate::thermo::IdealGasStandardState;

    fn map(text: &str) -> Map {
        Map::from_yaml_str(text, None).unwrap()
    }

    #[test]
    fn debye_huckel_activity_model_is_checked() {
        let mut model = DebyeHuckel::default();
        model.set_parameters(&Map::default(), &Map::default()).unwrap();
        assert_eq!(model.activity_model, "dilute-limit");

        model
            .set_parameters(
                &map("activity-data:\n  model: B-dot-with-common-a\n  default-ionic-radius: 3.0e-10\n"),
                &Map::default(),
            )
            .unwrap();
        assert_eq!(model.activity_model, "B-dot-with-common-a");
        assert_eq!(model.default_ionic_radius, Some(3.0e-10));

        assert!(model
            .set_parameters(&map("activity-data:\n  model: extended\n"), &Map::default())
            .is_err());
    }

    #[test]
    fn hmw_requires_activity_data() {
        let mut model = HmwElectrolyte::default();
        assert!(model.set_parameters(&Map::default(), &Map::default()).is_err());
        model
            .set_parameters(
                &map("activity-data:\n  temperature-model: complex\n  interactions:\n  - species: [Na+, Cl-]\n"),
                &Map::default(),
            )
            .unwrap();
        assert_eq!(model.temperature_model, PitzerTemperatureModel::Complex);
        assert_eq!(model.interaction_count, 1);
    }

    #[test]
    fn molal_solution_needs_solvent_and_standard_states() {
        let mut model = IdealMolalSolution::default();
        assert!(model.init_thermo(&[]).is_err());

        let water = Species::from_map(&map("name: H2O(l)\ncomposition: {H: 2, O: 1}\n")).unwrap();
        assert!(model.init_thermo(std::slice::from_ref(&water)).is_err());
        model
            .standard_states_mut()
            .unwrap()
            .install(0, Box::new(IdealGasStandardState));
        assert!(model.init_thermo(&[water]).is_ok());
    }
}

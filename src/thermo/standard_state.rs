use std::fmt;

use crate::error::{Error, Result};
use crate::model::node::Map;

/// A per-species standard-state sub-model.
pub trait StandardState: Send + Sync + fmt::Debug {
    /// Canonical registry key of this sub-model.
    fn kind(&self) -> &'static str;

    /// Reads parameters from one `equation-of-state` entry.
    fn set_parameters(&mut self, _node: &Map) -> Result<()> {
        Ok(())
    }
}

/// One standard-state slot per species, indexed like the phase's species.
#[derive(Debug, Default)]
pub struct StandardStates {
    slots: Vec<Option<Box<dyn StandardState>>>,
}

impl StandardStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, k: usize, model: Box<dyn StandardState>) {
        if self.slots.len() <= k {
            self.slots.resize_with(k + 1, || None);
        }
        self.slots[k] = Some(model);
    }

    pub fn get(&self, k: usize) -> Option<&dyn StandardState> {
        self.slots.get(k).and_then(|s| s.as_deref())
    }

    /// Index of the first of `n_species` slots left empty.
    pub fn first_missing(&self, n_species: usize) -> Option<usize> {
        (0..n_species).find(|&k| self.get(k).is_none())
    }

    /// Fails unless every species slot holds a sub-model.
    pub(crate) fn check_complete(&self, n_species: usize, model: &str) -> Result<()> {
        match self.first_missing(n_species) {
            Some(k) => Err(Error::InvalidPhase {
                phase: model.to_string(),
                detail: format!("no standard-state model installed for species {}", k),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct IdealGasStandardState;

impl StandardState for IdealGasStandardState {
    fn kind(&self) -> &'static str {
        "ideal-gas"
    }
}

/// Incompressible species with a constant molar volume.
#[derive(Debug, Default)]
pub struct ConstantVolume {
    pub molar_volume: f64,
}

impl StandardState for ConstantVolume {
    fn kind(&self) -> &'static str {
        "constant-incompressible"
    }

    fn set_parameters(&mut self, node: &Map) -> Result<()> {
        let volume = node.require("molar-volume")?;
        self.molar_volume = volume.as_f64()?;
        if self.molar_volume <= 0.0 {
            return Err(Error::structural(volume.location(), "molar-volume must be positive"));
        }
        Ok(())
    }
}

/// Cubic polynomial in temperature for density or molar volume.
#[derive(Debug)]
pub struct TemperaturePolynomial {
    kind: &'static str,
    pub coefficients: [f64; 4],
}

impl TemperaturePolynomial {
    pub fn density() -> Self {
        Self {
            kind: "density-temperature-polynomial",
            coefficients: [0.0; 4],
        }
    }

    pub fn molar_volume() -> Self {
        Self {
            kind: "molar-volume-temperature-polynomial",
            coefficients: [0.0; 4],
        }
    }
}

impl StandardState for TemperaturePolynomial {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn set_parameters(&mut self, node: &Map) -> Result<()> {
        let data = node.require("data")?;
        let values = data.as_f64_list()?;
        self.coefficients = values.as_slice().try_into().map_err(|_| {
            Error::structural(
                data.location(),
                format!("expected 4 polynomial coefficients, found {}", values.len()),
            )
        })?;
        Ok(())
    }
}

/// Helgeson-Kirkham-Flowers-Tanger aqueous species model.
#[derive(Debug, Default)]
pub struct Hkft {
    pub h0: f64,
    pub s0: f64,
    pub a: [f64; 4],
    pub c: [f64; 2],
    pub omega: f64,
}

impl StandardState for Hkft {
    fn kind(&self) -> &'static str {
        "HKFT"
    }

    fn set_parameters(&mut self, node: &Map) -> Result<()> {
        self.h0 = node.require("h0")?.as_f64()?;
        self.s0 = node.require("s0")?.as_f64()?;
        self.omega = node.require("omega")?.as_f64()?;

        let a = node.require("a")?;
        self.a = a.as_f64_list()?.as_slice().try_into().map_err(|_| {
            Error::structural(a.location(), "HKFT 'a' requires 4 coefficients")
        })?;
        let c = node.require("c")?;
        self.c = c.as_f64_list()?.as_slice().try_into().map_err(|_| {
            Error::structural(c.location(), "HKFT 'c' requires 2 coefficients")
        })?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct WaterStandardState;

impl StandardState for WaterStandardState {
    fn kind(&self) -> &'static str {
        "water"
    }
}

/// Ion standard state expressed through neutral-molecule multipliers.
#[derive(Debug, Default)]
pub struct IonsFromNeutralStandardState {
    pub multipliers: Vec<(String, f64)>,
    pub special_species: bool,
}

impl StandardState for IonsFromNeutralStandardState {
    fn kind(&self) -> &'static str {
        "ions-from-neutral"
    }

    fn set_parameters(&mut self, node: &Map) -> Result<()> {
        let multipliers = node.require("multipliers")?;
        self.multipliers = multipliers
            .as_map()?
            .iter()
            .map(|(name, value)| Ok((name.to_string(), value.as_f64()?)))
            .collect::<Result<_>>()?;
        if self.multipliers.is_empty() {
            return Err(Error::structural(
                multipliers.location(),
                "at least one neutral-molecule multiplier is required",
            ));
        }
        self.special_species = node.get_bool_or("special-species", false)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(text: &str) -> Map {
        Map::from_yaml_str(text, None).unwrap()
    }

    #[test]
    fn slots_grow_and_report_missing() {
        let mut states = StandardStates::new();
        states.install(1, Box::new(IdealGasStandardState));
        assert!(states.get(0).is_none());
        assert_eq!(states.get(1).unwrap().kind(), "ideal-gas");
        assert_eq!(states.first_missing(2), Some(0));
        states.install(0, Box::new(WaterStandardState));
        assert_eq!(states.first_missing(2), None);
        assert!(states.check_complete(3, "Margules").is_err());
    }

    #[test]
    fn constant_volume_requires_positive_volume() {
        let mut ss = ConstantVolume::default();
        ss.set_parameters(&map("model: constant-incompressible\nmolar-volume: 0.0135\n"))
            .unwrap();
        assert_eq!(ss.molar_volume, 0.0135);
        assert!(ss.set_parameters(&map("molar-volume: -1\n")).is_err());
        assert!(ss.set_parameters(&map("model: constant-incompressible\n")).is_err());
    }

    #[test]
    fn polynomial_requires_four_coefficients() {
        let mut ss = TemperaturePolynomial::density();
        ss.set_parameters(&map("data: [1.0, 2.0, 3.0, 4]\n")).unwrap();
        assert_eq!(ss.coefficients, [1.0, 2.0, 3.0, 4.0]);
        assert!(ss.set_parameters(&map("data: [1.0, 2.0]\n")).is_err());
        assert_eq!(TemperaturePolynomial::molar_volume().kind(), "molar-volume-temperature-polynomial");
    }

    #[test]
    fn hkft_reads_all_coefficients() {
        let mut ss = Hkft::default();
        ss.set_parameters(&map(
            "h0: -57433\ns0: 13.96\na: [0.1839, -228.5, 3.256, -27260]\nc: [18.18, -29810]\nomega: 33060\n",
        ))
        .unwrap();
        assert_eq!(ss.c, [18.18, -29810.0]);
        assert!(ss.set_parameters(&map("h0: 1\ns0: 1\na: [1]\nc: [1, 2]\nomega: 1\n")).is_err());
    }

    #[test]
    fn ions_from_neutral_reads_multipliers() {
        let mut ss = IonsFromNeutralStandardState::default();
        ss.set_parameters(&map("multipliers: {KCl(L): 1.2}\nspecial-species: true\n"))
            .unwrap();
        assert_eq!(ss.multipliers, vec![("KCl(L)".to_string(), 1.2)]);
        assert!(ss.special_species);
        assert!(ss.set_parameters(&map("multipliers: {}\n")).is_err());
    }
}

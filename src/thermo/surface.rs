use super::{ThermoModel, positive};
use crate::error::{Error, Result};
use crate::model::node::Map;
use crate::model::species::Species;

/// Surface or edge phase characterised by its site density.
#[derive(Debug)]
pub struct Surface {
    kind: &'static str,
    /// Site density in kmol/m² (surface) or kmol/m (edge).
    pub site_density: Option<f64>,
}

impl Surface {
    pub fn surface() -> Self {
        Self {
            kind: "ideal-surface",
            site_density: None,
        }
    }

    pub fn edge() -> Self {
        Self {
            kind: "edge",
            site_density: None,
        }
    }
}

impl ThermoModel for Surface {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        self.site_density = Some(positive(phase, "site-density")?);
        Ok(())
    }

    fn init_thermo(&mut self, species: &[Species]) -> Result<()> {
        if self.site_density.is_none() {
            return Err(Error::InvalidPhase {
                phase: self.kind.to_string(),
                detail: "site density was never set".to_string(),
            });
        }
        for sp in species {
            if sp.input.has_key("sites") && sp.input.require("sites")?.as_f64()? <= 0.0 {
                return Err(Error::structural(
                    sp.input.location(),
                    format!("species '{}' must occupy a positive number of sites", sp.name),
                ));
            }
        }
        Ok(())
    }
}

/// Free-electron metal phase.
#[derive(Debug, Default)]
pub struct ElectronCloud {
    /// Density in kg/m³.
    pub density: f64,
}

impl ThermoModel for ElectronCloud {
    fn kind(&self) -> &'static str {
        "electron-cloud"
    }

    fn set_parameters(&mut self, phase: &Map, _root: &Map) -> Result<()> {
        self.density = positive(phase, "density")?;
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
    fn surface_requires_positive_site_density() {
        let mut surf = Surface::surface();
        assert!(surf.init_thermo(&[]).is_err());
        assert!(surf.set_parameters(&map("site-density: 0\n"), &Map::default()).is_err());
        surf.set_parameters(&map("site-density: 2.7e-9\n"), &Map::default())
            .unwrap();
        assert!(surf.init_thermo(&[]).is_ok());
        assert_eq!(Surface::edge().kind(), "edge");
    }

    #[test]
    fn metal_requires_density() {
        let mut metal = ElectronCloud::default();
        assert!(metal.set_parameters(&Map::default(), &Map::default()).is_err());
        metal.set_parameters(&map("density: 9.0e3\n"), &Map::default()).unwrap();
        assert_eq!(metal.density, 9.0e3);
    }
}

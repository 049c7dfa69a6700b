use super::node::Map;
use crate::error::{Error, Result};

/// A species definition resolved from a species source table.
///
/// Only the name, elemental composition and charge are interpreted here.
/// The full input map is kept so later stages can inspect nested
/// configuration such as `equation-of-state`.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub name: String,
    /// Element symbol and amount, in document order.
    pub composition: Vec<(String, f64)>,
    pub charge: f64,
    pub input: Map,
}

impl Species {
    pub fn from_map(node: &Map) -> Result<Self> {
        let name = node.require("name")?.as_str()?.to_string();

        let comp_node = node.require("composition")?;
        let mut composition = Vec::new();
        for (element, amount) in comp_node.as_map()?.iter() {
            let amount = amount.as_f64()?;
            if amount < 0.0 {
                return Err(Error::structural(
                    comp_node.location(),
                    format!("negative amount of '{}' in species '{}'", element, name),
                ));
            }
            composition.push((element.to_string(), amount));
        }

        let charge = match node.get("charge") {
            Some(charge) => charge.as_f64()?,
            None => -composition
                .iter()
                .find(|(el, _)| el == "E")
                .map_or(0.0, |(_, n)| *n),
        };

        Ok(Self {
            name,
            composition,
            charge,
            input: node.clone(),
        })
    }

    pub fn amount_of(&self, element: &str) -> f64 {
        self.composition
            .iter()
            .find(|(el, _)| el == element)
            .map_or(0.0, |(_, n)| *n)
    }

    /// Compact formula string such as `H2O1`, in composition order.
    pub fn formula(&self) -> String {
        self.composition
            .iter()
            .filter(|(_, n)| *n > 0.0)
            .map(|(el, n)| {
                if n.fract() == 0.0 {
                    format!("{}{}", el, *n as i64)
                } else {
                    format!("{}{}", el, n)
                }
            })
            .collect()
    }
}

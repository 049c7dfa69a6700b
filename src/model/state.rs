use super::node::{Node, Value};
use crate::error::{Error, Result};

/// Standard atmospheric pressure in Pa.
pub const ONE_ATM: f64 = 101_325.0;

/// Temperature a phase is left at when no explicit state is given, in K.
pub const DEFAULT_TEMPERATURE: f64 = 298.15;

/// Temperature, pressure and composition of a phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoState {
    /// Temperature in K.
    pub temperature: f64,
    /// Pressure in Pa.
    pub pressure: f64,
    /// Mole fractions in species index order.
    pub mole_fractions: Vec<f64>,
}

impl Default for ThermoState {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            pressure: ONE_ATM,
            mole_fractions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dimension {
    Temperature,
    Pressure,
}

impl Dimension {
    fn name(self) -> &'static str {
        match self {
            Dimension::Temperature => "temperature",
            Dimension::Pressure => "pressure",
        }
    }
}

/// Reads a number in SI units, or a string such as `"1 bar"` / `"300 K"`.
pub(crate) fn parse_quantity(node: &Node, dimension: Dimension) -> Result<f64> {
    match node.value() {
        Value::Integer(_) | Value::Float(_) => node.as_f64(),
        Value::String(text) => {
            let mut parts = text.split_whitespace();
            let number = parts
                .next()
                .and_then(|n| n.parse::<f64>().ok())
                .ok_or_else(|| {
                    Error::structural(node.location(), format!("invalid quantity '{}'", text))
                })?;
            let unit = parts.next().unwrap_or("");
            if parts.next().is_some() {
                return Err(Error::structural(
                    node.location(),
                    format!("invalid quantity '{}'", text),
                ));
            }
            let factor = unit_factor(unit, dimension).ok_or_else(|| {
                Error::structural(
                    node.location(),
                    format!("unsupported {} unit '{}'", dimension.name(), unit),
                )
            })?;
            Ok(number * factor)
        }
        _ => Err(Error::structural(
            node.location(),
            format!("expected a number or quantity string, found {}", node.type_name()),
        )),
    }
}

fn unit_factor(unit: &str, dimension: Dimension) -> Option<f64> {
    match (dimension, unit) {
        (_, "") => Some(1.0),
        (Dimension::Temperature, "K") => Some(1.0),
        (Dimension::Pressure, "Pa") => Some(1.0),
        (Dimension::Pressure, "kPa") => Some(1.0e3),
        (Dimension::Pressure, "MPa") => Some(1.0e6),
        (Dimension::Pressure, "bar") => Some(1.0e5),
        (Dimension::Pressure, "atm") => Some(ONE_ATM),
        _ => None,
    }
}

/// Reads a composition given as a map or as a `"A:1, B:2"` string.
pub(crate) fn parse_composition(node: &Node) -> Result<Vec<(String, f64)>> {
    match node.value() {
        Value::Map(map) => map
            .iter()
            .map(|(name, amount)| Ok((name.to_string(), amount.as_f64()?)))
            .collect(),
        Value::String(text) => text
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                let (name, amount) = item.rsplit_once(':').ok_or_else(|| {
                    Error::structural(
                        node.location(),
                        format!("composition item '{}' is not of the form NAME:VALUE", item),
                    )
                })?;
                let amount = amount.trim().parse::<f64>().map_err(|_| {
                    Error::structural(
                        node.location(),
                        format!("invalid amount in composition item '{}'", item),
                    )
                })?;
                Ok((name.trim().to_string(), amount))
            })
            .collect(),
        _ => Err(Error::structural(
            node.location(),
            format!("expected a composition map or string, found {}", node.type_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::Map;

    fn node(text: &str) -> Node {
        Map::from_yaml_str(&format!("v: {}", text), None)
            .unwrap()
            .require("v")
            .unwrap()
            .clone()
    }

    #[test]
    fn quantities_with_units() {
        assert_eq!(parse_quantity(&node("300"), Dimension::Temperature).unwrap(), 300.0);
        assert_eq!(parse_quantity(&node("'300 K'"), Dimension::Temperature).unwrap(), 300.0);
        assert_eq!(parse_quantity(&node("'2 bar'"), Dimension::Pressure).unwrap(), 2.0e5);
        assert_eq!(parse_quantity(&node("'1 atm'"), Dimension::Pressure).unwrap(), ONE_ATM);
        assert!(parse_quantity(&node("'1 atm'"), Dimension::Temperature).is_err());
        assert!(parse_quantity(&node("'hot'"), Dimension::Temperature).is_err());
    }

    #[test]
    fn composition_from_string_and_map() {
        let from_str = parse_composition(&node("'H2:1.0, O2: 0.5'")).unwrap();
        assert_eq!(from_str, vec![("H2".into(), 1.0), ("O2".into(), 0.5)]);
        let from_map = parse_composition(&node("{H2: 1, O2: 0.5}")).unwrap();
        assert_eq!(from_map, from_str);
        assert!(parse_composition(&node("'H2=1'")).is_err());
    }
}

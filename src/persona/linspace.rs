//! Earnings grids: evaluate a persona over a range of gross wages.
//!
//! A grid holds one parameter per person, either a range or a constant, and a
//! number of points. Instantiating a persona with a grid creates `n_points`
//! copies of the household, the `i`-th copy earning the `i`-th grid value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::broadcast::upsert_qname_data;
use crate::data::Column;
use crate::error::{Error, Result};

/// Qualified name the grid values are written to.
pub const BRUTTOLOHN_M: &str = "einnahmen__bruttolohn_m";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinspaceRange {
    pub bottom: f64,
    pub top: f64,
}

/// Grid parameter for one person.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinspaceParameter {
    Range(LinspaceRange),
    Constant(f64),
}

impl LinspaceParameter {
    pub fn range(bottom: f64, top: f64) -> Self {
        LinspaceParameter::Range(LinspaceRange { bottom, top })
    }

    fn values(&self, n_points: usize) -> Vec<f64> {
        match self {
            LinspaceParameter::Range(r) => linspace(r.bottom, r.top, n_points),
            LinspaceParameter::Constant(v) => vec![*v; n_points],
        }
    }
}

impl From<f64> for LinspaceParameter {
    fn from(value: f64) -> Self {
        LinspaceParameter::Constant(value)
    }
}

impl From<LinspaceRange> for LinspaceParameter {
    fn from(range: LinspaceRange) -> Self {
        LinspaceParameter::Range(range)
    }
}

impl fmt::Display for LinspaceParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinspaceParameter::Range(r) => write!(f, "{}:{}", r.bottom, r.top),
            LinspaceParameter::Constant(v) => write!(f, "{}", v),
        }
    }
}

/// Parses `BOTTOM:TOP` as a range and a plain number as a constant.
impl FromStr for LinspaceParameter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let number = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", v.trim()))
        };
        match s.split_once(':') {
            Some((bottom, top)) => Ok(LinspaceParameter::range(number(bottom)?, number(top)?)),
            None => Ok(LinspaceParameter::Constant(number(s)?)),
        }
    }
}

/// `n` evenly spaced values from `bottom` to `top`, both included.
pub fn linspace(bottom: f64, top: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![bottom],
        _ => {
            let step = (top - bottom) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { top } else { bottom + step * i as f64 })
                .collect()
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Grid
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinspaceGrid {
    /// One parameter per p_id, in p_id order.
    pub parameters: Vec<LinspaceParameter>,
    pub n_points: usize,
}

impl LinspaceGrid {
    pub fn new(parameters: Vec<LinspaceParameter>, n_points: usize) -> Self {
        Self {
            parameters,
            n_points,
        }
    }

    /// Check the grid against a persona of `persona_size` persons.
    pub fn validate(&self, persona_size: usize) -> Result<()> {
        if self.parameters.len() != persona_size {
            return Err(Error::invalid_grid(format!(
                "The number of p_ids in the linspace grid must match the number of p_ids in \
                 the persona. The number of p_ids in the linspace grid is {}, but the number \
                 of p_ids in the persona is {}.",
                self.parameters.len(),
                persona_size
            )));
        }
        for param in &self.parameters {
            if let LinspaceParameter::Range(r) = param {
                if r.bottom > r.top {
                    return Err(Error::invalid_grid(
                        "The lower bound of the linspace must be less than the upper bound.",
                    ));
                }
            }
        }
        if self.n_points == 0 {
            return Err(Error::invalid_grid(
                "The number of points in the linspace must be greater than 0.",
            ));
        }
        Ok(())
    }

    /// Grid values interleaved per household: `p0[0], p1[0], ..., p0[1], p1[1], ...`.
    pub fn values(&self) -> Vec<f64> {
        let per_person: Vec<Vec<f64>> = self
            .parameters
            .iter()
            .map(|p| p.values(self.n_points))
            .collect();
        (0..self.n_points)
            .flat_map(|i| per_person.iter().map(move |values| values[i]))
            .collect()
    }

    /// Upsert the grid values as gross monthly wages into flat input data.
    pub fn upsert_into(
        &self,
        data: &BTreeMap<String, Column>,
    ) -> Result<BTreeMap<String, Column>> {
        let to_upsert = BTreeMap::from([(BRUTTOLOHN_M.to_string(), Column::Float(self.values()))]);
        upsert_qname_data(data, &to_upsert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_includes_both_ends() {
        assert_eq!(linspace(0.0, 10.0, 3), vec![0.0, 5.0, 10.0]);
        assert_eq!(linspace(0.0, 1.0, 1), vec![0.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 2.0, 2), vec![2.0, 2.0]);
    }

    #[test]
    fn test_parameter_from_str() {
        assert_eq!(
            "0:10000".parse::<LinspaceParameter>().unwrap(),
            LinspaceParameter::range(0.0, 10000.0)
        );
        assert_eq!(
            "2500".parse::<LinspaceParameter>().unwrap(),
            LinspaceParameter::Constant(2500.0)
        );
        assert!("a:b".parse::<LinspaceParameter>().is_err());
    }

    #[test]
    fn test_values_are_interleaved() {
        let grid = LinspaceGrid::new(
            vec![
                LinspaceParameter::range(0.0, 100.0),
                LinspaceParameter::Constant(7.0),
            ],
            3,
        );
        assert_eq!(grid.values(), vec![0.0, 7.0, 50.0, 7.0, 100.0, 7.0]);
    }

    #[test]
    fn test_validate() {
        let grid = LinspaceGrid::new(vec![LinspaceParameter::Constant(0.0)], 5);
        assert!(grid.validate(1).is_ok());

        let err = grid.validate(3).unwrap_err();
        assert!(err.to_string().contains("number of p_ids in the linspace grid is 1"));

        let grid = LinspaceGrid::new(vec![LinspaceParameter::range(10.0, 0.0)], 5);
        assert!(grid
            .validate(1)
            .unwrap_err()
            .to_string()
            .contains("lower bound"));

        let grid = LinspaceGrid::new(vec![LinspaceParameter::Constant(0.0)], 0);
        assert!(grid
            .validate(1)
            .unwrap_err()
            .to_string()
            .contains("greater than 0"));
    }

    #[test]
    fn test_upsert_into_broadcasts() {
        let data = BTreeMap::from([
            ("p_id".to_string(), Column::int([0, 1])),
            ("hh_id".to_string(), Column::int([0, 0])),
            (BRUTTOLOHN_M.to_string(), Column::int([1000, 0])),
        ]);
        let grid = LinspaceGrid::new(
            vec![LinspaceParameter::range(0.0, 2000.0), LinspaceParameter::Constant(0.0)],
            3,
        );
        let out = grid.upsert_into(&data).unwrap();

        assert_eq!(out["p_id"], Column::int(0..6));
        assert_eq!(out["hh_id"], Column::int([0, 0, 1, 1, 2, 2]));
        assert_eq!(
            out[BRUTTOLOHN_M],
            Column::float([0.0, 0.0, 1000.0, 0.0, 2000.0, 0.0])
        );
    }
}

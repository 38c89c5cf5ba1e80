use ndarray::Array1;
use std::collections::{BTreeMap, HashMap};

/// One keyword argument as handed over by a caller
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Scalar(f64),
    Vector(Array1<f64>),
    Table(BTreeMap<String, f64>),
}

impl Argument {
    pub fn kind(&self) -> &'static str {
        match self {
            Argument::Scalar(_) => "scalar",
            Argument::Vector(_) => "vector",
            Argument::Table(_) => "table",
        }
    }

    /// Numeric values in checking order; tables are visited in key order
    pub fn values(&self) -> Vec<f64> {
        match self {
            Argument::Scalar(value) => vec![*value],
            Argument::Vector(values) => values.to_vec(),
            Argument::Table(table) => table.values().copied().collect(),
        }
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Scalar(value)
    }
}

impl From<Array1<f64>> for Argument {
    fn from(value: Array1<f64>) -> Self {
        Argument::Vector(value)
    }
}

impl From<Vec<f64>> for Argument {
    fn from(value: Vec<f64>) -> Self {
        Argument::Vector(Array1::from_vec(value))
    }
}

impl From<BTreeMap<String, f64>> for Argument {
    fn from(value: BTreeMap<String, f64>) -> Self {
        Argument::Table(value)
    }
}

impl From<HashMap<String, f64>> for Argument {
    fn from(value: HashMap<String, f64>) -> Self {
        Argument::Table(value.into_iter().collect())
    }
}

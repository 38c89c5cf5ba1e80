use crate::argument::Argument;
use crate::errors::Error;
use crate::predicate::Predicate;
use log::debug;
use ndarray::Array1;
use std::collections::{BTreeMap, HashMap};

/// Declarative table of the arguments a routine expects, one predicate per argument
///
/// # Examples
///
/// ```
/// use argument_contract::{Argument, Contract};
/// use std::collections::HashMap;
///
/// let contract: Contract = Contract::new(&[("Eb", "x>0"), ("AM", "x>0")]).unwrap();
///
/// let mut kwargs: HashMap<String, Argument> = HashMap::new();
/// kwargs.insert("Eb".to_string(), Argument::from(vec![800.0, 900.0, 1000.0]));
/// kwargs.insert("AM".to_string(), Argument::Scalar(1.5));
///
/// let parsed = contract.parse(&kwargs).unwrap();
/// assert_eq!(parsed.vector("AM").unwrap().len(), 3); // scalar broadcast to the vector length
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    entries: Vec<(String, Predicate)>,
}

impl Contract {
    pub fn new(declarations: &[(&str, &str)]) -> Result<Self, Error> {
        let mut entries: Vec<(String, Predicate)> = Vec::with_capacity(declarations.len());
        for (name, predicate_text) in declarations {
            let predicate: Predicate = Predicate::parse(predicate_text)?;
            entries.push((name.to_string(), predicate));
        }

        return Ok(Contract { entries });
    }

    pub fn names(&self) -> Vec<&str> {
        return self.entries.iter().map(|(name, _)| name.as_str()).collect();
    }

    pub fn predicate(&self, name: &str) -> Option<&Predicate> {
        return self.entries.iter().find(|(entry_name, _)| entry_name == name).map(|(_, predicate)| predicate);
    }

    /// Check `kwargs` against the contract and normalise it
    ///
    /// Steps, each stopping at the first failure in contract order:
    /// 1. every declared argument must be present
    /// 2. every numeric value must satisfy its predicate
    /// 3. scalars are broadcast to the length of the longest vector (length 1 when there are no vectors)
    ///
    /// Vectors of unequal length are passed through untouched; aligning them is the consumer's job.
    /// Arguments not named in the contract are dropped.
    pub fn parse(&self, kwargs: &HashMap<String, Argument>) -> Result<ParsedArguments, Error> {
        for (name, _) in &self.entries {
            if !kwargs.contains_key(name) {
                return Err(Error::MissingArgument { name: name.to_owned() });
            }
        }

        for (name, predicate) in &self.entries {
            if predicate.is_unconstrained() {
                continue;
            }
            let values: Vec<f64> = kwargs[name].values();
            for (index, value) in values.into_iter().enumerate() {
                if !predicate.accepts(value) {
                    return Err(Error::InvalidDomain {
                        name: name.to_owned(),
                        predicate: predicate.as_str().to_string(),
                        index,
                        value,
                    });
                }
            }
        }

        for name in kwargs.keys() {
            if self.predicate(name).is_none() {
                debug!("argument `{}` is not part of the contract and is ignored", name);
            }
        }

        let n_samples: usize = self
            .entries
            .iter()
            .filter_map(|(name, _)| match &kwargs[name] {
                Argument::Vector(values) => Some(values.len()),
                _ => None,
            })
            .max()
            .unwrap_or(1);

        let mut arguments: HashMap<String, Argument> = HashMap::with_capacity(self.entries.len());
        for (name, _) in &self.entries {
            let normalised: Argument = match &kwargs[name] {
                Argument::Scalar(value) => Argument::Vector(Array1::from_elem(n_samples, *value)),
                other => other.clone(),
            };
            arguments.insert(name.to_owned(), normalised);
        }

        return Ok(ParsedArguments { arguments, n_samples });
    }
}

/// Arguments which passed a `Contract`, with scalars already broadcast
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArguments {
    arguments: HashMap<String, Argument>,
    n_samples: usize,
}

impl ParsedArguments {
    pub fn n_samples(&self) -> usize {
        return self.n_samples;
    }

    pub fn vector(&self, name: &str) -> Result<&Array1<f64>, Error> {
        match self.arguments.get(name) {
            Some(Argument::Vector(values)) => Ok(values),
            Some(other) => Err(Error::WrongKind {
                name: name.to_string(),
                expected: "vector",
                found: other.kind(),
            }),
            None => Err(Error::MissingArgument { name: name.to_string() }),
        }
    }

    pub fn table(&self, name: &str) -> Result<&BTreeMap<String, f64>, Error> {
        match self.arguments.get(name) {
            Some(Argument::Table(table)) => Ok(table),
            Some(other) => Err(Error::WrongKind {
                name: name.to_string(),
                expected: "table",
                found: other.kind(),
            }),
            None => Err(Error::MissingArgument { name: name.to_string() }),
        }
    }
}

#[cfg(test)]
fn irradiance_contract() -> Contract {
    return Contract::new(&[("Module", ""), ("Eb", "x>0"), ("Tcell", "x>-273.15"), ("AOI", "x>=0 & x<=90")]).expect("valid contract");
}

#[cfg(test)]
fn irradiance_kwargs() -> HashMap<String, Argument> {
    let mut module: BTreeMap<String, f64> = BTreeMap::new();
    module.insert("FD".to_string(), 1.0);
    module.insert("Isco".to_string(), -8.0); // not checked, the predicate is empty

    let mut kwargs: HashMap<String, Argument> = HashMap::new();
    kwargs.insert("Module".to_string(), Argument::Table(module));
    kwargs.insert("Eb".to_string(), Argument::Vector(Array1::from_vec(vec![100.0, 500.0, 900.0, 50.0])));
    kwargs.insert("Tcell".to_string(), Argument::Scalar(-5.0));
    kwargs.insert("AOI".to_string(), Argument::Vector(Array1::from_vec(vec![10.0, 20.0, 30.0, 89.0])));
    return kwargs;
}

#[test]
fn test_contract_broadcasts_scalars() {
    let parsed: ParsedArguments = irradiance_contract().parse(&irradiance_kwargs()).expect("valid arguments");

    assert_eq!(parsed.n_samples(), 4);
    assert_eq!(parsed.vector("Tcell").expect("vector"), &Array1::from_elem(4, -5.0));
    assert_eq!(parsed.vector("Eb").expect("vector"), &Array1::from_vec(vec![100.0, 500.0, 900.0, 50.0]));
    assert_eq!(parsed.table("Module").expect("table")["Isco"], -8.0);
}

#[test]
fn test_contract_scalars_only() {
    let contract: Contract = Contract::new(&[("Eb", "x>0"), ("AM", "x>0")]).expect("valid contract");
    let mut kwargs: HashMap<String, Argument> = HashMap::new();
    kwargs.insert("Eb".to_string(), Argument::Scalar(1000.0));
    kwargs.insert("AM".to_string(), Argument::Scalar(1.5));

    let parsed: ParsedArguments = contract.parse(&kwargs).expect("valid arguments");
    assert_eq!(parsed.n_samples(), 1);
    assert_eq!(parsed.vector("AM").expect("vector"), &Array1::from_vec(vec![1.5]));
}

#[test]
fn test_contract_missing_argument() {
    let mut kwargs: HashMap<String, Argument> = irradiance_kwargs();
    kwargs.remove("Tcell");
    kwargs.remove("AOI");

    let error: Error = irradiance_contract().parse(&kwargs).expect_err("missing arguments");
    assert_eq!(error, Error::MissingArgument { name: "Tcell".to_string() }); // first in contract order
}

#[test]
fn test_contract_invalid_domain_names_first_failure() {
    let mut kwargs: HashMap<String, Argument> = irradiance_kwargs();
    kwargs.insert("Eb".to_string(), Argument::from(vec![100.0, 0.0, -20.0, 50.0]));

    let error: Error = irradiance_contract().parse(&kwargs).expect_err("zero irradiance");
    assert_eq!(
        error,
        Error::InvalidDomain {
            name: "Eb".to_string(),
            predicate: "x>0".to_string(),
            index: 1,
            value: 0.0,
        }
    );
    assert_eq!(error.to_string(), "argument `Eb` fails `x>0` at index 1: value = 0");
}

#[test]
fn test_contract_rejects_nan() {
    let mut kwargs: HashMap<String, Argument> = irradiance_kwargs();
    kwargs.insert("AOI".to_string(), Argument::from(vec![10.0, 20.0, f64::NAN, 89.0]));

    let error: Error = irradiance_contract().parse(&kwargs).expect_err("NaN angle");
    match error {
        Error::InvalidDomain { name, index, value, .. } => {
            assert_eq!(name, "AOI");
            assert_eq!(index, 2);
            assert!(value.is_nan());
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_contract_leaves_unequal_vectors_alone() {
    let mut kwargs: HashMap<String, Argument> = irradiance_kwargs();
    kwargs.insert("AOI".to_string(), Argument::from(vec![10.0, 20.0]));
    kwargs.insert("Extra".to_string(), Argument::Scalar(3.0));

    let parsed: ParsedArguments = irradiance_contract().parse(&kwargs).expect("valid arguments");
    assert_eq!(parsed.n_samples(), 4);
    assert_eq!(parsed.vector("AOI").expect("vector").len(), 2);
    assert_eq!(parsed.vector("Tcell").expect("vector").len(), 4);
    assert!(matches!(parsed.vector("Extra"), Err(Error::MissingArgument { .. })));
}

#[test]
fn test_contract_wrong_kind() {
    let parsed: ParsedArguments = irradiance_contract().parse(&irradiance_kwargs()).expect("valid arguments");

    let error: Error = parsed.vector("Module").expect_err("a table is not a vector");
    assert_eq!(
        error,
        Error::WrongKind {
            name: "Module".to_string(),
            expected: "vector",
            found: "table",
        }
    );
    assert!(matches!(parsed.table("Eb"), Err(Error::WrongKind { found: "vector", .. })));
}

#[test]
fn test_contract_with_malformed_predicate() {
    let result: Result<Contract, Error> = Contract::new(&[("Eb", "x>0"), ("AM", "x => 0")]);
    assert!(matches!(result, Err(Error::InvalidPredicate { .. })));
}

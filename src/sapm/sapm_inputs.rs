use crate::errors::Error;
use argument_contract::{Contract, ParsedArguments};
use ndarray::Array1;

/// Declared domain of every argument of `sapm_from_arguments`
///
/// The `Tcell > 0` constraint is applied to a temperature in °C, which rejects sub-zero operation.
/// It is kept as declared; callers needing sub-zero cell temperatures can build `SapmInputs` directly.
pub const SAPM_CONTRACT: [(&str, &str); 6] = [("Module", ""), ("Eb", "x>0"), ("Ediff", "x>0"), ("Tcell", "x>0"), ("AM", "x>0"), ("AOI", "x>0")];

pub fn sapm_contract() -> Result<Contract, Error> {
    let contract: Contract = Contract::new(&SAPM_CONTRACT)?;
    return Ok(contract);
}

/// Aligned observations for a SAPM evaluation, one element per sample
#[derive(Debug, Clone, PartialEq)]
pub struct SapmInputs {
    pub eb: Array1<f64>,    // beam irradiance on the module, W/m^2
    pub ediff: Array1<f64>, // diffuse irradiance on the module, W/m^2
    pub tcell: Array1<f64>, // cell temperature, °C
    pub am: Array1<f64>,    // absolute air mass
    pub aoi: Array1<f64>,   // angle of incidence, degrees
    pub index: Option<Array1<i64>>,
}

impl SapmInputs {
    pub fn new(eb: Array1<f64>, ediff: Array1<f64>, tcell: Array1<f64>, am: Array1<f64>, aoi: Array1<f64>) -> Self {
        Self {
            eb,
            ediff,
            tcell,
            am,
            aoi,
            index: None,
        }
    }

    /// Attach a label to every sample (e.g. a timestamp); labels are carried to the result untouched
    pub fn with_index(mut self, index: Array1<i64>) -> Self {
        self.index = Some(index);
        self
    }

    /// Collect the observations from arguments which passed `SAPM_CONTRACT`
    pub fn from_arguments(arguments: &ParsedArguments) -> Result<Self, Error> {
        let eb: Array1<f64> = arguments.vector("Eb")?.to_owned();
        let ediff: Array1<f64> = arguments.vector("Ediff")?.to_owned();
        let tcell: Array1<f64> = arguments.vector("Tcell")?.to_owned();
        let am: Array1<f64> = arguments.vector("AM")?.to_owned();
        let aoi: Array1<f64> = arguments.vector("AOI")?.to_owned();

        return Ok(SapmInputs::new(eb, ediff, tcell, am, aoi));
    }

    pub fn len(&self) -> usize {
        return self.eb.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.eb.is_empty();
    }

    /// Every observation, and the index when present, must have the length of `eb`
    pub fn check_shapes(&self) -> Result<(), Error> {
        let n_samples: usize = self.eb.len();

        let lengths: [(&'static str, usize); 4] = [("Ediff", self.ediff.len()), ("Tcell", self.tcell.len()), ("AM", self.am.len()), ("AOI", self.aoi.len())];
        for (argument, length) in lengths {
            if length != n_samples {
                return Err(Error::ShapeMismatch {
                    argument,
                    expected: n_samples,
                    found: length,
                });
            }
        }

        if let Some(index) = &self.index {
            if index.len() != n_samples {
                return Err(Error::ShapeMismatch {
                    argument: "index",
                    expected: n_samples,
                    found: index.len(),
                });
            }
        }

        return Ok(());
    }

    /// The attached index, or `0..n` when none was given
    pub fn index_or_default(&self) -> Array1<i64> {
        match &self.index {
            Some(index) => index.to_owned(),
            None => Array1::from_iter(0..self.len() as i64),
        }
    }
}

#[test]
fn test_sapm_inputs_shape_mismatch() {
    let inputs: SapmInputs = SapmInputs::new(
        Array1::from_vec(vec![800.0, 900.0, 1000.0]),
        Array1::from_vec(vec![100.0, 100.0, 100.0]),
        Array1::from_vec(vec![25.0, 30.0, 35.0]),
        Array1::from_vec(vec![1.5, 1.5]),
        Array1::from_vec(vec![10.0]),
    );

    let error: Error = inputs.check_shapes().expect_err("AM is too short");
    assert_eq!(
        error,
        Error::ShapeMismatch {
            argument: "AM",
            expected: 3,
            found: 2,
        }
    );
    assert_eq!(error.to_string(), "`AM` has length 2 but `Eb` has length 3");
}

#[test]
fn test_sapm_inputs_index() {
    let inputs: SapmInputs = SapmInputs::new(
        Array1::from_vec(vec![800.0, 900.0]),
        Array1::from_vec(vec![100.0, 100.0]),
        Array1::from_vec(vec![25.0, 30.0]),
        Array1::from_vec(vec![1.5, 1.5]),
        Array1::from_vec(vec![10.0, 20.0]),
    );
    assert_eq!(inputs.index_or_default(), Array1::from_vec(vec![0, 1]));

    let labelled: SapmInputs = inputs.clone().with_index(Array1::from_vec(vec![1_700_000_000, 1_699_996_400]));
    assert!(labelled.check_shapes().is_ok());
    assert_eq!(labelled.index_or_default(), Array1::from_vec(vec![1_700_000_000, 1_699_996_400]));

    let mislabelled: SapmInputs = inputs.with_index(Array1::from_vec(vec![5]));
    assert_eq!(
        mislabelled.check_shapes(),
        Err(Error::ShapeMismatch {
            argument: "index",
            expected: 2,
            found: 1,
        })
    );
}

#[test]
fn test_sapm_contract_is_well_formed() {
    let contract: Contract = sapm_contract().expect("literal predicates parse");
    assert_eq!(contract.names(), vec!["Module", "Eb", "Ediff", "Tcell", "AM", "AOI"]);
    assert!(contract.predicate("Module").expect("declared").is_unconstrained());
    assert!(!contract.predicate("Tcell").expect("declared").accepts(-5.0));
}

use super::performance_result::PerformanceResult;
use super::evaluator::sapm_from_arguments_with_index;
use argument_contract::Argument;
use ndarray::Array1;
use numpy::IntoPyArray; // converting to python data types
use numpy::PyArrayMethods; // used in to convert python data into ndarray
use numpy::PyArray1;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyFloat, PyInt};
use std::collections::HashMap;

/// Python entry point, `sapm_rs.sapm(module, eb, ediff, tcell, am, aoi, index=None)`
///
/// Observations are 1D float arrays or floats; floats are broadcast. Returns a dict of 1D arrays
/// with keys `Isc, Imp, Voc, Vmp, Pmp, Ix, Ixx`, plus `Ee` and `index`.
/// Any failure is raised as `ValueError`, with the message of the Rust error.
#[pyfunction]
#[pyo3(name = "sapm", signature = (module, eb, ediff, tcell, am, aoi, index=None))]
pub fn sapm_py<'py>(
    py: Python<'py>,
    module: HashMap<String, f64>,
    eb: &Bound<'py, PyAny>,
    ediff: &Bound<'py, PyAny>,
    tcell: &Bound<'py, PyAny>,
    am: &Bound<'py, PyAny>,
    aoi: &Bound<'py, PyAny>,
    index: Option<&Bound<'py, PyArray1<i64>>>,
) -> PyResult<Bound<'py, PyDict>> {
    let mut kwargs: HashMap<String, Argument> = HashMap::new();
    kwargs.insert("Module".to_string(), Argument::from(module));
    kwargs.insert("Eb".to_string(), observation_from_py("Eb", eb)?);
    kwargs.insert("Ediff".to_string(), observation_from_py("Ediff", ediff)?);
    kwargs.insert("Tcell".to_string(), observation_from_py("Tcell", tcell)?);
    kwargs.insert("AM".to_string(), observation_from_py("AM", am)?);
    kwargs.insert("AOI".to_string(), observation_from_py("AOI", aoi)?);

    let index_ndarray: Option<Array1<i64>> = index.map(|index: &Bound<'py, PyArray1<i64>>| index.readonly().as_array().to_owned());

    let result: PerformanceResult = sapm_from_arguments_with_index(&kwargs, index_ndarray).map_err(|error| PyValueError::new_err(error.to_string()))?;

    let columns: Bound<'py, PyDict> = PyDict::new(py);
    for name in PerformanceResult::COLUMN_NAMES {
        if let Some(column) = result.column(name) {
            columns.set_item(name, column.to_owned().into_pyarray(py))?;
        }
    }
    columns.set_item("Ee", result.ee.into_pyarray(py))?;
    columns.set_item("index", result.index.into_pyarray(py))?;

    return Ok(columns);
}

/// Accept either a 1D float array or a single float
///
/// Python floats and ints are read as scalars (numpy float64 scalars are floats). A length-1 array stays a vector.
fn observation_from_py(name: &str, value: &Bound<'_, PyAny>) -> PyResult<Argument> {
    if value.is_instance_of::<PyFloat>() || value.is_instance_of::<PyInt>() {
        let scalar: f64 = value.extract::<f64>()?;
        return Ok(Argument::Scalar(scalar));
    }
    if let Ok(array) = value.downcast::<PyArray1<f64>>() {
        let values: Array1<f64> = array.readonly().as_array().to_owned();
        return Ok(Argument::Vector(values));
    }

    return Err(PyTypeError::new_err(format!("`{}` must be a float or a 1D float64 array", name)));
}

#[test]
fn test_sapm_py_raises_value_error() {
    use crate::module_coefficients::flat_response_table;

    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py: Python<'_>| {
        let mut module: HashMap<String, f64> = flat_response_table().into_iter().collect();
        module.remove("C7");

        let eb: Bound<'_, PyAny> = PyFloat::new(py, 1000.0).into_any();
        let ediff: Bound<'_, PyAny> = PyFloat::new(py, 100.0).into_any();
        let tcell: Bound<'_, PyAny> = PyFloat::new(py, 25.0).into_any();
        let am: Bound<'_, PyAny> = PyFloat::new(py, 1.5).into_any();
        let aoi: Bound<'_, PyAny> = PyFloat::new(py, 10.0).into_any();

        // Errors from the evaluator surface as ValueError carrying the Rust message
        let error: PyErr = sapm_py(py, module.clone(), &eb, &ediff, &tcell, &am, &aoi, None).expect_err("C7 is missing");
        assert!(error.is_instance_of::<PyValueError>(py));
        assert_eq!(error.value(py).to_string(), "module coefficient `C7` is missing");

        module.insert("C7".to_string(), 0.0);
        let negative_aoi: Bound<'_, PyAny> = PyFloat::new(py, -10.0).into_any();
        let error: PyErr = sapm_py(py, module, &eb, &ediff, &tcell, &am, &negative_aoi, None).expect_err("AOI < 0");
        assert!(error.is_instance_of::<PyValueError>(py));
        assert_eq!(error.value(py).to_string(), "argument `AOI` fails `x>0` at index 0: value = -10");
    });
}

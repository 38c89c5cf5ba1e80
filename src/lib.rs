//! Sandia Array Performance Model (SAPM)
//!
//! Evaluates the electrical output of a photovoltaic module, at the five points of its IV curve,
//! from the module's empirical coefficients and per-sample irradiance, cell temperature, air mass and angle of incidence.
//!
//! Logging goes through the `log` crate; set `RUST_LOG=sapm_rs=debug` to see the per-call sample counts.

#[cfg(feature = "python")]
use pyo3::prelude::*;

mod errors;
pub use errors::Error;
mod module_coefficients;
pub use module_coefficients::ModuleCoefficients;
mod polynomial;
pub use polynomial::polyval;
mod sapm;
pub use sapm::{E0, K, LOW_IRRADIANCE_THRESHOLD, Q, T0};
pub use sapm::{PerformancePoint, PerformanceResult, SAPM_CONTRACT, SapmInputs, sapm_contract};
pub use sapm::{effective_irradiance, sapm, sapm_from_arguments, sapm_from_arguments_with_index, sapm_modules};

// Re-export so callers can build keyword arguments without depending on the contract crate directly
pub use argument_contract::Argument;

/// A Python module implemented in Rust; bindings added here
#[cfg(feature = "python")]
#[pymodule]
fn sapm_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Start logger; a second import of the module must not fail
    let _ = env_logger::try_init();

    m.add_function(wrap_pyfunction!(sapm::sapm_py::sapm_py, m)?)?;

    return Ok(());
}

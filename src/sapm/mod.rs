// Load modules
mod effective_irradiance;
mod evaluator;
mod performance_result;
mod sapm_inputs;
#[cfg(feature = "python")]
pub(crate) mod sapm_py;

// Expose functions to public
pub use effective_irradiance::effective_irradiance;
pub use performance_result::{PerformancePoint, PerformanceResult};
pub use evaluator::{E0, K, LOW_IRRADIANCE_THRESHOLD, Q, T0};
pub use evaluator::{sapm, sapm_from_arguments, sapm_from_arguments_with_index, sapm_modules};
pub use sapm_inputs::{SAPM_CONTRACT, SapmInputs, sapm_contract};

use super::effective_irradiance::effective_irradiance;
use super::performance_result::PerformanceResult;
use super::sapm_inputs::{SapmInputs, sapm_contract};
use crate::errors::Error;
use crate::module_coefficients::ModuleCoefficients;
use argument_contract::{Argument, Contract, ParsedArguments};
use log::{debug, info};
use ndarray::{Array1, Zip};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};

// Global constants
pub const T0: f64 = 25.0; // reference cell temperature, °C
pub const Q: f64 = 1.60218e-19; // elementary charge, C
pub const K: f64 = 1.38066e-23; // Boltzmann constant, J/K
pub const E0: f64 = 1000.0; // reference irradiance, W/m^2

/// Effective irradiance below which a sample is considered dark for reporting purposes
pub const LOW_IRRADIANCE_THRESHOLD: f64 = 0.001;

/// Sandia Array Performance Model (SAPM)
///
/// Equations taken from:
/// D. L. King, W. E. Boyson, J. A. Kratochvil, "Photovoltaic Array Performance Model", SAND2004-3535, 2004
///
/// # Arguments
/// * `module` - empirical coefficients of the PV module
/// * `inputs` - aligned observations: beam and diffuse irradiance, cell temperature, air mass, angle of incidence
///
/// # Returns
/// * `PerformanceResult` - one row per sample, in input order, with the input index attached
///
/// # Errors
/// * `Error::ShapeMismatch` - an observation (or the index) does not have the length of `Eb`; nothing is computed
///
/// # Notes
/// Samples with zero effective irradiance are kept. For them `Isc = Imp = Ix = Ixx = 0`,
/// `Voc = -inf` (the limit of `ln(Ee)`), and `Vmp = Pmp = NaN` because the maximum power point does not exist.
/// These values do not depend on the sign of `C2`, `C3` or `#Series`.
/// This differs from the unpinned formula, which gives `Vmp = -inf` for typical modules
/// (`C2 > 0`, `C3 < 0`, where the `C3 * ln(Ee)^2` term dominates) and `+inf` or NaN for other sign combinations.
/// `Pmp` is NaN either way, as `Imp = 0`.
///
/// # Examples
///
/// ```
/// use ndarray::Array1;
/// use sapm_rs::{ModuleCoefficients, PerformanceResult, SapmInputs, sapm};
/// use std::collections::BTreeMap;
///
/// let mut table: BTreeMap<String, f64> = BTreeMap::new();
/// for name in ["A1", "A2", "A3", "A4", "B1", "B2", "B3", "B4", "B5", "Aisc", "Aimp", "Mbvoc", "Mbvmp", "C1", "C3", "C5", "C7"] {
///     table.insert(name.to_string(), 0.0);
/// }
/// for (name, value) in [("A0", 1.0), ("B0", 1.0), ("FD", 1.0), ("Isco", 8.0), ("Impo", 7.0), ("Voco", 40.0), ("Vmpo", 32.0)] {
///     table.insert(name.to_string(), value);
/// }
/// for (name, value) in [("Ixo", 7.5), ("Ixxo", 5.0), ("Bvoco", -0.15), ("Bvmpo", -0.16), ("C0", 1.0), ("C2", 0.3)] {
///     table.insert(name.to_string(), value);
/// }
/// for (name, value) in [("C4", 1.0), ("C6", 1.0), ("N", 1.2), ("#Series", 60.0)] {
///     table.insert(name.to_string(), value);
/// }
/// let module: ModuleCoefficients = ModuleCoefficients::from_map(&table).unwrap();
///
/// let inputs: SapmInputs = SapmInputs::new(
///     Array1::from_vec(vec![1000.0, 0.0]), // Eb
///     Array1::from_vec(vec![0.0, 0.0]),    // Ediff
///     Array1::from_vec(vec![25.0, 25.0]),  // Tcell
///     Array1::from_vec(vec![1.5, 1.5]),    // AM
///     Array1::from_vec(vec![0.0, 0.0]),    // AOI
/// );
/// let result: PerformanceResult = sapm(&module, &inputs).unwrap();
///
/// assert_eq!(result.isc[0], 8.0);
/// assert_eq!(result.pmp[0], 7.0 * 32.0);
/// assert_eq!(result.isc[1], 0.0);
/// assert_eq!(result.voc[1], f64::NEG_INFINITY);
/// assert!(result.pmp[1].is_nan());
/// ```
pub fn sapm(module: &ModuleCoefficients, inputs: &SapmInputs) -> Result<PerformanceResult, Error> {
    inputs.check_shapes()?;
    let n_samples: usize = inputs.len();

    let tcell: &Array1<f64> = &inputs.tcell;

    let ee: Array1<f64> = effective_irradiance(module, &inputs.eb, &inputs.ediff, &inputs.am, &inputs.aoi);
    let n_low_irradiance: usize = ee.iter().filter(|ee: &&f64| **ee < LOW_IRRADIANCE_THRESHOLD).count();
    debug!(
        "sapm: {} samples, {} with effective irradiance below {} (kept)",
        n_samples, n_low_irradiance, LOW_IRRADIANCE_THRESHOLD
    );

    let d_t: Array1<f64> = tcell - T0;
    let ee_sq: Array1<f64> = ee.mapv(|x: f64| x.powi(2));

    // Currents
    let isc_temperature_factor: Array1<f64> = 1.0 + module.aisc * &d_t;
    let imp_temperature_factor: Array1<f64> = 1.0 + module.aimp * &d_t;
    let isc: Array1<f64> = module.isco * &ee * &isc_temperature_factor;
    let imp: Array1<f64> = module.impo * (module.c0 * &ee + &(module.c1 * &ee_sq)) * &imp_temperature_factor;
    let ix: Array1<f64> = module.ixo * (module.c4 * &ee + &(module.c5 * &ee_sq)) * &isc_temperature_factor;
    let ixx: Array1<f64> = module.ixxo * (module.c6 * &ee + &(module.c7 * &ee_sq)) * &isc_temperature_factor;

    // Thermal voltage of the diode, multiplied by the diode factor
    let delta: Array1<f64> = module.n * K * (tcell + 273.15) / Q;
    let delta_log_ee: Array1<f64> = &delta * &ee.mapv(f64::ln);
    let delta_log_ee_sq: Array1<f64> = delta_log_ee.mapv(|x: f64| x.powi(2));

    // Voltages
    let bvoco: Array1<f64> = module.bvoco + module.mbvoc * (1.0 - &ee);
    let bvmpo: Array1<f64> = module.bvmpo + module.mbvmp * (1.0 - &ee);
    let mut voc: Array1<f64> = module.voco + module.cells_in_series * &delta_log_ee + &(bvoco * &d_t);
    let mut vmp: Array1<f64> = module.vmpo
        + module.c2 * module.cells_in_series * &delta_log_ee
        + &(module.c3 * module.cells_in_series * &delta_log_ee_sq)
        + &(bvmpo * &d_t);

    // ln(0) = -inf; pin the dark samples so they do not depend on coefficient signs
    Zip::from(&mut voc).and(&mut vmp).and(&ee).for_each(|voc: &mut f64, vmp: &mut f64, &ee: &f64| {
        if ee == 0.0 {
            *voc = f64::NEG_INFINITY;
            *vmp = f64::NAN;
        }
    });

    let pmp: Array1<f64> = &imp * &vmp;

    return Ok(PerformanceResult {
        index: inputs.index_or_default(),
        ee,
        isc,
        imp,
        voc,
        vmp,
        pmp,
        ix,
        ixx,
    });
}

/// Evaluate several modules against the same observations, in parallel
///
/// Results are in the order of `modules`. When evaluations fail, the error of the first failing module is returned.
pub fn sapm_modules(modules: &[ModuleCoefficients], inputs: &SapmInputs) -> Result<Vec<PerformanceResult>, Error> {
    inputs.check_shapes()?;

    let timing_start: Instant = Instant::now();
    let results: Vec<Result<PerformanceResult, Error>> = modules
        .par_iter() // Use Rayon to create a parallel iterator
        .map(|module: &ModuleCoefficients| sapm(module, inputs))
        .collect();
    let duration: Duration = timing_start.elapsed();
    info!("sapm_modules: {} modules x {} samples, time elapsed: {:?}", modules.len(), inputs.len(), duration);

    return results.into_iter().collect();
}

/// Validate keyword arguments against `SAPM_CONTRACT`, then evaluate
///
/// `kwargs` must hold `Module` (a coefficient table) and `Eb`, `Ediff`, `Tcell`, `AM`, `AOI`
/// (scalars or vectors; scalars are broadcast to the vector length).
pub fn sapm_from_arguments(kwargs: &HashMap<String, Argument>) -> Result<PerformanceResult, Error> {
    return sapm_from_arguments_with_index(kwargs, None);
}

/// As `sapm_from_arguments`, with a label per sample
///
/// The index length is checked with the observations, so a mismatch is an `Error::ShapeMismatch`
/// raised before any computation.
pub fn sapm_from_arguments_with_index(kwargs: &HashMap<String, Argument>, index: Option<Array1<i64>>) -> Result<PerformanceResult, Error> {
    let contract: Contract = sapm_contract()?;
    let arguments: ParsedArguments = contract.parse(kwargs)?;

    let module: ModuleCoefficients = ModuleCoefficients::from_map(arguments.table("Module")?)?;
    let mut inputs: SapmInputs = SapmInputs::from_arguments(&arguments)?;
    if let Some(index) = index {
        inputs = inputs.with_index(index);
    }

    return sapm(&module, &inputs);
}

#[cfg(test)]
fn single_sample(eb: f64, ediff: f64, tcell: f64, am: f64, aoi: f64) -> SapmInputs {
    return SapmInputs::new(
        Array1::from_vec(vec![eb]),
        Array1::from_vec(vec![ediff]),
        Array1::from_vec(vec![tcell]),
        Array1::from_vec(vec![am]),
        Array1::from_vec(vec![aoi]),
    );
}

#[test]
fn test_sapm_reference_conditions() {
    use crate::module_coefficients::flat_response_module;

    // F1 = F2 = 1, Eb = 1000, Ediff = 0 gives Ee = 1 exactly, and ln(Ee) = 0 removes the diode terms
    let module: ModuleCoefficients = flat_response_module();
    let result: PerformanceResult = sapm(&module, &single_sample(1000.0, 0.0, 25.0, 1.0, 0.0)).expect("aligned inputs");

    assert_eq!(result.ee[0], 1.0);
    assert_eq!(result.isc[0], 8.0);
    assert_eq!(result.imp[0], 7.0);
    assert_eq!(result.voc[0], 40.0);
    assert_eq!(result.vmp[0], 32.0);
    assert_eq!(result.pmp[0], 224.0);
    assert_eq!(result.ix[0], 7.5);
    assert_eq!(result.ixx[0], 5.0);
    assert_eq!(result.index, Array1::from_vec(vec![0]));
}

#[test]
fn test_sapm_temperature_dependence() {
    use crate::module_coefficients::flat_response_module;
    use approx::assert_abs_diff_eq;

    let mut module: ModuleCoefficients = flat_response_module();
    module.aisc = 0.0005;
    module.aimp = -0.0004;
    module.mbvoc = 0.02;
    module.mbvmp = 0.03;

    // Ee = 1, so the irradiance terms of Bvoco and Bvmpo vanish; dT = 25
    let result: PerformanceResult = sapm(&module, &single_sample(1000.0, 0.0, 50.0, 1.0, 0.0)).expect("aligned inputs");

    assert_abs_diff_eq!(result.isc[0], 8.0 * 1.0125, epsilon = 1e-12);
    assert_abs_diff_eq!(result.imp[0], 7.0 * 0.99, epsilon = 1e-12);
    assert_abs_diff_eq!(result.voc[0], 40.0 - 0.15 * 25.0, epsilon = 1e-12);
    assert_abs_diff_eq!(result.vmp[0], 32.0 - 0.16 * 25.0, epsilon = 1e-12);
    assert_abs_diff_eq!(result.ix[0], 7.5 * 1.0125, epsilon = 1e-12);
    assert_abs_diff_eq!(result.ixx[0], 5.0 * 1.0125, epsilon = 1e-12);
    assert_eq!(result.pmp[0], result.imp[0] * result.vmp[0]);
}

#[test]
fn test_sapm_partial_irradiance() {
    use crate::module_coefficients::flat_response_module;
    use approx::assert_abs_diff_eq;

    let mut module: ModuleCoefficients = flat_response_module();
    module.c1 = 0.02;
    module.mbvoc = 0.02;
    module.mbvmp = 0.03;

    // Ee = 0.5 at Tcell = 35 °C
    let tcell: f64 = 35.0;
    let result: PerformanceResult = sapm(&module, &single_sample(400.0, 100.0, tcell, 1.0, 0.0)).expect("aligned inputs");

    let ee: f64 = 0.5;
    let d_t: f64 = tcell - T0;
    let delta: f64 = 1.2 * K * (tcell + 273.15) / Q;
    let voc_expected: f64 = 40.0 + 60.0 * delta * ee.ln() + (-0.15 + 0.02 * (1.0 - ee)) * d_t;
    let vmp_expected: f64 = 32.0 + 0.3 * 60.0 * delta * ee.ln() - 5.0 * 60.0 * (delta * ee.ln()).powi(2) + (-0.16 + 0.03 * (1.0 - ee)) * d_t;

    assert_eq!(result.ee[0], ee);
    assert_abs_diff_eq!(result.isc[0], 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(result.imp[0], 7.0 * (0.5 + 0.02 * 0.25), epsilon = 1e-12);
    assert_abs_diff_eq!(result.voc[0], voc_expected, epsilon = 1e-10);
    assert_abs_diff_eq!(result.vmp[0], vmp_expected, epsilon = 1e-10);
    assert_eq!(result.pmp[0], result.imp[0] * result.vmp[0]);

    // The diode term lowers both voltages below their reference values
    assert!(result.voc[0] < 40.0);
    assert!(result.vmp[0] < 32.0);
}

#[test]
fn test_sapm_dark_sample() {
    use crate::module_coefficients::flat_response_module;

    let module: ModuleCoefficients = flat_response_module();
    let result: PerformanceResult = sapm(&module, &single_sample(0.0, 0.0, 25.0, 1.0, 0.0)).expect("aligned inputs");

    assert_eq!(result.ee[0], 0.0);
    assert_eq!(result.isc[0], 0.0);
    assert_eq!(result.imp[0], 0.0);
    assert_eq!(result.ix[0], 0.0);
    assert_eq!(result.ixx[0], 0.0);
    assert_eq!(result.voc[0], f64::NEG_INFINITY);
    assert!(result.vmp[0].is_nan());
    assert!(result.pmp[0].is_nan());
}

#[test]
fn test_sapm_dark_sample_independent_of_coefficient_signs() {
    use crate::module_coefficients::flat_response_module;

    // With C2 < 0 and C3 > 0 both ln terms of Vmp tend to +inf, and with zero cells Voc would be NaN
    let mut module: ModuleCoefficients = flat_response_module();
    module.c2 = -0.3;
    module.c3 = 5.0;
    module.cells_in_series = 0.0;

    let result: PerformanceResult = sapm(&module, &single_sample(0.0, 0.0, 25.0, 1.0, 0.0)).expect("aligned inputs");

    assert_eq!(result.voc[0], f64::NEG_INFINITY);
    assert!(result.vmp[0].is_nan());
    assert!(result.pmp[0].is_nan());
}

#[test]
fn test_sapm_negative_effective_irradiance_is_clamped() {
    use crate::module_coefficients::flat_response_module;

    // F1 = -0.5 for every air mass, so F1 * F2 < 0
    let mut module: ModuleCoefficients = flat_response_module();
    module.a0 = -0.5;

    let result: PerformanceResult = sapm(&module, &single_sample(900.0, 100.0, 40.0, 1.5, 20.0)).expect("aligned inputs");

    assert_eq!(result.ee[0], 0.0);
    assert_eq!(result.isc[0], 0.0);
    assert_eq!(result.imp[0], 0.0);
    assert_eq!(result.ix[0], 0.0);
    assert_eq!(result.ixx[0], 0.0);
    assert_eq!(result.voc[0], f64::NEG_INFINITY);
}

#[test]
fn test_sapm_nan_effective_irradiance_is_zeroed() {
    use crate::module_coefficients::flat_response_module;

    let module: ModuleCoefficients = flat_response_module();
    let result: PerformanceResult = sapm(&module, &single_sample(f64::NAN, 100.0, 25.0, 1.0, 0.0)).expect("aligned inputs");

    assert_eq!(result.ee[0], 0.0);
    assert_eq!(result.isc[0], 0.0);
}

#[test]
fn test_sapm_keeps_low_irradiance_rows() {
    use crate::module_coefficients::flat_response_module;

    let module: ModuleCoefficients = flat_response_module();
    let inputs: SapmInputs = SapmInputs::new(
        Array1::from_vec(vec![0.2, 1000.0, 0.5]),
        Array1::from_vec(vec![0.0, 0.0, 0.0]),
        Array1::from_elem(3, 25.0),
        Array1::from_elem(3, 1.0),
        Array1::from_elem(3, 0.0),
    );
    let result: PerformanceResult = sapm(&module, &inputs).expect("aligned inputs");

    assert_eq!(result.len(), 3);
    assert!(result.isc[0] > 0.0);
    assert_eq!(result.low_irradiance_mask(LOW_IRRADIANCE_THRESHOLD), Array1::from_vec(vec![true, false, true]));
}

#[test]
fn test_sapm_preserves_row_order_and_index() {
    use super::performance_result::PerformancePoint;
    use crate::module_coefficients::flat_response_module;
    use approx::assert_abs_diff_eq;

    let module: ModuleCoefficients = flat_response_module();
    let eb: Array1<f64> = Array1::from_vec(vec![100.0, 800.0, 200.0, 400.0, 50.0]);
    let index: Array1<i64> = Array1::from_vec(vec![42, 7, 19, -3, 1_000_000]);
    let inputs: SapmInputs = SapmInputs::new(
        eb.clone(),
        Array1::zeros(5),
        Array1::from_elem(5, 25.0),
        Array1::from_elem(5, 1.0),
        Array1::from_elem(5, 0.0),
    )
    .with_index(index.clone());

    let result: PerformanceResult = sapm(&module, &inputs).expect("aligned inputs");

    assert_eq!(result.index, index);
    assert_abs_diff_eq!(result.isc, 8.0 * &eb / 1000.0, epsilon = 1e-12);
    for i_sample in 0..eb.len() {
        let single: PerformanceResult = sapm(&module, &single_sample(eb[i_sample], 0.0, 25.0, 1.0, 0.0)).expect("aligned inputs");
        let row: PerformancePoint = result.row(i_sample).expect("row exists");
        assert_eq!(row.index, index[i_sample]);
        assert_eq!(row.voc, single.voc[0]);
        assert_eq!(row.pmp, single.pmp[0]);
    }
}

#[test]
fn test_sapm_monotonic_in_beam_irradiance() {
    use crate::module_coefficients::flat_response_module;

    let mut module: ModuleCoefficients = flat_response_module();
    module.a0 = 0.93;
    module.a1 = 0.07;
    module.b0 = 1.0;
    module.b1 = -0.0024;
    module.fd = 0.9;
    module.aisc = 0.0004;

    let n_samples: usize = 25;
    let inputs: SapmInputs = SapmInputs::new(
        Array1::linspace(0.0, 1200.0, n_samples),
        Array1::from_elem(n_samples, 80.0),
        Array1::from_elem(n_samples, 45.0),
        Array1::from_elem(n_samples, 1.5),
        Array1::from_elem(n_samples, 35.0),
    );
    let result: PerformanceResult = sapm(&module, &inputs).expect("aligned inputs");

    for i_sample in 1..n_samples {
        assert!(result.ee[i_sample] >= result.ee[i_sample - 1]);
        assert!(result.isc[i_sample] >= result.isc[i_sample - 1]);
    }
}

#[test]
fn test_sapm_shape_mismatch_before_computation() {
    use crate::module_coefficients::flat_response_module;

    let module: ModuleCoefficients = flat_response_module();
    let inputs: SapmInputs = SapmInputs::new(
        Array1::from_vec(vec![1000.0, 900.0, 800.0]),
        Array1::from_vec(vec![100.0, 100.0]),
        Array1::from_elem(3, 25.0),
        Array1::from_elem(3, 1.5),
        Array1::from_elem(3, 10.0),
    );

    let error: Error = sapm(&module, &inputs).expect_err("Ediff is too short");
    assert_eq!(
        error,
        Error::ShapeMismatch {
            argument: "Ediff",
            expected: 3,
            found: 2,
        }
    );
}

#[test]
fn test_sapm_empty_inputs() {
    use crate::module_coefficients::flat_response_module;

    let inputs: SapmInputs = SapmInputs::new(Array1::zeros(0), Array1::zeros(0), Array1::zeros(0), Array1::zeros(0), Array1::zeros(0));
    let result: PerformanceResult = sapm(&flat_response_module(), &inputs).expect("aligned inputs");

    assert!(result.is_empty());
    assert_eq!(result.peak_power(), None);
}

#[test]
fn test_sapm_modules_matches_single_evaluation() {
    use crate::module_coefficients::flat_response_module;

    let _ = env_logger::builder().is_test(true).try_init();

    let reference: ModuleCoefficients = flat_response_module();
    let mut larger: ModuleCoefficients = flat_response_module();
    larger.isco = 9.5;
    larger.impo = 8.8;
    let mut warmer: ModuleCoefficients = flat_response_module();
    warmer.aisc = 0.0006;
    let modules: Vec<ModuleCoefficients> = vec![reference, larger, warmer];

    let inputs: SapmInputs = SapmInputs::new(
        Array1::from_vec(vec![1000.0, 600.0, 0.0]),
        Array1::from_vec(vec![50.0, 120.0, 0.0]),
        Array1::from_vec(vec![45.0, 30.0, 10.0]),
        Array1::from_elem(3, 1.2),
        Array1::from_vec(vec![5.0, 40.0, 80.0]),
    );

    let results: Vec<PerformanceResult> = sapm_modules(&modules, &inputs).expect("aligned inputs");

    assert_eq!(results.len(), 3);
    for (module, result) in modules.iter().zip(results.iter()) {
        let single: PerformanceResult = sapm(module, &inputs).expect("aligned inputs");
        assert_eq!(result.isc, single.isc);
        assert_eq!(result.imp, single.imp);
        assert_eq!(result.voc, single.voc);
    }
    assert!(results[1].isc[0] > results[0].isc[0]);
}

#[test]
fn test_sapm_modules_shape_mismatch() {
    use crate::module_coefficients::flat_response_module;

    let inputs: SapmInputs = single_sample(1000.0, 0.0, 25.0, 1.0, 0.0).with_index(Array1::from_vec(vec![1, 2]));
    let result: Result<Vec<PerformanceResult>, Error> = sapm_modules(&[flat_response_module()], &inputs);

    assert!(matches!(result, Err(Error::ShapeMismatch { argument: "index", .. })));
}

#[test]
fn test_sapm_from_arguments() {
    use crate::module_coefficients::flat_response_table;
    use approx::assert_abs_diff_eq;

    let mut kwargs: HashMap<String, Argument> = HashMap::new();
    kwargs.insert("Module".to_string(), Argument::Table(flat_response_table()));
    kwargs.insert("Eb".to_string(), Argument::from(vec![1000.0, 500.0, 250.0]));
    kwargs.insert("Ediff".to_string(), Argument::Scalar(50.0));
    kwargs.insert("Tcell".to_string(), Argument::Scalar(25.0));
    kwargs.insert("AM".to_string(), Argument::Scalar(1.5));
    kwargs.insert("AOI".to_string(), Argument::Scalar(10.0));

    let result: PerformanceResult = sapm_from_arguments(&kwargs).expect("valid arguments");

    assert_eq!(result.len(), 3);
    assert_abs_diff_eq!(result.isc, Array1::from_vec(vec![8.4, 4.4, 2.4]), epsilon = 1e-12);
}

#[test]
fn test_sapm_from_arguments_errors() {
    use crate::module_coefficients::flat_response_table;
    use std::collections::BTreeMap;

    let mut kwargs: HashMap<String, Argument> = HashMap::new();
    kwargs.insert("Module".to_string(), Argument::Table(flat_response_table()));
    kwargs.insert("Eb".to_string(), Argument::from(vec![1000.0, -5.0]));
    kwargs.insert("Ediff".to_string(), Argument::Scalar(50.0));
    kwargs.insert("Tcell".to_string(), Argument::Scalar(25.0));
    kwargs.insert("AM".to_string(), Argument::Scalar(1.5));

    // AOI is missing
    let error: Error = sapm_from_arguments(&kwargs).expect_err("missing argument");
    assert_eq!(error, Error::Argument(argument_contract::Error::MissingArgument { name: "AOI".to_string() }));

    // Eb is negative
    kwargs.insert("AOI".to_string(), Argument::Scalar(10.0));
    let error: Error = sapm_from_arguments(&kwargs).expect_err("negative irradiance");
    assert!(matches!(
        error,
        Error::Argument(argument_contract::Error::InvalidDomain { ref name, index: 1, .. }) if name == "Eb"
    ));

    // Sub-zero cell temperature fails the declared `Tcell > 0`
    kwargs.insert("Eb".to_string(), Argument::from(vec![1000.0, 5.0]));
    kwargs.insert("Tcell".to_string(), Argument::Scalar(-10.0));
    let error: Error = sapm_from_arguments(&kwargs).expect_err("sub-zero temperature");
    assert!(matches!(error, Error::Argument(argument_contract::Error::InvalidDomain { ref name, .. }) if name == "Tcell"));

    // Incomplete coefficient table
    kwargs.insert("Tcell".to_string(), Argument::Scalar(10.0));
    let mut table: BTreeMap<String, f64> = flat_response_table();
    table.remove("N");
    kwargs.insert("Module".to_string(), Argument::Table(table));
    let error: Error = sapm_from_arguments(&kwargs).expect_err("missing coefficient");
    assert_eq!(error, Error::MissingCoefficient { name: "N" });

    // Unequal vectors pass the contract and are rejected by the evaluator; scalars follow the longest vector
    kwargs.insert("Module".to_string(), Argument::Table(flat_response_table()));
    kwargs.insert("AM".to_string(), Argument::from(vec![1.5, 1.5, 1.5]));
    let error: Error = sapm_from_arguments(&kwargs).expect_err("unequal vectors");
    assert_eq!(
        error,
        Error::ShapeMismatch {
            argument: "Ediff",
            expected: 2,
            found: 3,
        }
    );
}

#[test]
fn test_sapm_from_arguments_with_index() {
    use crate::module_coefficients::flat_response_table;

    let mut kwargs: HashMap<String, Argument> = HashMap::new();
    kwargs.insert("Module".to_string(), Argument::Table(flat_response_table()));
    kwargs.insert("Eb".to_string(), Argument::from(vec![1000.0, 500.0, 250.0]));
    kwargs.insert("Ediff".to_string(), Argument::Scalar(50.0));
    kwargs.insert("Tcell".to_string(), Argument::Scalar(25.0));
    kwargs.insert("AM".to_string(), Argument::Scalar(1.5));
    kwargs.insert("AOI".to_string(), Argument::Scalar(10.0));

    let index: Array1<i64> = Array1::from_vec(vec![1_700_007_200, 1_700_000_000, 1_700_003_600]);
    let result: PerformanceResult = sapm_from_arguments_with_index(&kwargs, Some(index.clone())).expect("aligned index");
    assert_eq!(result.index, index);
    assert_eq!(result.isc, sapm_from_arguments(&kwargs).expect("valid arguments").isc);

    // A short index is a shape error from the evaluator, not a late check on the result
    let error: Error = sapm_from_arguments_with_index(&kwargs, Some(Array1::from_vec(vec![1, 2]))).expect_err("short index");
    assert_eq!(
        error,
        Error::ShapeMismatch {
            argument: "index",
            expected: 3,
            found: 2,
        }
    );
    assert_eq!(error.to_string(), "`index` has length 2 but `Eb` has length 3");
}

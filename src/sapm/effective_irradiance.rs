use super::evaluator::E0;
use crate::module_coefficients::ModuleCoefficients;
use crate::polynomial::polyval;
use log::{debug, warn};
use ndarray::Array1;

/// Effective irradiance seen by the cells, normalised to `E0`
///
/// `Ee = F1(AM) * (Eb * F2(AOI) + FD * Ediff) / E0`
///
/// # Arguments
/// * `module` - module coefficients, supplying the air-mass and angle-of-incidence polynomials and `FD`
/// * `eb` - beam irradiance on the module, W/m^2
/// * `ediff` - diffuse irradiance on the module, W/m^2
/// * `am` - absolute air mass, same length as `eb`
/// * `aoi` - angle of incidence, degrees, same length as `eb`
///
/// # Returns
/// * `ee` - effective irradiance, dimensionless; NaN and negative values are replaced by 0
///
/// The polynomials are fits and can go negative when extrapolated, which is why negative values saturate to 0.
/// Lengths are not checked here, `sapm` does that before calling.
pub fn effective_irradiance(module: &ModuleCoefficients, eb: &Array1<f64>, ediff: &Array1<f64>, am: &Array1<f64>, aoi: &Array1<f64>) -> Array1<f64> {
    let f1: Array1<f64> = polyval(&module.air_mass_polynomial(), am);
    let f2: Array1<f64> = polyval(&module.angle_of_incidence_polynomial(), aoi);

    let collected_irradiance: Array1<f64> = eb * &f2 + &(module.fd * ediff);
    let mut ee: Array1<f64> = f1 * &(collected_irradiance / E0);

    let n_nan: usize = ee.iter().filter(|value: &&f64| value.is_nan()).count();
    let n_negative: usize = ee.iter().filter(|value: &&f64| **value < 0.0).count();
    if n_nan > 0 {
        warn!("effective_irradiance: {} of {} samples are NaN, set to 0", n_nan, ee.len());
    }
    if n_negative > 0 {
        debug!("effective_irradiance: {} of {} samples are negative, clamped to 0", n_negative, ee.len());
    }

    // `<= 0.0` also turns -0.0 into +0.0
    ee.mapv_inplace(|value: f64| if value.is_nan() || value <= 0.0 { 0.0 } else { value });

    return ee;
}

#[test]
fn test_effective_irradiance_flat_response() {
    use crate::module_coefficients::flat_response_module;
    use approx::assert_abs_diff_eq;

    let module: ModuleCoefficients = flat_response_module();
    let eb: Array1<f64> = Array1::from_vec(vec![1000.0, 800.0, 0.0, 250.0]);
    let ediff: Array1<f64> = Array1::from_vec(vec![0.0, 100.0, 0.0, 250.0]);
    let am: Array1<f64> = Array1::from_vec(vec![1.0, 1.5, 3.0, 10.0]);
    let aoi: Array1<f64> = Array1::from_vec(vec![0.0, 30.0, 60.0, 89.0]);

    let ee: Array1<f64> = effective_irradiance(&module, &eb, &ediff, &am, &aoi);

    assert_abs_diff_eq!(ee, Array1::from_vec(vec![1.0, 0.9, 0.0, 0.5]), epsilon = 1e-15);
}

#[test]
fn test_effective_irradiance_spectral_and_angular_correction() {
    use crate::module_coefficients::flat_response_module;
    use approx::assert_abs_diff_eq;

    // F1 = 0.5 + 0.25 * AM, F2 = 1 - 0.01 * AOI, FD = 0.8
    let mut module: ModuleCoefficients = flat_response_module();
    module.a0 = 0.5;
    module.a1 = 0.25;
    module.b0 = 1.0;
    module.b1 = -0.01;
    module.fd = 0.8;

    let eb: Array1<f64> = Array1::from_vec(vec![600.0, 900.0]);
    let ediff: Array1<f64> = Array1::from_vec(vec![200.0, 50.0]);
    let am: Array1<f64> = Array1::from_vec(vec![2.0, 1.0]);
    let aoi: Array1<f64> = Array1::from_vec(vec![20.0, 50.0]);

    let ee: Array1<f64> = effective_irradiance(&module, &eb, &ediff, &am, &aoi);

    // sample 0: 1.0 * (600 * 0.8 + 0.8 * 200) / 1000 = 0.64
    // sample 1: 0.75 * (900 * 0.5 + 0.8 * 50) / 1000 = 0.3675
    assert_abs_diff_eq!(ee[0], 0.64, epsilon = 1e-12);
    assert_abs_diff_eq!(ee[1], 0.3675, epsilon = 1e-12);
}

#[test]
fn test_effective_irradiance_clamps_negative_and_nan() {
    use crate::module_coefficients::flat_response_module;

    // F1 = 2 - AM changes sign at AM = 2
    let mut module: ModuleCoefficients = flat_response_module();
    module.a0 = 2.0;
    module.a1 = -1.0;

    let eb: Array1<f64> = Array1::from_vec(vec![1000.0, 1000.0, f64::NAN, 1000.0, 0.0]);
    let ediff: Array1<f64> = Array1::from_vec(vec![100.0, 100.0, 100.0, 100.0, 0.0]);
    let am: Array1<f64> = Array1::from_vec(vec![1.0, 3.0, 1.0, 2.0, 5.0]);
    let aoi: Array1<f64> = Array1::from_elem(5, 10.0);

    let ee: Array1<f64> = effective_irradiance(&module, &eb, &ediff, &am, &aoi);

    assert_eq!(ee[0], 1.1);
    assert_eq!(ee[1], 0.0); // F1 = -1
    assert_eq!(ee[2], 0.0); // NaN beam irradiance
    assert_eq!(ee[3], 0.0); // F1 = 0
    assert_eq!(ee[4], 0.0); // F1 = -3 times zero irradiance gives -0.0
    assert!(ee.iter().all(|value: &f64| value.is_sign_positive()));
}

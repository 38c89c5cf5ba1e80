use approx::assert_abs_diff_eq;
use ndarray::Array1;
use sapm_rs::{Argument, Error, K, ModuleCoefficients, PerformancePoint, PerformanceResult, Q, SapmInputs, sapm, sapm_from_arguments};
use std::collections::{BTreeMap, HashMap};

/// Canadian Solar CS5P-220M, as published in the Sandia module database
fn cs5p_220m_table() -> BTreeMap<String, f64> {
    let entries: [(&str, f64); 39] = [
        ("Isco", 5.09115),
        ("Voco", 59.2608),
        ("Impo", 4.54629),
        ("Vmpo", 48.3156),
        ("Aisc", 0.000397),
        ("Aimp", 0.000181),
        ("C0", 1.01284),
        ("C1", -0.0128398),
        ("Bvoco", -0.21696),
        ("Mbvoc", 0.0),
        ("Bvmpo", -0.235488),
        ("Mbvmp", 0.0),
        ("N", 1.4032),
        ("C2", 0.279317),
        ("C3", -7.24463),
        ("A0", 0.928385),
        ("A1", 0.068093),
        ("A2", -0.0157738),
        ("A3", 0.0016606),
        ("A4", -6.93e-05),
        ("B0", 1.0),
        ("B1", -0.002438),
        ("B2", 0.0003103),
        ("B3", -1.246e-05),
        ("B4", 2.11e-07),
        ("B5", -1.36e-09),
        ("FD", 1.0),
        ("C4", 0.996446),
        ("C5", 0.003554),
        ("IXO", 4.97599),
        ("IXXO", 3.18803),
        ("C6", 1.15535),
        ("C7", -0.155353),
        ("Cells_in_Series", 96.0),
        // Columns of the database which the model does not use
        ("Area", 1.701),
        ("Material", 2.0),
        ("Parallel_Strings", 1.0),
        ("Vintage", 2009.0),
        ("DTC", 3.0),
    ];

    let mut table: BTreeMap<String, f64> = BTreeMap::new();
    for (name, value) in entries {
        table.insert(name.to_string(), value);
    }
    return table;
}

fn cs5p_220m() -> ModuleCoefficients {
    return ModuleCoefficients::from_map(&cs5p_220m_table()).expect("complete coefficient table");
}

/// One sample evaluated with scalar arithmetic, written out term by term
fn reference_point(module: &ModuleCoefficients, eb: f64, ediff: f64, tcell: f64, am: f64, aoi: f64) -> PerformancePoint {
    let f1: f64 = module.a0 + module.a1 * am + module.a2 * am.powi(2) + module.a3 * am.powi(3) + module.a4 * am.powi(4);
    let f2: f64 = module.b0 + module.b1 * aoi + module.b2 * aoi.powi(2) + module.b3 * aoi.powi(3) + module.b4 * aoi.powi(4) + module.b5 * aoi.powi(5);
    let ee: f64 = (f1 * (eb * f2 + module.fd * ediff) / 1000.0).max(0.0);

    let d_t: f64 = tcell - 25.0;
    let delta: f64 = module.n * K * (tcell + 273.15) / Q;
    let n_s: f64 = module.cells_in_series;

    let isc: f64 = module.isco * ee * (1.0 + module.aisc * d_t);
    let imp: f64 = module.impo * (module.c0 * ee + module.c1 * ee.powi(2)) * (1.0 + module.aimp * d_t);
    let voc: f64 = module.voco + n_s * delta * ee.ln() + (module.bvoco + module.mbvoc * (1.0 - ee)) * d_t;
    let vmp: f64 = module.vmpo + module.c2 * n_s * delta * ee.ln() + module.c3 * n_s * (delta * ee.ln()).powi(2) + (module.bvmpo + module.mbvmp * (1.0 - ee)) * d_t;
    let ix: f64 = module.ixo * (module.c4 * ee + module.c5 * ee.powi(2)) * (1.0 + module.aisc * d_t);
    let ixx: f64 = module.ixxo * (module.c6 * ee + module.c7 * ee.powi(2)) * (1.0 + module.aisc * d_t);

    return PerformancePoint {
        index: 0,
        ee,
        isc,
        imp,
        voc,
        vmp,
        pmp: imp * vmp,
        ix,
        ixx,
    };
}

fn clear_sky_day() -> SapmInputs {
    // Morning to noon on a clear day, hourly
    let eb: Array1<f64> = Array1::from_vec(vec![120.0, 340.0, 560.0, 730.0, 850.0, 910.0]);
    let ediff: Array1<f64> = Array1::from_vec(vec![45.0, 80.0, 105.0, 120.0, 125.0, 128.0]);
    let tcell: Array1<f64> = Array1::from_vec(vec![14.0, 22.5, 31.0, 38.5, 44.0, 47.5]);
    let am: Array1<f64> = Array1::from_vec(vec![5.6, 2.9, 1.95, 1.55, 1.35, 1.28]);
    let aoi: Array1<f64> = Array1::from_vec(vec![72.0, 55.0, 40.0, 27.0, 16.0, 9.0]);
    let index: Array1<i64> = Array1::from_vec(vec![1_688_104_800, 1_688_108_400, 1_688_112_000, 1_688_115_600, 1_688_119_200, 1_688_122_800]);

    return SapmInputs::new(eb, ediff, tcell, am, aoi).with_index(index);
}

#[test]
fn test_cs5p_220m_matches_scalar_evaluation() {
    let _ = env_logger::builder().is_test(true).try_init();

    let module: ModuleCoefficients = cs5p_220m();
    let inputs: SapmInputs = clear_sky_day();
    let result: PerformanceResult = sapm(&module, &inputs).expect("aligned inputs");

    assert_eq!(result.len(), inputs.len());
    assert_eq!(result.index, inputs.index_or_default());

    for i_sample in 0..inputs.len() {
        let expected: PerformancePoint = reference_point(&module, inputs.eb[i_sample], inputs.ediff[i_sample], inputs.tcell[i_sample], inputs.am[i_sample], inputs.aoi[i_sample]);
        let actual: PerformancePoint = result.row(i_sample).expect("row exists");

        assert_abs_diff_eq!(actual.ee, expected.ee, epsilon = 1e-12);
        assert_abs_diff_eq!(actual.isc, expected.isc, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.imp, expected.imp, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.voc, expected.voc, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.vmp, expected.vmp, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.pmp, expected.pmp, epsilon = 1e-8);
        assert_abs_diff_eq!(actual.ix, expected.ix, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.ixx, expected.ixx, epsilon = 1e-9);

        // Ordering of the IV-curve points
        assert!(actual.isc > actual.imp);
        assert!(actual.voc > actual.vmp);
        assert!(actual.vmp > 0.0);
    }

    // Peak power is at noon
    let (peak_index, peak_power): (i64, f64) = result.peak_power().expect("finite power");
    assert_eq!(peak_index, 1_688_122_800);
    assert!(peak_power > 150.0 && peak_power < 230.0);
}

#[test]
fn test_cs5p_220m_reference_conditions() {
    let module: ModuleCoefficients = cs5p_220m();
    let inputs: SapmInputs = SapmInputs::new(
        Array1::from_vec(vec![1000.0]),
        Array1::from_vec(vec![0.0]),
        Array1::from_vec(vec![25.0]),
        Array1::from_vec(vec![1.5]),
        Array1::from_vec(vec![0.0]),
    );
    let result: PerformanceResult = sapm(&module, &inputs).expect("aligned inputs");

    // F1(1.5) is within 0.03 % of unity for this module
    assert_abs_diff_eq!(result.isc[0], module.isco, epsilon = 1e-3 * module.isco);
    assert_abs_diff_eq!(result.voc[0], module.voco, epsilon = 1e-3 * module.voco);
    assert_abs_diff_eq!(result.imp[0], module.impo, epsilon = 1e-3 * module.impo);
    assert_abs_diff_eq!(result.vmp[0], module.vmpo, epsilon = 1e-3 * module.vmpo);
    assert_abs_diff_eq!(result.pmp[0], module.impo * module.vmpo, epsilon = 1e-2 * module.impo * module.vmpo);
}

#[test]
fn test_cs5p_220m_monotonic_in_irradiance() {
    let module: ModuleCoefficients = cs5p_220m();
    let n_samples: usize = 50;
    let inputs: SapmInputs = SapmInputs::new(
        Array1::linspace(10.0, 1100.0, n_samples),
        Array1::from_elem(n_samples, 100.0),
        Array1::from_elem(n_samples, 40.0),
        Array1::from_elem(n_samples, 1.5),
        Array1::from_elem(n_samples, 25.0),
    );
    let result: PerformanceResult = sapm(&module, &inputs).expect("aligned inputs");

    for i_sample in 1..n_samples {
        assert!(result.ee[i_sample] > result.ee[i_sample - 1]);
        assert!(result.isc[i_sample] > result.isc[i_sample - 1]);
        assert!(result.voc[i_sample] > result.voc[i_sample - 1]);
    }
}

#[test]
fn test_cs5p_220m_night_samples_are_kept() {
    let module: ModuleCoefficients = cs5p_220m();
    let inputs: SapmInputs = SapmInputs::new(
        Array1::from_vec(vec![0.0, 600.0, 0.0]),
        Array1::from_vec(vec![0.0, 90.0, 0.0]),
        Array1::from_vec(vec![8.0, 35.0, 9.0]),
        Array1::from_vec(vec![1.0, 1.8, 1.0]),
        Array1::from_vec(vec![90.0, 35.0, 90.0]),
    );
    let result: PerformanceResult = sapm(&module, &inputs).expect("aligned inputs");

    assert_eq!(result.len(), 3);
    for i_sample in [0, 2] {
        assert_eq!(result.isc[i_sample], 0.0);
        assert_eq!(result.voc[i_sample], f64::NEG_INFINITY);
        assert!(result.pmp[i_sample].is_nan());
    }
    assert_eq!(result.peak_power().map(|(index, _)| index), Some(1));
}

#[test]
fn test_cs5p_220m_through_keyword_arguments() {
    let mut kwargs: HashMap<String, Argument> = HashMap::new();
    kwargs.insert("Module".to_string(), Argument::Table(cs5p_220m_table()));
    kwargs.insert("Eb".to_string(), Argument::from(vec![850.0, 910.0]));
    kwargs.insert("Ediff".to_string(), Argument::from(vec![125.0, 128.0]));
    kwargs.insert("Tcell".to_string(), Argument::from(vec![44.0, 47.5]));
    kwargs.insert("AM".to_string(), Argument::from(vec![1.35, 1.28]));
    kwargs.insert("AOI".to_string(), Argument::from(vec![16.0, 9.0]));

    let result: PerformanceResult = sapm_from_arguments(&kwargs).expect("valid arguments");
    let direct: PerformanceResult = sapm(&cs5p_220m(), &clear_sky_day()).expect("aligned inputs");

    assert_eq!(result.index, Array1::from_vec(vec![0, 1]));
    assert_eq!(result.pmp[0], direct.pmp[4]);
    assert_eq!(result.pmp[1], direct.pmp[5]);

    // A zero angle of incidence fails the declared `AOI > 0`
    kwargs.insert("AOI".to_string(), Argument::from(vec![16.0, 0.0]));
    let error: Error = sapm_from_arguments(&kwargs).expect_err("AOI = 0");
    assert_eq!(error.to_string(), "argument `AOI` fails `x>0` at index 1: value = 0");
}

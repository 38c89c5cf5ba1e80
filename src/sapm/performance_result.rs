use ndarray::{Array1, Zip};
use ndarray_stats::QuantileExt;

/// Output of `sapm`: one row per input sample, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceResult {
    pub index: Array1<i64>,
    pub ee: Array1<f64>,  // effective irradiance actually used, after clamping
    pub isc: Array1<f64>, // short-circuit current, A
    pub imp: Array1<f64>, // current at the maximum power point, A
    pub voc: Array1<f64>, // open-circuit voltage, V
    pub vmp: Array1<f64>, // voltage at the maximum power point, V
    pub pmp: Array1<f64>, // maximum power, W
    pub ix: Array1<f64>,  // auxiliary IV-curve current, A
    pub ixx: Array1<f64>, // second auxiliary IV-curve current, A
}

/// A single row of a `PerformanceResult`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformancePoint {
    pub index: i64,
    pub ee: f64,
    pub isc: f64,
    pub imp: f64,
    pub voc: f64,
    pub vmp: f64,
    pub pmp: f64,
    pub ix: f64,
    pub ixx: f64,
}

impl PerformanceResult {
    pub const COLUMN_NAMES: [&'static str; 7] = ["Isc", "Imp", "Voc", "Vmp", "Pmp", "Ix", "Ixx"];

    pub fn len(&self) -> usize {
        return self.index.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.index.is_empty();
    }

    pub fn row(&self, i_row: usize) -> Option<PerformancePoint> {
        if i_row >= self.len() {
            return None;
        }

        return Some(PerformancePoint {
            index: self.index[i_row],
            ee: self.ee[i_row],
            isc: self.isc[i_row],
            imp: self.imp[i_row],
            voc: self.voc[i_row],
            vmp: self.vmp[i_row],
            pmp: self.pmp[i_row],
            ix: self.ix[i_row],
            ixx: self.ixx[i_row],
        });
    }

    /// Look up a column by its table name, e.g. `"Pmp"`; `"Ee"` is also available
    pub fn column(&self, name: &str) -> Option<&Array1<f64>> {
        match name {
            "Ee" => Some(&self.ee),
            "Isc" => Some(&self.isc),
            "Imp" => Some(&self.imp),
            "Voc" => Some(&self.voc),
            "Vmp" => Some(&self.vmp),
            "Pmp" => Some(&self.pmp),
            "Ix" => Some(&self.ix),
            "Ixx" => Some(&self.ixx),
            _ => None,
        }
    }

    /// Index label and value of the largest finite `Pmp`
    pub fn peak_power(&self) -> Option<(i64, f64)> {
        let finite_pmp: Array1<f64> = self.pmp.mapv(|pmp: f64| if pmp.is_finite() { pmp } else { f64::NAN });
        let i_peak: usize = finite_pmp.argmax_skipnan().ok()?;

        return Some((self.index[i_peak], finite_pmp[i_peak]));
    }

    /// Rows whose effective irradiance is below `threshold`
    ///
    /// Reporting only: rows are never dropped from the result. See `LOW_IRRADIANCE_THRESHOLD`.
    pub fn low_irradiance_mask(&self, threshold: f64) -> Array1<bool> {
        let mut mask: Array1<bool> = Array1::from_elem(self.len(), false);
        Zip::from(&mut mask).and(&self.ee).for_each(|is_low: &mut bool, &ee: &f64| {
            *is_low = ee < threshold;
        });

        return mask;
    }
}

#[cfg(test)]
fn three_row_result() -> PerformanceResult {
    return PerformanceResult {
        index: Array1::from_vec(vec![30, 10, 20]),
        ee: Array1::from_vec(vec![0.0, 1.0, 0.0005]),
        isc: Array1::from_vec(vec![0.0, 8.0, 0.004]),
        imp: Array1::from_vec(vec![0.0, 7.0, 0.0035]),
        voc: Array1::from_vec(vec![f64::NEG_INFINITY, 40.0, 25.1]),
        vmp: Array1::from_vec(vec![f64::NAN, 32.0, 20.3]),
        pmp: Array1::from_vec(vec![f64::NAN, 224.0, 0.07105]),
        ix: Array1::from_vec(vec![0.0, 7.5, 0.00375]),
        ixx: Array1::from_vec(vec![0.0, 5.0, 0.0025]),
    };
}

#[test]
fn test_performance_result_row_and_column() {
    let result: PerformanceResult = three_row_result();

    assert_eq!(result.len(), 3);
    assert!(!result.is_empty());

    let row: PerformancePoint = result.row(1).expect("row exists");
    assert_eq!(row.index, 10);
    assert_eq!(row.pmp, 224.0);
    assert_eq!(row.ixx, 5.0);
    assert!(result.row(3).is_none());

    for name in PerformanceResult::COLUMN_NAMES {
        assert_eq!(result.column(name).expect("known column").len(), 3);
    }
    assert_eq!(result.column("Ee"), Some(&result.ee));
    assert!(result.column("Tcell").is_none());
}

#[test]
fn test_performance_result_peak_power_skips_nan() {
    let result: PerformanceResult = three_row_result();
    assert_eq!(result.peak_power(), Some((10, 224.0)));

    let mut dark: PerformanceResult = three_row_result();
    dark.pmp = Array1::from_vec(vec![f64::NAN, f64::NAN, f64::INFINITY]);
    assert_eq!(dark.peak_power(), None);
}

#[test]
fn test_performance_result_low_irradiance_mask() {
    let result: PerformanceResult = three_row_result();
    assert_eq!(result.low_irradiance_mask(0.001), Array1::from_vec(vec![true, false, true]));
    assert_eq!(result.low_irradiance_mask(0.0), Array1::from_vec(vec![false, false, false]));
}

use crate::errors::Error;
use std::collections::{BTreeMap, HashMap};

/// Alternative spellings found in Sandia module tables; the canonical key wins when both are present
const ALIASES: [(&str, &str); 3] = [("Ixo", "IXO"), ("Ixxo", "IXXO"), ("#Series", "Cells_in_Series")];

/// Empirical SAPM coefficients of one PV module model
///
/// Field names follow the Sandia module table keys (`A0` -> `a0`, `#Series` -> `cells_in_series`).
/// Units: currents in A, voltages in V, `aisc`/`aimp` in 1/°C, `bvoco`/`bvmpo` in V/°C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleCoefficients {
    // Air-mass (spectral) polynomial
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub a4: f64,
    // Angle-of-incidence polynomial
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    pub b4: f64,
    pub b5: f64,
    pub fd: f64,
    // Reference values at standard test conditions
    pub isco: f64,
    pub impo: f64,
    pub voco: f64,
    pub vmpo: f64,
    pub ixo: f64,
    pub ixxo: f64,
    pub aisc: f64,
    pub aimp: f64,
    pub mbvoc: f64,
    pub mbvmp: f64,
    pub bvoco: f64,
    pub bvmpo: f64,
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
    pub c5: f64,
    pub c6: f64,
    pub c7: f64,
    pub n: f64,
    pub cells_in_series: f64,
}

impl ModuleCoefficients {
    /// Build the coefficients from a name -> value table
    ///
    /// Fails with `Error::MissingCoefficient` naming the first absent key, in the order
    /// A0..A4, B0..B5, FD, Isco, Impo, Voco, Vmpo, Ixo, Ixxo, Aisc, Aimp, Mbvoc, Mbvmp, Bvoco, Bvmpo, C0..C7, N, #Series.
    /// Keys which are not coefficients (e.g. `Area`, `Vintage`) are ignored.
    pub fn from_map(coefficients: &BTreeMap<String, f64>) -> Result<Self, Error> {
        let get = |name: &'static str| -> Result<f64, Error> {
            if let Some(value) = coefficients.get(name) {
                return Ok(*value);
            }
            for (canonical, alias) in ALIASES {
                if canonical == name {
                    if let Some(value) = coefficients.get(alias) {
                        return Ok(*value);
                    }
                }
            }
            return Err(Error::MissingCoefficient { name });
        };

        // Struct fields are evaluated in source order, so the first missing key is reported
        let module_coefficients: ModuleCoefficients = ModuleCoefficients {
            a0: get("A0")?,
            a1: get("A1")?,
            a2: get("A2")?,
            a3: get("A3")?,
            a4: get("A4")?,
            b0: get("B0")?,
            b1: get("B1")?,
            b2: get("B2")?,
            b3: get("B3")?,
            b4: get("B4")?,
            b5: get("B5")?,
            fd: get("FD")?,
            isco: get("Isco")?,
            impo: get("Impo")?,
            voco: get("Voco")?,
            vmpo: get("Vmpo")?,
            ixo: get("Ixo")?,
            ixxo: get("Ixxo")?,
            aisc: get("Aisc")?,
            aimp: get("Aimp")?,
            mbvoc: get("Mbvoc")?,
            mbvmp: get("Mbvmp")?,
            bvoco: get("Bvoco")?,
            bvmpo: get("Bvmpo")?,
            c0: get("C0")?,
            c1: get("C1")?,
            c2: get("C2")?,
            c3: get("C3")?,
            c4: get("C4")?,
            c5: get("C5")?,
            c6: get("C6")?,
            c7: get("C7")?,
            n: get("N")?,
            cells_in_series: get("#Series")?,
        };

        return Ok(module_coefficients);
    }

    /// Air-mass polynomial, highest order first: [A4, A3, A2, A1, A0]
    pub fn air_mass_polynomial(&self) -> [f64; 5] {
        return [self.a4, self.a3, self.a2, self.a1, self.a0];
    }

    /// Angle-of-incidence polynomial, highest order first: [B5, B4, B3, B2, B1, B0]
    pub fn angle_of_incidence_polynomial(&self) -> [f64; 6] {
        return [self.b5, self.b4, self.b3, self.b2, self.b1, self.b0];
    }
}

impl TryFrom<&BTreeMap<String, f64>> for ModuleCoefficients {
    type Error = Error;

    fn try_from(coefficients: &BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        return ModuleCoefficients::from_map(coefficients);
    }
}

impl TryFrom<&HashMap<String, f64>> for ModuleCoefficients {
    type Error = Error;

    fn try_from(coefficients: &HashMap<String, f64>) -> Result<Self, Self::Error> {
        let sorted: BTreeMap<String, f64> = coefficients.iter().map(|(name, value)| (name.to_owned(), *value)).collect();
        return ModuleCoefficients::from_map(&sorted);
    }
}

/// Coefficient table of a made-up module whose spectral and angular corrections are both 1
#[cfg(test)]
pub(crate) fn flat_response_table() -> BTreeMap<String, f64> {
    let entries: [(&str, f64); 34] = [
        ("A0", 1.0),
        ("A1", 0.0),
        ("A2", 0.0),
        ("A3", 0.0),
        ("A4", 0.0),
        ("B0", 1.0),
        ("B1", 0.0),
        ("B2", 0.0),
        ("B3", 0.0),
        ("B4", 0.0),
        ("B5", 0.0),
        ("FD", 1.0),
        ("Isco", 8.0),
        ("Impo", 7.0),
        ("Voco", 40.0),
        ("Vmpo", 32.0),
        ("Ixo", 7.5),
        ("Ixxo", 5.0),
        ("Aisc", 0.0),
        ("Aimp", 0.0),
        ("Mbvoc", 0.0),
        ("Mbvmp", 0.0),
        ("Bvoco", -0.15),
        ("Bvmpo", -0.16),
        ("C0", 1.0),
        ("C1", 0.0),
        ("C2", 0.3),
        ("C3", -5.0),
        ("C4", 1.0),
        ("C5", 0.0),
        ("C6", 1.0),
        ("C7", 0.0),
        ("N", 1.2),
        ("#Series", 60.0),
    ];
    return entries.iter().map(|(name, value)| (name.to_string(), *value)).collect();
}

#[cfg(test)]
pub(crate) fn flat_response_module() -> ModuleCoefficients {
    return ModuleCoefficients::from_map(&flat_response_table()).expect("complete coefficient table");
}

#[test]
fn test_module_coefficients_from_map() {
    let module: ModuleCoefficients = flat_response_module();

    assert_eq!(module.isco, 8.0);
    assert_eq!(module.ixo, 7.5);
    assert_eq!(module.cells_in_series, 60.0);
    assert_eq!(module.air_mass_polynomial(), [0.0, 0.0, 0.0, 0.0, 1.0]);
    assert_eq!(module.angle_of_incidence_polynomial(), [0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_module_coefficients_polynomial_order() {
    let mut table: BTreeMap<String, f64> = flat_response_table();
    for (i_coefficient, name) in ["A0", "A1", "A2", "A3", "A4"].iter().enumerate() {
        table.insert(name.to_string(), i_coefficient as f64);
    }
    for (i_coefficient, name) in ["B0", "B1", "B2", "B3", "B4", "B5"].iter().enumerate() {
        table.insert(name.to_string(), 10.0 + i_coefficient as f64);
    }

    let module: ModuleCoefficients = ModuleCoefficients::from_map(&table).expect("complete coefficient table");
    assert_eq!(module.air_mass_polynomial(), [4.0, 3.0, 2.0, 1.0, 0.0]);
    assert_eq!(module.angle_of_incidence_polynomial(), [15.0, 14.0, 13.0, 12.0, 11.0, 10.0]);
}

#[test]
fn test_module_coefficients_missing_key() {
    let mut table: BTreeMap<String, f64> = flat_response_table();
    table.remove("C7");
    table.remove("Mbvoc");

    let error: Error = ModuleCoefficients::from_map(&table).expect_err("incomplete table");
    assert_eq!(error, Error::MissingCoefficient { name: "Mbvoc" });
    assert_eq!(error.to_string(), "module coefficient `Mbvoc` is missing");
}

#[test]
fn test_module_coefficients_aliases() {
    // Spelling used in the Sandia database files
    let mut table: BTreeMap<String, f64> = flat_response_table();
    table.remove("Ixo");
    table.remove("Ixxo");
    table.remove("#Series");
    table.insert("IXO".to_string(), 4.97599);
    table.insert("IXXO".to_string(), 3.18803);
    table.insert("Cells_in_Series".to_string(), 96.0);
    table.insert("Area".to_string(), 1.701);

    let module: ModuleCoefficients = ModuleCoefficients::try_from(&table).expect("aliases are accepted");
    assert_eq!(module.ixo, 4.97599);
    assert_eq!(module.ixxo, 3.18803);
    assert_eq!(module.cells_in_series, 96.0);

    // The canonical key takes precedence over its alias
    table.insert("Ixo".to_string(), 1.0);
    let module: ModuleCoefficients = ModuleCoefficients::try_from(&table).expect("aliases are accepted");
    assert_eq!(module.ixo, 1.0);

    // Missing under both spellings reports the canonical name
    table.remove("#Series");
    table.remove("Cells_in_Series");
    let error: Error = ModuleCoefficients::try_from(&table).expect_err("no cell count");
    assert_eq!(error, Error::MissingCoefficient { name: "#Series" });
}

#[test]
fn test_module_coefficients_from_hash_map() {
    let table: HashMap<String, f64> = flat_response_table().into_iter().collect();
    let module: ModuleCoefficients = ModuleCoefficients::try_from(&table).expect("complete coefficient table");
    assert_eq!(module, flat_response_module());
}

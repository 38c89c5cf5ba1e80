use ndarray::Array1;

/// Evaluate a polynomial at every element of `x`
///
/// `coefficients` are ordered highest power first, so `[c2, c1, c0]` is `c2 * x^2 + c1 * x + c0`.
/// Evaluated with Horner's scheme. An empty coefficient list is the zero polynomial.
///
/// # Examples
///
/// ```
/// use ndarray::Array1;
/// use sapm_rs::polyval;
///
/// let x: Array1<f64> = Array1::from_vec(vec![0.0, 1.0, 2.0]);
/// let y: Array1<f64> = polyval(&[1.0, -2.0, 3.0], &x); // x^2 - 2x + 3
/// assert_eq!(y, Array1::from_vec(vec![3.0, 2.0, 3.0]));
/// ```
pub fn polyval(coefficients: &[f64], x: &Array1<f64>) -> Array1<f64> {
    let mut value: Array1<f64> = Array1::zeros(x.len());
    for coefficient in coefficients {
        value = value * x + *coefficient;
    }

    return value;
}

#[test]
fn test_polyval_against_direct_sum() {
    // Lazy loading for crates which are only used within the tests
    use approx::assert_abs_diff_eq;

    // Sandia air-mass coefficients of a c-Si module, A4 first
    let coefficients: [f64; 5] = [-6.93e-05, 0.0016606, -0.0157738, 0.068093, 0.928385];
    let x: Array1<f64> = Array1::linspace(1.0, 10.0, 19);

    let horner: Array1<f64> = polyval(&coefficients, &x);
    let direct: Array1<f64> = x.mapv(|x_value: f64| {
        let mut total: f64 = 0.0;
        for (i_power, coefficient) in coefficients.iter().rev().enumerate() {
            total += coefficient * x_value.powi(i_power as i32);
        }
        return total;
    });

    assert_abs_diff_eq!(horner, direct, epsilon = 1e-12);
}

#[test]
fn test_polyval_degenerate_inputs() {
    let x: Array1<f64> = Array1::from_vec(vec![-1.0, 0.5, 7.0]);

    assert_eq!(polyval(&[], &x), Array1::<f64>::zeros(3));
    assert_eq!(polyval(&[2.5], &x), Array1::from_elem(3, 2.5));
    assert_eq!(polyval(&[1.0, 2.0], &Array1::<f64>::zeros(0)).len(), 0);
}

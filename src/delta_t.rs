//! Delta T, the wet-bulb depression indicator used to judge spraying
//! conditions.
//!
//! Delta T is the difference between the dry-bulb air temperature and the
//! wet-bulb temperature. Growers spray when it sits roughly between 2 and 8:
//! below that droplets stay too long and drift, above it they evaporate
//! before reaching the crop.
//!
//! The wet-bulb temperature comes from the Stull (2011) empirical fit on
//! temperature (°C) and relative humidity (%):
//!
//! ```text
//! Tw = T·atan(0.151977·√(RH + 8.313659)) + atan(T + RH) − atan(RH − 1.676331)
//!      + 0.00391838·RH^1.5·atan(0.023101·RH) − 4.686035
//! ΔT = T − Tw
//! ```

// ---

/// Compute Delta T for a temperature (°C) and relative humidity (%),
/// rounded to 2 decimals.
///
/// Returns `None` when either input is missing. Inputs are not range checked;
/// a result the fit cannot produce (e.g. humidity below −8.313659) is also
/// `None` rather than a NaN.
pub fn delta_t(temperature: Option<f64>, humidity: Option<f64>) -> Option<f64> {
    // ---
    let (t, rh) = (temperature?, humidity?);

    let term1 = t * (0.151977 * (rh + 8.313659).sqrt()).atan();
    let term2 = (t + rh).atan();
    let term3 = (rh - 1.676331).atan();
    let term4 = 0.00391838 * rh.powf(1.5) * (0.023101 * rh).atan();
    let wet_bulb = (term1 + term2) - term3 + term4 - 4.686035;

    let result = round_to(t - wet_bulb, 2);
    result.is_finite().then_some(result)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    // ---
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

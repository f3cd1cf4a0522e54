/// Decimal places kept in every published statistic.
pub const STAT_DECIMALS: i32 = 3;

/// Rounds half away from zero to [`STAT_DECIMALS`] places.
pub fn round3(v: f64) -> f64 {
    let scale = 10_f64.powi(STAT_DECIMALS);
    (v * scale).round() / scale
}

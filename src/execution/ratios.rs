use crate::models::Ratio;

/// Default reward:risk multiples for fixed-ratio mode
/// (1:1, 2:1, 3:1, 4:1, 5:1, 3:2, 5:2, 4:3, 5:3, 5:4).
pub const DEFAULT_MULTIPLES: [f64; 10] = [
    1.0,
    2.0,
    3.0,
    4.0,
    5.0,
    3.0 / 2.0,
    5.0 / 2.0,
    4.0 / 3.0,
    5.0 / 3.0,
    5.0 / 4.0,
];

/// Fixed-ratio mode: a single scalar drives both legs, with its reciprocal
/// on the stop-loss side. One of two coexisting generation policies; the
/// paired generator below treats the legs independently and the two must
/// not be merged, since callers depend on each distinctly.
pub fn generate_symmetric_ratios(multiples: &[f64]) -> Vec<Ratio> {
    multiples
        .iter()
        .map(|&m| Ratio {
            take_profit: m,
            stop_loss: 1.0 / m,
        })
        .collect()
}

/// Paired-ratio mode: every (numerator, denominator) combination with
/// `1 <= denominator <= numerator <= max_ratio`, scaled by 1/100 into
/// independent take-profit/stop-loss percentages.
///
/// Produces exactly `max_ratio * (max_ratio + 1) / 2` pairs.
pub fn generate_paired_ratios(max_ratio: u32) -> Vec<Ratio> {
    let mut ratios = Vec::new();
    for denominator in 1..=max_ratio {
        // Start at `denominator` so the 1:1 pair of each row is included
        for numerator in denominator..=max_ratio {
            ratios.push(Ratio {
                take_profit: round_to_cents(numerator as f64 / 100.0),
                stop_loss: round_to_cents(denominator as f64 / 100.0),
            });
        }
    }
    ratios
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Bracket-order construction and concurrent dispatch
pub mod dispatcher;
pub mod ratios;

pub use dispatcher::{bracket_prices, DispatchResult, Dispatcher};
pub use ratios::{generate_paired_ratios, generate_symmetric_ratios, DEFAULT_MULTIPLES};

// ============================================================================
// Module : indicators
// ============================================================================
// Indicateurs techniques calculés sur la fenêtre de prix
// ============================================================================

pub mod rsi;

pub use rsi::{compute_rsi, Rsi, RsiZone, RSI_PERIOD};

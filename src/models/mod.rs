// ============================================================================
// Module : models
// ============================================================================
// Structures de données : fenêtre de prix et lignes de résultat
// ============================================================================

pub mod price_window;   // Fenêtre glissante des prix (price_window.rs)
pub mod token_snapshot; // Ligne de sortie par token (token_snapshot.rs)

// Re-export des structures principales pour simplifier les imports
// On peut faire : use tokenpulse::models::PriceWindow;
pub use price_window::{PriceWindow, WINDOW_CAPACITY};
pub use token_snapshot::{MarketStats, TokenSnapshot};

// ============================================================================
// TokenPulse - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod analyzer;   // Cycle de polling (fetch -> RSI -> rapports)
pub mod api;        // API DexScreener
pub mod config;     // Arguments CLI / variables d'environnement
pub mod indicators; // RSI
pub mod models;     // Structures de données
pub mod report;     // Fichier JSON + tableau texte

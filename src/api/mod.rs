// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client de l'API de marché (DexScreener) et le trait
// qui permet de le remplacer (tests, autre fournisseur)
// ============================================================================

use anyhow::Result;
use async_trait::async_trait;

pub mod dexscreener; // Client API DexScreener

// Re-export des éléments principaux
pub use dexscreener::{fetch_pair_metrics, parse_first_pair, DexScreenerClient, PairMetrics, DEFAULT_API_BASE};

/// Réponse HTTP brute : statut + corps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Source de données de paires pour un identifiant de token
///
/// CONCEPT RUST : trait + async_trait
/// - Les méthodes async dans un trait passent par #[async_trait]
/// - L'analyseur est générique sur ce trait : client HTTP en prod, faux en test
#[async_trait]
pub trait PairSource: Send + Sync {
    /// Un GET pour un token. Un statut non-200 n'est PAS une erreur ici
    async fn fetch_pairs(&self, token: &str) -> Result<RawResponse>;
}

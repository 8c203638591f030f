// ============================================================================
// Structures : MarketStats et TokenSnapshot
// ============================================================================
// Une ligne de résultat par token et par cycle de polling
//
// CONCEPTS RUST :
// 1. #[serde(rename = "...")] : les clés JSON gardent le format historique
//    du fichier d'analyse ("Symbol", "priceChg_5m", ...)
// 2. Option<f64> : RSI absent => null dans le JSON
// 3. L'ordre des champs de la struct = l'ordre des clés dans le JSON
// ============================================================================

use serde::{Deserialize, Serialize};

/// Statistiques de marché sur deux fenêtres (5 minutes et 1 heure)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarketStats {
    pub buys_5m: i64,
    pub buys_1h: i64,
    pub sells_5m: i64,
    pub sells_1h: i64,
    /// Volumes en USD, tronqués à l'entier
    pub volume_5m: i64,
    pub volume_1h: i64,
    /// Variation de prix en pourcentage
    pub price_change_5m: f64,
    pub price_change_1h: f64,
}

/// Résultat d'analyse d'un token pour un cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    #[serde(rename = "Symbol")]
    pub symbol: String,

    #[serde(rename = "Price")]
    pub price: f64,

    /// None tant que la fenêtre n'a pas assez d'historique
    #[serde(rename = "RSI")]
    pub rsi: Option<f64>,

    pub buys_5m: i64,
    pub buys_1h: i64,
    pub sales_5m: i64,
    pub sales_1h: i64,
    pub vol_5m: i64,
    pub vol_1h: i64,

    #[serde(rename = "priceChg_5m")]
    pub price_chg_5m: f64,

    #[serde(rename = "priceChg_1h")]
    pub price_chg_1h: f64,
}

impl TokenSnapshot {
    /// Noms des colonnes, dans l'ordre du JSON
    pub const COLUMNS: [&'static str; 11] = [
        "Symbol",
        "Price",
        "RSI",
        "buys_5m",
        "buys_1h",
        "sales_5m",
        "sales_1h",
        "vol_5m",
        "vol_1h",
        "priceChg_5m",
        "priceChg_1h",
    ];

    /// Assemble une ligne à partir du prix, du RSI et des stats de marché
    pub fn new(symbol: String, price: f64, rsi: Option<f64>, stats: &MarketStats) -> Self {
        Self {
            symbol,
            price,
            rsi,
            buys_5m: stats.buys_5m,
            buys_1h: stats.buys_1h,
            sales_5m: stats.sells_5m,
            sales_1h: stats.sells_1h,
            vol_5m: stats.volume_5m,
            vol_1h: stats.volume_1h,
            price_chg_5m: stats.price_change_5m,
            price_chg_1h: stats.price_change_1h,
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

// ============================================================================
// API Client : DexScreener
// ============================================================================
// Récupère prix et activité d'un token depuis l'API publique DexScreener
//
// CONCEPTS RUST :
// 1. async/await : les requêtes HTTP sont des Futures
// 2. Serde + Option : tout champ absent ou null devient None, puis 0 / ""
// 3. #[serde(untagged)] : priceUsd arrive en string OU en nombre
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::api::{PairSource, RawResponse};
use crate::models::MarketStats;

/// Endpoint par défaut (le token est ajouté à la fin du chemin)
pub const DEFAULT_API_BASE: &str = "https://api.dexscreener.com/latest/dex/tokens";

// ============================================================================
// Structures pour parser la réponse JSON de DexScreener
// ============================================================================
// Seuls les champs utilisés sont déclarés, serde ignore le reste
// ============================================================================

#[derive(Debug, Deserialize)]
struct DexResponse {
    pairs: Option<Vec<Pair>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")] // baseToken, priceUsd, priceChange
struct Pair {
    base_token: Option<BaseToken>,
    price_usd: Option<Numeric>,
    txns: Option<Txns>,
    volume: Option<Buckets>,
    price_change: Option<Buckets>,
}

#[derive(Debug, Deserialize)]
struct BaseToken {
    symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Txns {
    m5: Option<TxnCounts>,
    h1: Option<TxnCounts>,
}

/// Nombre d'achats / ventes sur une fenêtre
///
/// Lus en f64 puis tronqués vers zéro (signe conservé) : l'API renvoie
/// parfois des flottants
#[derive(Debug, Default, Deserialize)]
struct TxnCounts {
    buys: Option<f64>,
    sells: Option<f64>,
}

/// Valeurs numériques indexées par fenêtre de temps
#[derive(Debug, Default, Deserialize)]
struct Buckets {
    m5: Option<f64>,
    h1: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn to_f64(&self) -> f64 {
        match self {
            Numeric::Number(value) => *value,
            // "NaN" / "inf" se parsent en f64 mais ne passent pas en JSON
            Numeric::Text(text) => match text.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => value,
                _ => {
                    warn!(value = %text, "Unparseable numeric field, defaulting to 0");
                    0.0
                }
            },
        }
    }
}

// ============================================================================
// Données extraites de la première paire
// ============================================================================

/// Ce qu'on retient d'une réponse DexScreener
#[derive(Debug, Clone, PartialEq)]
pub struct PairMetrics {
    /// Symbole du token de base (vide si absent)
    pub symbol: String,
    /// Prix en USD (0 si absent)
    pub price_usd: f64,
    pub stats: MarketStats,
}

/// Parse le corps d'une réponse et extrait la première paire
///
/// Liste `pairs` absente, null ou vide => paire par défaut (tout à zéro)
pub fn parse_first_pair(body: &str) -> Result<PairMetrics> {
    let response: DexResponse =
        serde_json::from_str(body).context("Échec du parsing JSON de la réponse DexScreener")?;

    // CONCEPT RUST : Option<Vec<T>> -> T
    // - .into_iter().flatten() : None => itérateur vide
    // - .next() : première paire
    let pair = response
        .pairs
        .into_iter()
        .flatten()
        .next()
        .unwrap_or_default();

    let txns = pair.txns.unwrap_or_default();
    let m5 = txns.m5.unwrap_or_default();
    let h1 = txns.h1.unwrap_or_default();
    let volume = pair.volume.unwrap_or_default();
    let price_change = pair.price_change.unwrap_or_default();

    // `as i64` tronque vers zéro en gardant le signe (et sature aux bornes)
    let stats = MarketStats {
        buys_5m: m5.buys.unwrap_or(0.0) as i64,
        buys_1h: h1.buys.unwrap_or(0.0) as i64,
        sells_5m: m5.sells.unwrap_or(0.0) as i64,
        sells_1h: h1.sells.unwrap_or(0.0) as i64,
        volume_5m: volume.m5.unwrap_or(0.0) as i64,
        volume_1h: volume.h1.unwrap_or(0.0) as i64,
        price_change_5m: price_change.m5.unwrap_or(0.0),
        price_change_1h: price_change.h1.unwrap_or(0.0),
    };

    Ok(PairMetrics {
        symbol: pair
            .base_token
            .and_then(|token| token.symbol)
            .unwrap_or_default(),
        price_usd: pair.price_usd.map(|price| price.to_f64()).unwrap_or(0.0),
        stats,
    })
}

/// Récupère les métriques d'un token via une source de paires
///
/// # Retourne
/// * `Ok(Some(metrics))` : réponse HTTP 200 parsée
/// * `Ok(None)` : statut différent de 200, le token est ignoré pour ce cycle
/// * `Err(_)` : erreur réseau ou corps illisible
#[instrument(skip(source))]
pub async fn fetch_pair_metrics<S>(source: &S, token: &str) -> Result<Option<PairMetrics>>
where
    S: PairSource + ?Sized,
{
    let response = source.fetch_pairs(token).await?;
    debug!(status = response.status, "Received HTTP response");

    if response.status != 200 {
        warn!(status = response.status, "Failed to fetch data for token: {}", token);
        return Ok(None);
    }

    let metrics = parse_first_pair(&response.body)
        .with_context(|| format!("Réponse invalide pour le token {}", token))?;
    debug!(symbol = %metrics.symbol, price = metrics.price_usd, "Parsed first pair");
    Ok(Some(metrics))
}

// ============================================================================
// Client HTTP réel
// ============================================================================

/// Client reqwest vers l'API DexScreener
pub struct DexScreenerClient {
    client: reqwest::Client,
    base_url: String,
}

impl DexScreenerClient {
    /// Crée le client une seule fois (pool de connexions réutilisé)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tokenpulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Échec de la création du client HTTP")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "DexScreener client ready");

        Ok(Self { client, base_url })
    }

    /// Construit l'URL : {base}/{token}
    pub fn build_url(&self, token: &str) -> String {
        format!("{}/{}", self.base_url, token)
    }
}

#[async_trait]
impl PairSource for DexScreenerClient {
    async fn fetch_pairs(&self, token: &str) -> Result<RawResponse> {
        let url = self.build_url(token);
        debug!(url = %url, "Sending HTTP request to DexScreener");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Échec de la requête HTTP vers DexScreener")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Échec de la lecture de la réponse DexScreener")?;

        Ok(RawResponse { status, body })
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

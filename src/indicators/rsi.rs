// ============================================================================
// Indicateur : RSI (Relative Strength Index)
// ============================================================================
// Mesure le momentum en comparant les hausses récentes aux baisses récentes
// Valeur entre 0 et 100 :
// - < 30 : survendu (oversold)
// - > 70 : suracheté (overbought)
//
// Variante utilisée : moyenne simple des `period` DERNIÈRES variations
// (pas de lissage de Wilder). Les tableaux de gains/pertes couvrent toute la
// série fournie, seule la queue est moyennée.
// ============================================================================

/// Période de calcul par défaut
pub const RSI_PERIOD: usize = 14;

/// Calcule le RSI d'une série de prix (plus ancien en premier)
///
/// # Retourne
/// * `None` si la série contient moins de `period` prix (historique insuffisant)
/// * `Some(rsi)` avec rsi dans [0, 100] sinon
/// * `Some(100.0)` si la perte moyenne est nulle (écrit `100.0` dans le JSON,
///   jamais l'entier `100`)
///
/// Le diviseur est toujours `period`, même quand moins de `period` variations
/// existent (ex : 14 prix => 13 variations divisées par 14).
pub fn compute_rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    // CONCEPT RUST : windows(2)
    // - Itère sur chaque paire consécutive [prev, current]
    // - Variation nulle => 0 en gain ET 0 en perte
    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|pair| {
            let change = pair[1] - pair[0];
            if change > 0.0 {
                (change, 0.0)
            } else if change < 0.0 {
                (0.0, change.abs())
            } else {
                (0.0, 0.0)
            }
        })
        .unzip();

    let avg_gain = trailing_sum(&gains, period) / period as f64;
    let avg_loss = trailing_sum(&losses, period) / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}

/// Somme des `count` derniers éléments, de gauche à droite
fn trailing_sum(values: &[f64], count: usize) -> f64 {
    let start = values.len().saturating_sub(count);
    values[start..].iter().fold(0.0, |acc, v| acc + v)
}

/// RSI avec une période fixée
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn compute(&self, prices: &[f64]) -> Option<f64> {
        compute_rsi(prices, self.period)
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(RSI_PERIOD)
    }
}

/// Zone de lecture du RSI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi < 30.0 {
            RsiZone::Oversold
        } else if rsi > 70.0 {
            RsiZone::Overbought
        } else {
            RsiZone::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RsiZone::Oversold => "oversold",
            RsiZone::Neutral => "neutral",
            RsiZone::Overbought => "overbought",
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

// ============================================================================
// Configuration
// ============================================================================
// Arguments CLI avec valeurs par défaut ; chaque option peut aussi être
// fournie par une variable d'environnement TOKENPULSE_*
//
// CONCEPT RUST : #[derive(Parser)]
// - clap génère le parsing des arguments à partir de la struct
// - default_value : aucune option n'est obligatoire
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::api::DEFAULT_API_BASE;

/// Surveille des tokens DexScreener et calcule leur RSI en continu
#[derive(Debug, Clone, Parser)]
#[command(name = "tokenpulse", version, about)]
pub struct Config {
    /// Fichier listant les tokens (un identifiant par ligne)
    #[arg(long = "tokens", env = "TOKENPULSE_TOKENS", default_value = "predefined_tokens.txt")]
    pub token_list: PathBuf,

    /// Fichier JSON des résultats, réécrit à chaque cycle
    #[arg(long, env = "TOKENPULSE_ANALYSIS_FILE", default_value = "tokens_analyzed.json")]
    pub analysis_file: PathBuf,

    /// Fichier texte du tableau, réécrit à chaque cycle
    #[arg(long, env = "TOKENPULSE_TABLE_FILE", default_value = "tabulated_tokens.txt")]
    pub table_file: PathBuf,

    /// Pause entre deux cycles, en secondes
    #[arg(long, env = "TOKENPULSE_INTERVAL_SECS", default_value_t = 5)]
    pub interval_secs: u64,

    /// URL de base de l'API (le token est ajouté au chemin)
    #[arg(long, env = "TOKENPULSE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Répertoire des logs (rotation quotidienne)
    #[arg(long, env = "TOKENPULSE_LOG_DIR", default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Exécute un seul cycle puis quitte
    #[arg(long)]
    pub once: bool,
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Chemins utilisés par l'analyseur
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerPaths {
    pub token_list: PathBuf,
    pub analysis_file: PathBuf,
    pub table_file: PathBuf,
}

impl From<&Config> for AnalyzerPaths {
    fn from(config: &Config) -> Self {
        Self {
            token_list: config.token_list.clone(),
            analysis_file: config.analysis_file.clone(),
            table_file: config.table_file.clone(),
        }
    }
}

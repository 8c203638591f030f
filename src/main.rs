// ============================================================================
// TokenPulse - Point d'entrée
// ============================================================================
// Interroge DexScreener pour une liste de tokens, calcule le RSI de chacun
// et réécrit à chaque cycle :
// - tokens_analyzed.json : résultats bruts
// - tabulated_tokens.txt : tableau lisible
//
// CONCEPTS RUST CLÉS :
// 1. Runtime tokio "current thread" : un seul thread, tokens traités un par un
// 2. block_on : main() reste synchrone et pilote la boucle async
// 3. anyhow : toute erreur remontée jusqu'ici arrête le processus
// ============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use tokenpulse::analyzer::TokenAnalyzer;
use tokenpulse::api::DexScreenerClient;
use tokenpulse::config::{AnalyzerPaths, Config};

// ============================================================================
// Initialisation du logging
// ============================================================================
// Deux sorties :
// - stdout : lignes horodatées, lisibles pendant que la boucle tourne
// - fichier : rotation quotidienne dans log_dir
// ============================================================================

/// Initialise le système de logging (stdout + fichier)
///
/// CONCEPT RUST : Tracing subscriber
/// - Registry : point central des logs
/// - Layer : transforme et route les logs (un layer par sortie)
/// - EnvFilter : filtre par niveau (RUST_LOG env var)
///
/// # Utilisation
/// ```bash
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=tokenpulse=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Crée le répertoire s'il n'existe pas
    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    // Nouveau fichier chaque jour : tokenpulse.log.2026-10-18
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "tokenpulse.log");

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: tokenpulse::analyzer)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour tokenpulse, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tokenpulse=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(log_dir = %log_dir.display(), "Logging initialisé");
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();

    // Si init échoue, on affiche l'erreur et on continue sans logs
    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(
        tokens = %config.token_list.display(),
        analysis_file = %config.analysis_file.display(),
        table_file = %config.table_file.display(),
        "TokenPulse starting up"
    );

    // CONCEPT RUST : un runtime mono-thread suffit
    // - Un seul appel réseau à la fois, aucune tâche concurrente
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Échec de la création du runtime tokio")?;

    let client = DexScreenerClient::new(config.api_base.clone())?;
    let mut analyzer = TokenAnalyzer::new(client, AnalyzerPaths::from(&config));

    let result = runtime.block_on(async {
        if config.once {
            analyzer.run_cycle().await.map(|_| ())
        } else {
            analyzer.run_forever(config.interval()).await
        }
    });

    match &result {
        Ok(_) => info!("Single cycle finished"),
        Err(e) => error!(error = ?e, "Polling stopped with error"),
    }

    result
}

// ============================================================================
// Structure : TokenAnalyzer
// ============================================================================
// Un cycle de polling :
// 1. Supprime l'ancien fichier d'analyse
// 2. Relit la liste des tokens
// 3. Pour chaque token (séquentiellement) : fetch, fenêtre de prix, RSI
// 4. Écrit le JSON puis le tableau texte
//
// CONCEPTS RUST :
// 1. Générique sur PairSource : client HTTP réel ou faux client de test
// 2. HashMap<String, PriceWindow> : une fenêtre par token, possédée par l'analyseur
// 3. &mut self : seul le cycle en cours modifie les fenêtres
// ============================================================================

use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::api::{fetch_pair_metrics, PairSource};
use crate::config::AnalyzerPaths;
use crate::indicators::{Rsi, RsiZone};
use crate::models::{PriceWindow, TokenSnapshot};
use crate::report;

/// Bilan d'un cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Lignes écrites dans le fichier d'analyse
    pub snapshots: Vec<TokenSnapshot>,
    /// Tokens ignorés (statut HTTP != 200)
    pub skipped: Vec<String>,
    /// true si le fichier JSON a été écrit
    pub analysis_written: bool,
    /// true si le tableau texte a été réécrit
    pub table_written: bool,
}

impl CycleReport {
    pub fn analyzed(&self) -> usize {
        self.snapshots.len()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Résultat de la phase d'analyse (avant le tableau)
struct Analysis {
    snapshots: Vec<TokenSnapshot>,
    skipped: Vec<String>,
    written: bool,
}

/// Analyseur de tokens : possède la source de données et les fenêtres de prix
pub struct TokenAnalyzer<S> {
    source: S,
    paths: AnalyzerPaths,
    rsi: Rsi,
    windows: HashMap<String, PriceWindow>,
}

impl<S: PairSource> TokenAnalyzer<S> {
    pub fn new(source: S, paths: AnalyzerPaths) -> Self {
        Self {
            source,
            paths,
            rsi: Rsi::default(),
            windows: HashMap::new(),
        }
    }

    /// Fenêtre de prix d'un token (None s'il n'a jamais été analysé)
    pub fn window(&self, token: &str) -> Option<&PriceWindow> {
        self.windows.get(token)
    }

    pub fn paths(&self) -> &AnalyzerPaths {
        &self.paths
    }

    /// Relit la liste des tokens ; lignes vides ignorées
    pub fn load_tokens(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.paths.token_list).with_context(|| {
            format!(
                "Échec de la lecture de la liste de tokens {}",
                self.paths.token_list.display()
            )
        })?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Exécute un cycle complet : analyse puis tableau
    #[instrument(skip(self))]
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let started_at = Utc::now();

        let analysis = self.analyze_data().await?;
        let table_written = self.save_tabulated()?;

        let report = CycleReport {
            started_at,
            finished_at: Utc::now(),
            snapshots: analysis.snapshots,
            skipped: analysis.skipped,
            analysis_written: analysis.written,
            table_written,
        };

        info!(
            analyzed = report.analyzed(),
            skipped = report.skipped.len(),
            elapsed_ms = report.duration().num_milliseconds(),
            "Cycle complete"
        );
        Ok(report)
    }

    /// Boucle infinie : un cycle, puis pause fixe
    ///
    /// Ne retourne qu'en cas d'erreur (fatale pour le processus)
    pub async fn run_forever(&mut self, interval: Duration) -> Result<()> {
        info!(interval_secs = interval.as_secs(), "Starting polling loop");
        loop {
            self.run_cycle().await?;
            tokio::time::sleep(interval).await;
        }
    }

    async fn analyze_data(&mut self) -> Result<Analysis> {
        if report::remove_if_exists(&self.paths.analysis_file)? {
            debug!(path = %self.paths.analysis_file.display(), "Removed previous analysis file");
        }

        let tokens = self.load_tokens()?;
        debug!(count = tokens.len(), "Loaded token list");

        let mut snapshots = Vec::new();
        let mut skipped = Vec::new();

        for token in tokens {
            let metrics = match fetch_pair_metrics(&self.source, &token).await? {
                Some(metrics) => metrics,
                None => {
                    skipped.push(token);
                    continue;
                }
            };

            // CONCEPT RUST : Entry API
            // - or_default() crée la fenêtre vide au premier passage du token
            let window = self.windows.entry(token).or_default();
            window.append(metrics.price_usd);

            let rsi = self.rsi.compute(&window.snapshot());
            if let Some(value) = rsi {
                info!(
                    zone = RsiZone::classify(value).label(),
                    "RSI for {}: {:.2}", metrics.symbol, value
                );
            }

            snapshots.push(TokenSnapshot::new(
                metrics.symbol,
                metrics.price_usd,
                rsi,
                &metrics.stats,
            ));
        }

        if snapshots.is_empty() {
            info!("No tokens detected with the set criteria.");
            return Ok(Analysis {
                snapshots,
                skipped,
                written: false,
            });
        }

        report::write_snapshots(&self.paths.analysis_file, &snapshots)?;
        info!(
            "Data analysis complete. Results saved to {}.",
            self.paths.analysis_file.display()
        );

        Ok(Analysis {
            snapshots,
            skipped,
            written: true,
        })
    }

    /// Réécrit le tableau à partir du fichier JSON, s'il existe
    fn save_tabulated(&self) -> Result<bool> {
        if !self.paths.analysis_file.is_file() {
            return Ok(false);
        }

        let snapshots = report::read_snapshots(&self.paths.analysis_file)?;
        report::write_table(&self.paths.table_file, &snapshots)?;
        info!("Tabulated data saved to {}", self.paths.table_file.display());
        Ok(true)
    }
}

// ============================================================================
// Tests : cycles complets avec une fausse source
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RawResponse;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    const FOO_BODY: &str = r#"{
        "pairs": [{
            "baseToken": { "symbol": "FOO" },
            "priceUsd": "1.23",
            "txns": { "m5": { "buys": 4, "sells": 2 }, "h1": { "buys": 51, "sells": 37 } },
            "volume": { "m5": 412.9, "h1": 5321.77 },
            "priceChange": { "m5": -0.42, "h1": 3.1 }
        }]
    }"#;

    const BAR_BODY: &str = r#"{"pairs":[{"baseToken":{"symbol":"BAR"},"priceUsd":"0.5"}]}"#;

    /// Fausse source : réponses fixes par token, journal des appels
    struct FakeSource {
        responses: HashMap<String, (u16, String)>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(responses: &[(&str, u16, &str)]) -> Self {
            Self {
                responses: responses
                    .iter()
                    .map(|(token, status, body)| (token.to_string(), (*status, body.to_string())))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PairSource for FakeSource {
        async fn fetch_pairs(&self, token: &str) -> Result<RawResponse> {
            self.calls.lock().unwrap().push(token.to_string());
            let (status, body) = self
                .responses
                .get(token)
                .cloned()
                .unwrap_or((404, String::new()));
            Ok(RawResponse { status, body })
        }
    }

    /// Tampon partagé qui reçoit la sortie du subscriber de test
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn make_analyzer(dir: &Path, tokens: &str, source: FakeSource) -> TokenAnalyzer<FakeSource> {
        let token_list = dir.join("predefined_tokens.txt");
        fs::write(&token_list, tokens).unwrap();
        TokenAnalyzer::new(
            source,
            AnalyzerPaths {
                token_list,
                analysis_file: dir.join("tokens_analyzed.json"),
                table_file: dir.join("tabulated_tokens.txt"),
            },
        )
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_first_cycle_writes_snapshot_with_null_rsi() {
        let dir = tempdir().unwrap();
        let mut analyzer = make_analyzer(dir.path(), "tokenfoo\n", FakeSource::new(&[("tokenfoo", 200, FOO_BODY)]));

        let report = analyzer.run_cycle().await.unwrap();

        assert_eq!(report.analyzed(), 1);
        assert!(report.analysis_written);
        assert!(report.table_written);

        let json = read_json(&analyzer.paths().analysis_file);
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Symbol"], "FOO");
        assert_eq!(records[0]["Price"], 1.23);
        assert!(records[0]["RSI"].is_null());
        assert_eq!(records[0]["buys_1h"], 51);
        assert_eq!(records[0]["sales_5m"], 2);
        assert_eq!(records[0]["vol_5m"], 412);

        let table = fs::read_to_string(&analyzer.paths().table_file).unwrap();
        assert!(table.contains("|  FOO   | 1.23  |     |"));
        assert!(table.ends_with("+\n"));
    }

    #[tokio::test]
    async fn test_http_500_skips_token_and_continues() {
        let dir = tempdir().unwrap();
        let source = FakeSource::new(&[("broken", 500, "oops"), ("tokenbar", 200, BAR_BODY)]);
        let mut analyzer = make_analyzer(dir.path(), "broken\ntokenbar\n", source);

        // Subscriber local au thread du test (runtime tokio mono-thread)
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let report = analyzer.run_cycle().await.unwrap();

        let output = logs.contents();
        assert!(output.contains("WARN"), "logs: {}", output);
        assert!(output.contains("Failed to fetch data for token: broken"), "logs: {}", output);
        assert!(!output.contains("token: tokenbar"), "logs: {}", output);

        assert_eq!(report.skipped, vec!["broken".to_string()]);
        assert_eq!(report.analyzed(), 1);
        assert_eq!(report.snapshots[0].symbol, "BAR");
        assert!(analyzer.window("broken").is_none());
        assert_eq!(*analyzer.source.calls.lock().unwrap(), vec!["broken", "tokenbar"]);

        let json = read_json(&analyzer.paths().analysis_file);
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_results_removes_analysis_and_keeps_table() {
        let dir = tempdir().unwrap();
        let mut analyzer = make_analyzer(dir.path(), "broken\n", FakeSource::new(&[("broken", 503, "")]));
        fs::write(&analyzer.paths().analysis_file, "[]").unwrap();
        fs::write(&analyzer.paths().table_file, "stale table\n").unwrap();

        let report = analyzer.run_cycle().await.unwrap();

        assert!(!report.analysis_written);
        assert!(!report.table_written);
        assert!(!analyzer.paths().analysis_file.exists());
        assert_eq!(fs::read_to_string(&analyzer.paths().table_file).unwrap(), "stale table\n");
    }

    #[tokio::test]
    async fn test_rsi_appears_once_window_has_period_samples() {
        let dir = tempdir().unwrap();
        let mut analyzer = make_analyzer(dir.path(), "tokenfoo\n", FakeSource::new(&[("tokenfoo", 200, FOO_BODY)]));

        for _ in 0..13 {
            let report = analyzer.run_cycle().await.unwrap();
            assert_eq!(report.snapshots[0].rsi, None);
        }

        // 14e prix, prix constant => perte moyenne nulle => 100
        let report = analyzer.run_cycle().await.unwrap();
        assert_eq!(report.snapshots[0].rsi, Some(100.0));

        for _ in 0..10 {
            analyzer.run_cycle().await.unwrap();
        }
        assert_eq!(analyzer.window("tokenfoo").unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_windows_are_per_token_and_blank_lines_ignored() {
        let dir = tempdir().unwrap();
        let source = FakeSource::new(&[("tokenfoo", 200, FOO_BODY), ("tokenbar", 200, BAR_BODY)]);
        let mut analyzer = make_analyzer(dir.path(), "tokenfoo\n\n  tokenbar  \n", source);

        analyzer.run_cycle().await.unwrap();
        analyzer.run_cycle().await.unwrap();

        assert_eq!(analyzer.window("tokenfoo").unwrap().snapshot(), vec![1.23, 1.23]);
        assert_eq!(analyzer.window("tokenbar").unwrap().snapshot(), vec![0.5, 0.5]);
        assert_eq!(analyzer.source.calls.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_token_list_is_reread_every_cycle() {
        let dir = tempdir().unwrap();
        let source = FakeSource::new(&[("tokenfoo", 200, FOO_BODY), ("tokenbar", 200, BAR_BODY)]);
        let mut analyzer = make_analyzer(dir.path(), "tokenfoo\n", source);

        assert_eq!(analyzer.run_cycle().await.unwrap().analyzed(), 1);

        fs::write(&analyzer.paths().token_list, "tokenfoo\ntokenbar\n").unwrap();
        assert_eq!(analyzer.run_cycle().await.unwrap().analyzed(), 2);
    }

    #[tokio::test]
    async fn test_missing_token_list_is_fatal() {
        let dir = tempdir().unwrap();
        let mut analyzer = make_analyzer(dir.path(), "", FakeSource::new(&[]));
        fs::remove_file(&analyzer.paths().token_list).unwrap();

        assert!(analyzer.run_cycle().await.is_err());
    }

    #[tokio::test]
    async fn test_non_finite_price_degrades_to_zero_row() {
        let dir = tempdir().unwrap();
        let body = r#"{"pairs":[{"baseToken":{"symbol":"NAN"},"priceUsd":"NaN"}]}"#;
        let mut analyzer = make_analyzer(dir.path(), "tokennan\n", FakeSource::new(&[("tokennan", 200, body)]));

        let report = analyzer.run_cycle().await.unwrap();

        assert!(report.table_written);
        assert_eq!(report.snapshots[0].price, 0.0);
        let json = read_json(&analyzer.paths().analysis_file);
        assert_eq!(json[0]["Symbol"], "NAN");
        assert_eq!(json[0]["Price"], 0.0);
    }

    #[tokio::test]
    async fn test_invalid_body_is_fatal() {
        let dir = tempdir().unwrap();
        let mut analyzer = make_analyzer(dir.path(), "tokenfoo\n", FakeSource::new(&[("tokenfoo", 200, "not json")]));

        assert!(analyzer.run_cycle().await.is_err());
    }
}

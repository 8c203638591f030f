// ============================================================================
// Rapport texte : tableau "pretty"
// ============================================================================
// Rend les lignes d'analyse en tableau ASCII :
//
// +--------+-------+-----+
// | Symbol | Price | RSI |
// +--------+-------+-----+
// |  FOO   | 1.23  |     |
// +--------+-------+-----+
//
// - En-têtes et cellules centrés, 1 espace de marge de chaque côté
// - Flottants au format repr ("100.0", "1.5e-05"), RSI absent => cellule vide
// ============================================================================

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use prettytable::format::{Alignment, FormatBuilder, LinePosition, LineSeparator, TableFormat};
use prettytable::{Cell, Row, Table};

use crate::models::TokenSnapshot;

/// Formate un flottant comme une repr "shortest round-trip" :
/// notation décimale pour 1e-4 <= |v| < 1e16, scientifique sinon
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // {:e} donne les chiffres significatifs minimaux : "1.5e-5", "1e16"
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

/// Cellules texte d'une ligne, dans l'ordre de TokenSnapshot::COLUMNS
fn row_cells(snapshot: &TokenSnapshot) -> Vec<String> {
    vec![
        snapshot.symbol.clone(),
        format_float(snapshot.price),
        snapshot.rsi.map(format_float).unwrap_or_default(),
        snapshot.buys_5m.to_string(),
        snapshot.buys_1h.to_string(),
        snapshot.sales_5m.to_string(),
        snapshot.sales_1h.to_string(),
        snapshot.vol_5m.to_string(),
        snapshot.vol_1h.to_string(),
        format_float(snapshot.price_chg_5m),
        format_float(snapshot.price_chg_1h),
    ]
}

/// Format "pretty" : bordures en haut, sous les en-têtes et en bas,
/// pas de séparateur entre les lignes, 1 espace de marge
fn pretty_format() -> TableFormat {
    let line = LineSeparator::new('-', '+', '+', '+');
    FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separators(&[LinePosition::Top, LinePosition::Title, LinePosition::Bottom], line)
        .padding(1, 1)
        .build()
}

/// Ligne de cellules centrées
fn centered_row<S: AsRef<str>>(cells: &[S]) -> Row {
    Row::new(
        cells
            .iter()
            .map(|cell| Cell::new_align(cell.as_ref(), Alignment::CENTER))
            .collect(),
    )
}

/// Rend un tableau générique (en-têtes + lignes de cellules), saut de ligne final inclus
///
/// CONCEPT : prettytable calcule la largeur de chaque colonne
/// (max de l'en-tête et des cellules) ; le surplus de centrage va à droite
pub fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.set_format(pretty_format());
    table.set_titles(centered_row(headers));
    for row in rows {
        table.add_row(centered_row(row));
    }
    table.to_string()
}

/// Rend les lignes d'analyse en tableau
pub fn render_table(snapshots: &[TokenSnapshot]) -> String {
    let rows: Vec<Vec<String>> = snapshots.iter().map(row_cells).collect();
    render_grid(&TokenSnapshot::COLUMNS, &rows)
}

/// Écrit le tableau (terminé par un saut de ligne)
pub fn write_table(path: &Path, snapshots: &[TokenSnapshot]) -> Result<()> {
    let content = render_table(snapshots);
    fs::write(path, content).with_context(|| format!("Échec de l'écriture de {}", path.display()))
}

// ============================================================================
// Tests unitaires
// ============================================================================

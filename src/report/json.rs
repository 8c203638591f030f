// ============================================================================
// Fichier d'analyse JSON
// ============================================================================
// Tableau JSON indenté de 4 espaces, une entrée par token analysé
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::TokenSnapshot;

/// Supprime le fichier s'il existe ; retourne true si un fichier a été supprimé
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    fs::remove_file(path)
        .with_context(|| format!("Échec de la suppression de {}", path.display()))?;
    Ok(true)
}

/// Sérialise les lignes en JSON (indentation 4 espaces)
pub fn to_json_string(snapshots: &[TokenSnapshot]) -> Result<String> {
    // CONCEPT RUST : PrettyFormatter
    // - to_string_pretty() indente de 2 espaces
    // - Pour 4 espaces, on passe par un Serializer configuré
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    snapshots
        .serialize(&mut serializer)
        .context("Échec de la sérialisation des résultats")?;

    String::from_utf8(buffer).context("JSON non UTF-8")
}

/// Écrit (ou écrase) le fichier d'analyse
pub fn write_snapshots(path: &Path, snapshots: &[TokenSnapshot]) -> Result<()> {
    let json = to_json_string(snapshots)?;
    let mut file = fs::File::create(path)
        .with_context(|| format!("Échec de la création de {}", path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Échec de l'écriture de {}", path.display()))?;
    Ok(())
}

/// Relit le fichier d'analyse
pub fn read_snapshots(path: &Path) -> Result<Vec<TokenSnapshot>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Échec de la lecture de {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Fichier d'analyse invalide : {}", path.display()))
}

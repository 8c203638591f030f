// ============================================================================
// Module : report
// ============================================================================
// Artefacts de sortie d'un cycle : fichier JSON + tableau texte
// ============================================================================

pub mod json;  // Fichier d'analyse (tokens_analyzed.json)
pub mod table; // Tableau "pretty" (tabulated_tokens.txt)

pub use json::{read_snapshots, remove_if_exists, write_snapshots};
pub use table::{render_table, write_table};

//! Load functionality for trained models.

use super::format::SerializedModel;
use bytepair_core::{MergeRules, Pair, Result, SymbolTable, TokenizerError, Vocabulary};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Model loader - reads trained models from disk.
pub struct ModelLoader;

impl ModelLoader {
    /// Load a model saved as `model.json` in the given directory.
    pub fn load(path: &Path) -> Result<(Vocabulary, MergeRules)> {
        let file_path = path.join("model.json");
        let file = File::open(&file_path).map_err(|e| {
            TokenizerError::Load(format!(
                "Failed to open file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let reader = BufReader::new(file);
        let serialized: SerializedModel = serde_json::from_reader(reader)
            .map_err(|e| TokenizerError::Load(format!("Failed to deserialize model: {}", e)))?;

        if serialized.vocab_size != 256 + serialized.merges.len() {
            return Err(TokenizerError::Load(format!(
                "header claims vocabulary size {} but {} merges imply {}",
                serialized.vocab_size,
                serialized.merges.len(),
                256 + serialized.merges.len()
            )));
        }

        rebuild_model(&serialized.merges)
    }

    /// Load a model from a `merges.txt` rule list in the given directory.
    pub fn load_merges_txt(path: &Path) -> Result<(Vocabulary, MergeRules)> {
        let merges_path = path.join("merges.txt");
        let contents = std::fs::read_to_string(&merges_path)
            .map_err(|e| TokenizerError::Load(format!("Failed to read merges.txt: {}", e)))?;

        let mut pairs = Vec::new();
        for (line_num, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 2 {
                return Err(TokenizerError::Load(format!(
                    "Invalid merge format at line {}: '{}'",
                    line_num + 1,
                    line
                )));
            }

            let left: u32 = parts[0].parse().map_err(|_| {
                TokenizerError::Load(format!("Invalid symbol id at line {}: '{}'", line_num + 1, parts[0]))
            })?;
            let right: u32 = parts[1].parse().map_err(|_| {
                TokenizerError::Load(format!("Invalid symbol id at line {}: '{}'", line_num + 1, parts[1]))
            })?;
            pairs.push((left, right));
        }

        rebuild_model(&pairs)
    }
}

/// Replay an ordered rule list into a vocabulary and rule collection.
///
/// Each rule may only reference symbols that already exist at its rank; a
/// forward reference means the list is corrupt or truncated out of order.
pub fn rebuild_model(pairs: &[Pair]) -> Result<(Vocabulary, MergeRules)> {
    let mut symbols = SymbolTable::with_capacity(pairs.len());
    let mut merges = MergeRules::with_capacity(pairs.len());

    for (rank, &(left, right)) in pairs.iter().enumerate() {
        let next_id = symbols.next_id();
        if left >= next_id || right >= next_id {
            return Err(TokenizerError::InvalidMerge(format!(
                "rule {rank} refers to a symbol not yet created: ({left}, {right})"
            )));
        }
        let new_id = symbols.new_symbol(left, right);
        merges.push((left, right), new_id);
    }

    Ok((Vocabulary::from_symbols(&symbols), merges))
}

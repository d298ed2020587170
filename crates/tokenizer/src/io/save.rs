//! Save functionality for trained models.

use super::format::SerializedModel;
use bytepair_core::{MergeRules, Result, TokenizerError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Model saver - writes trained models to disk.
pub struct ModelSaver<'a> {
    /// Merge rules in learned order
    merges: &'a MergeRules,
}

impl<'a> ModelSaver<'a> {
    /// Create a new model saver.
    pub fn new(merges: &'a MergeRules) -> Self {
        Self { merges }
    }

    /// Save the model to a directory as `model.json`.
    ///
    /// # Arguments
    /// * `path` - Directory path to save to
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| {
            TokenizerError::Save(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;

        let file_path = path.join("model.json");
        let file = File::create(&file_path).map_err(|e| {
            TokenizerError::Save(format!(
                "Failed to create file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let writer = BufWriter::new(file);
        let serialized = SerializedModel::from_pairs(self.merges.pairs());
        serde_json::to_writer_pretty(writer, &serialized)
            .map_err(|e| TokenizerError::Save(format!("Failed to serialize model: {}", e)))?;

        Ok(())
    }

    /// Save the ordered rule list as `merges.txt`, one `left right` pair per
    /// line. The plain-text interoperability format.
    pub fn save_merges_txt(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|e| {
            TokenizerError::Save(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;

        let merges_path = path.join("merges.txt");
        let file = File::create(&merges_path)
            .map_err(|e| TokenizerError::Save(format!("Failed to create merges.txt: {}", e)))?;
        let mut writer = BufWriter::new(file);

        for rule in self.merges.iter() {
            writeln!(writer, "{} {}", rule.pair.0, rule.pair.1)
                .map_err(|e| TokenizerError::Save(format!("Failed to write merges: {}", e)))?;
        }
        writer
            .flush()
            .map_err(|e| TokenizerError::Save(format!("Failed to write merges: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_writes_model_json() {
        let temp_dir = std::env::temp_dir().join("bytepair_test_save");
        std::fs::create_dir_all(&temp_dir).unwrap();

        let mut merges = MergeRules::new();
        merges.push((97, 98), 256);
        merges.push((256, 99), 257);

        ModelSaver::new(&merges).save(&temp_dir).unwrap();

        let contents = std::fs::read_to_string(temp_dir.join("model.json")).unwrap();
        let parsed: SerializedModel = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.vocab_size, 258);
        assert_eq!(parsed.merges, vec![(97, 98), (256, 99)]);

        std::fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_save_merges_txt_is_one_rule_per_line() {
        let temp_dir = std::env::temp_dir().join("bytepair_test_save_txt");
        std::fs::create_dir_all(&temp_dir).unwrap();

        let mut merges = MergeRules::new();
        merges.push((104, 105), 256);

        ModelSaver::new(&merges).save_merges_txt(&temp_dir).unwrap();

        let contents = std::fs::read_to_string(temp_dir.join("merges.txt")).unwrap();
        assert_eq!(contents, "104 105\n");

        std::fs::remove_dir_all(temp_dir).ok();
    }
}

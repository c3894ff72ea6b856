//! CSV dataset loading
//!
//! Reads a header row of column names followed by rows of 0/1 symptom
//! indicators and one categorical outcome column (`prognosis` by default).
//! Symptom column names become the model vocabulary after normalisation.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use symptom_core::Vocabulary;

/// Default name of the outcome column
pub const DEFAULT_OUTCOME_COLUMN: &str = "prognosis";

/// Training dataset with binary symptom features and disease labels
#[derive(Clone, Debug)]
pub struct Dataset {
    /// Normalised symptom names in column order
    pub vocabulary: Vocabulary,
    pub features: Vec<Vec<u8>>,
    pub labels: Vec<String>,
    /// BLAKE3 hex of the raw file contents
    pub source_hash: String,
}

impl Dataset {
    /// Load dataset from CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, outcome_column: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read CSV file {}", path.as_ref().display()))?;
        Self::from_csv_str(&content, outcome_column)
    }

    /// Parse dataset from CSV text
    pub fn from_csv_str(content: &str, outcome_column: &str) -> Result<Self> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (header_line, header) = lines.next().context("Dataset is empty")?;
        let mut columns: Vec<&str> = header.split(',').map(str::trim).collect();

        // Exports often end every line with a comma; drop the phantom column
        while columns.last().is_some_and(|c| c.is_empty()) {
            columns.pop();
        }
        let width = columns.len();

        if let Some(pos) = columns.iter().position(|c| c.is_empty()) {
            anyhow::bail!("Line {}: column {} has no name", header_line, pos + 1);
        }

        let outcome_idx = columns
            .iter()
            .position(|c| *c == outcome_column)
            .with_context(|| format!("Outcome column {:?} not found in header", outcome_column))?;

        let feature_columns: Vec<(usize, &str)> = columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != outcome_idx)
            .map(|(i, c)| (i, *c))
            .collect();

        if feature_columns.is_empty() {
            anyhow::bail!("Dataset has no symptom columns");
        }

        let vocabulary = Vocabulary::from_columns(feature_columns.iter().map(|(_, c)| *c))
            .context("Invalid symptom column names")?;

        let mut features = Vec::new();
        let mut labels = Vec::new();

        for (line_no, line) in lines {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();

            if parts.len() < width || parts[width..].iter().any(|p| !p.is_empty()) {
                anyhow::bail!(
                    "Line {}: expected {} columns, got {}",
                    line_no,
                    width,
                    parts.len()
                );
            }

            let mut row = Vec::with_capacity(feature_columns.len());
            for &(col, name) in &feature_columns {
                let value = match parts[col] {
                    "0" => 0,
                    "1" => 1,
                    other => anyhow::bail!(
                        "Line {}, column {:?}: expected 0 or 1, got {:?}",
                        line_no,
                        name,
                        other
                    ),
                };
                row.push(value);
            }

            let label = parts[outcome_idx];
            if label.is_empty() {
                anyhow::bail!("Line {}: empty {} value", line_no, outcome_column);
            }

            features.push(row);
            labels.push(label.to_string());
        }

        if features.is_empty() {
            anyhow::bail!("Dataset has a header but no rows");
        }

        Ok(Self {
            vocabulary,
            features,
            labels,
            source_hash: hex::encode(blake3::hash(content.as_bytes()).as_bytes()),
        })
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of rows per label, sorted by label
    pub fn label_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for label in &self.labels {
            *counts.entry(label.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of rows in which each symptom is present
    pub fn symptom_frequencies(&self) -> Vec<usize> {
        let mut freq = vec![0usize; self.feature_count()];
        for row in &self.features {
            for (slot, &value) in freq.iter_mut().zip(row) {
                *slot += usize::from(value);
            }
        }
        freq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
itching,skin_rash,chills,prognosis,
1,1,0,Fungal infection,
0,0,1,Malaria,
1,0,0, Fungal infection ,
";

    #[test]
    fn test_load_csv() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{}", CSV)?;
        file.flush()?;

        let dataset = Dataset::from_csv(file.path(), DEFAULT_OUTCOME_COLUMN)?;

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.feature_count(), 3);
        assert_eq!(dataset.vocabulary.names(), &["itching", "skin rash", "chills"]);
        assert_eq!(dataset.features[0], vec![1, 1, 0]);
        assert_eq!(dataset.labels[2], "Fungal infection");
        assert_eq!(dataset.source_hash.len(), 64);

        Ok(())
    }

    #[test]
    fn test_outcome_column_anywhere() -> Result<()> {
        let dataset = Dataset::from_csv_str("disease,fever,cough\nFlu,1,1\nCold,0,1\n", "disease")?;
        assert_eq!(dataset.vocabulary.names(), &["fever", "cough"]);
        assert_eq!(dataset.features[1], vec![0, 1]);
        assert_eq!(dataset.labels, vec!["Flu", "Cold"]);
        Ok(())
    }

    #[test]
    fn test_label_counts_and_frequencies() -> Result<()> {
        let dataset = Dataset::from_csv_str(CSV, DEFAULT_OUTCOME_COLUMN)?;
        let counts = dataset.label_counts();
        assert_eq!(counts.get("Fungal infection"), Some(&2));
        assert_eq!(counts.get("Malaria"), Some(&1));
        assert_eq!(dataset.symptom_frequencies(), vec![2, 1, 1]);
        Ok(())
    }

    #[test]
    fn test_repeated_column_gets_suffix() -> Result<()> {
        let csv = "\
itching,fluid_overload,chills,fluid_overload,prognosis,
1,0,0,0,Fungal infection,
0,0,1,1,Malaria,
";
        let dataset = Dataset::from_csv_str(csv, DEFAULT_OUTCOME_COLUMN)?;
        assert_eq!(
            dataset.vocabulary.names(),
            &["itching", "fluid overload", "chills", "fluid overload.1"]
        );
        assert_eq!(dataset.features[1], vec![0, 0, 1, 1]);
        Ok(())
    }

    #[test]
    fn test_blank_column_still_rejected() {
        assert!(Dataset::from_csv_str("fever,_,prognosis\n1,0,Flu\n", DEFAULT_OUTCOME_COLUMN).is_err());
    }

    #[test]
    fn test_missing_outcome_column() {
        let err = Dataset::from_csv_str("itching,skin_rash\n1,0\n", DEFAULT_OUTCOME_COLUMN).unwrap_err();
        assert!(err.to_string().contains("prognosis"));
    }

    #[test]
    fn test_rejects_non_binary_values() {
        assert!(Dataset::from_csv_str("fever,prognosis\n2,Flu\n", DEFAULT_OUTCOME_COLUMN).is_err());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        assert!(Dataset::from_csv_str("fever,cough,prognosis\n1,Flu\n", DEFAULT_OUTCOME_COLUMN).is_err());
        assert!(Dataset::from_csv_str("fever,prognosis\n1,Flu,1\n", DEFAULT_OUTCOME_COLUMN).is_err());
    }

    #[test]
    fn test_rejects_empty_inputs() {
        assert!(Dataset::from_csv_str("", DEFAULT_OUTCOME_COLUMN).is_err());
        assert!(Dataset::from_csv_str("fever,prognosis\n", DEFAULT_OUTCOME_COLUMN).is_err());
        assert!(Dataset::from_csv_str("prognosis\nFlu\n", DEFAULT_OUTCOME_COLUMN).is_err());
    }
}

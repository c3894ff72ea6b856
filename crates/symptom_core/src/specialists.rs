//! Disease to specialist recommendation table
//!
//! Exact-match lookup, no fuzzy matching. The table is built once at startup
//! (built-in entries plus optional TOML overrides) and handed to the
//! predictor; it is never mutated afterwards.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

use crate::errors::{CoreError, Result};

/// Recommendation for diseases with no entry in the table
pub const DEFAULT_SPECIALIST: &str = "General Practitioner";

/// Built-in recommendations keyed by the exact labels of the training data.
/// Label spellings (including their typos) must match the dataset verbatim.
const BUILTIN_SPECIALISTS: &[(&str, &str)] = &[
    ("Fungal infection", "Dermatologist"),
    ("Allergy", "Allergist"),
    ("GERD", "Gastroenterologist"),
    ("Chronic cholestasis", "Hepatologist"),
    ("Drug Reaction", "Allergist"),
    ("Peptic ulcer diseae", "Gastroenterologist"),
    ("AIDS", "Infectious Disease Specialist"),
    ("Diabetes", "Endocrinologist"),
    ("Gastroenteritis", "Gastroenterologist"),
    ("Bronchial Asthma", "Pulmonologist"),
    ("Hypertension", "Cardiologist"),
    ("Migraine", "Neurologist"),
    ("Cervical spondylosis", "Orthopedist"),
    ("Paralysis (brain hemorrhage)", "Neurologist"),
    ("Jaundice", "Hepatologist"),
    ("Malaria", "Infectious Disease Specialist"),
    ("Chicken pox", "Dermatologist"),
    ("Dengue", "Infectious Disease Specialist"),
    ("Typhoid", "Infectious Disease Specialist"),
    ("hepatitis A", "Hepatologist"),
    ("Hepatitis B", "Hepatologist"),
    ("Hepatitis C", "Hepatologist"),
    ("Hepatitis D", "Hepatologist"),
    ("Hepatitis E", "Hepatologist"),
    ("Alcoholic hepatitis", "Hepatologist"),
    ("Tuberculosis", "Pulmonologist"),
    ("Common Cold", "General Practitioner"),
    ("Pneumonia", "Pulmonologist"),
    ("Dimorphic hemmorhoids(piles)", "Proctologist"),
    ("Heart attack", "Cardiologist"),
    ("Varicose veins", "Vascular Surgeon"),
    ("Hypothyroidism", "Endocrinologist"),
    ("Hyperthyroidism", "Endocrinologist"),
    ("Hypoglycemia", "Endocrinologist"),
    ("Osteoarthristis", "Orthopedist"),
    ("Arthritis", "Rheumatologist"),
    ("(vertigo) Paroymsal  Positional Vertigo", "ENT Specialist"),
    ("Acne", "Dermatologist"),
    ("Urinary tract infection", "Urologist"),
    ("Psoriasis", "Dermatologist"),
    ("Impetigo", "Dermatologist"),
];

/// On-disk override format
///
/// ```toml
/// default = "Family Physician"
///
/// [specialists]
/// "Fungal infection" = "Dermatologist"
/// ```
#[derive(Debug, Default, Deserialize)]
struct SpecialistFile {
    default: Option<String>,
    #[serde(default)]
    specialists: BTreeMap<String, String>,
}

/// Immutable disease -> specialist lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialistTable {
    entries: HashMap<String, String>,
    default: String,
}

impl Default for SpecialistTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SpecialistTable {
    /// Table with the built-in recommendations
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_SPECIALISTS
                .iter()
                .map(|(disease, specialist)| (disease.to_string(), specialist.to_string())),
        )
    }

    /// Table with only the given entries and the standard default
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
            default: DEFAULT_SPECIALIST.to_string(),
        }
    }

    /// Built-in table extended with overrides read from a TOML file
    pub fn builtin_with_overrides<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!(
                "failed to read specialist table {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut table = Self::builtin();
        let overrides = table.apply_toml(&content)?;
        info!(
            "Loaded {} specialist overrides from {}",
            overrides,
            path.display()
        );
        Ok(table)
    }

    /// Merge a TOML override document, returning how many entries it set
    fn apply_toml(&mut self, content: &str) -> Result<usize> {
        let file: SpecialistFile = toml::from_str(content)
            .map_err(|e| CoreError::Config(format!("failed to parse specialist table: {}", e)))?;

        if let Some(default) = file.default {
            self.default = default;
        }

        let count = file.specialists.len();
        self.entries.extend(file.specialists);
        Ok(count)
    }

    /// Specialist for a disease; exact match, falling back to the default
    pub fn resolve(&self, disease: &str) -> &str {
        self.entries
            .get(disease)
            .map(String::as_str)
            .unwrap_or(self.default.as_str())
    }

    pub fn contains(&self, disease: &str) -> bool {
        self.entries.contains_key(disease)
    }

    pub fn default_specialist(&self) -> &str {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

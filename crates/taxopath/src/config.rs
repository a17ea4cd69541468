//! Run configuration.
//!
//! Column names differ between taxonomies (ESCO exports, O*NET workbooks
//! converted to delimited text, in-house tables), so every column the
//! engine reads or writes is configurable through an optional YAML file.
//! Every section and key may be omitted; the defaults match the ESCO
//! `skills.csv` / `skill_hierarchy.csv` exports.
//!
//! ```yaml
//! relations:
//!   parent_id: "DWA ID"
//!   child_id: "Task ID"
//!   parent_type: ""
//!   child_type: ""
//! entities:
//!   id: "Task ID"
//!   label: "Task"
//! output:
//!   path_delimiter: ";"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Input table parsing
    pub input: InputConfig,
    /// Relation table column names
    pub relations: RelationColumns,
    /// Entity table column names
    pub entities: EntityColumns,
    /// Names and formatting of derived output columns
    pub output: OutputConfig,
}

/// Input table parsing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Field delimiter of every input and output table
    pub delimiter: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
        }
    }
}

/// Column names of the relation table.
///
/// The type columns are optional in the table itself; set them to an empty
/// string when the source has no object-type information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelationColumns {
    /// Column holding the parent ID
    pub parent_id: String,
    /// Column holding the child ID
    pub child_id: String,
    /// Column holding the parent object type
    pub parent_type: String,
    /// Column holding the child object type
    pub child_type: String,
}

impl Default for RelationColumns {
    fn default() -> Self {
        Self {
            parent_id: "PARENTID".to_string(),
            child_id: "CHILDID".to_string(),
            parent_type: "PARENTOBJECTTYPE".to_string(),
            child_type: "CHILDOBJECTTYPE".to_string(),
        }
    }
}

/// Column names of entity (and extra label) tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntityColumns {
    /// Column holding the node ID
    pub id: String,
    /// Column holding the human-readable label
    pub label: String,
    /// Columns `view` shows between the label and the level when none are
    /// given on the command line
    pub view_columns: Vec<String>,
}

impl Default for EntityColumns {
    fn default() -> Self {
        Self {
            id: "ID".to_string(),
            label: "PREFERREDLABEL".to_string(),
            view_columns: vec!["SKILLTYPE".to_string()],
        }
    }
}

/// Derived output columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Column receiving the depth in levels mode
    pub level_column: String,
    /// Column receiving the root-first ID path
    pub path_column: String,
    /// Column receiving the root-first label path
    pub path_labels_column: String,
    /// Prefix of the per-level columns (`LEVEL_1_ID`, `LEVEL_1_LABEL`, ...)
    pub level_prefix: String,
    /// Separator between IDs in the path column
    pub path_delimiter: String,
    /// Separator between labels in the label path column
    pub label_delimiter: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            level_column: "LEVEL".to_string(),
            path_column: "HIERARCHY_PATH".to_string(),
            path_labels_column: "HIERARCHY_PATH_LABELS".to_string(),
            level_prefix: "LEVEL_".to_string(),
            path_delimiter: ";".to_string(),
            label_delimiter: " ; ".to_string(),
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML for
    /// this schema, or fails [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on invalid YAML or invalid values.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))
    }

    /// Check that the configured values can be used together.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.table_delimiter()?;

        let required = [
            ("relations.parent_id", &self.relations.parent_id),
            ("relations.child_id", &self.relations.child_id),
            ("entities.id", &self.entities.id),
            ("entities.label", &self.entities.label),
            ("output.level_column", &self.output.level_column),
            ("output.path_column", &self.output.path_column),
            ("output.path_labels_column", &self.output.path_labels_column),
            ("output.level_prefix", &self.output.level_prefix),
            ("output.path_delimiter", &self.output.path_delimiter),
            ("output.label_delimiter", &self.output.label_delimiter),
        ];
        for (key, value) in required {
            if value.is_empty() {
                return Err(Error::Config(format!("{key} must not be empty")));
            }
        }

        if self.relations.parent_id == self.relations.child_id {
            return Err(Error::Config(
                "relations.parent_id and relations.child_id must name different columns"
                    .to_string(),
            ));
        }

        if self.output.level_prefix.contains(&self.output.path_delimiter) {
            return Err(Error::Config(
                "output.level_prefix must not contain output.path_delimiter".to_string(),
            ));
        }

        Ok(())
    }

    /// The table delimiter as a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] unless `input.delimiter` is exactly one
    /// ASCII character.
    pub fn table_delimiter(&self) -> Result<u8> {
        match self.input.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(Error::Config(format!(
                "input.delimiter must be a single ASCII character, got {:?}",
                self.input.delimiter
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_match_esco_exports() {
        let config = Config::default();

        assert_eq!(config.relations.parent_id, "PARENTID");
        assert_eq!(config.relations.child_id, "CHILDID");
        assert_eq!(config.entities.label, "PREFERREDLABEL");
        assert_eq!(config.entities.view_columns, ["SKILLTYPE"]);
        assert_eq!(config.output.path_delimiter, ";");
        assert_eq!(config.table_delimiter().unwrap(), b',');
        config.validate().unwrap();
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = r#"
relations:
  parent_id: "DWA ID"
  child_id: "Task ID"
  parent_type: ""
  child_type: ""
entities:
  id: "Task ID"
  label: "Task"
  view_columns: ["O*NET-SOC Code"]
input:
  delimiter: "\t"
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.relations.parent_id, "DWA ID");
        assert_eq!(config.relations.parent_type, "");
        assert_eq!(config.entities.label, "Task");
        assert_eq!(config.entities.view_columns, ["O*NET-SOC Code"]);
        assert_eq!(config.output, OutputConfig::default());
        assert_eq!(config.table_delimiter().unwrap(), b'\t');
    }

    #[test]
    fn yaml_roundtrip() {
        let mut config = Config::default();
        config.output.level_column = "DEPTH".to_string();

        let parsed = Config::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[rstest]
    #[case::multi_char_delimiter("input:\n  delimiter: \";;\"\n")]
    #[case::empty_path_delimiter("output:\n  path_delimiter: \"\"\n")]
    #[case::same_id_columns("relations:\n  parent_id: ID\n  child_id: ID\n")]
    #[case::prefix_contains_delimiter("output:\n  level_prefix: \"L;\"\n")]
    #[case::unknown_key("relation:\n  parent_id: X\n")]
    fn invalid_configs_are_rejected(#[case] yaml: &str) {
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxopath.yaml");
        std::fs::write(&path, "output:\n  level_column: DEPTH\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.output.level_column, "DEPTH");
    }
}

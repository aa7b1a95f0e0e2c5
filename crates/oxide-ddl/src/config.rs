//! Generator configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Result};
use crate::object::ObjectType;

/// Name of the DDL directory that sits next to the scripts directory.
pub const DDL_DIRECTORY_NAME: &str = "ddl";

/// Which objects a run regenerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// Only objects touched by the current batch.
    #[default]
    Changed,
    /// Every object in the catalog.
    All,
}

/// Name prefixes of objects that are never generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionRules {
    /// Package name prefixes.
    pub packages: Vec<String>,
    /// View name prefixes.
    pub views: Vec<String>,
    /// Sequence name prefixes, filtered out of table sequence blocks.
    pub sequences: Vec<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            packages: vec!["PKGR_".to_string()],
            views: vec!["VX_".to_string()],
            sequences: vec!["SEQ_BPD_ITEMS_UNIT_ID".to_string()],
        }
    }
}

impl ExclusionRules {
    /// Rules that exclude nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            packages: Vec::new(),
            views: Vec::new(),
            sequences: Vec::new(),
        }
    }

    /// Loads rules from a JSON file. Missing keys fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Returns whether an object of the given type is excluded by name.
    #[must_use]
    pub fn is_excluded(&self, object_type: ObjectType, name: &str) -> bool {
        let prefixes = match object_type {
            ObjectType::PackageSpec | ObjectType::PackageBody => &self.packages,
            ObjectType::View => &self.views,
            ObjectType::Sequence => &self.sequences,
            _ => return false,
        };
        let name = name.to_uppercase();
        prefixes
            .iter()
            .any(|prefix| name.starts_with(&prefix.to_uppercase()))
    }
}

/// Settings for one generator instance.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Root of the DDL tree (`<root>/{packages,tables,views,types}`).
    pub ddl_dir: PathBuf,
    /// Owner schema whose self-qualification is stripped from DDL.
    pub owner_schema: String,
    /// Objects that are never generated.
    pub exclusions: ExclusionRules,
}

impl GeneratorConfig {
    /// Creates a configuration with the default exclusion rules.
    #[must_use]
    pub fn new(ddl_dir: impl Into<PathBuf>, owner_schema: impl Into<String>) -> Self {
        Self {
            ddl_dir: ddl_dir.into(),
            owner_schema: owner_schema.into(),
            exclusions: ExclusionRules::default(),
        }
    }

    /// Replaces the exclusion rules.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: ExclusionRules) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Derives the DDL directory from a scripts directory: `<scripts>/../ddl`.
    pub fn ddl_dir_for_scripts(scripts_dir: &Path) -> Result<PathBuf> {
        if !scripts_dir.is_dir() {
            return Err(DdlError::Config(format!(
                "Path [{}] doesn't exist or isn't a directory",
                scripts_dir.display()
            )));
        }
        let parent = scripts_dir
            .canonicalize()?
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                DdlError::Config(format!(
                    "scripts directory [{}] has no parent",
                    scripts_dir.display()
                ))
            })?;
        Ok(parent.join(DDL_DIRECTORY_NAME))
    }

    /// Validates the configuration before any generation begins.
    pub fn validate(&self) -> Result<()> {
        if self.owner_schema.trim().is_empty() {
            return Err(DdlError::Config("owner schema is required".into()));
        }
        if !self.ddl_dir.is_dir() {
            return Err(DdlError::Config(format!(
                "Path [{}] doesn't exist or isn't a directory. Can't find ddl directory",
                self.ddl_dir.display()
            )));
        }
        Ok(())
    }

    /// Returns the directory holding files of the given type.
    #[must_use]
    pub fn directory_for(&self, object_type: ObjectType) -> Option<PathBuf> {
        object_type.directory().map(|dir| self.ddl_dir.join(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions() {
        let rules = ExclusionRules::default();
        assert!(rules.is_excluded(ObjectType::PackageBody, "pkgr_report"));
        assert!(rules.is_excluded(ObjectType::View, "VX_ORDERS"));
        assert!(rules.is_excluded(ObjectType::Sequence, "SEQ_BPD_ITEMS_UNIT_ID"));
        assert!(!rules.is_excluded(ObjectType::Table, "PKGR_TABLE"));
        assert!(!rules.is_excluded(ObjectType::View, "V_ORDERS"));
    }

    #[test]
    fn test_partial_exclusions_json() {
        let rules: ExclusionRules = serde_json::from_str(r#"{"views": ["TMP_"]}"#).unwrap();
        assert_eq!(rules.views, vec!["TMP_".to_string()]);
        assert_eq!(rules.packages, vec!["PKGR_".to_string()]);
    }

    #[test]
    fn test_validate() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GeneratorConfig::new(dir.path(), "OWNER").validate().is_ok());

        let result = GeneratorConfig::new(dir.path(), "  ").validate();
        assert!(matches!(result, Err(DdlError::Config(_))));

        let result = GeneratorConfig::new(dir.path().join("missing"), "OWNER").validate();
        assert!(matches!(result, Err(DdlError::Config(_))));
    }

    #[test]
    fn test_ddl_dir_for_scripts() {
        let root = tempfile::tempdir().unwrap();
        let scripts = root.path().join("scripts");
        std::fs::create_dir(&scripts).unwrap();

        let ddl = GeneratorConfig::ddl_dir_for_scripts(&scripts).unwrap();
        assert_eq!(ddl, root.path().canonicalize().unwrap().join("ddl"));

        assert!(GeneratorConfig::ddl_dir_for_scripts(&root.path().join("nope")).is_err());
    }
}

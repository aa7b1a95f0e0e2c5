//! The DDL generator.
//!
//! One run classifies every changed object, reconciles first-class objects
//! against the catalog, regenerates the files of those still present and
//! collects the owning tables of changed dependents so each table is written
//! exactly once, after the batch loop.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::assemble::Assembler;
use crate::catalog::Catalog;
use crate::classifier::{self, Target};
use crate::config::{GenerationMode, GeneratorConfig};
use crate::error::{DdlError, Result};
use crate::normalize::Normalizer;
use crate::object::{DbObject, ObjectType};
use crate::reconcile::Reconciler;

/// Outcome of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Files (re)written, in write order.
    pub written: Vec<PathBuf>,
    /// Stale files deleted at the end of the run.
    pub deleted: Vec<PathBuf>,
    /// Dependents whose owning table could not be found.
    pub orphans: Vec<DbObject>,
    /// Objects skipped by exclusion rules.
    pub excluded: Vec<DbObject>,
}

impl GenerationReport {
    /// Returns whether the run touched nothing on disk.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.written.is_empty() && self.deleted.is_empty()
    }
}

/// Generates DDL files from a [`Catalog`].
pub struct DdlGenerator<C: Catalog> {
    catalog: C,
    config: GeneratorConfig,
    normalizer: Normalizer,
}

impl<C: Catalog> DdlGenerator<C> {
    /// Creates a generator.
    pub fn new(catalog: C, config: GeneratorConfig) -> Self {
        let normalizer = Normalizer::new(&config.owner_schema);
        Self {
            catalog,
            config,
            normalizer,
        }
    }

    /// Runs in the given mode. `objects` is only used in
    /// [`GenerationMode::Changed`].
    pub fn run(&self, mode: GenerationMode, objects: Vec<DbObject>) -> Result<GenerationReport> {
        match mode {
            GenerationMode::Changed => self.generate_ddls(objects, false),
            GenerationMode::All => self.generate_all_objects(),
        }
    }

    /// Regenerates every object listed by the catalog. Dependents are not
    /// resolved: their tables are part of the listing already.
    pub fn generate_all_objects(&self) -> Result<GenerationReport> {
        let objects = self.catalog.all_objects_without_ddl()?;
        info!(count = objects.len(), "Generating DDL for all objects");
        self.generate_ddls(objects, true)
    }

    /// Regenerates the DDL of changed objects.
    ///
    /// Dependents (indexes, triggers, sequences, comments) are attributed to
    /// their owning table unless `skip_dependent_resolution` is set, in which
    /// case they are ignored. Nothing is deleted if the run fails.
    pub fn generate_ddls(
        &self,
        objects: impl IntoIterator<Item = DbObject>,
        skip_dependent_resolution: bool,
    ) -> Result<GenerationReport> {
        self.config.validate()?;
        self.catalog.configure_transform()?;

        let mut report = GenerationReport::default();
        let mut reconciler = Reconciler::new(&self.config);
        let mut tables = BTreeSet::new();

        for object in objects {
            match classifier::classify(&self.catalog, object, skip_dependent_resolution)? {
                Target::OwningTable(table) => {
                    tables.insert(table);
                }
                Target::Object(object) => {
                    if reconciler.check_stale(&self.catalog, &object)? {
                        info!(name = %object.name, object_type = %object.object_type, "Object no longer exists, removing its ddl");
                    } else if object.object_type == ObjectType::Table {
                        tables.insert(object.name);
                    } else {
                        self.generate_object(&object, &mut reconciler, &mut report)?;
                    }
                }
                Target::Orphan(object) => {
                    warn!(
                        "Parent object not found for {} {}! Please, modify related DDL manually.",
                        object.object_type.catalog_name(),
                        object.name
                    );
                    report.orphans.push(object);
                }
                Target::Ignored(object) => {
                    debug!(name = %object.name, object_type = %object.object_type, "Skipping dependent object");
                }
            }
        }

        for table in tables {
            let object = DbObject::new(table, ObjectType::Table);
            self.generate_object(&object, &mut reconciler, &mut report)?;
        }

        report.deleted = reconciler.flush()?;
        Ok(report)
    }

    fn generate_object(
        &self,
        object: &DbObject,
        reconciler: &mut Reconciler<'_>,
        report: &mut GenerationReport,
    ) -> Result<()> {
        if self
            .config
            .exclusions
            .is_excluded(object.object_type, &object.name)
        {
            warn!(name = %object.name, object_type = %object.object_type, "Object is excluded, skipping");
            report.excluded.push(object.clone());
            return Ok(());
        }

        info!(name = %object.name, object_type = %object.object_type, "Generating DDL");
        let assembler = Assembler::new(&self.catalog, &self.normalizer, &self.config.exclusions);
        let composite = assembler.object(&object.name, object.object_type)?;
        report.excluded.extend(composite.excluded);

        let path = self.file_path(object)?;
        write_ddl(&path, &composite.ddl)?;
        reconciler.keep(&path);
        report.written.push(path);
        Ok(())
    }

    fn file_path(&self, object: &DbObject) -> Result<PathBuf> {
        let dir = self.config.directory_for(object.object_type);
        let file_name = object.object_type.file_name(&object.name);
        match (dir, file_name) {
            (Some(dir), Some(file_name)) => Ok(dir.join(file_name)),
            _ => Err(DdlError::UnknownObjectType(format!(
                "{} has no ddl file",
                object.object_type
            ))),
        }
    }
}

fn write_ddl(path: &Path, ddl: &str) -> Result<()> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, ddl)
    };
    write().map_err(|source| DdlError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SnapshotCatalog;

    #[test]
    fn test_invalid_config_fails_before_generation() {
        let config = GeneratorConfig::new("/nonexistent/ddl", "OWNER");
        let generator = DdlGenerator::new(SnapshotCatalog::default(), config);
        assert!(matches!(
            generator.generate_ddls(Vec::new(), false),
            Err(DdlError::Config(_))
        ));
    }

    #[test]
    fn test_excluded_package_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SnapshotCatalog::default().with_object(
            "PKGR_REPORT",
            ObjectType::PackageSpec,
            "CREATE OR REPLACE PACKAGE \"OWNER\".\"PKGR_REPORT\" AS\nEND;\n/",
        );
        let generator = DdlGenerator::new(catalog, GeneratorConfig::new(dir.path(), "OWNER"));
        let object = DbObject::new("PKGR_REPORT", ObjectType::PackageSpec);

        let report = generator.generate_ddls(vec![object.clone()], false).unwrap();
        assert!(report.written.is_empty());
        assert_eq!(report.excluded, vec![object]);
        assert!(!dir.path().join("packages").exists());
    }

    #[test]
    fn test_spec_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SnapshotCatalog::default().with_object(
            "PKG_A",
            ObjectType::PackageSpec,
            "CREATE OR REPLACE PACKAGE \"OWNER\".\"PKG_A\" AS\nEND;\n/",
        );
        let generator = DdlGenerator::new(catalog, GeneratorConfig::new(dir.path(), "OWNER"));
        let report = generator
            .generate_ddls(vec![DbObject::new("PKG_A", ObjectType::PackageSpec)], false)
            .unwrap();
        let expected = dir.path().join("packages").join("pkg_a_spec.sql");
        assert_eq!(report.written, vec![expected.clone()]);
        assert_eq!(
            std::fs::read_to_string(expected).unwrap(),
            "CREATE OR REPLACE PACKAGE PKG_A AS\r\nEND;\r\n/"
        );
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = GenerationReport {
            written: vec![PathBuf::from("tables/orders.sql")],
            orphans: vec![DbObject::new("IX_GONE", ObjectType::Index)],
            ..GenerationReport::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["written"][0], "tables/orders.sql");
        assert_eq!(json["deleted"].as_array().map(Vec::len), Some(0));
        assert_eq!(json["orphans"][0]["name"], "IX_GONE");
    }
}

//! Removal of DDL files for objects that no longer exist.
//!
//! Stale files are matched case-insensitively inside the directory of their
//! type and scheduled; [`Reconciler::flush`] deletes them at the end of the
//! run. A file written later in the same run is taken off the schedule.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::GeneratorConfig;
use crate::error::{DdlError, Result};
use crate::object::DbObject;

/// Tracks stale files scheduled for deletion.
#[derive(Debug)]
pub struct Reconciler<'a> {
    config: &'a GeneratorConfig,
    pending: BTreeSet<PathBuf>,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler over the configured DDL tree.
    #[must_use]
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            pending: BTreeSet::new(),
        }
    }

    /// Checks whether `object` still exists and schedules its files for
    /// deletion if it does not. Returns `true` for a stale object.
    ///
    /// A dropped package or type spec takes its body file with it.
    pub fn check_stale<C: Catalog + ?Sized>(&mut self, catalog: &C, object: &DbObject) -> Result<bool> {
        if catalog.exists(&object.name, object.object_type)? {
            return Ok(false);
        }
        let Some(dir) = self.config.directory_for(object.object_type) else {
            return Ok(false);
        };

        let mut file_names = Vec::new();
        file_names.extend(object.object_type.file_name(&object.name));
        if let Some(body) = object.object_type.companion_body() {
            file_names.extend(body.file_name(&object.name));
        }
        for file_name in &file_names {
            self.schedule_matching(&dir, file_name)?;
        }
        Ok(true)
    }

    fn schedule_matching(&mut self, dir: &Path, file_name: &str) -> Result<()> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(file_name));
            if matches && entry.file_type()?.is_file() {
                let path = entry.path();
                debug!(path = %path.display(), "Scheduling stale ddl for deletion");
                self.pending.insert(path);
            }
        }
        Ok(())
    }

    /// Takes a freshly written file off the deletion schedule.
    pub fn keep(&mut self, path: &Path) {
        self.pending.retain(|pending| !same_file_name(pending, path));
    }

    /// Files currently scheduled for deletion.
    pub fn pending(&self) -> impl Iterator<Item = &Path> {
        self.pending.iter().map(PathBuf::as_path)
    }

    /// Deletes every scheduled file and returns the deleted paths.
    pub fn flush(self) -> Result<Vec<PathBuf>> {
        let mut deleted = Vec::with_capacity(self.pending.len());
        for path in self.pending {
            match std::fs::remove_file(&path) {
                Ok(()) => deleted.push(path),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "Stale ddl already gone");
                }
                Err(source) => return Err(DdlError::Delete { path, source }),
            }
        }
        Ok(deleted)
    }
}

fn same_file_name(a: &Path, b: &Path) -> bool {
    a.parent() == b.parent()
        && match (a.file_name().and_then(|n| n.to_str()), b.file_name().and_then(|n| n.to_str())) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
}

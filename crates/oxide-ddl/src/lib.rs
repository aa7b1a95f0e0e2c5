//! Diff-stable DDL files for database schemas.
//!
//! `oxide-ddl` takes the DDL a database renders for its objects and turns it
//! into canonical text that can be versioned next to application code:
//! - Schema qualifiers, editioning modifiers and identifier quotes are removed
//!   (quotes inside string literals and comments are left alone)
//! - Table constraints, indexes, comments, sequences and triggers are ordered
//!   deterministically
//! - Dependent objects are written as part of their owning table's file
//! - Files of objects that no longer exist are deleted
//!
//! # Architecture
//!
//! - **Catalog** - Seam to the database catalog ([`catalog::Catalog`])
//! - **Classifier** - Maps changed objects to what must be regenerated
//! - **Resolver** - Finds the owning table of indexes, triggers and sequences
//! - **Normalizer** - Per-type text pipelines
//! - **Assembler** - Builds composite table and view files
//! - **Reconciler** - Removes stale files
//! - **Generator** - Drives a run and reports what changed
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_ddl::prelude::*;
//!
//! let catalog = SnapshotCatalog::load("catalog.json")?;
//! let config = GeneratorConfig::new("ddl", "OWNER");
//! let generator = DdlGenerator::new(catalog, config);
//!
//! let report = generator.generate_ddls(
//!     vec![DbObject::new("IX_ORDERS_1", ObjectType::Index)],
//!     false,
//! )?;
//! println!("{} file(s) written", report.written.len());
//! ```
//!
//! # Output layout
//!
//! ```text
//! ddl/
//!   packages/<name>_spec.sql, packages/<name>.sql
//!   tables/<name>.sql
//!   types/<name>_spec.sql, types/<name>.sql
//!   views/<name>.sql
//! ```

pub mod assemble;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod generator;
pub mod normalize;
pub mod object;
pub mod reconcile;
pub mod resolver;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{Catalog, CatalogSnapshot, SnapshotCatalog, SnapshotDependent};
    pub use crate::config::{ExclusionRules, GenerationMode, GeneratorConfig};
    pub use crate::error::{DdlError, Result};
    pub use crate::generator::{DdlGenerator, GenerationReport};
    pub use crate::normalize::Normalizer;
    pub use crate::object::{DbObject, DependentDdl, ObjectType};
}

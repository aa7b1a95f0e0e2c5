//! Catalog/metadata service seam.
//!
//! The generator never talks to a database directly. Driver code implements
//! [`Catalog`] to answer lookups and render DDL; [`SnapshotCatalog`] answers
//! them from a JSON snapshot of the catalog.

mod snapshot;

pub use snapshot::{CatalogSnapshot, SnapshotCatalog, SnapshotDependent};

use crate::error::Result;
use crate::object::{DbObject, DependentDdl, ObjectType};

/// Read access to the database catalog and its DDL rendering facility.
///
/// All name lookups are case-insensitive on the uppercased identifier.
pub trait Catalog {
    /// Prepares the metadata service for a run (pretty printing, statement
    /// terminators, no segment attributes).
    fn configure_transform(&self) -> Result<()> {
        Ok(())
    }

    /// Renders the DDL of a first-class object.
    fn extract_ddl(&self, name: &str, object_type: ObjectType) -> Result<String>;

    /// Renders the DDL of every dependent object of `dependent_type` owned by
    /// `table`, in the catalog's canonical order.
    fn extract_dependent_ddl(
        &self,
        table: &str,
        dependent_type: ObjectType,
    ) -> Result<Vec<DependentDdl>>;

    /// Returns the name of the table owning a dependent object, if any.
    fn table_name_by_dependent(&self, name: &str, object_type: ObjectType)
    -> Result<Option<String>>;

    /// Returns whether an object of the given type currently exists.
    fn exists(&self, name: &str, object_type: ObjectType) -> Result<bool>;

    /// Returns whether `name` is a table or a view.
    fn object_type_by_name(&self, name: &str) -> Result<ObjectType>;

    /// Lists every generatable object, without DDL.
    fn all_objects_without_ddl(&self) -> Result<Vec<DbObject>>;
}

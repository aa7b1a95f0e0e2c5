//! Owning-table lookup for dependent objects.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::object::{DbObject, ObjectType};

/// Returns the table owning a dependent object, or `None` when it is orphaned.
///
/// Indexes and triggers resolve through their direct owner, which must still
/// exist as a table. Sequences resolve through the trigger that uses them.
/// Catalog failures are returned as errors; a missing owner is not an error.
pub fn owning_table<C: Catalog + ?Sized>(catalog: &C, object: &DbObject) -> Result<Option<String>> {
    let owner = match object.object_type {
        ObjectType::Index | ObjectType::Trigger => {
            match catalog.table_name_by_dependent(&object.name, object.object_type)? {
                Some(table) if catalog.exists(&table, ObjectType::Table)? => Some(table),
                _ => None,
            }
        }
        ObjectType::Sequence => catalog
            .table_name_by_dependent(&object.name, object.object_type)?
            .filter(|table| !table.trim().is_empty()),
        _ => None,
    };
    Ok(owner.map(|table| table.to_uppercase()))
}

//! Classification of changed objects.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::object::{DbObject, ObjectType};
use crate::resolver;

/// What a changed object turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A dependent whose owning table must be regenerated.
    OwningTable(String),
    /// A first-class object to reconcile and generate.
    Object(DbObject),
    /// A dependent whose owner could not be found.
    Orphan(DbObject),
    /// A dependent skipped because dependent resolution is disabled.
    Ignored(DbObject),
}

/// Classifies one changed object.
///
/// A comment carries no type of its own: on a top-level call its real type
/// (table or view) is looked up, and a failed lookup is an error.
pub fn classify<C: Catalog + ?Sized>(
    catalog: &C,
    mut object: DbObject,
    skip_dependent_resolution: bool,
) -> Result<Target> {
    if !object.object_type.is_dependent() {
        return Ok(Target::Object(object));
    }
    if skip_dependent_resolution {
        return Ok(Target::Ignored(object));
    }
    if object.object_type == ObjectType::Comment {
        object.object_type = catalog.object_type_by_name(&object.name)?;
        return Ok(Target::Object(object));
    }
    Ok(match resolver::owning_table(catalog, &object)? {
        Some(table) => Target::OwningTable(table),
        None => Target::Orphan(object),
    })
}

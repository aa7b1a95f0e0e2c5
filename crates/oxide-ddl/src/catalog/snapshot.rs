//! Catalog backed by a JSON snapshot.
//!
//! The snapshot mirrors what the catalog views expose: first-class objects
//! with their rendered DDL, and dependent objects linked to their owner.
//! Sequences have no direct owner and are linked through the trigger that
//! uses them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Catalog;
use crate::error::{DdlError, Result};
use crate::object::{DbObject, DependentDdl, ObjectType};

/// A first-class object in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotObject {
    /// Object name.
    pub name: String,
    /// Object type.
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// DDL as rendered by the metadata service.
    #[serde(default)]
    pub ddl: String,
    /// Whether the database generated the object itself.
    #[serde(default)]
    pub generated: bool,
}

/// A dependent object (index, trigger, sequence, comment block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDependent {
    /// Object name. For comment blocks, the owner's name.
    pub name: String,
    /// Dependent type.
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// Owning table or view (indexes, triggers, comments).
    #[serde(default)]
    pub table: Option<String>,
    /// Trigger that references this sequence.
    #[serde(default)]
    pub trigger: Option<String>,
    /// Whether an index is unique.
    #[serde(default)]
    pub unique: bool,
    /// Whether the database generated the object itself.
    #[serde(default)]
    pub generated: bool,
    /// DDL as rendered by the metadata service.
    #[serde(default)]
    pub ddl: String,
}

impl SnapshotDependent {
    fn new(name: &str, object_type: ObjectType, ddl: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            object_type,
            table: None,
            trigger: None,
            unique: false,
            generated: false,
            ddl: ddl.to_string(),
        }
    }

    /// An index on `table`.
    #[must_use]
    pub fn index(name: &str, table: &str, unique: bool, ddl: &str) -> Self {
        Self {
            table: Some(table.to_uppercase()),
            unique,
            ..Self::new(name, ObjectType::Index, ddl)
        }
    }

    /// A trigger on `table`.
    #[must_use]
    pub fn trigger(name: &str, table: &str, ddl: &str) -> Self {
        Self {
            table: Some(table.to_uppercase()),
            ..Self::new(name, ObjectType::Trigger, ddl)
        }
    }

    /// A sequence used by `trigger`.
    #[must_use]
    pub fn sequence(name: &str, trigger: &str, ddl: &str) -> Self {
        Self {
            trigger: Some(trigger.to_uppercase()),
            ..Self::new(name, ObjectType::Sequence, ddl)
        }
    }

    /// The comment block of a table or view.
    #[must_use]
    pub fn comment(owner: &str, ddl: &str) -> Self {
        Self {
            table: Some(owner.to_uppercase()),
            ..Self::new(owner, ObjectType::Comment, ddl)
        }
    }

    fn owned_by(&self, table: &str) -> bool {
        self.table
            .as_deref()
            .is_some_and(|owner| owner.eq_ignore_ascii_case(table))
    }
}

/// Serialized catalog contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// First-class objects.
    #[serde(default)]
    pub objects: Vec<SnapshotObject>,
    /// Dependent objects.
    #[serde(default)]
    pub dependents: Vec<SnapshotDependent>,
}

/// [`Catalog`] implementation over an in-memory [`CatalogSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotCatalog {
    snapshot: CatalogSnapshot,
}

impl SnapshotCatalog {
    /// Creates a catalog from a snapshot.
    #[must_use]
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Loads a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Adds a first-class object.
    #[must_use]
    pub fn with_object(mut self, name: &str, object_type: ObjectType, ddl: &str) -> Self {
        self.snapshot.objects.push(SnapshotObject {
            name: name.to_uppercase(),
            object_type,
            ddl: ddl.to_string(),
            generated: false,
        });
        self
    }

    /// Adds a dependent object.
    #[must_use]
    pub fn with_dependent(mut self, dependent: SnapshotDependent) -> Self {
        self.snapshot.dependents.push(dependent);
        self
    }

    fn object(&self, name: &str, object_type: ObjectType) -> Option<&SnapshotObject> {
        self.snapshot
            .objects
            .iter()
            .find(|o| o.object_type == object_type && o.name.eq_ignore_ascii_case(name))
    }

    fn dependent(&self, name: &str, object_type: ObjectType) -> Option<&SnapshotDependent> {
        self.snapshot
            .dependents
            .iter()
            .find(|d| d.object_type == object_type && d.name.eq_ignore_ascii_case(name))
    }

    fn dependents_of(
        &self,
        object_type: ObjectType,
    ) -> impl Iterator<Item = &SnapshotDependent> + '_ {
        self.snapshot
            .dependents
            .iter()
            .filter(move |d| d.object_type == object_type)
    }

    fn indexes(&self, table: &str) -> Vec<&SnapshotDependent> {
        let mut indexes: Vec<_> = self
            .dependents_of(ObjectType::Index)
            .filter(|d| d.owned_by(table) && !d.generated)
            .filter(|d| !d.name.to_uppercase().starts_with("PK_"))
            .collect();
        indexes.sort_by(|a, b| {
            b.unique
                .cmp(&a.unique)
                .then_with(|| index_sort_key(&a.name).cmp(&index_sort_key(&b.name)))
        });
        indexes
    }

    fn triggers(&self, table: &str) -> Vec<&SnapshotDependent> {
        let mut triggers: Vec<_> = self
            .dependents_of(ObjectType::Trigger)
            .filter(|d| d.owned_by(table))
            .filter(|d| !d.name.to_uppercase().starts_with("Z_"))
            .collect();
        triggers.sort_by_key(|d| d.name.to_uppercase());
        triggers
    }

    fn sequences(&self, table: &str) -> Vec<&SnapshotDependent> {
        let triggers: Vec<&str> = self
            .dependents_of(ObjectType::Trigger)
            .filter(|d| d.owned_by(table))
            .map(|d| d.name.as_str())
            .collect();
        let mut sequences: Vec<_> = self
            .dependents_of(ObjectType::Sequence)
            .filter(|d| {
                d.trigger
                    .as_deref()
                    .is_some_and(|t| triggers.iter().any(|name| name.eq_ignore_ascii_case(t)))
            })
            .collect();
        sequences.sort_by_key(|d| d.name.to_uppercase());
        sequences.dedup_by(|a, b| a.name.eq_ignore_ascii_case(&b.name));
        sequences
    }
}

/// Orders index names by their letter prefix, then by their first number.
/// Names without a number sort after numbered ones with the same prefix.
fn index_sort_key(name: &str) -> (String, bool, u64) {
    let upper = name.to_uppercase();
    let prefix: String = upper.chars().take_while(|c| !c.is_ascii_digit()).collect();
    let number: Option<u64> = upper[prefix.len()..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .ok();
    (prefix, number.is_none(), number.unwrap_or(0))
}

fn is_listed(object: &SnapshotObject) -> bool {
    let name = object.name.to_uppercase();
    match object.object_type {
        ObjectType::Table => {
            !object.generated && !name.starts_with("Z_") && !name.ends_with("_OLD")
        }
        ObjectType::TypeSpec | ObjectType::TypeBody => {
            !object.generated && !name.starts_with("T$")
        }
        ObjectType::View | ObjectType::PackageSpec | ObjectType::PackageBody => true,
        _ => false,
    }
}

impl Catalog for SnapshotCatalog {
    fn extract_ddl(&self, name: &str, object_type: ObjectType) -> Result<String> {
        if let Some(object) = self.object(name, object_type) {
            return Ok(object.ddl.clone());
        }
        self.dependent(name, object_type)
            .map(|d| d.ddl.clone())
            .ok_or_else(|| DdlError::ObjectNotFound {
                name: name.to_string(),
            })
    }

    fn extract_dependent_ddl(
        &self,
        table: &str,
        dependent_type: ObjectType,
    ) -> Result<Vec<DependentDdl>> {
        let owner = table.to_uppercase();
        let rows = match dependent_type {
            ObjectType::Index => self.indexes(table),
            ObjectType::Trigger => self.triggers(table),
            ObjectType::Sequence => self.sequences(table),
            ObjectType::Comment => self
                .dependents_of(ObjectType::Comment)
                .filter(|d| d.owned_by(table))
                .collect(),
            other => {
                return Err(DdlError::Catalog(format!(
                    "{other} is not a dependent object type"
                )));
            }
        };
        Ok(rows
            .into_iter()
            .map(|d| DependentDdl {
                owner: owner.clone(),
                name: d.name.clone(),
                ddl: d.ddl.clone(),
            })
            .collect())
    }

    fn table_name_by_dependent(
        &self,
        name: &str,
        object_type: ObjectType,
    ) -> Result<Option<String>> {
        let owner = match object_type {
            ObjectType::Index | ObjectType::Trigger => self
                .dependent(name, object_type)
                .and_then(|d| d.table.clone()),
            ObjectType::Sequence => self
                .dependent(name, ObjectType::Sequence)
                .and_then(|seq| seq.trigger.as_deref())
                .and_then(|trigger| self.dependent(trigger, ObjectType::Trigger))
                .and_then(|trigger| trigger.table.clone()),
            _ => None,
        };
        Ok(owner.map(|name| name.to_uppercase()))
    }

    fn exists(&self, name: &str, object_type: ObjectType) -> Result<bool> {
        Ok(self.object(name, object_type).is_some()
            || self.dependent(name, object_type).is_some())
    }

    fn object_type_by_name(&self, name: &str) -> Result<ObjectType> {
        [ObjectType::Table, ObjectType::View]
            .into_iter()
            .find(|t| self.object(name, *t).is_some())
            .ok_or_else(|| DdlError::ObjectNotFound {
                name: name.to_string(),
            })
    }

    fn all_objects_without_ddl(&self) -> Result<Vec<DbObject>> {
        let objects = self
            .snapshot
            .objects
            .iter()
            .filter(|o| is_listed(o))
            .map(|o| DbObject::new(&o.name, o.object_type));
        let triggers = self
            .dependents_of(ObjectType::Trigger)
            .map(|d| DbObject::new(&d.name, ObjectType::Trigger));
        Ok(objects.chain(triggers).collect())
    }
}

//! Database object model.
//!
//! A [`DbObject`] is created when a change is discovered and dropped once its
//! DDL has been written to (or deleted from) disk. Names are catalog
//! identifiers and are compared case-insensitively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DdlError;

/// File name suffix distinguishing a package/type spec from its body.
pub const SPEC_FILE_SUFFIX: &str = "_spec";

/// Extension of every generated DDL file.
pub const DDL_FILE_EXTENSION: &str = "sql";

/// Kinds of catalog objects the generator handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    /// Table.
    Table,
    /// View.
    View,
    /// Package specification.
    #[serde(alias = "PACKAGE")]
    PackageSpec,
    /// Package body.
    #[serde(alias = "PACKAGE BODY")]
    PackageBody,
    /// Object type specification.
    #[serde(alias = "TYPE")]
    TypeSpec,
    /// Object type body.
    #[serde(alias = "TYPE BODY")]
    TypeBody,
    /// Trigger (owned by a table).
    Trigger,
    /// Index (owned by a table).
    Index,
    /// Sequence (owned through the trigger that uses it).
    Sequence,
    /// Table or view comment.
    Comment,
}

impl ObjectType {
    /// All object types, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Table,
        Self::View,
        Self::PackageSpec,
        Self::PackageBody,
        Self::TypeSpec,
        Self::TypeBody,
        Self::Trigger,
        Self::Index,
        Self::Sequence,
        Self::Comment,
    ];

    /// Returns the name the database catalog uses for this type.
    #[must_use]
    pub const fn catalog_name(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::PackageSpec => "PACKAGE",
            Self::PackageBody => "PACKAGE BODY",
            Self::TypeSpec => "TYPE",
            Self::TypeBody => "TYPE BODY",
            Self::Trigger => "TRIGGER",
            Self::Index => "INDEX",
            Self::Sequence => "SEQUENCE",
            Self::Comment => "COMMENT",
        }
    }

    /// Returns the identifier-style name (`PACKAGE_SPEC`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::PackageSpec => "PACKAGE_SPEC",
            Self::PackageBody => "PACKAGE_BODY",
            Self::TypeSpec => "TYPE_SPEC",
            Self::TypeBody => "TYPE_BODY",
            Self::Trigger => "TRIGGER",
            Self::Index => "INDEX",
            Self::Sequence => "SEQUENCE",
            Self::Comment => "COMMENT",
        }
    }

    /// Returns whether objects of this type only exist relative to an owner
    /// and never get a file of their own.
    #[must_use]
    pub const fn is_dependent(self) -> bool {
        matches!(
            self,
            Self::Trigger | Self::Index | Self::Sequence | Self::Comment
        )
    }

    /// Returns the output directory for this type, relative to the DDL root.
    #[must_use]
    pub const fn directory(self) -> Option<&'static str> {
        match self {
            Self::Table => Some("tables"),
            Self::View => Some("views"),
            Self::PackageSpec | Self::PackageBody => Some("packages"),
            Self::TypeSpec | Self::TypeBody => Some("types"),
            Self::Trigger | Self::Index | Self::Sequence | Self::Comment => None,
        }
    }

    /// Returns the file name suffix placed before the extension.
    #[must_use]
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::PackageSpec | Self::TypeSpec => SPEC_FILE_SUFFIX,
            _ => "",
        }
    }

    /// Returns the body type that becomes meaningless once this spec is dropped.
    #[must_use]
    pub const fn companion_body(self) -> Option<Self> {
        match self {
            Self::PackageSpec => Some(Self::PackageBody),
            Self::TypeSpec => Some(Self::TypeBody),
            _ => None,
        }
    }

    /// Returns the file name for an object of this type, or `None` for
    /// dependent types.
    #[must_use]
    pub fn file_name(self, object_name: &str) -> Option<String> {
        self.directory()?;
        Some(format!(
            "{}{}.{}",
            object_name.to_lowercase(),
            self.file_suffix(),
            DDL_FILE_EXTENSION
        ))
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = DdlError;

    /// Accepts both identifier-style (`PACKAGE_BODY`) and catalog-style
    /// (`PACKAGE BODY`) names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase().replace(' ', "_");
        match wanted.as_str() {
            "PACKAGE" => return Ok(Self::PackageSpec),
            "TYPE" => return Ok(Self::TypeSpec),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| DdlError::UnknownObjectType(s.to_string()))
    }
}

/// A database object flowing through one generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbObject {
    /// Catalog identifier, uppercase by convention.
    pub name: String,
    /// Object type.
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// Raw DDL, replaced in place by each normalization pass.
    #[serde(default)]
    pub ddl: String,
}

impl DbObject {
    /// Creates an object with no DDL yet.
    #[must_use]
    pub fn new(name: impl Into<String>, object_type: ObjectType) -> Self {
        Self {
            name: name.into().to_uppercase(),
            object_type,
            ddl: String::new(),
        }
    }

    /// Sets the DDL text.
    #[must_use]
    pub fn with_ddl(mut self, ddl: impl Into<String>) -> Self {
        self.ddl = ddl.into();
        self
    }
}

impl FromStr for DbObject {
    type Err = DdlError;

    /// Parses `TYPE:NAME`, e.g. `PACKAGE_BODY:PKG_ORDERS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (object_type, name) = s.split_once(':').ok_or_else(|| {
            DdlError::Config(format!("expected TYPE:NAME, got '{s}'"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DdlError::Config(format!("missing object name in '{s}'")));
        }
        Ok(Self::new(name, object_type.parse()?))
    }
}

/// DDL of one dependent object as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentDdl {
    /// Owning table (or view, for comments).
    pub owner: String,
    /// Name of the dependent object itself.
    pub name: String,
    /// Raw DDL.
    pub ddl: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_types() {
        assert_eq!(
            "PACKAGE BODY".parse::<ObjectType>().unwrap(),
            ObjectType::PackageBody
        );
        assert_eq!(
            "package_spec".parse::<ObjectType>().unwrap(),
            ObjectType::PackageSpec
        );
        assert_eq!("TYPE".parse::<ObjectType>().unwrap(), ObjectType::TypeSpec);
        assert_eq!("index".parse::<ObjectType>().unwrap(), ObjectType::Index);
        assert!(matches!(
            "SYNONYM".parse::<ObjectType>(),
            Err(DdlError::UnknownObjectType(_))
        ));
    }

    #[test]
    fn test_catalog_aliases_deserialize() {
        let obj: DbObject =
            serde_json::from_str(r#"{"name": "PKG_ORDERS", "type": "PACKAGE BODY"}"#).unwrap();
        assert_eq!(obj.object_type, ObjectType::PackageBody);
        assert!(obj.ddl.is_empty());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            ObjectType::PackageSpec.file_name("PKG_ORDERS").as_deref(),
            Some("pkg_orders_spec.sql")
        );
        assert_eq!(
            ObjectType::TypeBody.file_name("T_ADDRESS").as_deref(),
            Some("t_address.sql")
        );
        assert_eq!(ObjectType::Index.file_name("IX_ORDERS_1"), None);
    }

    #[test]
    fn test_parse_db_object() {
        let obj: DbObject = "index:ix_orders_1".parse().unwrap();
        assert_eq!(obj.name, "IX_ORDERS_1");
        assert_eq!(obj.object_type, ObjectType::Index);

        assert!("TABLE".parse::<DbObject>().is_err());
        assert!("TABLE:".parse::<DbObject>().is_err());
    }
}

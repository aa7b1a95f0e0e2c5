//! Composite DDL assembly.
//!
//! A table file holds the table body followed by its dependents: indexes,
//! comments, sequences and triggers, in that order. Every sub-block is
//! normalized on its own and blocks are separated by one blank line.

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::ExclusionRules;
use crate::error::Result;
use crate::normalize::Normalizer;
use crate::object::{DbObject, DependentDdl, ObjectType};

const LINE_BREAK: &str = "\r\n";
const BLOCK_SEPARATOR: &str = "\r\n\r\n";

/// Assembled DDL of one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
    /// Final file content.
    pub ddl: String,
    /// Dependents left out by exclusion rules.
    pub excluded: Vec<DbObject>,
}

impl Composite {
    fn new(blocks: Vec<String>) -> Self {
        Self {
            ddl: blocks.join(BLOCK_SEPARATOR),
            excluded: Vec::new(),
        }
    }
}

/// Builds file contents from catalog DDL.
pub struct Assembler<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    normalizer: &'a Normalizer,
    exclusions: &'a ExclusionRules,
}

impl<'a, C: Catalog + ?Sized> Assembler<'a, C> {
    /// Creates an assembler reading from `catalog`.
    pub fn new(catalog: &'a C, normalizer: &'a Normalizer, exclusions: &'a ExclusionRules) -> Self {
        Self {
            catalog,
            normalizer,
            exclusions,
        }
    }

    /// Assembles a table with all of its dependents.
    pub fn table(&self, name: &str) -> Result<Composite> {
        let ddl = self.catalog.extract_ddl(name, ObjectType::Table)?;
        let mut blocks = vec![self.normalizer.table_body(&ddl)];

        info!(table = %name, "Adding indexes...");
        let indexes = self.dependents(name, ObjectType::Index)?;
        if !indexes.is_empty() {
            let indexes: Vec<String> = indexes
                .iter()
                .map(|index| self.normalizer.index(&index.ddl))
                .collect();
            blocks.push(indexes.join(LINE_BREAK));
        }

        info!(table = %name, "Adding comments...");
        blocks.extend(self.comments(name)?);

        info!(table = %name, "Adding sequences...");
        let mut excluded = Vec::new();
        let mut sequences = Vec::new();
        for sequence in self.dependents(name, ObjectType::Sequence)? {
            if self.exclusions.is_excluded(ObjectType::Sequence, &sequence.name) {
                debug!(table = %name, sequence = %sequence.name, "Sequence excluded");
                excluded.push(DbObject::new(&sequence.name, ObjectType::Sequence));
                continue;
            }
            sequences.push(self.normalizer.sequence(&sequence.ddl));
        }
        if !sequences.is_empty() {
            blocks.push(sequences.join(BLOCK_SEPARATOR));
        }

        info!(table = %name, "Adding triggers...");
        let triggers = self.dependents(name, ObjectType::Trigger)?;
        if !triggers.is_empty() {
            let triggers: Vec<String> = triggers
                .iter()
                .map(|trigger| self.normalizer.trigger(&trigger.ddl))
                .collect();
            blocks.push(triggers.join(LINE_BREAK));
        }

        Ok(Composite {
            excluded,
            ..Composite::new(blocks)
        })
    }

    /// Assembles a view and its comments.
    pub fn view(&self, name: &str) -> Result<Composite> {
        let ddl = self.catalog.extract_ddl(name, ObjectType::View)?;
        let mut blocks = vec![self.normalizer.view_body(&ddl)];
        info!(view = %name, "Adding view comments...");
        blocks.extend(self.comments(name)?);
        Ok(Composite::new(blocks))
    }

    /// Assembles a package or type spec/body.
    pub fn unit(&self, name: &str, object_type: ObjectType) -> Result<Composite> {
        let ddl = self.catalog.extract_ddl(name, object_type)?;
        Ok(Composite::new(vec![self.normalizer.plsql_unit(&ddl)]))
    }

    /// Assembles any first-class object.
    pub fn object(&self, name: &str, object_type: ObjectType) -> Result<Composite> {
        match object_type {
            ObjectType::Table => self.table(name),
            ObjectType::View => self.view(name),
            _ => self.unit(name, object_type),
        }
    }

    fn comments(&self, owner: &str) -> Result<Option<String>> {
        let blocks = self.dependents(owner, ObjectType::Comment)?;
        Ok(self
            .normalizer
            .comments(blocks.iter().map(|block| block.ddl.as_str())))
    }

    fn dependents(&self, owner: &str, dependent_type: ObjectType) -> Result<Vec<DependentDdl>> {
        self.catalog.extract_dependent_ddl(owner, dependent_type)
    }
}

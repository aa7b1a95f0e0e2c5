//! DDL text normalization.
//!
//! [`Normalizer`] runs an ordered list of [`passes`] per object type. Work
//! happens on LF text; the code-style passes (modifier removal and quote
//! stripping) and the conversion to CRLF run last, once per block.
//!
//! Running a pipeline on its own output yields the same text again.

pub mod constraints;
pub mod passes;
pub mod scan;

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::constraints::NaturalName;

static COMMENT_ON_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^COMMENT\s+ON\s+TABLE\s").expect("Invalid table comment regex")
});

static COMMENT_ON_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^COMMENT\s+ON\s+COLUMN\s+(\S+?)\s+IS\b").expect("Invalid column comment regex")
});

/// Applies per-type normalization pipelines.
#[derive(Debug, Clone)]
pub struct Normalizer {
    owner_schema: String,
}

impl Normalizer {
    /// Creates a normalizer stripping qualifiers of `owner_schema`.
    #[must_use]
    pub fn new(owner_schema: impl Into<String>) -> Self {
        Self {
            owner_schema: owner_schema.into().to_uppercase(),
        }
    }

    fn prepare(&self, ddl: &str) -> String {
        let ddl = passes::unify_line_endings(ddl);
        passes::strip_schema(&ddl, &self.owner_schema)
            .trim()
            .to_string()
    }

    fn finish(ddl: &str) -> String {
        let ddl = passes::strip_editionable(ddl);
        let ddl = scan::strip_identifier_quotes(&ddl);
        passes::to_crlf(&ddl)
    }

    /// Normalizes the `CREATE TABLE` statement of a table, without dependents.
    #[must_use]
    pub fn table_body(&self, ddl: &str) -> String {
        let ddl = self.prepare(ddl);
        let ddl = passes::strip_using_index(&ddl);
        let ddl = passes::collapse_before_terminators(&ddl);
        let ddl = passes::column_list_parens(&ddl);
        let ddl = passes::tabs_to_spaces(&ddl);
        let ddl = passes::dedent_references(&ddl);
        let ddl = constraints::sort_constraints(&ddl);
        Self::finish(&ddl)
    }

    /// Normalizes a view definition.
    #[must_use]
    pub fn view_body(&self, ddl: &str) -> String {
        let ddl = self.prepare(ddl);
        let ddl = passes::collapse_before_terminators(&ddl);
        Self::finish(&ddl)
    }

    /// Normalizes a package or type spec/body.
    #[must_use]
    pub fn plsql_unit(&self, ddl: &str) -> String {
        let ddl = self.prepare(ddl);
        let ddl = passes::final_slash_on_own_line(&ddl);
        Self::finish(&ddl)
    }

    /// Normalizes one index definition.
    #[must_use]
    pub fn index(&self, ddl: &str) -> String {
        let ddl = self.prepare(ddl);
        let ddl = passes::collapse_before_final_terminator(&ddl);
        Self::finish(&ddl)
    }

    /// Normalizes one sequence definition, dropping its options.
    #[must_use]
    pub fn sequence(&self, ddl: &str) -> String {
        let ddl = self.prepare(ddl);
        let ddl = passes::truncate_sequence_options(&ddl);
        Self::finish(&ddl)
    }

    /// Normalizes one trigger definition.
    #[must_use]
    pub fn trigger(&self, ddl: &str) -> String {
        let ddl = self.prepare(ddl);
        let ddl = passes::slash_lines(&ddl);
        let ddl = passes::strip_trigger_enable(&ddl);
        Self::finish(ddl.trim_end())
    }

    /// Normalizes comment blocks of a table or view.
    ///
    /// Each statement ends up on its own line: the table comment (and any
    /// other non-column comment) first, then column comments ordered by
    /// column name. Returns `None` if there are no statements.
    #[must_use]
    pub fn comments<'a>(&self, blocks: impl IntoIterator<Item = &'a str>) -> Option<String> {
        let mut lines = Vec::new();
        for block in blocks {
            let block = self.prepare(block);
            let mut by_column = std::collections::BTreeMap::new();
            let mut leading = Vec::new();
            for statement in scan::split_statements(&block) {
                if let Some(column) = COMMENT_ON_COLUMN.captures(&statement).and_then(|c| c.get(1))
                {
                    let column = column
                        .as_str()
                        .rsplit('.')
                        .next()
                        .unwrap_or_default()
                        .trim_matches('"')
                        .to_string();
                    by_column.insert(NaturalName(column), statement);
                } else if COMMENT_ON_TABLE.is_match(&statement) {
                    leading.insert(0, statement);
                } else {
                    leading.push(statement);
                }
            }
            lines.extend(leading);
            lines.extend(by_column.into_values());
        }
        if lines.is_empty() {
            return None;
        }
        Some(Self::finish(&lines.join("\n")))
    }
}

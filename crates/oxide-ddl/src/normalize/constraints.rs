//! Deterministic ordering of table constraints.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static CONSTRAINTS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^[ \t]*CONSTRAINT\s[\s\S]*)(\n\s*\);)")
        .expect("Invalid constraints block regex")
});

static CONSTRAINT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\n").expect("Invalid constraint separator regex"));

static CONSTRAINT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CONSTRAINT\s(\S*)\s").expect("Invalid constraint name regex"));

/// Compares object names so that numbered names sort naturally.
///
/// Names are split into runs of digits and runs of other characters and
/// compared run by run: digit runs by numeric value, other runs
/// case-insensitively, a digit run sorting before a text run. Names that are
/// still equal (`UK_T01` and `UK_T1`) compare lexically, so the order is total.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    chunks(a).cmp(&chunks(b)).then_with(|| a.cmp(b))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    /// Digits without leading zeros; the length orders by magnitude.
    Number { len: usize, digits: String },
    /// Uppercased non-digit text.
    Text(String),
}

fn chunks(name: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut rest = name;
    while let Some(first) = rest.chars().next() {
        let is_digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != is_digit)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        chunks.push(if is_digit {
            let digits = run.trim_start_matches('0').to_string();
            Chunk::Number {
                len: digits.len(),
                digits,
            }
        } else {
            Chunk::Text(run.to_uppercase())
        });
        rest = tail;
    }
    chunks
}

/// A name ordered by [`natural_cmp`], for use as an ordered map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalName(pub String);

impl Ord for NaturalName {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(&self.0, &other.0)
    }
}

impl PartialOrd for NaturalName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reorders the named constraints of a table definition.
///
/// The block runs from the first line starting with `CONSTRAINT` to the
/// closing `);` of the statement. Without such a block the DDL is returned
/// unchanged.
#[must_use]
pub fn sort_constraints(ddl: &str) -> String {
    let Some(block) = CONSTRAINTS_BLOCK.captures(ddl).and_then(|c| c.get(1)) else {
        return ddl.to_string();
    };

    let mut clauses: Vec<(String, String)> = Vec::new();
    for clause in CONSTRAINT_SEPARATOR.split(block.as_str()) {
        let name = CONSTRAINT_NAME
            .captures(clause)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim_matches('"').to_string());
        match (name, clauses.last_mut()) {
            (Some(name), _) => clauses.push((name, clause.to_string())),
            // A comma-newline inside a clause: glue the fragment back.
            (None, Some((_, previous))) => {
                previous.push_str(",\n");
                previous.push_str(clause);
            }
            (None, None) => clauses.push((String::new(), clause.to_string())),
        }
    }

    let sorted: BTreeMap<NaturalName, String> = clauses
        .into_iter()
        .map(|(name, clause)| (NaturalName(name), clause))
        .collect();
    let sorted_block = sorted.into_values().collect::<Vec<_>>().join(",\n");

    format!(
        "{}{}{}",
        &ddl[..block.start()],
        sorted_block,
        &ddl[block.end()..]
    )
}

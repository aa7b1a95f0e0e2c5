//! Individual text passes.
//!
//! Every pass is a pure `&str -> String` function and is idempotent on its
//! own output. Passes other than [`to_crlf`] expect LF line endings.

use std::sync::LazyLock;

use regex::Regex;

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect(concat!("Invalid regex: ", $re)));
    };
}

pattern!(WHITESPACE_BEFORE_TERMINATOR, r"\s+;");
pattern!(WHITESPACE_BEFORE_FINAL_TERMINATOR, r"\s+;\z");
pattern!(EDITIONABLE_MODIFIER, r"\b(?:NON)?EDITIONABLE ");
pattern!(USING_INDEX_SUFFIX, r"[ \t]*\n\s*USING INDEX\s+ENABLE");
pattern!(COLUMN_LIST_OPEN, r"\A([^\n]*?)[ \t]*\n\s*\(");
pattern!(COLUMN_LIST_CLOSE, r"\n\s*\);");
pattern!(INDENTED_REFERENCES, r"\n\s+REFERENCES\s");
pattern!(FINAL_SLASH, r"\s+/\z");
pattern!(SLASH_LINE, r"(?m)\s*\n[ \t]*/[ \t]*$");
pattern!(ALTER_TRIGGER_ENABLE, r#"ALTER TRIGGER "?[\w$#]+"? ENABLE;"#);

/// Folds CRLF into LF.
#[must_use]
pub fn unify_line_endings(ddl: &str) -> String {
    ddl.replace("\r\n", "\n")
}

/// Converts line endings to CRLF, the form stored on disk.
#[must_use]
pub fn to_crlf(ddl: &str) -> String {
    unify_line_endings(ddl).replace('\n', "\r\n")
}

/// Removes the `"SCHEMA".` qualifier of the owner schema.
#[must_use]
pub fn strip_schema(ddl: &str, owner_schema: &str) -> String {
    let qualifier = format!("\"{}\".", owner_schema.to_uppercase());
    ddl.replace(&qualifier, "")
}

/// Collapses whitespace in front of every `;`.
#[must_use]
pub fn collapse_before_terminators(ddl: &str) -> String {
    WHITESPACE_BEFORE_TERMINATOR.replace_all(ddl, ";").into_owned()
}

/// Collapses whitespace in front of the final `;` only.
#[must_use]
pub fn collapse_before_final_terminator(ddl: &str) -> String {
    WHITESPACE_BEFORE_FINAL_TERMINATOR
        .replace(ddl, ";")
        .into_owned()
}

/// Removes `EDITIONABLE` / `NONEDITIONABLE` object modifiers.
#[must_use]
pub fn strip_editionable(ddl: &str) -> String {
    EDITIONABLE_MODIFIER.replace_all(ddl, "").into_owned()
}

/// Removes the `USING INDEX ENABLE` line trailing key constraints.
#[must_use]
pub fn strip_using_index(ddl: &str) -> String {
    USING_INDEX_SUFFIX.replace_all(ddl, "").into_owned()
}

/// Moves the opening parenthesis of the column list onto the header line
/// and the closing `);` onto a line of its own.
#[must_use]
pub fn column_list_parens(ddl: &str) -> String {
    let opened = COLUMN_LIST_OPEN.replace(ddl, "${1} (\n");
    COLUMN_LIST_CLOSE.replace(&opened, "\n);").into_owned()
}

/// Replaces tabs with four spaces.
#[must_use]
pub fn tabs_to_spaces(ddl: &str) -> String {
    ddl.replace('\t', "    ")
}

/// Pulls indented `REFERENCES` clauses up onto the line they belong to.
#[must_use]
pub fn dedent_references(ddl: &str) -> String {
    INDENTED_REFERENCES
        .replace_all(ddl, " REFERENCES ")
        .into_owned()
}

/// Puts the trailing `/` of a PL/SQL unit on its own line.
#[must_use]
pub fn final_slash_on_own_line(ddl: &str) -> String {
    FINAL_SLASH.replace(ddl, "\n/").into_owned()
}

/// Normalizes every line holding only `/` to follow its code directly.
#[must_use]
pub fn slash_lines(ddl: &str) -> String {
    SLASH_LINE.replace_all(ddl, "\n/").into_owned()
}

/// Removes the `ALTER TRIGGER ... ENABLE;` epilogue of trigger DDL.
#[must_use]
pub fn strip_trigger_enable(ddl: &str) -> String {
    ALTER_TRIGGER_ENABLE.replace(ddl, "").into_owned()
}

/// Cuts a sequence definition after its name, dropping cache/order options.
#[must_use]
pub fn truncate_sequence_options(ddl: &str) -> String {
    match ddl.rfind('"') {
        Some(pos) => format!("{};", &ddl[..=pos]),
        None => collapse_before_final_terminator(ddl),
    }
}

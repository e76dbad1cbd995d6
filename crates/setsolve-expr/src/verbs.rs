//! Operator translation table.
//!
//! Read-only set-algebra verbs return their result to the caller. Nested
//! results have to land in a key so that the consuming command can read them,
//! so every nested node is issued through its store-and-compute counterpart.

/// Read-only verb to store-and-compute verb.
const STORE_VERBS: &[(&str, &str)] = &[
    ("SDIFF", "SDIFFSTORE"),
    ("SINTER", "SINTERSTORE"),
    ("SUNION", "SUNIONSTORE"),
    ("ZDIFF", "ZDIFFSTORE"),
    ("ZINTER", "ZINTERSTORE"),
    ("ZUNION", "ZUNIONSTORE"),
];

/// Look up the store-and-compute counterpart of a read-only verb.
///
/// Matching is ASCII case-insensitive. Returns `None` for tokens outside the
/// table.
#[must_use]
pub fn store_verb(op: &str) -> Option<&'static str> {
    STORE_VERBS
        .iter()
        .find(|(read, _)| read.eq_ignore_ascii_case(op))
        .map(|(_, store)| *store)
}

/// Translate an operator token, passing unknown tokens through unchanged.
#[must_use]
pub fn translate(op: &str) -> String {
    store_verb(op).map_or_else(|| op.to_owned(), str::to_owned)
}

//! Literal escaping for string-built SQL.

/// Escapes a value for interpolation into a single-quoted SQL literal.
///
/// Every single quote is doubled, so the result can be embedded between
/// quotes without terminating the literal early. This is the only escaping
/// applied by the crate: template formatting substitutes arguments verbatim,
/// and callers are expected to route free-form values through this function
/// whenever the destination is a quoted literal context.
#[must_use]
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "''")
}

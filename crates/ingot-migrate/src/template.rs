//! Positional SQL template formatting.
//!
//! Templates use `{0}`, `{1}`, ... placeholders, with `{{` and `}}` for
//! literal braces. Arguments substitute verbatim: nothing is escaped here.
//! Values destined for a quoted literal context go through
//! [`crate::escape::escape_literal`] before formatting.

use std::fmt::Display;

use crate::error::{MigrationError, Result};

/// Formats `template` by substituting positional arguments.
///
/// Malformed templates and placeholders without a matching argument are
/// reported as [`MigrationError::Template`].
pub fn format_template(template: &str, args: &[&dyn Display]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(digit) if digit.is_ascii_digit() => digits.push(digit),
                        Some(other) => {
                            return Err(template_error(
                                template,
                                format!("unexpected `{other}` in placeholder"),
                            ));
                        }
                        None => return Err(template_error(template, "unterminated placeholder")),
                    }
                }
                if digits.is_empty() {
                    return Err(template_error(template, "empty placeholder"));
                }
                let index: usize = digits
                    .parse()
                    .map_err(|_| template_error(template, "placeholder index out of range"))?;
                let arg = args.get(index).ok_or_else(|| {
                    template_error(template, format!("placeholder {{{index}}} has no argument"))
                })?;
                out.push_str(&arg.to_string());
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(template_error(template, "unmatched `}`"));
                }
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn template_error(template: &str, reason: impl Into<String>) -> MigrationError {
    MigrationError::Template {
        template: template.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_positional_arguments() {
        let sql = format_template(
            "SELECT * FROM [{0}] WHERE [{1}] = 1",
            &[&"Users", &"Active"],
        )
        .unwrap();
        assert_eq!(sql, "SELECT * FROM [Users] WHERE [Active] = 1");
    }

    #[test]
    fn test_arguments_can_repeat_and_reorder() {
        let text = format_template("{1}-{0}-{1}", &[&"a", &"b"]).unwrap();
        assert_eq!(text, "b-a-b");
    }

    #[test]
    fn test_doubled_braces_are_literal() {
        let text = format_template("{{0}} and {0}", &[&"x"]).unwrap();
        assert_eq!(text, "{0} and x");
        assert_eq!(format_template("}}{{", &[]).unwrap(), "}{");
    }

    #[test]
    fn test_arguments_are_not_escaped() {
        // Escaping is the caller's job; the formatter must not touch quotes.
        let sql = format_template("WHERE NAME = '{0}'", &[&"O'Brien"]).unwrap();
        assert_eq!(sql, "WHERE NAME = 'O'Brien'");
    }

    #[test]
    fn test_missing_argument_is_an_error() {
        let error = format_template("{2}", &[&"only one"]).unwrap_err();
        assert!(matches!(error, MigrationError::Template { .. }));
        assert!(error.to_string().contains("{2}"));
    }

    #[test]
    fn test_unterminated_placeholder_is_an_error() {
        let error = format_template("SELECT {0", &[&"x"]).unwrap_err();
        assert!(matches!(error, MigrationError::Template { .. }));
    }

    #[test]
    fn test_stray_closing_brace_is_an_error() {
        let error = format_template("a}b", &[]).unwrap_err();
        assert!(matches!(error, MigrationError::Template { .. }));
    }

    #[test]
    fn test_named_placeholder_is_an_error() {
        let error = format_template("{name}", &[&"x"]).unwrap_err();
        assert!(matches!(error, MigrationError::Template { .. }));
    }

    #[test]
    fn test_empty_placeholder_is_an_error() {
        let error = format_template("{}", &[&"x"]).unwrap_err();
        assert!(matches!(error, MigrationError::Template { .. }));
    }
}

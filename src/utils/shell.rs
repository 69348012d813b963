//! Shell quoting for human-readable command lines.
//!
//! Commands are executed from argument vectors; these helpers only render
//! them for log output so a user can copy and rerun a failed step.

/// Escape a value for use inside single quotes.
/// Replaces `'` with `'\''` (end quote, escaped quote, start quote).
pub fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Quote a single argument for shell execution.
/// - Empty strings become `''`
/// - Strings with shell metacharacters are wrapped in single quotes
/// - Embedded single quotes are escaped
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    const SHELL_META: &[char] = &[
        ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}',
        '<', '>', '|', '&', ';', '#', '~',
    ];

    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }

    format!("'{}'", escape_single_quote_content(arg))
}

/// Quote and join multiple arguments for shell execution.
pub fn quote_args(args: &[String]) -> String {
    args.iter()
        .map(|a| quote_arg(a))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_arg_simple() {
        assert_eq!(quote_arg("mogrify"), "mogrify");
        assert_eq!(quote_arg("-format"), "-format");
    }

    #[test]
    fn quote_arg_with_spaces() {
        assert_eq!(
            quote_arg("Convert to UTF-8, native line endings"),
            "'Convert to UTF-8, native line endings'"
        );
    }

    #[test]
    fn quote_arg_with_single_quote() {
        assert_eq!(quote_arg("it's"), "'it'\\''s'");
    }

    #[test]
    fn quote_arg_empty() {
        assert_eq!(quote_arg(""), "''");
    }

    #[test]
    fn quote_args_mixed() {
        let args = vec![
            "iconv".to_string(),
            "-f".to_string(),
            "ISO-8859-1".to_string(),
            "/tmp/a b.txt".to_string(),
        ];
        assert_eq!(quote_args(&args), "iconv -f ISO-8859-1 '/tmp/a b.txt'");
    }
}

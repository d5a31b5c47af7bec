//! Command text helpers.
//!
//! Installation commands are split on whitespace only; quoting and escaping
//! are not interpreted, so `echo "a b"` becomes three arguments.

/// Split command text into program and arguments.
pub fn tokenize(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

/// Quote a string for display in a copy-pasteable command line.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    if s.chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '=' | '/' | '.' | ':' | ','))
    {
        return s.to_string();
    }

    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Render program and arguments the way a shell user would type them.
pub fn display_command<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    std::iter::once(shell_quote(program))
        .chain(args.iter().map(|a| shell_quote(a.as_ref())))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  apt   install\tvim "), vec!["apt", "install", "vim"]);
        assert_eq!(tokenize(r#"echo "a b""#), vec!["echo", "\"a", "b\""]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("foo"), "foo");
        assert_eq!(shell_quote("foo bar"), "'foo bar'");
        assert_eq!(shell_quote("foo'bar"), "'foo'\\''bar'");
        assert_eq!(shell_quote("--prefix=/opt"), "--prefix=/opt");
    }

    #[test]
    fn test_display_command() {
        assert_eq!(
            display_command("make", &["install", "DESTDIR=/mnt/a b"]),
            "make install 'DESTDIR=/mnt/a b'"
        );
    }
}

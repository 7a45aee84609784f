//! CMake-language quoting, list, and boolean helpers.
//!
//! Everything the renderers emit goes through these helpers so that one place owns the escaping
//! rules. [`parse_invocations`] goes the other way: it is a small, independent reader for the
//! `command(arg arg ...)` subset of the CMake language that the generated files use, and exists so
//! tests can check that emitted argument vectors survive a round trip.
//!
//! ## Notes
//! - Quoted arguments escape `\`, `"`, and `$` (so `${...}` is never expanded), plus newline, carriage
//!   return, and tab. `;` is left alone: inside a quoted argument it does not split the argument, and
//!   list-valued properties rely on it reaching CTest intact.
//! - Bracket arguments (`[[...]]`) and variable expansion are not understood by the reader.

use std::fmt;

/// Quote a single argument for use in a CMake command invocation.
///
/// ## Examples
/// ```rust
/// use ctestkit_core::quote_argument;
///
/// assert_eq!(quote_argument("hello world"), r#""hello world""#);
/// assert_eq!(quote_argument(r#"say "hi""#), r#""say \"hi\"""#);
/// assert_eq!(quote_argument("${HOME}"), r#""\${HOME}""#);
/// ```
pub fn quote_argument(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Whether a value is one of the bare boolean literals that `set()` may emit without quotes.
///
/// Accepts `ON`, `OFF`, `TRUE`, `FALSE` (any case) and single decimal digits.
pub fn is_bool_literal(value: &str) -> bool {
    if value.len() == 1 && value.as_bytes()[0].is_ascii_digit() {
        return true;
    }
    ["on", "off", "true", "false"]
        .iter()
        .any(|lit| value.eq_ignore_ascii_case(lit))
}

/// Interpret a value the way CMake's `if(<constant>)` does.
///
/// ## Notes
/// - True: `1`, `ON`, `YES`, `TRUE`, `Y`, or any non-zero number.
/// - False: `0`, `OFF`, `NO`, `FALSE`, `N`, `IGNORE`, `NOTFOUND`, the empty string, or anything ending in
///   `-NOTFOUND`.
/// - Any other string is false (CMake would treat it as a variable name, which this layer cannot resolve).
pub fn truthy(value: &str) -> bool {
    let upper = value.trim().to_ascii_uppercase();
    match upper.as_str() {
        "1" | "ON" | "YES" | "TRUE" | "Y" => true,
        "" | "0" | "OFF" | "NO" | "FALSE" | "N" | "IGNORE" | "NOTFOUND" => false,
        s if s.ends_with("-NOTFOUND") => false,
        s => s.parse::<f64>().is_ok_and(|n| n != 0.0),
    }
}

/// Join items into a CMake `;`-separated list.
pub fn join_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(item.as_ref());
    }
    out
}

/// One `name(arg ...)` command invocation read back from a CMake file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
}

/// A reader failure with the byte offset where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmake syntax error at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Read every command invocation in `source`.
///
/// ## Errors
/// Returns a [`SyntaxError`] for an unterminated quoted argument, a missing `(` or `)`, or a nested
/// parenthesis (not produced by the renderers).
///
/// ## Examples
/// ```rust
/// use ctestkit_core::parse_invocations;
///
/// let calls = parse_invocations("add_test(hello \"echo\" \"hello world\")\n").unwrap();
/// assert_eq!(calls[0].name, "add_test");
/// assert_eq!(calls[0].args, vec!["hello", "echo", "hello world"]);
/// ```
pub fn parse_invocations(source: &str) -> Result<Vec<Invocation>, SyntaxError> {
    Reader::new(source).invocations()
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            offset: self.pos,
            message: message.into(),
        }
    }

    /// Skip whitespace and `#` line comments.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn invocations(mut self) -> Result<Vec<Invocation>, SyntaxError> {
        let mut out = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek().is_none() {
                return Ok(out);
            }
            out.push(self.invocation()?);
        }
    }

    fn invocation(&mut self) -> Result<Invocation, SyntaxError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.bump();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected a command name"));
        }
        let name = self.src[start..self.pos].to_string();

        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
        if self.bump() != Some('(') {
            return Err(self.error(format!("expected '(' after {name}")));
        }

        let mut args = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(self.error(format!("unterminated invocation of {name}"))),
                Some(')') => {
                    self.bump();
                    return Ok(Invocation { name, args });
                }
                Some('(') => return Err(self.error("nested parentheses are not supported")),
                Some('"') => {
                    self.bump();
                    args.push(self.quoted()?);
                }
                Some(_) => args.push(self.unquoted()?),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), SyntaxError> {
        match self.bump() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            // `\;` keeps its backslash in CMake
            Some(';') => out.push_str("\\;"),
            // line continuation
            Some('\n') => {}
            Some(other) => out.push(other),
            None => return Err(self.error("dangling escape at end of input")),
        }
        Ok(())
    }

    fn quoted(&mut self) -> Result<String, SyntaxError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated quoted argument")),
                Some('"') => return Ok(out),
                Some('\\') => self.escape(&mut out)?,
                Some(ch) => out.push(ch),
            }
        }
    }

    fn unquoted(&mut self) -> Result<String, SyntaxError> {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | '#') {
                break;
            }
            self.bump();
            if ch == '\\' {
                self.escape(&mut out)?;
            } else {
                out.push(ch);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote_argument("ls"), "\"ls\"");
        assert_eq!(quote_argument(""), "\"\"");
    }

    #[test]
    fn test_quote_escapes_backslash_and_newline() {
        assert_eq!(quote_argument("C:\\bin"), "\"C:\\\\bin\"");
        assert_eq!(quote_argument("a\nb"), "\"a\\nb\"");
    }

    #[test]
    fn test_quote_leaves_semicolons() {
        assert_eq!(quote_argument("A=1;B=2"), "\"A=1;B=2\"");
    }

    #[test]
    fn test_bool_literals() {
        for lit in ["ON", "off", "True", "FALSE", "0", "7"] {
            assert!(is_bool_literal(lit), "{lit}");
        }
        for lit in ["", "10", "yes", "ONE", "1.0"] {
            assert!(!is_bool_literal(lit), "{lit}");
        }
    }

    #[test]
    fn test_truthy() {
        assert!(truthy("ON"));
        assert!(truthy("yes"));
        assert!(truthy("2"));
        assert!(!truthy("OFF"));
        assert!(!truthy(""));
        assert!(!truthy("FOO-NOTFOUND"));
        assert!(!truthy("0"));
        assert!(!truthy("banana"));
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list(["a", "b", "c"]), "a;b;c");
        assert_eq!(join_list(Vec::<String>::new()), "");
        assert_eq!(join_list(["only"]), "only");
    }

    #[test]
    fn test_parse_mixed_arguments() {
        let src = "# header\nset_tests_properties(t PROPERTIES TIMEOUT \"10\" LABELS \"a;b\")\n";
        let calls = parse_invocations(src).unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "set_tests_properties");
        assert_eq!(calls[0].args, vec!["t", "PROPERTIES", "TIMEOUT", "10", "LABELS", "a;b"]);
    }

    #[test]
    fn test_parse_escapes_round_trip() {
        let original = "say \"hi\" to ${USER}\\n";
        let src = format!("cmd({})", quote_argument(original));
        let calls = parse_invocations(&src).unwrap();
        assert_eq!(calls[0].args, vec![original.to_string()]);
    }

    #[test]
    fn test_parse_empty_source() {
        assert!(parse_invocations("").unwrap().is_empty());
        assert!(parse_invocations("# only a comment\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let err = parse_invocations("cmd(\"open").unwrap_err();
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_parse_missing_paren() {
        assert!(parse_invocations("cmd arg").is_err());
        assert!(parse_invocations("cmd(arg").is_err());
    }
}

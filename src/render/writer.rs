//! Output writer for CMake-language files.
//!
//! Tracks indentation for `if()`/`foreach()` bodies and owns the quoting decisions, so the individual
//! renderers only say *what* to emit.

use ctestkit_core::{is_bool_literal, join_list, quote_argument};

/// Spaces per indentation level in generated files.
const INDENT_WIDTH: usize = 2;

/// Writer that tracks indentation and builds CMake source.
pub struct CMakeWriter {
    output: String,
    indent_level: usize,
    at_line_start: bool,
}

impl Default for CMakeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CMakeWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    /// Get the generated text.
    pub fn finish(self) -> String {
        self.output
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            self.output.push_str(&" ".repeat(self.indent_level * INDENT_WIDTH));
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// `# text`, one comment line per input line.
    pub fn comment(&mut self, text: &str) {
        for line in text.lines() {
            if line.is_empty() {
                self.writeln("#");
            } else {
                self.writeln(&format!("# {line}"));
            }
        }
    }

    /// `name(arg arg ...)` with arguments written exactly as given.
    pub fn command<I, S>(&mut self, name: &str, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        self.writeln(&format!("{name}({})", args.join(" ")));
    }

    /// `set(NAME value)`. Boolean literals are written bare, anything else quoted.
    pub fn set_var(&mut self, name: &str, value: &str) {
        self.command("set", [name.to_string(), scalar(value)]);
    }

    /// `set(NAME "a;b;c")`, or `set(NAME "")` for an empty list.
    pub fn set_list<I, S>(&mut self, name: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.command("set", [name.to_string(), quote_argument(&join_list(items))]);
    }

    /// Open a block such as `if(...)`; the body is indented until [`end_block`](Self::end_block).
    pub fn begin_block(&mut self, line: &str) {
        self.writeln(line);
        self.indent();
    }

    /// Write a line at the enclosing level without closing the block (`else()`, `elseif(...)`).
    pub fn block_separator(&mut self, line: &str) {
        self.dedent();
        self.writeln(line);
        self.indent();
    }

    pub fn end_block(&mut self, line: &str) {
        self.dedent();
        self.writeln(line);
    }
}

/// Render a scalar `set()` value.
pub fn scalar(value: &str) -> String {
    if is_bool_literal(value) {
        value.to_string()
    } else {
        quote_argument(value)
    }
}

//! Indentation-aware line buffer for generated source files.

/// One emitted line and its indentation level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub level: usize,
    pub text: String,
}

/// Builds source text line by line; `open`/`close` manage the indent level.
///
/// ```
/// use stencil_core::domain::SourceBuilder;
///
/// let mut src = SourceBuilder::new();
/// src.open("fn main() {");
/// src.line("run();");
/// src.close("}");
/// assert_eq!(src.render(4), "fn main() {\n    run();\n}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceBuilder {
    lines: Vec<SourceLine>,
    level: usize,
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(SourceLine {
            level: self.level,
            text: text.into(),
        });
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// Emit `text` and indent everything after it.
    pub fn open(&mut self, text: impl Into<String>) -> &mut Self {
        self.line(text);
        self.level += 1;
        self
    }

    /// Dedent, then emit `text`.
    pub fn close(&mut self, text: impl Into<String>) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self.line(text)
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Serialize with `indent_width` spaces per level. Blank lines carry no
    /// indentation and the output ends with a newline.
    pub fn render(&self, indent_width: usize) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if !line.text.is_empty() {
                out.push_str(&" ".repeat(line.level * indent_width));
                out.push_str(&line.text);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_blocks() {
        let mut src = SourceBuilder::new();
        src.open("public class A {")
            .open("void f() {")
            .line("g();")
            .close("}")
            .close("}");

        assert_eq!(
            src.render(2),
            "public class A {\n  void f() {\n    g();\n  }\n}\n"
        );
        assert_eq!(src.level(), 0);
    }

    #[test]
    fn blank_lines_have_no_trailing_spaces() {
        let mut src = SourceBuilder::new();
        src.open("{").blank().line("x").close("}");
        assert_eq!(src.render(4), "{\n\n    x\n}\n");
    }

    #[test]
    fn unbalanced_close_stays_at_zero() {
        let mut src = SourceBuilder::new();
        src.close("}").line("x");
        assert_eq!(src.lines()[1].level, 0);
    }
}

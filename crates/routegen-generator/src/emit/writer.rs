//! Indented line writer for generated source.

const INDENT: &str = "    ";

/// Builds source text line by line with brace-block indentation.
#[derive(Debug, Default)]
pub struct SourceWriter {
    out: String,
    depth: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current depth.
    pub fn line(&mut self, text: &str) -> &mut Self {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
        self
    }

    /// Write an empty line, with no trailing whitespace.
    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    /// Write `header`, then `{`, and indent what follows.
    pub fn open(&mut self, header: &str) -> &mut Self {
        self.line(header);
        self.line("{");
        self.depth += 1;
        self
    }

    /// Dedent and write `}`.
    pub fn close(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line("}")
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_indent_their_contents() {
        let mut writer = SourceWriter::new();
        writer
            .line("namespace App;")
            .blank()
            .open("class A")
            .open("void M()")
            .line("Run();")
            .close()
            .close();
        assert_eq!(writer.depth(), 0);
        assert_eq!(
            writer.finish(),
            "namespace App;\n\nclass A\n{\n    void M()\n    {\n        Run();\n    }\n}\n"
        );
    }

    #[test]
    fn close_never_underflows() {
        let mut writer = SourceWriter::new();
        writer.close();
        assert_eq!(writer.depth(), 0);
        assert_eq!(writer.finish(), "}\n");
    }
}

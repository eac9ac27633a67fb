/// A cursor over source text that tracks position.
///
/// Tracks byte offset, line, and column as it advances. Columns count bytes.
pub struct Cursor<'src> {
    source: &'src str,
    /// Remaining source text, starting at the current position.
    rest: &'src str,
    offset: u32,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.rest.is_empty()
    }

    /// Peek at the current character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        match self.rest.as_bytes().first() {
            Some(&b) if b.is_ascii() => Some(b as char),
            Some(_) => self.rest.chars().next(),
            None => None,
        }
    }

    /// Peek `n` characters ahead (0 is the current character).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Whether the remaining input starts with `s`.
    #[inline]
    pub fn check_str(&self, s: &str) -> bool {
        self.rest.starts_with(s)
    }

    /// Consume one character, updating line and column.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        let width = c.len_utf8();
        self.rest = &self.rest[width..];
        self.offset += width as u32;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += width as u32;
        }
        Some(c)
    }

    /// Consume `count` bytes. The count must end on a character boundary.
    pub fn advance_bytes(&mut self, count: usize) {
        let end = self.offset as usize + count;
        while (self.offset as usize) < end && self.advance().is_some() {}
    }

    /// Consume the current character if it equals `expected`.
    #[inline]
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters while the predicate holds; returns the consumed slice.
    pub fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> &'src str {
        let start = self.offset;
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
        self.slice_from(start)
    }

    /// Count how many times `c` repeats at the current position.
    pub fn count_run(&self, c: char) -> usize {
        self.rest.chars().take_while(|&ch| ch == c).count()
    }

    #[inline]
    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.offset as usize]
    }
}

/// Check if a character can start an identifier.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier.
#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cursor = Cursor::new("hello");
        assert_eq!(cursor.peek(), Some('h'));
        assert_eq!(cursor.advance(), Some('h'));
        assert_eq!(cursor.offset(), 1);
        assert!(cursor.eat('e'));
        assert!(!cursor.eat('x'));
    }

    #[test]
    fn cursor_line_and_column() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.advance();
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (1, 3));
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
    }

    #[test]
    fn cursor_utf8_columns_count_bytes() {
        let mut cursor = Cursor::new("héllo");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.offset(), 3);
        assert_eq!(cursor.column(), 4);
        assert_eq!(cursor.slice_from(0), "hé");
    }

    #[test]
    fn cursor_eat_while_and_runs() {
        let mut cursor = Cursor::new("\"\"\"raw");
        assert_eq!(cursor.count_run('"'), 3);
        cursor.advance_bytes(3);
        assert_eq!(cursor.eat_while(is_ident_continue), "raw");
        assert!(cursor.is_eof());
    }

    #[test]
    fn identifier_classes() {
        assert!(is_ident_start('_'));
        assert!(is_ident_start('é'));
        assert!(!is_ident_start('1'));
        assert!(is_ident_continue('1'));
        assert!(!is_ident_continue('.'));
    }
}

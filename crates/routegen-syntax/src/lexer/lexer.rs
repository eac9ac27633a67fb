//! Main lexer implementation.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s, dispatching on
//! the first character. Comments, whitespace, and preprocessor lines are trivia.
//!
//! Lexemes are copied into the arena so the source string can be freed once
//! lexing completes.

use bumpalo::Bump;
use routegen_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for declaration source.
///
/// The `'src` lifetime is the source being lexed; `'ast` is the arena that owns
/// the token lexemes.
pub struct Lexer<'src, 'ast> {
    cursor: Cursor<'src>,
    arena: &'ast Bump,
    errors: Vec<LexError>,
}

/// Ways a string or character literal can fail to close.
enum LiteralFault {
    String,
    RawString,
    Char,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            errors: Vec::new(),
        }
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Lex the whole input. The returned tokens always end with [`TokenKind::Eof`].
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn tokenize(mut self) -> (Vec<Token<'ast>>, Vec<LexError>) {
        let mut tokens = Vec::with_capacity(self.cursor.source().len() / 4);
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.errors)
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token<'ast> {
        if let Some(error) = self.skip_trivia() {
            return self.make_error(error);
        }

        if self.cursor.is_eof() {
            return self.make_eof();
        }

        let start_line = self.cursor.line();
        let start_col = self.cursor.column();
        let start_offset = self.cursor.offset();

        let Some(c) = self.cursor.peek() else {
            return self.make_eof();
        };

        match c {
            '"' => self.scan_string(start_line, start_col, start_offset),
            '\'' => self.scan_char(start_line, start_col, start_offset),
            '@' if matches!(self.cursor.peek_nth(1), Some('"' | '$')) => {
                self.scan_string(start_line, start_col, start_offset)
            }
            '@' if self.cursor.peek_nth(1).is_some_and(is_ident_start) => {
                self.scan_verbatim_identifier(start_line, start_col, start_offset)
            }
            '$' if self.starts_interpolated_string() => {
                self.scan_string(start_line, start_col, start_offset)
            }
            c if c.is_ascii_digit() => self.scan_number(start_line, start_col, start_offset),
            '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(start_line, start_col, start_offset)
            }
            c if is_ident_start(c) => self.scan_identifier(start_line, start_col, start_offset),
            _ => self.scan_operator(start_line, start_col, start_offset),
        }
    }

    // =========================================
    // Trivia
    // =========================================

    /// Skip whitespace, comments, and preprocessor lines.
    ///
    /// Returns an error for an unterminated block comment.
    fn skip_trivia(&mut self) -> Option<LexError> {
        if self.cursor.offset() == 0 && self.cursor.check_str("\u{FEFF}") {
            self.cursor.advance();
        }

        loop {
            match self.cursor.peek() {
                Some(c) if c.is_whitespace() => {
                    self.cursor.advance();
                }
                Some('/') if self.cursor.peek_nth(1) == Some('/') => {
                    self.cursor.eat_while(|c| c != '\n');
                }
                Some('/') if self.cursor.peek_nth(1) == Some('*') => {
                    let line = self.cursor.line();
                    let col = self.cursor.column();
                    let start = self.cursor.offset();
                    self.cursor.advance_bytes(2);
                    loop {
                        if self.cursor.check_str("*/") {
                            self.cursor.advance_bytes(2);
                            break;
                        }
                        if self.cursor.advance().is_none() {
                            let len = self.cursor.offset() - start;
                            return Some(LexError::UnterminatedComment {
                                span: Span::new(line, col, len),
                            });
                        }
                    }
                }
                // `#nullable enable`, `#region`, `#if DEBUG`, ...
                Some('#') => {
                    self.cursor.eat_while(|c| c != '\n');
                }
                _ => return None,
            }
        }
    }

    // =========================================
    // Token construction
    // =========================================

    fn make_eof(&self) -> Token<'ast> {
        let lexeme = self.arena.alloc_str("");
        Token::new(
            TokenKind::Eof,
            lexeme,
            Span::point(self.cursor.line(), self.cursor.column()),
        )
    }

    /// Create a token from the start position to the current position.
    fn make_token(
        &self,
        kind: TokenKind,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'ast> {
        let len = self.cursor.offset() - start_offset;
        let lexeme = self.arena.alloc_str(self.cursor.slice_from(start_offset));
        Token::new(kind, lexeme, Span::new(start_line, start_col, len))
    }

    /// Create an error token and record the error.
    fn make_error(&mut self, error: LexError) -> Token<'ast> {
        let span = error.span();
        let lexeme = self.arena.alloc_str("");
        self.errors.push(error);
        Token::new(TokenKind::Error, lexeme, span)
    }

    fn fault_token(
        &mut self,
        fault: LiteralFault,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'ast> {
        let span = Span::new(start_line, start_col, self.cursor.offset() - start_offset);
        let error = match fault {
            LiteralFault::String => LexError::UnterminatedString { span },
            LiteralFault::RawString => LexError::UnterminatedRawString { span },
            LiteralFault::Char => LexError::UnterminatedChar { span },
        };
        self.make_error(error)
    }

    // =========================================
    // Strings and characters
    // =========================================

    fn starts_interpolated_string(&self) -> bool {
        let mut n = 0;
        while self.cursor.peek_nth(n) == Some('$') {
            n += 1;
        }
        match self.cursor.peek_nth(n) {
            Some('"') => true,
            Some('@') => self.cursor.peek_nth(n + 1) == Some('"'),
            _ => false,
        }
    }

    fn scan_string(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        match self.skip_string_literal() {
            Ok(()) => self.make_token(TokenKind::StringLiteral, start_line, start_col, start_offset),
            Err(fault) => self.fault_token(fault, start_line, start_col, start_offset),
        }
    }

    fn scan_char(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        match self.skip_char_literal() {
            Ok(()) => self.make_token(TokenKind::CharLiteral, start_line, start_col, start_offset),
            Err(fault) => self.fault_token(fault, start_line, start_col, start_offset),
        }
    }

    /// Consume a string literal with any `@`/`$` prefix, including raw strings.
    fn skip_string_literal(&mut self) -> Result<(), LiteralFault> {
        let mut verbatim = false;
        let mut interpolated = false;
        loop {
            if self.cursor.eat('$') {
                interpolated = true;
            } else if self.cursor.eat('@') {
                verbatim = true;
            } else {
                break;
            }
        }

        let quotes = self.cursor.count_run('"');
        if quotes >= 3 {
            return self.skip_raw_string(quotes);
        }
        if quotes == 2 {
            self.cursor.advance_bytes(2);
            return Ok(());
        }
        self.cursor.advance();

        loop {
            match self.cursor.peek() {
                None => return Err(LiteralFault::String),
                Some('\n') if !verbatim => return Err(LiteralFault::String),
                Some('\\') if !verbatim => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('"') => {
                    self.cursor.advance();
                    if !(verbatim && self.cursor.eat('"')) {
                        return Ok(());
                    }
                }
                Some('{') if interpolated => {
                    self.cursor.advance();
                    if !self.cursor.eat('{') {
                        self.skip_interpolation_hole()?;
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Consume a raw string opened by `quotes` double quotes.
    fn skip_raw_string(&mut self, quotes: usize) -> Result<(), LiteralFault> {
        self.cursor.advance_bytes(quotes);
        loop {
            let run = self.cursor.count_run('"');
            if run >= quotes {
                self.cursor.advance_bytes(run);
                return Ok(());
            }
            if run > 0 {
                self.cursor.advance_bytes(run);
            } else if self.cursor.advance().is_none() {
                return Err(LiteralFault::RawString);
            }
        }
    }

    /// Consume an interpolation hole up to its closing brace.
    fn skip_interpolation_hole(&mut self) -> Result<(), LiteralFault> {
        let mut depth = 1usize;
        loop {
            match self.cursor.peek() {
                None => return Err(LiteralFault::String),
                Some('{') => {
                    depth += 1;
                    self.cursor.advance();
                }
                Some('}') => {
                    self.cursor.advance();
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some('"') => self.skip_string_literal()?,
                Some('@' | '$') if self.starts_nested_string() => self.skip_string_literal()?,
                Some('\'') => self.skip_char_literal()?,
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn starts_nested_string(&self) -> bool {
        let mut n = 0;
        while matches!(self.cursor.peek_nth(n), Some('@' | '$')) {
            n += 1;
        }
        self.cursor.peek_nth(n) == Some('"')
    }

    fn skip_char_literal(&mut self) -> Result<(), LiteralFault> {
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => return Err(LiteralFault::Char),
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('\'') => {
                    self.cursor.advance();
                    return Ok(());
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // =========================================
    // Numbers and identifiers
    // =========================================

    /// Scan a numeric literal, including suffixes (`10m`, `0xFFu`, `1_000L`).
    fn scan_number(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
                    self.cursor.advance();
                }
                Some('.') if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.cursor.advance();
                }
                _ => break,
            }
        }
        self.make_token(TokenKind::NumberLiteral, start_line, start_col, start_offset)
    }

    fn scan_identifier(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        let ident = self.cursor.eat_while(is_ident_continue);
        let kind = lookup_keyword(ident).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start_line, start_col, start_offset)
    }

    /// `@class` is the identifier `class`.
    fn scan_verbatim_identifier(
        &mut self,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'ast> {
        self.cursor.advance();
        let ident = self.cursor.eat_while(is_ident_continue);
        let lexeme = self.arena.alloc_str(ident);
        let len = self.cursor.offset() - start_offset;
        Token::new(
            TokenKind::Identifier,
            lexeme,
            Span::new(start_line, start_col, len),
        )
    }

    // =========================================
    // Operators and punctuation
    // =========================================

    fn scan_operator(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        let Some(c) = self.cursor.advance() else {
            return self.make_eof();
        };

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '<' => TokenKind::LessThan,
            '>' => TokenKind::GreaterThan,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            '*' => TokenKind::Star,
            '~' => TokenKind::Tilde,
            ':' => {
                if self.cursor.eat(':') {
                    TokenKind::ColonColon
                } else {
                    TokenKind::Colon
                }
            }
            '=' => {
                if self.cursor.eat('>') {
                    TokenKind::Arrow
                } else if self.cursor.eat('=') {
                    TokenKind::Symbol
                } else {
                    TokenKind::Equal
                }
            }
            '+' | '-' | '/' | '%' | '&' | '|' | '^' | '!' => TokenKind::Symbol,
            ch => {
                let error = LexError::UnexpectedChar {
                    ch,
                    span: Span::new(start_line, start_col, ch.len_utf8() as u32),
                };
                return self.make_error(error);
            }
        };

        self.make_token(kind, start_line, start_col, start_offset)
    }
}

impl<'ast> Iterator for Lexer<'_, 'ast> {
    type Item = Token<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        Lexer::new(source, &arena).map(|t| t.kind).collect()
    }

    fn lexemes(source: &str) -> Vec<String> {
        let arena = Bump::new();
        Lexer::new(source, &arena).map(|t| t.lexeme.to_string()).collect()
    }

    #[test]
    fn declaration_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("public class Foo : IEndpoint { }"),
            vec![Public, Class, Identifier, Colon, Identifier, LeftBrace, RightBrace]
        );
    }

    #[test]
    fn compound_punctuation() {
        use TokenKind::*;
        assert_eq!(
            kinds("global::A => a == b :"),
            vec![Identifier, ColonColon, Identifier, Arrow, Identifier, Symbol, Identifier, Colon]
        );
    }

    #[test]
    fn skips_comments_and_directives() {
        let source = "// <auto-generated/>\n#nullable enable\n/* block\n comment */ namespace /// doc\n App;";
        assert_eq!(lexemes(source), vec!["namespace", "App", ";"]);
    }

    #[test]
    fn string_forms() {
        let source = r#""a\"b" @"c""d" $"x{y}z" $"{(a ? "p" : "q")}" """raw "quoted" text""" '\''"#;
        let arena = Bump::new();
        let (tokens, errors) = Lexer::new(source, &arena).tokenize();
        assert!(errors.is_empty(), "{errors:?}");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::StringLiteral,
                TokenKind::StringLiteral,
                TokenKind::StringLiteral,
                TokenKind::StringLiteral,
                TokenKind::StringLiteral,
                TokenKind::CharLiteral,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[4].lexeme, r#""""raw "quoted" text""""#);
    }

    #[test]
    fn interpolation_braces_are_not_tokens() {
        assert_eq!(
            kinds(r#"$"{{literal}} {value}" }"#),
            vec![TokenKind::StringLiteral, TokenKind::RightBrace]
        );
    }

    #[test]
    fn verbatim_identifier_drops_at_sign() {
        assert_eq!(lexemes("@class @event"), vec!["class", "event"]);
        assert_eq!(kinds("@class"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn numbers_with_suffixes() {
        assert_eq!(lexemes("1.5m 0xFF 1_000L .5"), vec!["1.5m", "0xFF", "1_000L", ".5"]);
    }

    #[test]
    fn unterminated_string_reports_error() {
        let arena = Bump::new();
        let (tokens, errors) = Lexer::new("\"open\nclass", &arena).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
        assert_eq!(tokens[1].kind, TokenKind::Class);
    }

    #[test]
    fn unterminated_comment_reports_error() {
        let arena = Bump::new();
        let (_, errors) = Lexer::new("class /* never closed", &arena).tokenize();
        assert!(matches!(errors[0], LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn unexpected_character() {
        let arena = Bump::new();
        let (tokens, errors) = Lexer::new("class `", &arena).tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Error);
        assert_eq!(
            errors[0],
            LexError::UnexpectedChar {
                ch: '`',
                span: Span::new(1, 7, 1)
            }
        );
    }

    #[test]
    fn spans_track_lines() {
        let arena = Bump::new();
        let tokens: Vec<_> = Lexer::new("a\n  b", &arena).collect();
        assert_eq!(tokens[1].span, Span::new(2, 3, 1));
    }

    #[test]
    fn eof_span_is_zero_width_at_end() {
        let arena = Bump::new();
        let (tokens, errors) = Lexer::new("a\n  b", &arena).tokenize();
        assert!(errors.is_empty());
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.span, Span::point(2, 4));
        assert!(eof.span.is_empty());
    }
}

//! Parser infrastructure.
//!
//! Provides the [`Parser`] struct with token navigation, error recording, and the
//! bracket-balanced skipping used to step over bodies, initializers, attributes,
//! and top-level statements.

use bumpalo::Bump;
use bumpalo::collections::Vec as BVec;
use routegen_core::{DeclId, ParseError, ParseErrorKind, ParseErrors, Span};

use super::CompilationUnit;
use crate::lexer::{Lexer, Token, TokenKind};

/// Declaration parser.
///
/// The whole source is tokenized up front, so lookahead is free. Lexemes and
/// AST nodes live in the arena; the source string is only needed during
/// [`Parser::new`].
pub struct Parser<'ast> {
    pub(super) buffer: Vec<Token<'ast>>,
    pub(super) position: usize,
    pub(super) errors: ParseErrors,
    pub(super) arena: &'ast Bump,
    next_decl: u32,
}

impl<'ast> Parser<'ast> {
    /// Tokenize `source` and prepare to parse it.
    ///
    /// Lexer errors are recorded as parse errors; the offending tokens are dropped.
    pub fn new(source: &str, arena: &'ast Bump) -> Self {
        let (tokens, lex_errors) = Lexer::new(source, arena).tokenize();

        let mut errors = ParseErrors::new();
        for error in lex_errors {
            errors.push(error.into());
        }

        let buffer = tokens
            .into_iter()
            .filter(|token| token.kind != TokenKind::Error)
            .collect();

        Self {
            buffer,
            position: 0,
            errors,
            arena,
            next_decl: 0,
        }
    }

    /// Parse `source`, failing if any error was reported.
    ///
    /// ```
    /// use bumpalo::Bump;
    /// use routegen_syntax::{Item, Parser};
    ///
    /// let arena = Bump::new();
    /// let unit = Parser::parse("namespace App; public class Ping { }", &arena).unwrap();
    /// assert!(matches!(unit.items[0], Item::Namespace(_)));
    /// ```
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(source: &str, arena: &'ast Bump) -> Result<CompilationUnit<'ast>, ParseErrors> {
        let (unit, errors) = Self::parse_lenient(source, arena);
        if errors.is_empty() {
            Ok(unit)
        } else {
            Err(errors)
        }
    }

    /// Parse `source`, recovering from errors.
    ///
    /// Always returns a compilation unit holding every declaration that could be
    /// recovered, along with all errors encountered.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_lenient(source: &str, arena: &'ast Bump) -> (CompilationUnit<'ast>, ParseErrors) {
        let mut parser = Parser::new(source, arena);
        let unit = parser.parse_compilation_unit();
        (unit, parser.take_errors())
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Take the errors, leaving an empty collection.
    pub fn take_errors(&mut self) -> ParseErrors {
        std::mem::take(&mut self.errors)
    }

    pub(super) fn decl_count(&self) -> u32 {
        self.next_decl
    }

    /// Allocate the next declaration ID in document order.
    pub(super) fn next_decl_id(&mut self) -> DeclId {
        let id = DeclId::new(self.next_decl);
        self.next_decl += 1;
        id
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// The current token. Past the end this is the trailing EOF token.
    #[inline]
    pub(super) fn peek(&self) -> Token<'ast> {
        self.peek_nth(0)
    }

    /// The token `n` positions ahead.
    #[inline]
    pub(super) fn peek_nth(&self, n: usize) -> Token<'ast> {
        let last = self.buffer.len().saturating_sub(1);
        self.buffer[(self.position + n).min(last)]
    }

    pub(super) fn advance(&mut self) -> Token<'ast> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    #[inline]
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    #[cfg(test)]
    pub(super) fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Whether the current token is the contextual keyword `word`.
    pub(super) fn check_contextual(&self, word: &str) -> bool {
        self.peek().is_contextual(word)
    }

    pub(super) fn eat_contextual(&mut self, word: &str) -> Option<Token<'ast>> {
        if self.check_contextual(word) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of `kind` or report what was found instead.
    pub(super) fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            return Err(ParseError::unexpected_eof(token.span));
        }
        Err(ParseError::expected_token(
            token.span,
            kind.description(),
            &describe(&token),
        ))
    }

    pub(super) fn expect_identifier(&mut self) -> Result<super::Ident<'ast>, ParseError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Identifier => {
                self.advance();
                Ok(super::Ident::new(token.lexeme, token.span))
            }
            TokenKind::Eof => Err(ParseError::unexpected_eof(token.span)),
            _ => Err(ParseError::expected_identifier(token.span, &describe(&token))),
        }
    }

    /// Span of the most recently consumed token.
    pub(super) fn previous_span(&self) -> Span {
        self.position
            .checked_sub(1)
            .and_then(|i| self.buffer.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    /// Span from `start` through the most recently consumed token.
    pub(super) fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }

    pub(super) fn alloc_slice<T>(&self, items: Vec<T>) -> &'ast [T] {
        let mut slice = BVec::with_capacity_in(items.len(), self.arena);
        slice.extend(items);
        slice.into_bump_slice()
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    pub(super) fn error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub(super) fn error_at(&mut self, kind: ParseErrorKind, span: Span, message: impl Into<String>) {
        self.errors.push(ParseError::new(kind, span, message));
    }

    /// Skip past the declaration or member that failed to parse.
    ///
    /// Stops after a `;` or a balanced `{ ... }` block at the current nesting
    /// level, or before a `}` that closes the enclosing block. Always makes
    /// progress unless the current token is that closing `}` or EOF.
    pub(super) fn synchronize(&mut self) {
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof | TokenKind::RightBrace => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::LeftBrace => {
                    self.skip_balanced();
                    return;
                }
                kind if kind.is_open_delimiter() => self.skip_balanced(),
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Skipping
    // ========================================================================

    /// Skip a bracketed group starting at the current open delimiter.
    ///
    /// Brackets of all three kinds share one depth counter. Reports a
    /// mismatched delimiter if the input ends before the group closes.
    pub(super) fn skip_balanced(&mut self) {
        let open = self.advance();
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.advance();
            match token.kind {
                TokenKind::Eof => {
                    self.error_at(
                        ParseErrorKind::MismatchedDelimiter,
                        open.span,
                        format!("unclosed {}", open.kind.description()),
                    );
                    return;
                }
                kind if kind.is_open_delimiter() => depth += 1,
                kind if kind.is_close_delimiter() => depth -= 1,
                _ => {}
            }
        }
    }

    /// Skip tokens until `stop` matches a token at the current nesting level.
    ///
    /// The matching token is not consumed. Closing delimiters that would leave
    /// the current level also stop the scan.
    pub(super) fn skip_until(&mut self, stop: impl Fn(TokenKind) -> bool) {
        loop {
            let kind = self.peek().kind;
            if kind == TokenKind::Eof || stop(kind) || kind.is_close_delimiter() {
                return;
            }
            if kind.is_open_delimiter() {
                self.skip_balanced();
            } else {
                self.advance();
            }
        }
    }

    /// Skip attribute lists such as `[HttpGet("/")]`.
    pub(super) fn skip_attributes(&mut self) {
        while self.check(TokenKind::LeftBracket) {
            self.skip_balanced();
        }
    }

    /// Skip a top-level statement: up to and including `;`, or through a block.
    pub(super) fn skip_statement(&mut self) {
        let start = self.position;
        loop {
            let kind = self.peek().kind;
            match kind {
                TokenKind::Eof => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::LeftBrace => {
                    self.skip_balanced();
                    return;
                }
                TokenKind::RightBrace if self.position > start => return,
                kind if kind.is_open_delimiter() => self.skip_balanced(),
                _ => {
                    self.advance();
                }
            }
        }
    }
}

/// Describe a token for "found ..." messages.
pub(super) fn describe(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::Eof => "end of file".to_string(),
        _ if token.lexeme.is_empty() => token.kind.description().to_string(),
        _ => format!("'{}'", token.lexeme),
    }
}

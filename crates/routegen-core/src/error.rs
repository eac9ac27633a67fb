//! Unified error types for routegen.
//!
//! Every phase of the pipeline has its own error type so callers can handle
//! failures at the granularity they need, and each converts into
//! [`RoutegenError`] for callers that only want one type.
//!
//! ## Error Hierarchy
//!
//! ```text
//! RoutegenError (top-level wrapper)
//! ├── LexError       - tokenization errors
//! ├── ParseError     - declaration parser errors (with ParseErrorKind)
//! ├── BindError      - symbol registration and name resolution diagnostics
//! ├── ConfigError    - invalid generator options
//! └── Cancelled      - cooperative cancellation observed
//! ```
//!
//! Binder diagnostics never stop generation: a declaration that fails to bind is
//! simply not a handler. Only `Cancelled` aborts a pass.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during lexical analysis (tokenization).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// An unexpected character was encountered.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A string literal was not properly terminated.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A raw string literal (`"""`) was not properly terminated.
    #[error("unterminated raw string at {span}")]
    UnterminatedRawString { span: Span },

    /// A character literal was not properly terminated.
    #[error("unterminated character literal at {span}")]
    UnterminatedChar { span: Span },

    /// A block comment was not properly terminated.
    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },
}

impl LexError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::UnterminatedRawString { span } => *span,
            LexError::UnterminatedChar { span } => *span,
            LexError::UnterminatedComment { span } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A specific token was expected but not found.
    ExpectedToken,
    /// An unexpected token was encountered.
    UnexpectedToken,
    /// Unexpected end of file.
    UnexpectedEof,
    /// A type was expected.
    ExpectedType,
    /// A declaration was expected.
    ExpectedDeclaration,
    /// A class member was expected.
    ExpectedMember,
    /// An identifier was expected.
    ExpectedIdentifier,
    /// Mismatched delimiter (parentheses, brackets, braces).
    MismatchedDelimiter,
    /// A file-scoped namespace appeared after another namespace or a type.
    InvalidNamespace,
    /// Lexer error surfaced through the parser.
    InvalidToken,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedDeclaration => "expected declaration",
            ParseErrorKind::ExpectedMember => "expected member",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::MismatchedDelimiter => "mismatched delimiter",
            ParseErrorKind::InvalidNamespace => "invalid namespace",
            ParseErrorKind::InvalidToken => "invalid token",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// The category of this error.
    pub kind: ParseErrorKind,
    /// The source location where the error occurred.
    pub span: Span,
    /// A detailed error message.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(span: Span, token: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken,
            span,
            format!("unexpected token: {token}"),
        )
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedEof, span, "unexpected end of file")
    }

    /// Create an "expected identifier" error.
    pub fn expected_identifier(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedIdentifier,
            span,
            format!("expected identifier, found {found}"),
        )
    }

    /// Create an "expected type" error.
    pub fn expected_type(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedType,
            span,
            format!("expected type, found {found}"),
        )
    }

    /// Format the error with the offending source line and a caret.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = format!("Error at {}:{}: {}\n", self.span.line, self.span.col, self.kind);

        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        if let Some(line_text) = source.lines().nth((self.span.line as usize).saturating_sub(1)) {
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", self.span.line, line_text));

            let indent = " ".repeat((self.span.col as usize).saturating_sub(1));
            let pointer = if self.span.len <= 1 {
                "^".to_string()
            } else {
                "^".to_string() + &"~".repeat((self.span.len - 1) as usize)
            };
            output.push_str(&format!("  | {indent}{pointer}\n"));
        }

        output
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::new(ParseErrorKind::InvalidToken, error.span(), error.to_string())
    }
}

/// A collection of parse errors.
///
/// Lenient parsing keeps going after an error, so several can be reported at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// Create a new empty error collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    /// Convert to a Vec of errors.
    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl std::fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

// ============================================================================
// Bind Errors
// ============================================================================

/// Diagnostics produced while registering declarations and resolving names.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// A type with the same qualified name was already declared.
    #[error("at {span}: duplicate type '{name}'")]
    DuplicateType { name: String, span: Span },

    /// A base-list entry could not be resolved.
    #[error("at {span}: unknown type '{name}'")]
    UnknownType { name: String, span: Span },

    /// Several `using` imports bring the same simple name into scope.
    #[error("at {span}: ambiguous type '{name}': could be {candidates}")]
    AmbiguousType {
        name: String,
        candidates: String,
        span: Span,
    },

    /// A type inherits from itself, directly or transitively.
    #[error("at {span}: circular base type dependency involving '{name}'")]
    CircularInheritance { name: String, span: Span },
}

impl BindError {
    /// Get the span where this diagnostic was reported.
    pub fn span(&self) -> Span {
        match self {
            BindError::DuplicateType { span, .. } => *span,
            BindError::UnknownType { span, .. } => *span,
            BindError::AmbiguousType { span, .. } => *span,
            BindError::CircularInheritance { span, .. } => *span,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Invalid generator options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An option that must be a simple identifier is not one.
    #[error("option '{option}' must be an identifier, got '{value}'")]
    InvalidIdentifier { option: &'static str, value: String },

    /// An option that must be a dotted name is not one.
    #[error("option '{option}' must be a dotted name, got '{value}'")]
    InvalidQualifiedName { option: &'static str, value: String },

    /// Two artifacts were configured with the same hint name.
    #[error("artifact hint name '{0}' is used twice")]
    DuplicateHintName(String),

    /// Both generated operations were given the same name.
    #[error("registration method names must differ, both are '{0}'")]
    DuplicateMethodName(String),
}

// ============================================================================
// Cancellation
// ============================================================================

/// A pass observed its cancellation token and stopped without producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

// ============================================================================
// Top-level wrapper
// ============================================================================

/// Any error produced by routegen.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutegenError {
    /// Tokenization failed.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Several parse errors were reported.
    #[error(transparent)]
    ParseMany(#[from] ParseErrors),

    /// Binding produced a diagnostic.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The options are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The operation was cancelled.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_span() {
        let span = Span::new(2, 4, 1);
        assert_eq!(LexError::UnexpectedChar { ch: '$', span }.span(), span);
        assert_eq!(LexError::UnterminatedComment { span }.span(), span);
    }

    #[test]
    fn parse_error_display() {
        let error = ParseError::expected_token(Span::new(3, 7, 1), "'{'", "';'");
        assert_eq!(error.to_string(), "expected token at 3:7: expected '{', found ';'");
    }

    #[test]
    fn display_with_source_points_at_column() {
        let source = "namespace App;\npublic class ;";
        let error = ParseError::expected_identifier(Span::new(2, 14, 1), "';'");
        let rendered = error.display_with_source(source);
        assert!(rendered.contains("  2 | public class ;"));
        assert!(rendered.contains(&format!("  | {}^", " ".repeat(13))));
    }

    #[test]
    fn parse_errors_collection() {
        let mut errors = ParseErrors::new();
        assert!(errors.is_empty());
        errors.push(ParseError::unexpected_eof(Span::point(1, 1)));
        errors.push(ParseError::unexpected_token(Span::point(1, 2), "}"));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.to_string().lines().count(), 2);
    }

    #[test]
    fn lex_error_converts_to_parse_error() {
        let span = Span::new(1, 3, 5);
        let parse: ParseError = LexError::UnterminatedString { span }.into();
        assert_eq!(parse.kind, ParseErrorKind::InvalidToken);
        assert_eq!(parse.span, span);
    }

    #[test]
    fn wrapper_is_transparent() {
        let error: RoutegenError = Cancelled.into();
        assert_eq!(error.to_string(), "operation was cancelled");

        let bind: RoutegenError = BindError::DuplicateType {
            name: "App.Startup".into(),
            span: Span::new(4, 1, 5),
        }
        .into();
        assert_eq!(bind.to_string(), "at 4:1: duplicate type 'App.Startup'");
    }
}

//! Token types for the declaration lexer.

use routegen_core::Span;
use std::fmt;

/// A token from the source code.
///
/// The lexeme is copied into the arena, so the source string may be dropped
/// once lexing completes.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    pub kind: TokenKind,
    pub lexeme: &'ast str,
    pub span: Span,
}

impl<'ast> Token<'ast> {
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// Whether this is an identifier spelled `word`.
    ///
    /// Contextual keywords (`record`, `partial`, `where`, `global`, ...) lex as
    /// identifiers and are recognized with this.
    #[inline]
    pub fn is_contextual(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.lexeme == word
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// Token types.
///
/// Only reserved keywords get their own kind. Operators that never matter to the
/// declaration parser collapse into [`TokenKind::Symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// `"text"`, `@"text"`, `$"text {x}"`, `"""raw"""`
    StringLiteral,
    /// `'a'`
    CharLiteral,
    /// `42`, `0x1F`, `1.5m`
    NumberLiteral,

    Identifier,

    // =========================================
    // Predefined types
    // =========================================
    Bool,
    Byte,
    SByte,
    Char,
    Decimal,
    Double,
    Float,
    Int,
    UInt,
    Long,
    ULong,
    Short,
    UShort,
    Object,
    String,
    Void,

    // =========================================
    // Declaration keywords
    // =========================================
    Namespace,
    Using,
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Event,
    Operator,
    Implicit,
    Explicit,

    // =========================================
    // Modifiers
    // =========================================
    Public,
    Private,
    Protected,
    Internal,
    Static,
    Abstract,
    Sealed,
    Readonly,
    Virtual,
    Override,
    New,
    Extern,
    Unsafe,
    Const,
    Volatile,
    Fixed,

    // =========================================
    // Parameter modifiers
    // =========================================
    This,
    Base,
    Ref,
    Out,
    In,
    Params,

    /// Any other reserved word (`return`, `if`, `null`, ...).
    Keyword,

    // =========================================
    // Punctuation
    // =========================================
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    LessThan,
    GreaterThan,
    Comma,
    Semicolon,
    Colon,
    /// `::`
    ColonColon,
    Dot,
    Question,
    Equal,
    /// `=>`
    Arrow,
    Star,
    Tilde,
    /// Any operator character the declaration parser does not distinguish.
    Symbol,

    // =========================================
    // Special
    // =========================================
    Eof,
    Error,
}

impl TokenKind {
    /// Whether this keyword names a predefined type.
    pub fn is_predefined_type(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Bool | Byte
                | SByte
                | Char
                | Decimal
                | Double
                | Float
                | Int
                | UInt
                | Long
                | ULong
                | Short
                | UShort
                | Object
                | String
                | Void
        )
    }

    /// Whether this token opens a bracketed group.
    pub fn is_open_delimiter(self) -> bool {
        matches!(
            self,
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace
        )
    }

    /// Whether this token closes a bracketed group.
    pub fn is_close_delimiter(self) -> bool {
        matches!(
            self,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace
        )
    }

    /// Human-readable description used in error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            StringLiteral => "string literal",
            CharLiteral => "character literal",
            NumberLiteral => "number",
            Identifier => "identifier",
            Bool | Byte | SByte | Char | Decimal | Double | Float | Int | UInt | Long | ULong
            | Short | UShort | Object | String | Void => "type keyword",
            Namespace => "'namespace'",
            Using => "'using'",
            Class => "'class'",
            Struct => "'struct'",
            Interface => "'interface'",
            Enum => "'enum'",
            Delegate => "'delegate'",
            Event => "'event'",
            Operator => "'operator'",
            Implicit => "'implicit'",
            Explicit => "'explicit'",
            Public | Private | Protected | Internal | Static | Abstract | Sealed | Readonly
            | Virtual | Override | New | Extern | Unsafe | Const | Volatile | Fixed => "modifier",
            This => "'this'",
            Base => "'base'",
            Ref | Out | In | Params => "parameter modifier",
            Keyword => "keyword",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBracket => "'['",
            RightBracket => "']'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            LessThan => "'<'",
            GreaterThan => "'>'",
            Comma => "','",
            Semicolon => "';'",
            Colon => "':'",
            ColonColon => "'::'",
            Dot => "'.'",
            Question => "'?'",
            Equal => "'='",
            Arrow => "'=>'",
            Star => "'*'",
            Tilde => "'~'",
            Symbol => "operator symbol",
            Eof => "end of file",
            Error => "invalid token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Look up a reserved keyword.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "bool" => Bool,
        "byte" => Byte,
        "sbyte" => SByte,
        "char" => Char,
        "decimal" => Decimal,
        "double" => Double,
        "float" => Float,
        "int" => Int,
        "uint" => UInt,
        "long" => Long,
        "ulong" => ULong,
        "short" => Short,
        "ushort" => UShort,
        "object" => Object,
        "string" => String,
        "void" => Void,

        "namespace" => Namespace,
        "using" => Using,
        "class" => Class,
        "struct" => Struct,
        "interface" => Interface,
        "enum" => Enum,
        "delegate" => Delegate,
        "event" => Event,
        "operator" => Operator,
        "implicit" => Implicit,
        "explicit" => Explicit,

        "public" => Public,
        "private" => Private,
        "protected" => Protected,
        "internal" => Internal,
        "static" => Static,
        "abstract" => Abstract,
        "sealed" => Sealed,
        "readonly" => Readonly,
        "virtual" => Virtual,
        "override" => Override,
        "new" => New,
        "extern" => Extern,
        "unsafe" => Unsafe,
        "const" => Const,
        "volatile" => Volatile,
        "fixed" => Fixed,

        "this" => This,
        "base" => Base,
        "ref" => Ref,
        "out" => Out,
        "in" => In,
        "params" => Params,

        "as" | "break" | "case" | "catch" | "checked" | "continue" | "default" | "do"
        | "else" | "false" | "finally" | "for" | "foreach" | "goto" | "if" | "is" | "lock"
        | "null" | "return" | "sizeof" | "stackalloc" | "switch" | "throw" | "true" | "try"
        | "typeof" | "unchecked" | "while" => Keyword,

        _ => return None,
    })
}

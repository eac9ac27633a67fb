//! Type and parameter parsing.
//!
//! Implements parsing of:
//! - keyword types (`int`, `string`)
//! - dotted and generic names (`App.Models.Order`, `ILogger<T>`)
//! - `global::` qualified names
//! - tuples, and the `?`, `[]`, `*` suffixes
//! - parameter lists with modifiers and defaults

use routegen_core::ParseError;

use super::parser::{Parser, describe};
use super::*;
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse a type expression.
    ///
    /// Grammar: `(PREDEFINED | NAMED | TUPLE) ('?' | '[' ','* ']' | '*')*`
    pub fn parse_type(&mut self) -> Result<TypeExpr<'ast>, ParseError> {
        let token = self.peek();
        let mut ty = match token.kind {
            TokenKind::LeftParen => self.parse_tuple_type()?,
            kind if kind.is_predefined_type() => {
                self.advance();
                TypeExpr::Predefined(predefined(kind), token.span)
            }
            TokenKind::Identifier => TypeExpr::Named(self.parse_named_type()?),
            TokenKind::Eof => return Err(ParseError::unexpected_eof(token.span)),
            _ => return Err(ParseError::expected_type(token.span, &describe(&token))),
        };

        loop {
            match self.peek().kind {
                TokenKind::Question => {
                    self.advance();
                    let span = self.span_from(ty.span());
                    ty = TypeExpr::Nullable(self.arena.alloc(ty), span);
                }
                TokenKind::LeftBracket
                    if matches!(
                        self.peek_nth(1).kind,
                        TokenKind::RightBracket | TokenKind::Comma
                    ) =>
                {
                    self.advance();
                    let mut rank = 1u8;
                    while self.eat(TokenKind::Comma).is_some() {
                        rank = rank.saturating_add(1);
                    }
                    self.expect(TokenKind::RightBracket)?;
                    let span = self.span_from(ty.span());
                    ty = TypeExpr::Array(self.arena.alloc(ty), rank, span);
                }
                TokenKind::Star => {
                    self.advance();
                    let span = self.span_from(ty.span());
                    ty = TypeExpr::Pointer(self.arena.alloc(ty), span);
                }
                _ => return Ok(ty),
            }
        }
    }

    /// Parse `global::`? `Name<Args>` (`.` `Name<Args>`)*.
    pub(super) fn parse_named_type(&mut self) -> Result<NamedType<'ast>, ParseError> {
        let start = self.peek().span;
        let global =
            if self.check_contextual("global") && self.peek_nth(1).kind == TokenKind::ColonColon {
                self.advance();
                self.advance();
                true
            } else {
                false
            };

        let mut segments = Vec::new();
        loop {
            let name = self.expect_identifier()?;
            let args = if self.check(TokenKind::LessThan) {
                self.parse_type_args()?
            } else {
                &[]
            };
            segments.push(NameSegment { name, args });

            if self.check(TokenKind::Dot) && self.peek_nth(1).kind == TokenKind::Identifier {
                self.advance();
            } else {
                break;
            }
        }

        Ok(NamedType {
            global,
            segments: self.alloc_slice(segments),
            span: self.span_from(start),
        })
    }

    /// Parse `<T1, T2>`.
    pub(super) fn parse_type_args(&mut self) -> Result<&'ast [TypeExpr<'ast>], ParseError> {
        self.expect(TokenKind::LessThan)?;
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::GreaterThan)?;
        Ok(self.alloc_slice(args))
    }

    /// Parse `(int Id, string Name)`; element names are optional.
    fn parse_tuple_type(&mut self) -> Result<TypeExpr<'ast>, ParseError> {
        let open = self.expect(TokenKind::LeftParen)?;
        let mut elements = Vec::new();
        loop {
            let ty = self.parse_type()?;
            let name = if self.check(TokenKind::Identifier) {
                Some(self.expect_identifier()?)
            } else {
                None
            };
            elements.push(TupleElement { ty, name });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(TypeExpr::Tuple(
            self.alloc_slice(elements),
            self.span_from(open.span),
        ))
    }

    /// Parse a parenthesized parameter list.
    ///
    /// Grammar: `'(' (ATTRS? PARAM_MODS TYPE IDENT ('=' DEFAULT)?) % ',' ')'`
    pub(super) fn parse_params(&mut self) -> Result<&'ast [Param<'ast>], ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();

        if self.eat(TokenKind::RightParen).is_some() {
            return Ok(&[]);
        }

        loop {
            self.skip_attributes();
            let start = self.peek().span;
            let modifiers = self.parse_param_modifiers();
            let ty = self.parse_type()?;
            let name = self.expect_identifier()?;

            let has_default = if self.eat(TokenKind::Equal).is_some() {
                self.skip_until(|k| k == TokenKind::Comma);
                true
            } else {
                false
            };

            params.push(Param {
                modifiers,
                ty,
                name,
                has_default,
                span: self.span_from(start),
            });

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        self.expect(TokenKind::RightParen)?;
        Ok(self.alloc_slice(params))
    }

    fn parse_param_modifiers(&mut self) -> ParamModifiers {
        let mut modifiers = ParamModifiers::empty();
        loop {
            let token = self.peek();
            let flag = match token.kind {
                TokenKind::This => ParamModifiers::THIS,
                TokenKind::Ref => ParamModifiers::REF,
                TokenKind::Out => ParamModifiers::OUT,
                TokenKind::In => ParamModifiers::IN,
                TokenKind::Params => ParamModifiers::PARAMS,
                TokenKind::Readonly => ParamModifiers::READONLY,
                TokenKind::Identifier
                    if token.lexeme == "scoped"
                        && matches!(
                            self.peek_nth(1).kind,
                            TokenKind::Ref | TokenKind::In | TokenKind::Out | TokenKind::Identifier
                        )
                        && self.peek_nth(2).kind != TokenKind::Comma
                        && self.peek_nth(2).kind != TokenKind::RightParen =>
                {
                    ParamModifiers::SCOPED
                }
                _ => return modifiers,
            };
            modifiers |= flag;
            self.advance();
        }
    }
}

fn predefined(kind: TokenKind) -> PredefinedType {
    match kind {
        TokenKind::Bool => PredefinedType::Bool,
        TokenKind::Byte => PredefinedType::Byte,
        TokenKind::SByte => PredefinedType::SByte,
        TokenKind::Char => PredefinedType::Char,
        TokenKind::Decimal => PredefinedType::Decimal,
        TokenKind::Double => PredefinedType::Double,
        TokenKind::Float => PredefinedType::Float,
        TokenKind::Int => PredefinedType::Int,
        TokenKind::UInt => PredefinedType::UInt,
        TokenKind::Long => PredefinedType::Long,
        TokenKind::ULong => PredefinedType::ULong,
        TokenKind::Short => PredefinedType::Short,
        TokenKind::UShort => PredefinedType::UShort,
        TokenKind::String => PredefinedType::String,
        TokenKind::Void => PredefinedType::Void,
        _ => PredefinedType::Object,
    }
}

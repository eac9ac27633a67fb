//! Declaration parsing.
//!
//! Implements parsing of:
//! - compilation units, using directives, block and file-scoped namespaces
//! - class, struct, record, interface, and enum declarations
//! - member signatures (constructors, methods, fields, properties)
//!
//! Everything below the signature level (bodies, initializers, attribute
//! arguments, constraint clauses) is skipped with bracket balancing.

use routegen_core::{ParseError, ParseErrorKind, Span};

use super::parser::{Parser, describe};
use super::*;
use crate::lexer::TokenKind;

/// Where a namespace body is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyContext {
    /// The compilation unit itself; top-level statements are allowed.
    TopLevel,
    /// `namespace X { ... }`
    Block,
    /// The rest of the file after `namespace X;`
    FileScoped,
}

impl<'ast> Parser<'ast> {
    /// Parse a whole file.
    pub fn parse_compilation_unit(&mut self) -> CompilationUnit<'ast> {
        let start = self.peek().span;
        let (usings, items) = self.parse_namespace_body(BodyContext::TopLevel);
        CompilationUnit {
            usings,
            items,
            decl_count: self.decl_count(),
            span: self.span_from(start),
        }
    }

    /// Parse usings and items until the body ends.
    fn parse_namespace_body(
        &mut self,
        context: BodyContext,
    ) -> (&'ast [UsingDirective<'ast>], &'ast [Item<'ast>]) {
        let mut usings = Vec::new();
        let mut items = Vec::new();
        let mut allow_statements = context == BodyContext::TopLevel;

        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => {
                    if context == BodyContext::Block {
                        self.error(ParseError::unexpected_eof(token.span));
                    }
                    break;
                }
                TokenKind::RightBrace if context == BodyContext::Block => break,
                TokenKind::RightBrace => {
                    self.error(ParseError::unexpected_token(token.span, "}"));
                    self.advance();
                }
                TokenKind::Semicolon => {
                    self.advance();
                }
                TokenKind::LeftBracket => self.skip_attributes(),
                TokenKind::Using if self.peek_nth(1).kind != TokenKind::LeftParen => {
                    self.parse_using_or_recover(&mut usings);
                }
                TokenKind::Identifier
                    if token.lexeme == "global" && self.peek_nth(1).kind == TokenKind::Using =>
                {
                    self.parse_using_or_recover(&mut usings);
                }
                TokenKind::Namespace => {
                    allow_statements = false;
                    let allow_file_scoped = context == BodyContext::TopLevel && items.is_empty();
                    match self.parse_namespace(allow_file_scoped) {
                        Ok(ns) => {
                            let file_scoped = ns.file_scoped;
                            items.push(Item::Namespace(ns));
                            if file_scoped {
                                break;
                            }
                        }
                        Err(error) => {
                            self.error(error);
                            self.synchronize();
                        }
                    }
                }
                _ => {
                    let start = self.position;
                    let start_span = token.span;
                    let modifiers = self.parse_modifiers();

                    if self.at_type_keyword() {
                        allow_statements = false;
                        match self.parse_type_decl(modifiers, start_span) {
                            Ok(decl) => items.push(Item::Type(decl)),
                            Err(error) => {
                                self.error(error);
                                self.synchronize();
                            }
                        }
                    } else if self.check(TokenKind::Delegate) {
                        self.skip_until(|k| k == TokenKind::Semicolon);
                        self.eat(TokenKind::Semicolon);
                    } else if allow_statements {
                        self.position = start;
                        self.skip_statement();
                    } else {
                        let found = self.peek();
                        self.error_at(
                            ParseErrorKind::ExpectedDeclaration,
                            found.span,
                            format!("expected declaration, found {}", describe(&found)),
                        );
                        self.position = start;
                        self.skip_statement();
                    }
                }
            }
        }

        (self.alloc_slice(usings), self.alloc_slice(items))
    }

    fn parse_using_or_recover(&mut self, usings: &mut Vec<UsingDirective<'ast>>) {
        match self.parse_using() {
            Ok(using) => usings.push(using),
            Err(error) => {
                self.error(error);
                self.synchronize();
            }
        }
    }

    /// Parse a using directive.
    ///
    /// Grammar: `'global'? 'using' 'static'? (IDENT '=')? ('global' '::')? PATH ';'`
    ///
    /// Alias targets with type arguments keep only their dotted path.
    fn parse_using(&mut self) -> Result<UsingDirective<'ast>, ParseError> {
        let start = self.peek().span;
        let is_global = self.eat_contextual("global").is_some();
        self.expect(TokenKind::Using)?;
        let is_static = self.eat(TokenKind::Static).is_some();

        let alias = if self.check(TokenKind::Identifier) && self.peek_nth(1).kind == TokenKind::Equal
        {
            let alias = self.expect_identifier()?;
            self.advance();
            Some(alias)
        } else {
            None
        };

        if self.check_contextual("global") && self.peek_nth(1).kind == TokenKind::ColonColon {
            self.advance();
            self.advance();
        }

        let path = self.parse_dotted_path()?;
        self.skip_until(|k| k == TokenKind::Semicolon);
        self.expect(TokenKind::Semicolon)?;

        Ok(UsingDirective {
            path,
            alias,
            is_static,
            is_global,
            span: self.span_from(start),
        })
    }

    /// Parse a namespace declaration.
    ///
    /// Grammar: `'namespace' PATH (';' | '{' BODY '}' ';'?)`
    fn parse_namespace(
        &mut self,
        allow_file_scoped: bool,
    ) -> Result<&'ast NamespaceDecl<'ast>, ParseError> {
        let keyword = self.expect(TokenKind::Namespace)?;
        let path = self.parse_dotted_path()?;

        if self.eat(TokenKind::Semicolon).is_some() {
            if !allow_file_scoped {
                self.error_at(
                    ParseErrorKind::InvalidNamespace,
                    keyword.span,
                    "file-scoped namespace must precede all other declarations",
                );
            }
            let header = self.span_from(keyword.span);
            let (usings, items) = self.parse_namespace_body(BodyContext::FileScoped);
            let span = items.last().map_or(header, |item| header.merge(item.span()));
            return Ok(self.arena.alloc(NamespaceDecl {
                path,
                file_scoped: true,
                usings,
                items,
                span,
            }));
        }

        self.expect(TokenKind::LeftBrace)?;
        let (usings, items) = self.parse_namespace_body(BodyContext::Block);
        self.expect(TokenKind::RightBrace)?;
        self.eat(TokenKind::Semicolon);

        Ok(self.arena.alloc(NamespaceDecl {
            path,
            file_scoped: false,
            usings,
            items,
            span: self.span_from(keyword.span),
        }))
    }

    /// Parse `A.B.C`.
    fn parse_dotted_path(&mut self) -> Result<&'ast [Ident<'ast>], ParseError> {
        let mut path = vec![self.expect_identifier()?];
        while self.check(TokenKind::Dot) && self.peek_nth(1).kind == TokenKind::Identifier {
            self.advance();
            path.push(self.expect_identifier()?);
        }
        Ok(self.alloc_slice(path))
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    /// Parse declaration modifiers, including the contextual ones.
    pub(super) fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        loop {
            let token = self.peek();
            let flag = match token.kind {
                TokenKind::Public => Modifiers::PUBLIC,
                TokenKind::Private => Modifiers::PRIVATE,
                TokenKind::Protected => Modifiers::PROTECTED,
                TokenKind::Internal => Modifiers::INTERNAL,
                TokenKind::Static => Modifiers::STATIC,
                TokenKind::Abstract => Modifiers::ABSTRACT,
                TokenKind::Sealed => Modifiers::SEALED,
                TokenKind::Readonly => Modifiers::READONLY,
                TokenKind::Virtual => Modifiers::VIRTUAL,
                TokenKind::Override => Modifiers::OVERRIDE,
                TokenKind::New => Modifiers::NEW,
                TokenKind::Extern => Modifiers::EXTERN,
                TokenKind::Unsafe => Modifiers::UNSAFE,
                TokenKind::Const => Modifiers::CONST,
                TokenKind::Volatile => Modifiers::VOLATILE,
                TokenKind::Fixed => Modifiers::FIXED,
                TokenKind::Ref if self.ref_struct_follows() => Modifiers::REF,
                TokenKind::Identifier if self.contextual_modifier_follows() => {
                    match token.lexeme {
                        "partial" => Modifiers::PARTIAL,
                        "async" => Modifiers::ASYNC,
                        "required" => Modifiers::REQUIRED,
                        "file" => Modifiers::FILE,
                        _ => break,
                    }
                }
                _ => break,
            };
            modifiers |= flag;
            self.advance();
        }
        modifiers
    }

    /// `ref` before `struct` (possibly through `readonly` / `partial`).
    fn ref_struct_follows(&self) -> bool {
        let mut n = 1;
        loop {
            let token = self.peek_nth(n);
            match token.kind {
                TokenKind::Struct => return true,
                TokenKind::Readonly => n += 1,
                TokenKind::Identifier if token.lexeme == "partial" => n += 1,
                _ => return false,
            }
        }
    }

    /// A contextual modifier is followed by something that can continue a declaration.
    fn contextual_modifier_follows(&self) -> bool {
        let next = self.peek_nth(1);
        matches!(
            next.kind,
            TokenKind::Identifier
                | TokenKind::Class
                | TokenKind::Struct
                | TokenKind::Interface
                | TokenKind::Enum
                | TokenKind::Delegate
                | TokenKind::Ref
                | TokenKind::LeftParen
        ) || next.kind.is_predefined_type()
            || matches!(
                next.kind,
                TokenKind::Public
                    | TokenKind::Private
                    | TokenKind::Protected
                    | TokenKind::Internal
                    | TokenKind::Static
                    | TokenKind::Abstract
                    | TokenKind::Sealed
                    | TokenKind::Readonly
                    | TokenKind::Virtual
                    | TokenKind::Override
                    | TokenKind::New
                    | TokenKind::Unsafe
            )
    }

    /// Whether a type declaration keyword is next.
    pub(super) fn at_type_keyword(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenKind::Class | TokenKind::Struct | TokenKind::Interface | TokenKind::Enum => true,
            TokenKind::Identifier if token.lexeme == "record" => matches!(
                self.peek_nth(1).kind,
                TokenKind::Identifier | TokenKind::Class | TokenKind::Struct
            ),
            _ => false,
        }
    }

    // ========================================================================
    // Type declarations
    // ========================================================================

    /// Parse a type declaration after its modifiers.
    ///
    /// Grammar: `KIND IDENT TYPEPARAMS? PARAMS? (':' BASES)? CONSTRAINTS* (';' | '{' MEMBERS '}' ';'?)`
    pub(super) fn parse_type_decl(
        &mut self,
        modifiers: Modifiers,
        start: Span,
    ) -> Result<&'ast TypeDecl<'ast>, ParseError> {
        let keyword = self.advance();
        let kind = match keyword.kind {
            TokenKind::Class => TypeKind::Class,
            TokenKind::Struct => TypeKind::Struct,
            TokenKind::Interface => TypeKind::Interface,
            TokenKind::Enum => TypeKind::Enum,
            _ => {
                if self.eat(TokenKind::Struct).is_some() {
                    TypeKind::RecordStruct
                } else {
                    self.eat(TokenKind::Class);
                    TypeKind::Record
                }
            }
        };

        let id = self.next_decl_id();
        let name = self.expect_identifier()?;

        let type_params = if self.check(TokenKind::LessThan) {
            self.parse_type_params()?
        } else {
            &[]
        };

        let primary_ctor = if self.check(TokenKind::LeftParen) && kind.is_class_like() {
            Some(self.parse_params()?)
        } else {
            None
        };

        let mut bases = Vec::new();
        if self.eat(TokenKind::Colon).is_some() {
            loop {
                bases.push(self.parse_type()?);
                // `record Derived(int X) : Base(X)`
                if self.check(TokenKind::LeftParen) {
                    self.skip_balanced();
                }
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        while self.check_contextual("where") {
            self.skip_until(|k| matches!(k, TokenKind::LeftBrace | TokenKind::Semicolon));
        }

        let members = if self.eat(TokenKind::Semicolon).is_some() {
            &[]
        } else if kind == TypeKind::Enum {
            if !self.check(TokenKind::LeftBrace) {
                self.expect(TokenKind::LeftBrace)?;
            }
            self.skip_balanced();
            self.eat(TokenKind::Semicolon);
            &[]
        } else {
            self.expect(TokenKind::LeftBrace)?;
            let members = self.parse_members(name.name);
            self.expect(TokenKind::RightBrace)?;
            self.eat(TokenKind::Semicolon);
            members
        };

        Ok(self.arena.alloc(TypeDecl {
            id,
            kind,
            modifiers,
            name,
            type_params,
            primary_ctor,
            bases: self.alloc_slice(bases),
            members,
            span: self.span_from(start),
        }))
    }

    /// Parse `<T, in U, out V>`.
    fn parse_type_params(&mut self) -> Result<&'ast [Ident<'ast>], ParseError> {
        self.expect(TokenKind::LessThan)?;
        let mut params = Vec::new();
        loop {
            self.skip_attributes();
            if self.eat(TokenKind::In).is_none() {
                self.eat(TokenKind::Out);
            }
            params.push(self.expect_identifier()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::GreaterThan)?;
        Ok(self.alloc_slice(params))
    }

    // ========================================================================
    // Members
    // ========================================================================

    /// Parse members until the closing brace of the type.
    fn parse_members(&mut self, type_name: &str) -> &'ast [Member<'ast>] {
        let mut members = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::RightBrace | TokenKind::Eof => break,
                TokenKind::LeftBracket => self.skip_attributes(),
                TokenKind::Semicolon => {
                    self.advance();
                }
                _ => match self.parse_member(type_name) {
                    Ok(Some(member)) => members.push(member),
                    Ok(None) => {}
                    Err(error) => {
                        self.error(error);
                        self.synchronize();
                    }
                },
            }
        }
        self.alloc_slice(members)
    }

    /// Parse one member. Members without a node (events, destructors,
    /// conversion operators, delegates) yield `None`.
    fn parse_member(&mut self, type_name: &str) -> Result<Option<Member<'ast>>, ParseError> {
        let start = self.peek().span;
        let modifiers = self.parse_modifiers();

        if self.at_type_keyword() {
            let decl = self.parse_type_decl(modifiers, start)?;
            return Ok(Some(Member::Type(decl)));
        }

        let token = self.peek();
        match token.kind {
            TokenKind::Delegate => {
                self.skip_until(|k| k == TokenKind::Semicolon);
                self.expect(TokenKind::Semicolon)?;
                return Ok(None);
            }
            TokenKind::Event => {
                self.skip_until(|k| matches!(k, TokenKind::Semicolon | TokenKind::LeftBrace));
                if self.check(TokenKind::LeftBrace) {
                    self.skip_balanced();
                } else {
                    self.expect(TokenKind::Semicolon)?;
                }
                return Ok(None);
            }
            TokenKind::Tilde => {
                self.advance();
                self.expect_identifier()?;
                self.parse_params()?;
                self.skip_body()?;
                return Ok(None);
            }
            TokenKind::Implicit | TokenKind::Explicit => {
                self.skip_until(|k| k == TokenKind::LeftParen);
                self.parse_params()?;
                self.skip_body()?;
                return Ok(None);
            }
            TokenKind::Identifier
                if token.lexeme == type_name && self.peek_nth(1).kind == TokenKind::LeftParen =>
            {
                return self.parse_constructor(modifiers, start).map(Some);
            }
            _ => {}
        }

        // `ref int Find()` / `ref readonly T Get()`
        if self.eat(TokenKind::Ref).is_some() {
            self.eat(TokenKind::Readonly);
        }
        let ty = self.parse_type()?;

        if self.eat(TokenKind::Operator).is_some() {
            let name = Ident::new(self.arena.alloc_str("operator"), self.previous_span());
            self.skip_until(|k| k == TokenKind::LeftParen);
            let params = self.parse_params()?;
            self.skip_body()?;
            return Ok(Some(Member::Method(self.arena.alloc(MethodDecl {
                modifiers,
                return_type: ty,
                name,
                type_params: &[],
                params,
                span: self.span_from(start),
            }))));
        }

        if self.check(TokenKind::This) && self.peek_nth(1).kind == TokenKind::LeftBracket {
            let this = self.advance();
            self.skip_balanced();
            self.skip_accessors()?;
            return Ok(Some(Member::Property(self.arena.alloc(PropertyDecl {
                modifiers,
                ty,
                name: Ident::new(this.lexeme, this.span),
                span: self.span_from(start),
            }))));
        }

        let name = self.parse_member_name()?;

        match self.peek().kind {
            TokenKind::LessThan | TokenKind::LeftParen => {
                let type_params = if self.check(TokenKind::LessThan) {
                    self.parse_type_params()?
                } else {
                    &[]
                };
                let params = self.parse_params()?;
                while self.check_contextual("where") {
                    self.skip_until(|k| {
                        matches!(k, TokenKind::LeftBrace | TokenKind::Semicolon | TokenKind::Arrow)
                    });
                }
                self.skip_body()?;
                Ok(Some(Member::Method(self.arena.alloc(MethodDecl {
                    modifiers,
                    return_type: ty,
                    name,
                    type_params,
                    params,
                    span: self.span_from(start),
                }))))
            }
            TokenKind::LeftBrace | TokenKind::Arrow => {
                self.skip_accessors()?;
                Ok(Some(Member::Property(self.arena.alloc(PropertyDecl {
                    modifiers,
                    ty,
                    name,
                    span: self.span_from(start),
                }))))
            }
            TokenKind::Equal | TokenKind::Semicolon | TokenKind::Comma | TokenKind::LeftBracket => {
                let mut names = vec![name];
                loop {
                    // `fixed byte buffer[16];`
                    if self.check(TokenKind::LeftBracket) {
                        self.skip_balanced();
                    }
                    if self.eat(TokenKind::Equal).is_some() {
                        self.skip_until(|k| matches!(k, TokenKind::Comma | TokenKind::Semicolon));
                    }
                    if self.eat(TokenKind::Comma).is_none() {
                        break;
                    }
                    names.push(self.expect_identifier()?);
                }
                self.expect(TokenKind::Semicolon)?;
                Ok(Some(Member::Field(self.arena.alloc(FieldDecl {
                    modifiers,
                    ty,
                    names: self.alloc_slice(names),
                    span: self.span_from(start),
                }))))
            }
            _ => {
                let found = self.peek();
                Err(ParseError::new(
                    ParseErrorKind::ExpectedMember,
                    found.span,
                    format!("expected member, found {}", describe(&found)),
                ))
            }
        }
    }

    /// Parse a constructor after its modifiers.
    ///
    /// Grammar: `IDENT PARAMS (':' ('base' | 'this') ARGS)? BODY`
    fn parse_constructor(
        &mut self,
        modifiers: Modifiers,
        start: Span,
    ) -> Result<Member<'ast>, ParseError> {
        let name = self.expect_identifier()?;
        let params = self.parse_params()?;

        if self.eat(TokenKind::Colon).is_some() {
            if self.eat(TokenKind::Base).is_none() {
                self.expect(TokenKind::This)?;
            }
            if !self.check(TokenKind::LeftParen) {
                self.expect(TokenKind::LeftParen)?;
            }
            self.skip_balanced();
        }

        self.skip_body()?;
        Ok(Member::Constructor(self.arena.alloc(ConstructorDecl {
            modifiers,
            name,
            params,
            span: self.span_from(start),
        })))
    }

    /// Parse a member name, including explicit interface qualification
    /// (`IEndpoint.MapEndpoint`, `IHandler<T>.Handle`). Only the last
    /// segment is kept.
    fn parse_member_name(&mut self) -> Result<Ident<'ast>, ParseError> {
        let mut name = self.expect_identifier()?;
        loop {
            if self.check(TokenKind::Dot) {
                self.advance();
                name = self.expect_identifier()?;
            } else if self.check(TokenKind::LessThan) && self.generic_qualifier_follows() {
                self.parse_type_args()?;
            } else {
                return Ok(name);
            }
        }
    }

    /// Whether `<...>` at the current position is followed by `.`.
    fn generic_qualifier_follows(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            match self.peek_nth(n).kind {
                TokenKind::LessThan => depth += 1,
                TokenKind::GreaterThan => {
                    depth -= 1;
                    if depth == 0 {
                        return self.peek_nth(n + 1).kind == TokenKind::Dot;
                    }
                }
                TokenKind::Eof
                | TokenKind::LeftParen
                | TokenKind::LeftBrace
                | TokenKind::Semicolon
                | TokenKind::Equal => return false,
                _ => {}
            }
            n += 1;
        }
    }

    /// Skip a method or constructor body: `{ ... }`, `=> expr;`, or `;`.
    fn skip_body(&mut self) -> Result<(), ParseError> {
        match self.peek().kind {
            TokenKind::LeftBrace => {
                self.skip_balanced();
                Ok(())
            }
            TokenKind::Arrow => {
                self.advance();
                self.skip_until(|k| k == TokenKind::Semicolon);
                self.expect(TokenKind::Semicolon)?;
                Ok(())
            }
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            _ => {
                let found = self.peek();
                Err(ParseError::expected_token(
                    found.span,
                    "'{', '=>' or ';'",
                    &describe(&found),
                ))
            }
        }
    }

    /// Skip property accessors, with an optional initializer: `{ get; } = value;`.
    fn skip_accessors(&mut self) -> Result<(), ParseError> {
        if self.eat(TokenKind::Arrow).is_some() {
            self.skip_until(|k| k == TokenKind::Semicolon);
            self.expect(TokenKind::Semicolon)?;
            return Ok(());
        }
        if !self.check(TokenKind::LeftBrace) {
            self.expect(TokenKind::LeftBrace)?;
        }
        self.skip_balanced();
        if self.eat(TokenKind::Equal).is_some() {
            self.skip_until(|k| k == TokenKind::Semicolon);
            self.expect(TokenKind::Semicolon)?;
        }
        Ok(())
    }
}

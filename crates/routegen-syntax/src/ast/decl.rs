//! Declaration AST nodes.
//!
//! Only the declaration skeleton is kept: namespaces, using directives, type
//! declarations, and member signatures. Member bodies, initializers, and
//! attributes are skipped by the parser and have no nodes.

use bitflags::bitflags;
use routegen_core::{DeclId, Span};

use super::types::TypeExpr;

/// An identifier with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// The root of one parsed file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompilationUnit<'ast> {
    pub usings: &'ast [UsingDirective<'ast>],
    pub items: &'ast [Item<'ast>],
    /// Number of type declarations in the file; [`DeclId`]s run from zero to this.
    pub decl_count: u32,
    pub span: Span,
}

/// A namespace-level item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'ast> {
    Namespace(&'ast NamespaceDecl<'ast>),
    Type(&'ast TypeDecl<'ast>),
}

impl Item<'_> {
    pub fn span(&self) -> Span {
        match self {
            Item::Namespace(ns) => ns.span,
            Item::Type(ty) => ty.span,
        }
    }
}

/// `namespace A.B { ... }` or the file-scoped `namespace A.B;`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamespaceDecl<'ast> {
    pub path: &'ast [Ident<'ast>],
    pub file_scoped: bool,
    pub usings: &'ast [UsingDirective<'ast>],
    pub items: &'ast [Item<'ast>],
    pub span: Span,
}

impl NamespaceDecl<'_> {
    /// The dotted path as written, e.g. `"App.Orders"`.
    pub fn path_string(&self) -> String {
        join_idents(self.path)
    }
}

/// `using A.B;`, `using static A.B;`, `global using A.B;`, `using X = A.B;`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsingDirective<'ast> {
    pub path: &'ast [Ident<'ast>],
    pub alias: Option<Ident<'ast>>,
    pub is_static: bool,
    pub is_global: bool,
    pub span: Span,
}

impl UsingDirective<'_> {
    pub fn path_string(&self) -> String {
        join_idents(self.path)
    }
}

fn join_idents(path: &[Ident<'_>]) -> String {
    let mut out = String::new();
    for (i, ident) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(ident.name);
    }
    out
}

/// The kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    /// `record` and `record class`
    Record,
    /// `record struct`
    RecordStruct,
    Interface,
    Enum,
}

impl TypeKind {
    /// Classes, structs, and records: the kinds that can be instantiated.
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            TypeKind::Class | TypeKind::Struct | TypeKind::Record | TypeKind::RecordStruct
        )
    }

    /// Classes and records: class-like kinds with reference semantics.
    pub fn is_reference_class(self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Record)
    }

    pub fn is_value_type(self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::RecordStruct | TypeKind::Enum)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Record => "record",
            TypeKind::RecordStruct => "record struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
        }
    }
}

bitflags! {
    /// Declaration modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const INTERNAL = 1 << 3;
        const STATIC = 1 << 4;
        const ABSTRACT = 1 << 5;
        const SEALED = 1 << 6;
        const PARTIAL = 1 << 7;
        const READONLY = 1 << 8;
        const VIRTUAL = 1 << 9;
        const OVERRIDE = 1 << 10;
        const NEW = 1 << 11;
        const EXTERN = 1 << 12;
        const UNSAFE = 1 << 13;
        const ASYNC = 1 << 14;
        const CONST = 1 << 15;
        const VOLATILE = 1 << 16;
        const REQUIRED = 1 << 17;
        /// `file class X`
        const FILE = 1 << 18;
        /// `ref struct X`
        const REF = 1 << 19;
        const FIXED = 1 << 20;
    }
}

bitflags! {
    /// Parameter modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamModifiers: u8 {
        const THIS = 1 << 0;
        const REF = 1 << 1;
        const OUT = 1 << 2;
        const IN = 1 << 3;
        const PARAMS = 1 << 4;
        const SCOPED = 1 << 5;
        const READONLY = 1 << 6;
    }
}

/// A class, struct, record, interface, or enum declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeDecl<'ast> {
    /// Position of this declaration in document order within its file.
    pub id: DeclId,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub name: Ident<'ast>,
    pub type_params: &'ast [Ident<'ast>],
    /// `record Point(int X, int Y)` / `class Service(IClock clock)`
    pub primary_ctor: Option<&'ast [Param<'ast>]>,
    /// The base list after `:`; base class and interfaces are not told apart here.
    pub bases: &'ast [TypeExpr<'ast>],
    pub members: &'ast [Member<'ast>],
    pub span: Span,
}

impl<'ast> TypeDecl<'ast> {
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Nested type declarations, in order.
    pub fn nested_types(&self) -> impl Iterator<Item = &'ast TypeDecl<'ast>> + use<'ast> {
        self.members.iter().filter_map(|member| match member {
            Member::Type(decl) => Some(*decl),
            _ => None,
        })
    }

    /// Explicitly declared constructors, static ones included, in order.
    pub fn constructors(&self) -> impl Iterator<Item = &'ast ConstructorDecl<'ast>> + use<'ast> {
        self.members.iter().filter_map(|member| match member {
            Member::Constructor(ctor) => Some(*ctor),
            _ => None,
        })
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Member<'ast> {
    Type(&'ast TypeDecl<'ast>),
    Constructor(&'ast ConstructorDecl<'ast>),
    Method(&'ast MethodDecl<'ast>),
    Field(&'ast FieldDecl<'ast>),
    Property(&'ast PropertyDecl<'ast>),
}

impl Member<'_> {
    pub fn span(&self) -> Span {
        match self {
            Member::Type(decl) => decl.span,
            Member::Constructor(ctor) => ctor.span,
            Member::Method(method) => method.span,
            Member::Field(field) => field.span,
            Member::Property(property) => property.span,
        }
    }
}

/// `public Handler(ILogger<Handler> logger) : base(logger) { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructorDecl<'ast> {
    pub modifiers: Modifiers,
    pub name: Ident<'ast>,
    pub params: &'ast [Param<'ast>],
    pub span: Span,
}

impl ConstructorDecl<'_> {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }
}

/// A method signature. Operators are named `operator`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodDecl<'ast> {
    pub modifiers: Modifiers,
    pub return_type: TypeExpr<'ast>,
    pub name: Ident<'ast>,
    pub type_params: &'ast [Ident<'ast>],
    pub params: &'ast [Param<'ast>],
    pub span: Span,
}

/// A field declaration; `int a, b;` declares two names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    pub modifiers: Modifiers,
    pub ty: TypeExpr<'ast>,
    pub names: &'ast [Ident<'ast>],
    pub span: Span,
}

/// A property or indexer. Indexers are named `this`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDecl<'ast> {
    pub modifiers: Modifiers,
    pub ty: TypeExpr<'ast>,
    pub name: Ident<'ast>,
    pub span: Span,
}

/// A constructor, method, or primary-constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub modifiers: ParamModifiers,
    pub ty: TypeExpr<'ast>,
    pub name: Ident<'ast>,
    pub has_default: bool,
    pub span: Span,
}

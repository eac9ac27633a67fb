//! Type expressions as written in declarations.
//!
//! Examples:
//! - `int`, `string?`, `byte[]`
//! - `ILogger<GetOrder>`
//! - `global::App.Services.IClock`
//! - `(int Id, string Name)`

use std::fmt;

use routegen_core::Span;

use super::Ident;

/// A type as written in source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeExpr<'ast> {
    /// A keyword type such as `int` or `string`.
    Predefined(PredefinedType, Span),
    /// A possibly dotted, possibly generic name.
    Named(NamedType<'ast>),
    /// `T?`
    Nullable(&'ast TypeExpr<'ast>, Span),
    /// `T[]`, `T[,]`; the rank counts dimensions.
    Array(&'ast TypeExpr<'ast>, u8, Span),
    /// `T*`
    Pointer(&'ast TypeExpr<'ast>, Span),
    /// `(int, string Name)`
    Tuple(&'ast [TupleElement<'ast>], Span),
}

impl<'ast> TypeExpr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Predefined(_, span) => *span,
            TypeExpr::Named(named) => named.span,
            TypeExpr::Nullable(_, span) => *span,
            TypeExpr::Array(_, _, span) => *span,
            TypeExpr::Pointer(_, span) => *span,
            TypeExpr::Tuple(_, span) => *span,
        }
    }

    /// The named type, if this is one.
    pub fn as_named(&self) -> Option<&NamedType<'ast>> {
        match self {
            TypeExpr::Named(named) => Some(named),
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Predefined(ty, _) => f.write_str(ty.as_str()),
            TypeExpr::Named(named) => write!(f, "{named}"),
            TypeExpr::Nullable(inner, _) => write!(f, "{inner}?"),
            TypeExpr::Array(inner, rank, _) => {
                write!(f, "{inner}[")?;
                for _ in 1..*rank {
                    f.write_str(",")?;
                }
                f.write_str("]")
            }
            TypeExpr::Pointer(inner, _) => write!(f, "{inner}*"),
            TypeExpr::Tuple(elements, _) => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element.ty)?;
                    if let Some(name) = element.name {
                        write!(f, " {}", name.name)?;
                    }
                }
                f.write_str(")")
            }
        }
    }
}

/// Keyword types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedType {
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
}

impl PredefinedType {
    /// The keyword as written in source.
    pub fn as_str(self) -> &'static str {
        match self {
            PredefinedType::Bool => "bool",
            PredefinedType::Byte => "byte",
            PredefinedType::SByte => "sbyte",
            PredefinedType::Char => "char",
            PredefinedType::Decimal => "decimal",
            PredefinedType::Double => "double",
            PredefinedType::Float => "float",
            PredefinedType::Int => "int",
            PredefinedType::UInt => "uint",
            PredefinedType::Long => "long",
            PredefinedType::ULong => "ulong",
            PredefinedType::Short => "short",
            PredefinedType::UShort => "ushort",
            PredefinedType::Object => "object",
            PredefinedType::String => "string",
            PredefinedType::Void => "void",
        }
    }
}

/// A dotted name with optional type arguments on each segment.
///
/// `global::A.B<int>.C` has `global = true` and three segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedType<'ast> {
    pub global: bool,
    pub segments: &'ast [NameSegment<'ast>],
    pub span: Span,
}

impl<'ast> NamedType<'ast> {
    /// The last segment, which names the type itself.
    pub fn last(&self) -> Option<&NameSegment<'ast>> {
        self.segments.last()
    }

    /// Whether this is a single segment without type arguments.
    pub fn is_simple(&self) -> bool {
        !self.global && self.segments.len() == 1 && self.segments[0].args.is_empty()
    }
}

impl fmt::Display for NamedType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.global {
            f.write_str("global::")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// One segment of a dotted name: `Name` or `Name<Args>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NameSegment<'ast> {
    pub name: Ident<'ast>,
    pub args: &'ast [TypeExpr<'ast>],
}

impl fmt::Display for NameSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// One element of a tuple type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TupleElement<'ast> {
    pub ty: TypeExpr<'ast>,
    pub name: Option<Ident<'ast>>,
}

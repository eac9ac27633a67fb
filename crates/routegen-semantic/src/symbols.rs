//! Type symbols produced by binding.

use std::fmt;

use petgraph::graph::NodeIndex;
use routegen_core::{DeclId, QualifiedName, Span, TreeId};
use routegen_syntax::{Modifiers, TypeKind};
use rustc_hash::FxHashMap;

/// Index of a [`TypeSymbol`] inside its [`Compilation`](crate::Compilation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol#{}", self.0)
    }
}

/// Lookup key for a type: `List` and `List<T>` are different types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub name: String,
    pub arity: usize,
}

impl TypeKey {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

/// An instance constructor of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorInfo {
    /// Parameter types as fully qualified display strings, in order.
    pub parameters: Vec<String>,
    /// True for constructors the language supplies without a declaration.
    pub is_implicitly_declared: bool,
}

impl ConstructorInfo {
    pub fn explicit(parameters: Vec<String>) -> Self {
        Self {
            parameters,
            is_implicitly_declared: false,
        }
    }

    pub fn implicit(parameters: Vec<String>) -> Self {
        Self {
            parameters,
            is_implicitly_declared: true,
        }
    }
}

/// One declaration site of a symbol. Partial types have several.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclSite {
    pub tree: TreeId,
    pub decl: DeclId,
    pub span: Span,
}

/// A declared class, struct, record, interface, or enum.
#[derive(Debug, Clone)]
pub struct TypeSymbol {
    pub name: String,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub qualified: QualifiedName,
    /// Namespace the outermost containing type lives in.
    pub namespace: NodeIndex,
    pub containing: Option<SymbolId>,
    pub type_params: Vec<String>,
    pub sites: Vec<DeclSite>,
    /// Resolved base class, for class-like kinds.
    pub base_class: Option<SymbolId>,
    /// Resolved directly listed interfaces, in base-list order.
    pub interfaces: Vec<SymbolId>,
    /// Instance constructors in declaration order.
    pub constructors: Vec<ConstructorInfo>,
    pub nested: FxHashMap<TypeKey, SymbolId>,
}

impl TypeSymbol {
    pub fn key(&self) -> TypeKey {
        TypeKey::new(self.name.clone(), self.type_params.len())
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_partial(&self) -> bool {
        self.modifiers.contains(Modifiers::PARTIAL)
    }

    /// Where the first declaration of this symbol is.
    pub fn primary_site(&self) -> Option<&DeclSite> {
        self.sites.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_key_distinguishes_arity() {
        assert_ne!(TypeKey::new("List", 0), TypeKey::new("List", 1));
        assert_eq!(TypeKey::new("List", 1), TypeKey::new(String::from("List"), 1));
    }

    #[test]
    fn constructor_constructors() {
        let explicit = ConstructorInfo::explicit(vec!["int".into()]);
        assert!(!explicit.is_implicitly_declared);
        let implicit = ConstructorInfo::implicit(Vec::new());
        assert!(implicit.is_implicitly_declared);
        assert!(implicit.parameters.is_empty());
    }

    #[test]
    fn symbol_id_round_trip() {
        assert_eq!(SymbolId::new(7).index(), 7);
        assert_eq!(SymbolId::new(7).to_string(), "symbol#7");
    }
}

//! Reference binder for routegen.
//!
//! Binds a set of [`SyntaxTree`](routegen_syntax::SyntaxTree)s into a
//! [`Compilation`]: a namespace tree on `petgraph`, one [`TypeSymbol`] per
//! declared type, resolved base lists, and instance constructors with their
//! parameter types rendered as fully qualified display strings.
//!
//! The [`SemanticModel`] trait is the narrow interface handler discovery
//! uses; [`Compilation`] implements it.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use routegen_core::{QualifiedName, TreeId};
//! use routegen_semantic::{Compilation, SemanticModel};
//! use routegen_syntax::SyntaxTree;
//!
//! let arena = Bump::new();
//! let (tree, _) = SyntaxTree::parse(
//!     TreeId::new(0),
//!     "Orders.cs",
//!     "namespace Shop { interface IOrders { } class Orders : IOrders { } }",
//!     &arena,
//! );
//! let compilation = Compilation::new(&[tree]);
//!
//! let orders = compilation.lookup(&QualifiedName::parse("Shop.Orders")).unwrap();
//! assert!(compilation.all_interfaces(orders).contains(&QualifiedName::parse("Shop.IOrders")));
//! ```

mod compilation;
mod model;
pub mod namespace_tree;
mod passes;
pub mod scope;
mod symbols;
mod type_resolver;

pub use compilation::Compilation;
pub use model::SemanticModel;
pub use namespace_tree::{NamespaceEdge, NamespaceTree, ResolutionResult};
pub use symbols::{ConstructorInfo, DeclSite, SymbolId, TypeKey, TypeSymbol};
pub use type_resolver::{ResolvedName, TypeResolver};

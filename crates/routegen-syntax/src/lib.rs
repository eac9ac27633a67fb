//! Front end for routegen: lexer, declaration parser, and tree utilities.
//!
//! The parser understands the declaration skeleton of C#-style sources: using
//! directives, block and file-scoped namespaces, classes, structs, records,
//! interfaces, enums, and member signatures. Bodies and initializers are skipped.
//!
//! - [`Parser`] turns source text into a [`CompilationUnit`] in a `bumpalo` arena
//! - [`SyntaxTree`] wraps a unit with its [`TreeId`](routegen_core::TreeId), path,
//!   and fingerprints
//! - [`walk::descendants`] visits every node with its parent
//! - [`shape_fingerprint`] digests what binding can observe

pub mod ast;
pub mod lexer;
mod shape;
mod tree;
pub mod walk;

pub use ast::*;
pub use shape::shape_fingerprint;
pub use tree::SyntaxTree;
pub use walk::{NodeRef, SyntaxNode, descendants};

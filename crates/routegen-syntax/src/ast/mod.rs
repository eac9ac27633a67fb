//! Declaration syntax tree.
//!
//! This module provides:
//! - AST node definitions for namespaces, usings, type declarations, and members
//! - the [`Parser`], with strict ([`Parser::parse`]) and recovering
//!   ([`Parser::parse_lenient`]) entry points
//!
//! All nodes are allocated in a `bumpalo` arena and borrow from it.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use routegen_syntax::{Item, Member, Parser};
//!
//! let arena = Bump::new();
//! let source = r#"
//!     namespace App;
//!
//!     public class GetTimeEndpoint
//!     {
//!         public class Endpoint : IEndpoint
//!         {
//!             public void MapEndpoint(IEndpointRouteBuilder endpoints) => endpoints.MapGet("/time", () => DateTime.Now);
//!         }
//!     }
//! "#;
//!
//! let unit = Parser::parse(source, &arena).unwrap();
//! let Item::Namespace(ns) = unit.items[0] else { unreachable!() };
//! let Item::Type(outer) = ns.items[0] else { unreachable!() };
//! assert!(matches!(outer.members[0], Member::Type(inner) if inner.name.name == "Endpoint"));
//! ```

pub mod decl;
mod decl_parser;
mod parser;
mod type_parser;
pub mod types;

pub use routegen_core::{ParseError, ParseErrorKind, ParseErrors};

pub use decl::*;
pub use parser::Parser;
pub use types::*;

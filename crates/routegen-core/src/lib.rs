//! Shared types for the routegen pipeline.
//!
//! This crate holds everything the front end, the binder, and the generator agree on:
//!
//! - [`Span`]: source positions
//! - [`QualifiedName`]: dotted names of namespaces, types, and nested types
//! - [`Fingerprint`]: stable content digests used as cache keys
//! - [`TreeId`] / [`DeclId`]: identity of syntax trees and type declarations
//! - [`CancellationToken`]: cooperative cancellation shared across stages
//! - [`GeneratorOptions`]: configuration of the emitted contract and registration code
//! - the error hierarchy rooted at [`RoutegenError`]

mod cancellation;
mod error;
mod fingerprint;
mod ids;
pub mod options;
mod qualified_name;
mod span;

pub use cancellation::CancellationToken;
pub use error::{
    BindError, Cancelled, ConfigError, LexError, ParseError, ParseErrorKind, ParseErrors,
    RoutegenError,
};
pub use fingerprint::{Fingerprint, FingerprintBuilder};
pub use ids::{DeclId, TreeId};
pub use options::GeneratorOptions;
pub use qualified_name::QualifiedName;
pub use span::Span;

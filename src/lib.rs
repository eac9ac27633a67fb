//! routegen: discover nested endpoint handlers and generate their
//! registration code.
//!
//! The workspace is split into layers:
//!
//! - `routegen-core`: shared names, fingerprints, errors, options
//! - `routegen-syntax`: lexer, arena AST, parser, syntax walker
//! - `routegen-semantic`: the binder and the [`SemanticModel`] it implements
//! - `routegen-generator`: filter, resolver, aggregator, emitter
//!
//! This crate adds the incremental [`GeneratorDriver`] on top and re-exports
//! what a host needs.

mod driver;

pub use driver::{
    DriverError, DriverRunResult, FileStep, GeneratorDriver, SourceFile, StepReason,
};

pub use routegen_core::{
    BindError, CancellationToken, ConfigError, GeneratorOptions, ParseError, QualifiedName,
    RoutegenError,
};
pub use routegen_generator::{
    Artifact, ArtifactSink, CollectedArtifacts, GenerateError, HandlerDescriptor, HandlerSet,
    contract_source, generate,
};
pub use routegen_semantic::{Compilation, SemanticModel};
pub use routegen_syntax::SyntaxTree;

pub mod prelude {
    pub use crate::driver::{DriverRunResult, GeneratorDriver, SourceFile, StepReason};
    pub use routegen_core::{CancellationToken, GeneratorOptions};
    pub use routegen_generator::{HandlerDescriptor, HandlerSet};
}

//! Text emission for the two generated artifacts.
//!
//! Emission is a pure function of its input: the same options and handler set
//! always produce byte-identical text.

mod contract;
mod registration;
pub mod writer;

pub use contract::emit_contract;
pub use registration::emit_registration;

use routegen_core::GeneratorOptions;

use crate::aggregator::HandlerSet;

/// Lines at the top of every generated file.
pub(crate) const AUTO_GENERATED_HEADER: [&str; 2] = ["// <auto-generated/>", "#nullable enable"];

/// `name` qualified from the global namespace.
pub(crate) fn global(name: &str) -> String {
    format!("global::{name}")
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    pub hint_name: String,
    pub source: String,
}

impl Artifact {
    pub fn new(hint_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            hint_name: hint_name.into(),
            source: source.into(),
        }
    }
}

/// Where a pass delivers its output.
///
/// The contract goes to the post-initialization channel so that user code can
/// implement it before the main pass runs; the registration goes to the
/// regular source channel.
pub trait ArtifactSink {
    fn add_post_init_source(&mut self, artifact: Artifact);

    fn add_source(&mut self, artifact: Artifact);
}

/// A sink that keeps everything it is given, by channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedArtifacts {
    pub post_init: Vec<Artifact>,
    pub sources: Vec<Artifact>,
}

impl CollectedArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look an artifact up by hint name on either channel.
    pub fn get(&self, hint_name: &str) -> Option<&Artifact> {
        self.post_init
            .iter()
            .chain(&self.sources)
            .find(|artifact| artifact.hint_name == hint_name)
    }

    pub fn len(&self) -> usize {
        self.post_init.len() + self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactSink for CollectedArtifacts {
    fn add_post_init_source(&mut self, artifact: Artifact) {
        self.post_init.push(artifact);
    }

    fn add_source(&mut self, artifact: Artifact) {
        self.sources.push(artifact);
    }
}

pub fn contract_artifact(options: &GeneratorOptions) -> Artifact {
    Artifact::new(options.contract_hint(), emit_contract(options))
}

pub fn registration_artifact(handlers: &HandlerSet, options: &GeneratorOptions) -> Artifact {
    Artifact::new(options.registration_hint(), emit_registration(handlers, options))
}

//! Incremental generator host.
//!
//! A [`GeneratorDriver`] owns the caches that survive between runs. Each run
//! takes the full current set of sources and:
//!
//! 1. parses every file into a fresh arena (parse errors become diagnostics;
//!    the recovered tree still takes part)
//! 2. adds the contract artifact as an extra tree, so user code can name the
//!    marker contract
//! 3. binds everything into one [`Compilation`]
//! 4. discovers handlers per file, reusing cached descriptors where neither
//!    the file's declarations nor the compilation's changed
//! 5. aggregates and emits, reusing the registration artifact when the
//!    handler set is equal to the last one
//!
//! Caches are only replaced once a run has completed. A cancelled run returns
//! [`DriverError::Cancelled`] and the next run sees the previous state.
//!
//! # Example
//!
//! ```
//! use routegen::{CancellationToken, GeneratorDriver, GeneratorOptions, SourceFile, StepReason};
//!
//! let mut driver = GeneratorDriver::new(GeneratorOptions::default()).unwrap();
//! let sources = [SourceFile::new(
//!     "GetTime.cs",
//!     "namespace App; class GetTime { class Endpoint : Routegen.IEndpoint { } }",
//! )];
//!
//! let first = driver.run(&sources, &CancellationToken::new()).unwrap();
//! assert_eq!(first.handlers.len(), 1);
//! assert_eq!(first.registration_reason, StepReason::New);
//!
//! let second = driver.run(&sources, &CancellationToken::new()).unwrap();
//! assert_eq!(second.file_reason("GetTime.cs"), Some(StepReason::Cached));
//! assert_eq!(second.registration_reason, StepReason::Unchanged);
//! ```

use std::fmt;

use bumpalo::Bump;
use routegen_core::{
    BindError, CancellationToken, Cancelled, ConfigError, Fingerprint, FingerprintBuilder,
    GeneratorOptions, ParseError, TreeId,
};
use routegen_generator::{
    Artifact, ArtifactSink, CollectedArtifacts, GenerateError, HandlerDescriptor, HandlerSet,
    contract_artifact, discover_in_tree, registration_artifact,
};
use routegen_semantic::Compilation;
use routegen_syntax::SyntaxTree;
use rustc_hash::{FxHashMap, FxHashSet};

/// One input file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// How a step's output was obtained on a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepReason {
    /// First time this input was seen.
    New,
    /// Recomputed, and the result differs from last run's.
    Modified,
    /// Served from the cache without recomputing.
    Cached,
    /// Recomputed, and the result equals last run's.
    Unchanged,
    /// Present last run, gone now.
    Removed,
}

impl StepReason {
    pub fn as_str(self) -> &'static str {
        match self {
            StepReason::New => "new",
            StepReason::Modified => "modified",
            StepReason::Cached => "cached",
            StepReason::Unchanged => "unchanged",
            StepReason::Removed => "removed",
        }
    }
}

impl fmt::Display for StepReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-file record of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStep {
    pub path: String,
    pub reason: StepReason,
    /// Handlers declared in the file; zero for removed files.
    pub handlers: usize,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct DriverRunResult {
    pub handlers: HandlerSet,
    pub artifacts: CollectedArtifacts,
    pub contract_reason: StepReason,
    pub registration_reason: StepReason,
    /// Current files in input order, then removed files by path.
    pub files: Vec<FileStep>,
    pub parse_diagnostics: Vec<(String, ParseError)>,
    pub bind_diagnostics: Vec<(String, BindError)>,
}

impl DriverRunResult {
    pub fn file_reason(&self, path: &str) -> Option<StepReason> {
        self.files
            .iter()
            .find(|step| step.path == path)
            .map(|step| step.reason)
    }

    pub fn contract_source(&self) -> Option<&str> {
        self.artifacts.post_init.first().map(|a| a.source.as_str())
    }

    pub fn registration_source(&self) -> Option<&str> {
        self.artifacts.sources.first().map(|a| a.source.as_str())
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.parse_diagnostics.is_empty() || !self.bind_diagnostics.is_empty()
    }
}

/// Errors that stop a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    /// The run observed its cancellation token; caches are untouched.
    #[error("generator run was cancelled")]
    Cancelled,

    /// The options were rejected.
    #[error("invalid generator options: {0}")]
    Config(#[from] ConfigError),
}

impl From<Cancelled> for DriverError {
    fn from(_: Cancelled) -> Self {
        DriverError::Cancelled
    }
}

impl From<GenerateError> for DriverError {
    fn from(error: GenerateError) -> Self {
        match error {
            GenerateError::Cancelled => DriverError::Cancelled,
        }
    }
}

#[derive(Debug, Clone)]
struct FileEntry {
    shape: Fingerprint,
    compilation: Fingerprint,
    descriptors: Vec<HandlerDescriptor>,
}

#[derive(Debug, Clone)]
struct RegistrationEntry {
    fingerprint: Fingerprint,
    handlers: HandlerSet,
    artifact: Artifact,
}

/// Host that runs the generator over successive snapshots of a source set.
#[derive(Debug)]
pub struct GeneratorDriver {
    options: GeneratorOptions,
    contract: Option<Artifact>,
    files: FxHashMap<String, FileEntry>,
    registration: Option<RegistrationEntry>,
    runs: u64,
}

impl GeneratorDriver {
    /// Create a driver; the options are validated once here.
    pub fn new(options: GeneratorOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            options,
            contract: None,
            files: FxHashMap::default(),
            registration: None,
            runs: 0,
        })
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Completed runs so far. Cancelled runs do not count.
    pub fn run_count(&self) -> u64 {
        self.runs
    }

    /// Paths with cached descriptors.
    pub fn cached_paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Drop every cache; the next run starts from scratch.
    pub fn reset(&mut self) {
        self.contract = None;
        self.files.clear();
        self.registration = None;
    }

    /// Run one pass over `sources`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(
        &mut self,
        sources: &[SourceFile],
        cancel: &CancellationToken,
    ) -> Result<DriverRunResult, DriverError> {
        cancel.check()?;

        let (contract, contract_reason) = match &self.contract {
            Some(artifact) => (artifact.clone(), StepReason::Cached),
            None => (contract_artifact(&self.options), StepReason::New),
        };

        let arena = Bump::new();
        let mut parse_diagnostics = Vec::new();
        let mut trees = Vec::with_capacity(sources.len() + 1);
        let (contract_tree, contract_errors) =
            SyntaxTree::parse(TreeId::new(0), &contract.hint_name, &contract.source, &arena);
        if !contract_errors.is_empty() {
            tracing::warn!(errors = contract_errors.len(), "contract artifact did not parse cleanly");
        }
        trees.push(contract_tree);

        for (index, source) in sources.iter().enumerate() {
            cancel.check()?;
            let id = TreeId::new(index as u32 + 1);
            let (tree, errors) = SyntaxTree::parse(id, &source.path, &source.text, &arena);
            parse_diagnostics.extend(
                errors
                    .into_vec()
                    .into_iter()
                    .map(|error| (source.path.clone(), error)),
            );
            trees.push(tree);
        }

        cancel.check()?;
        let compilation = Compilation::new(&trees);
        let compilation_shape = compilation_shape(&trees);
        let bind_diagnostics = compilation
            .diagnostics()
            .iter()
            .map(|(tree, error)| (path_of(&trees, *tree), error.clone()))
            .collect::<Vec<_>>();

        let marker = self.options.marker_contract();
        let mut next_files: FxHashMap<String, FileEntry> = FxHashMap::default();
        let mut steps = Vec::with_capacity(sources.len());
        let mut descriptors = Vec::new();
        let mut hits = 0usize;

        for tree in &trees[1..] {
            cancel.check()?;
            let path = tree.path().to_string();
            let shape = tree.shape_fingerprint();
            let previous = self.files.get(&path);

            let (found, reason) = match previous {
                Some(entry) if entry.shape == shape && entry.compilation == compilation_shape => {
                    hits += 1;
                    (entry.descriptors.clone(), StepReason::Cached)
                }
                _ => {
                    let found = discover_in_tree(tree, &compilation, &marker, cancel)?;
                    let reason = match previous {
                        None => StepReason::New,
                        Some(entry) if entry.descriptors == found => StepReason::Unchanged,
                        Some(_) => StepReason::Modified,
                    };
                    (found, reason)
                }
            };

            tracing::trace!(path = %path, reason = %reason, handlers = found.len(), "file step");
            steps.push(FileStep {
                path: path.clone(),
                reason,
                handlers: found.len(),
            });
            descriptors.extend(found.iter().cloned());
            next_files.insert(
                path,
                FileEntry {
                    shape,
                    compilation: compilation_shape,
                    descriptors: found,
                },
            );
        }

        let current: FxHashSet<&str> = sources.iter().map(|s| s.path.as_str()).collect();
        let mut removed: Vec<&String> = self
            .files
            .keys()
            .filter(|path| !current.contains(path.as_str()))
            .collect();
        removed.sort();
        for path in removed {
            steps.push(FileStep {
                path: path.clone(),
                reason: StepReason::Removed,
                handlers: 0,
            });
        }

        let handlers = HandlerSet::from_descriptors(descriptors);
        let fingerprint = handlers.fingerprint();
        let (registration, registration_reason) = match &self.registration {
            Some(entry) if entry.fingerprint == fingerprint && entry.handlers == handlers => {
                (entry.artifact.clone(), StepReason::Unchanged)
            }
            Some(_) => (
                registration_artifact(&handlers, &self.options),
                StepReason::Modified,
            ),
            None => (
                registration_artifact(&handlers, &self.options),
                StepReason::New,
            ),
        };
        cancel.check()?;

        tracing::debug!(
            files = sources.len(),
            cache_hits = hits,
            handlers = handlers.len(),
            registration = %registration_reason,
            "generator run complete"
        );

        let mut artifacts = CollectedArtifacts::new();
        artifacts.add_post_init_source(contract.clone());
        artifacts.add_source(registration.clone());

        self.contract = Some(contract);
        self.files = next_files;
        self.registration = Some(RegistrationEntry {
            fingerprint,
            handlers: handlers.clone(),
            artifact: registration,
        });
        self.runs += 1;

        Ok(DriverRunResult {
            handlers,
            artifacts,
            contract_reason,
            registration_reason,
            files: steps,
            parse_diagnostics,
            bind_diagnostics,
        })
    }
}

/// Digest of every tree's path and declaration shape, in order.
fn compilation_shape(trees: &[SyntaxTree<'_>]) -> Fingerprint {
    let mut builder = FingerprintBuilder::new();
    builder.u64(trees.len() as u64);
    for tree in trees {
        builder.str(tree.path()).fingerprint(tree.shape_fingerprint());
    }
    builder.finish()
}

fn path_of(trees: &[SyntaxTree<'_>], id: TreeId) -> String {
    trees
        .get(id.index() as usize)
        .map(|tree| tree.path().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn source(path: &str, text: &str) -> SourceFile {
        SourceFile::new(path, text)
    }

    #[test]
    fn rejects_invalid_options() {
        let options = GeneratorOptions::default()
            .with_add_method("Same")
            .with_map_method("Same");
        assert!(matches!(
            GeneratorDriver::new(options),
            Err(ConfigError::DuplicateMethodName(_))
        ));
    }

    #[test]
    #[traced_test]
    fn contract_is_new_then_cached() {
        let mut driver = GeneratorDriver::new(GeneratorOptions::default()).unwrap();
        let cancel = CancellationToken::new();
        let first = driver.run(&[], &cancel).unwrap();
        let second = driver.run(&[], &cancel).unwrap();
        assert_eq!(first.contract_reason, StepReason::New);
        assert_eq!(second.contract_reason, StepReason::Cached);
        assert_eq!(first.contract_source(), second.contract_source());
        assert_eq!(driver.run_count(), 2);
        assert!(logs_contain("generator run complete"));
    }

    #[test]
    fn removed_files_are_reported() {
        let mut driver = GeneratorDriver::new(GeneratorOptions::default()).unwrap();
        let cancel = CancellationToken::new();
        let a = source("A.cs", "class A { class Endpoint : Routegen.IEndpoint { } }");
        let b = source("B.cs", "class B { class Endpoint : Routegen.IEndpoint { } }");
        driver.run(&[a.clone(), b], &cancel).unwrap();

        let result = driver.run(&[a], &cancel).unwrap();
        assert_eq!(result.file_reason("B.cs"), Some(StepReason::Removed));
        assert_eq!(result.handlers.len(), 1);
        assert_eq!(result.registration_reason, StepReason::Modified);
        assert_eq!(driver.cached_paths().collect::<Vec<_>>(), vec!["A.cs"]);
    }

    #[test]
    fn diagnostics_carry_paths() {
        let mut driver = GeneratorDriver::new(GeneratorOptions::default()).unwrap();
        let result = driver
            .run(
                &[
                    source("Bad.cs", "class Broken : Missing { }"),
                    source("Dup.cs", "class D { } class D { }"),
                ],
                &CancellationToken::new(),
            )
            .unwrap();
        let paths: Vec<&str> = result.bind_diagnostics.iter().map(|(p, _)| p.as_str()).collect();
        assert!(paths.contains(&"Bad.cs"));
        assert!(paths.contains(&"Dup.cs"));
        assert!(result.has_diagnostics());
    }

    #[test]
    fn cancelled_before_start() {
        let mut driver = GeneratorDriver::new(GeneratorOptions::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(driver.run(&[], &cancel).unwrap_err(), DriverError::Cancelled);
        assert_eq!(driver.run_count(), 0);
    }

    #[test]
    fn error_conversions() {
        assert_eq!(DriverError::from(GenerateError::Cancelled), DriverError::Cancelled);
        assert_eq!(DriverError::from(Cancelled), DriverError::Cancelled);
        assert_eq!(StepReason::Unchanged.to_string(), "unchanged");
    }
}

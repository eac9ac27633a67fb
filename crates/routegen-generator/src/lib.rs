//! Handler discovery and registration emission.
//!
//! The pipeline for one pass:
//!
//! 1. [`filter`]: pick nested class-like declarations from each tree
//! 2. [`resolver`]: bind each candidate and keep the ones implementing the
//!    marker contract, as [`HandlerDescriptor`]s
//! 3. [`aggregator`]: sort and deduplicate into a [`HandlerSet`]
//! 4. [`emit`]: render the contract and the registration artifacts
//!
//! Semantic questions go through [`SemanticModel`], so any binder can drive
//! discovery. Output goes through an [`ArtifactSink`].
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use routegen_core::{CancellationToken, GeneratorOptions, TreeId};
//! use routegen_generator::{CollectedArtifacts, contract_source, generate};
//! use routegen_semantic::Compilation;
//! use routegen_syntax::SyntaxTree;
//!
//! let options = GeneratorOptions::default();
//! let arena = Bump::new();
//! let contract = contract_source(&options);
//! let (contract_tree, _) = SyntaxTree::parse(TreeId::new(0), "IEndpoint.g.cs", &contract, &arena);
//! let (user_tree, _) = SyntaxTree::parse(
//!     TreeId::new(1),
//!     "GetTime.cs",
//!     "namespace App; class GetTime { class Endpoint : Routegen.IEndpoint { } }",
//!     &arena,
//! );
//! let trees = [contract_tree, user_tree];
//! let compilation = Compilation::new(&trees);
//!
//! let mut sink = CollectedArtifacts::new();
//! let handlers = generate(&trees, &compilation, &options, &CancellationToken::new(), &mut sink).unwrap();
//! assert_eq!(handlers.len(), 1);
//! assert!(sink.get("EndpointRegistration.g.cs").unwrap().source.contains("AddScoped<global::App.GetTime>"));
//! ```

pub mod aggregator;
pub mod descriptor;
pub mod emit;
mod error;
pub mod filter;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use aggregator::HandlerSet;
pub use descriptor::HandlerDescriptor;
pub use emit::{
    Artifact, ArtifactSink, CollectedArtifacts, contract_artifact, emit_contract,
    emit_registration, registration_artifact,
};
pub use error::GenerateError;
pub use filter::{Candidate, candidates};
pub use resolver::resolve_handler;

use routegen_core::{CancellationToken, GeneratorOptions, QualifiedName};
use routegen_semantic::SemanticModel;
use routegen_syntax::SyntaxTree;

/// Text of the marker contract. Needs no input beyond the options.
pub fn contract_source(options: &GeneratorOptions) -> String {
    emit_contract(options)
}

/// Every handler declared in one tree, in document order.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn discover_in_tree<M>(
    tree: &SyntaxTree<'_>,
    model: &M,
    marker: &QualifiedName,
    cancel: &CancellationToken,
) -> Result<Vec<HandlerDescriptor>, GenerateError>
where
    M: SemanticModel + ?Sized,
{
    let mut found = Vec::new();
    let mut seen = 0usize;
    for candidate in candidates(tree) {
        cancel.check()?;
        seen += 1;
        if let Some(descriptor) = resolve_handler(&candidate, model, marker) {
            tracing::trace!(handler = %descriptor, "resolved handler");
            found.push(descriptor);
        }
    }
    tracing::trace!(
        path = tree.path(),
        candidates = seen,
        handlers = found.len(),
        "discovered handlers"
    );
    Ok(found)
}

/// Run one full pass and deliver both artifacts to `sink`.
///
/// Nothing reaches the sink unless the pass completes: a cancelled pass
/// returns [`GenerateError::Cancelled`] and leaves `sink` untouched.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn generate<M, S>(
    trees: &[SyntaxTree<'_>],
    model: &M,
    options: &GeneratorOptions,
    cancel: &CancellationToken,
    sink: &mut S,
) -> Result<HandlerSet, GenerateError>
where
    M: SemanticModel + ?Sized,
    S: ArtifactSink + ?Sized,
{
    let marker = options.marker_contract();
    let mut descriptors = Vec::new();
    for tree in trees {
        cancel.check()?;
        descriptors.extend(discover_in_tree(tree, model, &marker, cancel)?);
    }
    let handlers = HandlerSet::from_descriptors(descriptors);

    cancel.check()?;
    let contract = contract_artifact(options);
    let registration = registration_artifact(&handlers, options);
    cancel.check()?;

    tracing::debug!(
        trees = trees.len(),
        handlers = handlers.len(),
        outer_types = handlers.outer_types().len(),
        "generated registration"
    );
    sink.add_post_init_source(contract);
    sink.add_source(registration);
    Ok(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use routegen_core::TreeId;
    use routegen_semantic::Compilation;
    use tracing_test::traced_test;

    fn run(sources: &[&str]) -> (HandlerSet, CollectedArtifacts) {
        let options = GeneratorOptions::default();
        let arena = Bump::new();
        let contract = contract_source(&options);
        let mut trees = vec![SyntaxTree::parse(TreeId::new(0), "IEndpoint.g.cs", &contract, &arena).0];
        for (index, source) in sources.iter().enumerate() {
            let path = format!("File{index}.cs");
            let (tree, errors) =
                SyntaxTree::parse(TreeId::new(index as u32 + 1), &path, source, &arena);
            assert!(errors.is_empty(), "{errors}");
            trees.push(tree);
        }
        let compilation = Compilation::new(&trees);
        let mut sink = CollectedArtifacts::new();
        let handlers = generate(
            &trees,
            &compilation,
            &options,
            &CancellationToken::new(),
            &mut sink,
        )
        .unwrap();
        (handlers, sink)
    }

    #[test]
    #[traced_test]
    fn discovers_nested_handlers_only() {
        let (handlers, sink) = run(&[r#"
            using Routegen;
            namespace App;

            class TopLevel : IEndpoint { }

            class Users(IUserStore store)
            {
                class List : IEndpoint { }
                class Create : IEndpoint { }
                class Helper { }
            }

            interface IUserStore { }
        "#]);
        let names: Vec<String> = handlers.iter().map(|h| h.handler_qualified_name()).collect();
        assert_eq!(names, vec!["App.Users.Create", "App.Users.List"]);
        assert_eq!(
            handlers.as_slice()[0].constructor_parameter_types,
            vec!["App.IUserStore".to_string()]
        );
        assert_eq!(sink.post_init.len(), 1);
        assert_eq!(sink.sources.len(), 1);
        assert!(logs_contain("generated registration"));
    }

    #[test]
    fn empty_input_still_emits_both_artifacts() {
        let (handlers, sink) = run(&[]);
        assert!(handlers.is_empty());
        let registration = sink.get("EndpointRegistration.g.cs").unwrap();
        assert!(registration.source.contains("return services;"));
        assert!(registration.source.contains("return endpoints;"));
        assert!(sink.get("IEndpoint.g.cs").is_some());
    }

    #[test]
    fn passes_are_repeatable() {
        let source = "namespace A { class T { class Endpoint : global::Routegen.IEndpoint { } } }";
        let (first, first_sink) = run(&[source]);
        let (second, second_sink) = run(&[source]);
        assert_eq!(first, second);
        assert_eq!(first_sink, second_sink);
    }

    #[test]
    fn cancelled_pass_emits_nothing() {
        let options = GeneratorOptions::default();
        let arena = Bump::new();
        let (tree, _) = SyntaxTree::parse(
            TreeId::new(0),
            "A.cs",
            "class A { class B : Routegen.IEndpoint { } }",
            &arena,
        );
        let trees = [tree];
        let compilation = Compilation::new(&trees);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut sink = CollectedArtifacts::new();
        let result = generate(&trees, &compilation, &options, &cancel, &mut sink);
        assert_eq!(result, Err(GenerateError::Cancelled));
        assert!(sink.is_empty());
    }

    #[test]
    fn discover_in_tree_with_mock_model() {
        let arena = Bump::new();
        let (tree, _) = SyntaxTree::parse(
            TreeId::new(3),
            "Health.cs",
            "class Health { class Probe { } }",
            &arena,
        );
        let mut model = testing::MockModel::new();
        let outer = model.add("Health", "", None);
        let probe = model.add("Probe", "", Some(outer));
        model.implements(probe, "Routegen.IEndpoint");
        model.bind(TreeId::new(3), "Probe", probe);

        let found = discover_in_tree(
            &tree,
            &model,
            &QualifiedName::parse("Routegen.IEndpoint"),
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].handler_type_name, "Probe");
        assert_eq!(found[0].outer_type_namespace, "");
        assert_eq!(found[0].handler_qualified_name(), "Health.Probe");
    }
}

//! Handler resolver: turn a candidate into a descriptor, or discard it.
//!
//! Steps, each of which may end in "not a handler":
//!
//! 1. bind the candidate to its symbol
//! 2. require the marker contract among all implemented interfaces, matched
//!    by exact qualified name
//! 3. find the containing type
//! 4. pick the first explicit instance constructor with parameters, in
//!    declaration order (a primary constructor is first); no such
//!    constructor means an empty parameter list
//!
//! A handler that is generic, or nested anywhere inside a generic type, is
//! not applicable: it cannot be named as a closed type in emitted code.

use routegen_core::QualifiedName;
use routegen_semantic::{ConstructorInfo, SemanticModel, SymbolId};

use crate::descriptor::HandlerDescriptor;
use crate::filter::Candidate;

/// Resolve one candidate. `None` is the ordinary "not a handler" answer.
pub fn resolve_handler<M>(
    candidate: &Candidate<'_>,
    model: &M,
    marker: &QualifiedName,
) -> Option<HandlerDescriptor>
where
    M: SemanticModel + ?Sized,
{
    let symbol = model.declared_symbol(candidate.tree, candidate.decl)?;

    if !model.all_interfaces(symbol).contains(marker) {
        return None;
    }

    let outer = model.containing_type(symbol)?;

    if has_generic_in_chain(model, symbol) {
        tracing::trace!(
            handler = %model.qualified_name(symbol),
            "skipping handler inside a generic type"
        );
        return None;
    }

    let constructor_parameter_types = select_constructor(model.instance_constructors(outer))
        .map(|ctor| ctor.parameters.clone())
        .unwrap_or_default();

    Some(HandlerDescriptor::new(
        model.symbol_name(outer),
        model.namespace_name(outer),
        model.qualified_name(outer).to_string(),
        model.symbol_name(symbol),
        constructor_parameter_types,
    ))
}

/// The first explicitly declared constructor taking at least one parameter.
pub fn select_constructor(constructors: &[ConstructorInfo]) -> Option<&ConstructorInfo> {
    constructors
        .iter()
        .find(|ctor| !ctor.is_implicitly_declared && !ctor.parameters.is_empty())
}

fn has_generic_in_chain<M>(model: &M, symbol: SymbolId) -> bool
where
    M: SemanticModel + ?Sized,
{
    let mut current = Some(symbol);
    while let Some(id) = current {
        if model.is_generic(id) {
            return true;
        }
        current = model.containing_type(id);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;
    use routegen_core::TreeId;
    use routegen_syntax::SyntaxTree;

    use crate::filter::candidates;

    fn marker() -> QualifiedName {
        QualifiedName::parse("Routegen.IEndpoint")
    }

    #[test]
    fn resolves_a_nested_handler() {
        let arena = Bump::new();
        let (tree, _) = SyntaxTree::parse(
            TreeId::new(0),
            "GetTime.cs",
            "class GetTime { class Endpoint { } }",
            &arena,
        );
        let mut model = MockModel::new();
        let outer = model.add("GetTime", "App", None);
        model.constructors(
            outer,
            vec![
                ConstructorInfo::implicit(vec![]),
                ConstructorInfo::explicit(vec![]),
                ConstructorInfo::explicit(vec!["App.IClock".into()]),
                ConstructorInfo::explicit(vec!["int".into(), "int".into()]),
            ],
        );
        let handler = model.add("Endpoint", "App", Some(outer));
        model.implements(handler, "Routegen.IEndpoint");
        model.bind(TreeId::new(0), "Endpoint", handler);

        let candidate = candidates(&tree).next().unwrap();
        let descriptor = resolve_handler(&candidate, &model, &marker()).unwrap();
        assert_eq!(
            descriptor,
            HandlerDescriptor::new(
                "GetTime",
                "App",
                "App.GetTime",
                "Endpoint",
                vec!["App.IClock".into()]
            )
        );
    }

    #[test]
    fn unbound_or_non_implementing_candidates_are_skipped() {
        let arena = Bump::new();
        let (tree, _) =
            SyntaxTree::parse(TreeId::new(0), "A.cs", "class A { class B { } }", &arena);
        let candidate = candidates(&tree).next().unwrap();

        let model = MockModel::new();
        assert!(resolve_handler(&candidate, &model, &marker()).is_none());

        let mut model = MockModel::new();
        let outer = model.add("A", "", None);
        let nested = model.add("B", "", Some(outer));
        model.implements(nested, "Other.IEndpoint");
        model.implements(nested, "IEndpoint");
        model.bind(TreeId::new(0), "B", nested);
        assert!(resolve_handler(&candidate, &model, &marker()).is_none());
    }

    #[test]
    fn generic_chain_is_skipped() {
        let arena = Bump::new();
        let (tree, _) =
            SyntaxTree::parse(TreeId::new(0), "A.cs", "class A<T> { class B { } }", &arena);
        let candidate = candidates(&tree).next().unwrap();

        let mut model = MockModel::new();
        let outer = model.add("A", "", None);
        model.generic(outer);
        let nested = model.add("B", "", Some(outer));
        model.implements(nested, "Routegen.IEndpoint");
        model.bind(TreeId::new(0), "B", nested);
        assert!(resolve_handler(&candidate, &model, &marker()).is_none());
    }

    #[test]
    fn no_qualifying_constructor_means_no_parameters() {
        assert!(select_constructor(&[]).is_none());
        assert!(
            select_constructor(&[
                ConstructorInfo::implicit(vec!["Self".into()]),
                ConstructorInfo::explicit(vec![]),
            ])
            .is_none()
        );
    }

    #[test]
    fn first_declared_constructor_wins_ties() {
        let first = ConstructorInfo::explicit(vec!["int".into()]);
        let second = ConstructorInfo::explicit(vec!["string".into()]);
        assert_eq!(
            select_constructor(&[first.clone(), second]),
            Some(&first)
        );
    }
}

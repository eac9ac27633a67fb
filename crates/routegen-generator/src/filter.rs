//! Declaration filter.
//!
//! The cheap first stage: a purely syntactic test applied to every node of
//! every tree. A node is a candidate when it is a class, struct, or record
//! declaration whose immediate parent is a class or record class. The parent
//! is registered as a scoped service, which requires a reference type, so
//! structs and record structs never qualify as parents. Interfaces and enums
//! never qualify on either side.

use routegen_core::TreeId;
use routegen_syntax::{NodeRef, SyntaxNode, SyntaxTree, TypeDecl};

/// A nested type declaration that may be a handler.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'ast> {
    pub tree: TreeId,
    pub decl: &'ast TypeDecl<'ast>,
    pub parent: &'ast TypeDecl<'ast>,
}

/// Whether `node` is an instantiable type nested directly in another.
pub fn is_candidate(node: &NodeRef<'_>) -> bool {
    match (node.node, node.parent) {
        (SyntaxNode::Type(decl), SyntaxNode::Type(parent)) => {
            decl.kind.is_class_like() && parent.kind.is_reference_class()
        }
        _ => false,
    }
}

/// Every candidate in `tree`, in document order.
pub fn candidates<'ast>(tree: &SyntaxTree<'ast>) -> impl Iterator<Item = Candidate<'ast>> + use<'ast> {
    let id = tree.id();
    tree.descendants().filter_map(move |node| {
        if !is_candidate(&node) {
            return None;
        }
        Some(Candidate {
            tree: id,
            decl: node.node.as_type()?,
            parent: node.parent.as_type()?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    fn names(source: &str) -> Vec<String> {
        let arena = Bump::new();
        let (tree, errors) = SyntaxTree::parse(TreeId::new(0), "Test.cs", source, &arena);
        assert!(errors.is_empty(), "{errors}");
        candidates(&tree)
            .map(|c| format!("{}.{}", c.parent.name.name, c.decl.name.name))
            .collect()
    }

    #[test]
    fn nested_class_is_a_candidate() {
        assert_eq!(
            names("namespace App; class GetTime { class Endpoint { } }"),
            vec!["GetTime.Endpoint"]
        );
    }

    #[test]
    fn top_level_types_are_not_candidates() {
        assert!(names("namespace App { class A { } record B; struct C { } }").is_empty());
    }

    #[test]
    fn records_qualify_on_both_sides() {
        assert_eq!(
            names("record R { record Q { class C { } } record struct V { } struct W { } }"),
            vec!["R.Q", "Q.C", "R.V", "R.W"]
        );
    }

    #[test]
    fn value_type_parents_do_not_qualify() {
        assert!(names("struct S { class C { } } record struct V { class H { } }").is_empty());
        assert_eq!(
            names("struct S { class Inner { class H { } } }"),
            vec!["Inner.H"]
        );
    }

    #[test]
    fn interfaces_and_enums_do_not_qualify() {
        assert!(names("interface I { class C { } } class A { interface J { } enum E { X } }").is_empty());
    }

    #[test]
    fn members_other_than_types_are_ignored() {
        assert_eq!(
            names("class A { int x; void M() { } A() { } class B { } }"),
            vec!["A.B"]
        );
    }
}

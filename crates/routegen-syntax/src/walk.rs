//! Pre-order traversal of a parsed file.
//!
//! [`descendants`] yields every declaration node below the compilation unit in
//! document order, each paired with its immediate syntactic parent. Discovery
//! works on these pairs: a handler candidate is a type whose parent is a type.

use crate::ast::{
    CompilationUnit, ConstructorDecl, FieldDecl, Item, Member, MethodDecl, NamespaceDecl,
    PropertyDecl, TypeDecl,
};

/// Any node the walker visits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntaxNode<'ast> {
    Unit(&'ast CompilationUnit<'ast>),
    Namespace(&'ast NamespaceDecl<'ast>),
    Type(&'ast TypeDecl<'ast>),
    Constructor(&'ast ConstructorDecl<'ast>),
    Method(&'ast MethodDecl<'ast>),
    Field(&'ast FieldDecl<'ast>),
    Property(&'ast PropertyDecl<'ast>),
}

impl<'ast> SyntaxNode<'ast> {
    /// The type declaration, if this node is one.
    pub fn as_type(&self) -> Option<&'ast TypeDecl<'ast>> {
        match self {
            SyntaxNode::Type(decl) => Some(*decl),
            _ => None,
        }
    }

    fn from_item(item: &Item<'ast>) -> Self {
        match item {
            Item::Namespace(ns) => SyntaxNode::Namespace(*ns),
            Item::Type(decl) => SyntaxNode::Type(*decl),
        }
    }

    fn from_member(member: &Member<'ast>) -> Self {
        match member {
            Member::Type(decl) => SyntaxNode::Type(*decl),
            Member::Constructor(ctor) => SyntaxNode::Constructor(*ctor),
            Member::Method(method) => SyntaxNode::Method(*method),
            Member::Field(field) => SyntaxNode::Field(*field),
            Member::Property(property) => SyntaxNode::Property(*property),
        }
    }
}

/// A node together with its immediate parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRef<'ast> {
    pub node: SyntaxNode<'ast>,
    pub parent: SyntaxNode<'ast>,
}

/// Iterate every node below `unit` in document order.
pub fn descendants<'ast>(unit: &'ast CompilationUnit<'ast>) -> Descendants<'ast> {
    let mut walker = Descendants { stack: Vec::new() };
    walker.push_children(SyntaxNode::Unit(unit));
    walker
}

/// Iterator returned by [`descendants`].
pub struct Descendants<'ast> {
    stack: Vec<NodeRef<'ast>>,
}

impl<'ast> Descendants<'ast> {
    /// Push the children of `parent` so the first child pops first.
    fn push_children(&mut self, parent: SyntaxNode<'ast>) {
        let start = self.stack.len();
        match parent {
            SyntaxNode::Unit(unit) => self.stack.extend(unit.items.iter().map(|item| NodeRef {
                node: SyntaxNode::from_item(item),
                parent,
            })),
            SyntaxNode::Namespace(ns) => self.stack.extend(ns.items.iter().map(|item| NodeRef {
                node: SyntaxNode::from_item(item),
                parent,
            })),
            SyntaxNode::Type(decl) => {
                self.stack
                    .extend(decl.members.iter().map(|member| NodeRef {
                        node: SyntaxNode::from_member(member),
                        parent,
                    }))
            }
            _ => {}
        }
        self.stack[start..].reverse();
    }
}

impl<'ast> Iterator for Descendants<'ast> {
    type Item = NodeRef<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.push_children(next.node);
        Some(next)
    }
}

//! Namespace Tree - hierarchical storage for top-level types.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: `NamespaceData` (types declared directly in that namespace)
//! - Edges: `Contains(name)` for hierarchy, `Uses` for `global using` imports
//!
//! Nested types are not stored here; they hang off their containing
//! [`TypeSymbol`](crate::TypeSymbol).

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use crate::symbols::{SymbolId, TypeKey};

/// Result of name resolution that may be ambiguous.
///
/// When several imports bring the same name into scope, resolution is
/// ambiguous and must be reported.
pub enum ResolutionResult<T> {
    /// Found exactly one match.
    Found(T),
    /// Found several matches through different imports.
    /// Contains the importing namespace node and the value for each match.
    Ambiguous(Vec<(NodeIndex, T)>),
    /// Not found in any searched location.
    NotFound,
}

// Manual trait implementations to avoid requiring bounds on T for basic usage

impl<T: Clone> Clone for ResolutionResult<T> {
    fn clone(&self) -> Self {
        match self {
            ResolutionResult::Found(v) => ResolutionResult::Found(v.clone()),
            ResolutionResult::Ambiguous(v) => ResolutionResult::Ambiguous(v.clone()),
            ResolutionResult::NotFound => ResolutionResult::NotFound,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ResolutionResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionResult::Found(v) => f.debug_tuple("Found").field(v).finish(),
            ResolutionResult::Ambiguous(v) => f.debug_tuple("Ambiguous").field(v).finish(),
            ResolutionResult::NotFound => write!(f, "NotFound"),
        }
    }
}

impl<T: PartialEq> PartialEq for ResolutionResult<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResolutionResult::Found(a), ResolutionResult::Found(b)) => a == b,
            (ResolutionResult::Ambiguous(a), ResolutionResult::Ambiguous(b)) => a == b,
            (ResolutionResult::NotFound, ResolutionResult::NotFound) => true,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for ResolutionResult<T> {}

impl<T> ResolutionResult<T> {
    /// Check if resolution found exactly one match.
    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionResult::Found(_))
    }

    /// Check if resolution was ambiguous.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ResolutionResult::Ambiguous(_))
    }

    /// Check if the name was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolutionResult::NotFound)
    }

    /// Convert to Option, returning Some for Found, None otherwise.
    pub fn ok(self) -> Option<T> {
        match self {
            ResolutionResult::Found(v) => Some(v),
            _ => None,
        }
    }
}

/// Edge types in the namespace graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceEdge {
    /// Parent namespace contains child namespace.
    /// The String is the child's simple name.
    Contains(String),
    /// Import edge. Only the root carries these: one per `global using`.
    Uses,
}

/// Data stored in each namespace node.
#[derive(Debug, Default)]
pub struct NamespaceData {
    /// Types declared directly in this namespace, by name and arity.
    pub types: FxHashMap<TypeKey, SymbolId>,
}

/// The namespace hierarchy of one compilation.
#[derive(Debug)]
pub struct NamespaceTree {
    graph: DiGraph<NamespaceData, NamespaceEdge>,
    root: NodeIndex,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    /// Create a tree holding only the global namespace.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(NamespaceData::default());
        Self { graph, root }
    }

    /// The global namespace.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn get_namespace(&self, node: NodeIndex) -> Option<&NamespaceData> {
        self.graph.node_weight(node)
    }

    /// Find a direct child namespace by name.
    pub fn find_child(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.graph.edges(parent).find_map(|edge| match edge.weight() {
            NamespaceEdge::Contains(child) if child == name => Some(edge.target()),
            _ => None,
        })
    }

    /// Find or create a direct child namespace.
    pub fn get_or_create_child(&mut self, parent: NodeIndex, name: &str) -> NodeIndex {
        if let Some(existing) = self.find_child(parent, name) {
            return existing;
        }
        let child = self.graph.add_node(NamespaceData::default());
        self.graph
            .add_edge(parent, child, NamespaceEdge::Contains(name.to_string()));
        child
    }

    /// Find or create a namespace path below `from`.
    pub fn get_or_create_path<S: AsRef<str>>(&mut self, from: NodeIndex, path: &[S]) -> NodeIndex {
        path.iter()
            .fold(from, |node, segment| self.get_or_create_child(node, segment.as_ref()))
    }

    /// Find an existing namespace path below `from`.
    pub fn get_path<S: AsRef<str>>(&self, from: NodeIndex, path: &[S]) -> Option<NodeIndex> {
        path.iter()
            .try_fold(from, |node, segment| self.find_child(node, segment.as_ref()))
    }

    /// Find the parent namespace.
    pub fn find_parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .find(|edge| matches!(edge.weight(), NamespaceEdge::Contains(_)))
            .map(|edge| edge.source())
    }

    /// Get the simple name of a namespace (`None` for the root).
    pub fn get_namespace_name(&self, node: NodeIndex) -> Option<&str> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .find_map(|edge| match edge.weight() {
                NamespaceEdge::Contains(name) => Some(name.as_str()),
                NamespaceEdge::Uses => None,
            })
    }

    /// Get the full path of a namespace, outermost first.
    pub fn get_namespace_path(&self, node: NodeIndex) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = node;

        while let Some(name) = self.get_namespace_name(current) {
            path.push(name.to_string());
            match self.find_parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        path.reverse();
        path
    }

    /// Dotted namespace name; empty for the global namespace.
    pub fn namespace_string(&self, node: NodeIndex) -> String {
        self.get_namespace_path(node).join(".")
    }

    /// Check whether `ancestor` is `node` or one of its parents.
    pub fn is_ancestor_or_self(&self, ancestor: NodeIndex, node: NodeIndex) -> bool {
        let mut current = Some(node);
        while let Some(ns) = current {
            if ns == ancestor {
                return true;
            }
            current = self.find_parent(ns);
        }
        false
    }

    /// Add an import edge.
    pub fn add_using_directive(&mut self, from_ns: NodeIndex, target_ns: NodeIndex) {
        for edge in self.graph.edges(from_ns) {
            if matches!(edge.weight(), NamespaceEdge::Uses) && edge.target() == target_ns {
                return;
            }
        }
        self.graph.add_edge(from_ns, target_ns, NamespaceEdge::Uses);
    }

    /// Namespaces imported from `ns`, in the order they were added.
    pub fn get_using_directives(&self, ns: NodeIndex) -> Vec<NodeIndex> {
        // petgraph walks outgoing edges newest first
        let mut targets: Vec<NodeIndex> = self
            .graph
            .edges(ns)
            .filter(|edge| matches!(edge.weight(), NamespaceEdge::Uses))
            .map(|edge| edge.target())
            .collect();
        targets.reverse();
        targets
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Register a top-level type.
    ///
    /// Returns the already registered symbol if the key is taken.
    pub fn register_type(
        &mut self,
        ns: NodeIndex,
        key: TypeKey,
        symbol: SymbolId,
    ) -> Result<(), SymbolId> {
        let Some(data) = self.graph.node_weight_mut(ns) else {
            return Ok(());
        };
        if let Some(existing) = data.types.get(&key) {
            return Err(*existing);
        }
        data.types.insert(key, symbol);
        Ok(())
    }

    /// Look up a type declared directly in `ns`.
    pub fn get_type(&self, ns: NodeIndex, key: &TypeKey) -> Option<SymbolId> {
        self.graph.node_weight(ns)?.types.get(key).copied()
    }

    /// Look up a type through a set of imported namespaces.
    ///
    /// Imports are not transitive. Two imports providing the same symbol are
    /// not ambiguous.
    pub fn find_imported_type(
        &self,
        imports: &[NodeIndex],
        key: &TypeKey,
    ) -> ResolutionResult<SymbolId> {
        let mut matches: Vec<(NodeIndex, SymbolId)> = Vec::new();
        for &ns in imports {
            if let Some(symbol) = self.get_type(ns, key) {
                if !matches.iter().any(|(_, found)| *found == symbol) {
                    matches.push((ns, symbol));
                }
            }
        }

        match matches.len() {
            0 => ResolutionResult::NotFound,
            1 => ResolutionResult::Found(matches[0].1),
            _ => ResolutionResult::Ambiguous(matches),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> TypeKey {
        TypeKey::new(name, 0)
    }

    #[test]
    fn root_namespace_is_created_on_init() {
        let tree = NamespaceTree::new();
        assert!(tree.get_namespace(tree.root()).is_some());
        assert!(tree.find_parent(tree.root()).is_none());
        assert!(tree.get_namespace_name(tree.root()).is_none());
        assert_eq!(tree.namespace_string(tree.root()), "");
    }

    #[test]
    fn create_and_find_path() {
        let mut tree = NamespaceTree::new();
        let root = tree.root();
        let users = tree.get_or_create_path(root, &["App", "Users"]);
        assert_eq!(tree.get_path(root, &["App", "Users"]), Some(users));
        assert_eq!(tree.get_namespace_path(users), vec!["App", "Users"]);
        assert_eq!(tree.namespace_string(users), "App.Users");
        assert!(tree.get_path(root, &["App", "Orders"]).is_none());
    }

    #[test]
    fn empty_path_returns_start() {
        let mut tree = NamespaceTree::new();
        let root = tree.root();
        assert_eq!(tree.get_or_create_path::<&str>(root, &[]), root);
        assert_eq!(tree.get_path::<&str>(root, &[]), Some(root));
    }

    #[test]
    fn get_or_create_child_returns_same_node_if_exists() {
        let mut tree = NamespaceTree::new();
        let root = tree.root();
        let first = tree.get_or_create_child(root, "App");
        let second = tree.get_or_create_child(root, "App");
        assert_eq!(first, second);
    }

    #[test]
    fn ancestry() {
        let mut tree = NamespaceTree::new();
        let root = tree.root();
        let app = tree.get_or_create_path(root, &["App"]);
        let users = tree.get_or_create_path(root, &["App", "Users"]);
        let other = tree.get_or_create_path(root, &["Other"]);
        assert!(tree.is_ancestor_or_self(root, users));
        assert!(tree.is_ancestor_or_self(app, users));
        assert!(tree.is_ancestor_or_self(users, users));
        assert!(!tree.is_ancestor_or_self(other, users));
    }

    #[test]
    fn duplicate_type_returns_existing() {
        let mut tree = NamespaceTree::new();
        let root = tree.root();
        assert_eq!(tree.register_type(root, key("A"), SymbolId::new(0)), Ok(()));
        assert_eq!(
            tree.register_type(root, key("A"), SymbolId::new(1)),
            Err(SymbolId::new(0))
        );
        assert_eq!(
            tree.register_type(root, TypeKey::new("A", 1), SymbolId::new(2)),
            Ok(())
        );
        assert_eq!(tree.get_type(root, &key("A")), Some(SymbolId::new(0)));
        assert_eq!(tree.get_type(root, &TypeKey::new("A", 1)), Some(SymbolId::new(2)));
    }

    #[test]
    fn using_directives_keep_insertion_order() {
        let mut tree = NamespaceTree::new();
        let root = tree.root();
        let a = tree.get_or_create_child(root, "A");
        let b = tree.get_or_create_child(root, "B");
        tree.add_using_directive(root, a);
        tree.add_using_directive(root, b);
        tree.add_using_directive(root, a);
        assert_eq!(tree.get_using_directives(root), vec![a, b]);
        assert!(tree.find_parent(a) == Some(root));
    }

    #[test]
    fn imported_lookup_detects_ambiguity() {
        let mut tree = NamespaceTree::new();
        let root = tree.root();
        let b = tree.get_or_create_child(root, "B");
        let c = tree.get_or_create_child(root, "C");
        tree.register_type(b, key("Helper"), SymbolId::new(0)).unwrap();
        tree.register_type(c, key("Helper"), SymbolId::new(1)).unwrap();

        assert_eq!(
            tree.find_imported_type(&[b], &key("Helper")),
            ResolutionResult::Found(SymbolId::new(0))
        );
        assert!(tree.find_imported_type(&[b, c], &key("Helper")).is_ambiguous());
        assert!(tree.find_imported_type(&[b, b], &key("Helper")).is_found());
        assert!(tree.find_imported_type(&[c], &key("Other")).is_not_found());
    }
}

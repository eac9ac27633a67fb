//! Lexical scopes and simple-name lookup.
//!
//! Every file gets a root scope, and every namespace declaration a child
//! scope. A scope records the namespace it opens and the using directives
//! written directly inside it. Lookup of a simple name walks outward:
//!
//! 1. the enclosing type chain: type parameters, then nested types
//! 2. for each scope, innermost first:
//!    - the namespaces it opens, up to where the outer scope begins
//!    - its using aliases
//!    - its using imports (and at file level, every `global using`)
//!
//! Nested types are found on the declaring type only; inherited nested types
//! are not searched.

use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;

use crate::namespace_tree::{NamespaceTree, ResolutionResult};
use crate::symbols::{SymbolId, TypeKey, TypeSymbol};

/// Index of a [`Scope`] inside its compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a using alias stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasTarget {
    Namespace(NodeIndex),
    Type(SymbolId),
    /// The target is not declared in this compilation; kept as written.
    Unresolved(String),
}

/// One file or namespace declaration.
#[derive(Debug, Clone)]
pub struct Scope {
    pub namespace: NodeIndex,
    pub parent: Option<ScopeId>,
    /// `using N;`
    pub imports: Vec<NodeIndex>,
    /// `using static T;`
    pub static_imports: Vec<SymbolId>,
    /// `using A = N.T;`
    pub aliases: FxHashMap<String, AliasTarget>,
}

impl Scope {
    pub fn new(namespace: NodeIndex, parent: Option<ScopeId>) -> Self {
        Self {
            namespace,
            parent,
            imports: Vec::new(),
            static_imports: Vec::new(),
            aliases: FxHashMap::default(),
        }
    }

    /// File-level scopes also see every `global using`.
    pub fn is_file_scope(&self) -> bool {
        self.parent.is_none()
    }
}

/// A name resolved to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Namespace(NodeIndex),
    Type(SymbolId),
    TypeParameter(String),
    /// An alias whose target is not declared in this compilation.
    External(String),
}

/// Where a name is being looked up from.
#[derive(Debug, Clone, Copy)]
pub struct LookupContext {
    pub scope: ScopeId,
    /// The type whose declaration contains the reference.
    pub ty: Option<SymbolId>,
    /// Base lists see the type parameters of `ty` but not its nested types.
    pub in_base_list: bool,
}

/// Read-only view used for name lookup.
pub struct NameLookup<'a> {
    pub namespaces: &'a NamespaceTree,
    pub symbols: &'a [TypeSymbol],
    pub scopes: &'a [Scope],
}

impl<'a> NameLookup<'a> {
    pub fn new(namespaces: &'a NamespaceTree, symbols: &'a [TypeSymbol], scopes: &'a [Scope]) -> Self {
        Self {
            namespaces,
            symbols,
            scopes,
        }
    }

    fn symbol(&self, id: SymbolId) -> &'a TypeSymbol {
        &self.symbols[id.index()]
    }

    fn scope(&self, id: ScopeId) -> &'a Scope {
        &self.scopes[id.index()]
    }

    /// Look up the first segment of a name.
    pub fn lookup(
        &self,
        ctx: &LookupContext,
        name: &str,
        arity: usize,
    ) -> ResolutionResult<Resolved> {
        let key = TypeKey::new(name, arity);

        if let Some(found) = self.lookup_in_types(ctx, &key) {
            return ResolutionResult::Found(found);
        }

        let mut scope_id = Some(ctx.scope);
        while let Some(id) = scope_id {
            let scope = self.scope(id);
            match self.lookup_in_scope(scope, &key) {
                ResolutionResult::NotFound => scope_id = scope.parent,
                result => return result,
            }
        }

        ResolutionResult::NotFound
    }

    fn lookup_in_types(&self, ctx: &LookupContext, key: &TypeKey) -> Option<Resolved> {
        let mut current = ctx.ty;
        let mut innermost = true;
        while let Some(id) = current {
            let symbol = self.symbol(id);
            if key.arity == 0 && symbol.type_params.iter().any(|p| *p == key.name) {
                return Some(Resolved::TypeParameter(key.name.clone()));
            }
            if !(innermost && ctx.in_base_list) {
                if let Some(nested) = symbol.nested.get(key) {
                    return Some(Resolved::Type(*nested));
                }
            }
            innermost = false;
            current = symbol.containing;
        }
        None
    }

    fn lookup_in_scope(&self, scope: &Scope, key: &TypeKey) -> ResolutionResult<Resolved> {
        let stop = scope.parent.map(|parent| self.scope(parent).namespace);

        let mut namespace = Some(scope.namespace);
        while let Some(node) = namespace {
            if Some(node) == stop {
                break;
            }
            if let Some(found) = self.member_of_namespace(node, key) {
                return ResolutionResult::Found(found);
            }
            namespace = self.namespaces.find_parent(node);
        }

        if key.arity == 0 {
            if let Some(alias) = scope.aliases.get(&key.name) {
                return ResolutionResult::Found(match alias {
                    AliasTarget::Namespace(node) => Resolved::Namespace(*node),
                    AliasTarget::Type(id) => Resolved::Type(*id),
                    AliasTarget::Unresolved(text) => Resolved::External(text.clone()),
                });
            }
        }

        let mut imports = scope.imports.clone();
        if scope.is_file_scope() {
            imports.extend(self.namespaces.get_using_directives(self.namespaces.root()));
        }

        let mut matches = match self.namespaces.find_imported_type(&imports, key) {
            ResolutionResult::Found(id) => vec![(self.symbol(id).namespace, id)],
            ResolutionResult::Ambiguous(found) => found,
            ResolutionResult::NotFound => Vec::new(),
        };
        for &imported in &scope.static_imports {
            let owner = self.symbol(imported);
            if let Some(&nested) = owner.nested.get(key) {
                if !matches.iter().any(|(_, id)| *id == nested) {
                    matches.push((owner.namespace, nested));
                }
            }
        }

        match matches.len() {
            0 => ResolutionResult::NotFound,
            1 => ResolutionResult::Found(Resolved::Type(matches[0].1)),
            _ => ResolutionResult::Ambiguous(
                matches
                    .into_iter()
                    .map(|(node, id)| (node, Resolved::Type(id)))
                    .collect(),
            ),
        }
    }

    fn member_of_namespace(&self, node: NodeIndex, key: &TypeKey) -> Option<Resolved> {
        if let Some(id) = self.namespaces.get_type(node, key) {
            return Some(Resolved::Type(id));
        }
        if key.arity == 0 {
            if let Some(child) = self.namespaces.find_child(node, &key.name) {
                return Some(Resolved::Namespace(child));
            }
        }
        None
    }

    /// Look up a later segment of a dotted name inside `container`.
    pub fn lookup_member(&self, container: &Resolved, name: &str, arity: usize) -> Option<Resolved> {
        let key = TypeKey::new(name, arity);
        match container {
            Resolved::Namespace(node) => self.member_of_namespace(*node, &key),
            Resolved::Type(id) => self.symbol(*id).nested.get(&key).map(|n| Resolved::Type(*n)),
            Resolved::TypeParameter(_) | Resolved::External(_) => None,
        }
    }

    /// Resolve a dotted path of plain identifiers, as written in a using
    /// directive, from `from` outward to the root.
    pub fn lookup_path(&self, from: NodeIndex, path: &[&str]) -> Option<Resolved> {
        let (first, rest) = path.split_first()?;
        let mut namespace = Some(from);
        while let Some(node) = namespace {
            if let Some(start) = self.member_of_namespace(node, &TypeKey::new(*first, 0)) {
                let found = rest
                    .iter()
                    .try_fold(start, |current, segment| self.lookup_member(&current, segment, 0));
                if found.is_some() {
                    return found;
                }
            }
            namespace = self.namespaces.find_parent(node);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routegen_core::{DeclId, QualifiedName, Span, TreeId};
    use routegen_syntax::{Modifiers, TypeKind};

    use crate::symbols::DeclSite;

    struct Fixture {
        namespaces: NamespaceTree,
        symbols: Vec<TypeSymbol>,
        scopes: Vec<Scope>,
    }

    impl Fixture {
        fn new() -> Self {
            let namespaces = NamespaceTree::new();
            let root = Scope::new(namespaces.root(), None);
            Self {
                namespaces,
                symbols: Vec::new(),
                scopes: vec![root],
            }
        }

        fn add_type(&mut self, path: &[&str], name: &str, containing: Option<SymbolId>) -> SymbolId {
            let root = self.namespaces.root();
            let node = self.namespaces.get_or_create_path(root, path);
            let id = SymbolId::new(self.symbols.len() as u32);
            let qualified = match containing {
                Some(outer) => self.symbols[outer.index()].qualified.child(name),
                None => QualifiedName::new(name, path.iter().map(|s| s.to_string()).collect()),
            };
            self.symbols.push(TypeSymbol {
                name: name.to_string(),
                kind: TypeKind::Class,
                modifiers: Modifiers::empty(),
                qualified,
                namespace: node,
                containing,
                type_params: Vec::new(),
                sites: vec![DeclSite {
                    tree: TreeId::new(0),
                    decl: DeclId::new(id.index() as u32),
                    span: Span::default(),
                }],
                base_class: None,
                interfaces: Vec::new(),
                constructors: Vec::new(),
                nested: FxHashMap::default(),
            });
            match containing {
                Some(outer) => {
                    self.symbols[outer.index()]
                        .nested
                        .insert(TypeKey::new(name, 0), id);
                }
                None => self
                    .namespaces
                    .register_type(node, TypeKey::new(name, 0), id)
                    .unwrap(),
            }
            id
        }

        fn add_scope(&mut self, path: &[&str], parent: ScopeId) -> ScopeId {
            let root = self.namespaces.root();
            let node = self.namespaces.get_or_create_path(root, path);
            self.scopes.push(Scope::new(node, Some(parent)));
            ScopeId::new(self.scopes.len() as u32 - 1)
        }

        fn lookup(&self) -> NameLookup<'_> {
            NameLookup::new(&self.namespaces, &self.symbols, &self.scopes)
        }
    }

    fn ctx(scope: ScopeId, ty: Option<SymbolId>) -> LookupContext {
        LookupContext {
            scope,
            ty,
            in_base_list: false,
        }
    }

    const FILE: ScopeId = ScopeId(0);

    #[test]
    fn finds_type_in_enclosing_namespace() {
        let mut fx = Fixture::new();
        let clock = fx.add_type(&["App"], "Clock", None);
        let scope = fx.add_scope(&["App", "Users"], FILE);
        assert_eq!(
            fx.lookup().lookup(&ctx(scope, None), "Clock", 0),
            ResolutionResult::Found(Resolved::Type(clock))
        );
    }

    #[test]
    fn nested_types_shadow_namespace_types() {
        let mut fx = Fixture::new();
        let _top = fx.add_type(&["App"], "Handler", None);
        let outer = fx.add_type(&["App"], "GetTime", None);
        let nested = fx.add_type(&["App"], "Handler", Some(outer));
        let scope = fx.add_scope(&["App"], FILE);

        let lookup = fx.lookup();
        assert_eq!(
            lookup.lookup(&ctx(scope, Some(outer)), "Handler", 0),
            ResolutionResult::Found(Resolved::Type(nested))
        );

        let base_list = LookupContext {
            scope,
            ty: Some(outer),
            in_base_list: true,
        };
        assert_ne!(
            lookup.lookup(&base_list, "Handler", 0),
            ResolutionResult::Found(Resolved::Type(nested))
        );
    }

    #[test]
    fn imports_are_searched_after_namespaces() {
        let mut fx = Fixture::new();
        let imported = fx.add_type(&["Lib"], "Clock", None);
        let lib = fx.namespaces.get_path(fx.namespaces.root(), &["Lib"]).unwrap();
        fx.scopes[0].imports.push(lib);
        let scope = fx.add_scope(&["App"], FILE);
        assert_eq!(
            fx.lookup().lookup(&ctx(scope, None), "Clock", 0),
            ResolutionResult::Found(Resolved::Type(imported))
        );

        let local = fx.add_type(&["App"], "Clock", None);
        assert_eq!(
            fx.lookup().lookup(&ctx(scope, None), "Clock", 0),
            ResolutionResult::Found(Resolved::Type(local))
        );
    }

    #[test]
    fn ambiguous_imports() {
        let mut fx = Fixture::new();
        fx.add_type(&["A"], "Clock", None);
        fx.add_type(&["B"], "Clock", None);
        let root = fx.namespaces.root();
        let a = fx.namespaces.get_path(root, &["A"]).unwrap();
        let b = fx.namespaces.get_path(root, &["B"]).unwrap();
        fx.scopes[0].imports.extend([a, b]);
        assert!(fx.lookup().lookup(&ctx(FILE, None), "Clock", 0).is_ambiguous());
    }

    #[test]
    fn global_usings_reach_every_file_scope() {
        let mut fx = Fixture::new();
        let clock = fx.add_type(&["Lib"], "Clock", None);
        let root = fx.namespaces.root();
        let lib = fx.namespaces.get_path(root, &["Lib"]).unwrap();
        fx.namespaces.add_using_directive(root, lib);
        let scope = fx.add_scope(&["App"], FILE);
        assert_eq!(
            fx.lookup().lookup(&ctx(scope, None), "Clock", 0),
            ResolutionResult::Found(Resolved::Type(clock))
        );
    }

    #[test]
    fn aliases() {
        let mut fx = Fixture::new();
        let clock = fx.add_type(&["Lib"], "SystemClock", None);
        fx.scopes[0]
            .aliases
            .insert("Clock".into(), AliasTarget::Type(clock));
        fx.scopes[0]
            .aliases
            .insert("Log".into(), AliasTarget::Unresolved("Serilog.ILogger".into()));
        let lookup = fx.lookup();
        assert_eq!(
            lookup.lookup(&ctx(FILE, None), "Clock", 0),
            ResolutionResult::Found(Resolved::Type(clock))
        );
        assert_eq!(
            lookup.lookup(&ctx(FILE, None), "Log", 0),
            ResolutionResult::Found(Resolved::External("Serilog.ILogger".into()))
        );
    }

    #[test]
    fn dotted_paths() {
        let mut fx = Fixture::new();
        let outer = fx.add_type(&["App", "Users"], "GetUser", None);
        let handler = fx.add_type(&["App", "Users"], "Endpoint", Some(outer));
        let root = fx.namespaces.root();
        let users = fx.namespaces.get_path(root, &["App", "Users"]).unwrap();
        let lookup = fx.lookup();

        assert_eq!(
            lookup.lookup_path(root, &["App", "Users", "GetUser", "Endpoint"]),
            Some(Resolved::Type(handler))
        );
        assert_eq!(lookup.lookup_path(users, &["Users"]), Some(Resolved::Namespace(users)));
        assert_eq!(lookup.lookup_path(root, &["App", "Missing"]), None);
    }
}

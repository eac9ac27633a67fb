//! Type resolution for base lists and constructor parameters.
//!
//! [`TypeResolver`] turns a written [`TypeExpr`] into either the symbol it
//! names (for base lists) or its fully qualified display string (for
//! constructor parameters).
//!
//! ## Display format
//!
//! - keyword types as the keyword: `int`, `string`
//! - declared types by their dotted qualified name: `App.Services.IClock`
//! - generic arguments, `?`, arrays, pointers, and tuples rendered recursively:
//!   `System.Collections.Generic.List<App.Models.User>?`
//! - names this compilation does not declare, as written (minus `global::`)

use routegen_core::BindError;
use routegen_syntax::{NamedType, TypeExpr};

use crate::namespace_tree::ResolutionResult;
use crate::scope::{LookupContext, NameLookup, Resolved};
use crate::symbols::SymbolId;

/// A resolved dotted name, with the type arguments written on each segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub target: Resolved,
    /// Displayed arguments keyed by the type symbol they were written on.
    pub args: Vec<(SymbolId, Vec<String>)>,
}

/// Resolves type expressions against a [`NameLookup`].
pub struct TypeResolver<'a> {
    lookup: NameLookup<'a>,
    errors: Vec<BindError>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(lookup: NameLookup<'a>) -> Self {
        Self {
            lookup,
            errors: Vec::new(),
        }
    }

    /// Take the diagnostics reported so far.
    pub fn take_errors(&mut self) -> Vec<BindError> {
        std::mem::take(&mut self.errors)
    }

    /// Resolve a base-list entry to the type it names.
    ///
    /// Reports `UnknownType` when nothing is found and `AmbiguousType` when
    /// imports collide.
    pub fn resolve_base(&mut self, ctx: &LookupContext, ty: &TypeExpr<'_>) -> Option<Resolved> {
        let TypeExpr::Named(named) = ty else {
            return None;
        };
        match self.resolve_named(ctx, named) {
            Ok(Some(resolved)) => Some(resolved.target),
            Ok(None) => {
                self.errors.push(BindError::UnknownType {
                    name: named.to_string(),
                    span: named.span,
                });
                None
            }
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    /// Render a type as its fully qualified display string.
    pub fn display(&mut self, ctx: &LookupContext, ty: &TypeExpr<'_>) -> String {
        match ty {
            TypeExpr::Predefined(predefined, _) => predefined.as_str().to_string(),
            TypeExpr::Named(named) => match self.resolve_named(ctx, named) {
                Ok(Some(resolved)) => self.display_resolved(ctx, named, &resolved),
                Ok(None) => self.display_as_written(ctx, named),
                Err(error) => {
                    self.errors.push(error);
                    self.display_as_written(ctx, named)
                }
            },
            TypeExpr::Nullable(inner, _) => format!("{}?", self.display(ctx, inner)),
            TypeExpr::Array(inner, rank, _) => {
                let commas = ",".repeat(usize::from(*rank).saturating_sub(1));
                format!("{}[{commas}]", self.display(ctx, inner))
            }
            TypeExpr::Pointer(inner, _) => format!("{}*", self.display(ctx, inner)),
            TypeExpr::Tuple(elements, _) => {
                let rendered: Vec<String> = elements
                    .iter()
                    .map(|element| {
                        let ty = self.display(ctx, &element.ty);
                        match element.name {
                            Some(name) => format!("{ty} {}", name.name),
                            None => ty,
                        }
                    })
                    .collect();
                format!("({})", rendered.join(", "))
            }
        }
    }

    /// Resolve a dotted, possibly generic name segment by segment.
    ///
    /// `Ok(None)` means some segment was not found. `Err` is an ambiguity on
    /// the first segment.
    pub fn resolve_named(
        &mut self,
        ctx: &LookupContext,
        named: &NamedType<'_>,
    ) -> Result<Option<ResolvedName>, BindError> {
        let Some((first, rest)) = named.segments.split_first() else {
            return Ok(None);
        };

        let found = if named.global {
            let root = Resolved::Namespace(self.lookup.namespaces.root());
            match self.lookup.lookup_member(&root, first.name.name, first.args.len()) {
                Some(found) => ResolutionResult::Found(found),
                None => ResolutionResult::NotFound,
            }
        } else {
            self.lookup.lookup(ctx, first.name.name, first.args.len())
        };

        let mut current = match found {
            ResolutionResult::Found(found) => found,
            ResolutionResult::NotFound => return Ok(None),
            ResolutionResult::Ambiguous(candidates) => {
                let candidates: Vec<String> = candidates
                    .iter()
                    .map(|(_, candidate)| self.describe(candidate))
                    .collect();
                return Err(BindError::AmbiguousType {
                    name: named.to_string(),
                    candidates: candidates.join(", "),
                    span: named.span,
                });
            }
        };

        let mut args = Vec::new();
        self.record_args(ctx, &current, first.args, &mut args);
        for segment in rest {
            let Some(next) =
                self.lookup
                    .lookup_member(&current, segment.name.name, segment.args.len())
            else {
                return Ok(None);
            };
            current = next;
            self.record_args(ctx, &current, segment.args, &mut args);
        }

        Ok(Some(ResolvedName {
            target: current,
            args,
        }))
    }

    fn record_args(
        &mut self,
        ctx: &LookupContext,
        resolved: &Resolved,
        written: &[TypeExpr<'_>],
        out: &mut Vec<(SymbolId, Vec<String>)>,
    ) {
        if let Resolved::Type(id) = resolved {
            if !written.is_empty() {
                let rendered = written.iter().map(|arg| self.display(ctx, arg)).collect();
                out.push((*id, rendered));
            }
        }
    }

    fn display_resolved(
        &mut self,
        ctx: &LookupContext,
        named: &NamedType<'_>,
        resolved: &ResolvedName,
    ) -> String {
        match &resolved.target {
            Resolved::Type(id) => self.display_symbol(*id, &resolved.args),
            Resolved::TypeParameter(name) => name.clone(),
            Resolved::External(text) => text.clone(),
            Resolved::Namespace(_) => self.display_as_written(ctx, named),
        }
    }

    /// `Namespace.Outer<A>.Inner<B>`; generic containers referenced without
    /// arguments show their own type parameters.
    pub fn display_symbol(&self, id: SymbolId, args: &[(SymbolId, Vec<String>)]) -> String {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(symbol_id) = current {
            chain.push(symbol_id);
            current = self.lookup.symbols[symbol_id.index()].containing;
        }
        chain.reverse();

        let outermost = &self.lookup.symbols[chain[0].index()];
        let mut out = self.lookup.namespaces.namespace_string(outermost.namespace);

        for symbol_id in chain {
            let symbol = &self.lookup.symbols[symbol_id.index()];
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(&symbol.name);

            let written = args.iter().find(|(owner, _)| *owner == symbol_id);
            match written {
                Some((_, rendered)) => {
                    out.push('<');
                    out.push_str(&rendered.join(", "));
                    out.push('>');
                }
                None if symbol.is_generic() => {
                    out.push('<');
                    out.push_str(&symbol.type_params.join(", "));
                    out.push('>');
                }
                None => {}
            }
        }
        out
    }

    fn display_as_written(&mut self, ctx: &LookupContext, named: &NamedType<'_>) -> String {
        let mut out = String::new();
        for (i, segment) in named.segments.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(segment.name.name);
            if !segment.args.is_empty() {
                let rendered: Vec<String> =
                    segment.args.iter().map(|arg| self.display(ctx, arg)).collect();
                out.push('<');
                out.push_str(&rendered.join(", "));
                out.push('>');
            }
        }
        out
    }

    fn describe(&self, resolved: &Resolved) -> String {
        match resolved {
            Resolved::Type(id) => self.lookup.symbols[id.index()].qualified.to_string(),
            Resolved::Namespace(node) => self.lookup.namespaces.namespace_string(*node),
            Resolved::TypeParameter(name) | Resolved::External(name) => name.clone(),
        }
    }
}

//! A parsed source file with its identity and fingerprints.

use bumpalo::Bump;
use routegen_core::{Fingerprint, ParseErrors, TreeId};

use crate::ast::{CompilationUnit, Parser};
use crate::shape::shape_fingerprint;
use crate::walk::{Descendants, descendants};

/// One parsed file of a compilation.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxTree<'ast> {
    id: TreeId,
    path: &'ast str,
    unit: &'ast CompilationUnit<'ast>,
    content: Fingerprint,
    shape: Fingerprint,
}

impl<'ast> SyntaxTree<'ast> {
    /// Parse `source` leniently into the arena.
    ///
    /// The tree is always produced; declarations that could not be recovered are
    /// missing from it and described by the returned errors.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(id: TreeId, path: &str, source: &str, arena: &'ast Bump) -> (Self, ParseErrors) {
        let (unit, errors) = Parser::parse_lenient(source, arena);
        let unit: &'ast CompilationUnit<'ast> = arena.alloc(unit);
        let tree = Self {
            id,
            path: arena.alloc_str(path),
            unit,
            content: Fingerprint::of_str(source),
            shape: shape_fingerprint(unit),
        };
        (tree, errors)
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn path(&self) -> &'ast str {
        self.path
    }

    pub fn unit(&self) -> &'ast CompilationUnit<'ast> {
        self.unit
    }

    /// Fingerprint of the exact source text.
    pub fn content_fingerprint(&self) -> Fingerprint {
        self.content
    }

    /// Fingerprint of the declaration shape; see [`shape_fingerprint`].
    pub fn shape_fingerprint(&self) -> Fingerprint {
        self.shape
    }

    /// Every node in document order, paired with its parent.
    pub fn descendants(&self) -> Descendants<'ast> {
        descendants(self.unit)
    }
}

//! Handler descriptors.
//!
//! A [`HandlerDescriptor`] is everything emission needs to know about one
//! discovered handler. It holds only owned strings so that it can outlive
//! the syntax trees and compilation it was computed from, and it compares by
//! value so an incremental host can tell when a recomputed descriptor is the
//! same as a cached one.

use std::cmp::Ordering;
use std::fmt;

use routegen_core::{Fingerprint, FingerprintBuilder};

/// Metadata for one nested type implementing the marker contract.
///
/// Equality and hashing cover all five fields; the parameter list compares
/// element by element in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerDescriptor {
    /// Simple name of the containing type (`GetTimeEndpoint`).
    pub outer_type_name: String,
    /// Dotted namespace of the containing type; empty for the global namespace.
    pub outer_type_namespace: String,
    /// Fully qualified containing type (`App.GetTimeEndpoint`). One DI
    /// registration per distinct value.
    pub outer_type_qualified_name: String,
    /// Simple name of the handler type itself (`Endpoint`).
    pub handler_type_name: String,
    /// Parameter types of the containing type's constructor, fully qualified.
    pub constructor_parameter_types: Vec<String>,
}

impl HandlerDescriptor {
    pub fn new(
        outer_type_name: impl Into<String>,
        outer_type_namespace: impl Into<String>,
        outer_type_qualified_name: impl Into<String>,
        handler_type_name: impl Into<String>,
        constructor_parameter_types: Vec<String>,
    ) -> Self {
        Self {
            outer_type_name: outer_type_name.into(),
            outer_type_namespace: outer_type_namespace.into(),
            outer_type_qualified_name: outer_type_qualified_name.into(),
            handler_type_name: handler_type_name.into(),
            constructor_parameter_types,
        }
    }

    /// Qualified name of the handler type (`App.GetTimeEndpoint.Endpoint`).
    pub fn handler_qualified_name(&self) -> String {
        format!("{}.{}", self.outer_type_qualified_name, self.handler_type_name)
    }

    /// Stable digest of every field.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut builder = FingerprintBuilder::new();
        self.write_fingerprint(&mut builder);
        builder.finish()
    }

    pub(crate) fn write_fingerprint(&self, builder: &mut FingerprintBuilder) {
        builder
            .str(&self.outer_type_name)
            .str(&self.outer_type_namespace)
            .str(&self.outer_type_qualified_name)
            .str(&self.handler_type_name)
            .strs(&self.constructor_parameter_types);
    }
}

impl Ord for HandlerDescriptor {
    /// Namespace, then qualified outer name, then handler name; the remaining
    /// fields only break ties so the order agrees with equality.
    fn cmp(&self, other: &Self) -> Ordering {
        self.outer_type_namespace
            .cmp(&other.outer_type_namespace)
            .then_with(|| {
                self.outer_type_qualified_name
                    .cmp(&other.outer_type_qualified_name)
            })
            .then_with(|| self.handler_type_name.cmp(&other.handler_type_name))
            .then_with(|| self.outer_type_name.cmp(&other.outer_type_name))
            .then_with(|| {
                self.constructor_parameter_types
                    .cmp(&other.constructor_parameter_types)
            })
    }
}

impl PartialOrd for HandlerDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.handler_qualified_name(),
            self.constructor_parameter_types.join(", ")
        )
    }
}

//! Aggregation of descriptors into one ordered set.

use routegen_core::{Fingerprint, FingerprintBuilder};

use crate::descriptor::HandlerDescriptor;

/// Every descriptor of one pass, sorted and free of duplicates.
///
/// The order is namespace, then qualified outer name, then handler name, and
/// does not depend on the order descriptors were produced in. A set is built
/// fresh each pass and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HandlerSet {
    descriptors: Vec<HandlerDescriptor>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect descriptors from any number of sources.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = HandlerDescriptor>,
    {
        let mut descriptors: Vec<HandlerDescriptor> = descriptors.into_iter().collect();
        descriptors.sort();
        descriptors.dedup();
        Self { descriptors }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HandlerDescriptor> {
        self.descriptors.iter()
    }

    pub fn as_slice(&self) -> &[HandlerDescriptor] {
        &self.descriptors
    }

    /// Distinct outer types by qualified name, in set order.
    pub fn outer_types(&self) -> Vec<&str> {
        let mut outer: Vec<&str> = Vec::new();
        for descriptor in &self.descriptors {
            let name = descriptor.outer_type_qualified_name.as_str();
            if !outer.contains(&name) {
                outer.push(name);
            }
        }
        outer
    }

    /// Digest of the members in order.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut builder = FingerprintBuilder::new();
        builder.u64(self.descriptors.len() as u64);
        for descriptor in &self.descriptors {
            builder.fingerprint(descriptor.fingerprint());
        }
        builder.finish()
    }
}

impl<'a> IntoIterator for &'a HandlerSet {
    type Item = &'a HandlerDescriptor;
    type IntoIter = std::slice::Iter<'a, HandlerDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

impl FromIterator<HandlerDescriptor> for HandlerSet {
    fn from_iter<I: IntoIterator<Item = HandlerDescriptor>>(iter: I) -> Self {
        Self::from_descriptors(iter)
    }
}

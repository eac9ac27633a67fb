//! Binding passes.
//!
//! - [`registration`]: Pass 1 - create symbols, scopes, and pending work
//! - [`imports`]: Pass 1b - bind using directives
//! - [`inheritance`]: Pass 2 - bind base lists; Pass 4 - cut inheritance cycles
//! - [`constructors`]: Pass 3 - collect instance constructors

pub(crate) mod constructors;
pub(crate) mod imports;
pub(crate) mod inheritance;
pub(crate) mod registration;

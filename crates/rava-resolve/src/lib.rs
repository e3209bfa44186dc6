//! Generic type resolution over `rava-model` handles.
//!
//! The central value is [`ResolvedType`]: a declared type paired with enough
//! context (declaration site, variable resolver, array component) to answer
//! questions about it. Resolution is lazy and never fails; a type that cannot
//! be resolved to a class simply reports `None` from [`ResolvedType::resolve`]
//! and the distinguished [`ResolvedType::none`] value absorbs further
//! navigation.
//!
//! All operations run against a [`ResolutionCtx`], which bundles the metadata
//! provider with the [`ResolutionCache`] that deduplicates structurally equal
//! nodes.

#![forbid(unsafe_code)]

mod assign;
mod cache;
mod helpers;
mod resolved_type;
mod variables;

pub use crate::cache::ResolutionCache;
pub use crate::helpers::{
    collection_element_type, map_key_type, map_value_type, type_argument, type_arguments,
};
pub use crate::resolved_type::ResolvedType;
pub use crate::variables::VariableResolver;

use rava_model::ClassEnv;
use thiserror::Error;

/// Everything an operation needs: class metadata plus the node cache.
///
/// Cheap to copy; borrow one per logical resolution session. Cached nodes
/// hold ids that are only meaningful in the env the cache was populated
/// against, so a cache must not be shared across unrelated envs.
#[derive(Clone, Copy)]
pub struct ResolutionCtx<'env> {
    env: &'env dyn ClassEnv,
    cache: &'env ResolutionCache,
}

impl<'env> ResolutionCtx<'env> {
    pub fn new(env: &'env dyn ClassEnv, cache: &'env ResolutionCache) -> ResolutionCtx<'env> {
        ResolutionCtx { env, cache }
    }

    pub fn env(self) -> &'env dyn ClassEnv {
        self.env
    }

    pub(crate) fn cache(self) -> &'env ResolutionCache {
        self.cache
    }
}

/// Errors for the handful of operations with a caller-contract to enforce.
///
/// Ordinary resolution failure is not an error; it is the `none` value.
#[derive(Debug, Error)]
pub enum Error {
    #[error("expected 1 type argument on {interface} but found {found}")]
    SingleArgumentExpected { interface: String, found: usize },
    #[error("mismatched number of generics for {class}: declares {expected}, got {provided}")]
    GenericArityMismatch {
        class: String,
        expected: usize,
        provided: usize,
    },
    #[error("no class metadata available for {class}")]
    MissingClassMetadata { class: String },
}

//! Java assignability over resolved types.

use std::collections::{HashSet, VecDeque};

use rava_model::{ClassEnv, ClassId, ClassKind, RawType, TypeHandle};

use crate::{ResolutionCtx, ResolvedType};

impl ResolvedType {
    /// Whether a value of type `other` could be assigned to this type,
    /// following Java semantics: widening reference conversion on the raw
    /// classes, invariant generics underneath, wildcards compared bound
    /// against bound.
    ///
    /// Nested positions that were already matched on the way down are
    /// accepted, which is what terminates self-referential declarations like
    /// `Enum<E extends Enum<E>>`.
    pub fn is_assignable_from(&self, ctx: ResolutionCtx<'_>, other: &ResolvedType) -> bool {
        self.assignable(ctx, other, &mut Vec::new(), false)
    }

    fn assignable(
        &self,
        ctx: ResolutionCtx<'_>,
        other: &ResolvedType,
        matched: &mut Vec<(TypeHandle, TypeHandle)>,
        nested: bool,
    ) -> bool {
        if self.is_none() || other.is_none() {
            return false;
        }

        // Arrays compare by component.
        if self.is_array() {
            return other.is_array()
                && self
                    .component_type(ctx)
                    .assignable(ctx, &other.component_type(ctx), matched, nested);
        }

        let (Some(our_handle), Some(their_handle)) = (self.handle(), other.handle()) else {
            return false;
        };
        if nested
            && matched
                .iter()
                .any(|(ours, theirs)| ours == our_handle && theirs == their_handle)
        {
            return true;
        }

        // Wildcards are checked bound against bound, in the direction the
        // bound kind dictates. A wildcard source only matches a wildcard
        // target of the same kind.
        let our_bounds = WildcardBounds::find(ctx, self);
        let their_bounds = WildcardBounds::find(ctx, other);
        if let Some(their_bounds) = their_bounds {
            return match our_bounds {
                Some(our_bounds) if our_bounds.kind == their_bounds.kind => {
                    our_bounds.assignable_from_all(ctx, &their_bounds.bounds)
                }
                _ => false,
            };
        }
        if let Some(our_bounds) = our_bounds {
            return our_bounds.assignable_from(ctx, other);
        }

        // Deeper levels demand an exact raw match; the outermost level allows
        // widening. A variable resolved through the other side's context is
        // already expressed in its terms, so the generic walk is skipped.
        let mut exact_match = nested;
        let mut check_generics = true;
        let mut our_raw: Option<RawType> = None;
        if let Some(TypeHandle::Variable(var)) = self.handle() {
            if let Some(resolver) = self.resolver() {
                if let Some(resolved) = resolver.resolve_variable(ctx, *var) {
                    our_raw = resolved.resolve().cloned();
                }
            }
            if our_raw.is_none() {
                if let Some(resolver) = other.resolver() {
                    if let Some(resolved) = resolver.resolve_variable(ctx, *var) {
                        our_raw = resolved.resolve().cloned();
                        check_generics = false;
                    }
                }
            }
            if our_raw.is_none() {
                exact_match = false;
            }
        }

        let object = RawType::Class(ctx.env().well_known().object);
        let our_raw = our_raw
            .or_else(|| self.resolve().cloned())
            .unwrap_or_else(|| object.clone());
        let their_raw = other.resolve().cloned().unwrap_or(object);

        if exact_match {
            if our_raw != their_raw {
                return false;
            }
        } else if !raw_assignable(ctx.env(), &our_raw, &their_raw) {
            return false;
        }

        if check_generics {
            let our_generics = self.generics(ctx).to_vec();
            // View the source as an instance of our raw class so that
            // position-for-position comparison is meaningful.
            let other_view = match &our_raw {
                RawType::Class(class) => other.as_class(ctx, *class),
                _ => other.clone(),
            };
            let their_generics = other_view.generics(ctx).to_vec();
            if our_generics.len() != their_generics.len() {
                return false;
            }
            matched.push((our_handle.clone(), their_handle.clone()));
            for (ours, theirs) in our_generics.iter().zip(&their_generics) {
                if !ours.assignable(ctx, theirs, matched, true) {
                    return false;
                }
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundKind {
    Upper,
    Lower,
}

/// The resolved bounds of a wildcard, found by peeling variables until a
/// wildcard (or a direct type) appears.
struct WildcardBounds {
    kind: BoundKind,
    bounds: Vec<ResolvedType>,
}

impl WildcardBounds {
    fn find(ctx: ResolutionCtx<'_>, ty: &ResolvedType) -> Option<WildcardBounds> {
        let mut candidate = ty.clone();
        loop {
            if candidate.is_none() {
                return None;
            }
            if let Some(TypeHandle::Wildcard { upper, lower }) = candidate.handle() {
                let (kind, handles) = if !lower.is_empty() {
                    (BoundKind::Lower, lower.clone())
                } else {
                    (BoundKind::Upper, upper.clone())
                };
                let resolver = ty.resolver().cloned();
                let bounds = handles
                    .into_iter()
                    .map(|handle| ResolvedType::forge(ctx, handle, None, resolver.clone()))
                    .collect();
                return Some(WildcardBounds { kind, bounds });
            }
            candidate = candidate.resolve_one_step(ctx);
        }
    }

    fn assignable_from(&self, ctx: ResolutionCtx<'_>, other: &ResolvedType) -> bool {
        self.bounds
            .iter()
            .all(|bound| self.bound_accepts(ctx, bound, other))
    }

    fn assignable_from_all(&self, ctx: ResolutionCtx<'_>, others: &[ResolvedType]) -> bool {
        self.bounds.iter().all(|bound| {
            others
                .iter()
                .all(|other| self.bound_accepts(ctx, bound, other))
        })
    }

    fn bound_accepts(
        &self,
        ctx: ResolutionCtx<'_>,
        bound: &ResolvedType,
        other: &ResolvedType,
    ) -> bool {
        match self.kind {
            BoundKind::Upper => bound.is_assignable_from(ctx, other),
            BoundKind::Lower => other.is_assignable_from(ctx, bound),
        }
    }
}

/// Widening reference conversion between erasures (JLS 5.1.5).
///
/// Reference arrays are covariant; primitive component types must match
/// exactly, and primitives themselves convert only to themselves.
pub(crate) fn raw_assignable(env: &dyn ClassEnv, target: &RawType, source: &RawType) -> bool {
    match (target, source) {
        (RawType::Class(target), RawType::Class(source)) => {
            is_subclass_of(env, *source, *target)
        }
        (RawType::Class(target), RawType::Array(_)) => {
            let wk = env.well_known();
            *target == wk.object || *target == wk.cloneable || *target == wk.serializable
        }
        (RawType::Array(target), RawType::Array(source)) => raw_assignable(env, target, source),
        (RawType::Primitive(target), RawType::Primitive(source)) => target == source,
        _ => false,
    }
}

/// Whether `sub` is `sup` or reaches it through superclasses or interfaces.
pub(crate) fn is_subclass_of(env: &dyn ClassEnv, sub: ClassId, sup: ClassId) -> bool {
    if sub == sup {
        return true;
    }
    let mut queue = VecDeque::new();
    let mut seen = HashSet::new();
    queue.push_back(sub);
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        if current == sup {
            return true;
        }
        let Some(def) = env.class(current) else {
            continue;
        };
        if let Some(id) = def.super_class.as_ref().and_then(erased_class) {
            queue.push_back(id);
        }
        for interface in &def.interfaces {
            if let Some(id) = erased_class(interface) {
                queue.push_back(id);
            }
        }
        // Interfaces have Object as an implicit supertype (JLS 4.10.2).
        if def.kind == ClassKind::Interface {
            queue.push_back(env.well_known().object);
        }
    }
    false
}

fn erased_class(handle: &TypeHandle) -> Option<ClassId> {
    match handle {
        TypeHandle::Class(class) | TypeHandle::Parameterized { class, .. } => Some(*class),
        _ => None,
    }
}

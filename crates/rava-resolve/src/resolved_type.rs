//! The resolved-type node and its navigation operations.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use rava_model::{ClassId, DeclarationSite, PrimitiveType, RawType, TypeHandle, TypeVarId};

use crate::variables::VariableResolver;
use crate::{Error, ResolutionCtx};

/// A declared type plus the context needed to reason about it.
///
/// Values are cheap handles onto a shared immutable node; clones alias the
/// same node and per-node lazy results (supertype, interfaces, generics) are
/// computed once. Failed resolution is represented by [`ResolvedType::none`],
/// on which every navigation returns `none` again, so chains of lookups never
/// need intermediate checks.
#[derive(Clone)]
pub struct ResolvedType {
    pub(crate) node: Arc<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Kind {
    None,
    Handle(TypeHandle),
}

pub(crate) struct Node {
    pub(crate) kind: Kind,
    pub(crate) site: Option<DeclarationSite>,
    pub(crate) resolver: Option<VariableResolver>,
    pub(crate) component: Option<ResolvedType>,
    /// Erasure, computed eagerly at construction. `None` means unresolvable.
    pub(crate) raw: Option<RawType>,
    pub(crate) hash: u64,
    super_type: OnceLock<ResolvedType>,
    interfaces: OnceLock<Box<[ResolvedType]>>,
    generics: OnceLock<Box<[ResolvedType]>>,
}

impl Node {
    pub(crate) fn build(
        ctx: ResolutionCtx<'_>,
        handle: TypeHandle,
        site: Option<DeclarationSite>,
        resolver: Option<VariableResolver>,
        component: Option<ResolvedType>,
    ) -> Node {
        let raw = compute_raw(
            ctx,
            &handle,
            resolver.as_ref(),
            component.as_ref(),
            &mut Vec::new(),
        );
        let kind = Kind::Handle(handle);
        let hash = identity_hash(&kind, &site, &resolver, &component);
        Node {
            kind,
            site,
            resolver,
            component,
            raw,
            hash,
            super_type: OnceLock::new(),
            interfaces: OnceLock::new(),
            generics: OnceLock::new(),
        }
    }
}

fn identity_hash(
    kind: &Kind,
    site: &Option<DeclarationSite>,
    resolver: &Option<VariableResolver>,
    component: &Option<ResolvedType>,
) -> u64 {
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    site.hash(&mut hasher);
    resolver.hash(&mut hasher);
    component.hash(&mut hasher);
    hasher.finish()
}

impl PartialEq for ResolvedType {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        self.node.hash == other.node.hash
            && self.node.kind == other.node.kind
            && self.node.site == other.node.site
            && self.node.resolver == other.node.resolver
            && self.node.component == other.node.component
    }
}

impl Eq for ResolvedType {}

impl Hash for ResolvedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.node.hash);
    }
}

impl fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node.kind {
            Kind::None => f.write_str("ResolvedType::none"),
            Kind::Handle(handle) => {
                let mut d = f.debug_struct("ResolvedType");
                d.field("handle", handle);
                if let Some(site) = &self.node.site {
                    d.field("site", site);
                }
                d.finish_non_exhaustive()
            }
        }
    }
}

static NONE: OnceLock<ResolvedType> = OnceLock::new();

impl ResolvedType {
    /// The absorbing "no type" value. Navigating it yields `none` again.
    pub fn none() -> ResolvedType {
        NONE.get_or_init(|| {
            let kind = Kind::None;
            let hash = identity_hash(&kind, &None, &None, &None);
            ResolvedType {
                node: Arc::new(Node {
                    kind,
                    site: None,
                    resolver: None,
                    component: None,
                    raw: None,
                    hash,
                    super_type: OnceLock::new(),
                    interfaces: OnceLock::new(),
                    generics: OnceLock::new(),
                }),
            }
        })
        .clone()
    }

    /// A plain class, carrying no generic context. Never touches the cache.
    pub fn for_class(class: ClassId) -> ResolvedType {
        Self::plain(TypeHandle::Class(class), Some(RawType::Class(class)))
    }

    pub fn for_primitive(primitive: PrimitiveType) -> ResolvedType {
        Self::plain(
            TypeHandle::Primitive(primitive),
            Some(RawType::Primitive(primitive)),
        )
    }

    fn plain(handle: TypeHandle, raw: Option<RawType>) -> ResolvedType {
        let kind = Kind::Handle(handle);
        let hash = identity_hash(&kind, &None, &None, &None);
        ResolvedType {
            node: Arc::new(Node {
                kind,
                site: None,
                resolver: None,
                component: None,
                raw,
                hash,
                super_type: OnceLock::new(),
                interfaces: OnceLock::new(),
                generics: OnceLock::new(),
            }),
        }
    }

    /// Wraps an arbitrary declared-type handle.
    pub fn for_handle(ctx: ResolutionCtx<'_>, handle: TypeHandle) -> ResolvedType {
        Self::forge(ctx, handle, None, None)
    }

    /// Wraps a handle together with the site it was declared at.
    pub fn for_declared(
        ctx: ResolutionCtx<'_>,
        handle: TypeHandle,
        site: DeclarationSite,
    ) -> ResolvedType {
        ctx.cache().intern(ctx, handle, Some(site), None, None)
    }

    /// Wraps a member's declared type as seen from `implementation`.
    ///
    /// When an implementation class is given, variables in the handle resolve
    /// through the substitutions `implementation` makes for `declaring`'s
    /// type parameters. `List<E> get()` declared on `ArrayList` and viewed
    /// from a `class Ints extends ArrayList<Integer>` resolves `E` to
    /// `Integer`.
    pub fn for_member(
        ctx: ResolutionCtx<'_>,
        handle: TypeHandle,
        site: DeclarationSite,
        declaring: ClassId,
        implementation: Option<ClassId>,
    ) -> ResolvedType {
        let resolver = implementation.and_then(|class| {
            Self::for_class(class)
                .as_class(ctx, declaring)
                .as_variable_resolver()
        });
        ctx.cache().intern(ctx, handle, Some(site), resolver, None)
    }

    /// An array of `component`. `none` components yield `none`.
    pub fn for_array(ctx: ResolutionCtx<'_>, component: &ResolvedType) -> ResolvedType {
        let Kind::Handle(component_handle) = &component.node.kind else {
            return Self::none();
        };
        ctx.cache().intern(
            ctx,
            TypeHandle::array(component_handle.clone()),
            None,
            None,
            Some(component.clone()),
        )
    }

    /// `class` parameterized by the given resolved generics.
    ///
    /// Positions holding `none` (or an unresolved variable) fall back to the
    /// class's own type parameter, leaving that slot unresolved rather than
    /// failing. The generic count must match the declaration exactly.
    pub fn for_class_with_generics(
        ctx: ResolutionCtx<'_>,
        class: ClassId,
        generics: &[ResolvedType],
    ) -> Result<ResolvedType, Error> {
        let env = ctx.env();
        let Some(def) = env.class(class) else {
            return Err(Error::MissingClassMetadata {
                class: env.class_name(class),
            });
        };
        let variables = def.type_params.clone();
        if variables.len() != generics.len() {
            return Err(Error::GenericArityMismatch {
                class: def.name.clone(),
                expected: variables.len(),
                provided: generics.len(),
            });
        }
        let args = variables
            .iter()
            .zip(generics)
            .map(|(variable, generic)| match generic.handle() {
                Some(handle) if !matches!(handle, TypeHandle::Variable(_)) => handle.clone(),
                _ => TypeHandle::Variable(*variable),
            })
            .collect();
        let resolver = VariableResolver::Explicit {
            variables: variables.into(),
            generics: generics.to_vec().into(),
        };
        Ok(ctx.cache().intern(
            ctx,
            TypeHandle::Parameterized {
                class,
                args,
                owner: None,
            },
            None,
            Some(resolver),
            None,
        ))
    }

    pub(crate) fn forge(
        ctx: ResolutionCtx<'_>,
        handle: TypeHandle,
        site: Option<DeclarationSite>,
        resolver: Option<VariableResolver>,
    ) -> ResolvedType {
        if site.is_none() && resolver.is_none() {
            // Context-free classes and primitives are complete as-is; caching
            // them would only churn the map.
            match handle {
                TypeHandle::Class(class) => return Self::for_class(class),
                TypeHandle::Primitive(primitive) => return Self::for_primitive(primitive),
                _ => {}
            }
        }
        ctx.cache().intern(ctx, handle, site, resolver, None)
    }

    fn forge_opt(
        ctx: ResolutionCtx<'_>,
        handle: Option<TypeHandle>,
        resolver: Option<VariableResolver>,
    ) -> ResolvedType {
        match handle {
            Some(handle) => Self::forge(ctx, handle, None, resolver),
            None => Self::none(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self.node.kind, Kind::None)
    }

    /// The underlying declared-type handle, if any.
    pub fn handle(&self) -> Option<&TypeHandle> {
        match &self.node.kind {
            Kind::None => None,
            Kind::Handle(handle) => Some(handle),
        }
    }

    pub fn site(&self) -> Option<&DeclarationSite> {
        self.node.site.as_ref()
    }

    pub(crate) fn resolver(&self) -> Option<&VariableResolver> {
        self.node.resolver.as_ref()
    }

    /// The erasure this type resolves to, or `None` if it has none (the
    /// `none` value, an unresolvable variable, an unbounded wildcard).
    pub fn resolve(&self) -> Option<&RawType> {
        self.node.raw.as_ref()
    }

    pub fn resolve_or(&self, fallback: RawType) -> RawType {
        self.node.raw.clone().unwrap_or(fallback)
    }

    /// Whether two values share the same node (cache hit or clone).
    pub fn ptr_eq(&self, other: &ResolvedType) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    pub fn is_array(&self) -> bool {
        self.node.component.is_some()
            || matches!(self.node.kind, Kind::Handle(TypeHandle::Array(_)))
    }

    /// Peels one layer of indirection: a parameterized type to its raw class,
    /// a wildcard or variable to its bound. Direct types yield `none`.
    pub(crate) fn resolve_one_step(&self, ctx: ResolutionCtx<'_>) -> ResolvedType {
        let env = ctx.env();
        match &self.node.kind {
            Kind::Handle(TypeHandle::Parameterized { class, .. }) => Self::forge(
                ctx,
                TypeHandle::Class(*class),
                None,
                self.node.resolver.clone(),
            ),
            Kind::Handle(TypeHandle::Wildcard { upper, lower }) => {
                let bound = usable_bound(ctx, upper).or_else(|| usable_bound(ctx, lower));
                Self::forge_opt(ctx, bound.cloned(), self.node.resolver.clone())
            }
            Kind::Handle(TypeHandle::Variable(var)) => {
                if let Some(resolver) = &self.node.resolver {
                    if let Some(resolved) = resolver.resolve_variable(ctx, *var) {
                        return resolved;
                    }
                }
                let bound = env
                    .type_param(*var)
                    .and_then(|param| usable_bound(ctx, &param.upper_bounds))
                    .cloned();
                Self::forge_opt(ctx, bound, self.node.resolver.clone())
            }
            _ => Self::none(),
        }
    }

    /// The component type of an array, or `none` for non-arrays.
    pub fn component_type(&self, ctx: ResolutionCtx<'_>) -> ResolvedType {
        if self.is_none() {
            return Self::none();
        }
        if let Some(component) = &self.node.component {
            return component.clone();
        }
        match &self.node.kind {
            Kind::Handle(TypeHandle::Array(component)) => Self::forge(
                ctx,
                (**component).clone(),
                None,
                self.node.resolver.clone(),
            ),
            _ => self.resolve_one_step(ctx).component_type(ctx),
        }
    }

    /// Casts this type to a view of `target`, which must be a supertype.
    ///
    /// Searches interfaces before superclasses and keeps the substitutions
    /// accumulated along the way, so `ArrayList<String>.as_class(Iterable)`
    /// is `Iterable<String>`. Yields `none` when `target` is not reachable.
    pub fn as_class(&self, ctx: ResolutionCtx<'_>, target: ClassId) -> ResolvedType {
        if self.is_none() {
            return Self::none();
        }
        match self.resolve() {
            None => self.clone(),
            Some(RawType::Class(class)) if *class == target => self.clone(),
            Some(_) => {
                for interface in self.interfaces(ctx) {
                    let found = interface.as_class(ctx, target);
                    if !found.is_none() {
                        return found;
                    }
                }
                self.super_type(ctx).as_class(ctx, target)
            }
        }
    }

    /// The generic supertype, with this type's substitutions available.
    ///
    /// Arrays extend `Object` (JLS 10.8). `none` for interfaces, `Object`,
    /// primitives, and anything unresolvable.
    pub fn super_type(&self, ctx: ResolutionCtx<'_>) -> ResolvedType {
        if self.is_none() {
            return Self::none();
        }
        self.node
            .super_type
            .get_or_init(|| self.compute_super_type(ctx))
            .clone()
    }

    fn compute_super_type(&self, ctx: ResolutionCtx<'_>) -> ResolvedType {
        let env = ctx.env();
        match self.resolve() {
            Some(RawType::Class(class)) => {
                let Some(def) = env.class(*class) else {
                    return Self::none();
                };
                let Some(super_class) = def.super_class.clone() else {
                    return Self::none();
                };
                Self::forge(ctx, super_class, None, self.as_variable_resolver())
            }
            Some(RawType::Array(_)) => Self::for_class(env.well_known().object),
            _ => Self::none(),
        }
    }

    /// The declared superinterfaces, with this type's substitutions
    /// available. Arrays implement `Cloneable` and `Serializable` (JLS 10.8).
    pub fn interfaces(&self, ctx: ResolutionCtx<'_>) -> &[ResolvedType] {
        self.node
            .interfaces
            .get_or_init(|| self.compute_interfaces(ctx))
            .as_ref()
    }

    fn compute_interfaces(&self, ctx: ResolutionCtx<'_>) -> Box<[ResolvedType]> {
        let env = ctx.env();
        match self.resolve() {
            Some(RawType::Class(class)) => {
                let Some(def) = env.class(*class) else {
                    return Box::default();
                };
                let resolver = self.as_variable_resolver();
                def.interfaces
                    .iter()
                    .map(|interface| Self::forge(ctx, interface.clone(), None, resolver.clone()))
                    .collect()
            }
            Some(RawType::Array(_)) => {
                let wk = env.well_known();
                Box::new([
                    Self::for_class(wk.cloneable),
                    Self::for_class(wk.serializable),
                ])
            }
            _ => Box::default(),
        }
    }

    /// The generic positions of this type.
    ///
    /// For a raw class these are its declared type parameters (resolvable
    /// through this type's context); for a parameterized type, its arguments.
    /// Anything else delegates to its one-step resolution.
    pub fn generics(&self, ctx: ResolutionCtx<'_>) -> &[ResolvedType] {
        self.node
            .generics
            .get_or_init(|| self.compute_generics(ctx))
            .as_ref()
    }

    fn compute_generics(&self, ctx: ResolutionCtx<'_>) -> Box<[ResolvedType]> {
        let env = ctx.env();
        match &self.node.kind {
            Kind::None => Box::default(),
            Kind::Handle(TypeHandle::Class(class)) => {
                let Some(def) = env.class(*class) else {
                    return Box::default();
                };
                let resolver = self.as_variable_resolver();
                def.type_params
                    .iter()
                    .map(|variable| {
                        Self::forge(ctx, TypeHandle::Variable(*variable), None, resolver.clone())
                    })
                    .collect()
            }
            Kind::Handle(TypeHandle::Parameterized { args, .. }) => args
                .iter()
                .map(|arg| Self::forge(ctx, arg.clone(), None, self.node.resolver.clone()))
                .collect(),
            Kind::Handle(_) => {
                let step = self.resolve_one_step(ctx);
                if step.is_none() {
                    Box::default()
                } else {
                    step.generics(ctx).to_vec().into_boxed_slice()
                }
            }
        }
    }

    pub fn has_generics(&self, ctx: ResolutionCtx<'_>) -> bool {
        !self.generics(ctx).is_empty()
    }

    /// The erasure of every generic, with `fallback` standing in for
    /// positions that resolve to nothing.
    pub fn resolve_generics(&self, ctx: ResolutionCtx<'_>, fallback: RawType) -> Vec<RawType> {
        self.generics(ctx)
            .iter()
            .map(|generic| generic.resolve_or(fallback.clone()))
            .collect()
    }

    /// The generic at a nested index path. An empty path means the first
    /// generic. Any out-of-range step yields `none`.
    pub fn generic(&self, ctx: ResolutionCtx<'_>, indexes: &[usize]) -> ResolvedType {
        if indexes.is_empty() {
            return self
                .generics(ctx)
                .first()
                .cloned()
                .unwrap_or_else(Self::none);
        }
        let mut current = self.clone();
        for &index in indexes {
            let Some(next) = current.generics(ctx).get(index).cloned() else {
                return Self::none();
            };
            current = next;
        }
        current
    }

    /// Descends `nesting_level - 1` container hops, taking the last generic
    /// at each level unless `indexes_per_level` overrides that level.
    ///
    /// For an array the hop is its component type; levels without generics
    /// climb to the nearest supertype that has some before selecting.
    /// `nested(2, None)` on `Map<K, List<V>>` is `List<V>`.
    pub fn nested(
        &self,
        ctx: ResolutionCtx<'_>,
        nesting_level: usize,
        indexes_per_level: Option<&HashMap<usize, usize>>,
    ) -> ResolvedType {
        let mut result = self.clone();
        for level in 2..=nesting_level {
            if result.is_array() {
                result = result.component_type(ctx);
            } else {
                while !result.is_none() && !result.has_generics(ctx) {
                    result = result.super_type(ctx);
                }
                let index = indexes_per_level
                    .and_then(|map| map.get(&level).copied())
                    .unwrap_or_else(|| result.generics(ctx).len().saturating_sub(1));
                result = result.generic(ctx, &[index]);
            }
        }
        result
    }

    /// Whether any generic reachable from this type fails to resolve.
    ///
    /// A variable whose only bound is `Object` does not count: it carries no
    /// information either way. A raw class counts when one of its own
    /// interfaces is declared generic, since the missing arguments make every
    /// inherited position unresolvable.
    pub fn has_unresolvable_generics(&self, ctx: ResolutionCtx<'_>) -> bool {
        self.unresolvable_generics(ctx, &mut HashSet::new())
    }

    fn unresolvable_generics(
        &self,
        ctx: ResolutionCtx<'_>,
        seen: &mut HashSet<ResolvedType>,
    ) -> bool {
        if self.is_none() || !seen.insert(self.clone()) {
            return false;
        }
        for generic in self.generics(ctx) {
            if generic.is_unresolvable_variable(ctx) || generic.is_wildcard_without_bounds(ctx) {
                return true;
            }
            if generic.unresolvable_generics(ctx, seen) {
                return true;
            }
        }
        let env = ctx.env();
        if let Some(RawType::Class(class)) = self.resolve() {
            let Some(def) = env.class(*class) else {
                return false;
            };
            for interface in &def.interfaces {
                let interface_class = match interface {
                    TypeHandle::Class(id) => Some(*id),
                    _ => None,
                };
                if let Some(id) = interface_class {
                    if env
                        .class(id)
                        .is_some_and(|ifc| !ifc.type_params.is_empty())
                    {
                        return true;
                    }
                }
            }
            let object = env.well_known().object;
            if def
                .super_class
                .as_ref()
                .is_some_and(|sup| *sup != TypeHandle::Class(object))
            {
                return self.super_type(ctx).unresolvable_generics(ctx, seen);
            }
        }
        false
    }

    fn is_unresolvable_variable(&self, ctx: ResolutionCtx<'_>) -> bool {
        let Some(TypeHandle::Variable(var)) = self.handle() else {
            return false;
        };
        match &self.node.resolver {
            None => true,
            Some(resolver) => match resolver.resolve_variable(ctx, *var) {
                None => true,
                // A variable that resolves back to an unresolvable variable
                // is still unresolvable.
                Some(resolved) => resolved.is_unresolvable_variable(ctx),
            },
        }
    }

    fn is_wildcard_without_bounds(&self, ctx: ResolutionCtx<'_>) -> bool {
        let Some(TypeHandle::Wildcard { upper, lower }) = self.handle() else {
            return false;
        };
        lower.is_empty() && usable_bound(ctx, upper).is_none()
    }

    pub(crate) fn as_variable_resolver(&self) -> Option<VariableResolver> {
        if self.is_none() {
            None
        } else {
            Some(VariableResolver::Owner(self.clone()))
        }
    }

    /// Looks `var` up against this type: first in its own parameterization
    /// (and enclosing owner types), then in its surrounding context.
    pub(crate) fn resolve_variable(
        &self,
        ctx: ResolutionCtx<'_>,
        var: TypeVarId,
    ) -> Option<ResolvedType> {
        match &self.node.kind {
            Kind::Handle(TypeHandle::Variable(_)) => {
                let step = self.resolve_one_step(ctx);
                if step.is_none() {
                    None
                } else {
                    step.resolve_variable(ctx, var)
                }
            }
            Kind::Handle(TypeHandle::Wildcard { .. }) => {
                let step = self.resolve_one_step(ctx);
                if !step.is_none() {
                    if let Some(found) = step.resolve_variable(ctx, var) {
                        return Some(found);
                    }
                }
                self.node
                    .resolver
                    .as_ref()
                    .and_then(|resolver| resolver.resolve_variable(ctx, var))
            }
            Kind::Handle(TypeHandle::Parameterized { class, args, owner }) => {
                let env = ctx.env();
                let def = env.class(*class)?;
                if let Some(position) = def.type_params.iter().position(|tv| *tv == var) {
                    if let Some(arg) = args.get(position) {
                        return Some(Self::forge(
                            ctx,
                            arg.clone(),
                            None,
                            self.node.resolver.clone(),
                        ));
                    }
                }
                if let Some(owner_handle) = owner.as_deref() {
                    return Self::forge(ctx, owner_handle.clone(), None, self.node.resolver.clone())
                        .resolve_variable(ctx, var);
                }
                self.node
                    .resolver
                    .as_ref()
                    .and_then(|resolver| resolver.resolve_variable(ctx, var))
            }
            _ => self
                .node
                .resolver
                .as_ref()
                .and_then(|resolver| resolver.resolve_variable(ctx, var)),
        }
    }
}

/// The first bound, unless it is a bare `Object` (which bounds nothing).
fn usable_bound<'a>(
    ctx: ResolutionCtx<'_>,
    bounds: &'a [TypeHandle],
) -> Option<&'a TypeHandle> {
    let first = bounds.first()?;
    if *first == TypeHandle::Class(ctx.env().well_known().object) {
        return None;
    }
    Some(first)
}

/// Erasure of `handle` in the given context. `seen` breaks self-referential
/// variable bounds such as `E extends Enum<E>`.
fn compute_raw(
    ctx: ResolutionCtx<'_>,
    handle: &TypeHandle,
    resolver: Option<&VariableResolver>,
    component: Option<&ResolvedType>,
    seen: &mut Vec<TypeVarId>,
) -> Option<RawType> {
    match handle {
        TypeHandle::Class(class) => Some(RawType::Class(*class)),
        TypeHandle::Primitive(primitive) => Some(RawType::Primitive(*primitive)),
        TypeHandle::Parameterized { class, .. } => Some(RawType::Class(*class)),
        TypeHandle::Array(inner) => {
            if let Some(component) = component {
                return component
                    .resolve()
                    .cloned()
                    .map(|raw| RawType::Array(Box::new(raw)));
            }
            compute_raw(ctx, inner, resolver, None, seen)
                .map(|raw| RawType::Array(Box::new(raw)))
        }
        TypeHandle::Wildcard { upper, lower } => {
            let bound = usable_bound(ctx, upper).or_else(|| usable_bound(ctx, lower))?;
            compute_raw(ctx, bound, resolver, None, seen)
        }
        TypeHandle::Variable(var) => {
            if seen.contains(var) {
                return None;
            }
            seen.push(*var);
            let env = ctx.env();
            let raw = match resolver.and_then(|r| r.resolve_variable(ctx, *var)) {
                Some(resolved) => resolved.resolve().cloned(),
                None => match env.type_param(*var).and_then(|param| {
                    usable_bound(ctx, &param.upper_bounds)
                }) {
                    Some(bound) => compute_raw(ctx, bound, resolver, None, seen),
                    None => None,
                },
            };
            seen.pop();
            raw
        }
    }
}

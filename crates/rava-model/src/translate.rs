//! Translation from the signature AST into [`TypeHandle`]s.
//!
//! Translation is deliberately forgiving: unknown class names are interned as
//! stub classes and unknown type variables become fresh unresolvable
//! parameters, so a single unreadable reference never poisons the rest of a
//! declaration.

use crate::signature::{ClassSig, ClassTypeSig, MethodSig, RefTypeSig, TypeArgSig, TypeSig};
use crate::store::ClassEnv;
use crate::{ClassStore, TypeHandle, TypeVarId};

/// Lexical scope mapping type-variable names to interned ids.
///
/// Scopes nest: method-level parameters are inserted after class-level ones
/// and shadow them on lookup.
#[derive(Debug, Clone, Default)]
pub struct TypeVarScope {
    vars: Vec<(String, TypeVarId)>,
}

impl TypeVarScope {
    pub fn new() -> TypeVarScope {
        TypeVarScope::default()
    }

    pub fn insert(&mut self, name: &str, id: TypeVarId) {
        self.vars.push((name.to_string(), id));
    }

    /// Innermost binding wins.
    pub fn lookup(&self, name: &str) -> Option<TypeVarId> {
        self.vars
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }
}

/// Translate a field-type signature.
pub fn handle_from_field_sig(
    store: &mut ClassStore,
    scope: &TypeVarScope,
    sig: &RefTypeSig,
) -> TypeHandle {
    match sig {
        RefTypeSig::Class(cts) => handle_from_class_type(store, scope, cts),
        RefTypeSig::Variable(name) => match scope.lookup(name) {
            Some(id) => TypeHandle::Variable(id),
            // Out-of-scope variable: keep it representable as a fresh,
            // unresolvable parameter.
            None => {
                tracing::debug!(target: "rava.model", name, "type variable not in scope");
                let object = store.well_known().object;
                let id = store.add_type_param(name, vec![TypeHandle::Class(object)]);
                TypeHandle::Variable(id)
            }
        },
        RefTypeSig::Array(component) => {
            TypeHandle::array(handle_from_type_sig(store, scope, component))
        }
    }
}

/// Translate a parameter/return/array-component signature.
pub fn handle_from_type_sig(
    store: &mut ClassStore,
    scope: &TypeVarScope,
    sig: &TypeSig,
) -> TypeHandle {
    match sig {
        TypeSig::Base(p) => TypeHandle::Primitive(*p),
        TypeSig::Reference(r) => handle_from_field_sig(store, scope, r),
    }
}

/// Translate a class signature into (type params, superclass, interfaces).
///
/// Type-parameter ids are allocated before any bound is translated so that
/// self-referential bounds (`<T::Ljava/lang/Comparable<TT;>;>`) see their own
/// id in scope.
pub fn class_def_from_sig(
    store: &mut ClassStore,
    scope: &TypeVarScope,
    sig: &ClassSig,
) -> (Vec<TypeVarId>, TypeHandle, Vec<TypeHandle>) {
    let mut scope = scope.clone();
    let ids = declare_type_params(store, &mut scope, &sig.type_params);
    let super_class = handle_from_class_type(store, &scope, &sig.super_class);
    let interfaces = sig
        .interfaces
        .iter()
        .map(|iface| handle_from_class_type(store, &scope, iface))
        .collect();
    (ids, super_class, interfaces)
}

/// Translate a method signature into (type params, parameter types, return
/// type). `None` return means `void`.
pub fn method_from_sig(
    store: &mut ClassStore,
    scope: &TypeVarScope,
    sig: &MethodSig,
) -> (Vec<TypeVarId>, Vec<TypeHandle>, Option<TypeHandle>) {
    let mut scope = scope.clone();
    let ids = declare_type_params(store, &mut scope, &sig.type_params);
    let params = sig
        .params
        .iter()
        .map(|p| handle_from_type_sig(store, &scope, p))
        .collect();
    let result = sig
        .result
        .as_ref()
        .map(|r| handle_from_type_sig(store, &scope, r));
    (ids, params, result)
}

fn declare_type_params(
    store: &mut ClassStore,
    scope: &mut TypeVarScope,
    params: &[crate::signature::TypeParamSig],
) -> Vec<TypeVarId> {
    // Ids first, bounds second: bounds may reference any of the new ids.
    let ids: Vec<TypeVarId> = params
        .iter()
        .map(|tp| {
            let id = store.add_type_param(&tp.name, vec![]);
            scope.insert(&tp.name, id);
            id
        })
        .collect();
    for (tp, id) in params.iter().zip(&ids) {
        let mut bounds = Vec::new();
        if let Some(cb) = &tp.class_bound {
            bounds.push(handle_from_field_sig(store, scope, cb));
        }
        for ib in &tp.interface_bounds {
            bounds.push(handle_from_field_sig(store, scope, ib));
        }
        if bounds.is_empty() {
            let object = store.well_known().object;
            bounds.push(TypeHandle::Class(object));
        }
        if let Some(def) = store.type_param_mut(*id) {
            def.upper_bounds = bounds;
        }
    }
    ids
}

fn handle_from_class_type(
    store: &mut ClassStore,
    scope: &TypeVarScope,
    cts: &ClassTypeSig,
) -> TypeHandle {
    // Flatten `Outer<A>.Inner<B>` into `Outer$Inner<A, B>`: substitution in
    // the engine pairs arguments with the flattened parameter list, so no
    // owner chain is needed for signature-derived handles.
    let mut name = cts.segments[0].name.replace('/', ".");
    let mut args: Vec<TypeHandle> = Vec::new();
    for arg in &cts.segments[0].args {
        args.push(handle_from_type_arg(store, scope, arg));
    }
    for seg in &cts.segments[1..] {
        name.push('$');
        name.push_str(&seg.name);
        for arg in &seg.args {
            args.push(handle_from_type_arg(store, scope, arg));
        }
    }
    let class = store.intern_class(&name);
    if args.is_empty() {
        return TypeHandle::Class(class);
    }
    // A raw outer segment (`LOuter.Inner<TU;>;`) leaves the flattened
    // argument list short of the declared parameter count. Pad the missing
    // leading positions with unbounded wildcards rather than mispairing.
    let declared = store
        .class(class)
        .map(|def| def.type_params.len())
        .unwrap_or(args.len());
    if declared > args.len() {
        let object = store.well_known().object;
        let mut padded = vec![TypeHandle::unbounded_wildcard(object); declared - args.len()];
        padded.append(&mut args);
        args = padded;
    }
    TypeHandle::Parameterized {
        class,
        args,
        owner: None,
    }
}

fn handle_from_type_arg(
    store: &mut ClassStore,
    scope: &TypeVarScope,
    arg: &TypeArgSig,
) -> TypeHandle {
    let object = store.well_known().object;
    match arg {
        TypeArgSig::Any => TypeHandle::unbounded_wildcard(object),
        TypeArgSig::Extends(r) => TypeHandle::Wildcard {
            upper: vec![handle_from_field_sig(store, scope, r)],
            lower: vec![],
        },
        TypeArgSig::Super(r) => TypeHandle::Wildcard {
            upper: vec![TypeHandle::Class(object)],
            lower: vec![handle_from_field_sig(store, scope, r)],
        },
        TypeArgSig::Exact(r) => handle_from_field_sig(store, scope, r),
    }
}

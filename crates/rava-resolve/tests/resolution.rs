//! Resolution and navigation behavior against a minimal JDK store.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use rava_model::{
    ClassDef, ClassEnv, ClassKind, ClassStore, DeclarationSite, DeclarationSource,
    PortableTypeHandle, RawType, TypeHandle,
};
use rava_resolve::{
    collection_element_type, map_key_type, map_value_type, type_argument, type_arguments, Error,
    ResolutionCache, ResolutionCtx, ResolvedType,
};

fn string_list(store: &mut ClassStore) -> rava_model::ClassId {
    let wk = *store.well_known();
    store.add_class(ClassDef {
        name: "com.example.StringList".to_string(),
        kind: ClassKind::Class,
        type_params: vec![],
        super_class: Some(TypeHandle::Class(wk.object)),
        interfaces: vec![TypeHandle::parameterized(
            wk.list,
            vec![TypeHandle::Class(wk.string)],
        )],
    })
}

#[test]
fn raw_class_resolves_to_itself() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let list = ResolvedType::for_class(wk.list);
    assert_eq!(list.resolve(), Some(&RawType::Class(wk.list)));
    assert!(!list.is_none());
    assert!(list.has_generics(ctx));

    // Non-generic classes have no generics at all.
    let string = ResolvedType::for_class(wk.string);
    assert_eq!(string.resolve(), Some(&RawType::Class(wk.string)));
    assert!(!string.has_generics(ctx));
    assert!(string.generic(ctx, &[]).is_none());
}

#[test]
fn none_absorbs_navigation() {
    let store = ClassStore::with_minimal_jdk();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let none = ResolvedType::none();
    assert!(none.is_none());
    assert_eq!(none.resolve(), None);
    assert!(none.super_type(ctx).is_none());
    assert!(none.generic(ctx, &[0]).is_none());
    assert!(none.component_type(ctx).is_none());
    assert!(!none.has_unresolvable_generics(ctx));
}

#[test]
fn parameterized_collection_reports_element_type() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let array_list = store.class_id("java.util.ArrayList").unwrap();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let ty = ResolvedType::for_handle(
        ctx,
        TypeHandle::parameterized(array_list, vec![TypeHandle::Class(wk.string)]),
    );
    let element = collection_element_type(ctx, &ty);
    assert_eq!(element.resolve(), Some(&RawType::Class(wk.string)));

    // Iterable sits one level further up and sees the same substitution.
    let iterable = ty.as_class(ctx, wk.iterable);
    assert_eq!(
        iterable.generic(ctx, &[]).resolve(),
        Some(&RawType::Class(wk.string))
    );
}

#[test]
fn map_key_and_value_types() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let hash_map = store.class_id("java.util.HashMap").unwrap();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let ty = ResolvedType::for_handle(
        ctx,
        TypeHandle::parameterized(
            hash_map,
            vec![TypeHandle::Class(wk.string), TypeHandle::Class(wk.integer)],
        ),
    );
    assert_eq!(
        map_key_type(ctx, &ty).resolve(),
        Some(&RawType::Class(wk.string))
    );
    assert_eq!(
        map_value_type(ctx, &ty).resolve(),
        Some(&RawType::Class(wk.integer))
    );

    // Not a map at all.
    let list = ResolvedType::for_class(wk.list);
    assert!(map_key_type(ctx, &list).is_none());
}

#[test]
fn as_class_fixes_parameter_through_subtype() {
    let mut store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let string_list = string_list(&mut store);
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let view = ResolvedType::for_class(string_list).as_class(ctx, wk.collection);
    assert!(!view.is_none());
    assert_eq!(
        view.generic(ctx, &[]).resolve(),
        Some(&RawType::Class(wk.string))
    );

    // Unrelated target yields none.
    assert!(ResolvedType::for_class(string_list)
        .as_class(ctx, wk.map)
        .is_none());
}

#[test]
fn generic_index_paths() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let ty = ResolvedType::for_handle(
        ctx,
        TypeHandle::parameterized(
            wk.map,
            vec![
                TypeHandle::Class(wk.string),
                TypeHandle::parameterized(wk.list, vec![TypeHandle::Class(wk.integer)]),
            ],
        ),
    );
    assert_eq!(
        ty.generic(ctx, &[1, 0]).resolve(),
        Some(&RawType::Class(wk.integer))
    );
    assert!(ty.generic(ctx, &[2]).is_none());
    // Empty path means the first generic.
    assert_eq!(ty.generic(ctx, &[]).resolve(), Some(&RawType::Class(wk.string)));
}

#[test]
fn nested_descends_the_last_generic_by_default() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let ty = ResolvedType::for_handle(
        ctx,
        TypeHandle::parameterized(
            wk.map,
            vec![
                TypeHandle::Class(wk.integer),
                TypeHandle::parameterized(wk.list, vec![TypeHandle::Class(wk.string)]),
            ],
        ),
    );

    let level2 = ty.nested(ctx, 2, None);
    assert_eq!(level2.resolve(), Some(&RawType::Class(wk.list)));
    let level3 = ty.nested(ctx, 3, None);
    assert_eq!(level3.resolve(), Some(&RawType::Class(wk.string)));

    let mut overrides = HashMap::new();
    overrides.insert(2, 0);
    assert_eq!(
        ty.nested(ctx, 2, Some(&overrides)).resolve(),
        Some(&RawType::Class(wk.integer))
    );
}

#[test]
fn nested_treats_the_array_component_as_one_hop() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    // List<String>[]: level 2 is the component, level 3 its element.
    let ty = ResolvedType::for_handle(
        ctx,
        TypeHandle::array(TypeHandle::parameterized(
            wk.list,
            vec![TypeHandle::Class(wk.string)],
        )),
    );
    assert_eq!(
        ty.nested(ctx, 2, None).resolve(),
        Some(&RawType::Class(wk.list))
    );
    assert_eq!(
        ty.nested(ctx, 3, None).resolve(),
        Some(&RawType::Class(wk.string))
    );
}

#[test]
fn raw_class_generics_stay_unresolved() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let raw_list = ResolvedType::for_class(wk.list);
    assert_eq!(raw_list.generic(ctx, &[]).resolve(), None);
    assert!(raw_list.has_unresolvable_generics(ctx));

    let cooked = ResolvedType::for_handle(
        ctx,
        TypeHandle::parameterized(wk.list, vec![TypeHandle::Class(wk.string)]),
    );
    assert!(!cooked.has_unresolvable_generics(ctx));
}

#[test]
fn wildcards_without_a_real_bound_are_unresolvable() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    // List<?>, which the JVM records as `? extends Object`.
    let unbounded = ResolvedType::for_handle(
        ctx,
        TypeHandle::parameterized(wk.list, vec![TypeHandle::unbounded_wildcard(wk.object)]),
    );
    assert!(unbounded.has_unresolvable_generics(ctx));

    // An explicit `? extends Object` is the same shape and gets the same
    // lenient treatment: Object alone is no bound.
    let explicit_object = ResolvedType::for_handle(
        ctx,
        TypeHandle::parameterized(
            wk.list,
            vec![TypeHandle::Wildcard {
                upper: vec![TypeHandle::Class(wk.object)],
                lower: vec![],
            }],
        ),
    );
    assert!(explicit_object.has_unresolvable_generics(ctx));

    // A real upper bound resolves.
    let bounded = ResolvedType::for_handle(
        ctx,
        TypeHandle::parameterized(
            wk.list,
            vec![TypeHandle::Wildcard {
                upper: vec![TypeHandle::Class(wk.number)],
                lower: vec![],
            }],
        ),
    );
    assert!(!bounded.has_unresolvable_generics(ctx));
}

#[test]
fn raw_interface_implementor_is_unresolvable() {
    let mut store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let raw_impl = store.add_class(ClassDef {
        name: "com.example.RawList".to_string(),
        kind: ClassKind::Class,
        type_params: vec![],
        super_class: Some(TypeHandle::Class(wk.object)),
        // Implements List raw, without type arguments.
        interfaces: vec![TypeHandle::Class(wk.list)],
    });
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    assert!(ResolvedType::for_class(raw_impl).has_unresolvable_generics(ctx));
    assert_eq!(type_arguments(ctx, raw_impl, wk.list), None);
}

#[test]
fn arrays_expose_their_component() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let element = ResolvedType::for_handle(
        ctx,
        TypeHandle::parameterized(wk.list, vec![TypeHandle::Class(wk.string)]),
    );
    let array = ResolvedType::for_array(ctx, &element);
    assert!(array.is_array());
    assert_eq!(
        array.resolve(),
        Some(&RawType::Array(Box::new(RawType::Class(wk.list))))
    );
    assert_eq!(
        collection_element_type(ctx, &array.component_type(ctx)).resolve(),
        Some(&RawType::Class(wk.string))
    );

    assert!(ResolvedType::for_array(ctx, &ResolvedType::none()).is_none());
    assert!(!element.is_array());
}

#[test]
fn for_class_with_generics_builds_a_parameterization() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let ty = ResolvedType::for_class_with_generics(
        ctx,
        wk.list,
        &[ResolvedType::for_class(wk.string)],
    )
    .unwrap();
    assert_eq!(
        collection_element_type(ctx, &ty).resolve(),
        Some(&RawType::Class(wk.string))
    );

    let err = ResolvedType::for_class_with_generics(
        ctx,
        wk.map,
        &[ResolvedType::for_class(wk.string)],
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::GenericArityMismatch {
            expected: 2,
            provided: 1,
            ..
        }
    ));
}

#[test]
fn for_member_sees_implementation_substitutions() {
    let mut store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let array_list = store.class_id("java.util.ArrayList").unwrap();
    let e = store.class(array_list).unwrap().type_params[0];
    let ints = store.add_class(ClassDef {
        name: "com.example.Ints".to_string(),
        kind: ClassKind::Class,
        type_params: vec![],
        super_class: Some(TypeHandle::parameterized(
            array_list,
            vec![TypeHandle::Class(wk.integer)],
        )),
        interfaces: vec![],
    });
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    // List<E> subList(...) declared on ArrayList, viewed from Ints.
    let declared = TypeHandle::parameterized(wk.list, vec![TypeHandle::Variable(e)]);
    let site = DeclarationSite::return_type("java.util.ArrayList", "subList");
    let member =
        ResolvedType::for_member(ctx, declared.clone(), site.clone(), array_list, Some(ints));
    assert_eq!(
        collection_element_type(ctx, &member).resolve(),
        Some(&RawType::Class(wk.integer))
    );
    assert_eq!(member.site(), Some(&site));

    // Without an implementation class the variable stays open.
    let unbound = ResolvedType::for_member(ctx, declared, site, array_list, None);
    assert_eq!(collection_element_type(ctx, &unbound).resolve(), None);
}

#[test]
fn type_argument_extraction() {
    let mut store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let string_list = string_list(&mut store);
    let pair = store.add_class(ClassDef {
        name: "com.example.Pair".to_string(),
        kind: ClassKind::Class,
        type_params: vec![],
        super_class: Some(TypeHandle::Class(wk.object)),
        interfaces: vec![TypeHandle::parameterized(
            wk.map,
            vec![TypeHandle::Class(wk.string), TypeHandle::Class(wk.integer)],
        )],
    });
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    assert_eq!(
        type_argument(ctx, string_list, wk.list).unwrap(),
        Some(RawType::Class(wk.string))
    );
    // Not an implementor.
    assert_eq!(type_argument(ctx, wk.string, wk.list).unwrap(), None);
    // Two-parameter interfaces are ambiguous for the single-argument form.
    let err = type_argument(ctx, pair, wk.map).unwrap_err();
    assert!(matches!(
        err,
        Error::SingleArgumentExpected { found: 2, .. }
    ));
    assert_eq!(
        type_arguments(ctx, pair, wk.map),
        Some(vec![RawType::Class(wk.string), RawType::Class(wk.integer)])
    );
}

#[test]
fn cache_shares_structurally_equal_nodes() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let handle = TypeHandle::parameterized(wk.list, vec![TypeHandle::Class(wk.string)]);
    let first = ResolvedType::for_handle(ctx, handle.clone());
    let second = ResolvedType::for_handle(ctx, handle.clone());
    assert!(first.ptr_eq(&second));
    assert_eq!(first, second);

    cache.clear();
    assert!(cache.is_empty());
    let third = ResolvedType::for_handle(ctx, handle);
    assert!(!first.ptr_eq(&third));
    // Still structurally equal.
    assert_eq!(first, third);
}

#[test]
fn plain_classes_bypass_the_cache() {
    let store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();
    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);

    let ty = ResolvedType::for_handle(ctx, TypeHandle::Class(wk.string));
    assert_eq!(ty.resolve(), Some(&RawType::Class(wk.string)));
    assert!(cache.is_empty());
}

struct MapSource(HashMap<DeclarationSite, String>);

impl DeclarationSource for MapSource {
    fn signature(&self, site: &DeclarationSite) -> Option<String> {
        self.0.get(site).cloned()
    }
}

#[test]
fn rehydrated_member_resolves_end_to_end() {
    let mut store = ClassStore::with_minimal_jdk();
    let wk = *store.well_known();

    let site = DeclarationSite::field("com.example.Config", "names");
    let mut sigs = HashMap::new();
    sigs.insert(site.clone(), "Ljava/util/List<Ljava/lang/String;>;".to_string());
    store.intern_class("com.example.Config");

    let portable = PortableTypeHandle::new(site.clone());
    let handle = portable.rehydrate(&MapSource(sigs), &mut store).unwrap();

    let cache = ResolutionCache::new();
    let ctx = ResolutionCtx::new(&store, &cache);
    let ty = ResolvedType::for_declared(ctx, handle, site.clone());
    assert_eq!(ty.site(), Some(&site));
    assert_eq!(
        collection_element_type(ctx, &ty).resolve(),
        Some(&RawType::Class(wk.string))
    );
}

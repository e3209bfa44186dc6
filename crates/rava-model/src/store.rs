use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ClassId, TypeHandle, TypeVarId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// Span-free summary of a class declaration: just enough structure for the
/// resolution engine to walk the generic supertype graph.
///
/// Member tables are deliberately absent. The engine consumes declaration
/// sites handed to it from outside; it never enumerates fields or methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.List` or `com.example.Outer$Inner`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    /// The generic superclass as declared (`None` for `java.lang.Object` and
    /// for interfaces without a recorded superclass).
    pub super_class: Option<TypeHandle>,
    /// The generic superinterfaces as declared.
    pub interfaces: Vec<TypeHandle>,
}

/// A declared type parameter: its source name plus upper bounds.
///
/// Java type parameters never declare lower bounds; wildcards carry those on
/// [`TypeHandle::Wildcard`] directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<TypeHandle>,
}

/// Ids of classes the engine needs to treat specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnown {
    pub object: ClassId,
    pub string: ClassId,
    pub char_sequence: ClassId,
    pub number: ClassId,
    pub integer: ClassId,
    pub serializable: ClassId,
    pub cloneable: ClassId,
    pub comparable: ClassId,
    pub iterable: ClassId,
    pub collection: ClassId,
    pub list: ClassId,
    pub set: ClassId,
    pub map: ClassId,
}

/// Read-only provider of class metadata.
///
/// Missing metadata is a routine outcome (stub classes, classpath holes);
/// every accessor returns `Option` and callers degrade gracefully.
pub trait ClassEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnown;

    /// Display name for diagnostics; never fails.
    fn class_name(&self, id: ClassId) -> String {
        self.class(id)
            .map(|def| def.name.clone())
            .unwrap_or_else(|| format!("<class #{}>", id.index()))
    }
}

/// In-memory [`ClassEnv`] implementation.
///
/// [`ClassStore::with_minimal_jdk`] seeds the handful of `java.*` types the
/// engine's contracts reference (Object, the collection interfaces, the
/// common value types), wired with their real generic supertype structure.
#[derive(Debug, Clone)]
pub struct ClassStore {
    classes: Vec<ClassDef>,
    type_params: Vec<TypeParamDef>,
    by_name: HashMap<String, ClassId>,
    well_known: WellKnown,
}

impl ClassStore {
    pub fn with_minimal_jdk() -> ClassStore {
        let mut store = ClassStore {
            classes: Vec::new(),
            type_params: Vec::new(),
            by_name: HashMap::new(),
            // Placeholder ids; patched below once the real classes exist.
            well_known: WellKnown {
                object: ClassId(0),
                string: ClassId(0),
                char_sequence: ClassId(0),
                number: ClassId(0),
                integer: ClassId(0),
                serializable: ClassId(0),
                cloneable: ClassId(0),
                comparable: ClassId(0),
                iterable: ClassId(0),
                collection: ClassId(0),
                list: ClassId(0),
                set: ClassId(0),
                map: ClassId(0),
            },
        };
        store.seed_minimal_jdk();
        store
    }

    fn seed_minimal_jdk(&mut self) {
        let object = self.add_class(ClassDef {
            name: "java.lang.Object".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
        });
        let obj = TypeHandle::Class(object);

        let serializable = self.add_iface("java.io.Serializable", vec![], vec![]);
        let cloneable = self.add_iface("java.lang.Cloneable", vec![], vec![]);
        let char_sequence = self.add_iface("java.lang.CharSequence", vec![], vec![]);
        self.add_iface("java.lang.Runnable", vec![], vec![]);

        let comparable_t = self.add_type_param("T", vec![obj.clone()]);
        let comparable = self.add_iface("java.lang.Comparable", vec![comparable_t], vec![]);

        let string = self.add_class(ClassDef {
            name: "java.lang.String".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(obj.clone()),
            interfaces: vec![
                TypeHandle::Class(char_sequence),
                TypeHandle::parameterized(comparable, vec![TypeHandle::Class(ClassId(0))]),
                TypeHandle::Class(serializable),
            ],
        });
        // Patch the self-reference now that String has an id.
        if let Some(def) = self.classes.get_mut(string.index()) {
            def.interfaces[1] =
                TypeHandle::parameterized(comparable, vec![TypeHandle::Class(string)]);
        }

        let number = self.add_class(ClassDef {
            name: "java.lang.Number".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(obj.clone()),
            interfaces: vec![TypeHandle::Class(serializable)],
        });
        let integer = self.add_class(ClassDef {
            name: "java.lang.Integer".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(TypeHandle::Class(number)),
            interfaces: vec![],
        });
        if let Some(def) = self.classes.get_mut(integer.index()) {
            def.interfaces
                .push(TypeHandle::parameterized(comparable, vec![TypeHandle::Class(integer)]));
        }

        // java.lang.Enum<E extends Enum<E>>: the canonical self-referential
        // generic bound.
        let enum_e = self.add_type_param("E", vec![obj.clone()]);
        let enum_class = self.add_class(ClassDef {
            name: "java.lang.Enum".to_string(),
            kind: ClassKind::Class,
            type_params: vec![enum_e],
            super_class: Some(obj.clone()),
            interfaces: vec![
                TypeHandle::parameterized(comparable, vec![TypeHandle::Variable(enum_e)]),
                TypeHandle::Class(serializable),
            ],
        });
        self.type_params[enum_e.index()].upper_bounds =
            vec![TypeHandle::parameterized(enum_class, vec![TypeHandle::Variable(enum_e)])];

        let iterable_t = self.add_type_param("T", vec![obj.clone()]);
        let iterable = self.add_iface("java.lang.Iterable", vec![iterable_t], vec![]);

        let collection_e = self.add_type_param("E", vec![obj.clone()]);
        let collection = self.add_iface(
            "java.util.Collection",
            vec![collection_e],
            vec![TypeHandle::parameterized(iterable, vec![TypeHandle::Variable(collection_e)])],
        );

        let list_e = self.add_type_param("E", vec![obj.clone()]);
        let list = self.add_iface(
            "java.util.List",
            vec![list_e],
            vec![TypeHandle::parameterized(collection, vec![TypeHandle::Variable(list_e)])],
        );

        let set_e = self.add_type_param("E", vec![obj.clone()]);
        let set = self.add_iface(
            "java.util.Set",
            vec![set_e],
            vec![TypeHandle::parameterized(collection, vec![TypeHandle::Variable(set_e)])],
        );

        let array_list_e = self.add_type_param("E", vec![obj.clone()]);
        self.add_class(ClassDef {
            name: "java.util.ArrayList".to_string(),
            kind: ClassKind::Class,
            type_params: vec![array_list_e],
            super_class: Some(obj.clone()),
            interfaces: vec![TypeHandle::parameterized(
                list,
                vec![TypeHandle::Variable(array_list_e)],
            )],
        });

        let hash_set_e = self.add_type_param("E", vec![obj.clone()]);
        self.add_class(ClassDef {
            name: "java.util.HashSet".to_string(),
            kind: ClassKind::Class,
            type_params: vec![hash_set_e],
            super_class: Some(obj.clone()),
            interfaces: vec![TypeHandle::parameterized(
                set,
                vec![TypeHandle::Variable(hash_set_e)],
            )],
        });

        let map_k = self.add_type_param("K", vec![obj.clone()]);
        let map_v = self.add_type_param("V", vec![obj.clone()]);
        let map = self.add_iface("java.util.Map", vec![map_k, map_v], vec![]);

        let hash_map_k = self.add_type_param("K", vec![obj.clone()]);
        let hash_map_v = self.add_type_param("V", vec![obj.clone()]);
        self.add_class(ClassDef {
            name: "java.util.HashMap".to_string(),
            kind: ClassKind::Class,
            type_params: vec![hash_map_k, hash_map_v],
            super_class: Some(obj.clone()),
            interfaces: vec![TypeHandle::parameterized(
                map,
                vec![TypeHandle::Variable(hash_map_k), TypeHandle::Variable(hash_map_v)],
            )],
        });

        let function_t = self.add_type_param("T", vec![obj.clone()]);
        let function_r = self.add_type_param("R", vec![obj.clone()]);
        self.add_iface("java.util.function.Function", vec![function_t, function_r], vec![]);
        let supplier_t = self.add_type_param("T", vec![obj]);
        self.add_iface("java.util.function.Supplier", vec![supplier_t], vec![]);

        self.well_known = WellKnown {
            object,
            string,
            char_sequence,
            number,
            integer,
            serializable,
            cloneable,
            comparable,
            iterable,
            collection,
            list,
            set,
            map,
        };
    }

    fn add_iface(
        &mut self,
        name: &str,
        type_params: Vec<TypeVarId>,
        interfaces: Vec<TypeHandle>,
    ) -> ClassId {
        self.add_class(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Interface,
            type_params,
            super_class: None,
            interfaces,
        })
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.classes.push(def);
        id
    }

    pub fn add_type_param(&mut self, name: &str, upper_bounds: Vec<TypeHandle>) -> TypeVarId {
        let id = TypeVarId(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef {
            name: name.to_string(),
            upper_bounds,
        });
        id
    }

    /// Look up `name`, creating an empty stub class on first sight.
    ///
    /// Signature translation uses this so that references to classes outside
    /// the store stay representable instead of failing the whole declaration.
    pub fn intern_class(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        tracing::debug!(target: "rava.model", name, "interning stub class");
        let object = self.well_known.object;
        self.add_class(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(TypeHandle::Class(object)),
            interfaces: vec![],
        })
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.index())
    }

    pub fn type_param_mut(&mut self, id: TypeVarId) -> Option<&mut TypeParamDef> {
        self.type_params.get_mut(id.index())
    }
}

impl ClassEnv for ClassStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    fn well_known(&self) -> &WellKnown {
        &self.well_known
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_jdk_wires_collection_hierarchy() {
        let store = ClassStore::with_minimal_jdk();
        let wk = *store.well_known();

        let list = store.class(wk.list).expect("List should exist");
        assert_eq!(list.kind, ClassKind::Interface);
        assert_eq!(list.type_params.len(), 1);
        let list_e = list.type_params[0];
        assert_eq!(
            list.interfaces,
            vec![TypeHandle::parameterized(wk.collection, vec![TypeHandle::Variable(list_e)])]
        );

        let array_list = store.class_id("java.util.ArrayList").unwrap();
        let array_list = store.class(array_list).unwrap();
        let e = array_list.type_params[0];
        assert_eq!(
            array_list.interfaces,
            vec![TypeHandle::parameterized(wk.list, vec![TypeHandle::Variable(e)])]
        );
    }

    #[test]
    fn enum_bound_is_self_referential() {
        let store = ClassStore::with_minimal_jdk();
        let enum_id = store.class_id("java.lang.Enum").unwrap();
        let e = store.class(enum_id).unwrap().type_params[0];
        let bound = &store.type_param(e).unwrap().upper_bounds;
        assert_eq!(
            *bound,
            vec![TypeHandle::parameterized(enum_id, vec![TypeHandle::Variable(e)])]
        );
    }

    #[test]
    fn intern_class_is_idempotent() {
        let mut store = ClassStore::with_minimal_jdk();
        let a = store.intern_class("com.example.Missing");
        let b = store.intern_class("com.example.Missing");
        assert_eq!(a, b);
        assert_eq!(store.class(a).unwrap().name, "com.example.Missing");
        // Known classes are returned as-is.
        assert_eq!(store.intern_class("java.util.List"), store.well_known().list);
    }
}

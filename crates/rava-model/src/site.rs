//! Declaration sites and the serializable type-handle adapter.
//!
//! A [`DeclarationSite`] names where a declared type came from (a field, a
//! method parameter, a method return, or a class itself) using stable string
//! identities, so it can cross process boundaries. [`PortableTypeHandle`]
//! serializes only the site and re-derives the actual [`TypeHandle`] from the
//! member's recorded generic signature on the other side.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signature::{parse_method_signature, parse_type_signature, SignatureError};
use crate::store::ClassEnv;
use crate::translate::{handle_from_type_sig, method_from_sig, TypeVarScope};
use crate::{ClassStore, TypeHandle};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberRef {
    Field { name: String },
    Parameter { method: String, index: u16 },
    Return { method: String },
    Class,
}

/// Identifies a declaration site by declaring-class binary name plus member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclarationSite {
    pub declaring: String,
    pub member: MemberRef,
}

impl DeclarationSite {
    pub fn field(declaring: impl Into<String>, name: impl Into<String>) -> DeclarationSite {
        DeclarationSite {
            declaring: declaring.into(),
            member: MemberRef::Field { name: name.into() },
        }
    }

    pub fn parameter(
        declaring: impl Into<String>,
        method: impl Into<String>,
        index: u16,
    ) -> DeclarationSite {
        DeclarationSite {
            declaring: declaring.into(),
            member: MemberRef::Parameter {
                method: method.into(),
                index,
            },
        }
    }

    pub fn return_type(declaring: impl Into<String>, method: impl Into<String>) -> DeclarationSite {
        DeclarationSite {
            declaring: declaring.into(),
            member: MemberRef::Return {
                method: method.into(),
            },
        }
    }

    pub fn class(declaring: impl Into<String>) -> DeclarationSite {
        DeclarationSite {
            declaring: declaring.into(),
            member: MemberRef::Class,
        }
    }
}

impl fmt::Display for DeclarationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            MemberRef::Field { name } => write!(f, "{}#{}", self.declaring, name),
            MemberRef::Parameter { method, index } => {
                write!(f, "{}#{}(arg {})", self.declaring, method, index)
            }
            MemberRef::Return { method } => write!(f, "{}#{}()", self.declaring, method),
            MemberRef::Class => f.write_str(&self.declaring),
        }
    }
}

/// Supplies the recorded generic signature (or plain descriptor) of a member.
///
/// Implemented by whatever owns the compiled class metadata; the engine only
/// needs this one seam to rebuild handles after deserialization.
pub trait DeclarationSource {
    fn signature(&self, site: &DeclarationSite) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum RehydrateError {
    #[error("no signature recorded for {0}")]
    MissingSignature(DeclarationSite),
    #[error("{site} has no parameter {index}")]
    MissingParameter { site: DeclarationSite, index: u16 },
    #[error("{site} declares void, which is not a type")]
    VoidReturn { site: DeclarationSite },
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Serialization adapter for a declared type.
///
/// Only the declaration site is stored. [`PortableTypeHandle::rehydrate`]
/// re-derives the handle by parsing the member's signature against a store,
/// so deserialized values never carry stale interned ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortableTypeHandle {
    site: DeclarationSite,
}

impl PortableTypeHandle {
    pub fn new(site: DeclarationSite) -> PortableTypeHandle {
        PortableTypeHandle { site }
    }

    pub fn site(&self) -> &DeclarationSite {
        &self.site
    }

    pub fn rehydrate(
        &self,
        source: &dyn DeclarationSource,
        store: &mut ClassStore,
    ) -> Result<TypeHandle, RehydrateError> {
        let scope = declaring_scope(store, &self.site.declaring);
        match &self.site.member {
            MemberRef::Class => {
                let id = store.intern_class(&self.site.declaring);
                Ok(TypeHandle::Class(id))
            }
            MemberRef::Field { .. } => {
                let sig = self.signature_for(source)?;
                let parsed = parse_type_signature(&sig)?;
                Ok(handle_from_type_sig(store, &scope, &parsed))
            }
            MemberRef::Parameter { index, .. } => {
                let sig = self.signature_for(source)?;
                let parsed = parse_method_signature(&sig)?;
                let (_type_params, mut params, _ret) = method_from_sig(store, &scope, &parsed);
                if usize::from(*index) >= params.len() {
                    return Err(RehydrateError::MissingParameter {
                        site: self.site.clone(),
                        index: *index,
                    });
                }
                Ok(params.swap_remove(usize::from(*index)))
            }
            MemberRef::Return { .. } => {
                let sig = self.signature_for(source)?;
                let parsed = parse_method_signature(&sig)?;
                let (_type_params, _params, ret) = method_from_sig(store, &scope, &parsed);
                ret.ok_or(RehydrateError::VoidReturn {
                    site: self.site.clone(),
                })
            }
        }
    }

    fn signature_for(&self, source: &dyn DeclarationSource) -> Result<String, RehydrateError> {
        source
            .signature(&self.site)
            .ok_or_else(|| RehydrateError::MissingSignature(self.site.clone()))
    }
}

/// Class-level type variables visible inside `declaring`'s members.
fn declaring_scope(store: &ClassStore, declaring: &str) -> TypeVarScope {
    let mut scope = TypeVarScope::new();
    let Some(id) = store.class_id(declaring) else {
        return scope;
    };
    let Some(def) = store.class(id) else {
        return scope;
    };
    for var in def.type_params.clone() {
        if let Some(tp) = store.type_param(var) {
            scope.insert(&tp.name, var);
        }
    }
    scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ClassDef, ClassKind};
    use crate::{ClassEnv, TypeVarId};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct MapSource(HashMap<DeclarationSite, String>);

    impl DeclarationSource for MapSource {
        fn signature(&self, site: &DeclarationSite) -> Option<String> {
            self.0.get(site).cloned()
        }
    }

    fn holder_class(store: &mut ClassStore) -> TypeVarId {
        let object = store.well_known().object;
        let t = store.add_type_param("T", vec![TypeHandle::Class(object)]);
        store.add_class(ClassDef {
            name: "com.example.Holder".to_string(),
            kind: ClassKind::Class,
            type_params: vec![t],
            super_class: Some(TypeHandle::Class(object)),
            interfaces: vec![],
        });
        t
    }

    #[test]
    fn site_round_trips_through_json() {
        let site = DeclarationSite::parameter("com.example.Holder", "put", 1);
        let portable = PortableTypeHandle::new(site.clone());
        let json = serde_json::to_string(&portable).unwrap();
        let back: PortableTypeHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(back.site(), &site);
    }

    #[test]
    fn rehydrates_field_handle_from_signature() {
        let mut store = ClassStore::with_minimal_jdk();
        let t = holder_class(&mut store);
        let wk = *store.well_known();

        let site = DeclarationSite::field("com.example.Holder", "values");
        let mut sigs = HashMap::new();
        sigs.insert(site.clone(), "Ljava/util/List<TT;>;".to_string());

        let handle = PortableTypeHandle::new(site)
            .rehydrate(&MapSource(sigs), &mut store)
            .unwrap();
        assert_eq!(
            handle,
            TypeHandle::parameterized(wk.list, vec![TypeHandle::Variable(t)])
        );
    }

    #[test]
    fn rehydrates_parameter_and_return_handles() {
        let mut store = ClassStore::with_minimal_jdk();
        let t = holder_class(&mut store);
        let wk = *store.well_known();

        let param_site = DeclarationSite::parameter("com.example.Holder", "replace", 1);
        let return_site = DeclarationSite::return_type("com.example.Holder", "replace");
        let sig = "(ILjava/util/List<TT;>;)TT;".to_string();
        let mut sigs = HashMap::new();
        sigs.insert(param_site.clone(), sig.clone());
        sigs.insert(return_site.clone(), sig);

        let source = MapSource(sigs);
        let param = PortableTypeHandle::new(param_site)
            .rehydrate(&source, &mut store)
            .unwrap();
        assert_eq!(
            param,
            TypeHandle::parameterized(wk.list, vec![TypeHandle::Variable(t)])
        );

        let ret = PortableTypeHandle::new(return_site)
            .rehydrate(&source, &mut store)
            .unwrap();
        assert_eq!(ret, TypeHandle::Variable(t));
    }

    #[test]
    fn missing_signature_is_an_error() {
        let mut store = ClassStore::with_minimal_jdk();
        let site = DeclarationSite::field("com.example.Holder", "gone");
        let err = PortableTypeHandle::new(site)
            .rehydrate(&MapSource(HashMap::new()), &mut store)
            .unwrap_err();
        assert!(matches!(err, RehydrateError::MissingSignature(_)));
    }

    #[test]
    fn class_member_rehydrates_to_raw_class() {
        let mut store = ClassStore::with_minimal_jdk();
        let site = DeclarationSite::class("java.util.List");
        let handle = PortableTypeHandle::new(site)
            .rehydrate(&MapSource(HashMap::new()), &mut store)
            .unwrap();
        assert_eq!(handle, TypeHandle::Class(store.well_known().list));
    }
}

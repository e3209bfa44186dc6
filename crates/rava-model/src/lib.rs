//! Class metadata and declared-type handles for the rava resolution engine.
//!
//! This crate owns the data the engine in `rava-resolve` operates on: interned
//! class/type-parameter identities, the [`TypeHandle`] sum type describing a
//! declared Java type, the [`ClassEnv`] metadata provider with its in-memory
//! [`ClassStore`] implementation, JVM generic-signature parsing/translation,
//! and the serializable declaration-site adapter.
//!
//! Nothing here performs resolution; handles are plain immutable values.

#![forbid(unsafe_code)]

mod signature;
mod site;
mod store;
mod translate;

pub use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, parse_type_signature,
    ClassSig, ClassSigSegment, ClassTypeSig, MethodSig, RefTypeSig, SignatureError, TypeArgSig,
    TypeParamSig, TypeSig,
};
pub use crate::site::{
    DeclarationSite, DeclarationSource, MemberRef, PortableTypeHandle, RehydrateError,
};
pub use crate::store::{ClassDef, ClassEnv, ClassKind, ClassStore, TypeParamDef, WellKnown};
pub use crate::translate::{
    class_def_from_sig, handle_from_field_sig, method_from_sig, TypeVarScope,
};

use serde::{Deserialize, Serialize};

/// Interned identity of a class or interface within a [`ClassEnv`].
///
/// Ids are only meaningful relative to the store that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interned identity of a type parameter declaration.
///
/// A `TypeVarId` stands for a specific declaration site (`T` on `List` is a
/// different id than `T` on `Map`), which is what makes substitution matching
/// exact rather than name-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(pub(crate) u32);

impl TypeVarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    /// Maps a JVM descriptor character (`I`, `Z`, ...) to a primitive.
    pub fn from_descriptor(c: char) -> Option<PrimitiveType> {
        Some(match c {
            'Z' => PrimitiveType::Boolean,
            'B' => PrimitiveType::Byte,
            'C' => PrimitiveType::Char,
            'S' => PrimitiveType::Short,
            'I' => PrimitiveType::Int,
            'J' => PrimitiveType::Long,
            'F' => PrimitiveType::Float,
            'D' => PrimitiveType::Double,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

/// A declared Java type, as it appears at a declaration site.
///
/// This is a closed union over the five shapes a declared type can take
/// (raw class, parameterized, wildcard, type variable, array) plus
/// primitives. Handles are immutable values; all reasoning about them lives
/// in `rava-resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeHandle {
    /// A raw (unparameterized) class or interface reference.
    Class(ClassId),
    Primitive(PrimitiveType),
    /// `class<args...>`, optionally nested inside a parameterized owner type
    /// (`Outer<A>.Inner<B>`).
    Parameterized {
        class: ClassId,
        args: Vec<TypeHandle>,
        owner: Option<Box<TypeHandle>>,
    },
    /// An unnamed type argument constrained by upper and/or lower bounds.
    /// The unbounded wildcard `?` carries a single `Object` upper bound.
    Wildcard {
        upper: Vec<TypeHandle>,
        lower: Vec<TypeHandle>,
    },
    /// A reference to a declared type parameter.
    Variable(TypeVarId),
    Array(Box<TypeHandle>),
}

impl TypeHandle {
    pub fn class(id: ClassId) -> TypeHandle {
        TypeHandle::Class(id)
    }

    pub fn parameterized(class: ClassId, args: Vec<TypeHandle>) -> TypeHandle {
        TypeHandle::Parameterized {
            class,
            args,
            owner: None,
        }
    }

    pub fn array(component: TypeHandle) -> TypeHandle {
        TypeHandle::Array(Box::new(component))
    }

    pub fn variable(var: TypeVarId) -> TypeHandle {
        TypeHandle::Variable(var)
    }

    /// The unbounded wildcard `?`, which the JVM models as `? extends Object`.
    pub fn unbounded_wildcard(object: ClassId) -> TypeHandle {
        TypeHandle::Wildcard {
            upper: vec![TypeHandle::Class(object)],
            lower: vec![],
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeHandle::Array(_))
    }
}

/// The erasure of a declared type: what is left once generics are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawType {
    Class(ClassId),
    Primitive(PrimitiveType),
    Array(Box<RawType>),
}

impl RawType {
    pub fn class(id: ClassId) -> RawType {
        RawType::Class(id)
    }

    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            RawType::Class(id) => Some(*id),
            _ => None,
        }
    }
}

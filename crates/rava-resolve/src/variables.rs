//! Strategies for mapping type variables to concrete types.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rava_model::TypeVarId;

use crate::{ResolutionCtx, ResolvedType};

/// Resolves type variables encountered while navigating a type.
///
/// `Owner` delegates to the type the variable was observed on, which walks
/// parameterized substitutions and enclosing owners. `Explicit` pairs a fixed
/// list of variables with caller-supplied types and is what backs
/// [`ResolvedType::for_class_with_generics`].
#[derive(Clone)]
pub enum VariableResolver {
    Owner(ResolvedType),
    Explicit {
        variables: Arc<[TypeVarId]>,
        generics: Arc<[ResolvedType]>,
    },
}

impl VariableResolver {
    pub(crate) fn resolve_variable(
        &self,
        ctx: ResolutionCtx<'_>,
        var: TypeVarId,
    ) -> Option<ResolvedType> {
        match self {
            VariableResolver::Owner(owner) => owner.resolve_variable(ctx, var),
            VariableResolver::Explicit { variables, generics } => variables
                .iter()
                .position(|candidate| *candidate == var)
                .and_then(|i| generics.get(i).cloned()),
        }
    }
}

impl PartialEq for VariableResolver {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (VariableResolver::Owner(a), VariableResolver::Owner(b)) => a == b,
            (
                VariableResolver::Explicit {
                    variables: av,
                    generics: ag,
                },
                VariableResolver::Explicit {
                    variables: bv,
                    generics: bg,
                },
            ) => av == bv && ag == bg,
            _ => false,
        }
    }
}

impl Eq for VariableResolver {}

impl Hash for VariableResolver {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            VariableResolver::Owner(owner) => {
                state.write_u8(0);
                owner.hash(state);
            }
            VariableResolver::Explicit { variables, generics } => {
                state.write_u8(1);
                variables.hash(state);
                for generic in generics.iter() {
                    generic.hash(state);
                }
            }
        }
    }
}

impl std::fmt::Debug for VariableResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableResolver::Owner(owner) => f.debug_tuple("Owner").field(owner).finish(),
            VariableResolver::Explicit { variables, .. } => f
                .debug_struct("Explicit")
                .field("variables", variables)
                .finish_non_exhaustive(),
        }
    }
}

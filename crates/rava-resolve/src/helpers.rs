//! Convenience queries over common generic shapes.

use rava_model::{ClassId, RawType};

use crate::{Error, ResolutionCtx, ResolvedType};

/// The element type of `ty` viewed as a `java.util.Collection`, or `none`
/// if it is not one.
pub fn collection_element_type(ctx: ResolutionCtx<'_>, ty: &ResolvedType) -> ResolvedType {
    ty.as_class(ctx, ctx.env().well_known().collection)
        .generic(ctx, &[])
}

/// The key type of `ty` viewed as a `java.util.Map`, or `none`.
pub fn map_key_type(ctx: ResolutionCtx<'_>, ty: &ResolvedType) -> ResolvedType {
    ty.as_class(ctx, ctx.env().well_known().map).generic(ctx, &[0])
}

/// The value type of `ty` viewed as a `java.util.Map`, or `none`.
pub fn map_value_type(ctx: ResolutionCtx<'_>, ty: &ResolvedType) -> ResolvedType {
    ty.as_class(ctx, ctx.env().well_known().map).generic(ctx, &[1])
}

/// The single type argument `implementation` supplies for
/// `generic_interface`.
///
/// `Ok(None)` when the interface is not implemented, implemented raw, or the
/// argument does not resolve to an erasure. Erroring on an interface with
/// more than one parameter keeps "which argument did you mean" bugs loud.
pub fn type_argument(
    ctx: ResolutionCtx<'_>,
    implementation: ClassId,
    generic_interface: ClassId,
) -> Result<Option<RawType>, Error> {
    let view = ResolvedType::for_class(implementation).as_class(ctx, generic_interface);
    if view.is_none() || !view.has_generics(ctx) {
        return Ok(None);
    }
    let generics = view.generics(ctx);
    if generics.len() != 1 {
        return Err(Error::SingleArgumentExpected {
            interface: ctx.env().class_name(generic_interface),
            found: generics.len(),
        });
    }
    Ok(generics[0].resolve().cloned())
}

/// All type arguments `implementation` supplies for `generic_interface`,
/// with `Object` standing in for positions that resolve to no erasure.
///
/// `None` when the interface is not implemented or is implemented in a form
/// that leaves a generic unresolvable (for example raw).
pub fn type_arguments(
    ctx: ResolutionCtx<'_>,
    implementation: ClassId,
    generic_interface: ClassId,
) -> Option<Vec<RawType>> {
    let view = ResolvedType::for_class(implementation).as_class(ctx, generic_interface);
    if view.is_none() || !view.has_generics(ctx) || view.has_unresolvable_generics(ctx) {
        return None;
    }
    let object = RawType::Class(ctx.env().well_known().object);
    Some(view.resolve_generics(ctx, object))
}

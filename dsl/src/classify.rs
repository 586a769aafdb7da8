//! Pure classification predicates deciding how a type may appear in the
//! DSL: inline child element, top-level global element, or wrapped
//! polymorphic element.

use xylem_model::{ExpressionSupport, MetadataType, ObjectType};

use crate::catalog::{SubTypesCatalog, TypeLookup};

/// A bean that can actually be declared in markup: instantiable with at
/// least one field.
pub fn is_valid_bean(obj: &ObjectType) -> bool {
    obj.instantiable && !obj.fields.is_empty()
}

/// A declared base type with unknown-at-compile-time concrete sub-types
/// must render behind a wrapper element, so any concrete sub-type can be
/// substituted at the XML level. That substitution is this mechanism's
/// sole purpose.
pub fn requires_wrapper_element(
    ty: &MetadataType,
    sub_types: &SubTypesCatalog,
    lookup: &TypeLookup<'_>,
) -> crate::Result<bool> {
    Ok(match lookup.object_of(ty)? {
        Some(obj) => obj.extensible || sub_types.has_subtypes(ty),
        None => false,
    })
}

/// Whether the type can be declared as a child element of its owner.
///
/// Precedence: content parameters always can; `Required` expression
/// support never can; everything else dispatches on the type kind.
pub fn supports_inline_declaration(
    ty: &MetadataType,
    expression_support: ExpressionSupport,
    allows_inline: bool,
    is_content: bool,
    lookup: &TypeLookup<'_>,
) -> crate::Result<bool> {
    if is_content {
        return Ok(true);
    }
    if expression_support == ExpressionSupport::Required {
        return Ok(false);
    }

    Ok(match ty {
        MetadataType::Any => false,

        scalar if scalar.is_scalar() => true,

        MetadataType::Array { item } => {
            // nested maps inside lists are not representable
            if matches!(item.as_ref(), MetadataType::Dictionary { .. }) {
                false
            } else {
                supports_inline_declaration(
                    item,
                    expression_support,
                    allows_inline,
                    is_content,
                    lookup,
                )?
            }
        },

        MetadataType::Object(..) | MetadataType::Reference { .. } => {
            match lookup.object_of(ty)? {
                Some(obj) => allows_inline && is_valid_bean(obj),
                None => false,
            }
        },

        // union branches are visited independently by the resolver
        MetadataType::Union { .. } => false,

        MetadataType::Dictionary { key, .. } => {
            matches!(key.as_ref(), MetadataType::String | MetadataType::Number)
        },

        _ => false,
    })
}

/// Whether the type can be declared as a standalone, referenceable
/// top-level element.
pub fn supports_top_level_declaration(
    ty: &MetadataType,
    allows_references: bool,
    lookup: &TypeLookup<'_>,
) -> crate::Result<bool> {
    if !allows_references {
        return Ok(false);
    }
    Ok(lookup
        .object_of(ty)?
        .map(is_valid_bean)
        .unwrap_or(false))
}

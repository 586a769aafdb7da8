//! Catalogs built once per resolver instance: sub-type relationships,
//! imported-type namespaces, and named-type dereferencing.

use std::collections::BTreeMap;

use xylem_model::{
    DslResolvingContext, ExtensionModel, MetadataType, ObjectType, XmlDslProperties,
};

/// Maps a base type to its known concrete sub-types.
///
/// Keyed by [`MetadataType::type_key`]: lookup is structural, so instances
/// reconstructed across serialization boundaries still match.
#[derive(Debug, Default)]
pub struct SubTypesCatalog {
    map: BTreeMap<String, Vec<MetadataType>>,
}

impl SubTypesCatalog {
    pub fn build(extension: &ExtensionModel) -> Self {
        let mut map: BTreeMap<String, Vec<MetadataType>> = BTreeMap::new();
        for decl in &extension.sub_types {
            map.entry(decl.base.type_key())
                .or_default()
                .extend(decl.subtypes.iter().cloned());
        }
        Self { map }
    }

    pub fn subtypes_of(
        &self,
        ty: &MetadataType,
    ) -> &[MetadataType] {
        self.map
            .get(&ty.type_key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_subtypes(
        &self,
        ty: &MetadataType,
    ) -> bool {
        !self.subtypes_of(ty).is_empty()
    }
}

/// Maps an imported type to the XML namespace of the extension that
/// originally declared it.
#[derive(Debug, Default)]
pub struct ImportedTypesCatalog {
    map: BTreeMap<String, XmlDslProperties>,
}

impl ImportedTypesCatalog {
    /// Fails when an import's origin extension is absent from the context,
    /// or present but without XML DSL properties. Both are construction
    /// errors: a resolver over an inconsistent import set must not exist.
    pub fn build(
        extension: &ExtensionModel,
        context: &dyn DslResolvingContext,
    ) -> crate::Result<Self> {
        let mut map = BTreeMap::new();
        for import in &extension.imported_types {
            let origin = context.extension(&import.origin).ok_or_else(|| {
                crate::Error::ImportedExtensionMissing {
                    ty: import.ty.type_key(),
                    extension: import.origin.clone(),
                }
            })?;
            let xml = origin.xml.clone().ok_or_else(|| {
                crate::Error::MissingXmlProperties {
                    extension: origin.name.clone(),
                }
            })?;
            map.insert(import.ty.type_key(), xml);
        }
        Ok(Self { map })
    }

    pub fn namespace_of(
        &self,
        ty: &MetadataType,
    ) -> Option<&XmlDslProperties> {
        self.map.get(&ty.type_key())
    }
}

/// Dereferences [`MetadataType::Reference`] against the owning extension's
/// named type catalog.
#[derive(Clone, Copy)]
pub struct TypeLookup<'a> {
    extension: &'a ExtensionModel,
}

impl<'a> TypeLookup<'a> {
    pub fn new(extension: &'a ExtensionModel) -> Self {
        Self { extension }
    }

    /// The object definition behind `ty`, if it is object-like. A dangling
    /// reference is an error; non-object kinds are `None`.
    pub fn object_of<'b>(
        &'b self,
        ty: &'b MetadataType,
    ) -> crate::Result<Option<&'b ObjectType>> {
        match ty {
            MetadataType::Object(obj) => Ok(Some(obj)),
            MetadataType::Reference { to } => {
                self.extension
                    .object_type(to)
                    .map(Some)
                    .ok_or_else(|| crate::Error::UnknownTypeReference { to: to.clone() })
            },
            _ => Ok(None),
        }
    }
}

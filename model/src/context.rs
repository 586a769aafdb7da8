use std::collections::BTreeMap;

use crate::{ExtensionModel, Name};

/// How the resolver looks up other extensions' metadata when resolving
/// cross-extension imports.
pub trait DslResolvingContext {
    fn extension(
        &self,
        name: &Name,
    ) -> Option<&ExtensionModel>;
}

/// In-memory catalog of loaded extension models. An empty catalog is a
/// valid resolving context.
#[derive(Default)]
pub struct ExtensionCatalog {
    extensions: BTreeMap<Name, ExtensionModel>,
}

impl ExtensionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        extension: ExtensionModel,
    ) {
        self.extensions
            .insert(extension.name.clone(), extension);
    }

    pub fn with_extensions(
        &mut self,
        extensions: Vec<ExtensionModel>,
    ) {
        for extension in extensions {
            self.register(extension);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl DslResolvingContext for ExtensionCatalog {
    fn extension(
        &self,
        name: &Name,
    ) -> Option<&ExtensionModel> {
        self.extensions.get(name)
    }
}

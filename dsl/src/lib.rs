//! XML-DSL syntax resolution over extension metadata models.
//!
//! Given an [`ExtensionModel`](xylem_model::ExtensionModel) and a resolving
//! context for cross-extension imports, [`DslSyntaxResolver`] derives how
//! each component, parameter, and type is represented in the configuration
//! DSL: element names, namespaces, attribute vs. child element, top-level
//! declarability, and wrapper elements for polymorphic types.

pub mod catalog;
pub mod classify;
pub mod naming;
pub mod resolver;
pub mod syntax;

pub use catalog::*;
pub use resolver::*;
pub use syntax::*;

use xylem_model::Name;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("extension '{extension}' does not declare xml dsl properties")]
    MissingXmlProperties { extension: Name },

    #[error(
        "type '{ty}' is imported from extension '{extension}', which is not present in the resolving context"
    )]
    ImportedExtensionMissing { ty: String, extension: Name },

    #[error("cannot derive a top-level element name for unnamed type '{ty}'")]
    UnnamedType { ty: String },

    #[error("reference to unknown type '{to}'")]
    UnknownTypeReference { to: Name },

    #[error("{0}")]
    Model(#[from] xylem_model::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Shared fixtures for the workspace's test suites.

use tracing::Level;
use xylem_model::{
    ComponentKind, ComponentModel, ExtensionModel, MetadataType, Name, ObjectField, ObjectType,
    XmlDslProperties,
};

pub fn logging() {
    use std::sync::Once;

    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .init();
    });
}

/// A minimal extension carrying XML DSL properties, ready to receive types
/// and components.
pub fn extension(prefix: &str) -> ExtensionModel {
    let mut ext = ExtensionModel::new(prefix);
    ext.xml = Some(XmlDslProperties::from_prefix(prefix));
    ext
}

/// An instantiable object type with a dotted id and one string field per
/// given name.
pub fn bean(
    id: &str,
    fields: &[&str],
) -> ObjectType {
    ObjectType::builder()
        .id(id.to_string())
        .fields(
            fields
                .iter()
                .map(|name| {
                    ObjectField::builder()
                        .name(Name::from(*name))
                        .ty(MetadataType::String)
                        .build()
                })
                .collect(),
        )
        .build()
}

pub fn operation(name: &str) -> ComponentModel {
    ComponentModel::builder()
        .name(Name::from(name))
        .kind(ComponentKind::Operation)
        .build()
}

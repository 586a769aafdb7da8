use std::{collections::BTreeMap, io::Write, path::PathBuf};

use tracing::trace;

use crate::{MetadataType, Name, ObjectType, ParameterModel};

/// The XML namespace an extension's elements live in.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Eq, Clone, bon::Builder)]
pub struct XmlDslProperties {
    pub prefix: Name,

    pub namespace: String,
}

impl XmlDslProperties {
    pub fn new<P: Into<Name>, N: Into<String>>(
        prefix: P,
        namespace: N,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            namespace: namespace.into(),
        }
    }

    /// The conventional URI used when a declaration names only its prefix.
    pub fn default_namespace_uri(prefix: &Name) -> String {
        format!("http://www.example.org/schema/{prefix}")
    }

    pub fn from_prefix<P: Into<Name>>(prefix: P) -> Self {
        let prefix = prefix.into();
        let namespace = Self::default_namespace_uri(&prefix);
        Self { prefix, namespace }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    #[default]
    Operation,

    Source,
    Configuration,
    ConnectionProvider,
    Construct,
}

/// A declarable, named component of an extension.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone, bon::Builder)]
pub struct ComponentModel {
    pub name: Name,

    #[serde(default)]
    #[builder(default)]
    pub kind: ComponentKind,

    /// Whether uses of the component must point at an associated
    /// configuration element.
    #[serde(default = "crate::utils::default_no")]
    #[builder(default)]
    pub requires_config: bool,

    #[serde(default)]
    #[builder(default)]
    pub parameters: Vec<ParameterModel>,
}

/// Declares the known concrete sub-types of a base type.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone, bon::Builder)]
pub struct SubTypesDeclaration {
    pub base: MetadataType,

    pub subtypes: Vec<MetadataType>,
}

/// Declares that a type used by this extension was originally declared by
/// another extension, whose namespace governs its DSL representation.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone, bon::Builder)]
pub struct ImportedTypeDeclaration {
    #[serde(rename = "type")]
    pub ty: MetadataType,

    pub origin: Name,
}

/// The complete metadata model of one extension, as consumed by the DSL
/// syntax resolver.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone, bon::Builder)]
pub struct ExtensionModel {
    pub name: Name,

    #[serde(default)]
    pub xml: Option<XmlDslProperties>,

    #[serde(default)]
    #[builder(default)]
    pub types: BTreeMap<Name, ObjectType>,

    #[serde(default)]
    #[builder(default)]
    pub sub_types: Vec<SubTypesDeclaration>,

    #[serde(default)]
    #[builder(default)]
    pub imported_types: Vec<ImportedTypeDeclaration>,

    #[serde(default)]
    #[builder(default)]
    pub components: BTreeMap<Name, ComponentModel>,
}

impl ExtensionModel {
    pub fn new<N: Into<Name>>(name: N) -> Self {
        Self {
            name: name.into(),
            xml: None,
            types: Default::default(),
            sub_types: Default::default(),
            imported_types: Default::default(),
            components: Default::default(),
        }
    }

    pub fn object_type(
        &self,
        name: &Name,
    ) -> Option<&ObjectType> {
        self.types.get(name)
    }

    /// Registers a named type. The registered name becomes the type's alias
    /// when it does not already carry one, so that references and catalog
    /// keys agree.
    pub fn with_type<N: Into<Name>>(
        &mut self,
        name: N,
        mut ty: ObjectType,
    ) -> crate::Result<()> {
        let name = name.into();
        if ty.alias.is_none() {
            ty.alias = Some(name.clone());
        }
        unique_def(&mut self.types, name, &self.name, ty, "type")
    }

    pub fn with_component(
        &mut self,
        component: ComponentModel,
    ) -> crate::Result<()> {
        unique_def(
            &mut self.components,
            component.name.clone(),
            &self.name,
            component,
            "component",
        )
    }

    pub fn load_data(
        data: Vec<u8>,
        ext: &str,
    ) -> crate::Result<Self> {
        let mut model: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_slice(&data)?,
            "json" => serde_json::from_slice(&data)?,
            "toml" => toml::from_str(&String::from_utf8_lossy(&data))?,
            ext => unimplemented!("{ext} is not implemented"),
        };
        model.normalize();
        Ok(model)
    }

    /// Backfills each registered type's alias from its registration name,
    /// so references and catalog keys agree after deserialization.
    pub fn normalize(&mut self) {
        for (name, ty) in self.types.iter_mut() {
            if ty.alias.is_none() {
                trace!("aliasing type '{name}' from its registration name");
                ty.alias = Some(name.clone());
            }
        }
    }

    pub fn write_data<W: Write>(
        &self,
        w: &mut W,
        ext: &str,
    ) -> crate::Result<()> {
        let _: () = match ext {
            "yaml" | "yml" => serde_yaml::to_writer(w, self)?,
            "json" => serde_json::to_writer(w, self)?,
            "toml" => {
                let buf = toml::to_string(self)?.as_bytes().to_vec();
                let wrote = w.write(&buf)?;
                if wrote != buf.len() {
                    return Err(crate::Error::Io(std::io::Error::new(
                        std::io::ErrorKind::WriteZero,
                        "failed to write toml file",
                    )));
                }
                w.flush()?;
            },
            ext => unimplemented!("{ext} is not implemented"),
        };
        Ok(())
    }

    pub fn load_from_path(path: PathBuf) -> crate::Result<Self> {
        Self::load_data(
            std::fs::read(&path)?,
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("yaml"),
        )
        .map_err(crate::Error::from_with_source_init(
            path.display().to_string(),
        ))
    }

    pub fn export(
        &self,
        path: PathBuf,
    ) -> crate::Result<()> {
        self.write_data(
            &mut std::fs::File::create(&path)?,
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("yaml"),
        )
    }
}

#[inline]
fn unique_def<T>(
    sources: &mut BTreeMap<Name, T>,
    name: Name,
    extension: &Name,
    def: T,
    tag: &'static str,
) -> crate::Result<()> {
    match sources.insert(name.clone(), def) {
        Some(..) => {
            Err(crate::Error::DuplicateName {
                extension: extension.clone(),
                name,
                tag,
            })
        },
        None => Ok(()),
    }
}

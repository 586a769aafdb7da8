use std::fmt::Display;

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self::from(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for Name {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

/// Per-type DSL hints, declared alongside the type itself rather than on a
/// parameter that happens to use it.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone, bon::Builder)]
pub struct TypeDsl {
    #[serde(default = "crate::utils::default_yes")]
    #[builder(default = true)]
    pub allows_inline_definition: bool,

    #[serde(default = "crate::utils::default_yes")]
    #[builder(default = true)]
    pub allows_references: bool,

    #[serde(default = "crate::utils::default_yes")]
    #[builder(default = true)]
    pub allows_top_level_definition: bool,
}

impl Default for TypeDsl {
    fn default() -> Self {
        Self {
            allows_inline_definition: true,
            allows_references: true,
            allows_top_level_definition: true,
        }
    }
}

/// A named field owned by exactly one [`ObjectType`].
///
/// A `flattened` field signals that the field's own sub-fields should be
/// merged into the parent's children instead of nesting one level.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone, bon::Builder)]
pub struct ObjectField {
    pub name: Name,

    #[serde(rename = "type")]
    pub ty: MetadataType,

    #[serde(default = "crate::utils::default_no")]
    #[builder(default)]
    pub flattened: bool,
}

/// An object definition: optionally identified, optionally aliased, with an
/// ordered list of fields.
///
/// `id` is the stable dotted identifier (e.g. `org.acme.Pool`); `alias` is
/// the short name the owning extension registers the type under. Either may
/// be absent on anonymous inline objects.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone, bon::Builder)]
pub struct ObjectType {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub alias: Option<Name>,

    #[serde(default)]
    #[builder(default)]
    pub fields: Vec<ObjectField>,

    #[serde(default = "crate::utils::default_yes")]
    #[builder(default = true)]
    pub instantiable: bool,

    #[serde(default = "crate::utils::default_no")]
    #[builder(default)]
    pub extensible: bool,

    #[serde(default)]
    #[builder(default)]
    pub dsl: TypeDsl,
}

impl ObjectType {
    /// The declarable name of this type: its alias, else the last segment
    /// of its stable id. Anonymous objects have none.
    pub fn name(&self) -> Option<&str> {
        if let Some(alias) = &self.alias {
            return Some(alias.as_str());
        }
        self.id
            .as_deref()
            .map(|id| id.rsplit('.').next().unwrap_or(id))
    }

    /// Stable identity key for catalog and memo lookups. Falls back to a
    /// structural rendering for anonymous objects so that identity is
    /// preserved across serialization boundaries.
    pub fn key(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.to_string();
        }
        if let Some(id) = &self.id {
            return id.clone();
        }
        format!(
            "object({})",
            self.fields
                .iter()
                .map(|f| format!("{}: {}", f.name, f.ty.type_key()))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }

    pub fn field(
        &self,
        name: &str,
    ) -> Option<&ObjectField> {
        self.fields
            .iter()
            .find(|f| f.name.as_str() == name)
    }
}

/// The closed set of metadata type kinds.
///
/// Recursive and cyclic type graphs are expressed through
/// [`MetadataType::Reference`], which points at a named [`ObjectType`] in
/// the owning extension's type catalog.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetadataType {
    String,
    Number,
    Boolean,
    DateTime,
    Binary,

    /// Fully dynamic, untyped content.
    Any,

    Array {
        #[serde(rename = "type")]
        item: Box<MetadataType>,
    },

    Dictionary {
        key: Box<MetadataType>,
        value: Box<MetadataType>,
    },

    Object(ObjectType),

    Reference {
        #[serde(rename = "ref")]
        to: Name,
    },

    Union {
        members: Vec<MetadataType>,
    },
}

impl MetadataType {
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Number | Self::Boolean | Self::DateTime | Self::Binary
        )
    }

    /// True for object definitions and references to them.
    pub fn is_object_like(&self) -> bool {
        matches!(self, Self::Object(..) | Self::Reference { .. })
    }

    /// Stable identity key used by the sub-type and import catalogs and by
    /// the resolver's memo table. Lookup is structural, never by address:
    /// reconstructed instances of the same declared type share a key.
    pub fn type_key(&self) -> String {
        match self {
            Self::Object(obj) => obj.key(),
            Self::Reference { to } => to.to_string(),
            other => other.to_string(),
        }
    }

    pub fn array_of(item: MetadataType) -> Self {
        Self::Array {
            item: Box::new(item),
        }
    }

    pub fn dictionary_of(
        key: MetadataType,
        value: MetadataType,
    ) -> Self {
        Self::Dictionary {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn reference<N: Into<Name>>(to: N) -> Self {
        Self::Reference { to: to.into() }
    }
}

impl Display for MetadataType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::String => "string".to_string(),
                Self::Number => "number".to_string(),
                Self::Boolean => "boolean".to_string(),
                Self::DateTime => "datetime".to_string(),
                Self::Binary => "binary".to_string(),
                Self::Any => "any".to_string(),
                Self::Array { item } => format!("[{item}]"),
                Self::Dictionary { key, value } => format!("map<{key}, {value}>"),
                Self::Object(obj) => {
                    obj.name()
                        .map(str::to_string)
                        .unwrap_or_else(|| obj.key())
                },
                Self::Reference { to } => to.to_string(),
                Self::Union { members } => {
                    members
                        .iter()
                        .map(|m| m.to_string())
                        .collect::<Vec<_>>()
                        .join(" | ")
                },
            }
        )
    }
}

impl From<ObjectType> for MetadataType {
    fn from(value: ObjectType) -> Self {
        Self::Object(value)
    }
}

#[cfg(test)]
mod test {
    use super::{MetadataType, ObjectField, ObjectType};
    use test_case::test_case;

    fn pojo(id: &str) -> ObjectType {
        ObjectType::builder()
            .id(id.to_string())
            .fields(vec![
                ObjectField::builder()
                    .name("name".into())
                    .ty(MetadataType::String)
                    .build(),
            ])
            .build()
    }

    #[test_case(MetadataType::String, "string"; "string")]
    #[test_case(MetadataType::Number, "number"; "number")]
    #[test_case(MetadataType::Boolean, "boolean"; "boolean")]
    #[test_case(MetadataType::DateTime, "datetime"; "datetime")]
    #[test_case(MetadataType::Binary, "binary"; "binary")]
    #[test_case(MetadataType::Any, "any"; "any")]
    #[test_case(MetadataType::array_of(MetadataType::String), "[string]"; "array of string")]
    #[test_case(
        MetadataType::dictionary_of(MetadataType::String, MetadataType::Number),
        "map<string, number>";
        "dictionary"
    )]
    #[test_case(MetadataType::reference("pool"), "pool"; "reference")]
    #[test_case(
        MetadataType::Union {
            members: vec![MetadataType::String, MetadataType::Number],
        },
        "string | number";
        "union"
    )]
    fn display_case(
        input: MetadataType,
        expected: &str,
    ) {
        assert_eq!(input.to_string(), expected);
    }

    #[test]
    fn object_name_prefers_alias() {
        let mut obj = pojo("org.acme.Pool");
        assert_eq!(obj.name(), Some("Pool"));

        obj.alias = Some("pool".into());
        assert_eq!(obj.name(), Some("pool"));
        assert_eq!(obj.key(), "pool");
    }

    #[test]
    fn object_key_falls_back_to_id_then_structure() {
        assert_eq!(pojo("org.acme.Pool").key(), "org.acme.Pool");

        let anon = ObjectType::builder()
            .fields(vec![
                ObjectField::builder()
                    .name("size".into())
                    .ty(MetadataType::Number)
                    .build(),
            ])
            .build();
        assert_eq!(anon.key(), "object(size: number)");
    }

    #[test]
    fn type_key_is_structural() {
        let a = MetadataType::Object(pojo("org.acme.Pool"));
        let b = MetadataType::Object(pojo("org.acme.Pool"));
        assert_eq!(a.type_key(), b.type_key());
        assert_eq!(
            MetadataType::reference("org.acme.Pool").type_key(),
            "org.acme.Pool"
        );
    }
}

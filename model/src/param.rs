use crate::{MetadataType, Name};

/// Whether a parameter's value may, must, or must not be a runtime
/// expression instead of a literal structure.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionSupport {
    NotSupported,

    #[default]
    Supported,

    Required,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParameterRole {
    #[default]
    Behaviour,

    Content,
    PrimaryContent,
}

impl ParameterRole {
    /// Content parameters carry the raw body of their element.
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content | Self::PrimaryContent)
    }
}

/// Per-parameter DSL hints. All of these default to the permissive side;
/// a declaration only mentions the ones it restricts.
#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone, bon::Builder)]
pub struct ParameterDsl {
    #[serde(default = "crate::utils::default_yes")]
    #[builder(default = true)]
    pub allows_inline_definition: bool,

    #[serde(default = "crate::utils::default_yes")]
    #[builder(default = true)]
    pub allows_references: bool,

    /// Render as element text body rather than an attribute.
    #[serde(default = "crate::utils::default_no")]
    #[builder(default)]
    pub is_text: bool,
}

impl Default for ParameterDsl {
    fn default() -> Self {
        Self {
            allows_inline_definition: true,
            allows_references: true,
            is_text: false,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Clone, bon::Builder)]
pub struct ParameterModel {
    pub name: Name,

    #[serde(rename = "type")]
    pub ty: MetadataType,

    #[serde(default)]
    #[builder(default)]
    pub expression_support: ExpressionSupport,

    #[serde(default)]
    #[builder(default)]
    pub role: ParameterRole,

    #[serde(default)]
    #[builder(default)]
    pub dsl: ParameterDsl,
}

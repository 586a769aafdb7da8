#![allow(clippy::result_large_err)]

pub mod context;
pub mod extension;
pub mod param;
pub mod ty;
pub(crate) mod utils;

pub use context::*;
pub use extension::*;
pub use param::*;
pub use ty::*;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("toml error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{tag} '{name}' already exists in extension '{extension}'")]
    DuplicateName {
        name: Name,
        tag: &'static str,
        extension: Name,
    },

    #[error("[{src}] {error}")]
    SourceFile { error: Box<Self>, src: String },
}

impl Error {
    pub fn with_source(
        self,
        src: String,
    ) -> Self {
        Self::SourceFile {
            error: Box::new(self),
            src,
        }
    }

    pub fn with_source_init(src: String) -> impl FnOnce(Self) -> Self {
        |err| err.with_source(src)
    }

    pub fn from_with_source_init<E: Into<Self>>(src: String) -> impl FnOnce(E) -> Self {
        |err| Self::with_source_init(src)(err.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// SPDX-License-Identifier: MIT
//! Protocol Buffers schema loading
//!
//! Compiles a `.proto` file with `protox` and exposes its message
//! descriptors (`prost-reflect`) so a schema-driven codec can check that the
//! file it is given describes the wire types it was compiled with, and
//! verify datasets against it.
//!
//! The file is compiled on its own: imports are not resolved, and only
//! `proto3` files are accepted.

use std::path::{Path, PathBuf};

use prost_reflect::{DescriptorPool, FileDescriptor, MessageDescriptor, Syntax};
use protox::file::{File, FileResolver};
use tracing::{debug, info};

/// File name used when compiling source text that did not come from disk
const INLINE_FILE_NAME: &str = "schema.proto";

/// Errors that can occur while loading or binding a schema
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compile schema {file}: {source}")]
    Compile {
        file: String,
        #[source]
        source: protox::Error,
    },

    #[error("unsupported schema {file}: {reason}")]
    Unsupported { file: String, reason: String },

    #[error("message type not found: {0}")]
    TypeNotFound(String),

    #[error("schema mismatch in message {message}: {reason}")]
    Mismatch { message: String, reason: String },
}

impl SchemaError {
    pub(crate) fn mismatch(message: &str, reason: impl Into<String>) -> Self {
        SchemaError::Mismatch {
            message: message.to_string(),
            reason: reason.into(),
        }
    }
}

/// Serves one in-memory file to the compiler
struct SingleFileResolver {
    name: String,
    source: String,
}

impl FileResolver for SingleFileResolver {
    fn resolve_path(&self, path: &Path) -> Option<String> {
        (path == Path::new(&self.name)).then(|| self.name.clone())
    }

    fn open_file(&self, name: &str) -> Result<File, protox::Error> {
        if name == self.name {
            File::from_source(name, &self.source)
        } else {
            Err(protox::Error::file_not_found(name))
        }
    }
}

/// A compiled `.proto` file
#[derive(Debug, Clone)]
pub struct Schema {
    pool: DescriptorPool,
    file: FileDescriptor,
}

impl Schema {
    /// Load and compile a schema file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| INLINE_FILE_NAME.to_string());
        let schema = Self::compile(name, source)?;
        info!(
            path = %path.display(),
            messages = schema.messages().count(),
            "Schema loaded"
        );
        Ok(schema)
    }

    /// Compile schema source text
    pub fn parse(source: &str) -> Result<Self, SchemaError> {
        Self::compile(INLINE_FILE_NAME.to_string(), source.to_string())
    }

    fn compile(name: String, source: String) -> Result<Self, SchemaError> {
        let mut compiler = protox::Compiler::with_file_resolver(SingleFileResolver {
            name: name.clone(),
            source,
        });
        compiler
            .open_file(&name)
            .map_err(|source| SchemaError::Compile {
                file: name.clone(),
                source,
            })?;

        let pool = compiler.descriptor_pool();
        let file = pool
            .get_file_by_name(&name)
            .ok_or_else(|| SchemaError::Unsupported {
                file: name.clone(),
                reason: "compiled file missing from the descriptor pool".to_string(),
            })?;

        if !matches!(file.syntax(), Syntax::Proto3) {
            return Err(SchemaError::Unsupported {
                file: name,
                reason: "only proto3 schemas are supported".to_string(),
            });
        }

        debug!(file = %name, package = file.package_name(), "Schema compiled");
        Ok(Self { pool, file })
    }

    /// Declared package, if any
    pub fn package(&self) -> Option<&str> {
        Some(self.file.package_name()).filter(|package| !package.is_empty())
    }

    /// Top-level messages in declaration order
    pub fn messages(&self) -> impl Iterator<Item = MessageDescriptor> + '_ {
        self.file.messages()
    }

    /// Find a message by name, unqualified or package-qualified
    pub fn lookup_type(&self, name: &str) -> Result<MessageDescriptor, SchemaError> {
        let qualified = match self.package() {
            Some(package) if !name.starts_with(&format!("{package}.")) => {
                format!("{package}.{name}")
            }
            _ => name.to_string(),
        };

        self.pool
            .get_message_by_name(&qualified)
            .ok_or_else(|| SchemaError::TypeNotFound(name.to_string()))
    }
}

//! Descriptor documents
//!
//! A document describes a registry in TOML, one table per type, keyed by a
//! name local to the document. References between entries use those keys, so
//! self-referential named types can be written down directly:
//!
//! ```toml
//! render = ["node_ptr"]
//!
//! [types.node]
//! kind = "named"
//! scope = "example.com/list"
//! name = "Node"
//! underlying = "node_body"
//!
//! [types.node_body]
//! kind = "struct"
//! fields = [{ name = "next", type = "node_ptr" }]
//!
//! [types.node_ptr]
//! kind = "pointer"
//! elem = "node"
//! ```
//!
//! Loading checks everything the stringifier assumes: references resolve,
//! named kinds carry a name and generics at least one argument, anonymous
//! types do not contain themselves, nesting stays within [`LoaderLimits`].

mod error;
mod loader;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::descriptor::ChanDir;
use crate::limits::LoaderLimits;

pub use error::DocumentError;
pub use loader::LoadedDocument;

/// Parsed descriptor document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Keys rendered by default; every entry when empty
    #[serde(default)]
    pub render: Vec<String>,
    #[serde(default)]
    pub types: BTreeMap<String, TypeEntry>,
}

/// One type of a document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeEntry {
    Primitive {
        name: String,
    },
    Named {
        scope: String,
        name: String,
        underlying: Option<String>,
        local: Option<String>,
    },
    Generic {
        scope: String,
        name: String,
        #[serde(default)]
        args: Vec<String>,
        underlying: Option<String>,
        local: Option<String>,
    },
    Pointer {
        elem: String,
    },
    Slice {
        elem: String,
    },
    Array {
        len: u64,
        elem: String,
    },
    Map {
        key: String,
        value: String,
    },
    Chan {
        #[serde(default)]
        dir: ChanDirEntry,
        elem: String,
    },
    Func {
        #[serde(default)]
        params: Vec<String>,
        #[serde(default)]
        variadic: bool,
        #[serde(default)]
        results: Vec<String>,
    },
    Struct {
        #[serde(default)]
        fields: Vec<FieldEntry>,
    },
    Interface {
        #[serde(default)]
        methods: Vec<MethodEntry>,
    },
    EmptyInterface,
    Opaque {
        text: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDirEntry {
    #[default]
    Both,
    Send,
    Recv,
}

impl From<ChanDirEntry> for ChanDir {
    fn from(dir: ChanDirEntry) -> Self {
        match dir {
            ChanDirEntry::Both => ChanDir::BOTH,
            ChanDirEntry::Send => ChanDir::SEND,
            ChanDirEntry::Recv => ChanDir::RECV,
        }
    }
}

/// Struct field; a missing name marks an embedded field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodEntry {
    pub name: String,
    pub signature: String,
}

impl TypeEntry {
    /// Keys this entry renders through, in rendering order
    ///
    /// The underlying type of a named entry is not included.
    pub fn references(&self) -> Vec<&str> {
        match self {
            TypeEntry::Primitive { .. }
            | TypeEntry::Named { .. }
            | TypeEntry::Interface { .. }
            | TypeEntry::EmptyInterface
            | TypeEntry::Opaque { .. } => Vec::new(),
            TypeEntry::Generic { args, .. } => args.iter().map(String::as_str).collect(),
            TypeEntry::Pointer { elem }
            | TypeEntry::Slice { elem }
            | TypeEntry::Array { elem, .. }
            | TypeEntry::Chan { elem, .. } => vec![elem.as_str()],
            TypeEntry::Map { key, value } => vec![key.as_str(), value.as_str()],
            TypeEntry::Func {
                params, results, ..
            } => params.iter().chain(results).map(String::as_str).collect(),
            TypeEntry::Struct { fields } => fields.iter().map(|f| f.ty.as_str()).collect(),
        }
    }

    /// Key of the underlying type of a named entry
    pub fn underlying(&self) -> Option<&str> {
        match self {
            TypeEntry::Named { underlying, .. } | TypeEntry::Generic { underlying, .. } => {
                underlying.as_deref()
            }
            _ => None,
        }
    }

    /// Names, scopes and tokens carried by this entry, for length checks
    fn identifiers(&self) -> Vec<&str> {
        match self {
            TypeEntry::Primitive { name } => vec![name.as_str()],
            TypeEntry::Named {
                scope, name, local, ..
            }
            | TypeEntry::Generic {
                scope, name, local, ..
            } => {
                let mut out = vec![scope.as_str(), name.as_str()];
                out.extend(local.as_deref());
                out
            }
            TypeEntry::Struct { fields } => fields.iter().filter_map(|f| f.name.as_deref()).collect(),
            TypeEntry::Interface { methods } => methods.iter().map(|m| m.name.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl Document {
    /// Parses a document from TOML source
    pub fn parse(source: &str, limits: &LoaderLimits) -> Result<Self, DocumentError> {
        if source.len() > limits.max_input_size {
            return Err(DocumentError::InputTooLarge {
                size: source.len(),
                limit: limits.max_input_size,
            });
        }

        let document: Document = toml::from_str(source)?;

        if document.types.len() > limits.max_type_count {
            return Err(DocumentError::TooManyTypes {
                count: document.types.len(),
                limit: limits.max_type_count,
            });
        }

        log::debug!("parsed document with {} types", document.types.len());
        Ok(document)
    }

    /// Reads and parses a document file
    pub fn from_path<P: AsRef<Path>>(path: P, limits: &LoaderLimits) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source, limits)
    }

    /// Builds a registry from the document
    pub fn load(&self, limits: &LoaderLimits) -> Result<LoadedDocument, DocumentError> {
        loader::load(self, limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_kinds() {
        let source = r#"
[types.int]
kind = "primitive"
name = "int"

[types.t]
kind = "named"
scope = "pkg"
name = "T"
local = "·1"

[types.box_int]
kind = "generic"
scope = "pkg"
name = "Box"
args = ["int"]

[types.arr]
kind = "array"
len = 3
elem = "int"

[types.ch]
kind = "chan"
dir = "recv"
elem = "int"

[types.f]
kind = "func"
params = ["int"]
variadic = true

[types.s]
kind = "struct"
fields = [{ name = "a", type = "int" }, { type = "t" }]

[types.i]
kind = "interface"
methods = [{ name = "Do", signature = "() string" }]

[types.any]
kind = "empty_interface"

[types.raw]
kind = "opaque"
text = "unsafe.Pointer"
"#;
        let document = Document::parse(source, &LoaderLimits::default()).unwrap();

        assert_eq!(document.types.len(), 10);
        assert!(document.render.is_empty());
        assert_eq!(
            document.types["ch"],
            TypeEntry::Chan {
                dir: ChanDirEntry::Recv,
                elem: "int".to_string()
            }
        );
        assert_eq!(
            document.types["s"],
            TypeEntry::Struct {
                fields: vec![
                    FieldEntry {
                        name: Some("a".to_string()),
                        ty: "int".to_string()
                    },
                    FieldEntry {
                        name: None,
                        ty: "t".to_string()
                    },
                ]
            }
        );
        assert_eq!(document.types["any"], TypeEntry::EmptyInterface);
    }

    #[test]
    fn test_chan_dir_defaults_to_both() {
        let source = r#"
[types.ch]
kind = "chan"
elem = "x"
"#;
        let document = Document::parse(source, &LoaderLimits::default()).unwrap();
        assert_eq!(
            document.types["ch"],
            TypeEntry::Chan {
                dir: ChanDirEntry::Both,
                elem: "x".to_string()
            }
        );
        assert_eq!(ChanDir::from(ChanDirEntry::Both), ChanDir::BOTH);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let source = r#"
[types.x]
kind = "tuple"
"#;
        let result = Document::parse(source, &LoaderLimits::default());
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_input_too_large() {
        let limits = LoaderLimits {
            max_input_size: 8,
            ..LoaderLimits::default()
        };
        let result = Document::parse("render = []\n", &limits);
        assert!(matches!(
            result,
            Err(DocumentError::InputTooLarge { size: 12, limit: 8 })
        ));
    }

    #[test]
    fn test_too_many_types() {
        let limits = LoaderLimits {
            max_type_count: 1,
            ..LoaderLimits::default()
        };
        let source = r#"
[types.a]
kind = "empty_interface"

[types.b]
kind = "empty_interface"
"#;
        let result = Document::parse(source, &limits);
        assert!(matches!(
            result,
            Err(DocumentError::TooManyTypes { count: 2, limit: 1 })
        ));
    }

    #[test]
    fn test_references_exclude_underlying() {
        let entry = TypeEntry::Named {
            scope: "pkg".to_string(),
            name: "T".to_string(),
            underlying: Some("body".to_string()),
            local: None,
        };
        assert!(entry.references().is_empty());
        assert_eq!(entry.underlying(), Some("body"));

        let func = TypeEntry::Func {
            params: vec!["a".to_string(), "b".to_string()],
            variadic: false,
            results: vec!["c".to_string()],
        };
        assert_eq!(func.references(), vec!["a", "b", "c"]);
        assert_eq!(func.underlying(), None);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Document::from_path(dir.path().join("missing.toml"), &LoaderLimits::default());
        assert!(matches!(result, Err(DocumentError::Read { .. })));
    }
}

//! Canonical type strings from type descriptors
//!
//! A descriptor graph lives in a [`TypeRegistry`]; [`stringify`] turns any
//! handle into a deterministic string in declaration syntax, suitable as a
//! registry key or in log and error messages:
//!
//! ```
//! use typestring::{ChanDir, TypeRegistry, stringify};
//!
//! let mut registry = TypeRegistry::new();
//! let t = registry.named("pkg", "T");
//! let bool_ty = registry.primitive("bool");
//! let func = registry.func(vec![t], true, vec![bool_ty]);
//! let chan = registry.chan(ChanDir::BOTH, func);
//!
//! assert_eq!(stringify(&registry, chan), "chan func(...pkg.T) bool");
//! ```
//!
//! Rust types describe themselves through [`Describe`]:
//!
//! ```
//! use std::collections::HashMap;
//!
//! assert_eq!(typestring::type_string::<&[HashMap<String, i64>]>(), "*[]map[string]int64");
//! ```

pub mod describe;
pub mod descriptor;
pub mod document;
pub mod entry;
pub mod limits;
pub mod registry;
pub mod string_storage;
pub mod stringify;

pub use describe::Describe;
pub use descriptor::{ChanDir, TypeDescriptor, TypeId};
pub use entry::{descriptor_string, type_string, value_type_string};
pub use registry::TypeRegistry;
pub use stringify::{EMPTY_INTERFACE, stringify, underlying_string};

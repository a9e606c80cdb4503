//! Entry points
//!
//! Thin adapters that obtain a descriptor and hand it to the stringifier:
//! from a static type, from a value, or from a handle the caller already holds.

use crate::describe::Describe;
use crate::descriptor::TypeId;
use crate::registry::TypeRegistry;
use crate::stringify::{EMPTY_INTERFACE, stringify};

/// Type string of `T`, resolved from static type information alone
///
/// ```
/// assert_eq!(typestring::type_string::<Vec<&i64>>(), "[]*int64");
/// ```
pub fn type_string<T: Describe + ?Sized>() -> String {
    let mut registry = TypeRegistry::new();
    let type_id = T::describe(&mut registry);
    stringify(&registry, type_id)
}

/// Type string of a value's type
///
/// A value only known as `dyn Any` has no further type information, so it
/// renders as `interface {}`.
///
/// ```
/// use std::any::Any;
///
/// let boxed: Box<dyn Any> = Box::new(42u8);
/// assert_eq!(typestring::value_type_string(&*boxed), "interface {}");
/// assert_eq!(typestring::value_type_string(&1.5f64), "float64");
/// ```
pub fn value_type_string<T: Describe + ?Sized>(_value: &T) -> String {
    type_string::<T>()
}

/// Type string of a descriptor handle
///
/// An absent handle stands for an interface holding no concrete value and
/// renders as `interface {}`.
pub fn descriptor_string(registry: &TypeRegistry, handle: Option<TypeId>) -> String {
    match handle {
        Some(type_id) => stringify(registry, type_id),
        None => EMPTY_INTERFACE.to_string(),
    }
}

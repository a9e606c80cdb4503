//! Static type introspection for Rust types
//!
//! [`Describe`] plays the part of the host's type-introspection facility: it
//! builds the descriptor of a Rust type inside a [`TypeRegistry`] without
//! needing a value.
//!
//! | Rust type | Descriptor |
//! |---|---|
//! | `bool`, `String`, `str` | `bool`, `string` |
//! | `i8`..`i64`, `isize` | `int8`..`int64`, `int` |
//! | `u8`..`u64`, `usize` | `uint8`..`uint64`, `uint` |
//! | `f32`, `f64`, `char` | `float32`, `float64`, `int32` |
//! | `()` | `struct {}` |
//! | `&T`, `&mut T`, `*const T`, `*mut T`, `Box<T>`, `Rc<T>`, `Arc<T>` | `*T` |
//! | `Vec<T>`, `VecDeque<T>`, `[T]` | `[]T` |
//! | `[T; N]` | `[N]T` |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | `map[K]V` |
//! | `HashSet<T>`, `BTreeSet<T>` | `map[T]struct {}` |
//! | `mpsc::Sender<T>`, `mpsc::SyncSender<T>` / `mpsc::Receiver<T>` | `chan<- T` / `<-chan T` |
//! | `fn(A, ..) -> R` | `func(A, ..) R`, no result for `()` |
//! | `dyn Any` | `interface {}` |
//! | `dyn Error` | `error` |
//!
//! User types opt in with [`describe_named!`](crate::describe_named).

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::error::Error;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};

use crate::descriptor::{ChanDir, TypeId};
use crate::registry::TypeRegistry;

/// Types whose descriptor can be built from static type information alone
pub trait Describe {
    /// Builds the descriptor of `Self` in `registry`
    fn describe(registry: &mut TypeRegistry) -> TypeId;

    /// Descriptors of `Self` used as a function's return type
    ///
    /// `()` returns no results.
    fn describe_results(registry: &mut TypeRegistry) -> Vec<TypeId> {
        vec![Self::describe(registry)]
    }
}

/// Implements [`Describe`] for a user type as a named descriptor
///
/// The scope defaults to the module path of the invocation.
///
/// ```
/// use typestring::{describe_named, type_string};
///
/// struct Config;
/// describe_named!(Config, "example.com/app");
///
/// assert_eq!(type_string::<Vec<&Config>>(), "[]*example.com/app.Config");
/// ```
#[macro_export]
macro_rules! describe_named {
    ($ty:ident) => {
        $crate::describe_named!($ty, ::core::module_path!());
    };
    ($ty:ident, $scope:expr) => {
        impl $crate::describe::Describe for $ty {
            fn describe(
                registry: &mut $crate::registry::TypeRegistry,
            ) -> $crate::descriptor::TypeId {
                registry.named($scope, ::core::stringify!($ty))
            }
        }
    };
}

macro_rules! describe_primitive {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(registry: &mut TypeRegistry) -> TypeId {
                    registry.primitive($name)
                }
            }
        )*
    };
}

describe_primitive! {
    bool => "bool",
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    isize => "int",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    usize => "uint",
    f32 => "float32",
    f64 => "float64",
    char => "int32",
    String => "string",
    str => "string",
}

impl Describe for () {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        registry.struct_type(&[])
    }

    fn describe_results(_registry: &mut TypeRegistry) -> Vec<TypeId> {
        Vec::new()
    }
}

// ========== Sentinels ==========

macro_rules! describe_sentinel {
    ($($ty:ty => $method:ident $(($arg:literal))?),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(registry: &mut TypeRegistry) -> TypeId {
                    registry.$method($($arg)?)
                }
            }
        )*
    };
}

describe_sentinel! {
    dyn Any => empty_interface,
    dyn Any + Send => empty_interface,
    dyn Any + Send + Sync => empty_interface,
    dyn Error => primitive("error"),
    dyn Error + Send => primitive("error"),
    dyn Error + Send + Sync => primitive("error"),
}

// ========== Pointers ==========

macro_rules! describe_pointer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ty {
                fn describe(registry: &mut TypeRegistry) -> TypeId {
                    let elem = T::describe(registry);
                    registry.pointer(elem)
                }
            }
        )*
    };
}

describe_pointer!(&T, &mut T, *const T, *mut T, Box<T>, Rc<T>, Arc<T>);

// ========== Sequences ==========

impl<T: Describe> Describe for Vec<T> {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        let elem = T::describe(registry);
        registry.slice(elem)
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        let elem = T::describe(registry);
        registry.slice(elem)
    }
}

impl<T: Describe> Describe for [T] {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        let elem = T::describe(registry);
        registry.slice(elem)
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        let elem = T::describe(registry);
        registry.array(N as u64, elem)
    }
}

// ========== Maps and sets ==========

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        let key = K::describe(registry);
        let value = V::describe(registry);
        registry.map(key, value)
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        let key = K::describe(registry);
        let value = V::describe(registry);
        registry.map(key, value)
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        set_of::<T>(registry)
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        set_of::<T>(registry)
    }
}

fn set_of<T: Describe>(registry: &mut TypeRegistry) -> TypeId {
    let key = T::describe(registry);
    let unit = registry.struct_type(&[]);
    registry.map(key, unit)
}

// ========== Channels ==========

impl<T: Describe> Describe for Sender<T> {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        let elem = T::describe(registry);
        registry.chan(ChanDir::SEND, elem)
    }
}

impl<T: Describe> Describe for SyncSender<T> {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        let elem = T::describe(registry);
        registry.chan(ChanDir::SEND, elem)
    }
}

impl<T: Describe> Describe for Receiver<T> {
    fn describe(registry: &mut TypeRegistry) -> TypeId {
        let elem = T::describe(registry);
        registry.chan(ChanDir::RECV, elem)
    }
}

// ========== Function pointers ==========

macro_rules! describe_fn {
    ($($param:ident),*) => {
        impl<R: Describe, $($param: Describe),*> Describe for fn($($param),*) -> R {
            fn describe(registry: &mut TypeRegistry) -> TypeId {
                let params = vec![$($param::describe(registry)),*];
                let results = R::describe_results(registry);
                registry.func(params, false, results)
            }
        }
    };
}

describe_fn!();
describe_fn!(A);
describe_fn!(A, B);
describe_fn!(A, B, C);
describe_fn!(A, B, C, D);
describe_fn!(A, B, C, D, E);
describe_fn!(A, B, C, D, E, F);

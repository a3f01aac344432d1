//! Priority-ordered converter registry
//!
//! Each target type has at most one *active* converter: the registration
//! with the highest priority, where a later registration beats an earlier
//! one of equal priority. The active table is an immutable snapshot swapped
//! in whole on every registration.

use crate::types::{BoxError, ConvertError};
use arc_swap::ArcSwap;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info};

/// Priority of the converters installed by [`ConverterRegistry::with_builtins`].
pub const BUILTIN_PRIORITY: i32 = 1;

/// Priority suggested for user converters; outranks every built-in.
pub const DEFAULT_PRIORITY: i32 = 100;

/// `Ok(Some(v))` converted, `Ok(None)` declined, `Err(_)` failed.
pub type ConvertResult<T> = Result<Option<T>, BoxError>;

/// A conversion from a raw property string to `T`.
///
/// Implemented for every `Fn(&str) -> ConvertResult<T>`.
pub trait Converter<T>: Send + Sync + 'static {
    fn convert(&self, raw: &str) -> ConvertResult<T>;
}

impl<T, F> Converter<T> for F
where
    F: Fn(&str) -> ConvertResult<T> + Send + Sync + 'static,
{
    fn convert(&self, raw: &str) -> ConvertResult<T> {
        self(raw)
    }
}

/// Identifies a conversion target type.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl std::hash::Hash for TypeDescriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type ErasedFn = dyn Fn(&str) -> Result<Option<Box<dyn Any + Send>>, BoxError> + Send + Sync;

#[derive(Clone)]
struct Registration {
    descriptor: TypeDescriptor,
    priority: i32,
    seq: u64,
    func: Arc<ErasedFn>,
}

/// Diagnostic view of one registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterInfo {
    pub type_name: &'static str,
    pub priority: i32,
    pub active: bool,
}

#[derive(Clone, Default)]
struct RegistrySnapshot {
    active: HashMap<TypeDescriptor, Registration>,
    all: Vec<Registration>,
    next_seq: u64,
}

pub struct ConverterRegistry {
    snap: ArcSwap<RegistrySnapshot>,
}

impl ConverterRegistry {
    /// Registry with no converters at all.
    pub fn new() -> Self {
        Self {
            snap: ArcSwap::from_pointee(RegistrySnapshot::default()),
        }
    }

    /// Registry preloaded with the built-in scalar converters.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        super::builtin::register_builtins(&registry);
        info!("Registered {} built-in converters", registry.len());
        registry
    }

    /// Register a converter for `T` at `priority`.
    ///
    /// Returns true if it became the active converter for `T`.
    pub fn register<T, F>(&self, priority: i32, converter: F) -> bool
    where
        T: Send + 'static,
        F: Fn(&str) -> ConvertResult<T> + Send + Sync + 'static,
    {
        self.register_converter::<T, F>(priority, converter)
    }

    /// Like [`register`](Self::register), for any [`Converter`] implementation.
    pub fn register_converter<T, C>(&self, priority: i32, converter: C) -> bool
    where
        T: Send + 'static,
        C: Converter<T>,
    {
        let converter = Arc::new(converter);
        let func: Arc<ErasedFn> = Arc::new(move |raw: &str| {
            converter
                .convert(raw)
                .map(|value| value.map(|v| Box::new(v) as Box<dyn Any + Send>))
        });
        let descriptor = TypeDescriptor::of::<T>();

        loop {
            let cur = self.snap.load_full();
            let mut next = (*cur).clone();

            let registration = Registration {
                descriptor,
                priority,
                seq: next.next_seq,
                func: Arc::clone(&func),
            };
            next.next_seq += 1;

            let activated = match next.active.get(&descriptor) {
                Some(existing) => priority >= existing.priority,
                None => true,
            };
            if activated {
                next.active.insert(descriptor, registration.clone());
            }
            next.all.push(registration);

            let prev = self.snap.compare_and_swap(&cur, Arc::new(next));
            if Arc::ptr_eq(&prev, &cur) {
                debug!(
                    "Registered converter for {} at priority {} (active: {})",
                    descriptor.name, priority, activated
                );
                return activated;
            }
        }
    }

    /// The converter currently active for `T`, if any.
    pub fn active<T: 'static>(&self) -> Option<ActiveConverter<T>> {
        let snap = self.snap.load();
        snap.active
            .get(&TypeDescriptor::of::<T>())
            .map(|reg| ActiveConverter {
                func: Arc::clone(&reg.func),
                priority: reg.priority,
                _marker: PhantomData,
            })
    }

    pub fn supports<T: 'static>(&self) -> bool {
        self.snap.load().active.contains_key(&TypeDescriptor::of::<T>())
    }

    /// Convert a scalar with the active converter for `T`.
    pub fn convert<T: 'static>(&self, raw: &str) -> Result<T, ConvertError> {
        self.active::<T>()
            .ok_or(ConvertError::Unsupported(type_name::<T>()))?
            .convert(raw)
    }

    /// Every registration in registration order.
    pub fn registrations(&self) -> Vec<ConverterInfo> {
        let snap = self.snap.load();
        snap.all
            .iter()
            .map(|reg| ConverterInfo {
                type_name: reg.descriptor.name,
                priority: reg.priority,
                active: snap
                    .active
                    .get(&reg.descriptor)
                    .map_or(false, |active| active.seq == reg.seq),
            })
            .collect()
    }

    /// Number of types with an active converter.
    pub fn len(&self) -> usize {
        self.snap.load().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Typed handle to the converter that was active when it was fetched.
pub struct ActiveConverter<T> {
    func: Arc<ErasedFn>,
    priority: i32,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> ActiveConverter<T> {
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn convert(&self, raw: &str) -> Result<T, ConvertError> {
        match (self.func)(raw) {
            Ok(Some(value)) => value.downcast::<T>().map(|v| *v).map_err(|_| {
                ConvertError::Failed(format!("converter did not produce {}", type_name::<T>()).into())
            }),
            Ok(None) => Err(ConvertError::Declined),
            Err(e) => Err(ConvertError::Failed(e)),
        }
    }
}

//! Type conversion of raw property strings
//!
//! Converters are keyed by target type. Lists are produced by splitting the
//! raw string on unescaped commas and converting each part with the scalar
//! converter of the element type.

mod builtin;
mod registry;
mod split;

pub use registry::{
    ActiveConverter, ConvertResult, Converter, ConverterInfo, ConverterRegistry, TypeDescriptor,
    BUILTIN_PRIORITY, DEFAULT_PRIORITY,
};
pub use split::split_escaped;

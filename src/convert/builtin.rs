//! Built-in scalar converters

use crate::convert::{ConvertResult, ConverterRegistry, BUILTIN_PRIORITY};
use std::path::PathBuf;
use std::str::FromStr;

pub(crate) fn register_builtins(registry: &ConverterRegistry) {
    registry.register(BUILTIN_PRIORITY, |raw: &str| Ok(Some(raw.to_string())));
    registry.register(BUILTIN_PRIORITY, parse_bool);
    registry.register(BUILTIN_PRIORITY, |raw: &str| Ok(Some(PathBuf::from(raw))));
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<char>);

    registry.register(BUILTIN_PRIORITY, parse_trimmed::<i8>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<i16>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<i32>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<i64>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<i128>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<isize>);

    registry.register(BUILTIN_PRIORITY, parse_trimmed::<u8>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<u16>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<u32>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<u64>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<u128>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<usize>);

    registry.register(BUILTIN_PRIORITY, parse_trimmed::<f32>);
    registry.register(BUILTIN_PRIORITY, parse_trimmed::<f64>);
}

fn parse_trimmed<T>(raw: &str) -> ConvertResult<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim().parse::<T>().map(Some).map_err(Into::into)
}

/// Unrecognized spellings are declined rather than read as false.
fn parse_bool(raw: &str) -> ConvertResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "y" | "1" => Ok(Some(true)),
        "false" | "no" | "off" | "n" | "0" => Ok(Some(false)),
        _ => Ok(None),
    }
}

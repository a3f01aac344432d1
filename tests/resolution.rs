use livecfg::{
    BoxError, Config, ConfigBuilder, ConfigError, ConfigSource, ConvertResult, MapSource,
    CONFIG_ORDINAL, DEFAULT_ORDINAL,
};
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread;

fn layered_config() -> Config {
    ConfigBuilder::new()
        .with_source(MapSource::new(
            "defaults",
            [
                ("mp-1", "mp-value-1"),
                ("mp-2", "mp-value-2"),
                ("app.storageEnabled", "false"),
                ("mp-array", "a,b,c"),
                ("mp-list.0", "1"),
                ("mp-list.1", "2"),
                ("mp-list.2", "3"),
            ],
        ))
        .with_source(MapSource::new(
            "overrides",
            [("app.storageEnabled", "true"), (CONFIG_ORDINAL, "1000")],
        ))
        .build()
        .unwrap()
}

/// Single-key source whose value changes behind the engine's back.
struct MutableSource {
    value: RwLock<String>,
}

impl MutableSource {
    fn new(initial: &str) -> Self {
        Self {
            value: RwLock::new(initial.to_string()),
        }
    }

    fn set(&self, value: &str) {
        *self.value.write() = value.to_string();
    }
}

impl ConfigSource for MutableSource {
    fn name(&self) -> &str {
        "mutable"
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, BoxError> {
        if key == "key" {
            Ok(Some(self.value.read().clone()))
        } else {
            Ok(None)
        }
    }
}

#[derive(Debug, PartialEq)]
struct Pizza {
    flavor: String,
    size: String,
}

impl Pizza {
    fn new(flavor: &str, size: &str) -> Self {
        Self {
            flavor: flavor.to_string(),
            size: size.to_string(),
        }
    }
}

fn parse_pizza(raw: &str) -> ConvertResult<Pizza> {
    let parts: Vec<&str> = raw.split(':').collect();
    if let [size, flavor] = parts.as_slice() {
        Ok(Some(Pizza::new(flavor, size)))
    } else {
        Ok(None)
    }
}

#[test]
fn test_config_sources_ordered_by_ordinal() {
    let config = layered_config();
    let sources = config.config_sources();

    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].name(), "overrides");
    assert_eq!(sources[0].ordinal(), 1000);
    assert_eq!(sources[1].ordinal(), DEFAULT_ORDINAL);

    assert_eq!(
        sources[0].try_get("app.storageEnabled").unwrap().as_deref(),
        Some("true")
    );
    assert_eq!(sources[1].try_get("mp-1").unwrap().as_deref(), Some("mp-value-1"));
    assert_eq!(
        sources[1].try_get("app.storageEnabled").unwrap().as_deref(),
        Some("false")
    );
}

#[test]
fn test_optional_value() {
    let config = layered_config();
    assert_eq!(
        config.get_optional_value::<bool>("app.storageEnabled").unwrap(),
        Some(true)
    );
    assert_eq!(
        config.get_optional_value::<String>("mp-1").unwrap(),
        Some("mp-value-1".to_string())
    );
}

#[test]
fn test_string_array() {
    let config = layered_config();
    assert_eq!(config.get_values::<String>("mp-array").unwrap(), ["a", "b", "c"]);
}

#[test]
fn test_int_array_from_indexed_keys() {
    let config = layered_config();
    assert_eq!(config.get_values::<i32>("mp-list").unwrap(), [1, 2, 3]);
}

#[test]
fn test_mutable_source_is_read_live() {
    let mutable = Arc::new(MutableSource::new("initial"));
    let config = ConfigBuilder::new()
        .with_shared_source(mutable.clone())
        .build()
        .unwrap();

    assert_eq!(config.get_value::<String>("key").unwrap(), "initial");

    mutable.set("updated");
    assert_eq!(config.get_value::<String>("key").unwrap(), "updated");
}

#[test]
fn test_custom_converter_with_escaped_commas() {
    let source = Arc::new(MutableSource::new(
        r"large:cheese\,mushroom,medium:chicken,small:pepperoni",
    ));
    let config = ConfigBuilder::new()
        .with_converter(10, parse_pizza)
        .with_shared_source(source)
        .build()
        .unwrap();

    let pizzas = config.get_values::<Pizza>("key").unwrap();
    assert_eq!(
        pizzas,
        vec![
            Pizza::new("cheese,mushroom", "large"),
            Pizza::new("chicken", "medium"),
            Pizza::new("pepperoni", "small"),
        ]
    );
}

#[test]
fn test_declined_part_fails_whole_list() {
    let config = ConfigBuilder::new()
        .with_converter(10, parse_pizza)
        .with_source(MapSource::new("menu", [("order", "large:ham,broken")]))
        .build()
        .unwrap();

    match config.get_optional_values::<Pizza>("order") {
        Err(ConfigError::Conversion {
            raw, source_name, ..
        }) => {
            assert_eq!(raw, "broken");
            assert_eq!(source_name, "menu");
        }
        other => panic!("expected conversion failure, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_override_builtin_converter() {
    let config = ConfigBuilder::new()
        .with_source(MapSource::new("m", [("n", "0x1f"), ("list", "0x1,0x2")]))
        .with_converter(100, |raw: &str| {
            let hex = raw.trim().trim_start_matches("0x");
            Ok(Some(i64::from_str_radix(hex, 16)?))
        })
        .build()
        .unwrap();

    assert_eq!(config.get_value::<i64>("n").unwrap(), 31);
    assert_eq!(config.get_values::<i64>("list").unwrap(), [1, 2]);
    // Other integer widths keep the built-in behavior.
    assert!(config.get_value::<i32>("n").is_err());
}

#[test]
fn test_runtime_converter_registration() {
    let config = ConfigBuilder::new()
        .with_source(MapSource::new("m", [("flag", "enabled")]))
        .build()
        .unwrap();

    assert!(matches!(
        config.get_value::<bool>("flag"),
        Err(ConfigError::Conversion { .. })
    ));

    config.register_converter(50, |raw: &str| Ok(Some(raw == "enabled")));
    assert!(config.get_value::<bool>("flag").unwrap());
}

#[test]
fn test_absence_vs_conversion_failure() {
    let config = ConfigBuilder::new()
        .with_source(MapSource::new("m", [("port", "eighty")]))
        .build()
        .unwrap();

    assert_eq!(config.get_optional_value::<u16>("missing").unwrap(), None);
    assert!(matches!(
        config.get_value::<u16>("missing"),
        Err(ConfigError::NotFound { .. })
    ));
    assert!(matches!(
        config.get_optional_value::<u16>("port"),
        Err(ConfigError::Conversion { .. })
    ));
}

#[test]
fn test_repeated_lookups_are_stable() {
    let config = layered_config();
    let first: Vec<String> = config.get_values("mp-array").unwrap();
    for _ in 0..10 {
        assert_eq!(config.get_values::<String>("mp-array").unwrap(), first);
        assert!(config.get_value::<bool>("app.storageEnabled").unwrap());
    }
}

#[test]
fn test_concurrent_lookups_with_mutation() {
    let source = Arc::new(MapSource::new("live", [("counter", "0")]));
    let config = Arc::new(
        ConfigBuilder::new()
            .with_shared_source(source.clone())
            .build()
            .unwrap(),
    );

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let config = Arc::clone(&config);
            thread::spawn(move || {
                let mut last = 0u32;
                for _ in 0..200 {
                    let value = config.get_value::<u32>("counter").unwrap();
                    assert!(value >= last);
                    last = value;
                }
            })
        })
        .collect();

    for i in 1..=200u32 {
        source.set("counter", i.to_string());
    }
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(config.get_value::<u32>("counter").unwrap(), 200);
}

#[test]
fn test_source_added_while_reading() {
    let config = Arc::new(layered_config());
    let reader = {
        let config = Arc::clone(&config);
        thread::spawn(move || {
            for _ in 0..200 {
                let value = config.get_value::<String>("mp-1").unwrap();
                assert!(value == "mp-value-1" || value == "patched");
            }
        })
    };

    config.add_source(Arc::new(
        MapSource::new("patch", [("mp-1", "patched")]).with_ordinal(2000),
    ));
    reader.join().unwrap();

    assert_eq!(config.get_value::<String>("mp-1").unwrap(), "patched");
}

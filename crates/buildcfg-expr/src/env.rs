//! Name bindings visible to expressions

use indexmap::IndexMap;

use crate::value::Value;

/// Ordered mapping of names to values forming an evaluation environment.
pub type Bindings = IndexMap<String, Value>;

/// Bindings describing the platform this binary was built for.
///
/// - `os`: `"linux"`, `"macos"`, `"windows"`, ...
/// - `arch`: `"x86_64"`, `"aarch64"`, ...
/// - `family`: `"unix"` or `"windows"`
pub fn platform_bindings() -> Bindings {
    let mut bindings = Bindings::new();
    bindings.insert("os".to_string(), Value::from(std::env::consts::OS));
    bindings.insert("arch".to_string(), Value::from(std::env::consts::ARCH));
    bindings.insert("family".to_string(), Value::from(std::env::consts::FAMILY));
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_bindings_are_non_empty_strings() {
        let bindings = platform_bindings();
        for name in ["os", "arch", "family"] {
            match bindings.get(name) {
                Some(Value::Str(s)) => assert!(!s.is_empty(), "{name} is empty"),
                other => panic!("unexpected binding for {name}: {other:?}"),
            }
        }
    }
}

#[cfg(test)]
pub mod test {
    use crate::resource::EmbeddedResources;

    pub const DEFAULTS_ID: &str = "config.yml";

    /// Shipped defaults used across tests.
    pub const DEFAULTS: &str = "\
# When to send players to the default spawn.
# Options: first, every, never
login: first

# Default spawn point.
default:
  worldName: \"world\"
  x: 0
  y: 64
  z: 0

teleport:
  retryInterval: 2
";

    pub fn defaults() -> EmbeddedResources {
        EmbeddedResources::new().with(DEFAULTS_ID, DEFAULTS.as_bytes())
    }

    /// Defaults holding exactly `a.b` and `a.c`.
    pub fn ab_defaults() -> EmbeddedResources {
        EmbeddedResources::new().with(DEFAULTS_ID, b"a:\n  b: \"1\"\n  c: \"2\"\n".as_slice())
    }

    #[test]
    fn defaults_parse() {
        let map = crate::load::try_load_internal(&defaults(), DEFAULTS_ID).unwrap();
        assert_eq!(map.len(), 6);
        assert_eq!(map["default.worldName"], "world");
        assert_eq!(map["default.y"], "64");
    }
}

//! Configuration access port trait.

/// Section/key lookups; absent keys are `None` or fall back to `default`.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}

//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
    /// All keys present in a section; empty when the section is absent.
    /// The price table section is keyed by drawdown level, so callers need
    /// to enumerate keys rather than probe known names.
    fn section_keys(&self, section: &str) -> Vec<String>;
}

//! Configuration access port trait.
//!
//! Values come back raw; typed parsing and its errors live in
//! `domain::config_validation`.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}

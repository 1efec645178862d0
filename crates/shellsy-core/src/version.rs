/// Crate version, shared by every Shellsy binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The line `shellsy version` prints, e.g. `Shellsy v1.0.0-alpha`.
pub fn version_string() -> String {
    format!("Shellsy v{VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_line() {
        assert_eq!(version_string(), "Shellsy v1.0.0-alpha");
    }
}

//! Build information
//!
//! Compile-time constants written by `build.rs`.

use serde::Serialize;

/// Build counter, bumped by the build script on each recompilation
pub const BUILD_NUMBER: u64 = match option_env!("MANGETAMAIN_BUILD_NUMBER") {
    Some(s) => match digits_to_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// Build timestamp (UTC, ISO 8601)
pub const BUILD_TIMESTAMP: &str = match option_env!("MANGETAMAIN_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// `str::parse` is not const
const fn digits_to_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut acc: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return None;
        }
        acc = acc * 10 + (b - b'0') as u64;
        i += 1;
    }
    Some(acc)
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            description: DESCRIPTION,
        }
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Print the startup banner to stderr (stdout carries the MCP transport)
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  MangeTaMain recipe explorer");
    eprintln!("  Version: {} | Build: {}", info.version, info.build_number);
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("===============================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_to_u64() {
        assert_eq!(digits_to_u64("42"), Some(42));
        assert_eq!(digits_to_u64("0"), Some(0));
        assert_eq!(digits_to_u64(""), None);
        assert_eq!(digits_to_u64("4x2"), None);
    }
}

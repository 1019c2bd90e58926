// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

/// Process-wide settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Worker threads for per-field evaluation and correlation.
    pub worker_threads: usize,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Log filter used when `RUST_LOG` is unset.
    pub default_log_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            worker_threads: std::env::var("ARENAMAP_THREADS")
                .unwrap_or_else(|_| num_cpus::get().to_string())
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .unwrap_or_else(num_cpus::get),
            pretty: std::env::var("ARENAMAP_PRETTY")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            default_log_filter: "info,arenamap_core=info".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("False"));
        assert!(!parse_flag(" off "));
    }
}

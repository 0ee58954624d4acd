// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Subscriber presets for the three ways the binary runs.
//!
//! Logs always go to stderr: in `serve` mode stdout is the protocol channel.

use std::io;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How the global subscriber is set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Level used when `RUST_LOG` is unset or invalid.
    pub level: Level,

    /// ANSI colors on stderr.
    pub ansi: bool,

    /// Full format with targets and source locations instead of compact lines.
    pub verbose: bool,
}

impl Default for TelemetryConfig {
    /// One-shot commands: warnings only.
    fn default() -> Self {
        Self {
            level: Level::WARN,
            ansi: true,
            verbose: false,
        }
    }
}

impl TelemetryConfig {
    /// `--verbose`: debug output with source locations.
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            ansi: true,
            verbose: true,
        }
    }

    /// The stdio server. Its stderr is usually captured by the host IDE, so no colors.
    pub fn server() -> Self {
        Self {
            level: Level::INFO,
            ansi: false,
            verbose: false,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
    }
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> io::Result<()> {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.ansi)
        .with_target(config.verbose)
        .with_file(config.verbose)
        .with_line_number(config.verbose);
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let installed = if config.verbose {
        registry.with(layer).try_init()
    } else {
        registry.with(layer.compact()).try_init()
    };
    installed.map_err(|e| io::Error::other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(TelemetryConfig::default().level, Level::WARN);

        let dev = TelemetryConfig::development();
        assert_eq!(dev.level, Level::DEBUG);
        assert!(dev.verbose);

        let server = TelemetryConfig::server();
        assert_eq!(server.level, Level::INFO);
        assert!(!server.ansi);
        assert!(!server.verbose);
    }

    #[test]
    fn test_init_twice_fails() {
        // Whichever call comes second must fail; the first may race with
        // other tests in this binary.
        let first = init_telemetry(&TelemetryConfig::server());
        let second = init_telemetry(&TelemetryConfig::server());
        assert!(first.is_err() || second.is_err());
    }
}

// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tracing infrastructure.
//!
//! Initialize once at application startup:
//!
//! ```rust,ignore
//! use ai_extension::telemetry::{init_telemetry, TelemetryConfig};
//!
//! init_telemetry(&TelemetryConfig::server())?;
//! ```
//!
//! `RUST_LOG` overrides the configured default level. The `release-logs` and
//! `max-perf` features cap the compiled-in levels.

mod init;

pub use init::{init_telemetry, TelemetryConfig};

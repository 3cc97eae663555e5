// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Environment variable names read by the profiler tooling, kept in one place.

/// Logging environment variables
pub mod logging {
    /// Log level and per-module filters (e.g., "debug", "dynamo_profiler=trace")
    pub const DYN_LOG: &str = "DYN_LOG";

    /// Path to logging configuration file
    pub const DYN_LOGGING_CONFIG_PATH: &str = "DYN_LOGGING_CONFIG_PATH";

    /// Enable JSONL logging format
    pub const DYN_LOGGING_JSONL: &str = "DYN_LOGGING_JSONL";

    /// Disable ANSI terminal colors in logs
    pub const DYN_SDK_DISABLE_ANSI_LOGGING: &str = "DYN_SDK_DISABLE_ANSI_LOGGING";

    /// Use local timezone for logging timestamps (default is UTC)
    pub const DYN_LOG_USE_LOCAL_TZ: &str = "DYN_LOG_USE_LOCAL_TZ";
}

/// Profiler settings
pub mod profiler {
    /// Prefix of every [`crate::config::ProfilerConfig`] field
    pub const PREFIX: &str = "DYN_PROFILER_";

    /// Backend whose config modifier is used
    pub const DYN_PROFILER_BACKEND: &str = "DYN_PROFILER_BACKEND";
}

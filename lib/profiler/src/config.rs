// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::defaults::VLLM_V1;

pub mod environment_names;

/// Profiler settings
///
/// Defaults are overridden by `DYN_PROFILER_`-prefixed environment variables, e.g.
/// `DYN_PROFILER_BACKEND=vllm_v1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfilerConfig {
    /// Backend identifier used to pick the config modifier
    pub backend: String,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        ProfilerConfig {
            backend: VLLM_V1.to_string(),
        }
    }
}

impl ProfilerConfig {
    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(environment_names::profiler::PREFIX))
    }

    /// Read settings from the environment.
    pub fn from_settings() -> anyhow::Result<Self> {
        Ok(Self::figment().extract()?)
    }
}

/// Check if a string is truthy: "1", "true", "on", "yes" (case-insensitive).
pub fn is_truthy(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

/// Check if a string is falsey: "0", "false", "off", "no" (case-insensitive).
pub fn is_falsey(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "0" | "false" | "off" | "no")
}

/// Parse a boolean setting, rejecting anything that is neither truthy nor falsey.
pub fn parse_bool(val: &str) -> anyhow::Result<bool> {
    if is_truthy(val) {
        Ok(true)
    } else if is_falsey(val) {
        Ok(false)
    } else {
        anyhow::bail!(
            "Invalid boolean value: '{}'. Expected one of: true/false, 1/0, on/off, yes/no",
            val
        )
    }
}

/// `false` when unset or not truthy.
pub fn env_is_truthy(env: &str) -> bool {
    std::env::var(env).is_ok_and(|val| is_truthy(&val))
}

/// `Ok(None)` when unset, an error when set to something that is not a boolean.
pub fn env_parse_bool(env: &str) -> anyhow::Result<Option<bool>> {
    match std::env::var(env) {
        Ok(val) => parse_bool(&val).map(Some),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => anyhow::bail!("Failed to read environment variable {}: {}", env, e),
    }
}

/// JSONL logging is on when `DYN_LOGGING_JSONL` is truthy
pub fn jsonl_logging_enabled() -> bool {
    env_is_truthy(environment_names::logging::DYN_LOGGING_JSONL)
}

/// ANSI colors are off when `DYN_SDK_DISABLE_ANSI_LOGGING` is truthy
pub fn disable_ansi_logging() -> bool {
    env_is_truthy(environment_names::logging::DYN_SDK_DISABLE_ANSI_LOGGING)
}

/// Log timestamps use the local timezone when `DYN_LOG_USE_LOCAL_TZ` is truthy
pub fn use_local_timezone() -> bool {
    env_is_truthy(environment_names::logging::DYN_LOG_USE_LOCAL_TZ)
}

// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Per-backend deployment config rewriting.
//!
//! Profiling evaluates prefill and decode in isolation. Starting from a disaggregated base config,
//! a [`RoleConfigModifier`] turns it into a single-worker deployment tuned for one [`Role`],
//! scales its tensor parallelism, and reads back the facts the profiler needs (model, port, KV
//! cache capacity).
//!
//! Modifiers are looked up by backend identifier in a [`ConfigModifierRegistry`]. Adding a
//! backend means implementing the trait and registering it; nothing else changes.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::defaults::{DYNAMO_RUN_DEFAULT_PORT, FRONTEND_COMPONENT_NAME};
use crate::deployment::DeploymentConfig;
use crate::error::{ConfigError, Result};
use crate::kv_cache;

pub mod vllm;

pub use vllm::VllmV1ConfigModifier;

const HTTP_PORT_FLAG: &str = "--http-port";

/// The role a profiled worker plays.
#[derive(
    Copy, Debug, Clone, Display, EnumString, Serialize, Deserialize, Eq, PartialEq, Hash,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Prefill,
    Decode,
}

pub trait RoleConfigModifier: Send + Sync + fmt::Debug {
    /// Backend identifier this modifier is registered under, e.g. `vllm_v1`.
    fn backend(&self) -> &'static str;

    /// Turn a disaggregated base config into a single worker deployment for `target`.
    /// The input is left untouched.
    fn convert_config(&self, config: &DeploymentConfig, target: Role) -> Result<DeploymentConfig>;

    /// Run the worker with `tp_size` GPUs per replica.
    fn set_config_tp_size(
        &self,
        config: &DeploymentConfig,
        tp_size: u32,
    ) -> Result<DeploymentConfig>;

    /// Model served by the worker, or [`crate::defaults::DEFAULT_MODEL_NAME`].
    fn get_model_name(&self, config: &DeploymentConfig) -> Result<String>;

    /// HTTP port of the frontend.
    ///
    /// Any problem reading `--http-port` (absent, no value, not a port number) falls back to
    /// [`DYNAMO_RUN_DEFAULT_PORT`] with a warning. A config without a `Frontend` service is still
    /// an error.
    fn get_port(&self, config: &DeploymentConfig) -> Result<u16> {
        let args = config.container_args(FRONTEND_COMPONENT_NAME)?;
        let port = match args.get_flag_value(HTTP_PORT_FLAG) {
            Some(value) => value.parse::<u16>().map_err(|err| {
                format!("invalid {HTTP_PORT_FLAG} value '{value}': {err}")
            }),
            None => Err(format!("{HTTP_PORT_FLAG} not found")),
        };
        Ok(port.unwrap_or_else(|reason| {
            tracing::warn!(
                "Port not found in configuration args ({reason}), using default port: {DYNAMO_RUN_DEFAULT_PORT}"
            );
            DYNAMO_RUN_DEFAULT_PORT
        }))
    }

    /// KV cache capacity in tokens, scraped from the worker's log. `0` when unknown.
    fn get_kv_cache_size_from_dynamo_log(&self, path: &Path) -> u64 {
        kv_cache::get_kv_cache_size_from_dynamo_log(path)
    }
}

/// Backend identifier to [`RoleConfigModifier`].
#[derive(Debug, Clone)]
pub struct ConfigModifierRegistry {
    modifiers: HashMap<String, Arc<dyn RoleConfigModifier>>,
}

impl ConfigModifierRegistry {
    /// A registry with no backends.
    pub fn empty() -> Self {
        Self {
            modifiers: HashMap::new(),
        }
    }

    /// Register a modifier under its backend identifier, returning the one it replaced.
    pub fn register(
        &mut self,
        modifier: Arc<dyn RoleConfigModifier>,
    ) -> Option<Arc<dyn RoleConfigModifier>> {
        self.modifiers
            .insert(modifier.backend().to_string(), modifier)
    }

    pub fn get(&self, backend: &str) -> Result<Arc<dyn RoleConfigModifier>> {
        self.modifiers
            .get(backend)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownBackend(backend.to_string()))
    }

    /// Registered backend identifiers, sorted.
    pub fn backends(&self) -> Vec<&str> {
        let mut backends: Vec<&str> = self.modifiers.keys().map(String::as_str).collect();
        backends.sort_unstable();
        backends
    }
}

impl Default for ConfigModifierRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(VllmV1ConfigModifier::default()));
        registry
    }
}

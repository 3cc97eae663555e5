// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! # Dynamo Profiler Config
//!
//! Rewrites a disaggregated Dynamo deployment into the single-role deployments the profiler
//! measures, and reads back the model, frontend port and KV cache capacity of a run.
//!
//! ```
//! use dynamo_profiler::{ConfigModifierRegistry, DeploymentConfig, Role};
//!
//! let base = DeploymentConfig::from_yaml_str(r#"
//! metadata:
//!   name: vllm-disagg
//! spec:
//!   services:
//!     VllmDecodeWorker:
//!       replicas: 2
//!       extraPodSpec:
//!         mainContainer:
//!           args: ["python3 -m dynamo.vllm --model Qwen/Qwen3-0.6B"]
//!     VllmPrefillWorker:
//!       replicas: 2
//!       extraPodSpec:
//!         mainContainer:
//!           args: ["python3 -m dynamo.vllm --model Qwen/Qwen3-0.6B --is-prefill-worker"]
//! "#).unwrap();
//!
//! let modifier = ConfigModifierRegistry::default().get("vllm_v1").unwrap();
//! let decode = modifier.convert_config(&base, Role::Decode).unwrap();
//! assert!(!decode.has_service("VllmPrefillWorker").unwrap());
//! assert!(decode.container_args("VllmDecodeWorker").unwrap().contains("--enable-prefix-caching"));
//! ```

pub mod args;
pub mod config;
pub mod defaults;
pub mod deployment;
pub mod error;
pub mod kv_cache;
pub mod logging;
pub mod modifier;

pub use args::ArgumentList;
pub use deployment::DeploymentConfig;
pub use error::{ConfigError, Result};
pub use modifier::{ConfigModifierRegistry, Role, RoleConfigModifier, VllmV1ConfigModifier};

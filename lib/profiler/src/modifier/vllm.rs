// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::defaults::{
    DEFAULT_MODEL_NAME, PLANNER_COMPONENT_NAME, VLLM_V1, VLLM_V1_COMPONENT_NAMES,
    WorkerComponentNames,
};
use crate::deployment::DeploymentConfig;
use crate::error::Result;

use super::{Role, RoleConfigModifier};

/// `metadata.name` of a converted deployment
const AGG_DEPLOYMENT_NAME: &str = "vllm-v1-agg";

const IS_PREFILL_WORKER_FLAG: &str = "--is-prefill-worker";
const ENABLE_PREFIX_CACHING_FLAG: &str = "--enable-prefix-caching";
const NO_ENABLE_PREFIX_CACHING_FLAG: &str = "--no-enable-prefix-caching";
const TENSOR_PARALLEL_SIZE_FLAG: &str = "--tensor-parallel-size";
const MODEL_FLAG: &str = "--model";

/// Config modifier for `python3 -m dynamo.vllm` workers.
///
/// Both roles are profiled as the decode worker service: a prefill run promotes the prefill
/// worker into that slot with prefix caching off, so repeated prompts are not served from cache,
/// and a decode run drops the prefill worker and turns prefix caching on.
#[derive(Debug, Clone)]
pub struct VllmV1ConfigModifier {
    names: WorkerComponentNames,
}

impl VllmV1ConfigModifier {
    pub fn worker_names(&self) -> &WorkerComponentNames {
        &self.names
    }
}

impl Default for VllmV1ConfigModifier {
    fn default() -> Self {
        Self {
            names: VLLM_V1_COMPONENT_NAMES,
        }
    }
}

impl RoleConfigModifier for VllmV1ConfigModifier {
    fn backend(&self) -> &'static str {
        VLLM_V1
    }

    fn convert_config(&self, config: &DeploymentConfig, target: Role) -> Result<DeploymentConfig> {
        let mut config = config.clone();
        let worker = self.names.decode_worker;

        config.set_name(AGG_DEPLOYMENT_NAME)?;

        // The planner only makes sense for an autoscaled disaggregated deployment
        if config
            .remove_service_if_present(PLANNER_COMPONENT_NAME)?
            .is_some()
        {
            tracing::debug!("Removed {PLANNER_COMPONENT_NAME} service");
        }

        match target {
            Role::Prefill => {
                config.rename_service(self.names.prefill_worker, worker)?;

                let mut args = config.container_args(worker)?;
                if !args.remove_flag(IS_PREFILL_WORKER_FLAG) {
                    tracing::debug!("{IS_PREFILL_WORKER_FLAG} not set on {worker}");
                }
                args.remove_flag(ENABLE_PREFIX_CACHING_FLAG);
                args.ensure_flag(NO_ENABLE_PREFIX_CACHING_FLAG);
                config.set_container_args(worker, &args)?;
            }
            Role::Decode => {
                config.remove_service(self.names.prefill_worker)?;

                let mut args = config.container_args(worker)?;
                args.ensure_flag(ENABLE_PREFIX_CACHING_FLAG);
                args.remove_flag(NO_ENABLE_PREFIX_CACHING_FLAG);
                config.set_container_args(worker, &args)?;
            }
        }

        // A profiling run always measures a single replica
        config.set_replicas(worker, 1)?;

        tracing::debug!(%target, worker, "Converted config");
        Ok(config)
    }

    fn set_config_tp_size(
        &self,
        config: &DeploymentConfig,
        tp_size: u32,
    ) -> Result<DeploymentConfig> {
        let mut config = config.clone();
        let worker = self.names.decode_worker;

        config.set_gpu_count(worker, tp_size)?;

        let mut args = config.container_args(worker)?;
        args.set_flag_value(TENSOR_PARALLEL_SIZE_FLAG, tp_size.to_string());
        config.set_container_args(worker, &args)?;

        Ok(config)
    }

    fn get_model_name(&self, config: &DeploymentConfig) -> Result<String> {
        let args = config.container_args(self.names.decode_worker)?;
        match args.get_flag_value(MODEL_FLAG) {
            Some(model) => Ok(model.to_string()),
            None => {
                tracing::warn!(
                    "Model name not found in configuration args, using default model name: {DEFAULT_MODEL_NAME}"
                );
                Ok(DEFAULT_MODEL_NAME.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::worker_component_names;
    use crate::error::ConfigError;
    use serde_json::json;

    fn config_with_worker_args(args: &str) -> DeploymentConfig {
        DeploymentConfig::new(json!({
            "metadata": { "name": "vllm-disagg" },
            "spec": { "services": {
                "VllmDecodeWorker": {
                    "replicas": 3,
                    "resources": { "requests": { "gpu": "1" }, "limits": { "gpu": "1" } },
                    "extraPodSpec": { "mainContainer": { "args": [args] } }
                },
                "VllmPrefillWorker": {
                    "replicas": 2,
                    "resources": { "requests": { "gpu": "1" }, "limits": { "gpu": "1" } },
                    "extraPodSpec": { "mainContainer": { "args": [args] } }
                }
            } }
        }))
    }

    #[test]
    fn test_worker_names_follow_lookup_table() {
        let modifier = VllmV1ConfigModifier::default();
        assert_eq!(
            Some(*modifier.worker_names()),
            worker_component_names(modifier.backend())
        );
    }

    #[test]
    fn test_set_config_tp_size_inserts_before_tail() {
        let config = config_with_worker_args("python3 -m dynamo.vllm 2>&1 | tee /tmp/log");
        let modifier = VllmV1ConfigModifier::default();
        let scaled = modifier.set_config_tp_size(&config, 4).unwrap();
        assert_eq!(
            scaled.container_args("VllmDecodeWorker").unwrap().to_string(),
            "python3 -m dynamo.vllm --tensor-parallel-size 4 2>&1 | tee /tmp/log"
        );
        let worker = scaled.service("VllmDecodeWorker").unwrap();
        assert_eq!(worker["resources"]["requests"]["gpu"], json!("4"));
        assert_eq!(worker["resources"]["limits"]["gpu"], json!("4"));
        // input untouched
        assert_eq!(
            config.container_args("VllmDecodeWorker").unwrap().to_string(),
            "python3 -m dynamo.vllm 2>&1 | tee /tmp/log"
        );
    }

    #[test]
    fn test_set_config_tp_size_overwrites_existing() {
        let config = config_with_worker_args("python3 -m dynamo.vllm --tensor-parallel-size 1");
        let scaled = VllmV1ConfigModifier::default()
            .set_config_tp_size(&config, 8)
            .unwrap();
        let args = scaled.container_args("VllmDecodeWorker").unwrap();
        assert_eq!(args.to_string(), "python3 -m dynamo.vllm --tensor-parallel-size 8");
    }

    #[test]
    fn test_get_model_name() {
        let modifier = VllmV1ConfigModifier::default();
        let config = config_with_worker_args("python3 -m dynamo.vllm --model meta-llama/Llama-3.1-8B");
        assert_eq!(modifier.get_model_name(&config).unwrap(), "meta-llama/Llama-3.1-8B");

        let config = config_with_worker_args("python3 -m dynamo.vllm");
        assert_eq!(modifier.get_model_name(&config).unwrap(), DEFAULT_MODEL_NAME);
    }

    #[test]
    fn test_convert_prefill_requires_prefill_worker() {
        let mut config = config_with_worker_args("python3 -m dynamo.vllm");
        config.remove_service("VllmPrefillWorker").unwrap();
        let err = VllmV1ConfigModifier::default()
            .convert_config(&config, Role::Prefill)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(path) if path == "spec.services.VllmPrefillWorker"));
    }
}

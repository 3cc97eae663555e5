// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Typed navigation over a DynamoGraphDeployment style config.
//!
//! Only the handful of keys the profiler rewrites are modelled:
//!
//! ```yaml
//! metadata:
//!   name: vllm-disagg
//! spec:
//!   services:
//!     VllmDecodeWorker:
//!       replicas: 2
//!       resources:
//!         requests: { gpu: "1" }
//!         limits: { gpu: "1" }
//!       extraPodSpec:
//!         mainContainer:
//!           args: ["python3 -m dynamo.vllm --model Qwen/Qwen3-0.6B"]
//! ```
//!
//! Everything else is carried through untouched. A key the profiler expects but cannot find is a
//! [`ConfigError::MissingKey`]; the base config is considered malformed and nothing is recovered.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::args::ArgumentList;
use crate::error::{ConfigError, Result};

const METADATA: &str = "metadata";
const NAME: &str = "name";
const SPEC: &str = "spec";
const SERVICES: &str = "services";
const REPLICAS: &str = "replicas";
const RESOURCES: &str = "resources";
const REQUESTS: &str = "requests";
const LIMITS: &str = "limits";
const GPU: &str = "gpu";
const EXTRA_POD_SPEC: &str = "extraPodSpec";
const MAIN_CONTAINER: &str = "mainContainer";
const ARGS: &str = "args";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentConfig(Value);

impl DeploymentConfig {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// `metadata.name`
    pub fn name(&self) -> Result<&str> {
        let path = [METADATA, NAME];
        lookup(&self.0, &path)?
            .as_str()
            .ok_or_else(|| unexpected(&path, "a string"))
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        object_mut(&mut self.0, &[METADATA])?.insert(NAME.to_string(), Value::from(name));
        Ok(())
    }

    /// `spec.services`
    pub fn services(&self) -> Result<&Map<String, Value>> {
        let path = [SPEC, SERVICES];
        lookup(&self.0, &path)?
            .as_object()
            .ok_or_else(|| unexpected(&path, "a mapping"))
    }

    fn services_mut(&mut self) -> Result<&mut Map<String, Value>> {
        object_mut(&mut self.0, &[SPEC, SERVICES])
    }

    pub fn has_service(&self, service: &str) -> Result<bool> {
        Ok(self.services()?.contains_key(service))
    }

    pub fn service(&self, service: &str) -> Result<&Value> {
        lookup(&self.0, &[SPEC, SERVICES, service])
    }

    /// Remove a service that must exist.
    pub fn remove_service(&mut self, service: &str) -> Result<Value> {
        self.services_mut()?
            .shift_remove(service)
            .ok_or_else(|| ConfigError::MissingKey(dotted(&[SPEC, SERVICES, service])))
    }

    /// Remove a service if the deployment has one by that name.
    pub fn remove_service_if_present(&mut self, service: &str) -> Result<Option<Value>> {
        Ok(self.services_mut()?.shift_remove(service))
    }

    /// Move the service `from` to the name `to`, replacing any service already called `to`.
    pub fn rename_service(&mut self, from: &str, to: &str) -> Result<()> {
        let services = self.services_mut()?;
        let moved = services
            .get(from)
            .cloned()
            .ok_or_else(|| ConfigError::MissingKey(dotted(&[SPEC, SERVICES, from])))?;
        services.insert(to.to_string(), moved);
        if from != to {
            services.shift_remove(from);
        }
        Ok(())
    }

    /// Tokenized `extraPodSpec.mainContainer.args` of a service.
    pub fn container_args(&self, service: &str) -> Result<ArgumentList> {
        let path = args_path(service);
        match lookup(&self.0, &path)? {
            Value::String(command_line) => Ok(ArgumentList::from_command_line(command_line)),
            Value::Array(items) => {
                let parts = items
                    .iter()
                    .map(|item| item.as_str().ok_or_else(|| ConfigError::InvalidArgs(dotted(&path))))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ArgumentList::tokenize(&parts))
            }
            _ => Err(ConfigError::InvalidArgs(dotted(&path))),
        }
    }

    /// Store the argument list back as a one element list of strings.
    pub fn set_container_args(&mut self, service: &str, args: &ArgumentList) -> Result<()> {
        let path = args_path(service);
        object_mut(&mut self.0, &path[..path.len() - 1])?
            .insert(ARGS.to_string(), Value::from(args.serialize()));
        Ok(())
    }

    pub fn replicas(&self, service: &str) -> Result<Option<u64>> {
        let service = self.service(service)?;
        Ok(service.get(REPLICAS).and_then(Value::as_u64))
    }

    pub fn set_replicas(&mut self, service: &str, replicas: u64) -> Result<()> {
        object_mut(&mut self.0, &[SPEC, SERVICES, service])?
            .insert(REPLICAS.to_string(), Value::from(replicas));
        Ok(())
    }

    /// Set both `resources.requests.gpu` and `resources.limits.gpu`. The values are string encoded,
    /// as Kubernetes quantities are.
    pub fn set_gpu_count(&mut self, service: &str, gpus: u32) -> Result<()> {
        for section in [REQUESTS, LIMITS] {
            object_mut(&mut self.0, &[SPEC, SERVICES, service, RESOURCES, section])?
                .insert(GPU.to_string(), Value::String(gpus.to_string()));
        }
        Ok(())
    }
}

impl From<Value> for DeploymentConfig {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn args_path(service: &str) -> [&str; 6] {
    [SPEC, SERVICES, service, EXTRA_POD_SPEC, MAIN_CONTAINER, ARGS]
}

fn dotted(path: &[&str]) -> String {
    if path.is_empty() {
        return "<root>".to_string();
    }
    path.join(".")
}

fn unexpected(path: &[&str], expected: &'static str) -> ConfigError {
    ConfigError::UnexpectedType {
        path: dotted(path),
        expected,
    }
}

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut current = root;
    for (depth, key) in path.iter().enumerate() {
        let map = current
            .as_object()
            .ok_or_else(|| unexpected(&path[..depth], "a mapping"))?;
        current = map
            .get(*key)
            .ok_or_else(|| ConfigError::MissingKey(dotted(&path[..=depth])))?;
    }
    Ok(current)
}

fn object_mut<'a>(root: &'a mut Value, path: &[&str]) -> Result<&'a mut Map<String, Value>> {
    let mut current = root;
    for (depth, key) in path.iter().enumerate() {
        let map = current
            .as_object_mut()
            .ok_or_else(|| unexpected(&path[..depth], "a mapping"))?;
        current = map
            .get_mut(*key)
            .ok_or_else(|| ConfigError::MissingKey(dotted(&path[..=depth])))?;
    }
    current
        .as_object_mut()
        .ok_or_else(|| unexpected(path, "a mapping"))
}

// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::path::Path;

use anyhow::Context as _;
use dynamo_profiler::DeploymentConfig;

/// On-disk encoding of a deployment config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl From<&Path> for Format {
    /// `.json` files are JSON, everything else is treated as YAML
    fn from(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
        };
        write!(f, "{s}")
    }
}

impl Format {
    pub fn parse(&self, contents: &str) -> anyhow::Result<DeploymentConfig> {
        let config = match self {
            Format::Yaml => DeploymentConfig::from_yaml_str(contents)?,
            Format::Json => DeploymentConfig::from_json_str(contents)?,
        };
        Ok(config)
    }

    pub fn render(&self, config: &DeploymentConfig) -> anyhow::Result<String> {
        let rendered = match self {
            Format::Yaml => config.to_yaml_string()?,
            Format::Json => {
                let mut json = config.to_json_string_pretty()?;
                json.push('\n');
                json
            }
        };
        Ok(rendered)
    }
}

pub fn read_config(path: &Path) -> anyhow::Result<(DeploymentConfig, Format)> {
    let format = Format::from(path);
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read deployment config {}", path.display()))?;
    let config = format
        .parse(&contents)
        .with_context(|| format!("Failed to parse {format} deployment config {}", path.display()))?;
    Ok((config, format))
}

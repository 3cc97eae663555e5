// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::Path;

use anyhow::Context as _;
use dynamo_profiler::config::ProfilerConfig;
use dynamo_profiler::{ConfigModifierRegistry, DeploymentConfig};

mod flags;
pub use flags::{Cli, Command};
mod opt;
pub use opt::Format;

/// Run one subcommand, writing its result to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    let backend = match cli.backend {
        Some(backend) => backend,
        None => ProfilerConfig::from_settings()?.backend,
    };
    let modifier = ConfigModifierRegistry::default().get(&backend)?;

    match cli.command {
        Command::Convert(args) => {
            let (config, format) = opt::read_config(&args.input.input)?;
            let converted = modifier.convert_config(&config, args.target)?;
            tracing::info!(%backend, target = %args.target, "Converted deployment config");
            emit(&converted, format, args.output.output.as_deref(), out)
        }
        Command::SetTp(args) => {
            let (config, format) = opt::read_config(&args.input.input)?;
            let scaled = modifier.set_config_tp_size(&config, args.tp_size)?;
            tracing::info!(%backend, tp_size = args.tp_size, "Set tensor parallel size");
            emit(&scaled, format, args.output.output.as_deref(), out)
        }
        Command::ModelName(args) => {
            let (config, _) = opt::read_config(&args.input)?;
            writeln!(out, "{}", modifier.get_model_name(&config)?)?;
            Ok(())
        }
        Command::Port(args) => {
            let (config, _) = opt::read_config(&args.input)?;
            writeln!(out, "{}", modifier.get_port(&config)?)?;
            Ok(())
        }
        Command::KvCacheSize(args) => {
            writeln!(out, "{}", modifier.get_kv_cache_size_from_dynamo_log(&args.log))?;
            Ok(())
        }
    }
}

fn emit<W: Write>(
    config: &DeploymentConfig,
    format: Format,
    output: Option<&Path>,
    out: &mut W,
) -> anyhow::Result<()> {
    let rendered = format.render(config)?;
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write deployment config {}", path.display())),
        None => {
            out.write_all(rendered.as_bytes())?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    const DISAGG_JSON: &str = r#"{
        "metadata": { "name": "vllm-disagg" },
        "spec": { "services": {
            "Frontend": { "extraPodSpec": { "mainContainer": {
                "args": ["python3 -m dynamo.frontend --http-port 8123"] } } },
            "VllmDecodeWorker": {
                "replicas": 4,
                "resources": { "requests": { "gpu": "1" }, "limits": { "gpu": "1" } },
                "extraPodSpec": { "mainContainer": {
                    "args": ["python3 -m dynamo.vllm --model Qwen/Qwen3-8B"] } } },
            "VllmPrefillWorker": {
                "replicas": 4,
                "extraPodSpec": { "mainContainer": {
                    "args": ["python3 -m dynamo.vllm --model Qwen/Qwen3-8B --is-prefill-worker"] } } }
        } }
    }"#;

    fn write_input(dir: &TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path.display().to_string()
    }

    fn run_args(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(
            std::iter::once("dynamo-profile-config").chain(args.iter().copied()),
        )?;
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_convert_prefill_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "disagg.json", DISAGG_JSON);
        let output = dir.path().join("prefill.json");
        let output_arg = output.display().to_string();

        let stdout = run_args(&[
            "--backend", "vllm_v1", "convert", "--input", &input, "--target", "prefill",
            "--output", &output_arg,
        ])
        .unwrap();
        assert!(stdout.is_empty());

        let (converted, format) = opt::read_config(&output).unwrap();
        assert_eq!(format, Format::Json);
        assert_eq!(converted.name().unwrap(), "vllm-v1-agg");
        assert!(!converted.has_service("VllmPrefillWorker").unwrap());
        assert_eq!(
            converted.container_args("VllmDecodeWorker").unwrap().to_string(),
            "python3 -m dynamo.vllm --model Qwen/Qwen3-8B --no-enable-prefix-caching"
        );
    }

    #[test]
    fn test_set_tp_to_stdout_as_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let config = Format::Json.parse(DISAGG_JSON).unwrap();
        let yaml = Format::Yaml.render(&config).unwrap();
        let input = write_input(&dir, "disagg.yaml", &yaml);

        let stdout = run_args(&["--backend", "vllm_v1", "set-tp", "--input", &input, "--tp-size", "2"]).unwrap();
        let scaled = DeploymentConfig::from_yaml_str(&stdout).unwrap();
        assert_eq!(
            scaled.container_args("VllmDecodeWorker").unwrap().get_flag_value("--tensor-parallel-size"),
            Some("2")
        );
    }

    #[test]
    fn test_scalar_subcommands() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "disagg.json", DISAGG_JSON);
        let log = write_input(
            &dir,
            "vllm.log",
            "INFO Maximum concurrency for 4,096 tokens per request: 2.5x\n",
        );

        assert_eq!(run_args(&["--backend", "vllm_v1", "model-name", "-i", &input]).unwrap(), "Qwen/Qwen3-8B\n");
        assert_eq!(run_args(&["--backend", "vllm_v1", "port", "-i", &input]).unwrap(), "8123\n");
        assert_eq!(run_args(&["--backend", "vllm_v1", "kv-cache-size", "--log", &log]).unwrap(), "10240\n");
    }

    #[test]
    fn test_rejects_unknown_backend_and_role() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(&dir, "disagg.json", DISAGG_JSON);

        let err = run_args(&["--backend", "trtllm", "port", "-i", &input]).unwrap_err();
        assert!(err.to_string().contains("trtllm"), "{err}");

        assert!(run_args(&["convert", "-i", &input, "--target", "agg"]).is_err());
        assert!(run_args(&["set-tp", "-i", &input, "--tp-size", "0"]).is_err());
    }
}

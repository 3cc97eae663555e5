// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dynamo_profiler::Role;
use dynamo_profiler::config::environment_names::profiler::DYN_PROFILER_BACKEND;

#[derive(Parser, Debug)]
#[command(name = "dynamo-profile-config")]
#[command(about = "Prepare deployment configs for a Dynamo profiling run")]
pub struct Cli {
    /// Backend whose workers the config describes. Defaults to vllm_v1.
    #[arg(long, global = true, env = DYN_PROFILER_BACKEND)]
    pub backend: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Turn a disaggregated config into a single worker prefill or decode deployment
    Convert(ConvertArgs),
    /// Set the tensor parallel size of the worker
    SetTp(SetTpArgs),
    /// Print the model served by the worker
    ModelName(InputArgs),
    /// Print the frontend HTTP port
    Port(InputArgs),
    /// Print the KV cache capacity in tokens found in a worker log
    KvCacheSize(KvCacheSizeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Deployment config to read. `.json` files are read as JSON, anything else as YAML.
    #[arg(long, short)]
    pub input: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Where to write the rewritten config, in the input's format. Defaults to stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Role to profile: prefill or decode
    #[arg(long)]
    pub target: Role,
}

#[derive(Args, Debug, Clone)]
pub struct SetTpArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// GPUs per worker replica
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub tp_size: u32,
}

#[derive(Args, Debug, Clone)]
pub struct KvCacheSizeArgs {
    /// Worker log to scan
    #[arg(long)]
    pub log: PathBuf,
}

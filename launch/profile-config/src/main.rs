// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use dynamo_profile_config::Cli;

fn main() -> anyhow::Result<()> {
    dynamo_profiler::logging::init();
    let cli = Cli::parse();
    dynamo_profile_config::run(cli, &mut std::io::stdout().lock())
}

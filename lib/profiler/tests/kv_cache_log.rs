// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use dynamo_profiler::ConfigModifierRegistry;
use dynamo_profiler::defaults::decode_sweep_within;
use tempfile::NamedTempFile;

const VLLM_STARTUP_LOG: &str = "\
INFO 06-10 17:21:42 [__init__.py:244] Automatically detected platform cuda.
INFO 06-10 17:21:51 [gpu_model_runner.py:1595] Model loading took 1.1201 GiB and 2.101339 seconds
INFO 06-10 17:22:01 [kv_cache_utils.py:715] GPU KV cache size: 9,216 tokens
INFO 06-10 17:22:01 [kv_cache_utils.py:719] Maximum concurrency for 2,048 tokens per request: 4.5x
INFO 06-10 17:22:20 [core.py:171] init engine (profile, create kv cache, warmup model) took 28.53 seconds
";

#[test]
fn test_kv_cache_size_from_vllm_startup_log() {
    let mut log = NamedTempFile::new().unwrap();
    log.write_all(VLLM_STARTUP_LOG.as_bytes()).unwrap();

    let modifier = ConfigModifierRegistry::default().get("vllm_v1").unwrap();
    let kv_cache_size = modifier.get_kv_cache_size_from_dynamo_log(log.path());
    assert_eq!(kv_cache_size, 9216);

    // 9216 tokens at 2048 tokens per request bounds decode concurrency at 4
    let max_concurrency = kv_cache_size / 2048;
    assert_eq!(decode_sweep_within(max_concurrency), vec![1]);
}

#[test]
fn test_kv_cache_size_without_vllm_summary() {
    let mut log = NamedTempFile::new().unwrap();
    log.write_all(b"INFO starting frontend\nINFO listening on 0.0.0.0:8000\n")
        .unwrap();

    let modifier = ConfigModifierRegistry::default().get("vllm_v1").unwrap();
    assert_eq!(modifier.get_kv_cache_size_from_dynamo_log(log.path()), 0);
}

// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Fallback values and lookup tables shared by the config modifiers.

/// Used when a worker's args do not name a model
pub const DEFAULT_MODEL_NAME: &str = "Qwen/Qwen3-0.6B";

/// Used when the frontend's args do not carry a usable `--http-port`
pub const DYNAMO_RUN_DEFAULT_PORT: u16 = 8000;

/// Concurrency levels swept when profiling a decode worker
pub const DECODE_NUM_REQUESTS_RANGE: [u32; 14] = [
    1, 5, 10, 25, 50, 100, 150, 200, 250, 300, 350, 400, 450, 500,
];

/// Service name of the frontend in every supported backend
pub const FRONTEND_COMPONENT_NAME: &str = "Frontend";

/// Service name of the planner, dropped when profiling a single role
pub const PLANNER_COMPONENT_NAME: &str = "Planner";

/// Backend identifier of the vLLM v1 workers
pub const VLLM_V1: &str = "vllm_v1";

/// Service names of the two worker roles of a disaggregated deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerComponentNames {
    pub prefill_worker: &'static str,
    pub decode_worker: &'static str,
}

pub const VLLM_V1_COMPONENT_NAMES: WorkerComponentNames = WorkerComponentNames {
    prefill_worker: "VllmPrefillWorker",
    decode_worker: "VllmDecodeWorker",
};

/// Worker service names for a backend identifier such as `vllm_v1`.
pub fn worker_component_names(backend: &str) -> Option<WorkerComponentNames> {
    match backend {
        VLLM_V1 => Some(VLLM_V1_COMPONENT_NAMES),
        _ => None,
    }
}

/// The decode sweep points a worker can actually serve, given the maximum concurrency derived
/// from its KV cache. A limit of zero means the capacity is unknown and the full sweep is kept.
pub fn decode_sweep_within(max_concurrency: u64) -> Vec<u32> {
    DECODE_NUM_REQUESTS_RANGE
        .iter()
        .copied()
        .filter(|&n| max_concurrency == 0 || u64::from(n) <= max_concurrency)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_component_names() {
        let names = worker_component_names(VLLM_V1).unwrap();
        assert_eq!(names.prefill_worker, "VllmPrefillWorker");
        assert_eq!(names.decode_worker, "VllmDecodeWorker");
        assert!(worker_component_names("sglang").is_none());
    }

    #[test]
    fn test_decode_sweep_within() {
        assert_eq!(decode_sweep_within(60), vec![1, 5, 10, 25, 50]);
        assert_eq!(decode_sweep_within(0).len(), DECODE_NUM_REQUESTS_RANGE.len());
        assert!(decode_sweep_within(500).ends_with(&[500]));
    }
}

// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! KV cache capacity scraped from a worker's startup log.
//!
//! vLLM reports its KV cache sizing on startup as
//!
//! ```text
//! INFO 05-01 12:00:00 [kv_cache_utils.py:634] Maximum concurrency for 2,048 tokens per request: 4.50x
//! ```
//!
//! The product of the two numbers is the number of tokens the cache holds. This is a best effort
//! heuristic: the line format belongs to the engine, so anything unexpected yields a size of `0`
//! and a warning instead of an error.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const MAX_CONCURRENCY_MARKER: &str = "Maximum concurrency for";
const TOKENS_PER_REQUEST: &str = " tokens per request: ";

#[derive(Debug, thiserror::Error)]
pub enum KvCacheLogError {
    #[error("Expected 'Maximum concurrency for <tokens> tokens per request: <concurrency>x'")]
    PatternMismatch,

    #[error("Invalid token count '{0}'")]
    InvalidTokenCount(String),

    #[error("Invalid concurrency '{0}'")]
    InvalidConcurrency(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxConcurrency {
    pub token_count: u64,
    pub concurrency: f64,
}

impl MaxConcurrency {
    /// Number of tokens the KV cache holds, rounded down.
    pub fn kv_cache_size(&self) -> u64 {
        (self.token_count as f64 * self.concurrency).floor() as u64
    }
}

/// Parse the part of a log line following `Maximum concurrency for `.
///
/// Commas are stripped from the token count and the final character (the `x` unit) is dropped from
/// the concurrency.
pub fn parse_max_concurrency_line(line: &str) -> Result<MaxConcurrency, KvCacheLogError> {
    let marker = format!("{MAX_CONCURRENCY_MARKER} ");
    let rest = line
        .trim()
        .split(marker.as_str())
        .nth(1)
        .ok_or(KvCacheLogError::PatternMismatch)?;

    let mut parts = rest.split(TOKENS_PER_REQUEST);
    let token_count = parts.next().unwrap_or_default();
    let concurrency = parts.next().ok_or(KvCacheLogError::PatternMismatch)?;

    let token_count: u64 = token_count
        .replace(',', "")
        .trim()
        .parse()
        .map_err(|_| KvCacheLogError::InvalidTokenCount(token_count.to_string()))?;

    let mut unit = concurrency.chars();
    unit.next_back();
    let concurrency_value: f64 = unit
        .as_str()
        .trim()
        .parse()
        .map_err(|_| KvCacheLogError::InvalidConcurrency(concurrency.to_string()))?;

    let product = token_count as f64 * concurrency_value;
    if !product.is_finite() || product < 0.0 {
        return Err(KvCacheLogError::InvalidConcurrency(concurrency.to_string()));
    }

    Ok(MaxConcurrency {
        token_count,
        concurrency: concurrency_value,
    })
}

/// Scan a dynamo worker log for the first `Maximum concurrency for` line and return the KV cache
/// size in tokens.
///
/// Returns `0` when the log cannot be read, has no such line, or the first such line does not
/// parse. Later lines are not consulted once a matching line has been seen.
pub fn get_kv_cache_size_from_dynamo_log(path: &Path) -> u64 {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            tracing::warn!(path = %path.display(), "Failed to open dynamo log: {err}");
            return 0;
        }
    };

    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(path = %path.display(), "Failed to read dynamo log: {err}");
                return 0;
            }
        };
        if !line.contains(MAX_CONCURRENCY_MARKER) {
            continue;
        }

        return match parse_max_concurrency_line(&line) {
            Ok(found) => {
                let size = found.kv_cache_size();
                tracing::info!(
                    "Found KV cache info: {} x {} = {}",
                    found.token_count,
                    found.concurrency,
                    size
                );
                size
            }
            Err(err) => {
                tracing::warn!("Failed to parse KV cache size from line: {line}. Error: {err}");
                0
            }
        };
    }

    tracing::debug!(path = %path.display(), "No KV cache info in dynamo log");
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn log_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[rstest]
    #[case("Maximum concurrency for 2,048 tokens per request: 4.5x", 9216)]
    #[case("INFO [kv_cache_utils.py:634] Maximum concurrency for 32,768 tokens per request: 12.34x", 404357)]
    #[case("Maximum concurrency for 1000 tokens per request: 1x  ", 1000)]
    #[case("Maximum concurrency for 1,000,000 tokens per request: 0.25x", 250000)]
    fn test_parse_max_concurrency_line(#[case] line: &str, #[case] expected: u64) {
        let found = parse_max_concurrency_line(line).unwrap();
        assert_eq!(found.kv_cache_size(), expected);
    }

    #[rstest]
    #[case("Maximum concurrency for lots of tokens")]
    #[case("Maximum concurrency for many tokens per request: 4.5x")]
    #[case("Maximum concurrency for 2048 tokens per request: fastx")]
    #[case("Maximum concurrency for")]
    fn test_parse_max_concurrency_line_rejects(#[case] line: &str) {
        assert!(parse_max_concurrency_line(line).is_err());
    }

    #[test]
    fn test_log_with_match() {
        let file = log_file(
            "INFO starting engine\n\
             INFO [kv_cache_utils.py:634] Maximum concurrency for 2,048 tokens per request: 4.5x\n\
             INFO Maximum concurrency for 10 tokens per request: 1.0x\n",
        );
        assert_eq!(get_kv_cache_size_from_dynamo_log(file.path()), 9216);
    }

    #[test]
    fn test_log_without_match() {
        let file = log_file("INFO starting engine\nINFO ready\n");
        assert_eq!(get_kv_cache_size_from_dynamo_log(file.path()), 0);
    }

    #[test]
    fn test_first_match_malformed_stops_scan() {
        let file = log_file(
            "Maximum concurrency for ??? tokens per request: 4.5x\n\
             Maximum concurrency for 2,048 tokens per request: 4.5x\n",
        );
        assert_eq!(get_kv_cache_size_from_dynamo_log(file.path()), 0);
    }

    #[test]
    fn test_missing_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("dynamo.log");
        assert_eq!(get_kv_cache_size_from_dynamo_log(&missing), 0);
    }
}

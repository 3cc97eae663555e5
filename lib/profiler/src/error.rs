// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while navigating or rewriting a deployment config.
///
/// These cover structural problems with the base config (a service or key the
/// framework expects is not there). Missing optional values such as an absent
/// `--model` flag are never errors; they fall back to a default with a warning.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing key '{0}' in deployment config")]
    MissingKey(String),

    #[error("Expected {expected} at '{path}' in deployment config")]
    UnexpectedType {
        path: String,
        expected: &'static str,
    },

    #[error("Container args at '{0}' must be a string or a list of strings")]
    InvalidArgs(String),

    #[error("Unknown backend '{0}'")]
    UnknownBackend(String),
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

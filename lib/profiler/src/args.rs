// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! Container argument lists.
//!
//! Deployment configs store a container command line as one string, or as a short list of
//! strings, e.g. `["python3 -m dynamo.vllm --model Qwen/Qwen3-0.6B 2>&1 | tee /tmp/vllm.log"]`.
//! [`ArgumentList`] is the tokenized form of that command line. Flags are looked up and edited on
//! the token list, then the list is joined back into the single-string shape the deployment
//! expects.
//!
//! Tokens are split on single spaces with no quoting support, so a flag value that itself contains
//! a space cannot be represented. Consecutive spaces produce empty tokens, which keeps
//! [`ArgumentList::serialize`] an exact inverse of [`ArgumentList::tokenize`].
//!
//! The command line may end in shell plumbing (`| tee ...`, `2>&1`). Everything from the first such
//! control token onwards is the control tail, and new flags are always inserted before it.

use std::fmt;

/// Pipe into another command
pub const PIPE: &str = "|";

/// Redirect stderr into stdout
pub const REDIRECT_STDERR: &str = "2>&1";

const CONTROL_TOKENS: [&str; 2] = [PIPE, REDIRECT_STDERR];

fn is_control_token(token: &str) -> bool {
    CONTROL_TOKENS.contains(&token)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList {
    tokens: Vec<String>,
}

impl ArgumentList {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Split each element on single spaces and concatenate the pieces in order.
    pub fn tokenize<S: AsRef<str>>(args: &[S]) -> Self {
        let tokens = args
            .iter()
            .flat_map(|arg| arg.as_ref().split(' '))
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    /// Tokenize a single command line string.
    pub fn from_command_line(command_line: &str) -> Self {
        Self::tokenize(&[command_line])
    }

    /// Join the tokens with single spaces, wrapped as a one element list.
    pub fn serialize(&self) -> Vec<String> {
        vec![self.to_string()]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn position(&self, token: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t == token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.position(token).is_some()
    }

    /// Index of the earliest control token (`|` or `2>&1`), or the list length when the command
    /// line has no control tail.
    pub fn find_insertion_index(&self) -> usize {
        CONTROL_TOKENS
            .iter()
            .filter_map(|control| self.position(control))
            .min()
            .unwrap_or(self.tokens.len())
    }

    /// Insert one or more tokens, in order, right before the control tail.
    ///
    /// ```
    /// use dynamo_profiler::args::ArgumentList;
    ///
    /// let mut args = ArgumentList::from_command_line("vllm serve 2>&1 | tee out.log");
    /// args.insert(["--tensor-parallel-size", "4"]);
    /// assert_eq!(args.to_string(), "vllm serve --tensor-parallel-size 4 2>&1 | tee out.log");
    /// ```
    pub fn insert<I, S>(&mut self, value: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tail = self.tokens.split_off(self.find_insertion_index());
        self.tokens.extend(value.into_iter().map(Into::into));
        self.tokens.extend(tail);
        self
    }

    /// The token following the first occurrence of `flag`.
    ///
    /// Returns `None` when the flag is absent, is the last token, or is directly followed by a
    /// control token.
    pub fn get_flag_value(&self, flag: &str) -> Option<&str> {
        let idx = self.position(flag)?;
        self.tokens
            .get(idx + 1)
            .map(String::as_str)
            .filter(|value| !is_control_token(value))
    }

    /// Set the value following `flag`, inserting `flag value` before the control tail when the
    /// flag is absent. A flag present without a value gets the value inserted right after it.
    pub fn set_flag_value(&mut self, flag: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.position(flag) {
            Some(idx) => match self.tokens.get_mut(idx + 1) {
                Some(existing) if !is_control_token(existing) => *existing = value,
                _ => self.tokens.insert(idx + 1, value),
            },
            None => {
                self.insert([flag.to_string(), value]);
            }
        }
        self
    }

    /// Remove every occurrence of a boolean flag. Returns whether anything was removed.
    pub fn remove_flag(&mut self, flag: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != flag);
        self.tokens.len() != before
    }

    /// Insert a boolean flag before the control tail unless it is already present.
    /// Returns whether the flag was inserted.
    pub fn ensure_flag(&mut self, flag: &str) -> bool {
        if self.contains(flag) {
            return false;
        }
        self.insert([flag]);
        true
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

impl From<&str> for ArgumentList {
    fn from(command_line: &str) -> Self {
        Self::from_command_line(command_line)
    }
}

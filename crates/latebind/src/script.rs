// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Batch command interpreter driving an object with untyped text tokens.
//!
//! One command per line:
//!
//! ```text
//! open GET http://host/?callback=cb true   # method call, args as text
//! timeout=30                               # property write
//! ?readyState                              # property read
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Every argument
//! reaches the object as a `Text` value, so the handler's declared parameter
//! types decide how it is read.

use crate::dispatch::{Dispatch, DispatchError, DispatchResult, Variant};
use std::fmt;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `name arg1 arg2 ...`
    Call { name: String, args: Vec<String> },
    /// `?name`
    Get(String),
    /// `name=value`
    Put { name: String, value: String },
}

impl Command {
    /// Parse one line. `Ok(None)` for blank and comment lines.
    pub fn parse(line: &str) -> DispatchResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        if let Some(name) = line.strip_prefix('?') {
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(DispatchError::invalid_argument(format!(
                    "malformed property read '{}'",
                    line
                )));
            }
            return Ok(Some(Self::Get(name.to_string())));
        }

        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<String> = tokens.map(str::to_string).collect();

        if args.is_empty() {
            if let Some((name, value)) = head.split_once('=') {
                if name.is_empty() {
                    return Err(DispatchError::invalid_argument(format!(
                        "missing property name in '{}'",
                        line
                    )));
                }
                return Ok(Some(Self::Put {
                    name: name.to_string(),
                    value: value.to_string(),
                }));
            }
        }

        Ok(Some(Self::Call {
            name: head.to_string(),
            args,
        }))
    }

    /// Member the command addresses.
    pub fn name(&self) -> &str {
        match self {
            Self::Call { name, .. } | Self::Put { name, .. } => name,
            Self::Get(name) => name,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call { name, args } if args.is_empty() => write!(f, "{}", name),
            Self::Call { name, args } => write!(f, "{} {}", name, args.join(" ")),
            Self::Get(name) => write!(f, "?{}", name),
            Self::Put { name, value } => write!(f, "{}={}", name, value),
        }
    }
}

/// One executed command and its result.
#[derive(Debug, Clone)]
pub struct Step {
    /// 1-based source line
    pub line: usize,
    pub command: Command,
    pub result: Variant,
}

/// A command that failed to parse or execute.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptError {
    /// 1-based source line
    pub line: usize,
    pub text: String,
    pub error: DispatchError,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: '{}': {}", self.line, self.text, self.error)
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Runs commands against one target object.
pub struct Interpreter<'a> {
    target: &'a dyn Dispatch,
}

impl<'a> Interpreter<'a> {
    pub fn new(target: &'a dyn Dispatch) -> Self {
        Self { target }
    }

    /// Execute a single command.
    pub fn execute(&self, command: &Command) -> DispatchResult<Variant> {
        log::debug!("script: {}", command);
        match command {
            Command::Call { name, args } => {
                let mut values: Vec<Variant> =
                    args.iter().map(|arg| Variant::from(arg.as_str())).collect();
                self.target.call(name, &mut values)
            }
            Command::Get(name) => self.target.get(name),
            Command::Put { name, value } => self
                .target
                .set(name, Variant::from(value.as_str()))
                .map(|()| Variant::Empty),
        }
    }

    /// Parse and execute one line. `Ok(None)` for blank and comment lines.
    pub fn execute_line(&self, line: &str) -> DispatchResult<Option<Variant>> {
        match Command::parse(line)? {
            Some(command) => self.execute(&command).map(Some),
            None => Ok(None),
        }
    }

    /// Run every line of `source`, stopping at the first failure.
    pub fn run(&self, source: &str) -> Result<Vec<Step>, ScriptError> {
        let mut steps = Vec::new();
        for (idx, text) in source.lines().enumerate() {
            let fail = |error| ScriptError {
                line: idx + 1,
                text: text.trim().to_string(),
                error,
            };
            let Some(command) = Command::parse(text).map_err(fail)? else {
                continue;
            };
            let result = self.execute(&command).map_err(fail)?;
            steps.push(Step {
                line: idx + 1,
                command,
                result,
            });
        }
        Ok(steps)
    }
}

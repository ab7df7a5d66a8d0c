// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::RaffleFunction;

/// One parameter of an ABI function.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

/// One entry of a JSON ABI (functions, events, errors, constructor).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
}

/// A contract ABI as emitted by the compiler toolchain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbiDescriptor(Vec<AbiEntry>);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("the ABI does not declare `{0}`")]
    MissingFunction(RaffleFunction),

    #[error("`{function}` must take no arguments, found {found}")]
    UnexpectedInputs { function: RaffleFunction, found: usize },

    #[error("`{function}` is `{found}`, expected one of {expected:?}")]
    WrongMutability {
        function: RaffleFunction,
        expected: &'static [&'static str],
        found: String,
    },

    #[error("`{function}` returns {found:?}, expected `{expected}`")]
    WrongOutput {
        function: RaffleFunction,
        expected: &'static str,
        found: Vec<String>,
    },
}

impl AbiDescriptor {
    pub fn new(entries: Vec<AbiEntry>) -> Self {
        AbiDescriptor(entries)
    }

    pub fn entries(&self) -> &[AbiEntry] {
        &self.0
    }

    pub fn function(&self, name: &str) -> Option<&AbiEntry> {
        self.0
            .iter()
            .find(|entry| entry.kind == "function" && entry.name.as_deref() == Some(name))
    }

    /// Checks that the four raffle functions are present with the expected shape.
    pub fn validate_raffle(&self) -> Result<(), AbiError> {
        RaffleFunction::ALL
            .into_iter()
            .try_for_each(|function| self.validate_function(function))
    }

    fn validate_function(&self, function: RaffleFunction) -> Result<(), AbiError> {
        let entry = self
            .function(function.name())
            .ok_or(AbiError::MissingFunction(function))?;

        if !entry.inputs.is_empty() {
            return Err(AbiError::UnexpectedInputs {
                function,
                found: entry.inputs.len(),
            });
        }

        let expected = function.state_mutability();
        let found = entry.state_mutability.as_deref().unwrap_or("nonpayable");
        if !expected.iter().any(|candidate| *candidate == found) {
            return Err(AbiError::WrongMutability {
                function,
                expected,
                found: found.to_string(),
            });
        }

        if let Some(output) = function.output_type() {
            let found: Vec<String> = entry.outputs.iter().map(|param| param.kind.clone()).collect();
            if found.len() != 1 || found[0] != output {
                return Err(AbiError::WrongOutput {
                    function,
                    expected: output,
                    found,
                });
            }
        }
        Ok(())
    }
}

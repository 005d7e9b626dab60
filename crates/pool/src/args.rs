// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plugin argument normalisation
//!
//! Open requests arrive as a flat `name, arg, name, arg, ...` list, as a
//! single comma separated string, or as one legacy bare pool name.

use crate::registry::Registry;
use lm_core::names::FINDY_LEDGER;
use thiserror::Error;

/// Errors turning open arguments into plugin pairs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("no plugin arguments given")]
    Empty,
    #[error("plugin arguments must come in name/argument pairs, got {0} values")]
    Unpaired(usize),
}

/// Split a single argument string on commas.
///
/// A lone registered plugin name gets an empty argument; a lone unknown
/// name is returned as is for legacy handling.
pub fn convert_plugin_args(arg: &str, registry: &Registry) -> Vec<String> {
    let parts: Vec<String> = arg.split(',').map(str::to_string).collect();
    if parts.len() > 1 {
        tracing::debug!(count = parts.len() / 2, "using plugins from argument string");
        return parts;
    }
    if registry.contains(arg) {
        vec![arg.to_string(), String::new()]
    } else {
        parts
    }
}

/// Map a single bare name to a plugin pair.
///
/// A registered plugin name becomes `(name, "")`; anything else is taken as
/// a pool name for the default real ledger, `(FINDY_LEDGER, name)`. Longer
/// lists pass through untouched.
pub fn build_legacy_plugin_args(names: Vec<String>, registry: &Registry) -> Vec<String> {
    let [name] = names.as_slice() else {
        return names;
    };
    if registry.contains(name) {
        tracing::trace!(plugin = %name, "bare plugin name");
        vec![name.clone(), String::new()]
    } else {
        tracing::trace!(pool = %name, "legacy pool name");
        vec![FINDY_LEDGER.to_string(), name.clone()]
    }
}

/// Normalise open arguments into `(plugin, arg)` pairs
pub fn normalize(args: &[&str], registry: &Registry) -> Result<Vec<(String, String)>, ArgsError> {
    let names = match args {
        [] => return Err(ArgsError::Empty),
        [single] => convert_plugin_args(single, registry),
        many => many.iter().map(|s| s.to_string()).collect(),
    };
    let names = build_legacy_plugin_args(names, registry);

    if names.len() % 2 != 0 {
        return Err(ArgsError::Unpaired(names.len()));
    }
    Ok(names
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect())
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;

// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

const APP_DIR: &str = "helpdesk";

/// Discovered layers, lowest priority first: system, user, then the
/// working directory.
fn discovered_layers() -> Vec<PathBuf> {
    let system = PathBuf::from("/etc").join(APP_DIR).join("config.toml");
    let user = [
        dirs::home_dir().map(|h| h.join(".config")),
        dirs::config_dir(),
    ]
    .into_iter()
    .flatten()
    .map(|dir| dir.join(APP_DIR).join("config.toml"));
    let local = [
        PathBuf::from(format!(".{APP_DIR}/config.toml")),
        PathBuf::from(format!("{APP_DIR}.toml")),
    ];

    let mut layers = vec![system];
    for path in user.chain(local) {
        // ~/.config and the XDG dir coincide on most Linux setups.
        if !layers.contains(&path) {
            layers.push(path);
        }
    }
    layers
}

/// Build the effective [`Config`]: defaults, then every discovered file that
/// exists, then `explicit` (the `--config` flag), which must exist.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let discovered = discovered_layers().into_iter().filter(|p| p.is_file());
    let layers = discovered.chain(explicit.map(Path::to_path_buf));

    let mut merged = toml::Value::Table(toml::map::Map::new());
    for path in layers {
        debug!(path = %path.display(), "config layer");
        overlay(&mut merged, read_layer(&path)?);
    }
    merged
        .try_into()
        .context("config does not match the expected schema")
}

fn read_layer(path: &Path) -> anyhow::Result<toml::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Lay `top` over `base`.  Tables merge key by key; any other value,
/// arrays included, replaces what was there.
fn overlay(base: &mut toml::Value, top: toml::Value) {
    if let (toml::Value::Table(base_t), toml::Value::Table(top_t)) = (&mut *base, &top) {
        for (key, value) in top_t.clone() {
            match base_t.get_mut(&key) {
                Some(existing) => overlay(existing, value),
                None => {
                    base_t.insert(key, value);
                }
            }
        }
        return;
    }
    *base = top;
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config file resolution.

use std::path::{Path, PathBuf};

use polybot_core::AppConfig;
use polybot_core::error::Result;
use tracing::{debug, warn};

const CONFIG_FILE: &str = "config.json";

/// Default location of the config file: `$XDG_CONFIG_HOME/polybot/config.json`,
/// falling back to `~/.config/polybot/config.json`.
pub fn default_config_path() -> PathBuf {
    config_base().join("polybot").join(CONFIG_FILE)
}

fn config_base() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}

/// Load configuration.
///
/// An explicitly requested file must exist and parse. The default location is
/// optional: a missing or broken file falls back to defaults with a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        return AppConfig::load(path);
    }

    let path = default_config_path();
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    match AppConfig::load(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            Ok(AppConfig::default())
        }
    }
}

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    scenarios: HashMap<String, String>,
    #[serde(rename = "easing-tables")]
    easing_tables: HashMap<String, EasingEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EasingEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        tolerance: Option<f32>,
    },
}

impl EasingEntry {
    fn as_path(&self) -> &str {
        match self {
            EasingEntry::Path(path) => path,
            EasingEntry::Detailed { path, .. } => path,
        }
    }

    fn tolerance(&self) -> Option<f32> {
        match self {
            EasingEntry::Path(_) => None,
            EasingEntry::Detailed { tolerance, .. } => *tolerance,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Frame-by-frame tween scenarios: requests, per-frame deltas and the
/// transforms expected after each frame.
pub mod scenarios {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.scenarios.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.scenarios, "scenario", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.scenarios, "scenario", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.scenarios, "scenario", name)?;
        Ok(resolve_path(rel))
    }
}

/// Reference values for the easing curves.
pub mod easing_tables {
    use super::*;

    /// Used when the manifest entry does not name a tolerance.
    pub const DEFAULT_TOLERANCE: f32 = 1e-4;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.easing_tables.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.easing_tables, "easing table", name)?;
        super::load_json(entry.as_path())
    }

    pub fn tolerance(name: &str) -> Result<f32> {
        let entry = lookup(&MANIFEST.easing_tables, "easing table", name)?;
        Ok(entry.tolerance().unwrap_or(DEFAULT_TOLERANCE))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.easing_tables, "easing table", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}

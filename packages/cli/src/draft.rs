//! Draft files for the create/update commands.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use admin::forms::RoundDraft;
use common::CriteriaId;

/// Round draft plus the ids of the criteria to attach.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoundFile {
    #[serde(flatten)]
    pub draft: RoundDraft,
    #[serde(default)]
    pub criteria: Vec<CriteriaId>,
}

/// Read `path` as TOML when it ends in `.toml`, JSON otherwise.
pub(crate) fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(path, &text)
}

fn parse<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str(text).with_context(|| format!("Invalid TOML draft {}", path.display()))
    } else {
        serde_json::from_str(text).with_context(|| format!("Invalid JSON draft {}", path.display()))
    }
}

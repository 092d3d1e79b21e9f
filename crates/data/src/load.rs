use crate::validate::{validate_config, validate_content};
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use warlatro_core::{Content, GameConfig, JokerDef};

pub const CONFIG_FILE: &str = "config.json";
pub const JOKERS_FILE: &str = "jokers.json";

const BUILTIN_CONFIG: &str = include_str!("../../../assets/config.json");
const BUILTIN_JOKERS: &str = include_str!("../../../assets/jokers.json");

pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let config: GameConfig = load_json(dir.join(CONFIG_FILE))?;
    validate_config(&config).with_context(|| format!("validate {}", CONFIG_FILE))?;
    Ok(config)
}

pub fn load_content(dir: &Path) -> anyhow::Result<Content> {
    let jokers: Vec<JokerDef> = load_json(dir.join(JOKERS_FILE))?;
    let content = Content { jokers };
    validate_content(&content).with_context(|| format!("validate {}", JOKERS_FILE))?;
    Ok(content)
}

/// The assets compiled into the binary.
pub fn builtin_config() -> anyhow::Result<GameConfig> {
    let config: GameConfig =
        serde_json::from_str(BUILTIN_CONFIG).context("parse builtin config")?;
    validate_config(&config).context("validate builtin config")?;
    Ok(config)
}

pub fn builtin_content() -> anyhow::Result<Content> {
    let jokers: Vec<JokerDef> =
        serde_json::from_str(BUILTIN_JOKERS).context("parse builtin jokers")?;
    let content = Content { jokers };
    validate_content(&content).context("validate builtin jokers")?;
    Ok(content)
}

/// Loads from `dir` when given, otherwise falls back to the builtin assets.
pub fn load_assets(dir: Option<&Path>) -> anyhow::Result<(GameConfig, Content)> {
    match dir {
        Some(dir) => Ok((load_game_config(dir)?, load_content(dir)?)),
        None => Ok((builtin_config()?, builtin_content()?)),
    }
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

use crate::constants::DEFAULT_LISTEN_PORT;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub listen_port: u16,
    pub invert_lx: bool,
    pub invert_ly: bool,
    pub invert_rx: bool,
    pub invert_ry: bool,
    pub deadzone_lstick: f32,
    pub deadzone_rstick: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_LISTEN_PORT,
            invert_lx: false,
            invert_ly: false,
            invert_rx: false,
            invert_ry: false,
            deadzone_lstick: 0.10, // 10%
            deadzone_rstick: 0.10, // 10%
        }
    }
}

fn config_path() -> io::Result<PathBuf> {
    ProjectDirs::from("com", "DsuBridge", "DsuBridge")
        .map(|d| d.config_dir().join("config.toml"))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Could not determine config dir"))
}

impl AppConfig {
    pub fn load() -> io::Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let txt = fs::read_to_string(&path)?;
        toml::from_str(&txt).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("TOML parse error: {e}"))
        })
    }

    pub fn save(&self) -> io::Result<()> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let toml =
            toml::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(path, toml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg: AppConfig = toml::from_str("listen_port = 26761").unwrap();
        assert_eq!(cfg.listen_port, 26761);
        assert_eq!(cfg.deadzone_lstick, 0.10);
        assert!(!cfg.invert_ly);
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = AppConfig::default();
        let txt = toml::to_string_pretty(&cfg).unwrap();
        let back: AppConfig = toml::from_str(&txt).unwrap();
        assert_eq!(back.listen_port, DEFAULT_LISTEN_PORT);
    }
}

use crate::permission::{Capability, RefreshPolicy};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_sound_clip")]
    pub sound_clip: String,

    #[serde(default = "default_camera_command")]
    pub camera_command: String,

    #[serde(default)]
    pub pictures_dir: Option<String>,

    #[serde(default = "default_preview_images")]
    pub preview_images: bool,

    #[serde(default = "default_camera_policy")]
    pub camera_policy: RefreshPolicy,

    #[serde(default = "default_gallery_policy")]
    pub gallery_policy: RefreshPolicy,
}

fn default_sound_clip() -> String {
    "instrumental.mp3".to_string()
}

fn default_camera_command() -> String {
    "fswebcam --no-banner -r 1280x960 --jpeg 85 {output}".to_string()
}

fn default_preview_images() -> bool {
    true
}

fn default_camera_policy() -> RefreshPolicy {
    RefreshPolicy::CheckEveryCall
}

fn default_gallery_policy() -> RefreshPolicy {
    RefreshPolicy::CacheOnceAtInit
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sound_clip: default_sound_clip(),
            camera_command: default_camera_command(),
            pictures_dir: None,
            preview_images: default_preview_images(),
            camera_policy: default_camera_policy(),
            gallery_policy: default_gallery_policy(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/snapjam/config.json)
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("snapjam").join("config.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sound_clip.is_empty() {
            return Err(anyhow::anyhow!("sound_clip cannot be empty"));
        }

        if !self.camera_command.contains("{output}") {
            return Err(anyhow::anyhow!(
                "camera_command must contain the {{output}} placeholder"
            ));
        }

        Ok(())
    }

    /// Directory where camera shots land and the gallery probe looks.
    pub fn pictures_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.pictures_dir {
            return Ok(PathBuf::from(dir));
        }
        if let Ok(dir) = std::env::var("XDG_PICTURES_DIR") {
            return Ok(PathBuf::from(dir));
        }
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join("Pictures"))
    }

    pub fn permission_policies(&self) -> HashMap<Capability, RefreshPolicy> {
        let mut policies = HashMap::new();
        policies.insert(Capability::Camera, self.camera_policy);
        policies.insert(Capability::GalleryRead, self.gallery_policy);
        policies
    }
}

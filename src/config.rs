// App settings, read from an optional JSON file.
// Without a file you get: camera 0 at 1280x720/30fps, a 1280x720 window,
// and the built-in six-product catalog.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::camera::StreamRequest;
use crate::error::Error;

/// Environment variable naming the config file (the first CLI argument wins).
pub const CONFIG_ENV: &str = "AR_COMMERCE_CONFIG";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub camera: StreamRequest,
    pub window: WindowConfig,
    pub products: Products,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "AR Commerce".into(), width: 1280, height: 720 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    pub name: String,
    pub price: String,
    /// Optional thumbnail; a drawn placeholder is used when missing or unreadable.
    #[serde(default)]
    pub image: Option<PathBuf>,
}

impl Product {
    fn new(name: &str, price: &str) -> Self {
        Self { name: name.into(), price: price.into(), image: None }
    }
}

/// Product catalog shown in the page grid.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Products(pub Vec<Product>);

impl Default for Products {
    fn default() -> Self {
        Self(vec![
            Product::new("Smart Watch", "$299"),
            Product::new("Headphones", "$199"),
            Product::new("Sunglasses", "$149"),
            Product::new("Sneakers", "$129"),
            Product::new("Desk Lamp", "$89"),
            Product::new("Backpack", "$79"),
        ])
    }
}

impl Config {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or return validated defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        let config = Self::from_json(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::Config("window size must be non-zero".into()));
        }
        if self.camera.width == 0 || self.camera.height == 0 || self.camera.fps == 0 {
            return Err(Error::Config("camera width, height and fps must be non-zero".into()));
        }
        if self.products.0.is_empty() {
            return Err(Error::Config("product catalog is empty".into()));
        }
        Ok(())
    }
}

/// Config path from the first CLI argument, else from `AR_COMMERCE_CONFIG`.
pub fn config_path(mut args: impl Iterator<Item = String>, env: Option<String>) -> Option<PathBuf> {
    args.nth(1).or(env).filter(|s| !s.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera, StreamRequest { index: 0, width: 1280, height: 720, fps: 30 });
        assert_eq!(config.products.0.len(), 6);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = Config::from_json(r#"{ "camera": { "index": 2 } }"#).unwrap();
        assert_eq!(config.camera.index, 2);
        assert_eq!(config.camera.width, 1280);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn catalog_from_json() {
        let config = Config::from_json(
            r#"{ "products": [ { "name": "Mug", "price": "$9", "image": "mug.png" } ] }"#,
        )
        .unwrap();
        assert_eq!(config.products.0.len(), 1);
        assert_eq!(config.products.0[0].image.as_deref(), Some(Path::new("mug.png")));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_json(r#"{ "camera": { "facing": "environment" } }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn zero_sizes_and_empty_catalog_fail_validation() {
        assert!(Config::from_json(r#"{ "window": { "width": 0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "camera": { "fps": 0 } }"#).is_err());
        assert!(Config::from_json(r#"{ "products": [] }"#).is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn cli_argument_beats_environment() {
        let args = ["ar-commerce".to_string(), "a.json".to_string()].into_iter();
        assert_eq!(config_path(args, Some("b.json".into())), Some(PathBuf::from("a.json")));
        let args = ["ar-commerce".to_string()].into_iter();
        assert_eq!(config_path(args, Some("b.json".into())), Some(PathBuf::from("b.json")));
        let args = ["ar-commerce".to_string()].into_iter();
        assert_eq!(config_path(args, None), None);
    }
}

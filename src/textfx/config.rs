//! Configuration
//!
//!     `defaults/textfx.default.toml` is embedded into the crate and is always the bottom
//!     layer. Applications add their own files or single-key overrides on top through
//!     [Loader], then deserialize into [TextFxConfig]:
//!
//!         let config = Loader::new()
//!             .with_optional_file("textfx.toml")
//!             .set_override("writer.delay", 0.05)?
//!             .build()?;
//!         let pipeline = EffectPipeline::from_config(&config)?;
//!
//!     Tag tables are keyed by family name (`animations`, `show`, `hide`, `commands`,
//!     `events`) and tag name. In `params` and `required`, the key `default` stands for the
//!     bare leading value of a tag.

use crate::textfx::error::ConfigError;
use crate::textfx::parameters::ParamKind;
use crate::textfx::processing::{PreprocessOptions, Style, StyleSheet};
use crate::textfx::registry::{StaticRegistry, TagSpec};
use crate::textfx::tags::{TagPrefix, TagType};
use crate::textfx::wave::{Wave, WaveConfig};
use crate::textfx::writer::WriterConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/textfx.default.toml");

/// Config spelling of the empty parameter key.
const DEFAULT_PARAM_KEY: &str = "default";

#[derive(Debug, Clone, Deserialize)]
pub struct TextFxConfig {
    pub preprocess: PreprocessOptions,
    pub writer: WriterConfig,
    pub wave: WaveConfig,
    pub tags: TagsConfig,
    #[serde(default)]
    pub styles: HashMap<String, Style>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Families accepting any tag name, as empty tags with any parameters.
    pub open_families: Vec<String>,
    pub animations: HashMap<String, TagSpecConfig>,
    pub show: HashMap<String, TagSpecConfig>,
    pub hide: HashMap<String, TagSpecConfig>,
    pub commands: HashMap<String, TagSpecConfig>,
    pub events: HashMap<String, TagSpecConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagSpecConfig {
    #[serde(rename = "type")]
    pub tag_type: TagType,
    #[serde(default)]
    pub params: HashMap<String, ParamKind>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl TagsConfig {
    fn family(&self, prefix: TagPrefix) -> &HashMap<String, TagSpecConfig> {
        match prefix {
            TagPrefix::None => &self.animations,
            TagPrefix::Show => &self.show,
            TagPrefix::Hide => &self.hide,
            TagPrefix::Command => &self.commands,
            TagPrefix::Event => &self.events,
        }
    }
}

fn param_key(key: &str) -> String {
    if key == DEFAULT_PARAM_KEY {
        String::new()
    } else {
        key.to_string()
    }
}

impl TagSpecConfig {
    fn to_spec(&self, name: &str) -> Result<TagSpec, ConfigError> {
        let mut params: Vec<(&String, &ParamKind)> = self.params.iter().collect();
        params.sort_by(|a, b| a.0.cmp(b.0));
        let mut spec = params
            .into_iter()
            .fold(TagSpec::new(self.tag_type), |spec, (key, kind)| {
                spec.param(param_key(key), *kind)
            });
        for key in &self.required {
            if !self.params.contains_key(key) {
                return Err(ConfigError::UndeclaredRequired {
                    tag: name.to_string(),
                    param: key.clone(),
                });
            }
            spec = spec.require(param_key(key));
        }
        Ok(spec)
    }
}

impl TextFxConfig {
    /// Registry with every configured tag.
    pub fn registry(&self) -> Result<StaticRegistry, ConfigError> {
        let mut registry = StaticRegistry::new();
        for family in &self.tags.open_families {
            let prefix = TagPrefix::from_family_name(family)
                .ok_or_else(|| ConfigError::UnknownFamily(family.clone()))?;
            registry = registry.with_open_family(prefix);
        }
        for prefix in TagPrefix::ALL {
            for (name, spec) in self.tags.family(prefix) {
                registry.insert(prefix, name.clone(), spec.to_spec(name)?);
            }
        }
        Ok(registry)
    }

    /// The `[wave]` section as a validated wave.
    pub fn base_wave(&self) -> Result<Wave, ConfigError> {
        Ok(Wave::new(self.wave)?)
    }

    pub fn style_sheet(&self) -> StyleSheet {
        self.styles
            .iter()
            .map(|(name, style)| (name.clone(), style.clone()))
            .collect()
    }
}

/// Layers configuration sources over the embedded defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, for configuration shipped inside an application.
    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<TextFxConfig, ConfigError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TextFxConfig, ConfigError> {
    Loader::new().build()
}

//! Configuration document
//!
//! ```yaml
//! dotfiles:
//!   links:
//!     $HOME/.bashrc: $HOME/dotfiles/.bashrc
//! ```
//!
//! A flat mapping of links at the top level is accepted as well.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::interpolate::{InterpolationContext, interpolate_value};
use crate::mapping::LinkMapping;
use crate::{Error, Result};

/// Top-level key of the structured form
const DOTFILES_KEY: &str = "dotfiles";

/// Links written to a freshly created configuration file
pub const DEFAULT_LINKS: &[(&str, &str)] = &[
    ("$HOME/.bashrc", "$HOME/dotfiles/.bashrc"),
    ("$HOME/.zshrc", "$HOME/dotfiles/.zshrc"),
    ("$HOME/.config/nvim", "$HOME/dotfiles/nvim"),
    ("$HOME/.config/alacritty", "$HOME/dotfiles/alacritty"),
    ("$HOME/.gitconfig", "$HOME/dotfiles/.gitconfig"),
    ("$HOME/.tmux.conf", "$HOME/dotfiles/.tmux.conf"),
];

/// Dotfiles section of the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotfilesConfig {
    /// Mapping of symlink locations to the paths they point at
    #[serde(default)]
    pub links: LinkMapping,
}

/// Root configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dotfiles: DotfilesConfig,
}

impl Config {
    /// Build a configuration from an already interpolated YAML value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] if the value is neither the
    /// structured form nor a flat mapping of strings.
    pub fn from_value(value: Value) -> Result<Self> {
        let structured = match &value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping.contains_key(DOTFILES_KEY),
            _ => {
                return Err(Error::config_invalid(
                    "configuration must be a mapping",
                ));
            }
        };

        if structured {
            serde_yaml::from_value(value).map_err(|e| Error::config_invalid(e.to_string()))
        } else {
            let links: LinkMapping =
                serde_yaml::from_value(value).map_err(|e| Error::config_invalid(e.to_string()))?;
            Ok(Self {
                dotfiles: DotfilesConfig { links },
            })
        }
    }

    /// Parse and interpolate YAML text.
    pub fn parse(content: &str, ctx: &InterpolationContext) -> Result<Self> {
        let raw: Value =
            serde_yaml::from_str(content).map_err(|e| Error::config_invalid(e.to_string()))?;
        Self::from_value(interpolate_value(raw, ctx)?)
    }

    /// Load, interpolate and validate the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if the file does not exist and
    /// [`Error::ConfigParse`] if it is not valid YAML.
    pub fn load(path: &Path, ctx: &InterpolationContext) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Fs(dk_fs::Error::io(path, e))
            }
        })?;

        let raw: Value = serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Self::from_value(interpolate_value(raw, ctx)?)
    }

    /// The configuration written when none exists yet, uninterpolated
    pub fn default_document() -> Self {
        let links = LinkMapping::from_pairs(DEFAULT_LINKS.iter().copied())
            .unwrap_or_default();
        Self {
            dotfiles: DotfilesConfig { links },
        }
    }

    /// Declared links
    pub fn links(&self) -> &LinkMapping {
        &self.dotfiles.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx() -> InterpolationContext {
        InterpolationContext::new().with_var("HOME", "/home/user")
    }

    #[test]
    fn test_parse_structured_form() {
        let yaml = r#"
dotfiles:
  links:
    $HOME/.bashrc: $HOME/dotfiles/.bashrc
    $HOME/.vimrc: $HOME/dotfiles/.vimrc
"#;
        let config = Config::parse(yaml, &ctx()).unwrap();

        assert_eq!(config.links().len(), 2);
        assert_eq!(
            config.links().get("/home/user/.bashrc"),
            Some("/home/user/dotfiles/.bashrc")
        );
    }

    #[test]
    fn test_parse_flat_form() {
        let yaml = "$HOME/.bashrc: $HOME/dotfiles/.bashrc\n$HOME/.vimrc: $HOME/dotfiles/.vimrc\n";
        let config = Config::parse(yaml, &ctx()).unwrap();

        assert_eq!(
            config.links().get("/home/user/.vimrc"),
            Some("/home/user/dotfiles/.vimrc")
        );
    }

    #[test]
    fn test_unknown_sections_are_ignored() {
        let yaml = r#"
dotfiles:
  links:
    /a: /b
  obfuscate:
    file_names: []
"#;
        let config = Config::parse(yaml, &ctx()).unwrap();
        assert_eq!(config.links().len(), 1);
    }

    #[test]
    fn test_empty_document_is_empty_config() {
        let config = Config::parse("", &ctx()).unwrap();
        assert!(config.links().is_empty());
    }

    #[test]
    fn test_scalar_document_is_invalid() {
        let err = Config::parse("just a string", &ctx()).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_non_string_target_is_invalid() {
        let err = Config::parse("dotfiles:\n  links:\n    /a: [1, 2]\n", &ctx()).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_default_document_roundtrips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default_document()).unwrap();
        assert!(yaml.starts_with("dotfiles:\n  links:\n"));

        let config = Config::parse(&yaml, &ctx()).unwrap();
        assert_eq!(config.links().len(), DEFAULT_LINKS.len());
        assert_eq!(
            config.links().get("/home/user/.gitconfig"),
            Some("/home/user/dotfiles/.gitconfig")
        );
    }
}

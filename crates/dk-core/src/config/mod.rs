//! Configuration loading
//!
//! - **locator**: find the configuration file, or create a default one
//! - **manifest**: the configuration document and its link mapping
//! - **interpolate**: expand environment variables in every key and value

mod interpolate;
mod locator;
mod manifest;

pub use interpolate::{InterpolationContext, PROJECT_ROOT_VAR, interpolate, interpolate_value};
pub use locator::{
    APP_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, ConfigLocator, PROJECT_CONFIG_NAMES,
    WORKING_DIR_CONFIG_NAMES,
};
pub use manifest::{Config, DEFAULT_LINKS, DotfilesConfig};

//! Command implementations for dk-cli

pub mod apply;
pub mod info;
pub mod status;

pub use apply::run_apply;
pub use info::{APP_NAME, run_app_author, run_app_name, run_config_path, run_version};
pub use status::run_status;

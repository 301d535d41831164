//! Default configuration values and platform-specific paths.

use directories::ProjectDirs;
use std::path::PathBuf;

pub const DEFAULT_CORS_ENABLED: bool = true;
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 3000;

const PROJECT_QUALIFIER: &str = "org";
const PROJECT_ORGANIZATION: &str = "wallet";
const PROJECT_APPLICATION: &str = "wallet-api";

/// Returns the platform-specific user data directory holding the wallet database.
pub fn default_data_dir_path() -> Option<PathBuf> {
    ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORGANIZATION, PROJECT_APPLICATION)
        .map(|dirs| dirs.data_dir().to_path_buf())
}

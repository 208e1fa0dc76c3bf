// ScopeTrace - app/profiles.rs
//
// Loads options profiles (TOML dialect descriptions) from disk and feeds
// their content to the core compilation step.

use crate::core::options::{self, ParseOptions};
use crate::util::constants;
use crate::util::error::ProfileError;
use std::path::Path;

/// Load and compile an options profile from a TOML file.
pub fn load_profile(path: &Path) -> Result<ParseOptions, ProfileError> {
    let path_buf = path.to_path_buf();

    let metadata = std::fs::metadata(path).map_err(|e| ProfileError::Io {
        path: path_buf.clone(),
        source: e,
    })?;
    if metadata.len() > constants::MAX_PROFILE_FILE_SIZE {
        return Err(ProfileError::FileTooLarge {
            path: path_buf,
            size: metadata.len(),
            max_size: constants::MAX_PROFILE_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ProfileError::Io {
        path: path_buf.clone(),
        source: e,
    })?;

    let options = options::parse_options_toml(&content, &path_buf)
        .and_then(|def| options::compile(def, &path_buf))?;

    tracing::info!(profile = %path.display(), "Options profile loaded");
    Ok(options)
}

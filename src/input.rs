//! Line-delimited input lists (websites and keywords)

use crate::ScoutError;
use std::path::Path;

/// Loads a line-delimited list
///
/// Each line is trimmed and blank lines are dropped; order is preserved.
/// A list that cannot be read is fatal for the run.
///
/// # Arguments
///
/// * `path` - Path to the list file
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The non-blank entries in file order
/// * `Err(ScoutError::Input)` - The file could not be read
pub fn load_list(path: &Path) -> Result<Vec<String>, ScoutError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScoutError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_list(&content))
}

/// Splits list content into trimmed, non-blank entries
pub fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

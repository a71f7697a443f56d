//! Ghost descriptor reading
//!
//! A ghost directory carries a `descript.txt` of comma-separated
//! `key,value` lines describing the persona installed there. The bridge
//! reads it when a ghost is attached; hosts can use it for listings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShioriError};

/// Descriptor file name inside a ghost directory
pub const DESCRIPT_FILE: &str = "descript.txt";

/// Metadata describing an installed ghost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostInfo {
    /// Ghost name
    pub name: String,
    /// Directory the ghost was read from
    pub path: PathBuf,
    /// Author, from the `craftman` key
    pub craftman: Option<String>,
    /// Version string, as written in the descriptor
    pub version: Option<String>,
    /// Main character name, from the `sakura.name` key
    pub sakura_name: Option<String>,
}

impl GhostInfo {
    /// Read and parse `descript.txt` from a ghost directory.
    ///
    /// A missing descriptor is an error; callers that treat it as
    /// optional decide that themselves.
    pub fn from_directory(dir: &Path) -> Result<Self> {
        let descript_path = dir.join(DESCRIPT_FILE);
        let content = std::fs::read_to_string(&descript_path)?;
        Self::parse(&content, dir)
    }

    /// Parse descriptor content for the given directory
    pub fn parse(content: &str, dir: &Path) -> Result<Self> {
        let mut name = None;
        let mut craftman = None;
        let mut version = None;
        let mut sakura_name = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }

            let Some((key, value)) = line.split_once(',') else {
                continue;
            };

            match key.trim() {
                "name" => name = Some(value.trim().to_string()),
                "craftman" => craftman = Some(value.trim().to_string()),
                "version" => version = Some(value.trim().to_string()),
                "sakura.name" => sakura_name = Some(value.trim().to_string()),
                _ => {}
            }
        }

        let name = name.ok_or_else(|| {
            ShioriError::ParseError(format!("descriptor in {dir:?} has no name"))
        })?;

        Ok(Self {
            name,
            path: dir.to_path_buf(),
            craftman,
            version,
            sakura_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
// sample ghost
name,Nanai
craftman,someone
version,1.2.0
sakura.name,Nanai
shiori,yaya.dll
";

    #[test]
    fn test_parse_descriptor() {
        let info = GhostInfo::parse(SAMPLE, Path::new("/ghosts/nanai")).unwrap();
        assert_eq!(info.name, "Nanai");
        assert_eq!(info.craftman.as_deref(), Some("someone"));
        assert_eq!(info.version.as_deref(), Some("1.2.0"));
        assert_eq!(info.sakura_name.as_deref(), Some("Nanai"));
    }

    #[test]
    fn test_parse_requires_name() {
        let result = GhostInfo::parse("craftman,someone\n", Path::new("/tmp"));
        assert!(matches!(result, Err(ShioriError::ParseError(_))));
    }

    #[test]
    fn test_from_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(DESCRIPT_FILE), SAMPLE).unwrap();

        let info = GhostInfo::from_directory(dir.path()).unwrap();
        assert_eq!(info.name, "Nanai");
        assert_eq!(info.path, dir.path());
    }

    #[test]
    fn test_missing_descriptor_is_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            GhostInfo::from_directory(dir.path()),
            Err(ShioriError::Io(_))
        ));
    }
}

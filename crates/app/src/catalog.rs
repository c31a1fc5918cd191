use std::fmt;
use std::path::{Path, PathBuf};

use tutor_core::model::CatalogDraft;

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.json");

#[derive(Debug)]
pub enum CatalogLoadError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { origin: String, source: serde_json::Error },
}

impl fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogLoadError::Read { path, source } => {
                write!(f, "cannot read catalog {}: {source}", path.display())
            }
            CatalogLoadError::Parse { origin, source } => {
                write!(f, "invalid catalog {origin}: {source}")
            }
        }
    }
}

impl std::error::Error for CatalogLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogLoadError::Read { source, .. } => Some(source),
            CatalogLoadError::Parse { source, .. } => Some(source),
        }
    }
}

/// Load lesson content from `path`, or the catalog shipped with the binary.
pub fn load(path: Option<&Path>) -> Result<CatalogDraft, CatalogLoadError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse(&raw, &path.display().to_string())
        }
        None => parse(BUILTIN_CATALOG, "(built-in)"),
    }
}

fn parse(raw: &str, origin: &str) -> Result<CatalogDraft, CatalogLoadError> {
    let draft: CatalogDraft =
        serde_json::from_str(raw).map_err(|source| CatalogLoadError::Parse {
            origin: origin.to_string(),
            source,
        })?;
    tracing::debug!(origin, groups = draft.groups.len(), "catalog loaded");
    Ok(draft)
}

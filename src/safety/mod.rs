use std::path::{Component, Path, PathBuf};

use crate::errors::FreshError;

/// Join a model-supplied relative path onto `root`, refusing anything that
/// could land outside it (absolute paths, `..`, drive prefixes).
pub fn resolve_within(root: &Path, candidate: &str) -> Result<PathBuf, FreshError> {
    let rel = Path::new(candidate);
    let reject = |message: &str| FreshError::UnsafePath {
        target: candidate.to_string(),
        message: message.to_string(),
    };

    if candidate.trim().is_empty() {
        return Err(reject("empty path"));
    }
    let mut normal = 0usize;
    for c in rel.components() {
        match c {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            Component::ParentDir => return Err(reject("path escapes the project root")),
            Component::RootDir | Component::Prefix(_) => return Err(reject("absolute paths are not allowed")),
        }
    }
    if normal == 0 {
        return Err(reject("path names no file"));
    }
    Ok(root.join(rel))
}

//! Local-to-remote path mapping.
//!
//! Remote paths are always rendered with forward slashes, whatever the
//! local platform separator is. Two equal relative paths under the same
//! roots always map to the same remote path.

use anyhow::{anyhow, Result};
use std::path::Path;

/// Map a local path under `local_root` onto `remote_root`.
///
/// `map_remote(root, root, remote)` yields `remote` unchanged.
pub fn map_remote(local_root: &Path, path: &Path, remote_root: &str) -> Result<String> {
    let relative = path.strip_prefix(local_root).map_err(|_| {
        anyhow!(
            "{} is not under local root {}",
            path.display(),
            local_root.display()
        )
    })?;

    let mut mapped = remote_root.to_string();
    for component in relative.components() {
        if !mapped.is_empty() && !mapped.ends_with('/') {
            mapped.push('/');
        }
        mapped.push_str(&component.as_os_str().to_string_lossy());
    }
    Ok(mapped)
}

/// Path relative to the local root, with forward slashes.
pub fn relative_local(local_root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(local_root).map_err(|_| {
        anyhow!(
            "{} is not under local root {}",
            path.display(),
            local_root.display()
        )
    })?;

    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Parent of a slash-separated remote path.
///
/// Stops at the root sentinel: the parent of `/srv` is `/`, the parent of
/// a bare name is the empty string.
pub fn remote_parent(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) => "/",
        Some((parent, _)) => parent,
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_root_maps_to_remote_root() {
        let root = PathBuf::from("/home/ci/dist");
        assert_eq!(map_remote(&root, &root, "/srv/app").unwrap(), "/srv/app");
    }

    #[test]
    fn test_nested_path_joins_with_forward_slashes() {
        let root = PathBuf::from("/home/ci/dist");
        let path = root.join("assets").join("logo.png");
        assert_eq!(
            map_remote(&root, &path, "/srv/app").unwrap(),
            "/srv/app/assets/logo.png"
        );
    }

    #[test]
    fn test_remote_root_slash_does_not_double() {
        let root = PathBuf::from("/dist");
        let path = root.join("index.html");
        assert_eq!(map_remote(&root, &path, "/").unwrap(), "/index.html");
    }

    #[test]
    fn test_path_outside_root_is_rejected() {
        let root = PathBuf::from("/home/ci/dist");
        let path = PathBuf::from("/etc/passwd");
        assert!(map_remote(&root, &path, "/srv/app").is_err());
    }

    #[test]
    fn test_relative_local() {
        let root = PathBuf::from("/home/ci/dist");
        let path = root.join("assets").join("logo.png");
        assert_eq!(relative_local(&root, &path).unwrap(), "assets/logo.png");
        assert_eq!(relative_local(&root, &root).unwrap(), "");
    }

    #[test]
    fn test_remote_parent_chain() {
        assert_eq!(remote_parent("/srv/app/assets"), "/srv/app");
        assert_eq!(remote_parent("/srv"), "/");
        assert_eq!(remote_parent("a/b"), "a");
        assert_eq!(remote_parent("a"), "");
    }
}

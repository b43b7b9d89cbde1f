//! Root-relative path computation and the byte form paths are stored in.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Raw bytes of `path` as stored in an index.
///
/// On unix every path has a byte form, so names that are not UTF-8 are kept
/// exactly. Elsewhere paths must be valid Unicode; `None` otherwise.
#[cfg(unix)]
pub fn path_bytes(path: &Path) -> Option<Cow<'_, [u8]>> {
    use std::os::unix::ffi::OsStrExt;
    Some(Cow::Borrowed(path.as_os_str().as_bytes()))
}

#[cfg(not(unix))]
pub fn path_bytes(path: &Path) -> Option<Cow<'_, [u8]>> {
    path.to_str().map(|s| Cow::Borrowed(s.as_bytes()))
}

/// Inverse of [`path_bytes`].
#[cfg(unix)]
pub fn path_from_bytes(bytes: Vec<u8>) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStringExt;
    Some(PathBuf::from(std::ffi::OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
pub fn path_from_bytes(bytes: Vec<u8>) -> Option<PathBuf> {
    String::from_utf8(bytes).ok().map(PathBuf::from)
}

/// Compute `path` relative to `root` in stored byte form, components joined
/// with `/` regardless of platform.
///
/// The prefix is removed component-wise, so `/data/a` is never treated as a
/// prefix of `/data/ab/file`. Returns `None` when `path` does not live under
/// `root`, equals `root`, or has a component with no byte form.
pub fn relative_path(root: &Path, path: &Path) -> Option<Vec<u8>> {
    let rest = path.strip_prefix(root).ok()?;
    let mut rel = Vec::new();
    for component in rest.components() {
        match component {
            Component::Normal(part) => {
                if !rel.is_empty() {
                    rel.push(b'/');
                }
                rel.extend_from_slice(&path_bytes(Path::new(part))?);
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    if rel.is_empty() {
        return None;
    }
    Some(rel)
}

//! Guard for the public FTP folder.
//!
//! A requested name is served only when all of these hold, checked in order:
//!
//! 1. the raw name contains no `/`
//! 2. after removing null bytes, its extension is allow-listed
//! 3. resolved against the folder root, it stays inside the root
//!
//! Null bytes are stripped before steps 2 and 3, so a name such as
//! `"package.json.bak\0.md"` is judged by what it becomes after stripping.
//!
//! Independently of the verdict, [`observe_file_request`] reports names that
//! indicate a known exploit to the challenge registry.

use std::borrow::Cow;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use juice_shop_core::ChallengeKey;

use super::challenges::ChallengeRegistry;

/// Extensions the folder will serve, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 2] = [".md", ".pdf"];

/// Reason a file request was refused. The message is the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FileAccessError {
    #[error("File names cannot contain forward slashes!")]
    ForwardSlash,
    #[error("Invalid file type.")]
    InvalidFileType,
    #[error("Access to the requested file path is forbidden.")]
    OutsideRoot,
}

/// Refuse raw names containing a forward slash, before any normalization.
///
/// # Errors
///
/// Returns `FileAccessError::ForwardSlash` if `raw` contains `/`.
pub fn reject_slashes(raw: &str) -> Result<(), FileAccessError> {
    if raw.contains('/') {
        Err(FileAccessError::ForwardSlash)
    } else {
        Ok(())
    }
}

/// Remove every embedded null byte.
#[must_use]
pub fn strip_null_bytes(name: &str) -> Cow<'_, str> {
    if name.contains('\0') {
        Cow::Owned(name.replace('\0', ""))
    } else {
        Cow::Borrowed(name)
    }
}

/// Extension of a file name, including the dot.
///
/// Follows the usual "extname" rules: the part from the last `.` onwards,
/// except that a name whose only dot is its first character (`.md`) or the
/// name `..` has no extension.
#[must_use]
pub fn extension(name: &str) -> &str {
    match name.rfind('.') {
        None | Some(0) => "",
        Some(_) if name == ".." => "",
        Some(dot) => name.split_at(dot).1,
    }
}

/// Whether `name` carries an allow-listed extension.
#[must_use]
pub fn has_allowed_extension(name: &str) -> bool {
    let extension = extension(name).to_lowercase();
    ALLOWED_EXTENSIONS.contains(&extension.as_str())
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// `..` at the root stays at the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Validates names against a fixed root directory.
#[derive(Debug, Clone)]
pub struct FileGuard {
    root: PathBuf,
}

impl FileGuard {
    /// Create a guard for `root`, made absolute against the working directory.
    ///
    /// The directory does not have to exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = std::path::absolute(root)?;
        Ok(Self {
            root: normalize_lexically(&root),
        })
    }

    /// Absolute, normalized root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check an already null-stripped name and return the path to serve.
    ///
    /// # Errors
    ///
    /// Returns `FileAccessError::InvalidFileType` for extensions outside
    /// [`ALLOWED_EXTENSIONS`] and `FileAccessError::OutsideRoot` when the
    /// resolved path leaves the root.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, FileAccessError> {
        if !has_allowed_extension(name) {
            return Err(FileAccessError::InvalidFileType);
        }

        let resolved = normalize_lexically(&self.root.join(name));
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(FileAccessError::OutsideRoot)
        }
    }

    /// Run every step on a raw name: slash check, null-byte strip, resolve.
    ///
    /// Returns the sanitized name alongside the verdict so callers can report
    /// it to the challenge registry. `None` means the name was refused
    /// before sanitizing.
    #[must_use]
    pub fn check<'a>(
        &self,
        raw: &'a str,
    ) -> (Option<Cow<'a, str>>, Result<PathBuf, FileAccessError>) {
        if let Err(e) = reject_slashes(raw) {
            return (None, Err(e));
        }
        let name = strip_null_bytes(raw);
        let verdict = self.resolve(&name);
        (Some(name), verdict)
    }
}

/// Exact (lowercased) names that give away a forgotten or hidden file.
const EXPOSED_FILES: [(&str, ChallengeKey); 4] = [
    ("eastere.gg", ChallengeKey::EasterEggLevelOneChallenge),
    ("package.json.bak", ChallengeKey::ForgottenDevBackupChallenge),
    ("coupons_2013.md.bak", ChallengeKey::ForgottenBackupChallenge),
    (
        "suspicious_errors.yml",
        ChallengeKey::MisplacedSignatureFileChallenge,
    ),
];

/// Report a sanitized file name to the challenge registry.
///
/// Runs whatever the guard decided about the request.
pub fn observe_file_request(challenges: &ChallengeRegistry, name: &str) {
    let name = name.to_lowercase();

    challenges.solve_if(ChallengeKey::DirectoryListingChallenge, || {
        name == "acquisitions.md"
    });

    for (file, challenge) in EXPOSED_FILES {
        challenges.solve_if(challenge, || name == file);
    }

    challenges.solve_if(ChallengeKey::NullByteChallenge, || {
        EXPOSED_FILES
            .iter()
            .any(|(_, challenge)| challenges.is_solved(*challenge))
            || name == "encrypt.pyc"
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn guard() -> FileGuard {
        FileGuard::new("/srv/juice-shop/ftp").unwrap()
    }

    #[test]
    fn test_extension_follows_extname_rules() {
        assert_eq!(extension("legal.md"), ".md");
        assert_eq!(extension("coupons_2013.md.bak"), ".bak");
        assert_eq!(extension("README"), "");
        assert_eq!(extension(".md"), "");
        assert_eq!(extension(".."), "");
        assert_eq!(extension("..md"), ".md");
        assert_eq!(extension("trailing."), ".");
    }

    #[test]
    fn test_allowed_extension_is_case_insensitive() {
        assert!(has_allowed_extension("ACQUISITIONS.MD"));
        assert!(has_allowed_extension("order.Pdf"));
        assert!(!has_allowed_extension("eastere.gg"));
        assert!(!has_allowed_extension("package.json.bak"));
        assert!(!has_allowed_extension(".md"));
    }

    #[test]
    fn test_strip_null_bytes() {
        assert_eq!(strip_null_bytes("package.json.bak\0.md"), "package.json.bak.md");
        assert_eq!(strip_null_bytes("a\0\0b\0.pdf"), "ab.pdf");
        assert!(matches!(strip_null_bytes("legal.md"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_resolve_inside_root() {
        let path = guard().resolve("legal.md").unwrap();
        assert_eq!(path, PathBuf::from("/srv/juice-shop/ftp/legal.md"));
    }

    #[test]
    fn test_resolve_rejects_disallowed_extension_first() {
        assert_eq!(
            guard().resolve("../../etc/passwd"),
            Err(FileAccessError::InvalidFileType)
        );
    }

    #[test]
    fn test_resolve_rejects_escape_from_root() {
        assert_eq!(
            guard().resolve("../secret.md"),
            Err(FileAccessError::OutsideRoot)
        );
        assert_eq!(
            guard().resolve("../../../../../../notes.pdf"),
            Err(FileAccessError::OutsideRoot)
        );
        // A sibling whose name merely starts with the root's name is outside.
        assert_eq!(
            guard().resolve("../ftp-private/plan.md"),
            Err(FileAccessError::OutsideRoot)
        );
    }

    #[test]
    fn test_resolve_allows_round_trip_back_into_root() {
        let path = guard().resolve("../ftp/legal.md").unwrap();
        assert_eq!(path, PathBuf::from("/srv/juice-shop/ftp/legal.md"));
    }

    #[test]
    fn test_root_is_normalized() {
        let guard = FileGuard::new("/srv/juice-shop/./public/../ftp").unwrap();
        assert_eq!(guard.root(), Path::new("/srv/juice-shop/ftp"));
    }

    #[test]
    fn test_check_refuses_slash_before_anything_else() {
        let (name, verdict) = guard().check("..%2F/legal.md");
        assert!(name.is_none());
        assert_eq!(verdict, Err(FileAccessError::ForwardSlash));
    }

    #[test]
    fn test_check_strips_null_bytes_before_extension_check() {
        let (name, verdict) = guard().check("package.json.bak\0.md");
        assert_eq!(name.as_deref(), Some("package.json.bak.md"));
        assert!(verdict.is_ok());

        let (_, verdict) = guard().check("legal.md\0.exe");
        assert_eq!(verdict, Err(FileAccessError::InvalidFileType));
    }

    #[test]
    fn test_observe_confidential_document() {
        let challenges = ChallengeRegistry::new();
        observe_file_request(&challenges, "Acquisitions.md");

        assert!(challenges.is_solved(ChallengeKey::DirectoryListingChallenge));
        assert!(!challenges.is_solved(ChallengeKey::NullByteChallenge));
    }

    #[test]
    fn test_observe_exposed_files_also_solve_null_byte() {
        for (file, challenge) in EXPOSED_FILES {
            let challenges = ChallengeRegistry::new();
            observe_file_request(&challenges, &file.to_uppercase());

            assert!(challenges.is_solved(challenge), "{file}");
            assert!(challenges.is_solved(ChallengeKey::NullByteChallenge), "{file}");
        }
    }

    #[test]
    fn test_observe_encrypt_pyc_solves_null_byte_only() {
        let challenges = ChallengeRegistry::new();
        observe_file_request(&challenges, "encrypt.pyc");

        let solved: Vec<_> = challenges
            .snapshot()
            .into_iter()
            .filter(|s| s.solved)
            .map(|s| s.key)
            .collect();
        assert_eq!(solved, [ChallengeKey::NullByteChallenge]);
    }

    #[test]
    fn test_observe_ordinary_file_solves_nothing() {
        let challenges = ChallengeRegistry::new();
        observe_file_request(&challenges, "legal.md");

        assert!(challenges.snapshot().iter().all(|s| !s.solved));
    }
}

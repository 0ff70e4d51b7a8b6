//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BranchName`] - Validated branch name
//! - [`CommitId`] - Opaque commit identifier
//! - [`FileId`] / [`FileRef`] - Structural file identity
//! - [`UtcTimestamp`] - RFC3339 timestamp
//! - [`Fingerprint`] - Snapshot hash for "state unchanged" checks
//!
//! # Validation
//!
//! Names typed by a user go through [`BranchName::new`], which enforces
//! Git's refname rules. Snapshots loaded from disk are trusted and are
//! deserialized without re-validation.
//!
//! # Examples
//!
//! ```
//! use branchlab::core::types::{BranchName, CommitId};
//!
//! let branch = BranchName::new("feature/login").unwrap();
//! let commit = CommitId::new("a568e1").unwrap();
//! assert_eq!(commit.short(4), "a568");
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(CommitId::new("has space").is_err());
//! # let _ = branch;
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid commit id: {0}")]
    InvalidCommitId(String),
}

/// A validated branch name.
///
/// Branch names follow Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, or ASCII control characters
/// - Cannot contain spaces, `~`, `^`, `:`, `\`, `?`, `*`, `[`, or quotes
/// - Cannot be exactly `@`
///
/// # Example
///
/// ```
/// use branchlab::core::types::BranchName;
///
/// let name = BranchName::new("fix/bug-123").unwrap();
/// assert_eq!(name.as_str(), "fix/bug-123");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new("-d").is_err());
/// assert!(BranchName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchName(String);

impl BranchName {
    /// The protected trunk branch.
    pub const MAIN: &'static str = "main";

    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates the refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// The `main` branch name.
    pub fn main() -> Self {
        Self(Self::MAIN.to_string())
    }

    /// Wrap a name known to satisfy the refname rules (built-in datasets).
    pub(crate) fn trusted(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Whether this is the protected `main` branch.
    pub fn is_main(&self) -> bool {
        self.0 == Self::MAIN
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be empty".into(),
            ));
        }

        if name == "@" {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be '@' (reserved)".into(),
            ));
        }

        if name.starts_with('.') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '.'".into(),
            ));
        }
        if name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '-'".into(),
            ));
        }

        if name.ends_with(".lock") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '.lock'".into(),
            ));
        }
        if name.ends_with('/') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '/'".into(),
            ));
        }

        for forbidden in ["..", "@{", "//"] {
            if name.contains(forbidden) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{forbidden}'"
                )));
            }
        }

        const INVALID_CHARS: [char; 10] = [' ', '~', '^', ':', '\\', '?', '*', '[', '"', '\''];
        for c in INVALID_CHARS {
            if name.contains(c) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{c}'"
                )));
            }
        }

        if name.chars().any(|c| c.is_ascii_control()) {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain control characters".into(),
            ));
        }

        for component in name.split('/') {
            if component.starts_with('.') {
                return Err(TypeError::InvalidBranchName(
                    "path component cannot start with '.'".into(),
                ));
            }
            if component.ends_with(".lock") {
                return Err(TypeError::InvalidBranchName(
                    "path component cannot end with '.lock'".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for BranchName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque commit identifier.
///
/// Identifiers carry no content address; they only need to be unique for the
/// lifetime of a process. Any non-empty string without whitespace or quotes
/// is accepted, so imported datasets may use their own id scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// Create a new commit id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommitId` for empty ids or ids containing
    /// whitespace or quote characters.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::InvalidCommitId("commit id cannot be empty".into()));
        }
        if id
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'')
        {
            return Err(TypeError::InvalidCommitId(format!(
                "commit id '{id}' contains whitespace or quotes"
            )));
        }
        Ok(Self(id))
    }

    /// Wrap an id produced by a trusted generator.
    pub(crate) fn trusted(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get an abbreviated form of the id.
    ///
    /// Returns the first `len` characters, or the whole id if it is shorter.
    ///
    /// # Example
    ///
    /// ```
    /// use branchlab::core::types::CommitId;
    ///
    /// let id = CommitId::new("3009a").unwrap();
    /// assert_eq!(id.short(3), "300");
    /// assert_eq!(id.short(10), "3009a");
    /// ```
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for CommitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural identity of a file. Two files are the same file iff their ids match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file tracked by the simulated repository.
///
/// Content is never modelled; only the id participates in equality during
/// merge, revert and reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: FileId,
    pub name: String,
}

impl FileRef {
    /// Create a file reference.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: FileId(id),
            name: name.into(),
        }
    }
}

/// A UTC timestamp in RFC3339 format.
///
/// # Example
///
/// ```
/// use branchlab::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// println!("Current time: {}", now);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// A stable SHA-256 hash over a canonical byte encoding of a snapshot.
///
/// Two snapshots with equal fingerprints are byte-identical in their
/// canonical encoding.
///
/// # Example
///
/// ```
/// use branchlab::core::types::Fingerprint;
///
/// let a = Fingerprint::compute(b"state");
/// let b = Fingerprint::compute(b"state");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute a fingerprint over canonical bytes.
    pub fn compute(canonical: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod branch_name {
        use super::*;

        #[test]
        fn valid_branch_names() {
            assert!(BranchName::new("main").is_ok());
            assert!(BranchName::new("feature/foo").is_ok());
            assert!(BranchName::new("fix/bug-123").is_ok());
            assert!(BranchName::new("user@feature").is_ok());
            assert!(BranchName::new("with.dot").is_ok());
        }

        #[test]
        fn empty_name_rejected() {
            assert!(BranchName::new("").is_err());
        }

        #[test]
        fn flag_like_name_rejected() {
            assert!(BranchName::new("-d").is_err());
            assert!(BranchName::new("--amend").is_err());
        }

        #[test]
        fn dotted_components_rejected() {
            assert!(BranchName::new(".hidden").is_err());
            assert!(BranchName::new("foo/.hidden").is_err());
            assert!(BranchName::new("a..b").is_err());
            assert!(BranchName::new("branch.lock").is_err());
        }

        #[test]
        fn quotes_and_spaces_rejected() {
            assert!(BranchName::new("two words").is_err());
            assert!(BranchName::new("\"quoted\"").is_err());
            assert!(BranchName::new("it's").is_err());
        }

        #[test]
        fn main_is_recognised() {
            assert!(BranchName::main().is_main());
            assert!(!BranchName::new("mainline").unwrap().is_main());
        }

        #[test]
        fn serde_is_transparent() {
            let name = BranchName::new("feature").unwrap();
            assert_eq!(serde_json::to_string(&name).unwrap(), "\"feature\"");
        }
    }

    mod commit_id {
        use super::*;

        #[test]
        fn accepts_short_opaque_ids() {
            assert_eq!(CommitId::new("3009a").unwrap().as_str(), "3009a");
            assert_eq!(CommitId::new("f9821b").unwrap().as_str(), "f9821b");
        }

        #[test]
        fn rejects_empty_and_whitespace() {
            assert!(CommitId::new("").is_err());
            assert!(CommitId::new("ab cd").is_err());
            assert!(CommitId::new("\"ab\"").is_err());
        }

        #[test]
        fn short_clamps_to_length() {
            let id = CommitId::new("abc").unwrap();
            assert_eq!(id.short(2), "ab");
            assert_eq!(id.short(8), "abc");
        }
    }

    mod fingerprint {
        use super::*;

        #[test]
        fn differs_for_different_input() {
            assert_ne!(Fingerprint::compute(b"a"), Fingerprint::compute(b"b"));
        }
    }
}

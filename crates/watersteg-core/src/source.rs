//! Source resolution: turn a `--source` value into the ordered list of files
//! a run will process.
//!
//! A source is classified once, when the [`SourceSpec`] is built:
//!
//! - an existing file resolves to itself,
//! - an existing directory resolves to its entries (not recursive),
//! - anything else is read as `parent/pattern` where `pattern` uses
//!   shell-style wildcards (`*`, `?`, `[...]`, `[!...]`).
//!
//! Wildcards follow `fnmatch`: every other character is literal, including
//! `{`, `}` and a `[` that is never closed. No pattern is rejected; one that
//! cannot match anything resolves to an empty list.
//!
//! Directory entries are passed through whatever their type. A subdirectory
//! inside a directory source becomes an [`InputItem`] like any file and the
//! external tools fail on it later.

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

use crate::Result;

/// How a source specification was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// An existing regular file.
    File,
    /// An existing directory.
    Directory,
    /// A wildcard pattern applied to the entries of `parent`.
    Pattern {
        /// Directory part of the source, possibly empty.
        parent: PathBuf,
        /// Final path segment, matched against entry names.
        pattern: String,
    },
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => f.write_str("a file"),
            SourceKind::Directory => f.write_str("a directory"),
            SourceKind::Pattern { .. } => f.write_str("a wildcard pattern"),
        }
    }
}

/// A classified source specification.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    path: PathBuf,
    kind: SourceKind,
}

impl SourceSpec {
    /// Classify `path` by looking at the filesystem once.
    pub fn classify(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = if path.is_file() {
            SourceKind::File
        } else if path.is_dir() {
            SourceKind::Directory
        } else {
            let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
            let pattern = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            SourceKind::Pattern { parent, pattern }
        };
        Self { path, kind }
    }

    /// The source path as given.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The classification decided at construction.
    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Expand the source into input items, in listing order.
    ///
    /// # Errors
    ///
    /// [`Error::Io`](crate::Error::Io) if a directory source cannot be listed.
    ///
    /// A pattern whose parent directory is missing resolves to nothing.
    pub fn resolve(&self) -> Result<Vec<InputItem>> {
        match &self.kind {
            SourceKind::File => Ok(vec![InputItem::from_path(self.path.clone())]),
            SourceKind::Directory => {
                let mut items = Vec::new();
                for entry in std::fs::read_dir(&self.path)? {
                    match entry {
                        Ok(entry) => items.push(InputItem::from_path(self.path.join(entry.file_name()))),
                        Err(e) => tracing::warn!("skipping unreadable entry in {:?}: {}", self.path, e),
                    }
                }
                Ok(items)
            }
            SourceKind::Pattern { parent, pattern } => resolve_pattern(parent, pattern),
        }
    }
}

fn resolve_pattern(parent: &Path, pattern: &str) -> Result<Vec<InputItem>> {
    let Some(matcher) = compile_pattern(pattern) else {
        tracing::debug!("pattern {:?} cannot match any name", pattern);
        return Ok(Vec::new());
    };

    // An empty parent lists the working directory but joins to bare names.
    let listing_dir = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };

    let entries = match std::fs::read_dir(listing_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("cannot list {:?} for pattern {:?}: {}", listing_dir, pattern, e);
            return Ok(Vec::new());
        }
    };

    let items = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.file_name()),
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {:?}: {}", listing_dir, e);
                None
            }
        })
        .filter(|name| matcher.is_match(name))
        .map(|name| InputItem::from_path(parent.join(name)))
        .collect();

    Ok(items)
}

/// Compile a single-segment shell wildcard. `None` means nothing can match.
fn compile_pattern(pattern: &str) -> Option<GlobMatcher> {
    let glob = to_glob(pattern)?;
    match GlobBuilder::new(&glob)
        .literal_separator(true)
        .backslash_escape(false)
        .build()
    {
        Ok(glob) => Some(glob.compile_matcher()),
        Err(e) => {
            tracing::warn!("pattern {:?} rewritten as {:?} does not compile: {}", pattern, glob, e);
            None
        }
    }
}

/// Characters that change meaning depending on where they sit in a class.
const CLASS_SPECIAL: [char; 4] = [']', '-', '!', '^'];

/// Rewrite an `fnmatch` wildcard into globset syntax.
///
/// Returns `None` when the pattern holds a class that matches no character,
/// such as `[z-a]`.
fn to_glob(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut glob = String::with_capacity(pattern.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                // globset gives `**` a meaning of its own.
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
                glob.push('*');
            }
            '?' => glob.push('?'),
            '[' => match class_end(&chars, i + 1) {
                Some(end) => {
                    glob.push_str(&class_glob(&chars[i + 1..end])?);
                    i = end;
                }
                None => glob.push_str("[[]"),
            },
            c @ (']' | '{' | '}') => {
                glob.push('[');
                glob.push(c);
                glob.push(']');
            }
            c => glob.push(c),
        }
        i += 1;
    }
    Some(glob)
}

/// Index of the `]` closing a class whose body starts at `start`.
///
/// A `]` right after `[` or `[!` belongs to the body.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars[j.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

/// Re-emit a class body in a form globset reads the same way.
///
/// Reversed ranges are dropped. Characters that are special at some
/// position in a class are moved out of ranges and placed where they stay
/// literal.
fn class_glob(body: &[char]) -> Option<String> {
    let (negated, body) = match body.split_first() {
        Some((&'!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut singles = Vec::new();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < body.len() {
        let (mut lo, mut hi) = if i + 2 < body.len() && body[i + 1] == '-' {
            i += 3;
            (body[i - 3], body[i - 1])
        } else {
            i += 1;
            (body[i - 1], body[i - 1])
        };
        while lo <= hi {
            if lo == hi {
                singles.push(lo);
                break;
            } else if CLASS_SPECIAL.contains(&lo) {
                singles.push(lo);
                lo = ascii_step(lo, true);
            } else if CLASS_SPECIAL.contains(&hi) {
                singles.push(hi);
                hi = ascii_step(hi, false);
            } else {
                spans.push(format!("{lo}-{hi}"));
                break;
            }
        }
    }

    let has = |c: char| singles.contains(&c);
    let mut parts: Vec<String> = Vec::new();
    if has(']') {
        parts.push("]".into());
    }
    parts.extend(spans);
    parts.extend(
        singles
            .iter()
            .filter(|c| !CLASS_SPECIAL.contains(*c))
            .map(char::to_string),
    );
    let bangs: Vec<String> = ['!', '^']
        .into_iter()
        .filter(|&c| has(c))
        .map(String::from)
        .collect();

    if negated {
        if parts.is_empty() && bangs.is_empty() && !has('-') {
            return Some("?".into());
        }
        parts.extend(bangs);
        if has('-') {
            parts.push("-".into());
        }
        return Some(format!("[!{}]", parts.concat()));
    }

    if parts.is_empty() {
        // Only `!`, `^` or `-` are left, and the first two may not lead.
        return match (bangs.as_slice(), has('-')) {
            ([], false) => None,
            ([], true) => Some("-".into()),
            ([one], false) => Some(one.clone()),
            (_, true) => Some(format!("[-{}]", bangs.concat())),
            (_, false) => Some("{!,^}".into()),
        };
    }
    parts.extend(bangs);
    if has('-') {
        parts.push("-".into());
    }
    Some(format!("[{}]", parts.concat()))
}

/// Next or previous ASCII character; only used on [`CLASS_SPECIAL`] bounds.
fn ascii_step(c: char, up: bool) -> char {
    let b = c as u8;
    char::from(if up { b + 1 } else { b - 1 })
}

/// One file to transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputItem {
    /// Path handed to the external tools.
    pub path: PathBuf,
    /// Final segment without its extension.
    pub basename: String,
    /// Extension including the leading `.`, or empty.
    pub extension: String,
}

impl InputItem {
    /// Build an item, splitting the final path segment into basename and
    /// extension.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (basename, extension) = split_name(&name);
        Self {
            basename: basename.to_string(),
            extension: extension.to_string(),
            path,
        }
    }
}

/// Split a file name at its last `.`.
///
/// Leading dots belong to the basename, so `.profile` has no extension.
///
/// ```
/// use watersteg_core::source::split_name;
///
/// assert_eq!(split_name("photo.JPG"), ("photo", ".JPG"));
/// assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_name("README"), ("README", ""));
/// assert_eq!(split_name(".profile"), (".profile", ""));
/// ```
pub fn split_name(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(idx) if idx >= leading && idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

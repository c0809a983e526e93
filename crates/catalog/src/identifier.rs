//! Product identifiers embedded in image filenames.
//!
//! An identifier has the canonical form `AA0000-000`: a two-letter prefix, a
//! four-digit series code, a dash, and a three-digit variant code. Image files
//! carry it as the first underscore-delimited segment of their name, e.g.
//! `BA2449-089_front_01.jpg`.

use crate::error::{Error, ErrorKind};
use std::borrow::Borrow;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::str::FromStr;

/// Total length of an identifier, in characters.
pub const IDENTIFIER_LENGTH: usize = 10;
const SEPARATOR_INDEX: usize = 6;
const SEPARATOR: char = '-';
const FILENAME_DELIMITER: char = '_';

/// A validated `AA0000-000` product identifier.
///
/// The original casing is preserved; `ba2449-089` and `BA2449-089` are
/// distinct identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Extracts the identifier from a filename (or a path, in which case only
    /// the final component is considered).
    ///
    /// Returns `None` when the name has no underscore or the segment before
    /// the first underscore does not have the identifier shape. Not matching
    /// is the normal outcome for thumbnails and unrelated assets, so it is not
    /// an error.
    ///
    /// ```
    /// use rpmlog_catalog::Identifier;
    ///
    /// let id = Identifier::from_filename("photos/sb/BA2449-089_front_01.jpg").unwrap();
    /// assert_eq!(id.as_str(), "BA2449-089");
    /// assert!(Identifier::from_filename("BA2449-089.jpg").is_none());
    /// ```
    #[must_use]
    pub fn from_filename(path: impl AsRef<Path>) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_str()?;
        let (candidate, _) = name.split_once(FILENAME_DELIMITER)?;
        is_identifier(candidate).then(|| Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-letter prefix (`BA` in `BA2449-089`).
    pub fn prefix(&self) -> &str {
        &self.0[..self.byte_offset(2)]
    }

    /// The four-digit series code (`2449` in `BA2449-089`).
    pub fn series(&self) -> &str {
        &self.0[self.byte_offset(2)..self.byte_offset(SEPARATOR_INDEX)]
    }

    /// The three-digit variant code (`089` in `BA2449-089`).
    pub fn variant(&self) -> &str {
        &self.0[self.byte_offset(SEPARATOR_INDEX + 1)..]
    }

    /// Byte offset of the character at `index`. Letters and digits may be
    /// multi-byte, so character positions are not byte positions.
    fn byte_offset(&self, index: usize) -> usize {
        self.0.char_indices().nth(index).map_or(self.0.len(), |(offset, _)| offset)
    }
}

/// Shape check, by character: any Unicode letter for the prefix and any
/// Unicode numeric character for the series and variant.
fn is_identifier(candidate: &str) -> bool {
    let chars: Vec<char> = candidate.chars().collect();
    chars.len() == IDENTIFIER_LENGTH
        && chars[SEPARATOR_INDEX] == SEPARATOR
        && chars[..2].iter().all(|c| c.is_alphabetic())
        && chars[2..SEPARATOR_INDEX].iter().all(|c| c.is_numeric())
        && chars[SEPARATOR_INDEX + 1..].iter().all(|c| c.is_numeric())
}

impl FromStr for Identifier {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_identifier(s) {
            exn::bail!(ErrorKind::InvalidIdentifier(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Identifier {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if !is_identifier(&value) {
            exn::bail!(ErrorKind::InvalidIdentifier(value));
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

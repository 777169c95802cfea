//! XML patch documents.
//!
//! A patch over strings can be written to XML and read back later. The
//! document records an MD5 digest of the sequence the patch was computed
//! from, so applying it to a different base fails instead of producing
//! garbage.
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <patch digest="0cc175b9c0f1b6a831c399e269772661">
//!   <change>
//!     <previous index="1">
//!       <e>b&#10;</e>
//!     </previous>
//!     <next index="1">
//!       <e>x&#10;</e>
//!     </next>
//!   </change>
//! </patch>
//! ```
//!
//! Element text is stored verbatim; newlines and other control characters
//! are written as character references. A chunk without an `index`
//! attribute is detached.

mod parser;
mod printer;

pub use parser::{parse_file, parse_str, PatchParser};
pub use printer::{print_to_string, print_to_string_pretty, PatchPrinter, PatchPrinterOptions};

pub(crate) use printer::to_entities;

use md5::{Digest, Md5};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Patch;

/// A string patch together with the digest of its source sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchDocument {
    patch: Patch<String>,
    digest: Option<String>,
}

impl PatchDocument {
    /// Creates a document for a patch computed from `source`.
    pub fn new<S: AsRef<str>>(patch: Patch<String>, source: &[S]) -> Self {
        PatchDocument {
            patch,
            digest: Some(digest(source)),
        }
    }

    /// Creates a document from a patch and an optional digest.
    ///
    /// Without a digest the source sequence is not checked.
    pub fn from_parts(patch: Patch<String>, digest: Option<String>) -> Self {
        PatchDocument { patch, digest }
    }

    /// Returns the patch.
    pub fn patch(&self) -> &Patch<String> {
        &self.patch
    }

    /// Consumes the document and returns the patch.
    pub fn into_patch(self) -> Patch<String> {
        self.patch
    }

    /// Returns the digest of the source sequence, if recorded.
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Checks that `source` is the sequence the patch was computed from.
    pub fn check_source<S: AsRef<str>>(&self, source: &[S]) -> Result<()> {
        let Some(expected) = &self.digest else {
            return Ok(());
        };

        let actual = digest(source);
        if *expected != actual {
            return Err(Error::DigestMismatch {
                expected: expected.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Applies the patch to its source sequence.
    pub fn apply(&self, base: &[String]) -> Result<Vec<String>> {
        self.check_source(base)?;
        let result = self.patch.apply(base)?;
        debug!(base = base.len(), result = result.len(), "applied patch document");
        Ok(result)
    }

    /// Reverts the patch and checks that the source sequence comes back.
    pub fn restore(&self, branch: &[String]) -> Result<Vec<String>> {
        let result = self.patch.restore(branch)?;
        self.check_source(&result)?;
        debug!(branch = branch.len(), result = result.len(), "restored patch document");
        Ok(result)
    }
}

/// Computes the hex MD5 digest of a string sequence.
///
/// Each element is hashed with its byte length as a prefix so that
/// different splits of the same text have different digests.
pub fn digest<S: AsRef<str>>(elements: &[S]) -> String {
    let mut hasher = Md5::new();
    for element in elements {
        let bytes = element.as_ref().as_bytes();
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

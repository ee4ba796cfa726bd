//! QR scanning boundary and payload parsing.
//!
//! A scan yields either the decoded text of a code or a [`ScanError`]. A
//! prospect's code holds two lines, the name then the email address:
//!
//! ```text
//! Ada Lovelace
//! ada@example.com
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error, Result};
use crate::prospect::Prospect;

/// Failures reported by a scanning surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The capture device could not be used.
    #[error("bad input: {0}")]
    BadInput(String),
    /// Something was captured but could not be decoded.
    #[error("bad output: {0}")]
    BadOutput(String),
}

/// The outcome of one scan.
pub type ScanResult = std::result::Result<String, ScanError>;

/// A surface that captures one code per call.
pub trait CodeScanner {
    /// Capture and decode a code.
    fn scan(&mut self) -> ScanResult;
}

/// Name and email decoded from a scan payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPayload {
    /// First line of the payload.
    pub name: String,
    /// Second line of the payload.
    pub email_address: String,
}

impl ScanPayload {
    /// Split `text` on `'\n'`; exactly two fields are required.
    ///
    /// Fields are taken verbatim, so a trailing newline produces a third
    /// (empty) field and the payload is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScanPayload`] when the field count is not 2.
    pub fn parse(text: &str) -> Result<Self> {
        let fields: Vec<&str> = text.split('\n').collect();
        match fields.as_slice() {
            [name, email] => Ok(Self {
                name: (*name).to_string(),
                email_address: (*email).to_string(),
            }),
            _ => Err(Error::InvalidScanPayload {
                fields: fields.len(),
            }),
        }
    }

    /// Build a new uncontacted prospect from this payload.
    #[must_use]
    pub fn into_prospect(self) -> Prospect {
        Prospect::new(self.name, self.email_address)
    }
}

/// Sample codes used by [`SimulatedScanner`].
pub const SAMPLE_PAYLOADS: &[&str] = &[
    "Ada Lovelace\nada@example.com",
    "Grace Hopper\ngrace@example.com",
    "Alan Turing\nalan@example.org",
    "Katherine Johnson\nkatherine@example.net",
    "Edsger Dijkstra\nedsger@example.org",
];

/// Returns canned payloads in rotation, for running without a camera.
#[derive(Debug, Clone)]
pub struct SimulatedScanner {
    payloads: Vec<String>,
    next: usize,
}

impl SimulatedScanner {
    /// Scanner cycling through [`SAMPLE_PAYLOADS`], starting at `offset`.
    #[must_use]
    pub fn new(offset: usize) -> Self {
        Self::with_payloads(SAMPLE_PAYLOADS.iter().map(ToString::to_string), offset)
    }

    /// Scanner cycling through the given payloads.
    #[must_use]
    pub fn with_payloads(payloads: impl IntoIterator<Item = String>, offset: usize) -> Self {
        Self {
            payloads: payloads.into_iter().collect(),
            next: offset,
        }
    }
}

impl Default for SimulatedScanner {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CodeScanner for SimulatedScanner {
    fn scan(&mut self) -> ScanResult {
        if self.payloads.is_empty() {
            return Err(ScanError::BadInput("no simulated data".to_string()));
        }
        // Wraps around to the first sample
        let payload = self.payloads[self.next % self.payloads.len()].clone();
        self.next = self.next.wrapping_add(1);
        Ok(payload)
    }
}

/// Reads one payload from a byte stream such as stdin.
///
/// A single trailing line terminator (`\n` or `\r\n`) is dropped, since
/// terminals and `echo` append one that a real code would not contain.
#[derive(Debug)]
pub struct ReaderScanner<R> {
    reader: R,
}

impl<R: Read> ReaderScanner<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> CodeScanner for ReaderScanner<R> {
    fn scan(&mut self) -> ScanResult {
        let mut bytes = Vec::new();
        self.reader
            .read_to_end(&mut bytes)
            .map_err(|e| ScanError::BadInput(e.to_string()))?;
        let mut text = String::from_utf8(bytes).map_err(|e| ScanError::BadOutput(e.to_string()))?;

        // Only one terminator; anything more is part of the payload
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        if text.is_empty() {
            return Err(ScanError::BadOutput("empty payload".to_string()));
        }
        Ok(text)
    }
}

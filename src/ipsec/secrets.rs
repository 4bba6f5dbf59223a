//! Line-oriented patcher for `ipsec.secrets`.
//!
//! Lines of interest look like
//! `<address> <id> : PSK <secret> #dhcp-interface=<ifname>#`; only the leading
//! address of lines tagged with the target interface is replaced. Every other
//! line keeps its original bytes.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::conf::strip_terminator;
use super::{RewriteError, file};

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)#dhcp-interface=(.*)#").expect("tag pattern is valid"));

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?) (.*?) : PSK (.*?) #dhcp").expect("PSK entry pattern is valid")
});

/// Placeholder written when the interface has no address.
///
/// Turns the entry into a comment instead of an invalid secret.
pub const NO_ADDRESS: &str = "#";

/// A tagged line whose inner shape could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("malformed PSK entry on line {line}")]
pub struct MalformedEntry {
    /// 1-based line number
    pub line: usize,
}

/// Contents of `ipsec.secrets` as raw lines (terminators included).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretsFile {
    lines: Vec<String>,
}

impl SecretsFile {
    /// Reads the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Read`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self, RewriteError> {
        Ok(Self::parse(&file::read(path)?))
    }

    /// Splits content into lines, keeping their terminators.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    /// Returns the raw lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Renders the file with entries tagged for `interface` pointed at `new_address`.
    ///
    /// Returns the rendered text and the number of entries rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedEntry`] for the first tagged line that does not have
    /// the `<address> <id> : PSK <secret>` shape.
    pub fn render_for(
        &self,
        interface: &str,
        new_address: Option<&str>,
    ) -> Result<(String, usize), MalformedEntry> {
        let address = new_address.filter(|a| !a.is_empty()).unwrap_or(NO_ADDRESS);
        let mut out = String::with_capacity(self.lines.iter().map(String::len).sum());
        let mut updated = 0;

        for (index, raw) in self.lines.iter().enumerate() {
            let line = strip_terminator(raw);
            if tagged_interface(line) != Some(interface) {
                out.push_str(raw);
                continue;
            }

            let entry = ENTRY
                .captures(line)
                .ok_or(MalformedEntry { line: index + 1 })?;
            let _ = write!(
                out,
                "{address} {} : PSK {} #dhcp-interface={interface}#",
                &entry[2], &entry[3]
            );
            out.push_str(&raw[line.len()..]);
            updated += 1;
        }

        Ok((out, updated))
    }

    /// Rewrites entries tagged for `interface` and replaces the file at `path`.
    ///
    /// Nothing is written if any tagged entry is malformed. Returns the number
    /// of entries rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::MalformedSecret`] for a malformed tagged entry,
    /// or [`RewriteError::Write`] if the file cannot be replaced.
    pub fn write(
        &self,
        path: &Path,
        interface: &str,
        new_address: Option<&str>,
    ) -> Result<usize, RewriteError> {
        let (content, updated) =
            self.render_for(interface, new_address)
                .map_err(|e| RewriteError::MalformedSecret {
                    path: path.to_path_buf(),
                    line: e.line,
                })?;
        file::replace(path, &content)?;
        Ok(updated)
    }
}

/// Returns the interface named by the line's `#dhcp-interface=<ifname>#` tag.
fn tagged_interface(line: &str) -> Option<&str> {
    TAG.captures(line)
        .and_then(|c| c.get(2))
        .map(|m| m.as_str())
}

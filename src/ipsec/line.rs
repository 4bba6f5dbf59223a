//! Line classification for `ipsec.conf`.
//!
//! Each line is classified by ordered pattern matching; a later rule only
//! applies when every earlier one missed:
//!
//! 1. blank line after the header is closed: skipped
//! 2. `#conn ...`: legacy block marker, closes the current block
//! 3. `peer-*-tunnel*`: connection identity, opens a block
//! 4. `dhcp-interface=<value>` inside a block
//! 5. `left=<value>` inside a block
//! 6. anything before the first identity line: header
//! 7. anything inside a block: body
//! 8. anything else: footer

use std::sync::LazyLock;

use regex::Regex;

static IDENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"peer-.*-tunnel.*").expect("identity pattern is valid"));

static DHCP_INTERFACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"dhcp-interface=(.*)").expect("dhcp-interface pattern is valid"));

static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"left=(.*)").expect("left pattern is valid"));

const BLOCK_MARKER: &str = "#conn";

/// Parser position relevant to classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserState {
    /// Set once the first identity line has been seen.
    pub header_closed: bool,
    /// Set while a connection block is open.
    pub block_open: bool,
}

/// Classification of a single line (without its terminator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Blank line between blocks; dropped.
    Skip,
    /// `#conn ...` delimiter; dropped, closes the open block.
    BlockMarker,
    /// Connection identifier opening a block.
    Identity(&'a str),
    /// Interface tracked by the open block.
    DhcpInterface(&'a str),
    /// Local address of the open block.
    Address(&'a str),
    /// Text before the first block.
    Header,
    /// Opaque line inside the open block.
    Body,
    /// Text outside any block after the header.
    Footer,
}

/// Classifies `line` given the current parser state.
#[must_use]
pub fn classify(line: &str, state: ParserState) -> LineKind<'_> {
    if state.header_closed && line.trim().is_empty() {
        return LineKind::Skip;
    }
    if line.contains(BLOCK_MARKER) {
        return LineKind::BlockMarker;
    }
    if let Some(m) = IDENTITY.find(line) {
        return LineKind::Identity(m.as_str().trim_end());
    }
    if state.block_open {
        if let Some(value) = capture(&DHCP_INTERFACE, line) {
            return LineKind::DhcpInterface(value);
        }
        if let Some(value) = capture(&ADDRESS, line) {
            return LineKind::Address(value);
        }
    }
    if !state.header_closed {
        LineKind::Header
    } else if state.block_open {
        LineKind::Body
    } else {
        LineKind::Footer
    }
}

fn capture<'a>(pattern: &Regex, line: &'a str) -> Option<&'a str> {
    pattern
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end())
}

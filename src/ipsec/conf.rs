//! Block model for `ipsec.conf`.
//!
//! The file is split into a free-form header, an ordered list of
//! `peer-*-tunnel*` connection blocks and a free-form footer. Only the
//! `left=` address of blocks tracking the target interface is ever changed;
//! every other line is carried through.

use std::fmt::Write as _;
use std::path::Path;

use super::line::{LineKind, ParserState, classify};
use super::{RewriteError, file};

/// One `conn peer-*-tunnel*` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionBlock {
    /// Connection identifier, unique within the document.
    pub name: String,
    /// Interface whose DHCP address this block follows, if any.
    pub dhcp_interface: Option<String>,
    /// Value of the `left=` line (possibly empty).
    pub local_address: String,
    /// Remaining lines of the block, verbatim and in order.
    pub body: Vec<String>,
}

impl ConnectionBlock {
    /// Creates an empty block with the given identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if this block tracks `interface`.
    #[must_use]
    pub fn tracks(&self, interface: &str) -> bool {
        self.dhcp_interface.as_deref() == Some(interface)
    }
}

/// Parsed `ipsec.conf`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    /// Raw text before the first block, emitted verbatim.
    pub header: String,
    /// Connection blocks in file order.
    pub blocks: Vec<ConnectionBlock>,
    /// Raw text found outside any block after the header, emitted verbatim.
    pub footer: String,
    /// Whether the file uses `\r\n` terminators; generated lines follow suit.
    pub crlf: bool,
}

impl ConfigDocument {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Read`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self, RewriteError> {
        Ok(Self::parse(&file::read(path)?))
    }

    /// Parses document text.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut doc = Self::default();
        let mut state = ParserState::default();
        let mut current: Option<usize> = None;
        doc.crlf = content
            .split_inclusive('\n')
            .next()
            .is_some_and(|l| l.ends_with("\r\n"));

        for raw in content.split_inclusive('\n') {
            let line = strip_terminator(raw);

            match classify(line, state) {
                LineKind::Skip => {}
                LineKind::BlockMarker => current = None,
                LineKind::Identity(name) => {
                    current = Some(doc.open_block(name));
                    state.header_closed = true;
                }
                LineKind::DhcpInterface(value) => {
                    if let Some(block) = current.map(|i| &mut doc.blocks[i]) {
                        block.dhcp_interface =
                            (!value.is_empty()).then(|| value.to_string());
                    }
                }
                LineKind::Address(value) => {
                    if let Some(block) = current.map(|i| &mut doc.blocks[i]) {
                        block.local_address = value.to_string();
                    }
                }
                LineKind::Header => doc.header.push_str(raw),
                LineKind::Body => {
                    if let Some(block) = current.map(|i| &mut doc.blocks[i]) {
                        block.body.push(line.to_string());
                    }
                }
                LineKind::Footer => doc.footer.push_str(raw),
            }

            state.block_open = current.is_some();
        }

        doc
    }

    /// Returns the block with the given identifier.
    #[must_use]
    pub fn block(&self, name: &str) -> Option<&ConnectionBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// Sets the local address of every block tracking `interface`.
    ///
    /// An absent `new_address` clears the address. Blocks without a
    /// `dhcp-interface` are never touched. Returns the number of blocks updated.
    pub fn apply_address(&mut self, interface: &str, new_address: Option<&str>) -> usize {
        let address = new_address.unwrap_or_default();
        let mut updated = 0;

        for block in self.blocks.iter_mut().filter(|b| b.tracks(interface)) {
            block.local_address = address.to_string();
            updated += 1;
        }

        updated
    }

    /// Serializes the document.
    ///
    /// Blocks are emitted in normalized form, bracketed by `conn <name>` and
    /// `#conn <name>` lines, using the terminator style of the parsed file.
    /// An empty `dhcp-interface` is not written back.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + self.footer.len() + 256);
        let eol = if self.crlf { "\r\n" } else { "\n" };

        out.push_str(&self.header);
        if !self.blocks.is_empty() && !out.is_empty() && !out.ends_with('\n') {
            out.push_str(eol);
        }

        for block in &self.blocks {
            let _ = write!(out, "conn {}{eol}", block.name);
            if let Some(interface) = block.dhcp_interface.as_deref().filter(|i| !i.is_empty()) {
                let _ = write!(out, "\t#dhcp-interface={interface}{eol}");
            }
            let _ = write!(out, "\tleft={}{eol}", block.local_address);
            for line in &block.body {
                out.push_str(line);
                out.push_str(eol);
            }
            let _ = write!(out, "#conn {}{eol}{eol}", block.name);
        }

        out.push_str(&self.footer);
        out
    }

    /// Retargets blocks tracking `interface` and replaces the file at `path`.
    ///
    /// Returns the number of blocks updated.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Write`] if the file cannot be replaced.
    pub fn write(
        &mut self,
        path: &Path,
        interface: &str,
        new_address: Option<&str>,
    ) -> Result<usize, RewriteError> {
        let updated = self.apply_address(interface, new_address);
        file::replace(path, &self.render())?;
        Ok(updated)
    }

    /// Returns the index of the block named `name`, creating it if needed.
    fn open_block(&mut self, name: &str) -> usize {
        if let Some(index) = self.blocks.iter().position(|b| b.name == name) {
            return index;
        }
        self.blocks.push(ConnectionBlock::new(name));
        self.blocks.len() - 1
    }
}

/// Strips a trailing `\n` or `\r\n`.
pub(super) fn strip_terminator(raw: &str) -> &str {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    line.strip_suffix('\r').unwrap_or(line)
}

//! Syslog output for `tracing`.
//!
//! [`SyslogMakeWriter`] plugs into a `tracing_subscriber` fmt layer and sends
//! each formatted event as one datagram to the local syslog socket, in the
//! traditional `<PRI>TAG[PID]: message` form.

use std::io;
use std::os::unix::net::UnixDatagram;
use std::path::Path;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Default local syslog socket.
pub const DEFAULT_SOCKET: &str = "/dev/log";

/// Syslog identity of the hook.
pub const IDENT: &str = "ipsec-dhclient-hook";

const FACILITY_USER: u8 = 1;

/// Syslog severities used by the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error = 3,
    Warning = 4,
    Notice = 5,
    Debug = 7,
}

impl Severity {
    /// Maps a tracing level to a severity. `INFO` is logged as notice.
    #[must_use]
    pub const fn from_level(level: Level) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warning,
            Level::INFO => Self::Notice,
            Level::DEBUG | Level::TRACE => Self::Debug,
        }
    }

    /// Returns the `<PRI>` value for the user facility.
    #[must_use]
    pub const fn priority(self) -> u8 {
        FACILITY_USER * 8 + self as u8
    }
}

/// Creates one [`SyslogWriter`] per event.
///
/// If the socket cannot be reached, writers silently discard their output.
#[derive(Debug)]
pub struct SyslogMakeWriter {
    socket: Option<UnixDatagram>,
    tag: String,
}

impl SyslogMakeWriter {
    /// Connects to the syslog socket at `path`, tagging messages with `ident`
    /// and the current process id.
    #[must_use]
    pub fn connect(path: &Path, ident: &str) -> Self {
        let socket = UnixDatagram::unbound()
            .and_then(|socket| socket.connect(path).map(|()| socket))
            .ok();
        Self {
            socket,
            tag: format!("{ident}[{}]", std::process::id()),
        }
    }

    /// Returns `true` if messages are actually delivered.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    const fn writer(&self, severity: Severity) -> SyslogWriter<'_> {
        SyslogWriter {
            target: self,
            severity,
            buf: Vec::new(),
        }
    }
}

impl<'a> MakeWriter<'a> for SyslogMakeWriter {
    type Writer = SyslogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer(Severity::Notice)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        self.writer(Severity::from_level(*meta.level()))
    }
}

/// Buffers one formatted event and sends it on flush or drop.
#[derive(Debug)]
pub struct SyslogWriter<'a> {
    target: &'a SyslogMakeWriter,
    severity: Severity,
    buf: Vec<u8>,
}

impl SyslogWriter<'_> {
    /// Formats the buffered message as a syslog datagram.
    fn datagram(&self) -> Vec<u8> {
        let message = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf);
        let mut datagram = format!("<{}>{}: ", self.severity.priority(), self.target.tag).into_bytes();
        datagram.extend_from_slice(message);
        datagram
    }

    fn send(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let datagram = self.datagram();
        self.buf.clear();
        if let Some(socket) = &self.target.socket {
            socket.send(&datagram)?;
        }
        Ok(())
    }
}

impl io::Write for SyslogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send()
    }
}

impl Drop for SyslogWriter<'_> {
    fn drop(&mut self) {
        // Nowhere to report a failed log delivery
        let _ = self.send();
    }
}

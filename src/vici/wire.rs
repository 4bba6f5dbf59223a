//! VICI message encoding.
//!
//! A message is an ordered sequence of elements:
//!
//! | Type | Code | Layout |
//! |------|------|--------|
//! | `SECTION_START` | 1 | name |
//! | `SECTION_END` | 2 | - |
//! | `KEY_VALUE` | 3 | name, value |
//! | `LIST_START` | 4 | name |
//! | `LIST_ITEM` | 5 | value |
//! | `LIST_END` | 6 | - |
//!
//! Names are prefixed with a `u8` length, values with a big-endian `u16` length.

use super::ViciError;

const SECTION_START: u8 = 1;
const SECTION_END: u8 = 2;
const KEY_VALUE: u8 = 3;
const LIST_START: u8 = 4;
const LIST_ITEM: u8 = 5;
const LIST_END: u8 = 6;

/// Value stored under a message key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Plain key/value pair.
    Str(Vec<u8>),
    /// Nested section.
    Section(Message),
    /// List of values.
    List(Vec<Vec<u8>>),
}

/// An ordered VICI message tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    entries: Vec<(String, Value)>,
}

impl Message {
    /// Creates an empty message.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a key/value pair.
    #[must_use]
    pub fn with_str(mut self, key: impl Into<String>, value: impl AsRef<[u8]>) -> Self {
        self.push(key, Value::Str(value.as_ref().to_vec()));
        self
    }

    /// Appends a nested section.
    #[must_use]
    pub fn with_section(mut self, name: impl Into<String>, section: Self) -> Self {
        self.push(name, Value::Section(section));
        self
    }

    /// Appends a list.
    #[must_use]
    pub fn with_list<I, V>(mut self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        let items = items.into_iter().map(|v| v.as_ref().to_vec()).collect();
        self.push(name, Value::List(items));
        self
    }

    /// Appends an entry.
    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push((key.into(), value));
    }

    /// Returns the first value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the key/value string stored under `key`, if it is valid UTF-8.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::Str(bytes) => std::str::from_utf8(bytes).ok(),
            Value::Section(_) | Value::List(_) => None,
        }
    }

    /// Returns the section stored under `name`.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Self> {
        match self.get(name)? {
            Value::Section(section) => Some(section),
            Value::Str(_) | Value::List(_) => None,
        }
    }

    /// Returns the top-level keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the message has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends the encoded message to `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if a name or value exceeds its length prefix.
    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<(), ViciError> {
        for (key, value) in &self.entries {
            match value {
                Value::Str(bytes) => {
                    buf.push(KEY_VALUE);
                    put_name(buf, key)?;
                    put_value(buf, bytes)?;
                }
                Value::Section(section) => {
                    buf.push(SECTION_START);
                    put_name(buf, key)?;
                    section.encode_into(buf)?;
                    buf.push(SECTION_END);
                }
                Value::List(items) => {
                    buf.push(LIST_START);
                    put_name(buf, key)?;
                    for item in items {
                        buf.push(LIST_ITEM);
                        put_value(buf, item)?;
                    }
                    buf.push(LIST_END);
                }
            }
        }
        Ok(())
    }

    /// Encodes the message.
    ///
    /// # Errors
    ///
    /// Returns an error if a name or value exceeds its length prefix.
    pub fn encode(&self) -> Result<Vec<u8>, ViciError> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Decodes a message occupying all of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated input, unknown element types or
    /// unbalanced sections and lists.
    pub fn decode(bytes: &[u8]) -> Result<Self, ViciError> {
        let mut reader = Reader::new(bytes);
        let mut parents: Vec<(String, Self)> = Vec::new();
        let mut current = Self::new();

        while !reader.is_empty() {
            match reader.u8()? {
                SECTION_START => {
                    let name = reader.name()?;
                    parents.push((name, std::mem::take(&mut current)));
                }
                SECTION_END => {
                    let (name, parent) = parents.pop().ok_or(ViciError::Unbalanced)?;
                    let section = std::mem::replace(&mut current, parent);
                    current.push(name, Value::Section(section));
                }
                KEY_VALUE => {
                    let key = reader.name()?;
                    let value = reader.value()?;
                    current.push(key, Value::Str(value));
                }
                LIST_START => {
                    let name = reader.name()?;
                    let items = reader.list_items()?;
                    current.push(name, Value::List(items));
                }
                LIST_ITEM | LIST_END => return Err(ViciError::Unbalanced),
                other => return Err(ViciError::UnknownElement(other)),
            }
        }

        if parents.is_empty() {
            Ok(current)
        } else {
            Err(ViciError::Unbalanced)
        }
    }
}

/// Writes a `u8`-length-prefixed name.
pub(super) fn put_name(buf: &mut Vec<u8>, name: &str) -> Result<(), ViciError> {
    let len = u8::try_from(name.len()).map_err(|_| ViciError::NameTooLong(name.len()))?;
    buf.push(len);
    buf.extend_from_slice(name.as_bytes());
    Ok(())
}

fn put_value(buf: &mut Vec<u8>, value: &[u8]) -> Result<(), ViciError> {
    let len = u16::try_from(value.len()).map_err(|_| ViciError::ValueTooLong(value.len()))?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(value);
    Ok(())
}

/// Bounds-checked cursor over encoded bytes.
pub(super) struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(super) const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub(super) const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(super) const fn rest(&self) -> &'a [u8] {
        self.bytes
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ViciError> {
        if self.bytes.len() < n {
            return Err(ViciError::Truncated);
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    pub(super) fn u8(&mut self) -> Result<u8, ViciError> {
        Ok(self.take(1)?[0])
    }

    pub(super) fn name(&mut self) -> Result<String, ViciError> {
        let len = usize::from(self.u8()?);
        Ok(String::from_utf8_lossy(self.take(len)?).into_owned())
    }

    fn value(&mut self) -> Result<Vec<u8>, ViciError> {
        let len = self.take(2)?;
        let len = usize::from(u16::from_be_bytes([len[0], len[1]]));
        Ok(self.take(len)?.to_vec())
    }

    fn list_items(&mut self) -> Result<Vec<Vec<u8>>, ViciError> {
        let mut items = Vec::new();
        loop {
            match self.u8()? {
                LIST_ITEM => items.push(self.value()?),
                LIST_END => return Ok(items),
                SECTION_START..=LIST_START => return Err(ViciError::Unbalanced),
                other => return Err(ViciError::UnknownElement(other)),
            }
        }
    }
}

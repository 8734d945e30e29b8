//! Line encoders
//!
//! Two encodings are supported: one JSON object per line, and a
//! tab-separated console line with the fields appended as a JSON object.

use std::io::{self, Write};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::field::Field;

use super::Entry;

/// Timestamp format used by both encodings
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// One JSON object per line
    Json,
    /// Human-readable, tab-separated
    Console,
}

impl Encoding {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::Console => "console",
        }
    }
}

impl FromStr for Encoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Encoding::Json),
            "console" => Ok(Encoding::Console),
            other => Err(ConfigError::UnknownEncoding(other.to_string())),
        }
    }
}

/// Keys used for the built-in portions of each entry.
///
/// An empty key omits that portion of the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderKeys {
    pub message: String,
    pub level: String,
    pub time: String,
    pub caller: String,
}

impl Default for EncoderKeys {
    fn default() -> Self {
        Self {
            message: "msg".to_string(),
            level: "level".to_string(),
            time: "time".to_string(),
            caller: "caller".to_string(),
        }
    }
}

/// Encodes entries into single lines
#[derive(Debug, Clone)]
pub struct Encoder {
    encoding: Encoding,
    keys: EncoderKeys,
}

impl Encoder {
    /// Create a new encoder
    pub fn new(encoding: Encoding, keys: EncoderKeys) -> Self {
        Self { encoding, keys }
    }

    /// Get the encoding
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Encode an entry, including the trailing newline
    pub fn encode(&self, entry: &Entry<'_>, buf: &mut Vec<u8>) -> io::Result<()> {
        match self.encoding {
            Encoding::Json => self.encode_json(entry, buf),
            Encoding::Console => self.encode_console(entry, buf),
        }
    }

    fn encode_json(&self, entry: &Entry<'_>, buf: &mut Vec<u8>) -> io::Result<()> {
        let mut first = true;
        buf.push(b'{');

        if !self.keys.time.is_empty() {
            let time = entry.time.format(TIME_FORMAT).to_string();
            write_json_pair(buf, &mut first, &self.keys.time, &time)?;
        }
        if !self.keys.level.is_empty() {
            write_json_pair(buf, &mut first, &self.keys.level, entry.level.as_str())?;
        }
        if !self.keys.caller.is_empty() {
            if let Some(caller) = entry.caller_display() {
                write_json_pair(buf, &mut first, &self.keys.caller, &caller)?;
            }
        }
        if !self.keys.message.is_empty() {
            write_json_pair(buf, &mut first, &self.keys.message, entry.message)?;
        }
        for field in entry.fields {
            write_json_pair(buf, &mut first, &field.key, &field.value)?;
        }

        buf.extend_from_slice(b"}\n");
        Ok(())
    }

    fn encode_console(&self, entry: &Entry<'_>, buf: &mut Vec<u8>) -> io::Result<()> {
        let mut parts: Vec<String> = Vec::with_capacity(4);

        if !self.keys.time.is_empty() {
            parts.push(entry.time.format(TIME_FORMAT).to_string());
        }
        if !self.keys.level.is_empty() {
            parts.push(entry.level.as_str().to_string());
        }
        if !self.keys.caller.is_empty() {
            if let Some(caller) = entry.caller_display() {
                parts.push(caller);
            }
        }
        if !self.keys.message.is_empty() {
            parts.push(entry.message.to_string());
        }

        buf.write_all(parts.join("\t").as_bytes())?;

        if !entry.fields.is_empty() {
            if !parts.is_empty() {
                buf.push(b'\t');
            }
            write_json_object(buf, entry.fields)?;
        }

        buf.push(b'\n');
        Ok(())
    }
}

// Pairs are written one by one rather than through a map so that field order
// and duplicate keys survive encoding.
fn write_json_pair<V: serde::Serialize + ?Sized>(
    buf: &mut Vec<u8>,
    first: &mut bool,
    key: &str,
    value: &V,
) -> io::Result<()> {
    if !*first {
        buf.push(b',');
    }
    *first = false;
    serde_json::to_writer(&mut *buf, key)?;
    buf.push(b':');
    serde_json::to_writer(&mut *buf, value)?;
    Ok(())
}

fn write_json_object(buf: &mut Vec<u8>, fields: &[Field]) -> io::Result<()> {
    let mut first = true;
    buf.push(b'{');
    for field in fields {
        write_json_pair(buf, &mut first, &field.key, &field.value)?;
    }
    buf.push(b'}');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use chrono::{Local, TimeZone};

    fn fixed_entry<'a>(message: &'a str, fields: &'a [Field]) -> Entry<'a> {
        let mut entry = Entry::new(Level::Info, message, fields);
        entry.time = Local.with_ymd_and_hms(2026, 1, 21, 14, 30, 45).unwrap();
        entry
    }

    fn encode(encoder: &Encoder, entry: &Entry<'_>) -> String {
        let mut buf = Vec::new();
        encoder.encode(entry, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("json".parse::<Encoding>().unwrap(), Encoding::Json);
        assert_eq!("console".parse::<Encoding>().unwrap(), Encoding::Console);
        assert!(matches!(
            "simple".parse::<Encoding>(),
            Err(ConfigError::UnknownEncoding(name)) if name == "simple"
        ));
    }

    #[test]
    fn test_json_line_layout() {
        let encoder = Encoder::new(Encoding::Json, EncoderKeys::default());
        let fields = vec![Field::new("a", "1"), Field::new("b", 2)];
        let line = encode(&encoder, &fixed_entry("hello", &fields));

        assert_eq!(
            line,
            "{\"time\":\"2026-01-21 14:30:45\",\"level\":\"INFO\",\"msg\":\"hello\",\"a\":\"1\",\"b\":2}\n"
        );
    }

    #[test]
    fn test_json_keeps_duplicate_keys() {
        let encoder = Encoder::new(Encoding::Json, EncoderKeys::default());
        let fields = vec![Field::new("k", 1), Field::new("k", 2)];
        let line = encode(&encoder, &fixed_entry("dup", &fields));

        assert!(line.ends_with("\"k\":1,\"k\":2}\n"));
    }

    #[test]
    fn test_empty_keys_omit_portions() {
        let keys = EncoderKeys {
            message: "message".to_string(),
            level: String::new(),
            time: String::new(),
            caller: String::new(),
        };
        let encoder = Encoder::new(Encoding::Json, keys);
        let line = encode(&encoder, &fixed_entry("only message", &[]));

        assert_eq!(line, "{\"message\":\"only message\"}\n");
    }

    #[test]
    fn test_console_line_layout() {
        let encoder = Encoder::new(Encoding::Console, EncoderKeys::default());
        let fields = vec![Field::new("a", "1"), Field::new("c", 3)];
        let line = encode(&encoder, &fixed_entry("hello world", &fields));

        assert_eq!(
            line,
            "2026-01-21 14:30:45\tINFO\thello world\t{\"a\":\"1\",\"c\":3}\n"
        );
    }

    #[test]
    fn test_console_without_fields() {
        let encoder = Encoder::new(Encoding::Console, EncoderKeys::default());
        let line = encode(&encoder, &fixed_entry("plain", &[]));
        assert_eq!(line, "2026-01-21 14:30:45\tINFO\tplain\n");
    }

    #[test]
    fn test_caller_is_encoded() {
        let encoder = Encoder::new(Encoding::Json, EncoderKeys::default());
        let entry = fixed_entry("here", &[]).with_caller(std::panic::Location::caller());
        let line = encode(&encoder, &entry);

        assert!(line.contains("\"caller\":\"sink/encoder.rs:"));
    }
}

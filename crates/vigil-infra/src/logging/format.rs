// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Line templates.

use env_logger::fmt::Formatter;
use log::Record;
use std::io::{self, Write};

/// The template used when a handler names no formatter.
pub const DEFAULT_FORMAT: &str = "{asctime} - {name} - {levelname} - {message}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AscTime,
    Name,
    LevelName,
    Message,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "asctime" => Some(Field::AscTime),
            "name" => Some(Field::Name),
            "levelname" => Some(Field::LevelName),
            "message" => Some(Field::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Text(String),
    Field(Field),
}

/// A line template with `{asctime}`, `{name}`, `{levelname}` and `{message}`
/// placeholders. Any other text, braces included, is kept as is.
///
/// The template is parsed once; [`write`](Self::write) is the format function
/// handed to `env_logger`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    template: String,
    pieces: Vec<Piece>,
}

impl LineFormat {
    /// Creates a format from a template string.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let pieces = parse(&template);
        Self { template, pieces }
    }

    /// The raw template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Writes one record followed by a newline. `{asctime}` is the
    /// formatter's RFC 3339 timestamp and `{name}` the record's target.
    pub fn write(&self, buf: &mut Formatter, record: &Record<'_>) -> io::Result<()> {
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => buf.write_all(text.as_bytes())?,
                Piece::Field(Field::AscTime) => {
                    let timestamp = buf.timestamp();
                    write!(buf, "{timestamp}")?;
                }
                Piece::Field(Field::Name) => buf.write_all(record.target().as_bytes())?,
                Piece::Field(Field::LevelName) => write!(buf, "{}", record.level())?,
                Piece::Field(Field::Message) => write!(buf, "{}", record.args())?,
            }
        }
        writeln!(buf)
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT)
    }
}

fn parse(template: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let tail = &rest[open..];
        let field = tail
            .find('}')
            .and_then(|close| Field::from_name(&tail[1..close]).map(|field| (field, close)));
        match field {
            Some((field, close)) => {
                if !text.is_empty() {
                    pieces.push(Piece::Text(std::mem::take(&mut text)));
                }
                pieces.push(Piece::Field(field));
                rest = &tail[close + 1..];
            }
            None => {
                text.push('{');
                rest = &tail[1..];
            }
        }
    }
    text.push_str(rest);
    if !text.is_empty() {
        pieces.push(Piece::Text(text));
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::memory::MemorySink;
    use log::{Level, LevelFilter};
    use vigil_core::LogSink;

    fn render(template: &str, level: Level, logger: &str, message: &str) -> String {
        let sink = MemorySink::with_format(LineFormat::new(template), LevelFilter::Trace);
        sink.emit(level, logger, message);
        sink.contents()
    }

    #[test]
    fn test_parse_splits_fields_and_text() {
        assert_eq!(
            parse("[{levelname}] {name}"),
            vec![
                Piece::Text("[".into()),
                Piece::Field(Field::LevelName),
                Piece::Text("] ".into()),
                Piece::Field(Field::Name),
            ]
        );
        assert_eq!(parse("{unknown} {"), vec![Piece::Text("{unknown} {".into())]);
    }

    #[test]
    fn test_render_placeholders() {
        assert_eq!(
            render("[{levelname}] {name}: {message}", Level::Warn, "clean", "careful"),
            "[WARN] clean: careful"
        );
    }

    #[test]
    fn test_render_timestamp() {
        let line = render(DEFAULT_FORMAT, Level::Info, "clean", "hi");
        assert!(line.ends_with(" - clean - INFO - hi"));
        assert!(!line.contains("{asctime}"));
        // RFC 3339: `YYYY-MM-DDTHH:MM:SSZ`.
        assert_eq!(line.find('T'), Some(10));
    }

    #[test]
    fn test_message_braces_are_kept() {
        assert_eq!(
            render("{message}", Level::Info, "x", "literal {name}"),
            "literal {name}"
        );
    }
}

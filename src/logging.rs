//! Forwards `tracing` events to the browser console.
//!
//! A `fmt` layer renders each event, and [`MakeConsoleWriter`] hands the rendered line to the
//! `console` method matching the event's level, so that the browser's own level filtering keeps
//! working.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::LevelFilter, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};
use wasm_bindgen::JsValue;
use web_sys::console;

use crate::config::Config;

/// Buffers a single formatted event, and writes it to the console when dropped.
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }

    /// Buffered line without the trailing newline the formatter adds.
    fn line(&self) -> Option<String> {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();

        (!line.is_empty()).then(|| line.to_string())
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let Some(line) = self.line() else {
            return;
        };

        let line = JsValue::from_str(&line);
        match self.level {
            Level::ERROR => console::error_1(&line),
            Level::WARN => console::warn_1(&line),
            Level::INFO => console::info_1(&line),
            _ => console::debug_1(&line),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Install the console subscriber. Only the first call has any effect.
pub fn init(config: &Config) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(MakeConsoleWriter)
        .with_ansi(false)
        .without_time()
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(LevelFilter::from_level(config.log_level))
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn line_drops_trailing_newline() {
        let mut writer = ConsoleWriter::new(Level::INFO);
        writer.write_all(b" INFO header scrolled\n").unwrap();

        assert_eq!(writer.line().as_deref(), Some(" INFO header scrolled"));

        // Empty the buffer so that dropping does not reach for the console
        writer.buffer.clear();
    }

    #[test]
    fn empty_writer_has_no_line() {
        let writer = ConsoleWriter::new(Level::WARN);
        assert_eq!(writer.line(), None);
    }
}

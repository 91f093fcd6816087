use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, RwLock};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

use crate::logs::Encoding;
use crate::verbosity::Verbosity;

/// One attached log file.
///
/// Records are written unbuffered so the file is current after every
/// event, matching the behavior callers expect from a file handler.
#[derive(Clone)]
pub(crate) struct FileSink {
    id: u64,
    verbose: Option<Verbosity>,
    encoding: Encoding,
    file: Arc<Mutex<File>>,
}

impl FileSink {
    pub(crate) fn new(
        id: u64,
        file: File,
        encoding: Encoding,
        verbose: Option<Verbosity>,
    ) -> Self {
        Self {
            id,
            verbose,
            encoding,
            file: Arc::new(Mutex::new(file)),
        }
    }

    /// Whether this sink admits records at `level`.
    ///
    /// A sink without its own threshold takes everything the global
    /// filter let through.
    pub(crate) fn wants(&self, level: &Level) -> bool {
        match self.verbose {
            None => true,
            Some(threshold) => *level <= threshold.to_level_filter(),
        }
    }

    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let bytes = self.encoding.encode(record);
        let mut file = self.file.lock().expect("log file lock poisoned");
        file.write_all(&bytes)
    }

    pub(crate) fn flush(&self) -> io::Result<()> {
        self.file.lock().expect("log file lock poisoned").flush()
    }
}

impl Encoding {
    pub(crate) fn encode<'a>(self, record: &'a [u8]) -> Cow<'a, [u8]> {
        match self {
            Encoding::Utf8 => Cow::Borrowed(record),
            Encoding::Ascii => {
                if record.is_ascii() {
                    return Cow::Borrowed(record);
                }
                let text = String::from_utf8_lossy(record);
                let mut out = String::with_capacity(text.len());
                for ch in text.chars() {
                    if ch.is_ascii() {
                        out.push(ch);
                    } else {
                        out.extend(ch.escape_unicode());
                    }
                }
                Cow::Owned(out.into_bytes())
            }
        }
    }
}

/// The set of currently attached file sinks, shared between the fmt
/// layer and the guards that detach handlers.
#[derive(Clone, Default)]
pub(crate) struct SinkSet {
    inner: Arc<RwLock<Vec<FileSink>>>,
}

impl SinkSet {
    pub(crate) fn attach(&self, sink: FileSink) {
        self.inner.write().expect("sink set lock poisoned").push(sink);
    }

    pub(crate) fn detach(&self, id: u64) -> Option<FileSink> {
        let mut sinks = self.inner.write().expect("sink set lock poisoned");
        let index = sinks.iter().position(|sink| sink.id == id)?;
        Some(sinks.swap_remove(index))
    }

    fn snapshot(&self, level: Option<&Level>) -> Vec<FileSink> {
        let sinks = self.inner.read().expect("sink set lock poisoned");
        match level {
            None => sinks.clone(),
            Some(level) => sinks.iter().filter(|s| s.wants(level)).cloned().collect(),
        }
    }
}

impl<'a> MakeWriter<'a> for SinkSet {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter {
            sinks: self.snapshot(None),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        SinkWriter {
            sinks: self.snapshot(Some(meta.level())),
        }
    }
}

/// Writes one formatted record to every sink that wants it.
pub(crate) struct SinkWriter {
    sinks: Vec<FileSink>,
}

impl io::Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for sink in &self.sinks {
            sink.write_record(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in &self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}

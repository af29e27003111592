//! JSON-lines destination writer.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use pitr_core::{DestinationWriter, Error, RecordSnapshot};

/// Writes one JSON object per restored record.
///
/// Bodies that parse as JSON are embedded as-is; anything else is emitted
/// as a string. Tombstones carry `"deletedMarker": true` and no body, and
/// documents carry no `deletedMarker` at all, so consumers can tell a
/// restored deletion from a record that was never restored. Writes are
/// idempotent per key within a run: repeated writes of a key already
/// emitted are skipped.
pub struct JsonLinesWriter {
    inner: Mutex<Inner>,
}

struct Inner {
    out: Box<dyn Write + Send>,
    written: HashSet<String>,
}

impl JsonLinesWriter {
    /// Write to an arbitrary sink.
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                out,
                written: HashSet::new(),
            }),
        }
    }

    /// Write to standard output.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Write to a file, truncating any previous contents.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }

    fn render(snapshot: &RecordSnapshot) -> Value {
        let mut record = serde_json::Map::new();
        record.insert("key".to_string(), json!(snapshot.key));
        if let Some(body) = &snapshot.body {
            let value = serde_json::from_slice::<Value>(body)
                .unwrap_or_else(|_| json!(String::from_utf8_lossy(body)));
            record.insert("body".to_string(), value);
        }
        if snapshot.is_deleted() {
            record.insert("deletedMarker".to_string(), json!(true));
        }
        Value::Object(record)
    }

    fn write_line(&self, key: &str, line: &Value) -> Result<(), Error> {
        let mut inner = self.inner.lock().map_err(|e| Error::DestinationWrite {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        if inner.written.contains(key) {
            return Ok(());
        }
        writeln!(inner.out, "{line}").map_err(|e| Error::DestinationWrite {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        inner.written.insert(key.to_string());
        Ok(())
    }

    /// Flush buffered output.
    pub fn flush(&self) -> io::Result<()> {
        match self.inner.lock() {
            Ok(mut inner) => inner.out.flush(),
            Err(_) => Err(io::Error::new(io::ErrorKind::Other, "writer poisoned")),
        }
    }
}

#[async_trait]
impl DestinationWriter for JsonLinesWriter {
    async fn write(&self, key: &str, snapshot: &RecordSnapshot) -> Result<(), Error> {
        let line = Self::render(snapshot);
        self.write_line(key, &line)
    }
}

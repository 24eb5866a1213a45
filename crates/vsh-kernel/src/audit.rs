//! XML audit log: one `<event>` per executed command.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <log>
//!   <event>
//!     <user>amy</user>
//!     <host>box</host>
//!     <datetime>2024-05-01T12:00:00</datetime>
//!     <command>cd</command>
//!     <args>docs</args>
//!     <cwd>~</cwd>
//!     <source>interactive</source>
//!   </event>
//! </log>
//! ```
//!
//! Each append rewrites the whole document. Logs are expected to stay small.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;
use vsh_types::AuditRecord;

/// Root element of the log document.
pub const LOG_TAG: &str = "log";
/// Element wrapping one record.
pub const EVENT_TAG: &str = "event";
/// Format of the `<datetime>` field (local time, seconds precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Failure to open or append to the audit log.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit log {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("audit log {} is not valid XML: {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
    #[error("audit log {} has no <log> root element", path.display())]
    MissingRoot { path: PathBuf },
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Handle to an XML audit log file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Open a log, creating parent directories and an empty `<log/>`
    /// document if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let path = path.into();
        let io_err = |source| AuditError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        if !path.exists() {
            fs::write(&path, empty_document()).map_err(io_err)?;
            tracing::debug!(path = %path.display(), "created audit log");
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record before the closing `</log>`.
    pub fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let existing = fs::read_to_string(&self.path).map_err(|source| AuditError::Io {
            path: self.path.clone(),
            source,
        })?;

        let updated = insert_event(&existing, record).map_err(|e| match e {
            RewriteError::Xml(source) => AuditError::Xml {
                path: self.path.clone(),
                source,
            },
            RewriteError::Io(source) => AuditError::Io {
                path: self.path.clone(),
                source,
            },
            RewriteError::MissingRoot => AuditError::MissingRoot {
                path: self.path.clone(),
            },
        })?;

        fs::write(&self.path, updated).map_err(|source| AuditError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn empty_document() -> String {
    format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<{LOG_TAG}/>\n")
}

#[derive(Debug)]
enum RewriteError {
    Xml(quick_xml::Error),
    Io(io::Error),
    MissingRoot,
}

impl From<quick_xml::Error> for RewriteError {
    fn from(err: quick_xml::Error) -> Self {
        RewriteError::Xml(err)
    }
}

impl From<io::Error> for RewriteError {
    fn from(err: io::Error) -> Self {
        RewriteError::Io(err)
    }
}

/// Copy `xml` event by event, inserting `record` as the last child of the
/// root `<log>`.
fn insert_event(xml: &str, record: &AuditRecord) -> Result<Vec<u8>, RewriteError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let mut depth = 0usize;
    let mut inserted = false;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Empty(start) if depth == 0 && start.name().as_ref() == LOG_TAG.as_bytes() => {
                writer.write_event(Event::Start(start))?;
                write_record(&mut writer, record)?;
                writer.write_event(Event::End(BytesEnd::new(LOG_TAG)))?;
                inserted = true;
            }
            Event::Start(start) => {
                depth += 1;
                writer.write_event(Event::Start(start))?;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                if depth == 0 && end.name().as_ref() == LOG_TAG.as_bytes() {
                    write_record(&mut writer, record)?;
                    inserted = true;
                }
                writer.write_event(Event::End(end))?;
            }
            event => writer.write_event(event)?,
        }
    }

    if !inserted {
        return Err(RewriteError::MissingRoot);
    }

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_record<W: io::Write>(
    writer: &mut Writer<W>,
    record: &AuditRecord,
) -> Result<(), RewriteError> {
    let args = record.joined_args();
    let fields = [
        ("user", record.user.as_str()),
        ("host", record.host.as_str()),
        ("datetime", record.timestamp.as_str()),
        ("command", record.command.as_str()),
        ("args", args.as_str()),
        ("cwd", record.cwd.as_str()),
        ("source", record.source.as_str()),
    ];

    writer.write_event(Event::Start(BytesStart::new(EVENT_TAG)))?;
    for (tag, value) in fields {
        // Empty fields still get a text event, or the indenter puts a
        // newline between the tags.
        writer.write_event(Event::Start(BytesStart::new(tag)))?;
        writer.write_event(Event::Text(BytesText::new(value)))?;
        writer.write_event(Event::End(BytesEnd::new(tag)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(EVENT_TAG)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vsh_types::CommandSource;

    fn temp_path(name: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir()
            .join(format!("vsh-audit-test-{}-{}", std::process::id(), id))
            .join(name)
    }

    fn record(command: &str, args: &[&str]) -> AuditRecord {
        AuditRecord {
            user: "amy".into(),
            host: "box".into(),
            timestamp: "2024-05-01T12:00:00".into(),
            command: command.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: "~".into(),
            source: CommandSource::Interactive,
        }
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn open_creates_parents_and_empty_log() {
        let path = temp_path("nested/deeper/log.xml");
        let log = AuditLog::open(&path).unwrap();
        let content = fs::read_to_string(log.path()).unwrap();
        cleanup(&path.parent().unwrap().to_path_buf());
        assert!(content.starts_with("<?xml"));
        assert!(content.contains("<log/>"));
    }

    #[test]
    fn open_keeps_existing_log() {
        let path = temp_path("log.xml");
        let log = AuditLog::open(&path).unwrap();
        log.append(&record("ls", &[])).unwrap();
        let reopened = AuditLog::open(&path).unwrap();
        let content = fs::read_to_string(reopened.path()).unwrap();
        cleanup(&path);
        assert_eq!(content.matches("<event>").count(), 1);
    }

    #[test]
    fn append_writes_all_fields() {
        let path = temp_path("log.xml");
        let log = AuditLog::open(&path).unwrap();
        log.append(&record("cd", &["a", "b"])).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        cleanup(&path);

        assert!(content.contains("<user>amy</user>"));
        assert!(content.contains("<host>box</host>"));
        assert!(content.contains("<datetime>2024-05-01T12:00:00</datetime>"));
        assert!(content.contains("<command>cd</command>"));
        assert!(content.contains("<args>a b</args>"));
        assert!(content.contains("<cwd>~</cwd>"));
        assert!(content.contains("<source>interactive</source>"));
    }

    #[test]
    fn append_preserves_order() {
        let path = temp_path("log.xml");
        let log = AuditLog::open(&path).unwrap();
        log.append(&record("first", &[])).unwrap();
        log.append(&record("second", &[])).unwrap();
        log.append(&record("third", &[])).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        cleanup(&path);

        assert_eq!(content.matches("<event>").count(), 3);
        let first = content.find("first").unwrap();
        let second = content.find("second").unwrap();
        let third = content.find("third").unwrap();
        assert!(first < second && second < third);
        assert!(content.trim_end().ends_with("</log>"));
    }

    /// Text content of every `<tag>` element in the document.
    fn field_texts(xml: &str, tag: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut texts = Vec::new();
        let mut current: Option<String> = None;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == tag.as_bytes() => {
                    current = Some(String::new())
                }
                Event::Text(t) => {
                    if let Some(text) = current.as_mut() {
                        text.push_str(&t.unescape().unwrap());
                    }
                }
                Event::End(e) if e.name().as_ref() == tag.as_bytes() => {
                    texts.extend(current.take());
                }
                Event::Eof => break,
                _ => {}
            }
        }
        texts
    }

    #[test]
    fn empty_fields_have_no_text() {
        let path = temp_path("log.xml");
        let log = AuditLog::open(&path).unwrap();
        log.append(&record("ls", &[])).unwrap();
        log.append(&record("exit", &[])).unwrap();
        let mut blank_cwd = record("cd", &["docs"]);
        blank_cwd.cwd = String::new();
        log.append(&blank_cwd).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        cleanup(&path);

        assert_eq!(field_texts(&content, "args"), vec!["", "", "docs"]);
        assert_eq!(field_texts(&content, "cwd"), vec!["~", "~", ""]);
        assert_eq!(field_texts(&content, "command"), vec!["ls", "exit", "cd"]);
    }

    #[test]
    fn append_escapes_markup() {
        let path = temp_path("log.xml");
        let log = AuditLog::open(&path).unwrap();
        log.append(&record("echo", &["<b>", "&"])).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        cleanup(&path);
        assert!(content.contains("<args>&lt;b&gt; &amp;</args>"));
    }

    #[test]
    fn append_to_garbage_fails() {
        let path = temp_path("log.xml");
        let log = AuditLog::open(&path).unwrap();
        fs::write(&path, "not xml at all").unwrap();
        let result = log.append(&record("ls", &[]));
        cleanup(&path);
        assert!(matches!(result, Err(AuditError::MissingRoot { .. })));
    }

    #[test]
    fn append_to_missing_file_fails() {
        let path = temp_path("log.xml");
        let log = AuditLog::open(&path).unwrap();
        cleanup(&path);
        assert!(matches!(log.append(&record("ls", &[])), Err(AuditError::Io { .. })));
    }

    #[test]
    fn timestamp_has_seconds_precision() {
        let ts = timestamp_now();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }
}

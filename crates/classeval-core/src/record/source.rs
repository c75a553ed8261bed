//! Record sources
//!
//! Every source filters its documents down to those holding a non-null value
//! in both configured fields and projects them onto those two fields.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde_json::Value;

use super::{FieldPair, RawRecord};
use crate::error::{EvalError, EvalResult};

/// A finite, repeatable stream of projected records
pub type RecordStream<'a> = Box<dyn Iterator<Item = EvalResult<RawRecord>> + Send + 'a>;

/// Supplier of labeled documents
///
/// Each call to [`RecordSource::scan`] starts an independent iteration, so
/// several aggregators may scan the same source concurrently.
pub trait RecordSource: Send + Sync {
    /// Human readable name used in logs and responses
    fn name(&self) -> &str;

    /// Start a scan projected onto `fields`
    fn scan(&self, fields: &FieldPair) -> EvalResult<RecordStream<'_>>;
}

/// Look up a field by name, falling back to a dotted path into nested objects
fn lookup<'v>(document: &'v Value, field: &str) -> Option<&'v Value> {
    if let Some(value) = document.get(field) {
        return Some(value);
    }
    if !field.contains('.') {
        return None;
    }
    field
        .split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

/// Project a document onto the label fields; `None` if either is absent or null
fn project(document: &Value, fields: &FieldPair) -> Option<RawRecord> {
    let actual = lookup(document, &fields.actual).filter(|v| !v.is_null())?;
    let predicted = lookup(document, &fields.predicted).filter(|v| !v.is_null())?;
    Some(RawRecord {
        actual: actual.clone(),
        predicted: predicted.clone(),
    })
}

/// In-memory collection of JSON documents
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    documents: Vec<Value>,
}

impl MemorySource {
    /// Create a source from a list of documents
    pub fn new(name: impl Into<String>, documents: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            documents,
        }
    }

    /// Append a document
    pub fn push(&mut self, document: Value) {
        self.documents.push(document);
    }
}

impl RecordSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn scan(&self, fields: &FieldPair) -> EvalResult<RecordStream<'_>> {
        let fields = fields.clone();
        Ok(Box::new(
            self.documents
                .iter()
                .filter_map(move |doc| project(doc, &fields))
                .map(Ok::<_, EvalError>),
        ))
    }
}

/// Newline-delimited JSON file, reopened for every scan
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
    name: String,
}

impl JsonLinesSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl RecordSource for JsonLinesSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn scan(&self, fields: &FieldPair) -> EvalResult<RecordStream<'_>> {
        let file = File::open(&self.path).map_err(|e| {
            EvalError::source(format!("failed to open {}: {}", self.path.display(), e))
        })?;
        let fields = fields.clone();
        let path = self.path.display().to_string();

        let stream = BufReader::new(file)
            .lines()
            .enumerate()
            .filter_map(move |(index, line)| {
                let line_no = index + 1;
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        return Some(Err(EvalError::source(format!(
                            "{}:{}: read failed: {}",
                            path, line_no, e
                        ))));
                    }
                };
                if line.trim().is_empty() {
                    return None;
                }
                let document: Value = match serde_json::from_str(&line) {
                    Ok(doc) => doc,
                    Err(e) => {
                        return Some(Err(EvalError::source(format!(
                            "{}:{}: invalid JSON: {}",
                            path, line_no, e
                        ))));
                    }
                };
                if !document.is_object() {
                    return Some(Err(EvalError::source(format!(
                        "{}:{}: expected a JSON object",
                        path, line_no
                    ))));
                }
                project(&document, &fields).map(Ok)
            });

        Ok(Box::new(stream))
    }
}

/// Wraps a source and keeps the records of the first projection scanned
///
/// The cache is filled once and never mutated afterwards. Scans with a
/// different projection go straight to the wrapped source.
pub struct CachedSource<S> {
    inner: S,
    cache: OnceCell<(FieldPair, Arc<Vec<RawRecord>>)>,
}

impl<S: RecordSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: OnceCell::new(),
        }
    }

    /// Whether a projection has been materialized
    pub fn is_populated(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn materialize(&self, fields: &FieldPair) -> EvalResult<(FieldPair, Arc<Vec<RawRecord>>)> {
        let records = self.inner.scan(fields)?.collect::<EvalResult<Vec<_>>>()?;
        tracing::debug!(
            source = self.inner.name(),
            records = records.len(),
            "cached record projection"
        );
        Ok((fields.clone(), Arc::new(records)))
    }
}

impl<S: RecordSource> RecordSource for CachedSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn scan(&self, fields: &FieldPair) -> EvalResult<RecordStream<'_>> {
        let (cached_fields, records) = self.cache.get_or_try_init(|| self.materialize(fields))?;
        if cached_fields != fields {
            return self.inner.scan(fields);
        }
        Ok(Box::new(records.iter().cloned().map(Ok::<_, EvalError>)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fields() -> FieldPair {
        FieldPair::new("animal", "animal_prediction")
    }

    #[test]
    fn test_memory_source_filters_missing_fields() {
        let source = MemorySource::new(
            "animals",
            vec![
                json!({"animal": "cat", "animal_prediction": "dog"}),
                json!({"animal": "cat"}),
                json!({"animal": null, "animal_prediction": "dog"}),
                json!({"animal": "ant", "animal_prediction": "ant", "extra": 1}),
            ],
        );

        let records: Vec<_> = source
            .scan(&fields())
            .unwrap()
            .collect::<EvalResult<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], RawRecord::new("cat", "dog"));
        assert_eq!(records[1], RawRecord::new("ant", "ant"));
    }

    #[test]
    fn test_dotted_field_lookup() {
        let source = MemorySource::new(
            "nested",
            vec![json!({"ml": {"label": 3, "prediction": 4}})],
        );
        let records: Vec<_> = source
            .scan(&FieldPair::new("ml.label", "ml.prediction"))
            .unwrap()
            .collect::<EvalResult<_>>()
            .unwrap();
        assert_eq!(records, vec![RawRecord::new(3, 4)]);
    }

    #[test]
    fn test_json_lines_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"animal": "dog", "animal_prediction": "dog"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"animal": "fox", "animal_prediction": "cat"}}"#).unwrap();

        let source = JsonLinesSource::new(file.path());
        for _ in 0..2 {
            let records: Vec<_> = source
                .scan(&fields())
                .unwrap()
                .collect::<EvalResult<_>>()
                .unwrap();
            assert_eq!(records.len(), 2);
        }
    }

    #[test]
    fn test_json_lines_source_reports_bad_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"animal": "dog", "animal_prediction": "dog"}}"#).unwrap();
        writeln!(file, "not json").unwrap();

        let source = JsonLinesSource::new(file.path());
        let err = source
            .scan(&fields())
            .unwrap()
            .collect::<EvalResult<Vec<_>>>()
            .unwrap_err();
        assert!(matches!(err, EvalError::Source { .. }));
        assert!(err.to_string().contains(":2:"));
    }

    #[test]
    fn test_json_lines_source_missing_file() {
        let source = JsonLinesSource::new("/nonexistent/records.jsonl");
        assert!(matches!(source.scan(&fields()), Err(EvalError::Source { .. })));
    }

    struct CountingSource {
        inner: MemorySource,
        scans: AtomicUsize,
    }

    impl RecordSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn scan(&self, fields: &FieldPair) -> EvalResult<RecordStream<'_>> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.inner.scan(fields)
        }
    }

    #[test]
    fn test_cached_source_scans_inner_once() {
        let source = CachedSource::new(CountingSource {
            inner: MemorySource::new(
                "animals",
                vec![json!({"animal": "cat", "animal_prediction": "cat"})],
            ),
            scans: AtomicUsize::new(0),
        });

        assert!(!source.is_populated());
        for _ in 0..3 {
            assert_eq!(source.scan(&fields()).unwrap().count(), 1);
        }
        assert!(source.is_populated());
        assert_eq!(source.into_inner().scans.load(Ordering::SeqCst), 1);
    }
}

//! `classeval request`: run a JSON evaluation request document

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use classeval_core::{EngineConfig, EvaluationRequest, JsonLinesSource};

/// Pick the record file: the command line wins over the request's `source`
fn resolve_records(
    request: &EvaluationRequest,
    request_path: &Path,
    records: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(records) = records {
        return Ok(records);
    }
    match &request.source {
        // relative sources are resolved against the request file's directory
        Some(source) => {
            let source = PathBuf::from(source);
            if source.is_relative() {
                if let Some(parent) = request_path.parent() {
                    return Ok(parent.join(source));
                }
            }
            Ok(source)
        }
        None => bail!("Request has no [source]; pass --records"),
    }
}

/// Run a request document
pub async fn run(
    config: EngineConfig,
    request_path: PathBuf,
    records: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let content = tokio::fs::read_to_string(&request_path)
        .await
        .with_context(|| format!("Failed to read request {}", request_path.display()))?;
    let request = EvaluationRequest::from_json(&content)?;

    let records = resolve_records(&request, &request_path, records)?;
    let response = super::execute(config, Arc::new(JsonLinesSource::new(&records)), &request).await?;
    super::print_response(&response, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use classeval_core::Classification;

    fn request(source: Option<&str>) -> EvaluationRequest {
        let mut request = EvaluationRequest::classification(Classification::new("a", "p"));
        request.source = source.map(str::to_string);
        request
    }

    #[test]
    fn test_command_line_records_win() {
        let path = resolve_records(
            &request(Some("from_request.jsonl")),
            Path::new("/tmp/req.json"),
            Some(PathBuf::from("cli.jsonl")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("cli.jsonl"));
    }

    #[test]
    fn test_relative_source_resolved_next_to_request() {
        let path =
            resolve_records(&request(Some("data.jsonl")), Path::new("/work/req.json"), None)
                .unwrap();
        assert_eq!(path, PathBuf::from("/work/data.jsonl"));

        let path =
            resolve_records(&request(Some("/abs/data.jsonl")), Path::new("/work/req.json"), None)
                .unwrap();
        assert_eq!(path, PathBuf::from("/abs/data.jsonl"));
    }

    #[test]
    fn test_missing_source() {
        assert!(resolve_records(&request(None), Path::new("req.json"), None).is_err());
    }

    #[tokio::test]
    async fn test_run_request_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("records.jsonl"),
            "{\"a\": \"cat\", \"p\": \"cat\"}\n{\"a\": \"dog\", \"p\": \"cat\"}\n",
        )
        .unwrap();
        let request_path = dir.path().join("request.json");
        std::fs::write(
            &request_path,
            r#"{"source": "records.jsonl",
                "evaluation": {"classification": {"actual_field": "a", "predicted_field": "p"}}}"#,
        )
        .unwrap();

        run(EngineConfig::default(), request_path, None, "json").await.unwrap();
    }

    #[tokio::test]
    async fn test_run_missing_records_file() {
        let dir = tempfile::tempdir().unwrap();
        let request_path = dir.path().join("request.json");
        std::fs::write(
            &request_path,
            r#"{"source": "absent.jsonl",
                "evaluation": {"classification": {"actual_field": "a", "predicted_field": "p"}}}"#,
        )
        .unwrap();

        assert!(run(EngineConfig::default(), request_path, None, "json").await.is_err());
    }
}

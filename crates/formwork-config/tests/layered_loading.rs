//! Integration test: a YAML file layered under the environment, loaded into
//! a typed record.

use std::io::Write;

use formwork_config::{load, EnvSource, FileSource, Layered};
use formwork_schema::{field, ErrorReason};

formwork_schema::record! {
    #[derive(Debug)]
    pub struct WorkerConfig {
        queue_url: String = "queueUrl" => field::string().url(),
        concurrency: i64 = "concurrency" => field::number().int().min(1).default(4),
        label: Option<String> = "label" => field::string().optional(),
    }
}

fn yaml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn environment_overrides_file() {
    let file = yaml("queueUrl: amqp://file-host\nconcurrency: 2\nlabel: batch\n");
    let source = Layered::new()
        .with(FileSource::new(file.path()))
        .with(EnvSource::from_vars([("WORKER_CONCURRENCY", "16")]).with_prefix("WORKER"));

    let config = load::<WorkerConfig>(&source).unwrap();
    assert_eq!(config.queue_url(), "amqp://file-host");
    assert_eq!(*config.concurrency(), 16);
    assert_eq!(config.label().as_deref(), Some("batch"));
}

#[test]
fn defaults_apply_when_no_layer_sets_a_field() {
    let file = yaml("queueUrl: amqp://file-host\n");
    let source = Layered::new()
        .with(FileSource::new(file.path()))
        .with(EnvSource::from_vars(Vec::<(String, String)>::new()));

    let config = load::<WorkerConfig>(&source).unwrap();
    assert_eq!(*config.concurrency(), 4);
    assert!(config.label().is_none());
}

#[test]
fn errors_from_merged_input_are_aggregated() {
    let file = yaml("concurrency: 0\n");
    let source = Layered::new().with(FileSource::new(file.path()));

    let err = load::<WorkerConfig>(&source).unwrap_err();
    let errors = err.validation_errors().unwrap();
    let summary: Vec<(&str, ErrorReason)> =
        errors.iter().map(|e| (e.path.as_str(), e.reason)).collect();
    assert_eq!(
        summary,
        vec![
            ("queueUrl", ErrorReason::MissingRequired),
            ("concurrency", ErrorReason::ConstraintViolation),
        ]
    );
    assert!(err.to_string().contains("file "));
}

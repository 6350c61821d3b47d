//! On-disk checks for the architecture guardrails.

use std::fs;
use std::path::PathBuf;

use architecture_lint::{ArchitectureLintError, LintSource, Violation};
use rstest::{fixture, rstest};
use tempfile::TempDir;

fn source(file: &str, contents: &str) -> LintSource {
    LintSource {
        file: PathBuf::from(file),
        contents: contents.to_owned(),
    }
}

#[fixture]
fn valid_modules() -> Vec<LintSource> {
    vec![
        source(
            "domain/ids.rs",
            "pub struct PatientId(String); impl PatientId { pub fn new(v: &str) -> Self { Self(v.to_owned()) } }",
        ),
        source(
            "domain/ports/patient_repository.rs",
            "use crate::domain::ids::PatientId; pub trait PatientRepository { fn find(&self, id: &PatientId); }",
        ),
        source(
            "outbound/memory/people.rs",
            "use crate::domain::ports::PatientRepository; use tracing::debug; pub struct Store;",
        ),
    ]
}

/// Write `sources` under a scratch `backend/src` and lint the tree.
fn lint_on_disk(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let temp_dir = TempDir::new().expect("tempdir");
    let backend_dir = temp_dir.path().join("backend");
    let src_dir = backend_dir.join("src");
    for source in sources {
        let path = src_dir.join(&source.file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, &source.contents).expect("write source file");
    }
    architecture_lint::lint_backend_sources(&backend_dir)
}

fn violations(outcome: Result<(), ArchitectureLintError>) -> Vec<Violation> {
    match outcome {
        Err(ArchitectureLintError::Violations(violations)) => violations,
        other => panic!("expected violations, got: {other:?}"),
    }
}

fn has_violation(violations: &[Violation], file: &str, fragment: &str) -> bool {
    let file = PathBuf::from(file);
    violations
        .iter()
        .any(|violation| violation.file == file && violation.message.contains(fragment))
}

#[rstest]
fn clean_tree_passes(valid_modules: Vec<LintSource>) {
    let outcome = lint_on_disk(&valid_modules);
    assert!(outcome.is_ok(), "expected success, got: {outcome:?}");
}

#[rstest]
fn composition_root_files_are_not_linted(mut valid_modules: Vec<LintSource>) {
    valid_modules.push(source(
        "main.rs",
        "use healthcore::outbound::memory; use color_eyre::Result; fn main() {}",
    ));
    valid_modules.push(source(
        "config.rs",
        "use ortho_config::OrthoConfig; use crate::domain::ids::PatientId;",
    ));

    assert!(lint_on_disk(&valid_modules).is_ok());
}

#[rstest]
fn every_violation_is_reported(mut valid_modules: Vec<LintSource>) {
    valid_modules.push(source(
        "domain/billing_service.rs",
        "use healthcore::outbound::memory::InMemoryInvoiceRepository; fn wire() {}",
    ));
    valid_modules.push(source(
        "domain/service_support.rs",
        "use ortho_config::OrthoConfig; fn policy() {}",
    ));
    valid_modules.push(source(
        "outbound/memory/store.rs",
        "use crate::config::HealthcoreSettings; fn open() {}",
    ));

    let found = violations(lint_on_disk(&valid_modules));

    assert_eq!(found.len(), 3, "got: {found:?}");
    assert!(has_violation(&found, "domain/billing_service.rs", "crate::outbound"));
    assert!(has_violation(
        &found,
        "domain/service_support.rs",
        "external crate `ortho_config`"
    ));
    assert!(has_violation(&found, "outbound/memory/store.rs", "crate::config"));
}

#[rstest]
fn unparsable_sources_fail_with_the_file_name() {
    let outcome = lint_on_disk(&[source("domain/broken.rs", "fn broken( {")]);

    match outcome {
        Err(ArchitectureLintError::Parse { file, .. }) => {
            assert_eq!(file, PathBuf::from("domain/broken.rs"));
        }
        other => panic!("expected a parse error, got: {other:?}"),
    }
}

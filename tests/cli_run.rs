// tests/cli_run.rs

use std::error::Error;
use std::io::Write;

use clap::Parser;
use rtdag::cli::CliArgs;
use rtdag::config::default_config_path;
use rtdag::errors::RtDagError;
use rtdag::run;
use rtdag_test_utils::init_tracing;
use tempfile::NamedTempFile;

type TestResult = Result<(), Box<dyn Error>>;

// 16 candidate DAGs against a cap of 3.
const OVERSIZED: &str = r#"
[analysis]
max_candidates = 3

[[task]]
name = "A"
period = 10
wcet = 1

[[task]]
name = "B"
period = 10
wcet = 1

[[task]]
name = "C"
period = 40
wcet = 1

[[edge]]
from = "A"
to = "B"
kind = "data"
jitter = 30

[[edge]]
from = "B"
to = "A"
kind = "data"
jitter = 30
"#;

fn task_set_file(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{contents}")?;
    Ok(file)
}

fn args(file: &NamedTempFile, extra: &[&str]) -> Result<CliArgs, Box<dyn Error>> {
    let config = file.path().to_string_lossy().into_owned();
    let mut argv = vec!["rtdag", "--config", config.as_str()];
    argv.extend_from_slice(extra);
    Ok(CliArgs::try_parse_from(argv)?)
}

#[test]
fn config_defaults_to_rtdag_toml() -> TestResult {
    let args = CliArgs::try_parse_from(["rtdag"])?;
    assert_eq!(args.config, default_config_path());
    assert!(!args.dry_run);
    Ok(())
}

#[test]
fn dry_run_sizes_a_space_over_the_cap() -> TestResult {
    init_tracing();

    let file = task_set_file(OVERSIZED)?;
    run(args(&file, &["--dry-run"])?)?;
    Ok(())
}

#[test]
fn enumeration_over_the_cap_is_refused() -> TestResult {
    init_tracing();

    let file = task_set_file(OVERSIZED)?;
    let err = run(args(&file, &[])?).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RtDagError>(),
        Some(RtDagError::EnumerationTooLarge {
            candidates: Some(16),
            limit: 3
        })
    ));
    Ok(())
}

#[test]
fn max_candidates_flag_raises_the_cap() -> TestResult {
    let file = task_set_file(OVERSIZED)?;
    run(args(&file, &["--max-candidates", "16"])?)?;
    Ok(())
}

#[test]
fn too_many_jobs_is_reported_before_unrolling() -> TestResult {
    let file = task_set_file(
        r#"
[analysis]
hyperperiod = "lcm"

[[task]]
name = "fast"
period = 1
wcet = 1

[[task]]
name = "odd"
period = 999983
wcet = 1

[[task]]
name = "odder"
period = 1000003
wcet = 1
"#,
    )?;
    let err = run(args(&file, &["--dry-run"])?).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RtDagError>(),
        Some(RtDagError::TooManyJobs { .. })
    ));
    Ok(())
}

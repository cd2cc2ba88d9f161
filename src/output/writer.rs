// src/output/writer.rs
//! Executes output operations by performing actual I/O.
//!
//! This module is the only place where results are written out.

use super::types::*;
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Delivers the output plan. Individual failures are recorded, not raised.
pub fn deliver(plan: OutputPlan) -> Result<OutputReport, AppError> {
    let mut report = OutputReport::new();
    let start_time = Instant::now();

    log::debug!(
        "Executing output plan with {} operations",
        plan.operations.len()
    );

    for operation in plan.operations {
        match execute_operation(&operation) {
            Ok(bytes_written) => {
                report = report.with_completed(CompletedOperation {
                    operation,
                    bytes_written,
                });
            }
            Err(e) => {
                log::error!("Operation failed: {}", e);
                report = report.with_failed(FailedOperation {
                    operation,
                    error: e.to_string(),
                });
            }
        }
    }

    report.stats.total_duration_ms = start_time.elapsed().as_millis() as u64;

    log::debug!(
        "Output plan execution complete: {} succeeded, {} failed in {}ms",
        report.stats.operations_completed,
        report.stats.operations_failed,
        report.stats.total_duration_ms
    );

    Ok(report)
}

/// Delivers the plan and turns any failed operation into an error.
pub fn deliver_all(plan: OutputPlan) -> Result<OutputReport, AppError> {
    let report = deliver(plan)?;
    if !report.is_success() {
        return Err(AppError::DeliveryFailed {
            failures: report.failed.iter().map(|f| f.error.clone()).collect(),
        });
    }
    Ok(report)
}

fn execute_operation(operation: &DeliveryTarget) -> Result<usize, AppError> {
    match operation {
        DeliveryTarget::WriteFile { path, content } => write_file(path, content),
        DeliveryTarget::PrintToStdout { content } => {
            print_to_stdout(content)?;
            Ok(content.len())
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    log::info!("Wrote file: {}", path.display());
    Ok(content.len())
}

fn print_to_stdout(content: &str) -> Result<(), AppError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/result.json");
        let plan = OutputPlan::new().with_operation(DeliveryTarget::WriteFile {
            path: path.clone(),
            content: "{}\n".to_string(),
        });

        let report = deliver_all(plan).unwrap();
        assert_eq!(report.stats.bytes_written, 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn test_failed_write_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten as a file.
        let plan = OutputPlan::new().with_operation(DeliveryTarget::WriteFile {
            path: dir.path().to_path_buf(),
            content: "x".to_string(),
        });

        let report = deliver(plan.clone()).unwrap();
        assert_eq!(report.stats.operations_failed, 1);
        assert!(matches!(
            deliver_all(plan),
            Err(AppError::DeliveryFailed { .. })
        ));
    }

    #[test]
    fn test_plan_for_result() {
        let out = PathBuf::from("out.json");
        let plan = OutputPlan::for_result("{}", Some(&out));
        assert_eq!(plan.operations.len(), 2);
        assert_eq!(
            plan.operations[1],
            DeliveryTarget::WriteFile {
                path: out,
                content: "{}\n".to_string()
            }
        );
        assert_eq!(OutputPlan::for_result("{}", None).operations.len(), 1);
    }
}

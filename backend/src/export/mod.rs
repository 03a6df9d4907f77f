//! Result Export
//!
//! Writes a completed run to external formats:
//! - Timeline CSV (`time_start,time_end,cpu_state,job`)
//! - Jobs CSV (`task_id,job_id,release,start,finish,deadline,response,missed,preemptions`)
//! - Report JSON (`RunReport`, pretty-printed)
//!
//! Absent start/finish/response values are written as `-1`. That sentinel
//! exists only in the CSV encoding; the models use `Option`.
//!
//! # Example
//!
//! ```rust
//! use sched_simulator_core_rs::export::write_timeline_csv;
//! use sched_simulator_core_rs::Segment;
//!
//! let timeline = vec![Segment::run(0, 3, "T1J1"), Segment::idle(3, 10)];
//! let mut out = Vec::new();
//! write_timeline_csv(&mut out, &timeline).unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "time_start,time_end,cpu_state,job\n0,3,RUN,T1J1\n3,10,IDLE,IDLE\n"
//! );
//! ```

use crate::models::{Job, Segment};
use crate::orchestrator::RunReport;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TIMELINE_HEADER: &str = "time_start,time_end,cpu_state,job";
pub const JOBS_HEADER: &str =
    "task_id,job_id,release,start,finish,deadline,response,missed,preemptions";

/// Errors raised while writing results
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Write failed: {0}")]
    Write(#[from] io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write the segment timeline as CSV
pub fn write_timeline_csv<W: Write>(writer: &mut W, timeline: &[Segment]) -> Result<(), ExportError> {
    writeln!(writer, "{}", TIMELINE_HEADER)?;
    for seg in timeline {
        writeln!(writer, "{},{},{},{}", seg.start, seg.end, seg.state, seg.label)?;
    }
    Ok(())
}

/// Write per-job statistics as CSV
pub fn write_jobs_csv<W: Write>(writer: &mut W, jobs: &[Job]) -> Result<(), ExportError> {
    writeln!(writer, "{}", JOBS_HEADER)?;
    for job in jobs {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{}",
            job.task_id(),
            job.seq(),
            job.release_tick(),
            csv_optional(job.start_tick()),
            csv_optional(job.finish_tick()),
            job.abs_deadline(),
            csv_optional(job.response_time()),
            u8::from(job.missed_deadline()),
            job.preemptions()
        )?;
    }
    Ok(())
}

/// Write a report as pretty JSON
pub fn write_report_json<W: Write>(writer: &mut W, report: &RunReport) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

/// Paths written by [`export_run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub timeline: PathBuf,
    pub jobs: PathBuf,
    pub report: PathBuf,
}

/// Write `timeline.csv`, `jobs.csv` and `report.json` into `dir`
///
/// The directory is created if missing.
pub fn export_run(dir: impl AsRef<Path>, report: &RunReport) -> Result<ExportPaths, ExportError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let paths = ExportPaths {
        timeline: dir.join("timeline.csv"),
        jobs: dir.join("jobs.csv"),
        report: dir.join("report.json"),
    };

    write_file(&paths.timeline, |w| write_timeline_csv(w, &report.result.timeline))?;
    write_file(&paths.jobs, |w| write_jobs_csv(w, &report.result.jobs))?;
    write_file(&paths.report, |w| write_report_json(w, report))?;

    Ok(paths)
}

fn write_file<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), ExportError>,
{
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_optional(value: Option<usize>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-1".to_string(),
    }
}

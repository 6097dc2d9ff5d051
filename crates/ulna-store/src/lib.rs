//! Ulna Store Layer
//!
//! Append-only JSONL case logging. Three files under one data directory:
//!
//! - `cases.jsonl` - the full record of every advisory interaction
//! - `fine_tune_dataset.jsonl` - the same cases restructured into
//!   prompt/response message pairs for later model training
//! - `urgent_care_cases.jsonl` - the splint/diagnosis-focused subset for
//!   urgent-care review
//!
//! Records are written once and never updated or deleted. Each append is a
//! single whole-line write, so concurrent requests interleave at line
//! granularity under ordinary file-append semantics. There is no schema
//! migration, compaction, or indexing.

#![warn(missing_docs)]

use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use ulna_domain::{CaseInput, CaseRecord, CaseReport};

/// Primary case log file name
pub const CASES_FILE: &str = "cases.jsonl";

/// Fine-tuning dataset file name
pub const FINE_TUNE_FILE: &str = "fine_tune_dataset.jsonl";

/// Urgent-care subset file name
pub const URGENT_CARE_FILE: &str = "urgent_care_cases.jsonl";

/// Errors that can occur reading or writing the case log
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("Log I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record failed to serialize
    #[error("Log serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Which log file an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// The primary case log
    Cases,
    /// The fine-tuning dataset
    FineTune,
    /// The urgent-care subset
    UrgentCare,
}

impl LogKind {
    /// File name for this log
    pub fn file_name(&self) -> &'static str {
        match self {
            LogKind::Cases => CASES_FILE,
            LogKind::FineTune => FINE_TUNE_FILE,
            LogKind::UrgentCare => URGENT_CARE_FILE,
        }
    }

    /// Human-readable format tag for export metadata
    pub fn format_tag(&self) -> &'static str {
        match self {
            LogKind::Cases => "JSONL (full case records)",
            LogKind::FineTune => "JSONL (chat fine-tuning pairs)",
            LogKind::UrgentCare => "JSONL (urgent care / PA fine-tuning)",
        }
    }
}

/// Metadata describing an export file
#[derive(Debug, Clone, Serialize)]
pub struct ExportInfo {
    /// Absolute or configured path to the file
    pub path: String,

    /// Number of records (lines) currently in the file
    pub count: usize,

    /// Format tag
    pub format: String,
}

/// One chat message of a fine-tuning pair
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// One line of the fine-tuning dataset
#[derive(Debug, Serialize)]
struct FineTuneLine {
    messages: Vec<ChatMessage>,
}

/// The urgent-care subset of a case report
#[derive(Debug, Serialize)]
struct UrgentCareOutput<'a> {
    diagnosis_summary: &'a str,
    suggested_diagnosis: &'a Option<String>,
    recommended_splint: &'a ulna_domain::SplintRecommendation,
    other_recommendations: &'a [String],
    confidence: ulna_domain::ConfidenceLevel,
    nih_articles: &'a [ulna_domain::Article],
    additional_splints_from_nih: &'a [String],
    suggested_diagnosis_terms_from_nih: &'a [String],
}

/// One line of the urgent-care log
#[derive(Debug, Serialize)]
struct UrgentCareLine<'a> {
    case_id: ulna_domain::CaseId,
    timestamp: u64,
    source: &'static str,
    input: &'a CaseInput,
    output: UrgentCareOutput<'a>,
}

/// Append-only JSONL case log rooted at a data directory
pub struct CaseLog {
    data_dir: PathBuf,
}

impl CaseLog {
    /// Open (creating if needed) a case log at the given directory
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Path of a log file
    pub fn path(&self, kind: LogKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Append the full record to the primary case log
    pub fn append_case(&self, record: &CaseRecord) -> Result<(), StoreError> {
        self.append_line(LogKind::Cases, record)
    }

    /// Append the prompt/response pair variant to the fine-tuning dataset
    pub fn append_fine_tune(
        &self,
        input: &CaseInput,
        report: &CaseReport,
    ) -> Result<(), StoreError> {
        let context = input.optional_context.as_deref().unwrap_or("None");
        let line = FineTuneLine {
            messages: vec![
                ChatMessage {
                    role: "user",
                    content: format!("Problem: {}. Context: {}.", input.problem, context),
                },
                ChatMessage {
                    role: "assistant",
                    content: serde_json::to_string(report)?,
                },
            ],
        };
        self.append_line(LogKind::FineTune, &line)
    }

    /// Append the splint/diagnosis-focused subset to the urgent-care log
    pub fn append_urgent_care(&self, record: &CaseRecord) -> Result<(), StoreError> {
        let report = &record.output;
        let line = UrgentCareLine {
            case_id: record.case_id,
            timestamp: record.timestamp,
            source: "urgent_care",
            input: &record.input,
            output: UrgentCareOutput {
                diagnosis_summary: &report.diagnosis_summary,
                suggested_diagnosis: &report.suggested_diagnosis,
                recommended_splint: &report.recommended_splint,
                other_recommendations: &report.other_recommendations,
                confidence: report.confidence,
                nih_articles: &report.nih_articles,
                additional_splints_from_nih: &report.additional_splints_from_nih,
                suggested_diagnosis_terms_from_nih: &report.suggested_diagnosis_terms_from_nih,
            },
        };
        self.append_line(LogKind::UrgentCare, &line)
    }

    /// Most recent `limit` entries of a log, newest first
    ///
    /// Entries are returned as raw JSON values; lines that fail to parse
    /// are skipped rather than failing the read.
    pub fn recent(&self, kind: LogKind, limit: usize) -> Result<Vec<serde_json::Value>, StoreError> {
        let path = self.path(kind);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let reader = BufReader::new(File::open(&path)?);
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str(trimmed) {
                Ok(value) => entries.push(value),
                Err(e) => {
                    tracing::warn!("Skipping unparseable log line in {}: {}", kind.file_name(), e)
                }
            }
        }

        let start = entries.len().saturating_sub(limit);
        let mut recent: Vec<_> = entries.split_off(start);
        recent.reverse();
        Ok(recent)
    }

    /// Export metadata for a log: path, line count, format tag
    pub fn export_info(&self, kind: LogKind) -> Result<ExportInfo, StoreError> {
        let path = self.path(kind);
        let count = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            reader.lines().count()
        } else {
            0
        };

        Ok(ExportInfo {
            path: path.display().to_string(),
            count,
            format: kind.format_tag().to_string(),
        })
    }

    /// Append one record as a single whole-line write
    fn append_line<T: Serialize>(&self, kind: LogKind, record: &T) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(kind))?;

        // One write call for the whole line keeps appends untorn under
        // ordinary file-append semantics
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// The data directory this log writes under
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_kind_file_names() {
        assert_eq!(LogKind::Cases.file_name(), "cases.jsonl");
        assert_eq!(LogKind::FineTune.file_name(), "fine_tune_dataset.jsonl");
        assert_eq!(LogKind::UrgentCare.file_name(), "urgent_care_cases.jsonl");
    }
}

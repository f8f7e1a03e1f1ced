//! CSV batch scoring: every row is evaluated independently and written back
//! with `decision`, `risk_score` and `reasons` columns.

mod reader;
mod writer;

use crate::scoring::{Decision, DecisionResult, RiskEngine, TransactionInput};
use csv::StringRecord;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

pub use writer::OUTPUT_COLUMNS;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to access transaction file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid transaction CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// One input row together with its evaluation.
#[derive(Debug, Clone)]
pub struct ScoredRow {
    pub record: StringRecord,
    pub result: DecisionResult,
}

/// Scored rows in input order, plus the input header.
#[derive(Debug, Clone)]
pub struct ScoredBatch {
    headers: StringRecord,
    rows: Vec<ScoredRow>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub accepted: usize,
    pub in_review: usize,
    pub rejected: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.accepted + self.in_review + self.rejected
    }
}

impl ScoredBatch {
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[ScoredRow] {
        &self.rows
    }

    pub fn summary(&self) -> BatchSummary {
        self.rows
            .iter()
            .fold(BatchSummary::default(), |mut summary, row| {
                match row.result.decision {
                    Decision::Accepted => summary.accepted += 1,
                    Decision::InReview => summary.in_review += 1,
                    Decision::Rejected => summary.rejected += 1,
                }
                summary
            })
    }

    /// Header of the written file: input columns, then any output column the
    /// input did not already carry.
    pub fn output_headers(&self) -> StringRecord {
        writer::output_headers(&self.headers)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), BatchError> {
        writer::write_batch(self, writer)
    }

    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<(), BatchError> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)
    }
}

pub struct BatchScorer<'a> {
    engine: &'a RiskEngine,
}

impl<'a> BatchScorer<'a> {
    pub fn new(engine: &'a RiskEngine) -> Self {
        Self { engine }
    }

    pub fn score_path<P: AsRef<Path>>(&self, path: P) -> Result<ScoredBatch, BatchError> {
        let file = std::fs::File::open(path)?;
        self.score_reader(file)
    }

    pub fn score_reader<R: Read>(&self, source: R) -> Result<ScoredBatch, BatchError> {
        let (headers, records) = reader::read_records(source)?;

        let rows = records
            .into_iter()
            .map(|record| {
                let input = TransactionInput::from_fields(headers.iter().zip(record.iter()));
                let result = self.engine.evaluate(&input);
                ScoredRow { record, result }
            })
            .collect();

        let batch = ScoredBatch { headers, rows };
        let summary = batch.summary();
        info!(
            rows = summary.total(),
            accepted = summary.accepted,
            in_review = summary.in_review,
            rejected = summary.rejected,
            "transaction batch scored"
        );
        Ok(batch)
    }
}

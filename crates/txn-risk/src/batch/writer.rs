use super::{BatchError, ScoredBatch, ScoredRow};
use csv::StringRecord;
use std::io::Write;

/// Columns appended to every scored row.
pub const OUTPUT_COLUMNS: [&str; 3] = ["decision", "risk_score", "reasons"];

pub(crate) fn output_headers(input: &StringRecord) -> StringRecord {
    let mut headers = input.clone();
    for column in OUTPUT_COLUMNS {
        if !input.iter().any(|existing| existing == column) {
            headers.push_field(column);
        }
    }
    headers
}

pub(crate) fn write_batch<W: Write>(batch: &ScoredBatch, writer: W) -> Result<(), BatchError> {
    let headers = output_headers(&batch.headers);
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&headers)?;

    for row in &batch.rows {
        csv_writer.write_record(&output_row(&headers, row))?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn output_row(headers: &StringRecord, row: &ScoredRow) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(index, column)| match column {
            "decision" => row.result.decision.to_string(),
            "risk_score" => row.result.risk_score.to_string(),
            "reasons" => row.result.reasons.to_string(),
            _ => row.record.get(index).unwrap_or_default().to_string(),
        })
        .collect()
}

use txn_risk::batch::{BatchScorer, BatchSummary, OUTPUT_COLUMNS};
use txn_risk::scoring::{Decision, RiskEngine};

const EXAMPLES: &[u8] = include_bytes!("../transactions_examples.csv");

#[test]
fn example_file_scores_every_row() {
    let engine = RiskEngine::default();
    let batch = BatchScorer::new(&engine)
        .score_reader(EXAMPLES)
        .expect("examples score");

    let scores: Vec<(i32, Decision)> = batch
        .rows()
        .iter()
        .map(|row| (row.result.risk_score, row.result.decision))
        .collect();
    assert_eq!(
        scores,
        vec![
            (0, Decision::Accepted),
            (5, Decision::InReview),
            (4, Decision::InReview),
            (4, Decision::InReview),
            (100, Decision::Rejected),
            (9, Decision::InReview),
            (20, Decision::Rejected),
            (-1, Decision::Accepted),
        ]
    );
    assert_eq!(
        batch.summary(),
        BatchSummary {
            accepted: 2,
            in_review: 4,
            rejected: 2,
        }
    );
}

#[test]
fn written_file_keeps_input_columns_and_appends_results() {
    let engine = RiskEngine::default();
    let batch = BatchScorer::new(&engine)
        .score_reader(EXAMPLES)
        .expect("examples score");

    let mut buffer = Vec::new();
    batch.write_to(&mut buffer).expect("batch writes");

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.get(0), Some("transaction_id"));
    let tail: Vec<&str> = headers.iter().skip(headers.len() - 3).collect();
    assert_eq!(tail, OUTPUT_COLUMNS.to_vec());

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("rows parse");
    assert_eq!(rows.len(), 8);

    let reasons_index = headers.len() - 1;
    assert_eq!(rows[0].get(reasons_index), Some(""));
    assert_eq!(
        rows[1].get(reasons_index),
        Some("night_hour:23(+1);geo_mismatch:US!=MX(+2);latency_extreme:3000ms(+2)")
    );
    assert_eq!(
        rows[6].get(reasons_index),
        Some(
            "ip_risk:medium(+2);email_risk:high(+3);device_fingerprint_risk:high(+4);\
user_reputation:high_risk(+4);night_hour:2(+1);geo_mismatch:US!=CO(+2);\
high_amount:subscription:9000.0(+2);latency_extreme:2800ms(+2)"
        )
    );
    assert_eq!(rows[7].get(reasons_index), Some("user_reputation:recurrent(-1)"));
    assert_eq!(rows[4].get(headers.len() - 3), Some("REJECTED"));
    assert_eq!(rows[4].get(2), Some("0"));
    assert_eq!(rows[4].get(3), Some("Nuevo León"));
}

#[test]
fn batch_round_trips_through_the_filesystem() {
    let dir = std::env::temp_dir();
    let input = dir.join(format!("txn-risk-input-{}.csv", std::process::id()));
    let output = dir.join(format!("txn-risk-output-{}.csv", std::process::id()));
    std::fs::write(&input, EXAMPLES).expect("input written");

    let engine = RiskEngine::default();
    let batch = BatchScorer::new(&engine)
        .score_path(&input)
        .expect("input scores");
    batch.write_path(&output).expect("output written");

    let written = std::fs::read_to_string(&output).expect("output readable");
    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&output).ok();

    assert!(written.starts_with("transaction_id,"));
    assert!(written.contains("hard_block:chargebacks>=2+ip_high"));
}

#[test]
fn missing_input_file_is_an_io_error() {
    let engine = RiskEngine::default();
    let err = BatchScorer::new(&engine)
        .score_path("/nonexistent/transactions.csv")
        .expect_err("missing file");
    assert!(matches!(err, txn_risk::batch::BatchError::Io(_)));
}

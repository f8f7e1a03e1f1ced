use csv::StringRecord;
use std::io::Read;

pub(crate) fn read_records<R: Read>(
    reader: R,
) -> Result<(StringRecord, Vec<StringRecord>), csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let records = csv_reader
        .records()
        .collect::<Result<Vec<_>, csv::Error>>()?;

    Ok((headers, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_headers_and_cells() {
        let (headers, records) =
            read_records(" hour , ip_risk \n 23 , high \n".as_bytes()).expect("parses");

        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["hour", "ip_risk"]);
        assert_eq!(records[0].iter().collect::<Vec<_>>(), vec!["23", "high"]);
    }

    #[test]
    fn header_only_input_has_no_records() {
        let (headers, records) = read_records("hour,ip_risk\n".as_bytes()).expect("parses");
        assert_eq!(headers.len(), 2);
        assert!(records.is_empty());
    }
}

//! CSV decoding.

use datatree_core::Value;

/// Decode a CSV document with a header row.
///
/// Each data row becomes a mapping from header field to cell text, in column
/// order. Fields missing from a short row are null. Cells beyond the header
/// are collected in a sequence under a null key, which no node name accepts.
pub fn decode(text: &str) -> Result<Value, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut cells = record.iter();
        let mut row: Vec<(Value, Value)> = headers
            .iter()
            .map(|field| {
                let cell = cells.next().map_or(Value::Null, Value::from);
                (Value::from(field), cell)
            })
            .collect();
        let rest: Vec<Value> = cells.map(Value::from).collect();
        if !rest.is_empty() {
            row.push((Value::Null, Value::Sequence(rest)));
        }
        rows.push(Value::Mapping(row));
    }
    Ok(Value::Sequence(rows))
}

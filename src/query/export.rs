//! Tabular export of query results
//!
//! Each query type's result payload has its own nesting; export flattens it
//! into uniform rows. Two output modes:
//!
//! - [`Query::export_records`]: record-oriented rows for downstream tabular
//!   consumers
//! - [`Query::export_tsv`] / [`Query::export_tsv_path`]: tab-separated
//!   UTF-8 text with newline-terminated rows
//!
//! Only timeseries, topN, and groupBy results have a defined tabular shape;
//! other query types fail with `UnsupportedExport`.

use std::io::Write;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{DruidError, DruidResult};

use super::types::{Query, QueryType};

impl Query {
    /// Flatten the result into record-oriented rows.
    ///
    /// Each record carries the row's own columns plus `timestamp` (and
    /// `version` for groupBy), in result order. An empty or absent result
    /// yields an empty vector.
    pub fn export_records(&self) -> DruidResult<Vec<Map<String, Value>>> {
        match self.query_type() {
            QueryType::Timeseries => self.timeseries_records(),
            QueryType::TopN => self.topn_records(),
            QueryType::GroupBy => self.groupby_records(),
            other => Err(DruidError::UnsupportedExport(other)),
        }
    }

    /// Write the result as tab-separated text.
    ///
    /// The header row is derived from the first result row's columns; later
    /// rows are written in their own column order and are not realigned if
    /// their key sets differ from the first row's. An empty or absent
    /// result produces no output at all, header included.
    pub fn export_tsv<W: Write>(&self, writer: W) -> DruidResult<()> {
        // flexible: rows are written in their own column order and may be
        // wider or narrower than the first-row header
        let mut tsv = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_writer(writer);

        match self.query_type() {
            QueryType::Timeseries => self.write_timeseries_tsv(&mut tsv)?,
            QueryType::TopN => self.write_topn_tsv(&mut tsv)?,
            QueryType::GroupBy => self.write_groupby_tsv(&mut tsv)?,
            other => return Err(DruidError::UnsupportedExport(other)),
        }

        tsv.flush()?;
        Ok(())
    }

    /// Write the result as a TSV file at `path`
    pub fn export_tsv_path(&self, path: impl AsRef<Path>) -> DruidResult<()> {
        let file = std::fs::File::create(path)?;
        self.export_tsv(file)
    }

    /// The result payload as a row slice; absent result counts as empty
    fn result_rows(&self) -> DruidResult<&[Value]> {
        match self.result() {
            None => Ok(&[]),
            Some(Value::Array(rows)) => Ok(rows),
            Some(_) => Err(DruidError::ResponseShape(
                "result payload is not an array".to_owned(),
            )),
        }
    }

    fn timeseries_records(&self) -> DruidResult<Vec<Map<String, Value>>> {
        let mut records = Vec::new();
        for row in self.result_rows()? {
            let timestamp = scalar_field(row, "timestamp")?;
            let mut record = object_field(row, "result")?.clone();
            record.insert("timestamp".to_owned(), timestamp.clone());
            records.push(record);
        }
        Ok(records)
    }

    fn topn_records(&self) -> DruidResult<Vec<Map<String, Value>>> {
        let mut records = Vec::new();
        for row in self.result_rows()? {
            let timestamp = scalar_field(row, "timestamp")?;
            for line in array_field(row, "result")? {
                let mut record = as_object(line)?.clone();
                record.insert("timestamp".to_owned(), timestamp.clone());
                records.push(record);
            }
        }
        Ok(records)
    }

    fn groupby_records(&self) -> DruidResult<Vec<Map<String, Value>>> {
        let mut records = Vec::new();
        for row in self.result_rows()? {
            let timestamp = scalar_field(row, "timestamp")?;
            let version = scalar_field(row, "version")?;
            let mut record = object_field(row, "event")?.clone();
            record.insert("timestamp".to_owned(), timestamp.clone());
            record.insert("version".to_owned(), version.clone());
            records.push(record);
        }
        Ok(records)
    }

    fn write_timeseries_tsv<W: Write>(&self, tsv: &mut csv::Writer<W>) -> DruidResult<()> {
        let rows = self.result_rows()?;
        let Some(first) = rows.first() else {
            return Ok(());
        };

        let mut header = keys(object_field(first, "result")?);
        header.push("timestamp".to_owned());
        tsv.write_record(&header)?;

        for row in rows {
            let mut record = cells(object_field(row, "result")?);
            record.push(cell(scalar_field(row, "timestamp")?));
            tsv.write_record(&record)?;
        }
        Ok(())
    }

    fn write_topn_tsv<W: Write>(&self, tsv: &mut csv::Writer<W>) -> DruidResult<()> {
        let rows = self.result_rows()?;
        let Some(first) = rows.first() else {
            return Ok(());
        };

        let mut header = match array_field(first, "result")?.first() {
            Some(line) => keys(as_object(line)?),
            None => Vec::new(),
        };
        header.push("timestamp".to_owned());
        tsv.write_record(&header)?;

        for row in rows {
            let timestamp = cell(scalar_field(row, "timestamp")?);
            for line in array_field(row, "result")? {
                let mut record = cells(as_object(line)?);
                record.push(timestamp.clone());
                tsv.write_record(&record)?;
            }
        }
        Ok(())
    }

    fn write_groupby_tsv<W: Write>(&self, tsv: &mut csv::Writer<W>) -> DruidResult<()> {
        let rows = self.result_rows()?;
        let Some(first) = rows.first() else {
            return Ok(());
        };

        let mut header = keys(object_field(first, "event")?);
        header.push("timestamp".to_owned());
        header.push("version".to_owned());
        tsv.write_record(&header)?;

        for row in rows {
            let mut record = cells(object_field(row, "event")?);
            record.push(cell(scalar_field(row, "timestamp")?));
            record.push(cell(scalar_field(row, "version")?));
            tsv.write_record(&record)?;
        }
        Ok(())
    }
}

fn scalar_field<'a>(row: &'a Value, field: &str) -> DruidResult<&'a Value> {
    row.get(field).ok_or_else(|| {
        DruidError::ResponseShape(format!("result row is missing field {field:?}"))
    })
}

fn object_field<'a>(row: &'a Value, field: &str) -> DruidResult<&'a Map<String, Value>> {
    row.get(field).and_then(Value::as_object).ok_or_else(|| {
        DruidError::ResponseShape(format!("result row is missing object field {field:?}"))
    })
}

fn array_field<'a>(row: &'a Value, field: &str) -> DruidResult<&'a Vec<Value>> {
    row.get(field).and_then(Value::as_array).ok_or_else(|| {
        DruidError::ResponseShape(format!("result row is missing array field {field:?}"))
    })
}

fn as_object(value: &Value) -> DruidResult<&Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        DruidError::ResponseShape("result entry is not an object".to_owned())
    })
}

fn keys(object: &Map<String, Value>) -> Vec<String> {
    object.keys().cloned().collect()
}

fn cells(object: &Map<String, Value>) -> Vec<String> {
    object.values().map(cell).collect()
}

/// Render a JSON value as a TSV cell: strings unquoted, everything else in
/// its JSON form
fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn executed(query_type: QueryType, body: &str) -> Query {
        let mut query = Query::new(Map::new(), query_type);
        query.parse(body).unwrap();
        query
    }

    const TOPN_BODY: &str = r#"[{
        "timestamp": "2015-12-30T14:14:49.000Z",
        "result": [{"dimension": "aaaa", "metric": 100}]
    }]"#;

    #[test]
    fn test_topn_records() {
        let query = executed(QueryType::TopN, TOPN_BODY);
        let records = query.export_records().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["dimension"], "aaaa");
        assert_eq!(records[0]["metric"], 100);
        assert_eq!(records[0]["timestamp"], "2015-12-30T14:14:49.000Z");
        assert_eq!(records[0].len(), 3);
    }

    #[test]
    fn test_topn_tsv() {
        let query = executed(QueryType::TopN, TOPN_BODY);
        let mut out = Vec::new();
        query.export_tsv(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "dimension\tmetric\ttimestamp\naaaa\t100\t2015-12-30T14:14:49.000Z\n"
        );
    }

    #[test]
    fn test_timeseries_records_and_tsv() {
        let query = executed(
            QueryType::Timeseries,
            r#"[
                {"timestamp": "2015-12-30T00:00:00.000Z", "result": {"count": 7, "unique_users": 3.5}},
                {"timestamp": "2015-12-31T00:00:00.000Z", "result": {"count": 6, "unique_users": 2.0}}
            ]"#,
        );

        let records = query.export_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["count"], 6);
        assert_eq!(records[1]["timestamp"], "2015-12-31T00:00:00.000Z");

        let mut out = Vec::new();
        query.export_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "count\tunique_users\ttimestamp");
        assert_eq!(lines[1], "7\t3.5\t2015-12-30T00:00:00.000Z");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_groupby_records_carry_version() {
        let query = executed(
            QueryType::GroupBy,
            r#"[{
                "timestamp": "2015-12-30T00:00:00.000Z",
                "version": "v1",
                "event": {"country": "AU", "count": 3}
            }]"#,
        );

        let records = query.export_records().unwrap();
        assert_eq!(records[0]["country"], "AU");
        assert_eq!(records[0]["timestamp"], "2015-12-30T00:00:00.000Z");
        assert_eq!(records[0]["version"], "v1");

        let mut out = Vec::new();
        query.export_tsv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "country\tcount\ttimestamp\tversion\nAU\t3\t2015-12-30T00:00:00.000Z\tv1\n"
        );
    }

    #[test]
    fn test_unsupported_query_types_fail() {
        for query_type in [
            QueryType::SegmentMetadata,
            QueryType::TimeBoundary,
            QueryType::Select,
        ] {
            let query = executed(query_type, "[]");
            assert!(matches!(
                query.export_records().unwrap_err(),
                DruidError::UnsupportedExport(t) if t == query_type
            ));
            let mut out = Vec::new();
            assert!(matches!(
                query.export_tsv(&mut out).unwrap_err(),
                DruidError::UnsupportedExport(t) if t == query_type
            ));
        }
    }

    #[test]
    fn test_empty_result_exports_nothing() {
        let query = executed(QueryType::Timeseries, "[]");
        assert!(query.export_records().unwrap().is_empty());

        let mut out = Vec::new();
        query.export_tsv(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_unexecuted_query_exports_nothing() {
        let query = Query::new(Map::new(), QueryType::TopN);
        assert!(query.export_records().unwrap().is_empty());

        let mut out = Vec::new();
        query.export_tsv(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_malformed_row_is_reported() {
        let query = executed(QueryType::Timeseries, r#"[{"result": {"count": 1}}]"#);
        assert!(matches!(
            query.export_records().unwrap_err(),
            DruidError::ResponseShape(_)
        ));
    }

    #[test]
    fn test_tsv_file_round_trip() {
        let query = executed(QueryType::TopN, TOPN_BODY);
        let file = tempfile::NamedTempFile::new().unwrap();
        query.export_tsv_path(file.path()).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.starts_with("dimension\tmetric\ttimestamp\n"));
    }

    #[test]
    fn test_header_comes_from_first_row_only() {
        // rows with differing key sets are written as-is under the first
        // row's header (documented quirk)
        let query = executed(
            QueryType::Timeseries,
            r#"[
                {"timestamp": "t1", "result": {"count": 1}},
                {"timestamp": "t2", "result": {"other": 2, "count": 9}}
            ]"#,
        );

        let mut out = Vec::new();
        query.export_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "count\ttimestamp");
        assert_eq!(lines[2], "2\t9\tt2");
    }
}

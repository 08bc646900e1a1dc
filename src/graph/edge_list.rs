use crate::error::GSError;
use crate::util::io::get_buf_reader;
use crate::util::timer::GsTimer;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use lp_api::{NodeId, Pair};

pub const DEFAULT_SEPARATOR: u8 = b',';
const COMMENT_CHAR: u8 = b'#';

/// Reads a delimited edge list with one `<node><separator><node>` edge per line.
///
/// Columns after the second are ignored, as are blank lines and lines starting with `#`.
pub fn read_edge_list(edge_file: &str, separator: u8) -> Result<Vec<Pair>, GSError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(COMMENT_CHAR))
        .from_reader(get_buf_reader(edge_file)?);

    let timer = GsTimer::now();
    let mut edges = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            GSError::LoadGraph(format!("Could not read record from file '{}': {}", edge_file, e))
        })?;
        let line = record.position().map_or(index + 1, |position| {
            // Line numbers are tiny compared to `usize`.
            #[allow(clippy::cast_possible_truncation)]
            let line = position.line() as usize;
            line
        });
        edges.push(parse_edge(&record, line, edge_file)?);

        if edges.len() % 1_000_000 == 0 {
            info!("Processed {} edges in {}", edges.len(), timer.elapsed().to_seconds_string());
        }
    }
    debug!("Read {} edges from '{}'", edges.len(), edge_file);
    Ok(edges)
}

fn parse_edge(record: &StringRecord, line: usize, edge_file: &str) -> Result<Pair, GSError> {
    let mut parts = record.iter();
    let src = parse_node_id(parts.next(), line, edge_file)?;
    let dst = parse_node_id(parts.next(), line, edge_file)?;
    Ok((src, dst))
}

fn parse_node_id(part: Option<&str>, line: usize, edge_file: &str) -> Result<NodeId, GSError> {
    let part = part.ok_or_else(|| {
        GSError::LoadGraph(format!(
            "Line {} in file '{}' should have at least two columns",
            line, edge_file
        ))
    })?;
    part.parse().map_err(|_| GSError::GraphParse(part.to_owned(), line, edge_file.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::read_edge_list;
    use crate::error::GSError;
    use std::io::Write;

    fn write_temp_file(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir()
            .join(format!("labelprop_{}_{}.txt", name, std::process::id()));
        let mut file = std::fs::File::create(&path).expect("Could not create temp file");
        file.write_all(contents.as_bytes()).expect("Could not write temp file");
        path.to_str().expect("Non-utf8 temp dir").to_owned()
    }

    #[test]
    fn reads_edges_and_ignores_extra_columns() {
        let path = write_temp_file("edges", "# src,dst,weight\n1,2,0.5\n2, 3\n\n3,4,x,y\n");
        let edges = read_edge_list(&path, b',').expect("Valid edge list");
        assert_eq!(edges, vec![(1, 2), (2, 3), (3, 4)]);
        std::fs::remove_file(&path).expect("Could not remove temp file");
    }

    #[test]
    fn tab_separated() {
        let path = write_temp_file("tabs", "5\t6\n6\t7\n7\t5\n8\t9\n");
        let edges = read_edge_list(&path, b'\t').expect("Valid edge list");
        assert_eq!(edges, vec![(5, 6), (6, 7), (7, 5), (8, 9)]);
        std::fs::remove_file(&path).expect("Could not remove temp file");
    }

    #[test]
    fn non_numeric_id() {
        let path = write_temp_file("bad_id", "1,2\n3,four\n");
        match read_edge_list(&path, b',') {
            Err(GSError::GraphParse(value, line, _)) => {
                assert_eq!(value, "four");
                assert_eq!(line, 2);
            }
            other => panic!("Expected a parse error, got {:?}", other),
        }
        std::fs::remove_file(&path).expect("Could not remove temp file");
    }

    #[test]
    fn missing_column() {
        let path = write_temp_file("one_column", "1,2\n3\n");
        assert!(matches!(read_edge_list(&path, b','), Err(GSError::LoadGraph(_))));
        std::fs::remove_file(&path).expect("Could not remove temp file");
    }
}

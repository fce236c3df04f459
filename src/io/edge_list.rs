// Edge-list import for SNAP-style text datasets and CSV exports

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::common::error::{GraphError, Result};
use crate::common::types::VertexId;
use crate::graph::{Graph, GraphKind};

/// Line layout of an edge-list file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeListFormat {
    /// Whitespace or tab separated columns, `#` starts a comment line
    #[default]
    Whitespace,
    /// Comma separated values, quoted fields allowed
    Csv,
}

/// Edge-list reader configured for one graph kind and file layout.
///
/// Each data row holds `start end` and, for weighted graphs, an optional third
/// weight column (defaults to 1). Blank lines and `#` comments are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeListReader {
    kind: GraphKind,
    format: EdgeListFormat,
    has_headers: bool,
}

impl EdgeListReader {
    pub fn new(kind: GraphKind, format: EdgeListFormat) -> Self {
        EdgeListReader {
            kind,
            format,
            has_headers: false,
        }
    }

    /// Treat the first CSV row as a header. Ignored for whitespace files.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    pub fn read<R: BufRead>(&self, reader: R) -> Result<Graph> {
        let mut graph = Graph::new(self.kind);
        match self.format {
            EdgeListFormat::Whitespace => self.read_whitespace(reader, &mut graph)?,
            EdgeListFormat::Csv => self.read_csv(reader, &mut graph)?,
        }

        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            directed = self.kind.directed,
            weighted = self.kind.weighted,
            "loaded edge list"
        );
        Ok(graph)
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Graph> {
        let file = File::open(path.as_ref())?;
        self.read(BufReader::new(file))
    }

    fn read_whitespace<R: BufRead>(&self, reader: R, graph: &mut Graph) -> Result<()> {
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            self.add_row(graph, &fields, idx + 1)?;
        }
        Ok(())
    }

    fn read_csv<R: BufRead>(&self, reader: R, graph: &mut Graph) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        for record in csv_reader.records() {
            let record = record.map_err(csv_error)?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let fields: Vec<&str> = record.iter().collect();
            self.add_row(graph, &fields, line)?;
        }
        Ok(())
    }

    fn add_row(&self, graph: &mut Graph, fields: &[&str], line: usize) -> Result<()> {
        let (start, end, weight) =
            parse_fields(fields, self.kind.weighted).map_err(|message| GraphError::parse(line, message))?;
        match weight {
            Some(weight) => graph.add_weighted_edge(start, end, weight),
            None => {
                graph.add_edge(start, end);
                Ok(())
            }
        }
    }
}

/// Read a header-less edge list into a graph of the given kind
pub fn read_edge_list<R: BufRead>(reader: R, kind: GraphKind, format: EdgeListFormat) -> Result<Graph> {
    EdgeListReader::new(kind, format).read(reader)
}

/// Open `path` and read it with `read_edge_list`
pub fn load_edge_list<P: AsRef<Path>>(path: P, kind: GraphKind, format: EdgeListFormat) -> Result<Graph> {
    EdgeListReader::new(kind, format).load(path)
}

fn csv_error(err: csv::Error) -> GraphError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    match err.into_kind() {
        csv::ErrorKind::Io(e) => GraphError::Io(e),
        kind => GraphError::parse(line, format!("malformed CSV row: {:?}", kind)),
    }
}

fn parse_fields(fields: &[&str], weighted: bool) -> std::result::Result<(VertexId, VertexId, Option<u64>), String> {
    let max_columns = if weighted { 3 } else { 2 };
    if fields.len() < 2 || fields.len() > max_columns {
        return Err(format!(
            "expected {} columns, found {}",
            if weighted { "2 or 3" } else { "2" },
            fields.len()
        ));
    }

    let vertex = |s: &str| {
        s.parse::<VertexId>()
            .map_err(|e| format!("invalid vertex id '{}': {}", s, e))
    };
    let start = vertex(fields[0])?;
    let end = vertex(fields[1])?;
    let weight = match fields.get(2) {
        Some(w) => Some(
            w.parse::<u64>()
                .map_err(|e| format!("invalid weight '{}': {}", w, e))?,
        ),
        None => None,
    };
    Ok((start, end, weight))
}

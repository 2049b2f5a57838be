//! Persistence of rendered documents.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use tracing::{Span, field, info, instrument};

use crate::{Result, adjacency::AdjacencyMatrix, error::GraphError, writer::GraphWriter};

/// Truncates or creates `path` and writes the document for `adjacency` into
/// it.
///
/// The file is closed before returning. On success it holds a complete
/// document with a balanced header and closing brace.
///
/// # Errors
/// Returns [`GraphError::Io`] when the file cannot be created, written,
/// flushed, or synced.
///
/// # Examples
/// ```
/// use randdot_core::{AdjacencyMatrix, GraphConstraints, GraphWriter, persist};
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("graph.dot");
/// let adjacency = AdjacencyMatrix::try_new(1, GraphConstraints::default())?;
/// persist(&path, &GraphWriter::new(), &adjacency)?;
/// assert_eq!(std::fs::read_to_string(&path)?, "digraph G {\n1;\n}\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "output.persist",
    err,
    skip(writer, adjacency),
    fields(path = field::Empty, vertices = adjacency.order()),
)]
pub fn persist(path: &Path, writer: &GraphWriter, adjacency: &AdjacencyMatrix) -> Result<()> {
    Span::current().record("path", field::display(path.display()));
    let io_error = |source: io::Error| GraphError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut buffered = BufWriter::new(file);
    writer.write_to(adjacency, &mut buffered).map_err(io_error)?;
    buffered.flush().map_err(io_error)?;
    let file = buffered
        .into_inner()
        .map_err(|err| io_error(err.into_error()))?;
    file.sync_all().map_err(io_error)?;

    info!(path = %path.display(), "graph written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    use crate::{GraphErrorCode, constraints::GraphConstraints};

    fn temp_dir() -> TempDir {
        match TempDir::new() {
            Ok(dir) => dir,
            Err(err) => panic!("failed to create temp dir: {err}"),
        }
    }

    #[test]
    fn persist_truncates_previous_contents() -> Result<()> {
        let dir = temp_dir();
        let path = dir.path().join("graph.dot");
        fs::write(&path, "stale contents that are much longer than the graph\n")
            .expect("seed file must be writable");

        let adjacency = AdjacencyMatrix::try_new(2, GraphConstraints::default())?;
        persist(&path, &GraphWriter::new(), &adjacency)?;

        let text = fs::read_to_string(&path).expect("file must be readable");
        assert_eq!(text, "digraph G {\n1;\n2;\n}\n");
        Ok(())
    }

    #[test]
    fn persist_reports_missing_directory_as_io_failure() -> Result<()> {
        let dir = temp_dir();
        let path = dir.path().join("missing").join("graph.dot");
        let adjacency = AdjacencyMatrix::try_new(1, GraphConstraints::default())?;

        let err = persist(&path, &GraphWriter::new(), &adjacency)
            .expect_err("parent directory does not exist");
        assert_eq!(err.code(), GraphErrorCode::IoFailure);
        match err {
            GraphError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other:?}"),
        }
        Ok(())
    }
}

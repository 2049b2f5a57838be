//! Minimal reader for the DOT subset that randdot emits.
//!
//! Tests use it to assert on structure instead of comparing raw strings,
//! since sampled edge sets differ between seeds.

/// Structure recovered from a rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// `true` for `graph` documents using `--`.
    pub undirected: bool,
    /// Name from the header line.
    pub name: String,
    /// Vertex labels in declaration order.
    pub vertices: Vec<usize>,
    /// Edge endpoints in emission order.
    pub edges: Vec<(usize, usize)>,
}

/// Parses `text` and checks the layout randdot guarantees: a header, one
/// statement per line, every edge listed under its source vertex, and a
/// closing brace.
///
/// # Errors
/// Returns a description of the first malformed line.
///
/// # Examples
/// ```
/// use randdot_test_support::dot::parse_document;
///
/// let document = parse_document("digraph G {\n1;\n1->2;\n2;\n}\n")?;
/// assert_eq!(document.vertices, vec![1, 2]);
/// assert_eq!(document.edges, vec![(1, 2)]);
/// # Ok::<(), String>(())
/// ```
pub fn parse_document(text: &str) -> Result<ParsedDocument, String> {
    let mut lines = text.lines();
    let header = lines.next().ok_or("document is empty")?;
    let (undirected, name) = parse_header(header)?;
    let arc = if undirected { "--" } else { "->" };

    let mut document = ParsedDocument {
        undirected,
        name,
        vertices: Vec::new(),
        edges: Vec::new(),
    };
    let mut closed = false;
    for line in lines {
        if closed {
            return Err(format!("unexpected content after closing brace: `{line}`"));
        }
        if line == "}" {
            closed = true;
            continue;
        }
        let statement = line
            .strip_suffix(';')
            .ok_or_else(|| format!("statement `{line}` lacks a terminator"))?;
        if let Some((from, to)) = statement.split_once(arc) {
            let from = parse_label(from)?;
            let to = parse_label(to)?;
            if document.vertices.last() != Some(&from) {
                return Err(format!("edge `{line}` is not listed under vertex {from}"));
            }
            document.edges.push((from, to));
        } else {
            document.vertices.push(parse_label(statement)?);
        }
    }

    if !closed {
        return Err("document lacks a closing brace".to_owned());
    }
    Ok(document)
}

fn parse_header(line: &str) -> Result<(bool, String), String> {
    let body = line
        .strip_suffix(" {")
        .ok_or_else(|| format!("header `{line}` does not open a block"))?;
    let (keyword, name) = body
        .split_once(' ')
        .ok_or_else(|| format!("header `{line}` lacks a graph name"))?;
    match keyword {
        "digraph" => Ok((false, name.to_owned())),
        "graph" => Ok((true, name.to_owned())),
        other => Err(format!("unknown graph keyword `{other}`")),
    }
}

fn parse_label(raw: &str) -> Result<usize, String> {
    if raw.is_empty() || raw.starts_with('0') || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("`{raw}` is not a 1-based decimal label"));
    }
    raw.parse()
        .map_err(|error| format!("`{raw}` is not a label: {error}"))
}

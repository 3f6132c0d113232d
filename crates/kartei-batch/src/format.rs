use kartei_core::language::Language;

/// Supported upload containers. Every format converges on the same
/// [`BatchRow`] shape: word in the first column, optional language code
/// in the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchFormat {
    Xlsx,
    Csv,
    Tsv,
    PlainText,
}

impl BatchFormat {
    pub fn from_extension(filename: &str) -> Option<BatchFormat> {
        let ext = filename.rsplit_once('.').map(|(_, ext)| ext)?;
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" => Some(BatchFormat::Xlsx),
            "csv" => Some(BatchFormat::Csv),
            "tsv" => Some(BatchFormat::Tsv),
            "txt" => Some(BatchFormat::PlainText),
            _ => None,
        }
    }
}

/// One extracted upload row; consumed by the pipeline and replaced by a
/// [`crate::BatchOutcome`], never persisted beyond the batch run.
#[derive(Debug, Clone)]
pub struct BatchRow {
    /// 1-based position in the upload, for error reporting
    pub line: usize,
    pub word: String,
    /// Per-row language override from the second column
    pub language: Option<Language>,
}

/// A `FormatError` is fatal for the whole batch; there is no partial
/// parse. Per-row pipeline failures are isolated separately.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("file contains no words")]
    Empty,

    #[error("file is not valid UTF-8")]
    Unreadable,

    #[error("delimited text error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(String),
}

/// Extract one `BatchRow` per non-blank row of the upload.
pub fn parse(bytes: &[u8], format: BatchFormat) -> Result<Vec<BatchRow>, FormatError> {
    let rows = match format {
        BatchFormat::Csv => parse_delimited(bytes, b',')?,
        BatchFormat::Tsv => parse_delimited(bytes, b'\t')?,
        BatchFormat::PlainText => parse_plain(bytes)?,
        BatchFormat::Xlsx => crate::xlsx::parse_workbook(bytes)?,
    };

    if rows.is_empty() {
        return Err(FormatError::Empty);
    }

    tracing::debug!(rows = rows.len(), ?format, "parsed batch upload");
    Ok(rows)
}

pub(crate) fn row_from_columns(line: usize, columns: &[String]) -> Option<BatchRow> {
    let word = columns.first().map(|c| c.trim()).unwrap_or_default();
    if word.is_empty() {
        return None;
    }

    Some(BatchRow {
        line,
        word: word.to_string(),
        language: columns.get(1).and_then(|c| Language::from_code(c)),
    })
}

fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<Vec<BatchRow>, FormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let columns: Vec<String> = record.iter().map(str::to_string).collect();
        if let Some(row) = row_from_columns(index + 1, &columns) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn parse_plain(bytes: &[u8]) -> Result<Vec<BatchRow>, FormatError> {
    let text = std::str::from_utf8(bytes).map_err(|_| FormatError::Unreadable)?;

    Ok(text
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let word = line.trim();
            if word.is_empty() {
                None
            } else {
                Some(BatchRow {
                    line: index + 1,
                    word: word.to_string(),
                    language: None,
                })
            }
        })
        .collect())
}

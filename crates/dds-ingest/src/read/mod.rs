//! CSV reading.

mod header;
mod reader;

pub use header::{build_column_names, normalize_header};
pub(crate) use reader::file_error;
pub use reader::{
    MAX_CSV_FILE_SIZE, ParsedCsv, RowIssue, check_file_size_with_limit, parse_csv, read_csv,
    validate_encoding,
};

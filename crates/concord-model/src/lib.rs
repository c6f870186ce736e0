//! `concord-model` defines the core in-memory data structures for qualitative
//! coding of spreadsheet data.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the reliability/conflict engine (`concord-irr`)
//! - spreadsheet host adapters (which own all cell I/O)
//! - IPC boundaries via `serde` (JSON-safe schema)
//!
//! Nothing here performs I/O: cell values arrive as caller-provided grids and
//! codebooks are loaded through the [`CodebookProvider`] seam on every call,
//! so host-side edits are always visible.

mod code;
mod codebook;
mod error;
mod grid;
mod sheet_name;
mod value;

pub use code::{
    codes_in_cell, count_code_in, parse_codes, require_single_code, unique_codes_in,
    CODE_SEPARATOR,
};
pub use codebook::{
    load_codebook, load_final_names, Codebook, CodebookProvider, FinalNames, TokenKind,
    CODEBOOK_LABEL_CODE, CODEBOOK_LABEL_FLAG,
};
pub use error::CodingError;
pub use grid::Grid;
pub use sheet_name::{
    codebook_sheet_name, is_codebook_sheet, is_final_sheet, question_for_coding_sheet,
    question_for_sheet,
};
pub use value::CellValue;

//! `concord-irr` computes inter-rater reliability statistics and resolves
//! coding conflicts over [`concord_model`] grids.
//!
//! Every statistic shares one shape: a per-row observed-agreement reducer, a
//! corpus-level chance-agreement estimate, and a final coefficient of
//! `(observed - chance) / (1 - chance)`. All computation is pure and
//! synchronous; the spreadsheet host owns cell I/O and maps any returned
//! [`concord_model::CodingError`] to a single error value in the output cell.

mod cohen;
mod cohen_multi;
mod diff;
pub mod functions;
mod krippendorff;
mod kupper_hafner;
mod summary;

pub use cohen::{agreement_rows, chance_agreement, kappa};
pub use cohen_multi::{chance_agreement_multi, common_code_rows, kappa_multi, max_count_rows};
pub use diff::{diff_codes, find_conflicts, AgreementStatus, CodeDiff, ConflictRow};
pub use krippendorff::{alpha, product_sum, CoincidenceMatrix, KrippendorffAlpha};
pub use kupper_hafner::{concordance, concordance_rows, min_count_rows, CodebookSource};
pub use summary::{coefficient, mean_ignoring_missing, summarize, AgreementSummary};

//! Grade aggregation for topic-weighted gradebooks.
//!
//! Snapshot in, numbers out: a [`catalog::Catalog`] of assignments and a sparse
//! [`ledger::Ledger`] of grades are folded into per-category averages and a
//! weighted final grade per student. Nothing here performs I/O or keeps state
//! between calls.

pub mod calc;
pub mod catalog;
pub mod category;
pub mod format;
pub mod ledger;
pub mod model;
pub mod table;

pub use calc::{
    average_for_category, compute_topic_summary, final_grade, validate_topic_weights, CalcError,
    CategorySummary, FinalGrade, StudentResult, TopicSummary,
};
pub use catalog::Catalog;
pub use category::{Category, PerCategory};
pub use format::{format_cell, format_grade, UNGRADED_MARKER};
pub use ledger::{GradeCell, Ledger, RawGrade};
pub use model::{Assignment, AssignmentsPayload, Student, Topic};

//! Derived view models: pure functions over ready resource values.
//!
//! Nothing here mutates its input; every function borrows and returns fresh
//! data.

pub mod attendance;
pub mod filter;
pub mod progress;
pub mod scoring;

pub use attendance::{attendance_slices, partition_by, AttendanceBuckets, AttendanceSlice, AttendanceStatus};
pub use filter::{filter_by_department, filter_customer_focus, DepartmentFilter};
pub use progress::{pending_department_rows, pending_surveys, PendingRow, SurveyProgress};
pub use scoring::{classify, needs_attention, percentage, performance_bars, rating_bars, rounded_percentage, ScoreBand, ScoreBar};

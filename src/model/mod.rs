//! Wire-format DTOs for the survey backend.

pub mod dashboard;
pub mod department;
pub mod remarks;
pub mod reports;
pub mod survey;
pub mod user;

pub use dashboard::*;
pub use department::*;
pub use remarks::*;
pub use reports::*;
pub use survey::*;
pub use user::*;

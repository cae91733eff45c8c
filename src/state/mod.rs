//! Application state module

mod app_state;
mod forms;
mod records;

pub use app_state::*;
pub use forms::*;
pub use records::*;

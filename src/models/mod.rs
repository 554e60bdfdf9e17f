pub mod task;
pub mod list_colour;
pub mod options;
pub mod sort_order;
pub mod config;

pub use task::*;
pub use list_colour::*;
pub use options::*;
pub use sort_order::SortOrderState;
pub use config::*;

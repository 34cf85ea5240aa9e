pub mod copy;
pub mod list;
pub mod search;
mod shared;

pub use copy::{copy, CopyArgs};
pub use list::{list, ListArgs};
pub use search::{search, SearchArgs};

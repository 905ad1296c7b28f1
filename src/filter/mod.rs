pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod paginate;
pub mod types;

pub use error::FilterError;
pub use filter::{filter_options, ExpertFilter, FilterOptions, UserFilter};
pub use paginate::{paginate, total_pages, Page, PAGE_SIZE};
pub use types::*;

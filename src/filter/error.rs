use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid page: {0}")]
    InvalidPage(usize),

    #[error("Unknown sort column: {0}")]
    UnknownSortColumn(String),

    #[error("Unknown expert filter: {0}")]
    UnknownExpertFilter(String),
}

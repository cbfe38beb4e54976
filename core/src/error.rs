use thiserror::Error;

/** Errors produced by the storage engine */
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no free blocks available")]
    OutOfSpace,
    #[error("key not found")]
    NotFound,
    #[error("key already exists")]
    AlreadyExists,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("corrupt container: {0}")]
    Corruption(String),
    #[error("subkeys tree is not empty")]
    NotEmpty,
    #[error("container is already open")]
    AlreadyOpen,
}

pub type Result<T> = std::result::Result<T, Error>;

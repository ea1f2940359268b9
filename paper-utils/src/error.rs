#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Generation(String),
    #[error("{0}")]
    InsufficientPool(String),
}

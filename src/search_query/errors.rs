#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("query is {len} bytes long, at most {max} are allowed")]
    InputTooLong { len: usize, max: usize },
}

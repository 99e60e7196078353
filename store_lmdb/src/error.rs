use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad key in {db}: expected {expected} bytes, found {found}")]
    BadKey {
        db: &'static str,
        expected: usize,
        found: usize,
    },
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<LmdbError> for gauge_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::BadKey { .. } => gauge_store::StoreError::Corruption(e.to_string()),
            _ => gauge_store::StoreError::Backend(e.to_string()),
        }
    }
}

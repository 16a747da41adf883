use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        LmdbError::Serialization(e.to_string())
    }
}

impl From<LmdbError> for guardiq_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::Serialization(msg) => guardiq_store::StoreError::Serialization(msg),
            LmdbError::Corruption(msg) => guardiq_store::StoreError::Corruption(msg),
            other => guardiq_store::StoreError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardiq_store::StoreError;

    #[test]
    fn maps_into_store_error_categories() {
        assert!(matches!(
            StoreError::from(LmdbError::Corruption("bad seq".into())),
            StoreError::Corruption(_)
        ));
        assert!(matches!(
            StoreError::from(LmdbError::Serialization("eof".into())),
            StoreError::Serialization(_)
        ));
        assert!(matches!(
            StoreError::from(LmdbError::Heed("map full".into())),
            StoreError::Backend(_)
        ));
    }
}

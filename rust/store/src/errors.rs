use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown user {0}")]
    UnknownUser(i64),
    #[error("Insufficient funds: need {needed}, balance {balance}")]
    InsufficientFunds { needed: u64, balance: i64 },
    #[error("Amount {0} is out of range")]
    AmountOutOfRange(u64),
    #[error("Ledger connection lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Another connection holds the database; retrying later may succeed.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(info, _))
                if matches!(
                    info.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                )
        )
    }
}

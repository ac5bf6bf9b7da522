use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Ledger(#[from] engine::LedgerError),
    #[error(transparent)]
    Remote(#[from] remote::RemoteError),
    #[error("contact error: {0}")]
    Contact(#[from] remote::ContactError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Usage(String),
}

/// Single line shown to the user when a command fails.
pub fn report(err: &AppError) -> String {
    format!("error: {err}")
}

#[cfg(test)]
mod tests {
    use engine::{LedgerError, StoreError};

    use super::*;

    #[test]
    fn report_uses_display_text() {
        let err = AppError::from(LedgerError::Store(StoreError::Network(
            "503 Service Unavailable: backend down".to_string(),
        )));
        assert_eq!(
            report(&err),
            "error: network failure: 503 Service Unavailable: backend down"
        );

        let err = AppError::from(LedgerError::UnknownCategory("payroll".to_string()));
        assert_eq!(report(&err), "error: \"payroll\" category not found!");
    }
}

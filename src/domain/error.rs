//! Domain error types.

/// Top-level error type for stocksim.
#[derive(Debug, thiserror::Error)]
pub enum StocksimError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("price series for {symbol} is empty")]
    EmptySeries { symbol: String },

    #[error("simulated date cannot advance past {date}")]
    DateOutOfRange { date: chrono::NaiveDate },

    #[error("unknown policy: {name}")]
    UnknownPolicy { name: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StocksimError> for std::process::ExitCode {
    fn from(err: &StocksimError) -> Self {
        let code: u8 = match err {
            StocksimError::Io(_) => 1,
            StocksimError::ConfigParse { .. }
            | StocksimError::ConfigMissing { .. }
            | StocksimError::ConfigInvalid { .. }
            | StocksimError::DateOutOfRange { .. } => 2,
            StocksimError::DataSource { .. } => 3,
            StocksimError::UnknownPolicy { .. } => 4,
            StocksimError::NoData { .. } | StocksimError::EmptySeries { .. } => 5,
            StocksimError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = StocksimError::ConfigInvalid {
            section: "simulation".into(),
            key: "years_back".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [simulation] years_back: must be positive"
        );

        let err = StocksimError::EmptySeries {
            symbol: "AAPL".into(),
        };
        assert_eq!(err.to_string(), "price series for AAPL is empty");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StocksimError = io.into();
        assert!(matches!(err, StocksimError::Io(_)));
    }

    #[test]
    fn exit_codes_group_by_family() {
        use std::process::ExitCode;

        let missing = StocksimError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        };
        assert_eq!(
            format!("{:?}", ExitCode::from(&missing)),
            format!("{:?}", ExitCode::from(2))
        );

        let unknown = StocksimError::UnknownPolicy {
            name: "martingale".into(),
        };
        assert_eq!(
            format!("{:?}", ExitCode::from(&unknown)),
            format!("{:?}", ExitCode::from(4))
        );

        let overflow = StocksimError::DateOutOfRange {
            date: chrono::NaiveDate::MAX,
        };
        assert_eq!(
            format!("{:?}", ExitCode::from(&overflow)),
            format!("{:?}", ExitCode::from(2))
        );

        let empty = StocksimError::EmptySeries { symbol: "X".into() };
        assert_eq!(
            format!("{:?}", ExitCode::from(&empty)),
            format!("{:?}", ExitCode::from(5))
        );
    }
}

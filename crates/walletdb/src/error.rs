use sigmad_primitives::encoding::DecodeError;
use sigmad_storage::StoreError;

#[derive(Debug)]
pub enum WalletDbError {
    Store(StoreError),
    Decode(DecodeError),
    TooNew {
        record: &'static str,
        version: i32,
        supported: i32,
    },
    Corrupt(&'static str),
    /// A spend serial was written twice. The caller skipped the
    /// `has_spend_serial` guard; the store refuses to overwrite.
    DuplicateSerial,
    NotFound(&'static str),
    Io(std::io::Error),
}

impl std::fmt::Display for WalletDbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletDbError::Store(err) => write!(f, "{err}"),
            WalletDbError::Decode(err) => write!(f, "{err}"),
            WalletDbError::TooNew {
                record,
                version,
                supported,
            } => write!(
                f,
                "{record} record version {version} exceeds supported version {supported}; \
                 this wallet was written by newer software"
            ),
            WalletDbError::Corrupt(msg) => write!(f, "{msg}"),
            WalletDbError::DuplicateSerial => {
                write!(f, "spend serial already recorded; refusing to overwrite")
            }
            WalletDbError::NotFound(what) => write!(f, "{what} not found"),
            WalletDbError::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for WalletDbError {}

impl From<StoreError> for WalletDbError {
    fn from(err: StoreError) -> Self {
        WalletDbError::Store(err)
    }
}

impl From<DecodeError> for WalletDbError {
    fn from(err: DecodeError) -> Self {
        WalletDbError::Decode(err)
    }
}

impl From<std::io::Error> for WalletDbError {
    fn from(err: std::io::Error) -> Self {
        WalletDbError::Io(err)
    }
}

/// Terminal classification of a bulk load or bulk rewrite pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DbErrors {
    LoadOk,
    NoncriticalError,
    Corrupt,
    TooNew,
    NeedRewrite,
    LoadFail,
}

impl DbErrors {
    fn severity(self) -> u8 {
        match self {
            DbErrors::LoadOk => 0,
            DbErrors::NoncriticalError => 1,
            DbErrors::Corrupt => 2,
            DbErrors::TooNew => 3,
            DbErrors::NeedRewrite => 4,
            DbErrors::LoadFail => 5,
        }
    }

    /// Keep the worse of two classifications.
    pub fn combine(self, other: DbErrors) -> DbErrors {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            DbErrors::TooNew | DbErrors::NeedRewrite | DbErrors::LoadFail
        )
    }
}

use xelis_hash_corelib::{HashError, RegistryError};

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    Ok = 0,
    InvalidArg = 1,
    Encoding = 2,
    Engine = 3,
    UnknownEngine = 4,
    VerifyFail = 5,
    Internal = 6,
}

impl ErrorCode {
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl From<&HashError> for ErrorCode {
    fn from(err: &HashError) -> Self {
        match err.root() {
            HashError::InvalidEncoding { .. } => ErrorCode::Encoding,
            HashError::InvalidLength { .. } => ErrorCode::InvalidArg,
            HashError::EngineFailure { .. } => ErrorCode::Engine,
            HashError::BatchElement { .. } => ErrorCode::Internal,
        }
    }
}

impl From<&RegistryError> for ErrorCode {
    fn from(err: &RegistryError) -> Self {
        match err {
            RegistryError::EngineNotFound(_) => ErrorCode::UnknownEngine,
            RegistryError::DuplicateEngine(_) | RegistryError::InvalidEngineId(_) => {
                ErrorCode::InvalidArg
            }
        }
    }
}

/// Error carried out of an FFI call body: status code plus message.
#[derive(Debug)]
pub struct FfiError {
    pub code: ErrorCode,
    pub msg: String,
}

impl FfiError {
    pub fn new(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }
}

impl From<HashError> for FfiError {
    fn from(err: HashError) -> Self {
        Self::new((&err).into(), err.to_string())
    }
}

impl From<RegistryError> for FfiError {
    fn from(err: RegistryError) -> Self {
        Self::new((&err).into(), err.to_string())
    }
}

pub const XH_OK: i32 = ErrorCode::Ok.code();
pub const XH_ERR_INVALID_ARG: i32 = ErrorCode::InvalidArg.code();
pub const XH_ERR_ENCODING: i32 = ErrorCode::Encoding.code();
pub const XH_ERR_ENGINE: i32 = ErrorCode::Engine.code();
pub const XH_ERR_UNKNOWN_ENGINE: i32 = ErrorCode::UnknownEngine.code();
pub const XH_ERR_VERIFY_FAIL: i32 = ErrorCode::VerifyFail.code();
pub const XH_ERR_INTERNAL: i32 = ErrorCode::Internal.code();

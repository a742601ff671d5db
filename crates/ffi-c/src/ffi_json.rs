//! JSON envelopes written to `out_json`: `{"ok", "code", "msg"}` plus any
//! payload fields of the call.

use std::ffi::CString;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ErrorCode, FfiError, XH_OK};
use crate::FfiResult;

const STATUS_KEYS: [&str; 3] = ["ok", "code", "msg"];

pub struct Envelope {
    fields: Map<String, Value>,
}

impl Envelope {
    fn status(ok: bool, code: i32, msg: String) -> Self {
        let mut fields = Map::new();
        fields.insert(STATUS_KEYS[0].into(), Value::Bool(ok));
        fields.insert(STATUS_KEYS[1].into(), Value::from(code));
        fields.insert(STATUS_KEYS[2].into(), Value::String(msg));
        Self { fields }
    }

    pub fn ok() -> Self {
        Self::status(true, XH_OK, "OK".into())
    }

    pub fn failure(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self::status(false, code.code(), msg.into())
    }

    /// Attach a payload field. Status keys cannot be overwritten.
    pub fn with<T: Serialize>(mut self, key: &str, value: T) -> FfiResult<Self> {
        if STATUS_KEYS.contains(&key) {
            return Err(FfiError::new(
                ErrorCode::Internal,
                format!("envelope key '{key}' is reserved"),
            ));
        }
        let value = serde_json::to_value(value).map_err(|e| {
            FfiError::new(
                ErrorCode::Internal,
                format!("cannot encode envelope field '{key}': {e}"),
            )
        })?;
        self.fields.insert(key.to_owned(), value);
        Ok(self)
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }

    pub fn into_cstring(self) -> CString {
        let json = self.to_json();
        // serde_json escapes U+0000, so the fallback only strips stray NULs
        CString::new(json).unwrap_or_else(|nul| {
            let mut bytes = nul.into_vec();
            bytes.retain(|&b| b != 0);
            // SAFETY: every NUL byte was removed above
            unsafe { CString::from_vec_unchecked(bytes) }
        })
    }
}

impl From<FfiError> for Envelope {
    fn from(err: FfiError) -> Self {
        Self::failure(err.code, err.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(envelope: &Envelope) -> Value {
        serde_json::from_str(&envelope.to_json()).unwrap()
    }

    #[test]
    fn ok_carries_status_triplet() {
        let value = parse(&Envelope::ok());
        assert_eq!(value["ok"], Value::Bool(true));
        assert_eq!(value["code"], Value::from(XH_OK));
        assert_eq!(value["msg"], Value::from("OK"));
    }

    #[test]
    fn ffi_error_becomes_failure_envelope() {
        let envelope = Envelope::from(FfiError::new(ErrorCode::UnknownEngine, "no such engine"));
        let value = parse(&envelope);
        assert_eq!(value["ok"], Value::Bool(false));
        assert_eq!(value["code"], Value::from(ErrorCode::UnknownEngine.code()));
        assert_eq!(value["msg"], Value::from("no such engine"));
    }

    #[test]
    fn payload_fields_sit_next_to_status() {
        let envelope = Envelope::ok()
            .with("digests", ["00ff", "abcd"])
            .unwrap();
        let value = parse(&envelope);
        assert_eq!(value["digests"][1], Value::from("abcd"));
        assert_eq!(value["ok"], Value::Bool(true));
    }

    #[test]
    fn status_keys_cannot_be_overwritten() {
        let err = Envelope::ok().with("code", 7).err().unwrap();
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(err.msg.contains("reserved"));
    }

    #[test]
    fn cstring_is_valid_json() {
        let cstring = Envelope::failure(ErrorCode::Encoding, "bad \0 byte").into_cstring();
        let value: Value = serde_json::from_str(cstring.to_str().unwrap()).unwrap();
        assert_eq!(value["msg"], Value::from("bad \u{0} byte"));
    }
}

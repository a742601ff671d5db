//! C ABI over the hashing contract.
//!
//! Every function returns an `i32` status (`XH_OK` on success). Functions
//! with an `out_json` parameter always write a JSON envelope
//! `{"ok", "code", "msg", ...}` there, on failure too, which must be released
//! with [`xh_free_string`]. Byte buffers handed out by the library are
//! released with [`xh_free`]. A null `engine_id` selects the default engine.

mod error;
mod ffi_json;

use std::ffi::{c_char, c_void, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::slice;

use xelis_hash_corelib::{self as xh, HashError, Hasher, HASH_SIZE};

pub use error::{
    ErrorCode, FfiError, XH_ERR_ENCODING, XH_ERR_ENGINE, XH_ERR_INTERNAL, XH_ERR_INVALID_ARG,
    XH_ERR_UNKNOWN_ENGINE, XH_ERR_VERIFY_FAIL, XH_OK,
};
pub use ffi_json::Envelope;

type FfiResult<T> = Result<T, FfiError>;

/// Run `body`, converting errors and panics into a status code.
fn guard<F>(body: F) -> i32
where
    F: FnOnce() -> FfiResult<i32>,
{
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => e.code.code(),
        Err(_) => XH_ERR_INTERNAL,
    }
}

/// Like [`guard`] but writes the success or error envelope to `out_json`.
unsafe fn guard_json<F>(out_json: *mut *mut c_char, body: F) -> i32
where
    F: FnOnce() -> FfiResult<(i32, Envelope)>,
{
    if out_json.is_null() {
        return XH_ERR_INVALID_ARG;
    }
    let (status, envelope) = match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(done)) => done,
        Ok(Err(e)) => (e.code.code(), Envelope::from(e)),
        Err(_) => (
            XH_ERR_INTERNAL,
            Envelope::failure(ErrorCode::Internal, "panic inside xelishash"),
        ),
    };
    *out_json = envelope.into_cstring().into_raw();
    status
}

unsafe fn str_arg<'a>(p: *const c_char, name: &str) -> FfiResult<&'a str> {
    if p.is_null() {
        return Err(FfiError::new(
            ErrorCode::InvalidArg,
            format!("{name} must not be null"),
        ));
    }
    CStr::from_ptr(p)
        .to_str()
        .map_err(|_| FfiError::new(ErrorCode::InvalidArg, format!("{name} is not valid UTF-8")))
}

unsafe fn bytes_arg<'a>(data: *const u8, len: u64) -> FfiResult<&'a [u8]> {
    if len == 0 {
        return Ok(&[]);
    }
    if data.is_null() {
        return Err(FfiError::new(
            ErrorCode::InvalidArg,
            "data must not be null when len > 0",
        ));
    }
    let len = usize::try_from(len)
        .map_err(|_| FfiError::new(ErrorCode::InvalidArg, "len exceeds address space"))?;
    Ok(slice::from_raw_parts(data, len))
}

unsafe fn hasher_arg(engine_id: *const c_char) -> FfiResult<Hasher> {
    if engine_id.is_null() {
        return Ok(Hasher::default());
    }
    let id = str_arg(engine_id, "engine_id")?;
    Ok(Hasher::with_engine_id(id)?)
}

/// Copy `bytes` into a `malloc` buffer owned by the caller (free with [`xh_free`]).
unsafe fn export_bytes(bytes: &[u8], out_ptr: *mut *mut u8, out_len: *mut u64) -> FfiResult<()> {
    if out_ptr.is_null() || out_len.is_null() {
        return Err(FfiError::new(
            ErrorCode::InvalidArg,
            "output pointers must not be null",
        ));
    }
    let buf = libc::malloc(bytes.len().max(1)) as *mut u8;
    if buf.is_null() {
        return Err(FfiError::new(ErrorCode::Internal, "allocation failed"));
    }
    ptr::copy_nonoverlapping(bytes.as_ptr(), buf, bytes.len());
    *out_ptr = buf;
    *out_len = bytes.len() as u64;
    Ok(())
}

/// Install diagnostics. Idempotent.
#[no_mangle]
pub extern "C" fn xh_init() -> i32 {
    xh::init();
    tracing::debug!(version = xh::version(), "xelishash ffi initialised");
    XH_OK
}

#[no_mangle]
pub extern "C" fn xh_hash_size() -> u64 {
    xh::get_hash_size() as u64
}

/// # Safety
/// `out_json` must be a valid pointer to writable storage for one pointer.
#[no_mangle]
pub unsafe extern "C" fn xh_version(out_json: *mut *mut c_char) -> i32 {
    guard_json(out_json, || {
        Ok((XH_OK, Envelope::ok().with("version", xh::version())?))
    })
}

/// # Safety
/// `out_json` must be a valid pointer to writable storage for one pointer.
#[no_mangle]
pub unsafe extern "C" fn xh_list_engines(out_json: *mut *mut c_char) -> i32 {
    guard_json(out_json, || {
        Ok((XH_OK, Envelope::ok().with("engines", xh::list_engines())?))
    })
}

/// Write the digest of `data[..len]` into `out_digest`, which must hold
/// `xh_hash_size()` bytes.
///
/// # Safety
/// `data` must point to `len` readable bytes (may be null when `len == 0`);
/// `out_digest` must point to `xh_hash_size()` writable bytes; `engine_id`
/// must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn xh_hash(
    engine_id: *const c_char,
    data: *const u8,
    len: u64,
    out_digest: *mut u8,
) -> i32 {
    guard(|| {
        if out_digest.is_null() {
            return Err(FfiError::new(
                ErrorCode::InvalidArg,
                "out_digest must not be null",
            ));
        }
        let digest = hasher_arg(engine_id)?.hash_bytes(bytes_arg(data, len)?)?;
        ptr::copy_nonoverlapping(digest.as_bytes().as_ptr(), out_digest, HASH_SIZE);
        Ok(XH_OK)
    })
}

/// # Safety
/// See [`xh_hash`]; `out_json` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xh_hash_hex(
    engine_id: *const c_char,
    data: *const u8,
    len: u64,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_json(out_json, || {
        let hex = hasher_arg(engine_id)?.hash_hex(bytes_arg(data, len)?)?;
        Ok((XH_OK, Envelope::ok().with("hash_hex", hex)?))
    })
}

/// Hash the UTF-8 bytes of a NUL-terminated string.
///
/// # Safety
/// `text` must be a NUL-terminated string; `out_json` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xh_hash_text(
    engine_id: *const c_char,
    text: *const c_char,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_json(out_json, || {
        let text = str_arg(text, "text")?;
        let hex = hasher_arg(engine_id)?.hash_text(text)?;
        Ok((XH_OK, Envelope::ok().with("hash_hex", hex)?))
    })
}

/// Chain the engine `iterations` times. The result buffer is released with [`xh_free`].
///
/// # Safety
/// See [`xh_hash`]; `out_ptr` and `out_len` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xh_hash_iterated(
    engine_id: *const c_char,
    data: *const u8,
    len: u64,
    iterations: u32,
    out_ptr: *mut *mut u8,
    out_len: *mut u64,
) -> i32 {
    guard(|| {
        let result = hasher_arg(engine_id)?.hash_iterated(bytes_arg(data, len)?, iterations)?;
        export_bytes(&result, out_ptr, out_len)?;
        Ok(XH_OK)
    })
}

/// Hash a JSON array of hex-encoded inputs; answers `{"digests": [hex, ...]}`
/// in input order.
///
/// # Safety
/// `inputs_json` must be a NUL-terminated string; `out_json` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xh_hash_batch(
    engine_id: *const c_char,
    inputs_json: *const c_char,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_json(out_json, || {
        let raw = str_arg(inputs_json, "inputs_json")?;
        let hex_inputs: Vec<String> = serde_json::from_str(raw).map_err(|e| {
            FfiError::new(
                ErrorCode::InvalidArg,
                format!("inputs_json must be an array of hex strings: {e}"),
            )
        })?;
        let inputs = hex_inputs
            .iter()
            .enumerate()
            .map(|(index, h)| {
                xh::hex_to_bytes(h).map_err(|source| HashError::BatchElement {
                    index,
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let digests = hasher_arg(engine_id)?.hash_batch(&inputs)?;
        let hexes: Vec<String> = digests.iter().map(|d| d.to_hex()).collect();
        Ok((XH_OK, Envelope::ok().with("digests", hexes)?))
    })
}

/// # Safety
/// See [`xh_hash`]; `out_json` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xh_hash_with_metadata(
    engine_id: *const c_char,
    data: *const u8,
    len: u64,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_json(out_json, || {
        let meta = hasher_arg(engine_id)?.hash_with_metadata(bytes_arg(data, len)?)?;
        Ok((XH_OK, Envelope::ok().with("metadata", meta)?))
    })
}

/// # Safety
/// `data` must point to `len` readable bytes; `out_json` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xh_bytes_to_hex(
    data: *const u8,
    len: u64,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_json(out_json, || {
        let hex = xh::bytes_to_hex(bytes_arg(data, len)?);
        Ok((XH_OK, Envelope::ok().with("hex", hex)?))
    })
}

/// Decode hex into a buffer released with [`xh_free`].
///
/// # Safety
/// `hex` must be a NUL-terminated string; `out_ptr` and `out_len` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xh_hex_to_bytes(
    hex: *const c_char,
    out_ptr: *mut *mut u8,
    out_len: *mut u64,
) -> i32 {
    guard(|| {
        let bytes = xh::hex_to_bytes(str_arg(hex, "hex")?)?;
        export_bytes(&bytes, out_ptr, out_len)?;
        Ok(XH_OK)
    })
}

/// Compare two hex digests. Returns `XH_OK` on match and `XH_ERR_VERIFY_FAIL`
/// on mismatch; the envelope carries `{"verified": bool}` in both cases.
///
/// # Safety
/// `hex_a` and `hex_b` must be NUL-terminated strings; `out_json` must be writable.
#[no_mangle]
pub unsafe extern "C" fn xh_verify(
    hex_a: *const c_char,
    hex_b: *const c_char,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_json(out_json, || {
        let verified = xh::verify(str_arg(hex_a, "hex_a")?, str_arg(hex_b, "hex_b")?)?;
        let status = if verified { XH_OK } else { XH_ERR_VERIFY_FAIL };
        Ok((status, Envelope::ok().with("verified", verified)?))
    })
}

#[no_mangle]
pub extern "C" fn xh_alloc(nbytes: u64) -> *mut c_void {
    match usize::try_from(nbytes) {
        // SAFETY: malloc has no preconditions; a null return is passed through
        Ok(n) => unsafe { libc::malloc(n.max(1)) },
        Err(_) => ptr::null_mut(),
    }
}

/// # Safety
/// `p` must be null or a buffer returned by this library's byte-returning functions
/// or [`xh_alloc`], not yet freed.
#[no_mangle]
pub unsafe extern "C" fn xh_free(p: *mut c_void) {
    if !p.is_null() {
        libc::free(p);
    }
}

/// # Safety
/// `p` must be null or a string written to an `out_json` parameter, not yet freed.
#[no_mangle]
pub unsafe extern "C" fn xh_free_string(p: *mut c_char) {
    if !p.is_null() {
        drop(CString::from_raw(p));
    }
}

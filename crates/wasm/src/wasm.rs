use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use xelis_hash_corelib::{self as xh, HashError, HashMetadata, Hasher};

use crate::messages::{batch_input_error, describe, property_error};

fn js_err(err: HashError) -> JsValue {
    JsValue::from_str(&describe(&err))
}

fn set(obj: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(obj, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|_| JsValue::from_str(&property_error(key)))
}

/// Sets a panic hook for better error messages in NodeJS or web browser. See:
/// https://crates.io/crates/console_error_panic_hook
#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    xh::init();
}

#[wasm_bindgen]
pub fn xelis_hash(data: &[u8]) -> Result<Vec<u8>, JsValue> {
    xh::hash_bytes(data).map(|d| d.to_vec()).map_err(js_err)
}

#[wasm_bindgen]
pub fn xelis_hash_hex(data: &[u8]) -> Result<String, JsValue> {
    xh::hash_hex(data).map_err(js_err)
}

#[wasm_bindgen]
pub fn hash_string(input: &str) -> Result<String, JsValue> {
    xh::hash_text(input).map_err(js_err)
}

/// Chain the hash `iterations` times; zero returns `data` unchanged.
#[wasm_bindgen]
pub fn xelis_hash_multiple(data: &[u8], iterations: u32) -> Result<Vec<u8>, JsValue> {
    xh::hash_iterated(data, iterations).map_err(js_err)
}

#[wasm_bindgen]
pub fn bytes_to_hex(data: &[u8]) -> String {
    xh::bytes_to_hex(data)
}

#[wasm_bindgen]
pub fn hex_to_bytes(hex_string: &str) -> Result<Vec<u8>, JsValue> {
    xh::hex_to_bytes(hex_string).map_err(js_err)
}

#[wasm_bindgen]
pub fn verify_hash(hex_hash1: &str, hex_hash2: &str) -> Result<bool, JsValue> {
    xh::verify(hex_hash1, hex_hash2).map_err(js_err)
}

#[wasm_bindgen]
pub fn get_hash_size() -> usize {
    xh::get_hash_size()
}

/// `{ bytes: Uint8Array, hex: string, size: number }`
#[wasm_bindgen]
pub fn xelis_hash_detailed(data: &[u8]) -> Result<JsValue, JsValue> {
    let detailed = xh::hash_detailed(data).map_err(js_err)?;

    let result = Object::new();
    set(
        &result,
        "bytes",
        &Uint8Array::from(&detailed.bytes.as_bytes()[..]).into(),
    )?;
    set(&result, "hex", &detailed.hex.into())?;
    set(&result, "size", &(detailed.size as u32).into())?;
    Ok(result.into())
}

/// Hash every `Uint8Array` in `data_slices`; the result array is index-aligned.
/// Any element that is not a `Uint8Array` fails the whole call.
#[wasm_bindgen]
pub fn batch_hash(data_slices: Array) -> Result<Array, JsValue> {
    let mut inputs = Vec::with_capacity(data_slices.length() as usize);
    for i in 0..data_slices.length() {
        let data = data_slices
            .get(i)
            .dyn_into::<Uint8Array>()
            .map_err(|_| JsValue::from_str(&batch_input_error(i)))?;
        inputs.push(data.to_vec());
    }

    // no worker threads on wasm32
    let digests = Hasher::default()
        .parallel(false)
        .hash_batch(&inputs)
        .map_err(js_err)?;

    let results = Array::new();
    for digest in digests {
        results.push(&Uint8Array::from(&digest.as_bytes()[..]));
    }
    Ok(results)
}

/// `{ input_length, hash_length, hash_bytes: Uint8Array, hash_hex }`
#[wasm_bindgen]
pub fn hash_with_metadata(data: &[u8]) -> Result<JsValue, JsValue> {
    let HashMetadata {
        input_length,
        hash_length,
        hash_hex,
        hash_bytes,
    } = xh::hash_with_metadata(data).map_err(js_err)?;

    let obj = Object::new();
    set(&obj, "input_length", &(input_length as u32).into())?;
    set(&obj, "hash_length", &(hash_length as u32).into())?;
    set(
        &obj,
        "hash_bytes",
        &Uint8Array::from(&hash_bytes.as_bytes()[..]).into(),
    )?;
    set(&obj, "hash_hex", &hash_hex.into())?;
    Ok(obj.into())
}

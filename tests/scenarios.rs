use xelis_hash_corelib::{
    bytes_to_hex, get_hash_size, hash_batch, hash_bytes, hash_detailed, hash_hex, hash_iterated,
    init, HashError,
};

#[test]
fn hello_xelis() {
    init();
    let input = "Hello, XELIS!".as_bytes();
    let digest = hash_bytes(input).unwrap();
    assert_eq!(digest.as_bytes().len(), get_hash_size());
    assert_eq!(hash_hex(input).unwrap(), bytes_to_hex(digest.as_bytes()));
}

#[test]
fn batch_of_four_words() {
    let words = ["XELIS", "Blockchain", "WASM", "Rust"];
    let inputs: Vec<&[u8]> = words.iter().map(|w| w.as_bytes()).collect();
    let digests = hash_batch(&inputs).unwrap();
    assert_eq!(digests.len(), 4);
    for (word, digest) in words.iter().zip(digests) {
        assert_eq!(digest, hash_bytes(word.as_bytes()).unwrap());
    }
}

#[test]
fn triple_iteration() {
    let input = "XELIS".as_bytes();
    let once = hash_bytes(input).unwrap();
    let twice = hash_bytes(once.as_bytes()).unwrap();
    let thrice = hash_bytes(twice.as_bytes()).unwrap();
    assert_eq!(hash_iterated(input, 3).unwrap(), thrice.to_vec());
}

#[test]
fn detailed_record() {
    let detailed = hash_detailed(b"XELIS").unwrap();
    assert_eq!(detailed.size, get_hash_size());
    assert_eq!(detailed.hex, hash_hex(b"XELIS").unwrap());
}

#[test]
fn malformed_hex_is_invalid_encoding() {
    for bad in ["abc", "0g", "zz", " 00"] {
        let err = xelis_hash_corelib::hex_to_bytes(bad).unwrap_err();
        assert!(matches!(err, HashError::InvalidEncoding { .. }), "{bad}");
    }
}

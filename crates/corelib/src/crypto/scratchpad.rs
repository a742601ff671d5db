//! Memory-hard scratchpad engine (the default).
//!
//! Three stages per call:
//! 1. fill: a BLAKE3 XOF keyed with `H(label || input)` expands the input over
//!    the whole scratchpad,
//! 2. mix: `SCRATCHPAD_ROUNDS` passes of data-dependent reads and writes,
//! 3. compress: BLAKE3 over the input length and the mixed scratchpad.
//!
//! All arithmetic is done on `u64` so that 32-bit targets (wasm32) produce the
//! same digests as 64-bit hosts.

use std::cell::RefCell;

use crate::crypto::blake3::Blake3;
use crate::crypto::engine::HashEngine;
use crate::crypto::hash::hash_labeled;
use crate::digest::{Digest, HASH_SIZE};
use crate::errors::HashError;

/// Scratchpad size in 64-bit words (64 KiB).
pub const SCRATCHPAD_WORDS: usize = 8 * 1024;
/// Number of mixing passes over the scratchpad.
pub const SCRATCHPAD_ROUNDS: usize = 3;

const FILL_LABEL: &str = "XELIS.SCRATCHPAD.V1.FILL";
const COMPRESS_LABEL: &str = "XELIS.SCRATCHPAD.V1.COMPRESS";
const MIX_MULTIPLIER: u64 = 0x9e37_79b9_7f4a_7c15;
// Words converted per XOF read / compression update.
const CHUNK_WORDS: usize = 64;

pub const ENGINE_ID: &str = "scratchpad";

thread_local! {
    static SCRATCH_PAD: RefCell<ScratchPad> = RefCell::new(ScratchPad::default());
}

/// Reusable working memory for [`scratchpad_hash`].
pub struct ScratchPad {
    words: Box<[u64]>,
}

impl Default for ScratchPad {
    fn default() -> Self {
        Self {
            words: vec![0u64; SCRATCHPAD_WORDS].into_boxed_slice(),
        }
    }
}

impl ScratchPad {
    fn fill(&mut self, input: &[u8]) {
        let key = hash_labeled::<Blake3>(FILL_LABEL, input);
        let mut hasher = blake3::Hasher::new_keyed(&key);
        hasher.update(input);
        let mut reader = hasher.finalize_xof();

        let mut buf = [0u8; CHUNK_WORDS * 8];
        for chunk in self.words.chunks_mut(CHUNK_WORDS) {
            let bytes = &mut buf[..chunk.len() * 8];
            reader.fill(bytes);
            for (word, le) in chunk.iter_mut().zip(bytes.chunks_exact(8)) {
                *word = le_u64(le);
            }
        }
    }

    fn mix(&mut self) {
        let words = &mut self.words;
        let n = words.len() as u64;
        let mut acc = words[words.len() - 1];

        for round in 0..SCRATCHPAD_ROUNDS as u64 {
            for i in 0..words.len() {
                let a = words[i];
                let j = ((acc ^ a) % n) as usize;
                let b = words[j];

                let rot = ((a >> 58) as u32) | 1;
                acc = acc.rotate_left(rot).wrapping_add(b.wrapping_mul(MIX_MULTIPLIER)) ^ round;

                words[i] = a ^ acc;
                words[j] = b.wrapping_add(acc.rotate_right(17));
            }
        }
    }

    fn compress(&self, input_len: usize) -> [u8; HASH_SIZE] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(COMPRESS_LABEL.as_bytes());
        hasher.update(&(input_len as u64).to_le_bytes());

        let mut buf = [0u8; CHUNK_WORDS * 8];
        for chunk in self.words.chunks(CHUNK_WORDS) {
            for (word, out) in chunk.iter().zip(buf.chunks_exact_mut(8)) {
                out.copy_from_slice(&word.to_le_bytes());
            }
            hasher.update(&buf[..chunk.len() * 8]);
        }
        *hasher.finalize().as_bytes()
    }
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(bytes);
    u64::from_le_bytes(word)
}

/// Hash `input` using caller-provided working memory.
///
/// The scratchpad is fully overwritten on every call, so reusing one across
/// inputs never leaks state from a previous hash into the next.
pub fn scratchpad_hash(input: &[u8], pad: &mut ScratchPad) -> Digest {
    pad.fill(input);
    pad.mix();
    Digest::from_bytes(pad.compress(input.len()))
}

/// Engine backed by a per-thread [`ScratchPad`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ScratchpadEngine;

impl ScratchpadEngine {
    fn failure(input_len: usize, reason: &str) -> HashError {
        HashError::EngineFailure {
            engine: ENGINE_ID,
            operation: "hash",
            input_len,
            reason: reason.to_string(),
        }
    }
}

impl HashEngine for ScratchpadEngine {
    fn id(&self) -> &'static str {
        ENGINE_ID
    }

    fn hash(&self, input: &[u8]) -> Result<Digest, HashError> {
        SCRATCH_PAD
            .try_with(|cell| -> Result<Digest, HashError> {
                let mut pad = cell.try_borrow_mut().map_err(|_| {
                    Self::failure(input.len(), "scratchpad already in use on this thread")
                })?;
                Ok(scratchpad_hash(input, &mut pad))
            })
            .map_err(|_| Self::failure(input.len(), "thread-local scratchpad unavailable"))?
    }

    fn memory_hard(&self) -> bool {
        true
    }
}

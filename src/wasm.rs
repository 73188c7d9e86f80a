//! WebAssembly bindings.
//!
//! Exposes words as an opaque JavaScript class. Values cross the boundary as
//! `BigInt` or as trit strings; arithmetic faults become `JsError`.

use wasm_bindgen::prelude::*;
use crate::ternary::{self, Divider, Limits, Word64};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_err(e: ternary::TernaryError) -> JsError {
    JsError::new(&e.to_string())
}

/// A 64-trit balanced ternary word.
#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct WasmWord {
    word: Word64,
}

#[wasm_bindgen]
impl WasmWord {
    /// Encode a signed integer.
    #[wasm_bindgen(constructor)]
    pub fn new(value: i64) -> Self {
        Self { word: ternary::encode_signed(value) }
    }

    /// Parse a trit string such as "+0-".
    #[wasm_bindgen]
    pub fn parse(trits: &str) -> Result<WasmWord, JsError> {
        let word = Word64::parse(trits).map_err(js_err)?;
        Ok(Self { word })
    }

    /// Signed value (modulo 2^64 outside the i64 range).
    #[wasm_bindgen]
    pub fn value(&self) -> i64 {
        ternary::signed_decode(self.word)
    }

    /// All 64 trits, most significant first.
    #[wasm_bindgen]
    pub fn trits(&self) -> String {
        self.word.to_string()
    }

    /// Trits followed by trit-size, zero count and parity.
    #[wasm_bindgen]
    pub fn diagnostic(&self) -> String {
        self.word.diagnostic()
    }

    #[wasm_bindgen]
    pub fn trit_size(&self) -> u32 {
        self.word.trit_size()
    }

    #[wasm_bindgen]
    pub fn add(&self, other: &WasmWord) -> Result<WasmWord, JsError> {
        let word = ternary::add(self.word, other.word).map_err(js_err)?;
        Ok(Self { word })
    }

    #[wasm_bindgen]
    pub fn sub(&self, other: &WasmWord) -> Result<WasmWord, JsError> {
        let word = ternary::subtract(self.word, other.word).map_err(js_err)?;
        Ok(Self { word })
    }

    #[wasm_bindgen]
    pub fn neg(&self) -> WasmWord {
        Self { word: -self.word }
    }

    /// Exact division by 2^k.
    #[wasm_bindgen]
    pub fn div_pow2(&self, k: u32, max_rounds: u32) -> Result<WasmWord, JsError> {
        let word = Divider::new(Limits { max_rounds }).exact(self.word, k).map_err(js_err)?;
        Ok(Self { word })
    }

    /// Floor division by 2^k.
    #[wasm_bindgen]
    pub fn floor_div_pow2(&self, k: u32, max_rounds: u32) -> Result<WasmWord, JsError> {
        let (word, _) = Divider::new(Limits { max_rounds }).floor(self.word, k).map_err(js_err)?;
        Ok(Self { word })
    }

    /// Reduction modulo 2^k - 1 (experimental).
    #[wasm_bindgen]
    pub fn mod_mersenne(&self, k: u32, max_rounds: u32) -> Result<WasmWord, JsError> {
        let word = Divider::new(Limits { max_rounds }).mersenne(self.word, k).map_err(js_err)?;
        Ok(Self { word })
    }
}

/// Render the encodings of 0..count, one per line.
#[wasm_bindgen]
pub fn wasm_table(count: u32) -> String {
    (0..u64::from(count))
        .map(|n| format!("n = {:2}: {:#}", n, ternary::encode(n)))
        .collect::<Vec<_>>()
        .join("\n")
}

//! Rust to JavaScript value conversion
//!
//! This module provides the TryIntoJsValue trait for converting Rust types
//! to JavaScript values with BigInt handling for 64- and 256-bit integers.

use crate::address::format_address;
use crate::signature::SignatureData;
use alloy_primitives::{Address, B256, U256};
use wasm_bindgen::prelude::*;

/// Error type for JS conversion failures
#[derive(Debug, Clone)]
pub struct JsConversionError(String);

impl JsConversionError {
    pub fn new(msg: &str) -> Self {
        JsConversionError(msg.to_string())
    }
}

impl std::fmt::Display for JsConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<JsConversionError> for JsValue {
    fn from(err: JsConversionError) -> Self {
        js_sys::Error::new(&err.0).into()
    }
}

/// Trait for converting Rust types to JavaScript values
pub trait TryIntoJsValue {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError>;
}

impl TryIntoJsValue for String {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        Ok(JsValue::from_str(self))
    }
}

impl TryIntoJsValue for u64 {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        // BigInt keeps chain-bound v values exact
        Ok(js_sys::BigInt::from(*self).into())
    }
}

impl TryIntoJsValue for U256 {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        // BigInt::from only supports 64 bits; go through the decimal string
        js_sys::BigInt::new(&JsValue::from_str(&self.to_string()))
            .map(|b| b.into())
            .map_err(|_| JsConversionError::new("Failed to create BigInt"))
    }
}

impl TryIntoJsValue for Address {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        Ok(JsValue::from_str(&format_address(self)))
    }
}

impl TryIntoJsValue for B256 {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        Ok(JsValue::from_str(&self.to_string()))
    }
}

impl TryIntoJsValue for SignatureData {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        crate::js_obj!(
            "v" => self.v,
            "r" => self.r,
            "s" => self.s,
        )
    }
}

impl<T: TryIntoJsValue> TryIntoJsValue for Option<T> {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        match self {
            Some(v) => v.try_to_js_value(),
            None => Ok(JsValue::undefined()),
        }
    }
}

impl<T: TryIntoJsValue> TryIntoJsValue for [T] {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        let arr = js_sys::Array::new();
        for item in self {
            arr.push(&item.try_to_js_value()?);
        }
        Ok(arr.into())
    }
}

impl<T: TryIntoJsValue> TryIntoJsValue for Vec<T> {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        self.as_slice().try_to_js_value()
    }
}

/// Macro for building JavaScript objects
#[macro_export]
macro_rules! js_obj {
    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        use $crate::wasm::try_into_js_value::{TryIntoJsValue, JsConversionError};
        let obj = js_sys::Object::new();
        $(
            js_sys::Reflect::set(
                &obj,
                &wasm_bindgen::JsValue::from_str($key),
                &TryIntoJsValue::try_to_js_value(&$value)?
            ).map_err(|_| JsConversionError::new(&format!("Failed to set property: {}", $key)))?;
        )*
        Ok::<wasm_bindgen::JsValue, JsConversionError>(obj.into())
    }};
}

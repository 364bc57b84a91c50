//! # Message Codec
//!
//! Converts payloads to the JSON text stored by pgmq and back.
//!
//! String payloads are passed through untouched: a `String`, `&'static str`,
//! `Option<String>` or `Option<&'static str>` is taken to already be a JSON
//! document and is sent
//! verbatim, and reading into one of those types returns the stored text
//! without parsing it. Every other type goes through `serde_json` with the
//! field names serde derives, no renaming applied.

use serde::{de::DeserializeOwned, Serialize};
use std::any::{Any, TypeId};

use crate::error::Result;

/// Encode a payload as JSON text
///
/// `None::<String>` and `None::<&'static str>` encode as an empty string,
/// whereas `None` of any other type encodes as the JSON literal `null`.
pub fn encode<T>(payload: &T) -> Result<String>
where
    T: Serialize + 'static,
{
    let any = payload as &dyn Any;
    if let Some(text) = any.downcast_ref::<String>() {
        return Ok(text.clone());
    }
    if let Some(text) = any.downcast_ref::<&'static str>() {
        return Ok((*text).to_owned());
    }
    if let Some(text) = any.downcast_ref::<Option<String>>() {
        return Ok(text.clone().unwrap_or_default());
    }
    if let Some(text) = any.downcast_ref::<Option<&'static str>>() {
        return Ok(text.unwrap_or_default().to_owned());
    }

    Ok(serde_json::to_string(payload)?)
}

/// Decode stored JSON text into `T`
///
/// `None` input (SQL `NULL`) decodes to `None`. For non-string types the JSON
/// literal `null` also decodes to `None`.
pub fn decode<T>(text: Option<&str>) -> Result<Option<T>>
where
    T: DeserializeOwned + 'static,
{
    let Some(text) = text else {
        return Ok(None);
    };

    if TypeId::of::<T>() == TypeId::of::<String>() {
        return Ok(cast::<T, _>(text.to_owned()));
    }
    if TypeId::of::<T>() == TypeId::of::<Option<String>>() {
        return Ok(cast::<T, _>(Some(text.to_owned())));
    }

    if text.trim() == "null" {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(text)?))
}

/// Whether `T` is one of the pass-through string payload types
pub fn is_raw_string<T: 'static>() -> bool {
    let id = TypeId::of::<T>();
    id == TypeId::of::<String>()
        || id == TypeId::of::<&'static str>()
        || id == TypeId::of::<Option<String>>()
        || id == TypeId::of::<Option<&'static str>>()
}

fn cast<T: 'static, V: 'static>(value: V) -> Option<T> {
    (Box::new(value) as Box<dyn Any>)
        .downcast::<T>()
        .ok()
        .map(|boxed| *boxed)
}

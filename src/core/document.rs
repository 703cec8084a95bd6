// Single-document encode/write and open/decode, shared by every public entry point.
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::cycle::CycleScope;
use crate::core::error::{Error, ErrorKind};
use crate::core::policy::{Formatting, JsonPolicy};
use crate::core::tagged;
use crate::json::parse::{self, ParseFailureCategory};

fn validate_path(path: &Path) -> Result<(), Error> {
    if path.as_os_str().is_empty() {
        return Err(Error::new(ErrorKind::InvalidArgument).with_message("path must not be empty"));
    }
    Ok(())
}

fn encode_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Encode)
        .with_message(err.to_string())
        .with_source(err)
}

fn decode_error(err: serde_json::Error, path: &Path, context: &str) -> Error {
    let category = parse::categorize_error(&err);
    if category == ParseFailureCategory::Io {
        return Error::io(io::Error::from(err), path);
    }
    warn!(
        path = %path.display(),
        category = category.label(),
        "json decode failed"
    );
    Error::new(ErrorKind::Decode)
        .with_message(err.to_string())
        .with_path(path)
        .with_hint(parse::hint_for_error(&err, context))
        .with_source(err)
}

/// Encodes `data` fully in memory under `policy`.
///
/// Cycle handling applies to every `Shared` node reached while encoding. A
/// payload whose root encodes to `null` is rejected as an invalid argument.
pub fn encode<T: ?Sized + Serialize>(data: &T, policy: &JsonPolicy) -> Result<Vec<u8>, Error> {
    let encoded = {
        let _scope = CycleScope::enter(policy.cycles);
        if policy.is_tagged() {
            tagged::ser::to_value(data)
        } else {
            serde_json::to_value(data)
        }
    };
    let payload = encoded.map_err(encode_error)?;
    if payload.is_null() {
        return Err(Error::new(ErrorKind::InvalidArgument).with_message("data must not be null"));
    }
    let document = if policy.is_tagged() {
        tagged::envelope::<T>(payload, policy.assembly_style)
    } else {
        payload
    };

    let mut bytes = Vec::new();
    let written = match policy.format {
        Formatting::Indented => serde_json::to_writer_pretty(&mut bytes, &document),
        Formatting::Compact => serde_json::to_writer(&mut bytes, &document),
    };
    written.map_err(encode_error)?;
    Ok(bytes)
}

/// Decodes one document from raw JSON text under `policy`.
pub fn decode<T: DeserializeOwned>(
    text: &[u8],
    policy: &JsonPolicy,
) -> Result<T, serde_json::Error> {
    decode_from(text, policy)
}

fn decode_from<R: io::Read, T: DeserializeOwned>(
    reader: R,
    policy: &JsonPolicy,
) -> Result<T, serde_json::Error> {
    if policy.is_tagged() {
        let document: Value = parse::from_reader(reader)?;
        tagged::open_envelope(document)
    } else {
        parse::from_reader(reader)
    }
}

fn open_for_write(path: &Path, create_if_missing: bool) -> Result<File, Error> {
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(create_if_missing)
        .open(path)
        .map_err(|err| Error::io(err, path))
}

/// Writes one document, returning the number of bytes written.
pub fn write_document<T: ?Sized + Serialize>(
    path: &Path,
    data: &T,
    create_if_missing: bool,
    policy: &JsonPolicy,
) -> Result<usize, Error> {
    validate_path(path)?;
    if !create_if_missing && !path.exists() {
        return Err(Error::new(ErrorKind::InvalidArgument)
            .with_message("file does not exist and creation is disabled")
            .with_path(path));
    }
    let bytes = encode(data, policy).map_err(|err| err.with_path(path))?;

    let mut file = open_for_write(path, create_if_missing)?;
    file.write_all(&bytes).map_err(|err| Error::io(err, path))?;
    debug!(
        path = %path.display(),
        dialect = policy.dialect(),
        bytes = bytes.len(),
        "wrote json document"
    );
    Ok(bytes.len())
}

/// Reads one document; the file must already exist.
pub fn read_document<T: DeserializeOwned>(path: &Path, policy: &JsonPolicy) -> Result<T, Error> {
    validate_path(path)?;
    if !path.exists() {
        return Err(Error::new(ErrorKind::InvalidArgument)
            .with_message("file does not exist")
            .with_path(path));
    }
    let file = File::open(path).map_err(|err| Error::io(err, path))?;
    let value = decode_from(BufReader::new(file), policy)
        .map_err(|err| decode_error(err, path, "read"))?;
    debug!(
        path = %path.display(),
        dialect = policy.dialect(),
        "read json document"
    );
    Ok(value)
}

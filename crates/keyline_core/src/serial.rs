// SPDX-License-Identifier: MIT OR Apache-2.0
//! Byte stream framing for key payloads.
//!
//! Key payloads are written as ordered little-endian scalars and
//! arrays. Individual writes record the first failure instead of
//! returning it, so a serialize routine can emit all fields and report
//! success with a single [`Serializer::check_stream`] at the end.
//! Reads fail eagerly, carrying the innermost diagnostic scope so
//! errors are attributable ("FfdKey: invalid easing param") when
//! reported upstream.

use crate::mesh::Vector3;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use thiserror::Error;

/// Errors raised while reading or writing a key payload stream.
#[derive(Debug, Error)]
pub enum SerialError {
    /// Underlying stream failure (truncation, I/O).
    #[error("stream failure in {scope}: {source}")]
    Stream {
        /// Diagnostic scope path active when the stream failed.
        scope: String,
        /// The I/O error reported by the stream.
        source: std::io::Error,
    },

    /// Malformed value, attributed to the innermost diagnostic scope.
    #[error("{scope}: {message}")]
    Value {
        /// Diagnostic scope path active when the value was rejected.
        scope: String,
        /// Human-readable description of the malformed value.
        message: String,
    },
}

/// Result type for stream operations.
pub type SerialResult<T> = Result<T, SerialError>;

/// Ordered scalar/array writer over a byte stream.
pub struct Serializer<W: Write> {
    out: W,
    failure: Option<std::io::Error>,
}

impl<W: Write> Serializer<W> {
    /// Wrap a byte sink.
    pub fn new(out: W) -> Self {
        Self { out, failure: None }
    }

    fn record<T>(&mut self, result: std::io::Result<T>) {
        if let Err(error) = result {
            if self.failure.is_none() {
                self.failure = Some(error);
            }
        }
    }

    /// Write a 32-bit signed integer.
    pub fn write_i32(&mut self, value: i32) {
        let result = self.out.write_i32::<LittleEndian>(value);
        self.record(result);
    }

    /// Write a 32-bit float.
    pub fn write_f32(&mut self, value: f32) {
        let result = self.out.write_f32::<LittleEndian>(value);
        self.record(result);
    }

    /// Write an ordered vertex position array.
    pub fn write_vector3_array(&mut self, values: &[Vector3]) {
        for value in values {
            for component in value {
                self.write_f32(*component);
            }
        }
    }

    /// Report success only if no write has failed so far.
    pub fn check_stream(&mut self) -> SerialResult<()> {
        match self.failure.take() {
            None => Ok(()),
            Some(source) => Err(SerialError::Stream {
                scope: String::new(),
                source,
            }),
        }
    }
}

/// Ordered scalar/array reader with hierarchical diagnostic scopes.
pub struct Deserializer<R: Read> {
    input: R,
    scopes: Vec<&'static str>,
    failed: bool,
}

impl<R: Read> Deserializer<R> {
    /// Wrap a byte source.
    pub fn new(input: R) -> Self {
        Self {
            input,
            scopes: Vec::new(),
            failed: false,
        }
    }

    /// Enter a named diagnostic scope for error attribution.
    pub fn push_log_scope(&mut self, name: &'static str) {
        self.scopes.push(name);
    }

    /// Leave the innermost diagnostic scope.
    pub fn pop_log_scope(&mut self) {
        self.scopes.pop();
    }

    fn scope_path(&self) -> String {
        self.scopes.join(".")
    }

    /// Record a malformed value and build the failure to return.
    pub fn errored(&mut self, message: &str) -> SerialError {
        self.failed = true;
        SerialError::Value {
            scope: self.scope_path(),
            message: message.to_owned(),
        }
    }

    fn stream_error(&mut self, source: std::io::Error) -> SerialError {
        self.failed = true;
        SerialError::Stream {
            scope: self.scope_path(),
            source,
        }
    }

    /// Read a 32-bit signed integer.
    pub fn read_i32(&mut self) -> SerialResult<i32> {
        self.input
            .read_i32::<LittleEndian>()
            .map_err(|error| self.stream_error(error))
    }

    /// Read a 32-bit float.
    pub fn read_f32(&mut self) -> SerialResult<f32> {
        self.input
            .read_f32::<LittleEndian>()
            .map_err(|error| self.stream_error(error))
    }

    /// Read exactly `dst.len()` vertex positions into `dst`.
    pub fn read_vector3_array(&mut self, dst: &mut [Vector3]) -> SerialResult<()> {
        for value in dst {
            for component in value.iter_mut() {
                *component = self.read_f32()?;
            }
        }
        Ok(())
    }

    /// Report success only if the stream is error free.
    pub fn check_stream(&mut self) -> SerialResult<()> {
        if self.failed {
            Err(SerialError::Value {
                scope: self.scope_path(),
                message: "stream has a recorded failure".to_owned(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trip() {
        let mut bytes = Vec::new();
        let mut out = Serializer::new(&mut bytes);
        out.write_i32(-42);
        out.write_f32(1.5);
        out.check_stream().unwrap();

        let mut input = Deserializer::new(bytes.as_slice());
        assert_eq!(input.read_i32().unwrap(), -42);
        assert_eq!(input.read_f32().unwrap(), 1.5);
        input.check_stream().unwrap();
    }

    #[test]
    fn test_truncated_read_reports_scope() {
        let mut input = Deserializer::new([0u8, 1].as_slice());
        input.push_log_scope("FfdKey");
        let error = input.read_i32().unwrap_err();
        assert!(error.to_string().contains("FfdKey"));
        assert!(input.check_stream().is_err());
    }

    #[test]
    fn test_errored_marks_stream() {
        let mut input = Deserializer::new([0u8; 8].as_slice());
        input.push_log_scope("FfdKey");
        let error = input.errored("invalid easing param");
        assert_eq!(error.to_string(), "FfdKey: invalid easing param");
        assert!(input.check_stream().is_err());
    }
}

// Copyright (c) 2018 Chef Software Inc. and/or applicable contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{error,
          fmt,
          result};

/// Reason a single claimed field failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldFault {
    Missing,
    Malformed,
    /// `auth_date` is older than the permitted maximum age.
    Stale,
    /// `auth_date` lies ahead of the verifying clock.
    FromFuture,
    /// Carries the observed length in characters.
    WrongLength(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidField {
    pub field: &'static str,
    pub fault: FieldFault,
}

impl InvalidField {
    pub fn new(field: &'static str, fault: FieldFault) -> Self { InvalidField { field, fault } }
}

#[derive(Debug, PartialEq)]
pub enum Error {
    Validation(Vec<InvalidField>),
    SignatureMismatch,
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    /// Names of the fields that failed validation, empty for a signature mismatch.
    pub fn fields(&self) -> Vec<&'static str> {
        match *self {
            Error::Validation(ref invalid) => invalid.iter().map(|f| f.field).collect(),
            Error::SignatureMismatch => Vec::new(),
        }
    }
}

impl fmt::Display for FieldFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FieldFault::Missing => write!(f, "missing"),
            FieldFault::Malformed => write!(f, "malformed"),
            FieldFault::Stale => write!(f, "too old"),
            FieldFault::FromFuture => write!(f, "in the future"),
            FieldFault::WrongLength(len) => {
                write!(f, "expected 64 characters, got {}", len)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Error::Validation(ref invalid) => {
                let detail = invalid.iter()
                                    .map(|i| format!("{} ({})", i.field, i.fault))
                                    .collect::<Vec<_>>()
                                    .join(", ");
                format!("Invalid login data: {}", detail)
            }
            Error::SignatureMismatch => "Login data signature mismatch".to_string(),
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_field() {
        let err = Error::Validation(vec![InvalidField::new("id", FieldFault::Missing),
                                         InvalidField::new("hash",
                                                           FieldFault::WrongLength(12)),]);
        assert_eq!(err.to_string(),
                   "Invalid login data: id (missing), hash (expected 64 characters, got 12)");
        assert_eq!(err.fields(), vec!["id", "hash"]);
    }

    #[test]
    fn mismatch_message_is_opaque() {
        let err = Error::SignatureMismatch;
        assert_eq!(err.to_string(), "Login data signature mismatch");
        assert!(err.fields().is_empty());
    }
}

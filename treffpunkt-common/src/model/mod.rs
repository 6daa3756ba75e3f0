pub mod comment;
pub mod post;

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;

pub const ID_MAX_LEN: usize = 64;

/// Record identifiers are supplied by the creating client and treated
/// as opaque strings. The server validates shape only, uniqueness is
/// enforced by the store.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct Id<Marker>(String, #[serde(skip)] PhantomData<Marker>);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
#[error("The record id is invalid: {0:?}")]
pub struct InvalidIdError(String);

impl<Marker> Id<Marker> {
    pub fn new(id: String) -> Result<Self, InvalidIdError> {
        if id.is_empty() || id.chars().count() > ID_MAX_LEN {
            Err(InvalidIdError(id))
        } else {
            Ok(Self(id, PhantomData))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<'de, Marker> Deserialize<'de> for Id<Marker> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Id::new(inner).map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"Id"))
    }
}

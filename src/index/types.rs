use serde::{Deserialize, Serialize};

/// Identifier of the user owning a contact list
pub type UserId = String;

/// A contact exactly as the repository hands it over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContact {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl RawContact {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// An indexed contact
///
/// The searchable fields are stored lower-cased; the original casing is
/// dropped at build time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Contact {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Contact {
    /// Normalize a raw contact for indexing
    pub fn from_raw(raw: RawContact) -> Self {
        Self {
            id: raw.id,
            email: normalize(&raw.email),
            first_name: normalize(&raw.first_name),
            last_name: normalize(&raw.last_name),
        }
    }
}

/// Searchable contact fields, one sorted view each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Email,
    FirstName,
    LastName,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Email, Field::FirstName, Field::LastName];

    /// Extract the normalized key this field sorts and matches on
    #[inline]
    pub fn key(self, contact: &Contact) -> &str {
        match self {
            Field::Email => &contact.email,
            Field::FirstName => &contact.first_name,
            Field::LastName => &contact.last_name,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-fold text for indexing and querying
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

//! Contact form validation. Everything here is pure and DOM-free.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\s\-+()]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Phone, Field::Message];

    /// Form control id and mapping key.
    pub fn id(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Message => "message",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.id() == id)
    }

    pub fn error_message(self) -> &'static str {
        match self {
            Field::Name => "Please enter a valid name (at least 2 characters)",
            Field::Email => "Please enter a valid email address",
            Field::Phone => "Please enter a valid phone number",
            Field::Message => "Please enter a message (at least 10 characters)",
        }
    }
}

/// Raw contact form values. Absent fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactFields {
    /// Builds the fields from a name-to-value mapping; unknown names are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut fields = Self::default();
        for (key, value) in pairs {
            if let Some(field) = Field::from_id(key) {
                *fields.get_mut(field) = value.to_string();
            }
        }
        fields
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Message => &self.message,
        }
    }

    fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Message => &mut self.message,
        }
    }
}

/// Outcome of validating every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<Field, &'static str>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Empty is valid: the phone field is optional.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.is_empty() || PHONE_RE.is_match(phone)
}

fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Checks all fields independently and collects every failure.
pub fn validate(fields: &ContactFields) -> ValidationReport {
    let mut errors = BTreeMap::new();
    for field in Field::ALL {
        let value = fields.get(field);
        let ok = match field {
            Field::Name => has_min_chars(value, 2),
            Field::Email => is_valid_email(value.trim()),
            Field::Phone => is_valid_phone(value.trim()),
            Field::Message => has_min_chars(value, 10),
        };
        if !ok {
            errors.insert(field, field.error_message());
        }
    }
    ValidationReport { errors }
}

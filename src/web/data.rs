use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Every free-text field is capped to keep pathological payloads out of the DB.
const MAX_FIELD_GRAPHEMES: usize = 256;

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable Signup
/// A signup request that can be deserialized but can have missing or invalid fields.
#[derive(Deserialize, Debug)]
pub struct DeserSignup {
    pub email: Option<String>,
    pub nationality: Option<String>,
    pub language: Option<String>,
}

/// Validated Signup
/// A signup with all the fields present and validated.
#[derive(Debug)]
pub struct ValidSignup {
    pub email: SignupEmail,
    pub nationality: Nationality,
    pub language: Language,
}

/// Validated signup email
#[derive(Debug)]
pub struct SignupEmail(String);

/// The nationality of the person signing up, free text.
#[derive(Debug)]
pub struct Nationality(String);

/// The language(s) the person wants to learn, free text.
#[derive(Debug)]
pub struct Language(String);

/// A persisted waitlist entry, as stored in and returned by the database.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct WaitlistRecord {
    pub email: String,
    pub nationality: String,
    pub language: String,
}

// ###################################
// ->   IMPLS
// ###################################
impl TryFrom<DeserSignup> for ValidSignup {
    type Error = DataParsingError;

    fn try_from(deser_signup: DeserSignup) -> Result<Self, Self::Error> {
        Ok(ValidSignup {
            email: SignupEmail::parse(required(deser_signup.email, "email")?)?,
            nationality: Nationality::parse(required(deser_signup.nationality, "nationality")?)?,
            language: Language::parse(required(deser_signup.language, "language")?)?,
        })
    }
}

/// Rejects absent and whitespace-only fields before the per-field parsers run.
fn required(field: Option<String>, name: &'static str) -> Result<String, DataParsingError> {
    field
        .filter(|value| !value.trim().is_empty())
        .ok_or(DataParsingError::FieldMissing(name))
}

impl AsRef<str> for SignupEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SignupEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref().trim();

        if value.graphemes(true).count() > MAX_FIELD_GRAPHEMES {
            return Err(DataParsingError::EmailTooLong);
        }

        // Deliberately conservative: ASCII local part of word/dot/hyphen
        // characters, dot-separated domain labels, final label 2-4 chars.
        // The classes are spelled out because `\w` matches Unicode word
        // characters. Obviously malformed addresses get bounced here instead
        // of wasting a round trip to the database.
        if regex_is_match!(
            r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,4})+$",
            value
        ) {
            Ok(SignupEmail(value.to_owned()))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }
}

impl AsRef<str> for Nationality {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Nationality {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref().trim();

        if value.graphemes(true).count() > MAX_FIELD_GRAPHEMES {
            return Err(DataParsingError::NationalityTooLong);
        }
        if value.is_empty() {
            return Err(DataParsingError::NationalityEmpty);
        }

        Ok(Nationality(value.to_owned()))
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Language {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref().trim();

        if value.graphemes(true).count() > MAX_FIELD_GRAPHEMES {
            return Err(DataParsingError::LanguageTooLong);
        }
        if value.is_empty() {
            return Err(DataParsingError::LanguageEmpty);
        }

        Ok(Language(value.to_owned()))
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, Serialize)]
pub enum DataParsingError {
    FieldMissing(&'static str),

    EmailInvalid,
    EmailTooLong,

    NationalityEmpty,
    NationalityTooLong,

    LanguageEmpty,
    LanguageTooLong,
}
// Error Boilerplate
impl core::fmt::Display for DataParsingError {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for DataParsingError {}

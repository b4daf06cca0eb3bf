use std::borrow::Cow;
use std::fmt;

use phonenumber::country;

use crate::domain::validation::ValidationError;

/// Decode raw bytes as UTF-8, re-encoding from ISO-8859-1 when they are not valid UTF-8.
///
/// Nexmo requires every request parameter to be UTF-8. Byte input coming from legacy
/// sources (Latin-1 form posts, files) is converted byte-for-byte into the matching
/// Unicode code points.
pub fn ensure_utf8(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().copied().map(char::from).collect()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Nexmo API key.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Parameter name used by Nexmo (`username`).
    pub const FIELD: &'static str = "username";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Nexmo API secret.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct ApiSecret(String);

impl ApiSecret {
    /// Parameter name used by Nexmo (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`ApiSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecret(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Response body format requested from Nexmo.
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    /// Path segment / format name (`json` or `xml`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Value of the `Accept` header for this format.
    pub fn accept_header(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }

    /// Parse a format name, trimming and ignoring case. Anything unrecognized is JSON.
    pub fn from_name_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "xml" => Self::Xml,
            _ => Self::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number in international format as sent to Nexmo (`to`, `msisdn`).
///
/// Invariant: non-empty after trimming. [`Msisdn::new`] keeps the input as given;
/// [`Msisdn::parse`] normalizes through libphonenumber metadata.
pub struct Msisdn(String);

impl Msisdn {
    /// Parameter name used by Nexmo for recipients (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated (non-empty) number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Parse a national or international number and store its E.164 digits without `+`.
    ///
    /// `default_region` applies when the input has no country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let raw = input.as_ref().trim();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, raw)
            .ok()
            .filter(phonenumber::is_valid)
            .ok_or_else(|| ValidationError::InvalidPhoneNumber {
                input: raw.to_owned(),
            })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        Ok(Self(e164.trim_start_matches('+').to_owned()))
    }

    /// Create a number from bytes that may not be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        Self::new(ensure_utf8(bytes))
    }

    /// Raw (trimmed) value.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender address (`from`) after carrier-safe normalization.
///
/// Invariant: ASCII alphanumerics only. Alphanumeric sender ids are at most 11
/// characters; numeric ids given with a `00` international prefix lose the prefix
/// and are at most 15 characters. The value may be empty when the input had no
/// usable characters.
pub struct Originator(String);

impl Originator {
    /// Parameter name used by Nexmo (`from`).
    pub const FIELD: &'static str = "from";

    /// Maximum length of an alphanumeric sender id.
    pub const MAX_ALPHANUMERIC_LEN: usize = 11;
    /// Maximum length of a numeric sender id after `00` prefix removal.
    pub const MAX_NUMERIC_LEN: usize = 15;

    /// Normalize a raw sender address. Never fails; unusable input yields an empty value.
    pub fn sanitize(input: &str) -> Self {
        let mut value: String = input.chars().filter(char::is_ascii_alphanumeric).collect();

        if input.chars().any(|c| c.is_ascii_alphabetic()) {
            value.truncate(Self::MAX_ALPHANUMERIC_LEN);
        } else if let Some(rest) = value.strip_prefix("00") {
            // Only numeric input drops the prefix; "00Acme" keeps it.
            let mut rest = rest.to_owned();
            rest.truncate(Self::MAX_NUMERIC_LEN);
            value = rest;
        }

        if value.is_empty() {
            tracing::warn!("nexmo originator: {input:?} has no usable characters");
        }
        Self(value)
    }

    /// Require a numeric sender address, then normalize it.
    ///
    /// Numeric means an optional leading `+` followed by ASCII digits. Signs, decimal
    /// points and exponents (`-44`, `1.5`, `1e3`) are rejected.
    pub fn numeric(input: &str) -> Result<Self, ValidationError> {
        if !is_numeric_sender(input) {
            return Err(ValidationError::NonNumericSender {
                input: input.to_owned(),
            });
        }
        Ok(Self::sanitize(input))
    }

    /// Normalize a sender address given as bytes that may not be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::sanitize(&ensure_utf8(bytes))
    }

    /// Borrow the sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalization left nothing usable.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_numeric_sender(input: &str) -> bool {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`text`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Parameter name used by Nexmo (`text`).
    pub const FIELD: &'static str = "text";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Wire encoding of a text message (`type`).
pub enum MessageEncoding {
    Text,
    Unicode,
}

impl MessageEncoding {
    /// Pick the encoding for `text`.
    ///
    /// An explicit `unicode` flag always wins; otherwise any code point above 127
    /// selects [`MessageEncoding::Unicode`].
    pub fn classify(text: &str, unicode: Option<bool>) -> Self {
        let unicode = unicode.unwrap_or_else(|| !text.is_ascii());
        if unicode { Self::Unicode } else { Self::Text }
    }

    /// Value of the `type` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Unicode => "unicode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Title of a WAP push message (`title`).
///
/// Invariant: non-empty after trimming.
pub struct WapTitle(String);

impl WapTitle {
    /// Parameter name used by Nexmo (`title`).
    pub const FIELD: &'static str = "title";

    /// Create a validated [`WapTitle`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Create a title from bytes that may not be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        Self::new(ensure_utf8(bytes))
    }

    /// Borrow the title as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Target URL of a WAP push message (`url`).
///
/// Invariant: absolute `http` or `https` URL. The input string is kept as given.
pub struct WapUrl(String);

impl WapUrl {
    /// Parameter name used by Nexmo (`url`).
    pub const FIELD: &'static str = "url";

    /// Create a validated [`WapUrl`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let parsed = url::Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl {
            input: trimmed.to_owned(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Create a URL from bytes that may not be UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        Self::new(ensure_utf8(bytes))
    }

    /// Borrow the URL as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// How long a WAP push stays available, in milliseconds (`validity`).
pub struct WapValidity(u64);

impl WapValidity {
    /// Parameter name used by Nexmo (`validity`).
    pub const FIELD: &'static str = "validity";

    /// 48 hours.
    pub const DEFAULT_MILLIS: u64 = 172_800_000;

    /// Validity of `millis` milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Validity in milliseconds.
    pub fn as_millis(self) -> u64 {
        self.0
    }
}

impl Default for WapValidity {
    fn default() -> Self {
        Self(Self::DEFAULT_MILLIS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// ISO 3166-1 alpha-2 country code.
///
/// Invariant: two ASCII letters, stored upper-cased.
pub struct CountryCode(String);

impl CountryCode {
    /// Path placeholder used in Nexmo account URLs.
    pub const FIELD: &'static str = "country-code";

    /// Create a validated [`CountryCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if trimmed.len() != 2 || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCountryCode {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Borrow the upper-cased country code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Nexmo message id returned at submission time.
///
/// Invariant: non-empty after trimming.
pub struct MessageId(String);

impl MessageId {
    /// Placeholder / parameter name used by Nexmo (`message-id`).
    pub const FIELD: &'static str = "message-id";

    /// Create a validated [`MessageId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the message id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_validate() {
        let key = ApiKey::new("  key ").unwrap();
        assert_eq!(key.as_str(), "key");
        assert!(ApiKey::new("  ").is_err());

        let secret = ApiSecret::new(" secret ").unwrap();
        assert_eq!(secret.as_str(), " secret ");
        assert!(ApiSecret::new("").is_err());

        let msg = MessageText::new(" hi ").unwrap();
        assert_eq!(msg.as_str(), " hi ");
        assert!(MessageText::new("  ").is_err());

        let id = MessageId::new(" 00A0B0C0 ").unwrap();
        assert_eq!(id.as_str(), "00A0B0C0");
        assert!(MessageId::new("").is_err());
    }

    #[test]
    fn secret_is_redacted_in_debug_output() {
        let secret = ApiSecret::new("hunter2").unwrap();
        assert!(!format!("{secret:?}").contains("hunter2"));
    }

    #[test]
    fn alphanumeric_originator_is_stripped_and_truncated() {
        let from = Originator::sanitize("My Company-2020!");
        assert_eq!(from.as_str(), "MyCompany20");

        for input in ["A", "Acme Ltd.", "x-y_z 1234567890", "€uro Shop 24/7 Now"] {
            let from = Originator::sanitize(input);
            assert!(from.as_str().len() <= Originator::MAX_ALPHANUMERIC_LEN);
            assert!(from.as_str().bytes().all(|b| b.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn numeric_originator_drops_international_prefix() {
        let from = Originator::sanitize("00 44 7525-856424");
        assert_eq!(from.as_str(), "447525856424");

        let long = format!("00{}", "1234567890".repeat(2));
        let from = Originator::sanitize(&long);
        assert_eq!(from.as_str(), "123456789012345");
        assert_eq!(from.as_str().len(), Originator::MAX_NUMERIC_LEN);
    }

    #[test]
    fn numeric_originator_without_prefix_is_only_stripped() {
        let from = Originator::sanitize("+44 (0) 7525 856424");
        assert_eq!(from.as_str(), "4407525856424");
    }

    #[test]
    fn mixed_originator_keeps_leading_zeros() {
        let from = Originator::sanitize("00Acme");
        assert_eq!(from.as_str(), "00Acme");
    }

    #[test]
    fn originator_may_end_up_empty() {
        assert!(Originator::sanitize("+-() ").is_empty());
    }

    #[test]
    fn numeric_originator_rejects_letters() {
        assert!(Originator::numeric("+447525856424").is_ok());
        assert!(Originator::numeric(" 447525856424 ").is_ok());
        assert!(matches!(
            Originator::numeric("Acme"),
            Err(ValidationError::NonNumericSender { .. })
        ));
        assert!(Originator::numeric("+").is_err());
        assert!(Originator::numeric("12 34").is_err());
        for input in ["-44", "1.5", "1e3"] {
            assert!(Originator::numeric(input).is_err(), "{input}");
        }
    }

    #[test]
    fn encoding_classifier_scans_text_unless_overridden() {
        assert_eq!(
            MessageEncoding::classify("Hello", None),
            MessageEncoding::Text
        );
        assert_eq!(
            MessageEncoding::classify("héllo", None),
            MessageEncoding::Unicode
        );
        assert_eq!(
            MessageEncoding::classify("héllo", Some(false)),
            MessageEncoding::Text
        );
        assert_eq!(
            MessageEncoding::classify("Hello", Some(true)),
            MessageEncoding::Unicode
        );
        assert_eq!(MessageEncoding::Unicode.as_str(), "unicode");
    }

    #[test]
    fn ensure_utf8_reencodes_latin1() {
        assert_eq!(ensure_utf8("héllo".as_bytes()), "héllo");
        assert_eq!(ensure_utf8(b"h\xe9llo"), "héllo");
        assert!(matches!(ensure_utf8(b"plain"), Cow::Borrowed(_)));

        let title = WapTitle::from_bytes(b"Caf\xe9").unwrap();
        assert_eq!(title.as_str(), "Café");
    }

    #[test]
    fn msisdn_parse_normalizes_to_e164_digits() {
        let msisdn = Msisdn::parse(None, "+44 7525 856424").unwrap();
        assert_eq!(msisdn.raw(), "447525856424");

        let national = Msisdn::parse(Some(country::Id::GB), "07525 856424").unwrap();
        assert_eq!(national, msisdn);

        assert!(matches!(
            Msisdn::parse(None, "not-a-number"),
            Err(ValidationError::InvalidPhoneNumber { .. })
        ));
        assert!(matches!(
            Msisdn::parse(None, "  "),
            Err(ValidationError::Empty { field: "to" })
        ));
    }

    #[test]
    fn wap_url_requires_http_scheme() {
        assert!(WapUrl::new("http://www.example.com").is_ok());
        assert!(WapUrl::new("https://example.com/a?b=c").is_ok());
        assert!(matches!(
            WapUrl::new("ftp://example.com"),
            Err(ValidationError::InvalidUrl { .. })
        ));
        assert!(WapUrl::new("example").is_err());
    }

    #[test]
    fn wap_validity_defaults_to_48_hours() {
        assert_eq!(WapValidity::default().as_millis(), 172_800_000);
    }

    #[test]
    fn country_code_is_upper_cased() {
        assert_eq!(CountryCode::new(" es ").unwrap().as_str(), "ES");
        assert!(matches!(
            CountryCode::new("ESP"),
            Err(ValidationError::InvalidCountryCode { .. })
        ));
        assert!(CountryCode::new("1A").is_err());
        assert!(CountryCode::new("").is_err());
    }

    #[test]
    fn response_format_parses_leniently() {
        assert_eq!(ResponseFormat::from_name_lenient(" XML "), ResponseFormat::Xml);
        assert_eq!(ResponseFormat::from_name_lenient("json"), ResponseFormat::Json);
        assert_eq!(ResponseFormat::from_name_lenient("yaml"), ResponseFormat::Json);
        assert_eq!(ResponseFormat::Xml.accept_header(), "application/xml");
    }
}

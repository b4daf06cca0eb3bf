use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Format of the `scts` field (`yyMMddHHmm`, UTC).
const SCTS_FORMAT: &str = "%y%m%d%H%M";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Parameters of one webhook call, GET and POST merged.
pub struct WebhookParams(HashMap<String, String>);

impl WebhookParams {
    /// Merge query (GET) and body (POST) parameters. POST values win on collision.
    pub fn merge<Q, B>(query: Q, body: B) -> Self
    where
        Q: IntoIterator<Item = (String, String)>,
        B: IntoIterator<Item = (String, String)>,
    {
        let mut params = HashMap::new();
        params.extend(query);
        params.extend(body);
        Self(params)
    }

    /// Parse a raw query string and an `application/x-www-form-urlencoded` body.
    pub fn from_encoded(query: &str, body: &str) -> Self {
        let decode = |input: &str| {
            url::form_urlencoded::parse(input.trim_start_matches('?').as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect::<Vec<_>>()
        };
        Self::merge(decode(query), decode(body))
    }

    /// Value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn owned(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

impl FromIterator<(String, String)> for WebhookParams {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Final delivery status reported in a receipt.
pub enum DeliveryStatus {
    /// Message arrived to handset.
    Delivered,
    /// No status from the operator within 48h.
    Expired,
    Failed,
    /// Still being delivered.
    Buffered,
    Other(String),
}

impl DeliveryStatus {
    /// Map the `status` field; unknown values are kept in [`DeliveryStatus::Other`].
    pub fn parse(value: &str) -> Self {
        match value {
            "DELIVERED" => Self::Delivered,
            "EXPIRED" => Self::Expired,
            "FAILED" => Self::Failed,
            "BUFFERED" => Self::Buffered,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known `err-code` values of a delivery receipt.
pub enum DeliveryErrorCode {
    Delivered,
    Unknown,
    AbsentSubscriberTemporary,
    AbsentSubscriberPermanent,
    CallBarredByUser,
    PortabilityError,
    AntiSpamRejection,
    HandsetBusy,
    NetworkError,
    IllegalNumber,
    InvalidMessage,
    Unroutable,
    GeneralError,
}

impl DeliveryErrorCode {
    /// Known code, or `None` outside 0-11 and 99.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Delivered,
            1 => Self::Unknown,
            2 => Self::AbsentSubscriberTemporary,
            3 => Self::AbsentSubscriberPermanent,
            4 => Self::CallBarredByUser,
            5 => Self::PortabilityError,
            6 => Self::AntiSpamRejection,
            7 => Self::HandsetBusy,
            8 => Self::NetworkError,
            9 => Self::IllegalNumber,
            10 => Self::InvalidMessage,
            11 => Self::Unroutable,
            99 => Self::GeneralError,
            _ => return None,
        })
    }

    /// Human-readable description, as listed in the Nexmo documentation.
    pub fn message(self) -> &'static str {
        match self {
            Self::Delivered => "Delivered",
            Self::Unknown => "Unknown",
            Self::AbsentSubscriberTemporary => "Absent Subscriber - Temporary",
            Self::AbsentSubscriberPermanent => "Absent Subscriber - Permanent",
            Self::CallBarredByUser => "Call barred by user",
            Self::PortabilityError => "Portability Error",
            Self::AntiSpamRejection => "Anti-Spam Rejection",
            Self::HandsetBusy => "Handset Busy",
            Self::NetworkError => "Network Error",
            Self::IllegalNumber => "Illegal Number",
            Self::InvalidMessage => "Invalid Message",
            Self::Unroutable => "Unroutable",
            Self::GeneralError => "General Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Delivery receipt (DLR) posted by Nexmo to the delivery callback URL.
pub struct DeliveryReceipt {
    username: Option<String>,
    password: Option<String>,
    to: Option<String>,
    network_code: String,
    message_id: String,
    msisdn: String,
    status: Option<String>,
    err_code: Option<String>,
    scts: Option<String>,
    client_ref: Option<String>,
}

impl DeliveryReceipt {
    /// Fields without which a delivery callback is ignored.
    pub const REQUIRED: [&'static str; 3] = ["msisdn", "network-code", "messageId"];

    /// Build a receipt when `msisdn`, `network-code` and `messageId` are all present.
    pub fn parse(params: &WebhookParams) -> Option<Self> {
        Some(Self {
            msisdn: params.owned("msisdn")?,
            network_code: params.owned("network-code")?,
            message_id: params.owned("messageId")?,
            username: params.owned("username"),
            password: params.owned("password"),
            to: params.owned("to"),
            status: params.owned("status"),
            err_code: params.owned("err-code"),
            scts: params.owned("scts"),
            client_ref: params.owned("client-ref"),
        })
    }

    /// Optional callback authentication username.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Optional callback authentication password.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Sender id of the original message (the receipt's `to` field).
    pub fn from(&self) -> Option<&str> {
        self.to.as_deref()
    }

    /// Number the message was delivered to (`msisdn`).
    pub fn to(&self) -> &str {
        &self.msisdn
    }

    /// Mobile network MCCMNC.
    pub fn network(&self) -> &str {
        &self.network_code
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Raw `status` field.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// `status` mapped to a [`DeliveryStatus`].
    pub fn status_kind(&self) -> Option<DeliveryStatus> {
        self.status.as_deref().map(DeliveryStatus::parse)
    }

    /// Raw `err-code` field.
    pub fn error_code(&self) -> Option<&str> {
        self.err_code.as_deref()
    }

    /// Human-readable error for `err-code`; empty when absent or unknown.
    ///
    /// A non-integer code such as `abc` is unknown, not read as `0` ("Delivered").
    pub fn error_message(&self) -> &'static str {
        self.err_code
            .as_deref()
            .and_then(|code| code.trim().parse::<i32>().ok())
            .and_then(DeliveryErrorCode::from_code)
            .map_or("", DeliveryErrorCode::message)
    }

    /// Time of the status change, from `scts`.
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        let scts = self.scts.as_deref()?;
        match NaiveDateTime::parse_from_str(scts.trim(), SCTS_FORMAT) {
            Ok(time) => Some(time.and_utc()),
            Err(err) => {
                tracing::debug!("nexmo delivery receipt: unparsable scts {scts:?}: {err}");
                None
            }
        }
    }

    /// Custom reference set on the send request (`client-ref`).
    pub fn client_ref(&self) -> Option<&str> {
        self.client_ref.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Inbound (mobile originated) message posted by Nexmo.
pub struct InboundMessage {
    message_type: Option<String>,
    username: Option<String>,
    password: Option<String>,
    to: String,
    msisdn: String,
    network_code: Option<String>,
    message_id: Option<String>,
    text: String,
    concat: Option<String>,
    concat_ref: Option<String>,
    concat_total: Option<String>,
    concat_part: Option<String>,
    data: Option<String>,
    udh: Option<String>,
}

impl InboundMessage {
    /// Fields without which an inbound callback is ignored.
    pub const REQUIRED: [&'static str; 3] = ["text", "msisdn", "to"];

    /// Build a message when `text`, `msisdn` and `to` are all present.
    pub fn parse(params: &WebhookParams) -> Option<Self> {
        Some(Self {
            text: params.owned("text")?,
            msisdn: params.owned("msisdn")?,
            to: params.owned("to")?,
            message_type: params.owned("type"),
            username: params.owned("username"),
            password: params.owned("password"),
            network_code: params.owned("network-code"),
            message_id: params.owned("messageId"),
            concat: params.owned("concat"),
            concat_ref: params.owned("concat-ref"),
            concat_total: params.owned("concat-total"),
            concat_part: params.owned("concat-part"),
            data: params.owned("data"),
            udh: params.owned("udh"),
        })
    }

    /// `text` or `binary`.
    pub fn message_type(&self) -> Option<&str> {
        self.message_type.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Recipient number (your virtual number).
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Sender number (`msisdn`).
    pub fn from(&self) -> &str {
        &self.msisdn
    }

    pub fn network(&self) -> Option<&str> {
        self.network_code.as_deref()
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hex encoded binary payload.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Hex encoded user data header.
    pub fn udh(&self) -> Option<&str> {
        self.udh.as_deref()
    }

    /// Whether this is one part of a multi-part message (`concat`).
    pub fn is_concatenated(&self) -> bool {
        matches!(
            self.concat.as_deref().map(str::trim),
            Some("true" | "1")
        )
    }

    /// Transaction reference shared by all parts of a concatenated message.
    pub fn concat_ref(&self) -> Option<&str> {
        self.concat_ref.as_deref()
    }

    /// Number of parts; 0 when absent or unparsable.
    pub fn concat_total(&self) -> u32 {
        parse_count(self.concat_total.as_deref())
    }

    /// Index of this part, starting at 1; 0 when absent or unparsable.
    pub fn concat_part(&self) -> u32 {
        parse_count(self.concat_part.as_deref())
    }
}

fn parse_count(value: Option<&str>) -> u32 {
    value
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> WebhookParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn merge_lets_post_win() {
        let merged = WebhookParams::merge(
            vec![
                ("msisdn".to_owned(), "1".to_owned()),
                ("to".to_owned(), "a".to_owned()),
            ],
            vec![("msisdn".to_owned(), "2".to_owned())],
        );
        assert_eq!(merged.get("msisdn"), Some("2"));
        assert_eq!(merged.get("to"), Some("a"));
    }

    #[test]
    fn from_encoded_decodes_query_and_form() {
        let merged = WebhookParams::from_encoded(
            "?msisdn=447700900001&text=hello+there",
            "text=caf%C3%A9&to=Acme",
        );
        assert_eq!(merged.get("msisdn"), Some("447700900001"));
        assert_eq!(merged.get("text"), Some("café"));
        assert_eq!(merged.get("to"), Some("Acme"));
    }

    #[test]
    fn delivery_receipt_parses_minimal_payload() {
        let receipt = DeliveryReceipt::parse(&params(&[
            ("msisdn", "123"),
            ("network-code", "234"),
            ("messageId", "abc"),
            ("status", "DELIVERED"),
        ]))
        .unwrap();

        assert_eq!(receipt.status(), Some("DELIVERED"));
        assert_eq!(receipt.status_kind(), Some(DeliveryStatus::Delivered));
        assert_eq!(receipt.error_code(), None);
        assert_eq!(receipt.error_message(), "");
        assert_eq!(receipt.to(), "123");
        assert_eq!(receipt.network(), "234");
        assert_eq!(receipt.message_id(), "abc");
        assert_eq!(receipt.received_at(), None);
    }

    #[test]
    fn delivery_receipt_requires_all_key_fields() {
        for missing in DeliveryReceipt::REQUIRED {
            let mut pairs = vec![
                ("msisdn", "123"),
                ("network-code", "234"),
                ("messageId", "abc"),
            ];
            pairs.retain(|(k, _)| *k != missing);
            assert!(DeliveryReceipt::parse(&params(&pairs)).is_none());
        }
    }

    #[test]
    fn delivery_receipt_exposes_optional_fields() {
        let receipt = DeliveryReceipt::parse(&params(&[
            ("msisdn", "447700900001"),
            ("network-code", "23410"),
            ("messageId", "0A0000000123ABCD1"),
            ("to", "Acme"),
            ("status", "FAILED"),
            ("err-code", "99"),
            ("scts", "1101181426"),
            ("client-ref", "order-7"),
        ]))
        .unwrap();

        assert_eq!(receipt.from(), Some("Acme"));
        assert_eq!(receipt.status_kind(), Some(DeliveryStatus::Failed));
        assert_eq!(receipt.error_message(), "General Error");
        assert_eq!(receipt.client_ref(), Some("order-7"));

        let at = receipt.received_at().unwrap();
        assert_eq!((at.year(), at.month(), at.day()), (2011, 1, 18));
        assert_eq!((at.hour(), at.minute(), at.second()), (14, 26, 0));
    }

    #[test]
    fn error_message_table_covers_sequential_and_sparse_codes() {
        assert_eq!(DeliveryErrorCode::from_code(0).unwrap().message(), "Delivered");
        assert_eq!(
            DeliveryErrorCode::from_code(7).unwrap().message(),
            "Handset Busy"
        );
        assert_eq!(
            DeliveryErrorCode::from_code(11).unwrap().message(),
            "Unroutable"
        );
        assert_eq!(DeliveryErrorCode::from_code(12), None);
        assert_eq!(DeliveryErrorCode::from_code(98), None);
    }

    #[test]
    fn unknown_error_codes_map_to_empty_message() {
        for code in ["42", "abc", ""] {
            let receipt = DeliveryReceipt::parse(&params(&[
                ("msisdn", "1"),
                ("network-code", "2"),
                ("messageId", "3"),
                ("err-code", code),
            ]))
            .unwrap();
            assert_eq!(receipt.error_message(), "");
        }
    }

    #[test]
    fn unparsable_scts_yields_no_timestamp() {
        let receipt = DeliveryReceipt::parse(&params(&[
            ("msisdn", "1"),
            ("network-code", "2"),
            ("messageId", "3"),
            ("scts", "yesterday"),
        ]))
        .unwrap();
        assert_eq!(receipt.received_at(), None);
    }

    #[test]
    fn inbound_message_requires_text_msisdn_and_to() {
        assert!(InboundMessage::parse(&params(&[("msisdn", "1"), ("to", "2")])).is_none());

        let message = InboundMessage::parse(&params(&[
            ("type", "text"),
            ("msisdn", "447700900001"),
            ("to", "447700900999"),
            ("text", "hi"),
            ("concat", "true"),
            ("concat-ref", "08B5"),
            ("concat-total", "3"),
            ("concat-part", "x"),
        ]))
        .unwrap();

        assert_eq!(message.from(), "447700900001");
        assert_eq!(message.to(), "447700900999");
        assert_eq!(message.text(), "hi");
        assert_eq!(message.message_type(), Some("text"));
        assert!(message.is_concatenated());
        assert_eq!(message.concat_ref(), Some("08B5"));
        assert_eq!(message.concat_total(), 3);
        assert_eq!(message.concat_part(), 0);
    }
}

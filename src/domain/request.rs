use std::collections::BTreeMap;

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    MessageEncoding, MessageId, MessageText, Msisdn, Originator, WapTitle, WapUrl, WapValidity,
};

/// Maximum number of ids accepted by `search/messages`.
pub const SEARCH_MESSAGES_MAX_IDS: usize = 10;

#[derive(Debug, Clone, Default)]
/// Optional settings of a text message.
pub struct TextOptions {
    /// Force (`Some(true)`) or forbid (`Some(false)`) unicode; `None` detects it from the text.
    pub unicode: Option<bool>,
    /// Reject a non-numeric `from` instead of normalizing it.
    pub require_numeric_sender: bool,
    /// Reference echoed back in the delivery receipt (`client-ref`).
    pub client_ref: Option<String>,
    /// Request (`true`) or suppress (`false`) a delivery receipt.
    pub status_report_req: Option<bool>,
    /// Delivery receipt URL overriding the account default.
    pub callback: Option<String>,
    /// Message lifetime in milliseconds.
    pub ttl_millis: Option<u64>,
    /// Additional raw parameters. Typed options and computed fields win on key collision.
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Text or unicode SMS ready to send.
pub struct SendText {
    to: Msisdn,
    from: Originator,
    text: MessageText,
    encoding: MessageEncoding,
    optional: Vec<(String, String)>,
}

impl SendText {
    /// Build a text message. `from` is normalized (see [`Originator`]) unless
    /// `options.require_numeric_sender` is set, in which case non-numeric senders fail.
    pub fn new(
        to: Msisdn,
        from: &str,
        text: MessageText,
        options: TextOptions,
    ) -> Result<Self, ValidationError> {
        let from = if options.require_numeric_sender {
            Originator::numeric(from)?
        } else {
            Originator::sanitize(from)
        };
        let encoding = MessageEncoding::classify(text.as_str(), options.unicode);

        let mut typed = Vec::new();
        if let Some(client_ref) = options.client_ref {
            typed.push(("client-ref".to_owned(), client_ref));
        }
        if let Some(status_report_req) = options.status_report_req {
            let flag = if status_report_req { "1" } else { "0" };
            typed.push(("status-report-req".to_owned(), flag.to_owned()));
        }
        if let Some(callback) = options.callback {
            typed.push(("callback".to_owned(), callback));
        }
        if let Some(ttl) = options.ttl_millis {
            typed.push(("ttl".to_owned(), ttl.to_string()));
        }

        // Typed options replace raw extras of the same name.
        let mut extra = options.extra;
        for (key, _) in &typed {
            extra.remove(key);
        }
        let mut optional = extra.into_iter().collect::<Vec<_>>();
        optional.extend(typed);

        Ok(Self {
            to,
            from,
            text,
            encoding,
            optional,
        })
    }

    pub fn to(&self) -> &Msisdn {
        &self.to
    }

    pub fn from(&self) -> &Originator {
        &self.from
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn encoding(&self) -> MessageEncoding {
        self.encoding
    }

    /// Optional parameters in wire order; computed fields are not included.
    pub fn optional(&self) -> &[(String, String)] {
        &self.optional
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Binary SMS with an optional user data header.
pub struct SendBinary {
    to: Msisdn,
    from: Originator,
    body: Vec<u8>,
    udh: Vec<u8>,
}

impl SendBinary {
    /// Build a binary message. `body` must not be empty.
    pub fn new(
        to: Msisdn,
        from: &str,
        body: Vec<u8>,
        udh: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        if body.is_empty() {
            return Err(ValidationError::Empty { field: "body" });
        }
        Ok(Self {
            to,
            from: Originator::sanitize(from),
            body,
            udh,
        })
    }

    pub fn to(&self) -> &Msisdn {
        &self.to
    }

    pub fn from(&self) -> &Originator {
        &self.from
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn udh(&self) -> &[u8] {
        &self.udh
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// WAP push message pointing the handset at a URL.
pub struct PushWap {
    to: Msisdn,
    from: Originator,
    title: WapTitle,
    url: WapUrl,
    validity: WapValidity,
}

impl PushWap {
    /// Build a WAP push that stays available for the default 48 hours.
    pub fn new(to: Msisdn, from: &str, title: WapTitle, url: WapUrl) -> Self {
        Self {
            to,
            from: Originator::sanitize(from),
            title,
            url,
            validity: WapValidity::default(),
        }
    }

    /// Override the default validity of 48 hours.
    pub fn with_validity(mut self, validity: WapValidity) -> Self {
        self.validity = validity;
        self
    }

    pub fn to(&self) -> &Msisdn {
        &self.to
    }

    pub fn from(&self) -> &Originator {
        &self.from
    }

    pub fn title(&self) -> &WapTitle {
        &self.title
    }

    pub fn url(&self) -> &WapUrl {
        &self.url
    }

    pub fn validity(&self) -> WapValidity {
        self.validity
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ids for `search/messages`.
///
/// Invariant: `1..=SEARCH_MESSAGES_MAX_IDS` ids.
pub struct MessageIds(Vec<MessageId>);

impl MessageIds {
    /// Accept between one and [`SEARCH_MESSAGES_MAX_IDS`] ids.
    pub fn new(ids: Vec<MessageId>) -> Result<Self, ValidationError> {
        if ids.is_empty() {
            return Err(ValidationError::Empty { field: "ids" });
        }
        if ids.len() > SEARCH_MESSAGES_MAX_IDS {
            return Err(ValidationError::TooManyMessageIds {
                max: SEARCH_MESSAGES_MAX_IDS,
                actual: ids.len(),
            });
        }
        Ok(Self(ids))
    }

    pub fn as_slice(&self) -> &[MessageId] {
        &self.0
    }
}

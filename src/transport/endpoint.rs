pub const DEFAULT_BASE_URL: &str = "https://rest.nexmo.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiCommand {
    pub method: Method,
    pub path: &'static str,
}

pub const SEND_SMS: ApiCommand = ApiCommand {
    method: Method::Post,
    path: "sms/{format}",
};
pub const GET_BALANCE: ApiCommand = ApiCommand {
    method: Method::Get,
    path: "account/get-balance/{k}/{s}",
};
pub const GET_PRICING: ApiCommand = ApiCommand {
    method: Method::Get,
    path: "account/get-pricing/outbound/{k}/{s}/{country-code}",
};
pub const GET_OWN_NUMBERS: ApiCommand = ApiCommand {
    method: Method::Get,
    path: "account/numbers/{k}/{s}",
};
pub const SEARCH_NUMBERS: ApiCommand = ApiCommand {
    method: Method::Get,
    path: "number/search/{k}/{s}/{country-code}",
};
pub const BUY_NUMBER: ApiCommand = ApiCommand {
    method: Method::Post,
    path: "number/buy/{k}/{s}/{country-code}/{msisdn}",
};
pub const CANCEL_NUMBER: ApiCommand = ApiCommand {
    method: Method::Post,
    path: "number/cancel/{k}/{s}/{country-code}/{msisdn}",
};
pub const SEARCH_MESSAGE: ApiCommand = ApiCommand {
    method: Method::Get,
    path: "search/message/{k}/{s}/{message-id}",
};
pub const SEARCH_MESSAGES: ApiCommand = ApiCommand {
    method: Method::Get,
    path: "search/messages/{k}/{s}",
};

/// Replace each `{placeholder}` token in `template` with its value.
///
/// Tokens without a replacement are left untouched.
pub fn expand_template(template: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(template.to_owned(), |acc, (token, value)| {
            acc.replace(*token, value)
        })
}

/// Join a base URL and an expanded command path with exactly one `/`.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

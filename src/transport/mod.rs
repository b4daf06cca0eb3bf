//! Transport layer: URL templates and wire-format details (form encoding, decoding).

mod endpoint;
mod send_response;
mod sms;

pub use endpoint::{
    ApiCommand, BUY_NUMBER, CANCEL_NUMBER, DEFAULT_BASE_URL, GET_BALANCE, GET_OWN_NUMBERS,
    GET_PRICING, Method, SEARCH_MESSAGE, SEARCH_MESSAGES, SEARCH_NUMBERS, SEND_SMS,
    expand_template, join_url,
};
pub use send_response::decode_send_json_response;
pub use sms::{encode_push_wap_form, encode_send_binary_form, encode_send_text_form, merge_params};

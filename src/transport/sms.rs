use crate::domain::{
    MessageText, Msisdn, Originator, PushWap, SendBinary, SendText, WapTitle, WapUrl, WapValidity,
};

/// Overlay `computed` onto `params`.
///
/// A key already present keeps its position and takes the computed value; new keys are
/// appended in order.
pub fn merge_params(params: &mut Vec<(String, String)>, computed: Vec<(String, String)>) {
    for (key, value) in computed {
        match params.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => params.push((key, value)),
        }
    }
}

pub fn encode_send_text_form(request: &SendText) -> Vec<(String, String)> {
    let mut params = request.optional().to_vec();
    merge_params(
        &mut params,
        vec![
            (
                Originator::FIELD.to_owned(),
                request.from().as_str().to_owned(),
            ),
            (Msisdn::FIELD.to_owned(), request.to().raw().to_owned()),
            (
                MessageText::FIELD.to_owned(),
                request.text().as_str().to_owned(),
            ),
            ("type".to_owned(), request.encoding().as_str().to_owned()),
        ],
    );
    params
}

pub fn encode_send_binary_form(request: &SendBinary) -> Vec<(String, String)> {
    vec![
        (
            Originator::FIELD.to_owned(),
            request.from().as_str().to_owned(),
        ),
        (Msisdn::FIELD.to_owned(), request.to().raw().to_owned()),
        ("type".to_owned(), "binary".to_owned()),
        ("body".to_owned(), hex::encode(request.body())),
        ("udh".to_owned(), hex::encode(request.udh())),
    ]
}

pub fn encode_push_wap_form(request: &PushWap) -> Vec<(String, String)> {
    vec![
        (
            Originator::FIELD.to_owned(),
            request.from().as_str().to_owned(),
        ),
        (Msisdn::FIELD.to_owned(), request.to().raw().to_owned()),
        ("type".to_owned(), "wappush".to_owned()),
        (WapUrl::FIELD.to_owned(), request.url().as_str().to_owned()),
        (
            WapTitle::FIELD.to_owned(),
            request.title().as_str().to_owned(),
        ),
        (
            WapValidity::FIELD.to_owned(),
            request.validity().as_millis().to_string(),
        ),
    ]
}

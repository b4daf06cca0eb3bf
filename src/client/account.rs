//! Account, number management and message search calls.

use chrono::NaiveDate;

use super::NexmoClient;
use crate::cache::CacheKey;
use crate::domain::{CountryCode, MessageId, MessageIds, Msisdn};
use crate::transport::{
    ApiCommand, BUY_NUMBER, CANCEL_NUMBER, GET_BALANCE, GET_OWN_NUMBERS, GET_PRICING,
    SEARCH_MESSAGE, SEARCH_MESSAGES, SEARCH_NUMBERS,
};

impl NexmoClient {
    /// Retrieve the account balance.
    pub async fn get_balance(&self) -> Option<String> {
        self.fetch(GET_BALANCE, &[], Vec::new()).await
    }

    /// Outbound SMS pricing for a country. Successful answers are cached.
    pub async fn get_sms_pricing(&self, country: &CountryCode) -> Option<String> {
        let key = CacheKey::Pricing(country.clone());
        if let Some(body) = self.cached(&key) {
            return Some(body);
        }
        let body = self
            .fetch(
                GET_PRICING,
                &[("{country-code}", country.as_str())],
                Vec::new(),
            )
            .await;
        self.remember(key, body)
    }

    /// Inbound numbers owned by the account.
    pub async fn get_own_numbers(&self) -> Option<String> {
        self.fetch(GET_OWN_NUMBERS, &[], Vec::new()).await
    }

    /// Available inbound numbers in a country matching `pattern`. Successful answers are cached.
    pub async fn search_numbers(&self, country: &CountryCode, pattern: &str) -> Option<String> {
        let key = CacheKey::NumberSearch {
            country: country.clone(),
            pattern: pattern.to_owned(),
        };
        if let Some(body) = self.cached(&key) {
            return Some(body);
        }
        let body = self
            .fetch(
                SEARCH_NUMBERS,
                &[("{country-code}", country.as_str())],
                vec![("pattern".to_owned(), pattern.to_owned())],
            )
            .await;
        self.remember(key, body)
    }

    /// Purchase an inbound number. `true` only on HTTP 200.
    pub async fn buy_number(&self, country: &CountryCode, msisdn: &Msisdn) -> bool {
        self.number_command(BUY_NUMBER, country, msisdn).await
    }

    /// Cancel an inbound number subscription. `true` only on HTTP 200.
    pub async fn cancel_number(&self, country: &CountryCode, msisdn: &Msisdn) -> bool {
        self.number_command(CANCEL_NUMBER, country, msisdn).await
    }

    /// Look up a sent message by id. Successful answers are cached.
    ///
    /// Messages become searchable a few minutes after submission; use delivery
    /// receipts for real-time status.
    pub async fn search_message(&self, id: &MessageId) -> Option<String> {
        let key = CacheKey::Message(id.clone());
        if let Some(body) = self.cached(&key) {
            return Some(body);
        }
        let body = self
            .fetch(SEARCH_MESSAGE, &[("{message-id}", id.as_str())], Vec::new())
            .await;
        self.remember(key, body)
    }

    /// Look up up to ten sent messages by id.
    pub async fn search_messages_by_ids(&self, ids: &MessageIds) -> Option<String> {
        let params = ids
            .as_slice()
            .iter()
            .map(|id| ("ids".to_owned(), id.as_str().to_owned()))
            .collect();
        self.fetch(SEARCH_MESSAGES, &[], params).await
    }

    /// Messages sent to `to` on `date`.
    pub async fn search_messages_by_date(&self, date: NaiveDate, to: &Msisdn) -> Option<String> {
        let params = vec![
            ("date".to_owned(), date.format("%Y-%m-%d").to_string()),
            ("to".to_owned(), to.raw().to_owned()),
        ];
        self.fetch(SEARCH_MESSAGES, &[], params).await
    }

    async fn number_command(
        &self,
        command: ApiCommand,
        country: &CountryCode,
        msisdn: &Msisdn,
    ) -> bool {
        let tokens = [
            ("{country-code}", country.as_str()),
            ("{msisdn}", msisdn.raw()),
        ];
        match self.call(command, &tokens, Vec::new()).await {
            Some(response) if response.status == 200 => true,
            Some(response) => {
                tracing::warn!(
                    "nexmo request {} returned HTTP {}",
                    command.path,
                    response.status
                );
                false
            }
            None => false,
        }
    }

    fn cached(&self, key: &CacheKey) -> Option<String> {
        let body = self.cache.get(key)?;
        tracing::debug!("nexmo cache hit: {key:?}");
        Some(body)
    }

    fn remember(&self, key: CacheKey, body: Option<String>) -> Option<String> {
        if let Some(body) = body.as_ref() {
            self.cache.insert(key, body.clone());
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::TtlCache;
    use crate::domain::ValidationError;
    use crate::transport::Method;

    use super::super::fake::{FakeTransport, assert_param, make_client, make_client_with_cache};
    use super::*;

    fn country(code: &str) -> CountryCode {
        CountryCode::new(code).unwrap()
    }

    #[tokio::test]
    async fn get_balance_uses_credentials_in_path_and_query() {
        let transport = FakeTransport::new(200, r#"{"value":3.14}"#);
        let client = make_client(transport.clone());

        assert_eq!(
            client.get_balance().await.as_deref(),
            Some(r#"{"value":3.14}"#)
        );

        let sent = transport.last_request();
        assert_eq!(sent.method, Method::Get);
        assert_eq!(
            sent.url,
            "https://example.invalid/account/get-balance/key/secret"
        );
        assert_param(&sent.params, "username", "key");
        assert_param(&sent.params, "password", "secret");
    }

    #[tokio::test]
    async fn get_sms_pricing_is_cached_per_country() {
        let transport = FakeTransport::new(200, "pricing");
        let client = make_client_with_cache(transport.clone(), TtlCache::default());

        assert_eq!(client.get_sms_pricing(&country("es")).await.as_deref(), Some("pricing"));
        assert_eq!(client.get_sms_pricing(&country("ES")).await.as_deref(), Some("pricing"));
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/account/get-pricing/outbound/key/secret/ES"
        );

        client.get_sms_pricing(&country("GB")).await;
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn failed_lookups_are_not_cached() {
        let transport = FakeTransport::new(503, "busy");
        let client = make_client_with_cache(transport.clone(), TtlCache::default());
        let id = MessageId::new("00A0B0C0").unwrap();

        assert_eq!(client.search_message(&id).await, None);
        assert_eq!(client.search_message(&id).await, None);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/search/message/key/secret/00A0B0C0"
        );
    }

    #[tokio::test]
    async fn search_numbers_sends_pattern_and_caches_per_pattern() {
        let transport = FakeTransport::new(200, "numbers");
        let client = make_client_with_cache(transport.clone(), TtlCache::default());

        client.search_numbers(&country("es"), "3491").await;
        client.search_numbers(&country("ES"), "3491").await;
        client.search_numbers(&country("ES"), "3493").await;
        assert_eq!(transport.requests().len(), 2);

        let sent = transport.last_request();
        assert_eq!(sent.url, "https://example.invalid/number/search/key/secret/ES");
        assert_param(&sent.params, "pattern", "3493");
    }

    #[tokio::test]
    async fn buy_number_is_true_only_on_200() {
        let msisdn = Msisdn::new("34911067000").unwrap();

        let transport = FakeTransport::new(200, "");
        let client = make_client(transport.clone());
        assert!(client.buy_number(&country("es"), &msisdn).await);
        let sent = transport.last_request();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(
            sent.url,
            "https://example.invalid/number/buy/key/secret/ES/34911067000"
        );

        let client = make_client(FakeTransport::new(201, ""));
        assert!(!client.buy_number(&country("es"), &msisdn).await);

        let client = make_client(FakeTransport::failing());
        assert!(!client.buy_number(&country("es"), &msisdn).await);
    }

    #[tokio::test]
    async fn cancel_number_uses_cancel_path() {
        let transport = FakeTransport::new(420, "");
        let client = make_client(transport.clone());
        let msisdn = Msisdn::new("34911067000").unwrap();

        assert!(!client.cancel_number(&country("ES"), &msisdn).await);
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/number/cancel/key/secret/ES/34911067000"
        );
    }

    #[tokio::test]
    async fn search_messages_by_ids_repeats_param() -> Result<(), ValidationError> {
        let transport = FakeTransport::new(200, "messages");
        let client = make_client(transport.clone());
        let ids = MessageIds::new(vec![MessageId::new("00A0B0C0")?, MessageId::new("00A0B0C1")?])?;

        assert_eq!(
            client.search_messages_by_ids(&ids).await.as_deref(),
            Some("messages")
        );

        let sent = transport.last_request();
        assert_eq!(sent.url, "https://example.invalid/search/messages/key/secret");
        let ids: Vec<_> = sent
            .params
            .iter()
            .filter(|(k, _)| k == "ids")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(ids, vec!["00A0B0C0", "00A0B0C1"]);
        Ok(())
    }

    #[tokio::test]
    async fn search_messages_by_date_formats_date() {
        let transport = FakeTransport::new(200, "messages");
        let client = make_client(transport.clone());
        let date = NaiveDate::from_ymd_opt(2011, 11, 5).unwrap();

        client
            .search_messages_by_date(date, &Msisdn::new("1234567890").unwrap())
            .await;

        let sent = transport.last_request();
        assert_param(&sent.params, "date", "2011-11-05");
        assert_param(&sent.params, "to", "1234567890");
    }
}

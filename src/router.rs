//! Turns one line of user input into one reply.
//!
//! The router owns the capability handlers but not the conversation: the
//! caller passes the [`ConversationStore`] in on every turn and records the
//! exchange afterwards.

use anyhow::{bail, Result};
use log::debug;
use std::sync::Arc;

use crate::ai::{ChatClient, SMALL_TALK_REPLIES};
use crate::config::{Credentials, Settings};
use crate::context::{ConversationStore, MAX_CONTEXT_WINDOW};
use crate::intent::{Intent, IntentClassifier};
use crate::services::{calculator, clock, extract_city, WeatherClient};
use crate::utils::{choose, RandomSource, ThreadRandom};

pub struct Router {
    classifier: IntentClassifier,
    weather: WeatherClient,
    chat: ChatClient,
    random: Arc<dyn RandomSource>,
    default_city: String,
    context_window: usize,
}

impl Router {
    pub fn new(settings: &Settings, credentials: Credentials) -> Result<Self> {
        Self::with_random(settings, credentials, Arc::new(ThreadRandom))
    }

    /// Builds a router whose canned replies are picked by `random`.
    pub fn with_random(
        settings: &Settings,
        credentials: Credentials,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self> {
        let context_window = settings.conversation.context_window;
        if context_window > MAX_CONTEXT_WINDOW {
            bail!(
                "conversation.context_window is {context_window}, at most {MAX_CONTEXT_WINDOW} exchanges may be replayed"
            );
        }

        let weather = WeatherClient::new(settings, credentials.weather_api_key)?;
        let chat = ChatClient::new(settings, credentials.openai_api_key, random.clone())?;
        debug!(
            "Weather lookup configured: {}, AI chat configured: {}",
            weather.is_configured(),
            chat.is_configured()
        );

        Ok(Self {
            classifier: IntentClassifier::new(),
            weather,
            chat,
            random,
            default_city: settings.providers.default_city.clone(),
            context_window,
        })
    }

    pub async fn get_response(&self, user_input: &str, conversation: &ConversationStore) -> String {
        let intent = self.classifier.classify(user_input);
        debug!("Routing input as {intent}");

        match intent {
            Intent::Weather => {
                let city = extract_city(user_input, &self.default_city);
                self.weather.get_weather(city).await
            }
            Intent::Time => clock::get_current_time(),
            Intent::Calculation => calculator::evaluate(user_input),
            Intent::AiChat => self.chat_with_context(user_input, conversation).await,
            Intent::GeneralChat if self.chat.is_configured() => {
                self.chat_with_context(user_input, conversation).await
            }
            Intent::GeneralChat => choose(self.random.as_ref(), SMALL_TALK_REPLIES).to_string(),
        }
    }

    async fn chat_with_context(&self, user_input: &str, conversation: &ConversationStore) -> String {
        self.chat
            .chat(user_input, conversation.recent(self.context_window))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MISSING_KEY_REPLIES;
    use crate::services::calculator::GUIDANCE_MESSAGE;
    use crate::services::weather::MISSING_KEY_MESSAGE;
    use crate::utils::SequenceRandom;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn offline_router(random: Arc<dyn RandomSource>) -> Router {
        Router::with_random(&Settings::default(), Credentials::default(), random).unwrap()
    }

    #[test]
    fn test_weather_without_key() {
        let router = offline_router(Arc::new(ThreadRandom));
        let reply = tokio_test::block_on(
            router.get_response("weather in Paris", &ConversationStore::new()),
        );
        assert_eq!(reply, MISSING_KEY_MESSAGE);
    }

    #[test]
    fn test_time_and_calculation() {
        let router = offline_router(Arc::new(ThreadRandom));
        let store = ConversationStore::new();

        let time = tokio_test::block_on(router.get_response("what time is it", &store));
        assert!(time.starts_with("Current time: "));

        let answer = tokio_test::block_on(router.get_response("calculate 2 + 2", &store));
        assert_eq!(answer, "Answer: 4");

        let rejected = tokio_test::block_on(router.get_response("calculate 2 + 2; rm -rf", &store));
        assert_eq!(rejected, GUIDANCE_MESSAGE);
    }

    #[test]
    fn test_small_talk_is_injectable() {
        let router = offline_router(Arc::new(SequenceRandom::new(vec![0, 3])));
        let store = ConversationStore::new();

        assert_eq!(
            tokio_test::block_on(router.get_response("hello", &store)),
            "Tell me more!"
        );
        assert_eq!(
            tokio_test::block_on(router.get_response("hello again", &store)),
            "I like where this is going."
        );
    }

    #[test]
    fn test_ai_chat_without_key() {
        let router = offline_router(Arc::new(SequenceRandom::new(vec![2])));
        let reply =
            tokio_test::block_on(router.get_response("tell me a story", &ConversationStore::new()));
        assert_eq!(reply, MISSING_KEY_REPLIES[2]);
    }

    #[test]
    fn test_never_fails_on_odd_input() {
        let router = offline_router(Arc::new(ThreadRandom));
        let store = ConversationStore::new();
        let long = "weather ".repeat(10_000) + "in";
        let nested = format!("calculate {}1{}", "(".repeat(5_000), ")".repeat(5_000));

        for input in ["", "   ", "?!.,;", "in", "calculate", long.as_str(), nested.as_str(), "ünïcödé ☃"] {
            let reply = tokio_test::block_on(router.get_response(input, &store));
            assert!(!reply.is_empty(), "empty reply for {input:?}");
        }
    }

    #[test]
    fn test_oversized_context_window_rejected() {
        let mut settings = Settings::default();
        settings.conversation.context_window = 10;
        let err = Router::new(&settings, Credentials::default()).err().unwrap();
        assert!(err.to_string().contains("context_window"));

        settings.conversation.context_window = MAX_CONTEXT_WINDOW;
        assert!(Router::new(&settings, Credentials::default()).is_ok());
    }

    #[tokio::test]
    async fn test_smaller_context_window_limits_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let mut settings = Settings::default();
        settings.providers.ai_url = format!("{}/v1/chat/completions", server.uri());
        settings.conversation.context_window = 1;
        let credentials = Credentials {
            openai_api_key: Some("sk-test".to_string()),
            weather_api_key: None,
        };
        let router = Router::new(&settings, credentials).unwrap();

        let mut store = ConversationStore::new();
        for turn in 1..=8 {
            store.record(&format!("message {turn}"), "ok");
        }
        assert_eq!(router.get_response("hello", &store).await, "ok");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2 + 2);
        assert_eq!(messages[1]["content"], "message 8");
    }

    #[tokio::test]
    async fn test_context_window_passed_to_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let mut settings = Settings::default();
        settings.providers.ai_url = format!("{}/v1/chat/completions", server.uri());
        let credentials = Credentials {
            openai_api_key: Some("sk-test".to_string()),
            weather_api_key: None,
        };
        let router = Router::new(&settings, credentials).unwrap();

        let mut store = ConversationStore::new();
        for turn in 1..=5 {
            let input = format!("message {turn}");
            let reply = router.get_response(&input, &store).await;
            assert_eq!(reply, "ok");
            store.record(&input, &reply);
        }

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 5);

        for (turn, request) in requests.iter().enumerate() {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            let messages = body["messages"].as_array().unwrap();
            let expected_history = turn.min(3);
            assert_eq!(messages.len(), 2 + expected_history * 2);

            // History replays oldest first and ends right before this turn
            for (i, pair) in messages[1..messages.len() - 1].chunks(2).enumerate() {
                let past_turn = turn - expected_history + i + 1;
                assert_eq!(pair[0]["content"], format!("message {past_turn}"));
                assert_eq!(pair[1]["role"], "assistant");
            }
            assert_eq!(
                messages.last().unwrap()["content"],
                format!("message {}", turn + 1)
            );
        }
    }
}

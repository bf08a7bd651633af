use super::params::{build_request, CompletionParams};
use crate::client::Transport;
use crate::types::openrouter::ChatCompletionResponse;
use crate::types::{Result, ToolError};

/// Send `prompt` to `model` and return the text of the first choice.
pub async fn get_model_response<T>(
    transport: &T,
    model: &str,
    prompt: &str,
    api_key: &str,
    params: &CompletionParams,
) -> Result<String>
where
    T: Transport + ?Sized,
{
    tracing::debug!(model = %model, "Getting response");

    let request = build_request(model, prompt, params)?;
    let response = transport.complete(api_key, &request).await?;
    let text = first_choice_text(response)?;

    tracing::debug!(model = %model, chars = text.chars().count(), "Raw response length");

    Ok(text)
}

fn first_choice_text(response: ChatCompletionResponse) -> Result<String> {
    if let Some(error) = response.error {
        return Err(ToolError::Upstream {
            status: error.code.unwrap_or(502),
            message: error.message,
        });
    }

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ToolError::MalformedResponse("response contained no choices".to_string()))?;

    choice.message.content.ok_or_else(|| {
        ToolError::MalformedResponse("first choice has no text content".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::openrouter::{ChatCompletionRequest, ProviderSort};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replies with a fixed body and remembers the last request.
    struct StubTransport {
        body: serde_json::Value,
        seen: Mutex<Option<ChatCompletionRequest>>,
    }

    impl StubTransport {
        fn new(body: serde_json::Value) -> Self {
            Self {
                body,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn complete(
            &self,
            _api_key: &str,
            request: &ChatCompletionRequest,
        ) -> Result<ChatCompletionResponse> {
            *self.seen.lock().unwrap() = Some(request.clone());
            Ok(serde_json::from_value(self.body.clone())?)
        }
    }

    #[tokio::test]
    async fn test_returns_first_choice() {
        let transport = StubTransport::new(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "4"}},
                {"message": {"role": "assistant", "content": "four"}}
            ]
        }));

        let text = get_model_response(&transport, "m", "2+2?", "k", &CompletionParams::default())
            .await
            .unwrap();
        assert_eq!(text, "4");

        let seen = transport.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.model, "m");
        assert_eq!(seen.messages.len(), 1);
        assert_eq!(seen.messages[0].content, "2+2?");
    }

    #[tokio::test]
    async fn test_forwards_provider_preferences() {
        let transport = StubTransport::new(json!({
            "choices": [{"message": {"content": "ok"}}]
        }));
        let params = CompletionParams {
            sort: Some(ProviderSort::Price),
            ..Default::default()
        };

        get_model_response(&transport, "m", "hi", "k", &params)
            .await
            .unwrap();

        let seen = transport.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.provider.unwrap().sort, Some(ProviderSort::Price));
    }

    #[tokio::test]
    async fn test_no_choices_is_malformed() {
        let transport = StubTransport::new(json!({"choices": []}));
        let result =
            get_model_response(&transport, "m", "hi", "k", &CompletionParams::default()).await;
        assert!(matches!(result, Err(ToolError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_null_content_is_malformed() {
        let transport = StubTransport::new(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }));
        let result =
            get_model_response(&transport, "m", "hi", "k", &CompletionParams::default()).await;
        assert!(matches!(result, Err(ToolError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_empty_content_is_returned_as_is() {
        let transport = StubTransport::new(json!({
            "choices": [{"message": {"role": "assistant", "content": ""}}]
        }));
        let text = get_model_response(&transport, "m", "hi", "k", &CompletionParams::default())
            .await
            .unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_embedded_error_becomes_upstream() {
        let transport = StubTransport::new(json!({
            "error": {"code": 503, "message": "No endpoints available"}
        }));
        let result =
            get_model_response(&transport, "m", "hi", "k", &CompletionParams::default()).await;

        match result {
            Err(ToolError::Upstream { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "No endpoints available");
            }
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }
}

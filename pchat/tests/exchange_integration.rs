use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pchat::NO_CONTENT_PLACEHOLDER;
use pchat::prelude::*;
use pcommon::BoxFuture;
use pprovider::{
    ChatTransport, Endpoint, ProviderError, RequestBody, ResponseBody, ResponseChoice,
    ResponseMessage,
};

#[derive(Debug, Default)]
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<ResponseBody, ProviderError>>>,
    requests: Mutex<Vec<RequestBody>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<ResponseBody, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<RequestBody> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl ChatTransport for ScriptedTransport {
    fn complete<'a>(
        &'a self,
        _endpoint: Endpoint<'a>,
        request: RequestBody,
    ) -> BoxFuture<'a, Result<ResponseBody, ProviderError>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);
            self.script
                .lock()
                .expect("script lock")
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::transport("script exhausted")))
        })
    }
}

fn reply(content: Option<&str>) -> ResponseBody {
    ResponseBody {
        choices: Some(vec![ResponseChoice {
            message: Some(ResponseMessage {
                content: content.map(str::to_string),
            }),
        }]),
        usage: None,
    }
}

fn settings() -> Settings {
    Settings::builder()
        .api_key("xai-integration")
        .model("grok-3-mini")
        .system_prompt("be brief")
        .build()
        .expect("settings should build")
}

#[tokio::test]
async fn transcript_grows_by_one_or_two_turns_per_exchange() {
    let transport = ScriptedTransport::new(vec![
        Ok(reply(Some("one"))),
        Err(ProviderError::api(503, "overloaded")),
        Ok(reply(None)),
        Err(ProviderError::parse("no choices returned")),
        Ok(reply(Some("five"))),
    ]);
    let mut session = ChatSession::new(
        "integration",
        settings(),
        ChatExchanger::new(transport.clone()),
    );

    let mut expected_len = 0;
    for (index, text) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
        let before = session.turns().len();
        let outcome = session.send(text).await;
        let growth = session.turns().len() - before;
        let system_growth = usize::from(index == 0);

        match outcome {
            Ok(_) => assert_eq!(growth, system_growth + 2),
            Err(_) => assert_eq!(growth, system_growth + 1),
        }
        expected_len += growth;
    }

    assert_eq!(session.turns().len(), expected_len);
    assert_eq!(session.turns()[0], Turn::system("be brief"));
    assert_eq!(
        session
            .turns()
            .iter()
            .filter(|turn| turn.role == Role::System)
            .count(),
        1
    );
    assert_eq!(session.turns()[5], Turn::assistant(NO_CONTENT_PLACEHOLDER));

    let requests = transport.requests();
    assert_eq!(requests.len(), 5);
    for (sent, earlier) in requests.iter().skip(1).zip(requests.iter()) {
        assert!(sent.messages.len() > earlier.messages.len());
        assert_eq!(sent.messages[..earlier.messages.len()], earlier.messages[..]);
        assert_eq!(sent.model, "grok-3-mini");
    }
}

#[tokio::test]
async fn session_reset_starts_a_fresh_transcript() {
    let transport = ScriptedTransport::new(vec![
        Ok(reply(Some("before"))),
        Ok(reply(Some("after"))),
    ]);
    let mut session = ChatSession::new(
        SessionId::new("reset"),
        settings(),
        ChatExchanger::new(transport.clone()),
    );

    session.send("first").await.expect("exchange should succeed");
    assert_eq!(session.turns().len(), 3);

    session.reset();
    assert!(session.store().is_empty());

    let reply = session
        .send("second")
        .await
        .expect("exchange should succeed");
    assert_eq!(reply, "after");

    let last_request = transport.requests().pop().expect("request recorded");
    let sent = last_request
        .messages
        .iter()
        .map(|message| message.content.as_str())
        .collect::<Vec<_>>();
    assert_eq!(sent, vec!["be brief", "second"]);
    assert_eq!(session.id().as_str(), "reset");
    assert_eq!(session.model(), "grok-3-mini");
}

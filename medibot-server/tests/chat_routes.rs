use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use medibot_rag::{
    AnswerPipeline, Chunk, EmbeddingProvider, GenerationSettings, InMemoryVectorStore,
    LanguageModel, Prompt, RagError,
};
use medibot_server::{AppState, app_router};

const DIM: usize = 3;
const ANSWER: &str = "Paracetamol is used to reduce pain and fever.";

struct FixedEmbedder;

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, _text: &str) -> medibot_rag::Result<Vec<f32>> {
        Ok(vec![1.0, 0.0, 0.0])
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

#[derive(Default)]
struct StubModel {
    questions: Mutex<Vec<String>>,
    contexts: Mutex<Vec<String>>,
}

#[async_trait]
impl LanguageModel for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, prompt: &Prompt, _settings: &GenerationSettings) -> medibot_rag::Result<String> {
        self.questions.lock().unwrap().push(prompt.question.clone());
        self.contexts.lock().unwrap().push(prompt.context.clone());
        Ok(ANSWER.to_string())
    }
}

struct UnavailableModel;

#[async_trait]
impl LanguageModel for UnavailableModel {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn complete(&self, _prompt: &Prompt, _settings: &GenerationSettings) -> medibot_rag::Result<String> {
        Err(RagError::LlmError { provider: "stub".into(), message: "upstream returned 503".into() })
    }
}

async fn seeded_store() -> Arc<InMemoryVectorStore> {
    let store = Arc::new(InMemoryVectorStore::new(DIM));
    store
        .upsert(&[Chunk {
            id: "paracetamol".into(),
            text: "Paracetamol (acetaminophen) is an analgesic and antipyretic.".into(),
            embedding: vec![1.0, 0.0, 0.0],
            metadata: HashMap::new(),
        }])
        .await
        .unwrap();
    store
}

fn state_with(store: Arc<InMemoryVectorStore>, model: Arc<dyn LanguageModel>) -> AppState {
    let pipeline = AnswerPipeline::builder()
        .embedding_provider(Arc::new(FixedEmbedder))
        .vector_store(store)
        .language_model(model)
        .build()
        .expect("pipeline");
    AppState::new(pipeline)
}

async fn spawn_server(state: AppState) -> (String, tokio::task::JoinHandle<()>) {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn index_serves_chat_page() {
    let model = Arc::new(StubModel::default());
    let (base, handle) = spawn_server(state_with(seeded_store().await, model)).await;

    let response = reqwest::get(format!("{}/", base)).await.expect("index response");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "unexpected content type: {content_type}");

    let body = response.text().await.expect("index body");
    assert!(body.contains("<title>Medical Chatbot</title>"));
    assert!(body.contains("id=\"messageArea\""));

    handle.abort();
}

#[tokio::test]
async fn post_get_returns_plain_answer() {
    let model = Arc::new(StubModel::default());
    let (base, handle) = spawn_server(state_with(seeded_store().await, model.clone())).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/get", base))
        .form(&[("msg", "What is paracetamol used for?")])
        .send()
        .await
        .expect("chat response");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "unexpected content type: {content_type}");
    assert_eq!(response.text().await.unwrap(), ANSWER);

    assert_eq!(model.questions.lock().unwrap().as_slice(), ["What is paracetamol used for?"]);
    assert_eq!(
        model.contexts.lock().unwrap().as_slice(),
        ["Paracetamol (acetaminophen) is an analgesic and antipyretic."]
    );

    handle.abort();
}

#[tokio::test]
async fn get_with_query_string_is_accepted() {
    let model = Arc::new(StubModel::default());
    let (base, handle) = spawn_server(state_with(seeded_store().await, model.clone())).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/get", base))
        .query(&[("msg", "fever?")])
        .send()
        .await
        .expect("chat response");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), ANSWER);
    assert_eq!(model.questions.lock().unwrap().as_slice(), ["fever?"]);

    handle.abort();
}

#[tokio::test]
async fn missing_msg_is_rejected_before_the_pipeline() {
    let model = Arc::new(StubModel::default());
    let (base, handle) = spawn_server(state_with(seeded_store().await, model.clone())).await;
    let client = reqwest::Client::new();

    let without_field = client
        .post(format!("{}/get", base))
        .form(&[("message", "wrong field name")])
        .send()
        .await
        .expect("chat response");
    assert_eq!(without_field.status(), reqwest::StatusCode::BAD_REQUEST);

    let without_body = client.post(format!("{}/get", base)).send().await.expect("chat response");
    assert!(without_body.status().is_client_error());

    let bare_get = client.get(format!("{}/get", base)).send().await.expect("chat response");
    assert_eq!(bare_get.status(), reqwest::StatusCode::BAD_REQUEST);

    assert!(model.questions.lock().unwrap().is_empty());

    handle.abort();
}

const BOUNDARY: &str = "medibot-boundary";

fn multipart_body(name: &str, value: &str) -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n--{BOUNDARY}--\r\n"
    )
}

#[tokio::test]
async fn multipart_form_is_accepted() {
    let model = Arc::new(StubModel::default());
    let (base, handle) = spawn_server(state_with(seeded_store().await, model.clone())).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/get", base))
        .header(reqwest::header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(multipart_body("msg", "What is paracetamol used for?"))
        .send()
        .await
        .expect("chat response");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), ANSWER);
    assert_eq!(model.questions.lock().unwrap().as_slice(), ["What is paracetamol used for?"]);

    let without_field = client
        .post(format!("{}/get", base))
        .header(reqwest::header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(multipart_body("message", "wrong field name"))
        .send()
        .await
        .expect("chat response");
    assert_eq!(without_field.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(model.questions.lock().unwrap().len(), 1);

    handle.abort();
}

#[tokio::test]
async fn empty_msg_is_passed_through() {
    let model = Arc::new(StubModel::default());
    let (base, handle) = spawn_server(state_with(seeded_store().await, model.clone())).await;

    let response = reqwest::Client::new()
        .post(format!("{}/get", base))
        .form(&[("msg", "")])
        .send()
        .await
        .expect("chat response");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(model.questions.lock().unwrap().as_slice(), [""]);

    handle.abort();
}

#[tokio::test]
async fn empty_index_still_answers() {
    let model = Arc::new(StubModel::default());
    let store = Arc::new(InMemoryVectorStore::new(DIM));
    let (base, handle) = spawn_server(state_with(store, model.clone())).await;

    let response = reqwest::Client::new()
        .post(format!("{}/get", base))
        .form(&[("msg", "What is paracetamol used for?")])
        .send()
        .await
        .expect("chat response");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), ANSWER);
    assert_eq!(model.contexts.lock().unwrap().as_slice(), [""]);

    handle.abort();
}

#[tokio::test]
async fn llm_failure_is_a_server_error_without_partial_answer() {
    let (base, handle) =
        spawn_server(state_with(seeded_store().await, Arc::new(UnavailableModel))).await;

    let response = reqwest::Client::new()
        .post(format!("{}/get", base))
        .form(&[("msg", "What is paracetamol used for?")])
        .send()
        .await
        .expect("chat response");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await.unwrap();
    assert!(!body.contains("Paracetamol"));
    assert!(!body.contains("503"), "upstream detail leaked: {body}");

    handle.abort();
}

#[tokio::test]
async fn health_reports_ok() {
    let model = Arc::new(StubModel::default());
    let (base, handle) = spawn_server(state_with(seeded_store().await, model)).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .expect("health response")
        .json()
        .await
        .expect("health json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "medibot");

    handle.abort();
}

use super::*;
use crate::models::{MessageItem, MessagePayload, ResponsePayload, Sender};
use crate::plan::MemoryPlanStore;
use crate::providers::testing::ScriptedProvider;

struct Fixture {
    classification: Arc<ScriptedProvider>,
    extraction: Arc<ScriptedProvider>,
    confirmation: Arc<ScriptedProvider>,
    general: Arc<ScriptedProvider>,
    final_message: Arc<ScriptedProvider>,
    image: Arc<ScriptedProvider>,
    store: Arc<MemoryPlanStore>,
    service: ConversationService,
}

fn fixture() -> Fixture {
    let classification = Arc::new(ScriptedProvider::new());
    let extraction = Arc::new(ScriptedProvider::new());
    let confirmation = Arc::new(ScriptedProvider::new());
    let general = Arc::new(ScriptedProvider::new());
    let final_message = Arc::new(ScriptedProvider::new());
    let image = Arc::new(ScriptedProvider::new());
    let store = Arc::new(MemoryPlanStore::new());

    let providers = Arc::new(TaskProviders {
        classification: classification.clone(),
        extraction: extraction.clone(),
        confirmation: confirmation.clone(),
        general: general.clone(),
        final_message: final_message.clone(),
        image: image.clone(),
    });
    let service = ConversationService::new(
        providers,
        store.clone(),
        Notifier::new(None, 2),
    );

    Fixture {
        classification,
        extraction,
        confirmation,
        general,
        final_message,
        image,
        store,
        service,
    }
}

fn text_item(source: &str, text: &str) -> MessageItem {
    MessageItem {
        message_time: "2024-07-30T10:15:30Z".to_string(),
        message_id: "msg-1".to_string(),
        source: source.to_string(),
        status: "success".to_string(),
        message_type: "text".to_string(),
        payload: MessagePayload {
            text: Some(text.to_string()),
            image: None,
        },
    }
}

fn request(current: MessageItem, previous: Vec<MessageItem>) -> ConversationRequest {
    ConversationRequest {
        conversation_id: "conv-1".to_string(),
        current_message: current,
        sender: Sender {
            name: "USER123".to_string(),
            phone_number: "1234567899".to_string(),
        },
        previous_messages: previous,
    }
}

fn plan_json(name: &str, price: &str) -> String {
    format!(
        r#"{{
            "product_name": "{name}",
            "product_description": "{name}",
            "product_family": "GSM",
            "product_group": "Prepaid",
            "product_offer_price": "{price}",
            "pop_type": "Normal",
            "price_category": "Base Price",
            "price_mode": "Non-Recurring",
            "product_specification_type": "ADDON",
            "data_allowance": "1 GB",
            "voice_allowance": "0"
        }}"#
    )
}

fn payload_text(response: &PlanResponse) -> &str {
    match &response.current_message.payload {
        ResponsePayload::Text { text } => text,
        ResponsePayload::Plan(_) => panic!("expected text payload"),
    }
}

fn payload_plan(response: &PlanResponse) -> &crate::plan::ProductPlan {
    match &response.current_message.payload {
        ResponsePayload::Plan(plan) => plan,
        ResponsePayload::Text { .. } => panic!("expected product payload"),
    }
}

#[tokio::test]
async fn test_general_conversation_returns_text() {
    let f = fixture();
    f.classification
        .push_text(r#"{"category": "general_conversation"}"#);
    f.general.push_text("Hello! How may I assist you today?");

    let response = f
        .service
        .handle_conversation(request(text_item("ui", "I want to create a product"), vec![]))
        .await
        .unwrap();

    assert_eq!(response.current_message.message_type, "text");
    assert_eq!(payload_text(&response), "Hello! How may I assist you today?");
    assert_eq!(f.extraction.call_count(), 0);
}

#[tokio::test]
async fn test_product_turn_without_confirmation_asks_to_confirm() {
    let f = fixture();
    f.classification.push_text(r#"{"category": "product_related"}"#);
    f.extraction.push_text(&plan_json("Data_1_GB", "12"));
    f.confirmation.push_text(r#"{"value": "false"}"#); // not confirmed
    f.confirmation.push_text(r#"{"value": "false"}"#); // no change requested
    f.final_message
        .push_text("Here are the details of your product...");

    let response = f
        .service
        .handle_conversation(request(
            text_item("ui", "create Data_1_GB with 1 GB for 12"),
            vec![],
        ))
        .await
        .unwrap();

    assert_eq!(response.current_message.message_type, "text");
    assert!(payload_text(&response).contains("details of your product"));

    // schema accumulated for the next turn
    let stored = f.store.get("conv-1").await.unwrap();
    assert_eq!(stored.product_name.as_deref(), Some("Data_1_GB"));
}

#[tokio::test]
async fn test_confirmed_turn_returns_product_payload() {
    let f = fixture();
    f.classification.push_text(r#"{"category": "product_related"}"#);
    f.extraction.push_text(&plan_json("Data_1_GB", "12"));
    f.confirmation.push_text(r#"{"value": "true"}"#);

    let response = f
        .service
        .handle_conversation(request(
            text_item("ui", "proceed"),
            vec![text_item("AI", "Here are the details...")],
        ))
        .await
        .unwrap();

    assert_eq!(response.current_message.message_type, "product");
    let plan = payload_plan(&response);
    assert_eq!(plan.product_name.as_deref(), Some("Data_1_GB"));
    // "0" allowances read as missing in the display
    assert_eq!(plan.voice_allowance.as_deref(), Some("None"));
}

#[tokio::test]
async fn test_change_request_nulls_exactly_the_target_field() {
    let f = fixture();
    f.classification.push_text(r#"{"category": "product_related"}"#);
    f.extraction.push_text(&plan_json("Data_1_GB", "12"));
    f.confirmation.push_text(r#"{"value": "false"}"#); // not confirmed
    f.confirmation.push_text(r#"{"value": "true"}"#); // change requested
    f.confirmation
        .push_text(r#"{"field_name": "product_offer_price"}"#);

    let response = f
        .service
        .handle_conversation(request(
            text_item("ui", "change the price"),
            vec![text_item("AI", "Here are the details...")],
        ))
        .await
        .unwrap();

    assert_eq!(response.current_message.message_type, "product");
    let plan = payload_plan(&response);
    assert_eq!(plan.product_offer_price, None);
    // every other field keeps its accumulated value
    assert_eq!(plan.product_name.as_deref(), Some("Data_1_GB"));
    assert_eq!(plan.product_family.as_deref(), Some("GSM"));

    // the nulled plan is stored so the next extraction sees the gap
    let stored = f.store.get("conv-1").await.unwrap();
    assert_eq!(stored.product_offer_price, None);
}

#[tokio::test]
async fn test_image_turn_transcribes_then_confirms() {
    let f = fixture();
    f.image.push_text("Plan: Data_1_GB, price 12, 1 GB");
    f.classification.push_text(r#"{"category": "product_related"}"#);
    f.extraction.push_text(&plan_json("Data_1_GB", "12"));
    f.final_message
        .push_text("Here are the details of your product...");

    let mut current = text_item("ui", "");
    current.message_type = "image".to_string();
    current.payload = MessagePayload {
        text: None,
        image: Some("iVBORw0KGgo=".to_string()),
    };

    let response = f
        .service
        .handle_conversation(request(current, vec![]))
        .await
        .unwrap();

    // image turns answer with the confirmation text, never a product payload
    assert_eq!(response.current_message.message_type, "text");
    assert_eq!(f.image.call_count(), 1);
    // the transcription feeds the classifier, not the raw base64
    let classifier_calls = f.classification.calls();
    assert!(classifier_calls[0].messages[0].content.contains("Data_1_GB"));
    // confirmation checks are skipped on image turns
    assert_eq!(f.confirmation.call_count(), 0);
}

#[tokio::test]
async fn test_extraction_failure_propagates() {
    let f = fixture();
    f.classification.push_text(r#"{"category": "product_related"}"#);
    f.extraction.push_text("not json");
    f.extraction.push_text("still not json");
    f.extraction.push_text("nope");

    let err = f
        .service
        .handle_conversation(request(text_item("ui", "create a plan"), vec![]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("parse LLM response"));
}

#[tokio::test]
async fn test_greeting_returns_text_without_conversation_id() {
    let f = fixture();
    f.general
        .push_text("Hi I am AARYA (Automated AI Responder at Your Assistance). How may I help you?");

    let response = f
        .service
        .handle_greeting(GreetingRequest {
            sender: Sender {
                name: "USER123".to_string(),
                phone_number: "1234567899".to_string(),
            },
        })
        .await
        .unwrap();

    assert!(response.conversation_id.is_none());
    assert!(payload_text(&response).contains("AARYA"));
}

#[tokio::test]
async fn test_missing_info_echoes_message_id() {
    let f = fixture();
    f.general.push_text("Could you share the product price?");

    let response = f
        .service
        .handle_missing_info(request(
            text_item("ui", "product_offer_price"),
            vec![text_item("ui", "create a plan with 1 GB")],
        ))
        .await
        .unwrap();

    assert_eq!(payload_text(&response), "Could you share the product price?");
    assert_eq!(response.current_message.message_id.as_deref(), Some("msg-1"));
    assert!(response.current_message.message_time.is_some());

    // the prompt names the missing field and carries the history
    let calls = f.general.calls();
    assert!(calls[0].messages[0].content.contains("product_offer_price"));
    assert!(calls[0].messages[0].content.contains("1 GB"));
}

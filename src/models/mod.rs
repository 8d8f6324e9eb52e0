use crate::plan::ProductPlan;
use crate::providers::base::Message;
use serde::{Deserialize, Serialize};

/// Text or base64 image content of a message.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MessagePayload {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageItem {
    #[serde(default, rename = "messageTime")]
    pub message_time: String,
    #[serde(default, rename = "messageId")]
    pub message_id: String,
    /// "ui" for user-originated messages, anything else is the assistant.
    pub source: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "messageType")]
    pub message_type: String,
    pub payload: MessagePayload,
}

impl MessageItem {
    pub fn is_image(&self) -> bool {
        self.message_type == "image"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sender {
    pub name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRequest {
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    #[serde(rename = "currentMessage")]
    pub current_message: MessageItem,
    pub sender: Sender,
    #[serde(default, rename = "previousMessages")]
    pub previous_messages: Vec<MessageItem>,
}

impl ConversationRequest {
    /// All turns in order, current message last.
    pub fn all_messages(&self) -> Vec<MessageItem> {
        let mut all = self.previous_messages.clone();
        all.push(self.current_message.clone());
        all
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetingRequest {
    pub sender: Sender,
}

/// Discriminated response payload: free text or a structured product plan.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Text { text: String },
    Plan(ProductPlan),
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMessage {
    pub source: String,
    pub status: String,
    #[serde(rename = "messageType")]
    pub message_type: String,
    pub payload: ResponsePayload,
    #[serde(skip_serializing_if = "Option::is_none", rename = "messageTime")]
    pub message_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "messageId")]
    pub message_id: Option<String>,
}

impl ResponseMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            source: "AI".to_string(),
            status: "success".to_string(),
            message_type: "text".to_string(),
            payload: ResponsePayload::Text { text: text.into() },
            message_time: None,
            message_id: None,
        }
    }

    pub fn product(plan: ProductPlan) -> Self {
        Self {
            source: "AI".to_string(),
            status: "success".to_string(),
            message_type: "product".to_string(),
            payload: ResponsePayload::Plan(plan),
            message_time: None,
            message_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    #[serde(skip_serializing_if = "Option::is_none", rename = "conversationId")]
    pub conversation_id: Option<String>,
    #[serde(rename = "currentMessage")]
    pub current_message: ResponseMessage,
}

/// Map UI/assistant turns onto chat roles for prompt construction.
pub fn to_chat_messages(items: &[MessageItem]) -> Vec<Message> {
    items
        .iter()
        .map(|item| {
            let content = item.payload.text.clone().unwrap_or_default();
            if item.source == "ui" {
                Message::user(content)
            } else {
                Message::assistant(content)
            }
        })
        .collect()
}

/// Serialize turns as the role/content JSON embedded in prompts.
pub fn serialize_chat_messages(messages: &[Message]) -> String {
    let entries: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| serde_json::json!({"role": m.role, "content": m.content}))
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_request_deserializes_camel_case() {
        let json = r#"{
            "conversationId": "conv-12345",
            "currentMessage": {
                "messageTime": "2024-07-30T10:15:30Z",
                "messageId": "msg-789",
                "source": "ui",
                "status": "success",
                "messageType": "text",
                "payload": {"text": "Please activate Data_1_GB"}
            },
            "sender": {"name": "USER123", "phoneNumber": "1234567899"},
            "previousMessages": []
        }"#;
        let req: ConversationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.conversation_id, "conv-12345");
        assert_eq!(req.sender.phone_number, "1234567899");
        assert!(!req.current_message.is_image());
    }

    #[test]
    fn test_role_mapping_ui_is_user() {
        let items = vec![
            MessageItem {
                message_time: String::new(),
                message_id: String::new(),
                source: "ui".to_string(),
                status: String::new(),
                message_type: "text".to_string(),
                payload: MessagePayload {
                    text: Some("hello".to_string()),
                    image: None,
                },
            },
            MessageItem {
                message_time: String::new(),
                message_id: String::new(),
                source: "AI".to_string(),
                status: String::new(),
                message_type: "text".to_string(),
                payload: MessagePayload {
                    text: Some("hi there".to_string()),
                    image: None,
                },
            },
        ];
        let messages = to_chat_messages(&items);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[1].role, "assistant");
    }

    #[test]
    fn test_text_response_shape() {
        let resp = PlanResponse {
            conversation_id: Some("conv-1".to_string()),
            current_message: ResponseMessage::text("hello"),
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["currentMessage"]["messageType"], "text");
        assert_eq!(value["currentMessage"]["payload"]["text"], "hello");
        assert_eq!(value["currentMessage"]["source"], "AI");
    }

    #[test]
    fn test_product_response_embeds_plan_fields() {
        let plan = ProductPlan::defaults();
        let resp = PlanResponse {
            conversation_id: None,
            current_message: ResponseMessage::product(plan),
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["currentMessage"]["messageType"], "product");
        assert_eq!(value["currentMessage"]["payload"]["product_family"], "GSM");
        assert!(value.get("conversationId").is_none());
    }
}

//! Per-turn orchestration: classify, extract, confirm, respond.

use crate::classifier::{self, Classification};
use crate::models::{
    ConversationRequest, GreetingRequest, PlanResponse, ResponseMessage, to_chat_messages,
};
use crate::notify::Notifier;
use crate::plan::{PlanStore, ProductPlan};
use crate::providers::base::{ChatRequest, Message};
use crate::providers::strategy::TaskProviders;
use crate::{confirmation, extractor, image, models, prompts};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

#[cfg(feature = "embeddings")]
mod cache;
#[cfg(feature = "embeddings")]
pub use cache::ResponseCache;

pub struct ConversationService {
    providers: Arc<TaskProviders>,
    store: Arc<dyn PlanStore>,
    notifier: Notifier,
    #[cfg(feature = "embeddings")]
    cache: Option<Arc<ResponseCache>>,
}

impl ConversationService {
    pub fn new(providers: Arc<TaskProviders>, store: Arc<dyn PlanStore>, notifier: Notifier) -> Self {
        Self {
            providers,
            store,
            notifier,
            #[cfg(feature = "embeddings")]
            cache: None,
        }
    }

    #[cfg(feature = "embeddings")]
    pub fn with_response_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// One turn of the conversation pipeline.
    pub async fn handle_conversation(&self, request: ConversationRequest) -> Result<PlanResponse> {
        let mut request = request;
        info!(
            "handling conversation {} from {}",
            request.conversation_id, request.sender.phone_number
        );

        let image_turn = request.current_message.is_image();
        if image_turn {
            self.process_image_turn(&mut request).await?;
        }

        let items = request.all_messages();
        let chat = to_chat_messages(&items);

        match classifier::classify(self.providers.classification.as_ref(), &chat).await {
            Classification::GeneralConversation => self.general_turn(&request, &chat).await,
            Classification::ProductRelated => self.product_turn(&request, &chat, image_turn).await,
        }
    }

    /// Replace the image payload with its transcription so the rest of the
    /// pipeline sees a plain text turn. Progress notifications run for the
    /// duration of the vision call.
    async fn process_image_turn(&self, request: &mut ConversationRequest) -> Result<()> {
        let notify_id = request.sender.phone_number.clone();
        self.notifier.send(&notify_id, "processing image..").await;

        let payload = &request.current_message.payload;
        let image_data = payload
            .image
            .clone()
            .or_else(|| payload.text.clone())
            .context("image message carries no image data")?;

        let guard = self.notifier.start_progress(&notify_id);
        let extracted =
            image::extract_image_content(self.providers.image.as_ref(), &image_data).await;
        guard.stop().await;
        let extracted = extracted?;

        debug!("extracted content from image: {extracted}");
        request.current_message.payload.text = Some(extracted);
        request.current_message.payload.image = None;
        request.current_message.message_type = "text".to_string();
        Ok(())
    }

    async fn general_turn(
        &self,
        request: &ConversationRequest,
        chat: &[Message],
    ) -> Result<PlanResponse> {
        let serialized = models::serialize_chat_messages(chat);
        let prompt = prompts::AI_RESPONSE.replace("{incoming_message}", &serialized);

        #[cfg(feature = "embeddings")]
        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(&prompt)?
        {
            info!("general response served from cache");
            return Ok(text_response(Some(request.conversation_id.clone()), hit));
        }

        let response = self
            .providers
            .general
            .chat(ChatRequest {
                messages: vec![Message::user(prompt.clone())],
                model: None,
                max_tokens: 500,
                temperature: 0.7,
                response_schema: None,
            })
            .await?;
        let text = response.text()?.trim().to_string();

        #[cfg(feature = "embeddings")]
        if let Some(cache) = &self.cache {
            cache.insert(&prompt, &text)?;
        }

        Ok(text_response(Some(request.conversation_id.clone()), text))
    }

    async fn product_turn(
        &self,
        request: &ConversationRequest,
        chat: &[Message],
        image_turn: bool,
    ) -> Result<PlanResponse> {
        let current = self
            .store
            .get(&request.conversation_id)
            .await
            .unwrap_or_else(ProductPlan::defaults);

        let mut plan =
            extractor::extract_plan(self.providers.extraction.as_ref(), chat, &current).await?;
        self.store.put(&request.conversation_id, plan.clone()).await;

        // An image turn always answers with the confirmation text; the user
        // has not seen the transcribed details yet.
        if image_turn {
            let text = self.final_message(&plan).await?;
            return Ok(text_response(Some(request.conversation_id.clone()), text));
        }

        plan.normalize_zeroes();

        if confirmation::check_confirmation(self.providers.confirmation.as_ref(), chat).await {
            info!("plan confirmed for conversation {}", request.conversation_id);
            return Ok(product_response(Some(request.conversation_id.clone()), plan));
        }

        if confirmation::check_change_requested(self.providers.confirmation.as_ref(), chat).await {
            let field =
                confirmation::extract_field(self.providers.confirmation.as_ref(), chat).await;
            info!("change requested for field '{field}'");
            let changed = plan.nulled_field(&field);
            self.store
                .put(&request.conversation_id, changed.clone())
                .await;
            return Ok(product_response(
                Some(request.conversation_id.clone()),
                changed,
            ));
        }

        let text = self.final_message(&plan).await?;
        Ok(text_response(Some(request.conversation_id.clone()), text))
    }

    /// Bullet-point confirmation text for the accumulated schema.
    async fn final_message(&self, plan: &ProductPlan) -> Result<String> {
        let schema_json = serde_json::to_string_pretty(plan)?;
        let prompt = prompts::FINAL_MESSAGE_TEMPLATE.replace("{schema}", &schema_json);
        let response = self
            .providers
            .final_message
            .chat(ChatRequest {
                messages: vec![Message::user(prompt)],
                model: None,
                max_tokens: 500,
                temperature: 0.3,
                response_schema: None,
            })
            .await?;
        Ok(response.text()?.trim().to_string())
    }

    /// Opening greeting for a fresh conversation.
    pub async fn handle_greeting(&self, request: GreetingRequest) -> Result<PlanResponse> {
        info!("handling greeting for user: {}", request.sender.name);
        let response = self
            .providers
            .general
            .chat(ChatRequest {
                messages: vec![Message::user(prompts::AI_GREETING)],
                model: None,
                max_tokens: 1200,
                temperature: 0.7,
                response_schema: None,
            })
            .await?;
        Ok(text_response(None, response.text()?.trim().to_string()))
    }

    /// Ask the customer for one missing field, phrased against the history.
    pub async fn handle_missing_info(&self, request: ConversationRequest) -> Result<PlanResponse> {
        let missing_field = request
            .current_message
            .payload
            .text
            .clone()
            .context("missing info request carries no field name")?;
        info!("asking for missing field: {missing_field}");

        let history = models::serialize_chat_messages(&to_chat_messages(&request.previous_messages));
        let prompt = prompts::MISSING_INFO
            .replace("{missing_field}", &missing_field)
            .replace("{conversation_history}", &history);

        let response = self
            .providers
            .general
            .chat(ChatRequest {
                messages: vec![Message::user(prompt)],
                model: None,
                max_tokens: 1200,
                temperature: 0.7,
                response_schema: None,
            })
            .await?;

        let mut message = ResponseMessage::text(response.text()?.trim().to_string());
        message.message_time = Some(chrono::Utc::now().to_rfc3339());
        message.message_id = Some(request.current_message.message_id.clone());
        Ok(PlanResponse {
            conversation_id: Some(request.conversation_id),
            current_message: message,
        })
    }
}

fn text_response(conversation_id: Option<String>, text: String) -> PlanResponse {
    PlanResponse {
        conversation_id,
        current_message: ResponseMessage::text(text),
    }
}

fn product_response(conversation_id: Option<String>, plan: ProductPlan) -> PlanResponse {
    PlanResponse {
        conversation_id,
        current_message: ResponseMessage::product(plan),
    }
}

#[cfg(test)]
mod tests;

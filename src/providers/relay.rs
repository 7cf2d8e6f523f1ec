use crate::config::RelayConfig;
use crate::providers::openai::Gpt4Backend;
use crate::providers::pqai::PqaiBackend;
use crate::providers::traits::ChatBackend;
use log::{info, warn};
use reqwest::Client;
use std::sync::Arc;

pub const INVALID_MODEL_REPLY: &str = "Invalid model selected.";

/// Routes a chat message to one of the two upstreams by the request's
/// `model` field and always produces reply text.
#[derive(Clone)]
pub struct Relay {
    pqai: Arc<dyn ChatBackend>,
    gpt4: Arc<dyn ChatBackend>,
}

impl Relay {
    pub fn new(pqai: Arc<dyn ChatBackend>, gpt4: Arc<dyn ChatBackend>) -> Self {
        Self { pqai, gpt4 }
    }

    pub fn from_config(config: &RelayConfig, client: Client) -> Self {
        let pqai = PqaiBackend::new(client.clone(), &config.pqai_api_url, &config.pqai_api_key);
        let gpt4 = Gpt4Backend::new(
            client,
            &config.gpt4_api_url,
            &config.gpt4_api_key,
            &config.gpt4_model,
        );
        Self::new(Arc::new(pqai), Arc::new(gpt4))
    }

    fn backend(&self, model: &str) -> Option<&Arc<dyn ChatBackend>> {
        match model {
            "pqai" => Some(&self.pqai),
            "gpt4" => Some(&self.gpt4),
            _ => None,
        }
    }

    /// Upstream failures are folded into the reply text instead of being
    /// returned as errors.
    pub async fn reply(&self, model: &str, message: &str) -> String {
        let Some(backend) = self.backend(model) else {
            info!("Rejected unknown model {:?}", model);
            return INVALID_MODEL_REPLY.to_string();
        };

        match backend.reply(message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("{} request failed: {:#}", backend.label(), e);
                format!("Error contacting {}: {:#}", backend.label(), e)
            }
        }
    }
}

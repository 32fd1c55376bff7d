use crate::config::Config;
use crate::errors::FreshError;
use crate::memory::MemoryStore;
use crate::provider::DynProvider;
use crate::wire::RespondRequest;

/// Single entry point to the model. Every call is prefixed with the tail of the
/// history so the model sees what was planned and generated so far.
pub struct Gateway {
    provider: DynProvider,
    memory: MemoryStore,
    model: String,
    window_chars: usize,
}

impl Gateway {
    pub fn new(provider: DynProvider, cfg: &Config) -> Self {
        Self {
            provider,
            memory: MemoryStore::new(&cfg.history_path),
            model: cfg.model.clone(),
            window_chars: cfg.memory_chars,
        }
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    fn compose_input(&self, prompt: &str) -> String {
        let window = self.memory.read_window(self.window_chars);
        if window.is_empty() {
            prompt.to_string()
        } else {
            format!("{window}\n\n{prompt}")
        }
    }

    /// One round-trip. `target` names what the call is for (a file path or the
    /// orchestrator) so a failure can be attributed.
    pub async fn generate(&self, target: &str, prompt: &str, instructions: &str) -> Result<String, FreshError> {
        let req = RespondRequest {
            model: self.model.clone(),
            input: self.compose_input(prompt),
            instructions: instructions.to_string(),
            tools: Vec::new(),
            stream: false,
        };
        tracing::debug!(target_file = target, model = %self.model, input_chars = req.input.chars().count(), "generate");
        self.provider
            .respond(&req)
            .await
            .map_err(|e| FreshError::transport(target, e))
    }
}

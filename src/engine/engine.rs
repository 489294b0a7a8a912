use crate::engine::llm_client::ChatModel;
use crate::engine::pipeline::PipelineRunner;
use crate::engine::protocol::{ProcessedRequest, RequestOutcome};
use crate::model::error::StorageError;
use crate::model::support_request::SupportRequest;
use crate::storage::request_store::{RequestStore, StoredRecord};

/// Request boundary: every submitted request ends up as exactly one record,
/// whether the pipeline answered or failed.
pub struct SupportEngine<M: ChatModel> {
    runner: PipelineRunner<M>,
    store: RequestStore,
}

impl<M: ChatModel> SupportEngine<M> {
    pub fn new(runner: PipelineRunner<M>, store: RequestStore) -> Self {
        Self { runner, store }
    }

    pub fn store(&self) -> &RequestStore {
        &self.store
    }

    pub fn process_request(&self, text: &str) -> Result<ProcessedRequest, StorageError> {
        let request = SupportRequest::new(text);
        log::info!(
            "Processing request submitted at {}",
            request.submitted_at().format("%H:%M:%S")
        );

        let (outcome, response_text) = match self.runner.run(&request) {
            Ok(answer) => (RequestOutcome::Answered, answer),
            Err(e) => {
                log::error!("Pipeline failed at {} stage: {}", e.stage(), e);
                (
                    RequestOutcome::Failed,
                    format!("Erro ao processar solicitação: {}", e),
                )
            }
        };

        let path = self.store.save(&request, &response_text)?;

        Ok(ProcessedRequest {
            outcome,
            response_text,
            path,
        })
    }

    pub fn latest_response(&self) -> Result<Option<StoredRecord>, StorageError> {
        self.store.load_latest()
    }
}

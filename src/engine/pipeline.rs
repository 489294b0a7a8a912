use crate::engine::delegation_parser::parse_delegation;
use crate::engine::llm_client::ChatModel;
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::protocol::{Consultation, StageOutput};
use crate::model::error::PipelineError;
use crate::model::message::Message;
use crate::model::prompt_spec::{Pipeline, PromptSpec, Stage};
use crate::model::support_request::SupportRequest;

/// Runs every stage of a [`Pipeline`] in order against one model.
pub struct PipelineRunner<M: ChatModel> {
    model: M,
    pipeline: Pipeline,
}

impl<M: ChatModel> PipelineRunner<M> {
    pub fn new(model: M, pipeline: Pipeline) -> Self {
        Self { model, pipeline }
    }

    #[cfg(test)]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Final stage's text for `request`.
    pub fn run(&self, request: &SupportRequest) -> Result<String, PipelineError> {
        let outputs = self.run_stages(request)?;
        // Pipeline::new guarantees at least one stage
        Ok(outputs.last().map(|o| o.text.clone()).unwrap_or_default())
    }

    pub fn run_stages(&self, request: &SupportRequest) -> Result<Vec<StageOutput>, PipelineError> {
        let mut outputs: Vec<StageOutput> = Vec::with_capacity(self.pipeline.stages().len());

        for spec in self.pipeline.stages() {
            log::info!("Running {} stage ({})", spec.stage, spec.role);
            let text = self.run_stage(spec, request, &outputs)?;
            outputs.push(StageOutput {
                stage: spec.stage,
                role: spec.role.clone(),
                text,
            });
        }

        Ok(outputs)
    }

    fn run_stage(
        &self,
        spec: &PromptSpec,
        request: &SupportRequest,
        previous: &[StageOutput],
    ) -> Result<String, PipelineError> {
        let messages = PromptBuilder::stage_messages(&self.pipeline, spec, request, previous);
        let reply = self.ask(spec.stage, &messages)?;

        if !spec.can_delegate {
            return Ok(reply);
        }

        let Some(delegation) = parse_delegation(&reply) else {
            return Ok(reply);
        };

        let Some(coworker) = self.pipeline.find_coworker(spec.stage, &delegation.coworker) else {
            log::warn!(
                "{} tried to delegate to unknown coworker '{}'; keeping its reply",
                spec.role,
                delegation.coworker
            );
            return Ok(reply);
        };

        log::info!("{} delegated to {}", spec.role, coworker.role);
        let consult = PromptBuilder::consult_messages(coworker, spec, request, &delegation.question);
        let answer = self.ask(spec.stage, &consult)?;

        let consultation = Consultation {
            coworker: coworker.role.clone(),
            question: delegation.question,
            answer,
        };
        let followup = PromptBuilder::followup_messages(spec, request, previous, &consultation);
        self.ask(spec.stage, &followup)
    }

    fn ask(&self, stage: Stage, messages: &[Message]) -> Result<String, PipelineError> {
        let reply = self
            .model
            .complete(messages)
            .map_err(|source| PipelineError::Model { stage, source })?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(PipelineError::EmptyResponse { stage });
        }
        Ok(reply.to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use crate::engine::llm_client::ChatModel;
    use crate::model::error::LlmError;
    use crate::model::message::Message;

    /// Replays canned replies in order and records every prompt it was sent.
    #[derive(Default)]
    pub struct ScriptedModel {
        replies: RefCell<VecDeque<Result<String, LlmError>>>,
        pub prompts: RefCell<Vec<Vec<Message>>>,
    }

    impl ScriptedModel {
        pub fn new<I, S>(replies: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                replies: RefCell::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
                prompts: RefCell::new(Vec::new()),
            }
        }

        pub fn then_fail(self, error: LlmError) -> Self {
            self.replies.borrow_mut().push_back(Err(error));
            self
        }

        pub fn calls(&self) -> usize {
            self.prompts.borrow().len()
        }

        pub fn user_prompt(&self, call: usize) -> String {
            self.prompts.borrow()[call][1].content().to_string()
        }
    }

    impl ChatModel for ScriptedModel {
        fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
            self.prompts.borrow_mut().push(messages.to_vec());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(LlmError::NoChoices))
        }
    }
}

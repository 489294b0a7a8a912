use crate::engine::protocol::{Consultation, StageOutput};
use crate::model::message::Message;
use crate::model::prompt_spec::{Pipeline, PromptSpec, PREVIOUS_PLACEHOLDER, REQUEST_PLACEHOLDER};
use crate::model::support_request::SupportRequest;

pub const DELEGATION_DIRECTIVE: &str = "DELEGATE TO";

/// Builds the chat messages sent for each stage.
/// Formatting only: no networking and no pipeline control flow.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Messages for a stage's first attempt.
    pub fn stage_messages(
        pipeline: &Pipeline,
        spec: &PromptSpec,
        request: &SupportRequest,
        previous: &[StageOutput],
    ) -> Vec<Message> {
        let mut system = String::new();
        push_persona(&mut system, spec);
        if spec.can_delegate {
            push_delegation_rules(&mut system, pipeline, spec);
        }

        let mut user = String::new();
        push_task(&mut user, spec, request, previous);
        push_expected_output(&mut user, spec);
        push_reminder(&mut user, spec.can_delegate, false);

        vec![Message::System(system), Message::User(user)]
    }

    /// Messages for a stage's second attempt, after a coworker answered.
    pub fn followup_messages(
        spec: &PromptSpec,
        request: &SupportRequest,
        previous: &[StageOutput],
        consultation: &Consultation,
    ) -> Vec<Message> {
        let mut system = String::new();
        push_persona(&mut system, spec);

        let mut user = String::new();
        push_task(&mut user, spec, request, previous);

        user.push_str("COWORKER ANSWER:\n");
        user.push_str(&format!(
            "You asked {}: {}\n",
            consultation.coworker, consultation.question
        ));
        user.push_str(consultation.answer.trim());
        user.push_str("\n\n");

        push_expected_output(&mut user, spec);
        push_reminder(&mut user, spec.can_delegate, true);

        vec![Message::System(system), Message::User(user)]
    }

    /// Messages asking `coworker` a question on behalf of `asked_by`.
    pub fn consult_messages(
        coworker: &PromptSpec,
        asked_by: &PromptSpec,
        request: &SupportRequest,
        question: &str,
    ) -> Vec<Message> {
        let mut system = String::new();
        push_persona(&mut system, coworker);

        let mut user = String::new();
        user.push_str(&format!(
            "Your coworker, the {}, needs your help with this support request:\n\n",
            asked_by.role
        ));
        user.push_str(request.text());
        user.push_str("\n\nQUESTION:\n");
        user.push_str(question.trim());
        user.push_str("\n\nAnswer the question directly and concisely. Do not delegate.\n");

        vec![Message::System(system), Message::User(user)]
    }
}

fn push_persona(prompt: &mut String, spec: &PromptSpec) {
    prompt.push_str(&format!("You are the {}.\n\n", spec.role));
    prompt.push_str("GOAL:\n");
    prompt.push_str(&spec.goal);
    prompt.push_str("\n\nBACKGROUND:\n");
    prompt.push_str(&spec.backstory);
    prompt.push_str("\n\n");
}

fn push_delegation_rules(prompt: &mut String, pipeline: &Pipeline, spec: &PromptSpec) {
    let coworkers: Vec<&str> = pipeline
        .coworkers(spec.stage)
        .map(|c| c.role.as_str())
        .collect();
    if coworkers.is_empty() {
        return;
    }

    prompt.push_str("DELEGATION:\n");
    prompt.push_str("You may ask one coworker a single question before answering.\n");
    prompt.push_str("Coworkers:\n");
    for role in coworkers {
        prompt.push_str(&format!("- {}\n", role));
    }
    prompt.push_str(&format!(
        "To ask, reply with only this line:\n{} <coworker role>: <question>\n\n",
        DELEGATION_DIRECTIVE
    ));
}

fn push_task(
    prompt: &mut String,
    spec: &PromptSpec,
    request: &SupportRequest,
    previous: &[StageOutput],
) {
    let mut task = spec.template.replace(REQUEST_PLACEHOLDER, request.text());
    let inline_previous = task.contains(PREVIOUS_PLACEHOLDER);
    if inline_previous {
        task = task.replace(PREVIOUS_PLACEHOLDER, &previous_text(previous));
    }

    prompt.push_str("TASK:\n");
    prompt.push_str(&task);
    prompt.push_str("\n\n");

    if !inline_previous && !previous.is_empty() {
        prompt.push_str("PREVIOUS STAGE OUTPUTS:\n");
        prompt.push_str(&previous_text(previous));
        prompt.push_str("\n\n");
    }
}

fn previous_text(previous: &[StageOutput]) -> String {
    if previous.is_empty() {
        return "(no earlier stage output)".to_string();
    }

    previous
        .iter()
        .map(|out| format!("[{} - {}]\n{}", out.stage, out.role, out.text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn push_expected_output(prompt: &mut String, spec: &PromptSpec) {
    prompt.push_str("EXPECTED OUTPUT:\n");
    prompt.push_str(&spec.expected_output);
    prompt.push_str("\n\n");
}

fn push_reminder(prompt: &mut String, can_delegate: bool, followup: bool) {
    prompt.push_str(
        "REMINDER:\n\
- Answer the task completely in a single reply.\n\
- Do not invent product features or settings that do not exist.\n",
    );

    if can_delegate && followup {
        prompt.push_str("- Do NOT delegate again in this response.\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::prompt_spec::Stage;

    fn request() -> SupportRequest {
        SupportRequest::new("Cannot access shared drive")
    }

    fn output(stage: Stage, role: &str, text: &str) -> StageOutput {
        StageOutput {
            stage,
            role: role.into(),
            text: text.into(),
        }
    }

    #[test]
    fn first_stage_embeds_request_and_delegation_rules() {
        let pipeline = Pipeline::default();
        let analyst = &pipeline.stages()[0];

        let messages = PromptBuilder::stage_messages(&pipeline, analyst, &request(), &[]);

        assert_eq!(messages.len(), 2);
        let system = messages[0].content();
        assert!(system.starts_with("You are the Support Analyst."));
        assert!(system.contains("- Technical Support Engineer\n"));
        assert!(!system.contains("- Support Analyst\n"));
        assert!(system.contains("DELEGATE TO <coworker role>: <question>"));

        let user = messages[1].content();
        assert!(user.contains("Cannot access shared drive"));
        assert!(!user.contains("PREVIOUS STAGE OUTPUTS"));
        assert!(!user.contains(REQUEST_PLACEHOLDER));
    }

    #[test]
    fn later_stages_receive_prior_outputs() {
        let pipeline = Pipeline::default();
        let tech = &pipeline.stages()[1];
        let previous = vec![output(Stage::Analysis, "Support Analyst", "Severity: High")];

        let messages = PromptBuilder::stage_messages(&pipeline, tech, &request(), &previous);

        let user = messages[1].content();
        assert!(user.contains("PREVIOUS STAGE OUTPUTS:\n[Analysis - Support Analyst]\nSeverity: High"));
    }

    #[test]
    fn translator_gets_upstream_text_inline_without_delegation() {
        let pipeline = Pipeline::default();
        let translator = &pipeline.stages()[3];
        let previous = vec![
            output(Stage::Analysis, "Support Analyst", "analysis"),
            output(Stage::Review, "Workspace Expert", "reviewed solution"),
        ];

        let messages = PromptBuilder::stage_messages(&pipeline, translator, &request(), &previous);

        assert!(!messages[0].content().contains("DELEGATION"));
        let user = messages[1].content();
        assert!(user.contains("[Review - Workspace Expert]\nreviewed solution"));
        assert!(!user.contains(PREVIOUS_PLACEHOLDER));
        assert!(!user.contains("PREVIOUS STAGE OUTPUTS"));
    }

    #[test]
    fn followup_carries_answer_and_forbids_delegation() {
        let pipeline = Pipeline::default();
        let analyst = &pipeline.stages()[0];
        let consultation = Consultation {
            coworker: "Workspace Expert".into(),
            question: "Is this a DLP policy?".into(),
            answer: "Probably a sharing restriction.".into(),
        };

        let messages = PromptBuilder::followup_messages(analyst, &request(), &[], &consultation);

        assert!(!messages[0].content().contains("DELEGATION"));
        let user = messages[1].content();
        assert!(user.contains("You asked Workspace Expert: Is this a DLP policy?\nProbably a sharing restriction."));
        assert!(user.contains("Do NOT delegate again"));
    }

    #[test]
    fn consult_prompt_uses_coworker_persona() {
        let pipeline = Pipeline::default();
        let analyst = &pipeline.stages()[0];
        let expert = &pipeline.stages()[2];

        let messages =
            PromptBuilder::consult_messages(expert, analyst, &request(), " Is this a DLP policy? ");

        assert!(messages[0].content().starts_with("You are the Workspace Expert."));
        let user = messages[1].content();
        assert!(user.contains("the Support Analyst, needs your help"));
        assert!(user.contains("QUESTION:\nIs this a DLP policy?\n"));
    }
}

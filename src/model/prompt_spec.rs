use std::fmt;

use crate::model::error::ConfigError;

/// Pipeline stages, ordered by execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Analysis,
    Solution,
    Review,
    Translation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Analysis => "Analysis",
            Stage::Solution => "Solution",
            Stage::Review => "Review",
            Stage::Translation => "Translation",
        };
        f.write_str(name)
    }
}

/// One stage of the pipeline: a persona plus a task template.
///
/// `template` may reference `{request}` (the user's text) and `{previous}`
/// (the outputs of earlier stages).
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSpec {
    pub stage: Stage,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub template: String,
    pub expected_output: String,
    pub can_delegate: bool,
}

pub const REQUEST_PLACEHOLDER: &str = "{request}";
pub const PREVIOUS_PLACEHOLDER: &str = "{previous}";

/// Ordered, non-empty set of stages.
#[derive(Debug, Clone)]
pub struct Pipeline {
    specs: Vec<PromptSpec>,
}

impl Pipeline {
    pub fn new(specs: Vec<PromptSpec>) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::Invalid("pipeline has no stages".into()));
        }

        for pair in specs.windows(2) {
            if pair[0].stage >= pair[1].stage {
                return Err(ConfigError::Invalid(format!(
                    "stage {} cannot run after {}",
                    pair[1].stage, pair[0].stage
                )));
            }
        }

        Ok(Self { specs })
    }

    pub fn stages(&self) -> &[PromptSpec] {
        &self.specs
    }

    /// Every stage other than `stage`, in pipeline order.
    pub fn coworkers(&self, stage: Stage) -> impl Iterator<Item = &PromptSpec> {
        self.specs.iter().filter(move |s| s.stage != stage)
    }

    /// Looks up a coworker by role name, ignoring case and surrounding space.
    pub fn find_coworker(&self, stage: Stage, role: &str) -> Option<&PromptSpec> {
        let role = role.trim();
        self.coworkers(stage)
            .find(|s| s.role.eq_ignore_ascii_case(role))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            specs: default_stages(),
        }
    }
}

/// Analyst, technician, expert, translator.
pub fn default_stages() -> Vec<PromptSpec> {
    vec![analyst(), technician(), expert(), translator()]
}

fn analyst() -> PromptSpec {
    PromptSpec {
        stage: Stage::Analysis,
        role: "Support Analyst".into(),
        goal: "Analyze and classify Google Workspace support requests".into(),
        backstory: "You are a skilled support analyst specializing in Google Workspace. \
Your role is to analyze support requests, classify their severity, and provide \
initial assessment. Communicate in English for precise technical terms."
            .into(),
        template: "Analyze the following Google Workspace support request:\n\n\
{request}\n\n\
1. Classify the severity (Low/Medium/High)\n\
2. Identify the specific Google Workspace service involved\n\
3. List any potential security implications\n\
4. Determine if this requires escalation\n\n\
Provide a structured analysis with these points."
            .into(),
        expected_output:
            "A detailed analysis of the support request with classification and recommendations"
                .into(),
        can_delegate: true,
    }
}

fn technician() -> PromptSpec {
    PromptSpec {
        stage: Stage::Solution,
        role: "Technical Support Engineer".into(),
        goal: "Provide technical solutions for Google Workspace issues".into(),
        backstory: "You are an experienced technical support engineer with deep \
knowledge of Google Workspace. You provide detailed solutions and \
step-by-step guides. Use English for technical accuracy."
            .into(),
        template: "Based on the analysis, provide a solution for:\n\n\
{request}\n\n\
Include:\n\
1. Step-by-step resolution steps\n\
2. Required permissions or access levels\n\
3. Best practices and recommendations\n\
4. Prevention tips for similar issues\n\n\
Format as a clear support response."
            .into(),
        expected_output: "A comprehensive solution with clear steps and recommendations".into(),
        can_delegate: true,
    }
}

fn expert() -> PromptSpec {
    PromptSpec {
        stage: Stage::Review,
        role: "Workspace Expert".into(),
        goal: "Handle complex issues and provide expert guidance".into(),
        backstory: "You are a Google Workspace expert with extensive knowledge \
of enterprise implementations, security, and advanced features. \
Communicate in English for consistency with Google documentation."
            .into(),
        template: "Review the solution for the following issue:\n\n\
{request}\n\n\
1. Verify technical accuracy\n\
2. Add any missing enterprise considerations\n\
3. Include relevant Google Workspace updates or features\n\
4. Provide additional security recommendations\n\n\
Enhance the solution if needed."
            .into(),
        expected_output: "Expert review and enhancement of the solution".into(),
        can_delegate: true,
    }
}

fn translator() -> PromptSpec {
    PromptSpec {
        stage: Stage::Translation,
        role: "Brazilian Portuguese Translator".into(),
        goal: "Translate technical support responses to Brazilian Portuguese".into(),
        backstory: "You are a specialized technical translator with expertise in \
translating IT and cloud computing content to Brazilian Portuguese (pt-BR). \
You maintain technical accuracy while ensuring the language is natural and \
appropriate for Brazilian users. You keep technical terms that are commonly \
used in English in the IT field."
            .into(),
        template: "Translate the following technical support response to Brazilian Portuguese (pt-BR):\n\n\
{previous}\n\n\
Guidelines:\n\
1. Maintain technical accuracy\n\
2. Use natural Brazilian Portuguese\n\
3. Keep common technical terms in English (e.g., \"login\", \"backup\", \"dashboard\")\n\
4. Adapt any cultural references or examples for Brazilian context\n\
5. Use formal but friendly tone appropriate for professional communication\n\
6. Format the response clearly with proper sections\n\n\
Ensure the translation is clear and professional while maintaining technical precision."
            .into(),
        expected_output:
            "A professional Brazilian Portuguese translation of the support response".into(),
        can_delegate: false,
    }
}

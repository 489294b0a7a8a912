use crate::engine::prompt_builder::DELEGATION_DIRECTIVE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationRequest {
    pub coworker: String,
    pub question: String,
}

/// Finds the first `DELEGATE TO <role>: <question>` line in a reply.
pub fn parse_delegation(reply: &str) -> Option<DelegationRequest> {
    for line in reply.lines() {
        let line = line.trim().trim_start_matches(['*', '`']).trim();
        if line.len() < DELEGATION_DIRECTIVE.len()
            || !line.is_char_boundary(DELEGATION_DIRECTIVE.len())
        {
            continue;
        }

        let (head, rest) = line.split_at(DELEGATION_DIRECTIVE.len());
        if !head.eq_ignore_ascii_case(DELEGATION_DIRECTIVE) {
            continue;
        }

        if let Some((coworker, question)) = rest.split_once(':') {
            let coworker = coworker.trim().trim_end_matches(['*', '`']).trim();
            let question = question.trim().trim_end_matches(['*', '`']).trim();
            if coworker.is_empty() || question.is_empty() {
                continue;
            }
            return Some(DelegationRequest {
                coworker: coworker.to_string(),
                question: question.to_string(),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directive_line() {
        let parsed = parse_delegation("DELEGATE TO Workspace Expert: Is Vault retention involved?");
        assert_eq!(
            parsed,
            Some(DelegationRequest {
                coworker: "Workspace Expert".into(),
                question: "Is Vault retention involved?".into(),
            })
        );
    }

    #[test]
    fn tolerates_case_and_markdown_emphasis() {
        let reply = "Let me check first.\n**delegate to workspace expert: Which license tier?**\n";
        let parsed = parse_delegation(reply).unwrap();
        assert_eq!(parsed.coworker, "workspace expert");
        assert_eq!(parsed.question, "Which license tier?");
    }

    #[test]
    fn ignores_ordinary_answers_and_incomplete_directives() {
        assert_eq!(parse_delegation("Severity: High\nService: Drive"), None);
        assert_eq!(parse_delegation("DELEGATE TO Workspace Expert"), None);
        assert_eq!(parse_delegation("DELEGATE TO : why?"), None);
        assert_eq!(parse_delegation("Delegação não é necessária"), None);
    }
}

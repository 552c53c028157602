//! Prompt assembly for the generate stage.

use crate::state::{ModeState, PipelineState};

/// Builds the single prompt sent to the completion service.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    /// Optional text placed before the generated sections.
    preamble: Option<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every prompt with agent-specific instructions.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        let preamble = preamble.into();
        self.preamble = (!preamble.trim().is_empty()).then_some(preamble);
        self
    }

    /// Build the prompt for a request whose history is already retrieved.
    pub fn build(&self, state: &PipelineState, context: &str) -> String {
        let mut sections = Vec::new();
        if let Some(preamble) = &self.preamble {
            sections.push(preamble.trim().to_string());
        }
        match state.mode {
            ModeState::Episodic { has_prior_history } => {
                sections.extend(episodic_sections(state, context, has_prior_history));
            }
            ModeState::Semantic => sections.extend(semantic_sections(state, context)),
        }
        sections.join("\n\n")
    }
}

fn episodic_sections(state: &PipelineState, context: &str, has_prior_history: bool) -> Vec<String> {
    let history = if state.history.is_empty() {
        format!("{context} There are no previous interactions on record for this requester.")
    } else {
        context.to_string()
    };
    let instructions = if has_prior_history {
        "This is a returning requester. Use the previous interactions above where they are \
relevant, acknowledge continuity with earlier conversations, and do not ask again for \
details that are already on record."
    } else {
        "This is a first-time requester. Do not refer to earlier conversations; welcome them \
and ask for any details you need to help."
    };
    vec![
        "You are an assistant that remembers previous interactions with each requester."
            .to_string(),
        format!(
            "## Requester\n\nID: {}\nReturning requester: {}",
            state.requester_id, has_prior_history
        ),
        format!("## Previous interactions\n\n{history}"),
        format!("## Instructions\n\n{instructions}"),
        format!("## Current query\n\n{}", state.query.trim()),
    ]
}

fn semantic_sections(state: &PipelineState, context: &str) -> Vec<String> {
    let knowledge = if state.history.is_empty() {
        format!("{context} Answer from general principles and say when you are unsure.")
    } else {
        context.to_string()
    };
    vec![
        "You are an assistant that applies knowledge learned across many conversations."
            .to_string(),
        format!("## Relevant knowledge\n\n{knowledge}"),
        "## Instructions\n\nApply the principles above to the query. Do not mention memory, \
retrieval, stored records, or where the knowledge came from."
            .to_string(),
        format!("## Query\n\n{}", state.query.trim()),
    ]
}

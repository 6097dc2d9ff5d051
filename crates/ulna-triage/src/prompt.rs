//! LLM prompt engineering for the model derivation path

/// Builds the advisory prompt for the LLM
pub struct PromptBuilder {
    problem: String,
    context: Option<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder for a problem description
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            context: None,
        }
    }

    /// Add the caller's optional free-text context
    pub fn with_context(mut self, context: Option<&str>) -> Self {
        self.context = context.map(|c| c.to_string());
        self
    }

    /// Build the complete advisory prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(ADVISORY_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Patient/problem description: ");
        prompt.push_str(&self.problem);
        if let Some(context) = &self.context {
            prompt.push_str(" Context: ");
            prompt.push_str(context);
            prompt.push('.');
        }
        prompt.push_str("\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const ADVISORY_INSTRUCTIONS: &str = r#"You are an advisory assistant for a Physician Assistant (PA) in an urgent care setting, orthopaedic focus. Given a brief description of an upper extremity problem (wrist, hand, thumb, finger, forearm, elbow), you must:
1. Give a short diagnosis summary (1-2 sentences).
2. Suggest a likely problem/differential (suggested_diagnosis) as a PA would consider in urgent care.
3. Recommend ONE primary upper extremity splint type (e.g. volar wrist splint, thumb spica, sugar-tong, mallet splint, resting hand splint, Muenster, long arm splint).
4. Provide a brief rationale and optional alternatives.
5. If something MORE than or IN ADDITION TO a splint is needed (e.g. X-ray, ortho referral, wound care, rule-out fracture, compartment check), list those as other_recommendations. Otherwise use an empty list.
6. State confidence: "high", "medium", or "low"."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{
  "diagnosis_summary": "...",
  "suggested_diagnosis": "...",
  "recommended_splint": {"splint_name": "...", "rationale": "...", "alternatives": ["..."], "precautions": "..."},
  "other_recommendations": ["..."],
  "confidence": "high|medium|low"
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_problem() {
        let prompt = PromptBuilder::new("wrist pain at night").build();
        assert!(prompt.contains("wrist pain at night"));
        assert!(prompt.contains("Patient/problem description:"));
    }

    #[test]
    fn test_prompt_includes_context_when_given() {
        let prompt = PromptBuilder::new("thumb pain")
            .with_context(Some("post-surgery"))
            .build();
        assert!(prompt.contains("Context: post-surgery."));
    }

    #[test]
    fn test_prompt_omits_context_when_absent() {
        let prompt = PromptBuilder::new("thumb pain").with_context(None).build();
        assert!(!prompt.contains("Context:"));
    }

    #[test]
    fn test_prompt_includes_instructions_and_format() {
        let prompt = PromptBuilder::new("elbow pain").build();
        assert!(prompt.contains("urgent care setting"));
        assert!(prompt.contains("recommended_splint"));
        assert!(prompt.contains("ONLY valid JSON"));
    }
}

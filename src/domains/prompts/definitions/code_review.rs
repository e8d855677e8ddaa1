//! Code review prompt definition.

use super::PromptDefinition;
use crate::core::dispatch::{ArgKind, DispatchError, SchemaDescriptor};

/// A code review prompt template.
pub struct CodeReviewPrompt;

impl PromptDefinition for CodeReviewPrompt {
    const NAME: &'static str = "code_review";
    const DESCRIPTION: &'static str = "Ask for a review of a code snippet";

    fn template() -> &'static str {
        r#"Please review the following {{#if language}}{{language}} {{/if}}code:

```{{language}}
{{code}}
```

Please provide a review covering:
- Code quality and readability
- Potential bugs or issues
- Suggestions for improvement"#
    }

    fn schema() -> Result<SchemaDescriptor, DispatchError> {
        SchemaDescriptor::builder()
            .required("code", ArgKind::String, "The code to review")
            .optional(
                "language",
                ArgKind::String,
                "The programming language of the code",
            )
            .build()
    }
}

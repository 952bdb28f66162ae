//! Prompt builder: fixed system message + user message wrapping the retrieved snippets.

use ai_llm_service::ChatMessage;

/// System instructions sent with every generation.
pub const SYSTEM_MESSAGE: &str = "You are an expert code generator. \
You receive a user request and some example code snippets as context. \
Use the context as inspiration, but generate fresh, clean code.";

/// Placed between retrieved snippets in the user message.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Rendered when the request carries no (or an empty) code type.
pub const UNSPECIFIED_CODE_TYPE: &str = "unspecified";

/// Joins snippet texts in retrieval order.
pub fn join_contexts<S: AsRef<str>>(contexts: &[S]) -> String {
    contexts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Builds the user message.
///
/// # Example
/// ```
/// use code_generator::prompt::build_user_prompt;
///
/// let msg = build_user_prompt("a login form", None, "");
/// assert!(msg.starts_with("User request:\na login form\n"));
/// assert!(msg.contains("Code type: unspecified"));
/// ```
pub fn build_user_prompt(prompt: &str, code_type: Option<&str>, contexts_text: &str) -> String {
    let code_type = code_type
        .filter(|c| !c.is_empty())
        .unwrap_or(UNSPECIFIED_CODE_TYPE);

    // The trailing space after "for the user." is part of the template.
    format!(
        "User request:\n\
         {prompt}\n\
         \n\
         Code type: {code_type}\n\
         \n\
         Relevant snippets from the knowledge base:\n\
         {contexts_text}\n\
         \n\
         Now generate the best possible code for the user. \n\
         Respond with ONLY code and minimal comments.\n"
    )
}

/// The `(system, user)` pair sent to the model.
pub fn build_messages(
    prompt: &str,
    code_type: Option<&str>,
    contexts_text: &str,
) -> [ChatMessage; 2] {
    [
        ChatMessage::system(SYSTEM_MESSAGE),
        ChatMessage::user(build_user_prompt(prompt, code_type, contexts_text)),
    ]
}

#[cfg(test)]
mod tests {
    use ai_llm_service::ChatRole;

    use super::*;

    #[test]
    fn user_prompt_matches_template_exactly() {
        let got = build_user_prompt("Create an Express server", Some("node"), "A\n\n---\n\nB");
        let want = "User request:\nCreate an Express server\n\nCode type: node\n\n\
                    Relevant snippets from the knowledge base:\nA\n\n---\n\nB\n\n\
                    Now generate the best possible code for the user. \n\
                    Respond with ONLY code and minimal comments.\n";
        assert_eq!(got, want);
    }

    #[test]
    fn missing_or_empty_code_type_is_unspecified() {
        assert!(build_user_prompt("x", None, "").contains("Code type: unspecified\n"));
        assert!(build_user_prompt("x", Some(""), "").contains("Code type: unspecified\n"));
    }

    #[test]
    fn contexts_join_in_order() {
        assert_eq!(join_contexts(&["one", "two", "three"]), "one\n\n---\n\ntwo\n\n---\n\nthree");
        assert_eq!(join_contexts::<&str>(&[]), "");
        assert_eq!(join_contexts(&["solo"]), "solo");
    }

    #[test]
    fn messages_are_system_then_user() {
        let [system, user] = build_messages("p", Some("rust"), "ctx");
        assert_eq!(system.role, ChatRole::System);
        assert_eq!(
            system.content,
            "You are an expert code generator. You receive a user request and some example \
             code snippets as context. Use the context as inspiration, but generate fresh, clean code."
        );
        assert_eq!(user.role, ChatRole::User);
        assert!(user.content.contains("Code type: rust"));
    }
}

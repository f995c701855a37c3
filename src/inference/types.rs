use serde::{Deserialize, Serialize};

/// Role of a chat message, in the OpenAI/Ollama wire spelling.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a chat request. Both supported providers share this shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Wraps the raw question in the user-message template.
pub fn format_question(question: &str) -> String {
    format!("Question:{question}")
}

/// The two-message prompt sent for every question: persona directive, then question.
pub fn prompt_messages(system_prompt: &str, question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(format_question(question)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_messages_order_and_template() {
        let messages = prompt_messages("be helpful", "how do I sort a dict?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "be helpful");
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "Question:how do I sort a dict?");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}

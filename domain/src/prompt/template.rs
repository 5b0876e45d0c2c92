//! Prompt templates for the fusion and answer flow

/// Exact reply the tutor gives for topics outside the indexed material.
///
/// Answers equal to this string are recorded in the unsupported-topic log.
pub const UNSUPPORTED_TOPIC_REPLY: &str =
    "❌ Sorry, this topic is not supported yet. Please wait for an update.";

/// Exact reply the tutor gives when the context is insufficient.
pub const INSUFFICIENT_INFO_REPLY: &str =
    "I don’t have enough information in my training material to answer that.";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt asking for `count` diversified retrieval queries.
    pub fn diversify_system(question: &str, count: usize) -> String {
        format!(
            r#"You generate retrieval queries for a tutorial and documentation Q&A system.
The queries are used to find relevant tutorial snippets and code examples.

Given the learner's question, write {count} different short queries that keep the same intent
but vary the wording or the focus.

Keep each query under 15 words.
Write one query per line. Do not number them and do not add explanations.

Question: {question}
Queries:"#
        )
    }

    /// System prompt asking for a hypothetical tutorial snippet answering the question.
    pub fn hyde_system(question: &str) -> String {
        format!(
            r#"You write a short, plausible tutorial-style explanation or code snippet
that could answer the learner's question. It is used only to search for similar material.

Question: {question}
Hypothetical answer:"#
        )
    }

    /// Instructions for the grounded tutor answer.
    pub fn tutor_instructions() -> String {
        format!(
            r#"You are a coding tutorial assistant. You help learners understand programming
concepts, work through exercises and build confidence, using only the context documents provided.

Source discipline:
- Answer only from the given context. Do not add outside knowledge or guesses.

Fixed replies (use them verbatim, never rephrase):
- For a topic the material does not cover, reply exactly: {unsupported}
- When the context does not contain enough to answer, reply exactly: {insufficient}

Style:
- Use Markdown: headings, lists and fenced code blocks.
- Organize tutorials as Introduction, Examples, Practice.
- Prefer examples, mini-projects and exercises over theory.
- Keep answers short enough for a chat window.

Tone:
- Friendly, patient and professional. Explain jargon only when the context uses it.
- Encourage the learner to try the next step."#,
            unsupported = UNSUPPORTED_TOPIC_REPLY,
            insufficient = INSUFFICIENT_INFO_REPLY,
        )
    }

    /// Full answer prompt: instructions, retrieved context, history and task.
    ///
    /// Empty sections are replaced with a marker the model is told to report,
    /// so a missing context is visible in the answer instead of silently ignored.
    pub fn answer_prompt(instructions: &str, context: &str, history: &str, question: &str) -> String {
        let context = non_empty_or(
            context,
            r#"No context was retrieved. If you see this, respond: "There is no context here"."#,
        );
        let history = non_empty_or(history, "(no previous messages)");

        format!(
            r#"{instructions}

Context:
{context}

History:
{history}

Task: {question}
"#
        )
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

use thiserror::Error;

/// Prompt used by the retrieval QA chain when all retrieved segments are
/// stuffed into one request.
pub const RETRIEVAL_QA_PROMPT: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n\
{context}\n\n\
Question: {question}\n\
Helpful Answer:";

pub const MANUAL_QA_PROMPT: &str = "You are a helpful assistant. Use the context below to answer the question.\n\n\
Context:\n{context}\n\n\
Question: {question}\n\
Answer:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Missing value for prompt variable: {0}")]
    MissingVariable(String),
}

/// A template with `{name}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    pub fn from_template(template: &str) -> Self {
        Self {
            template: template.to_string(),
            variables: find_variables(template),
        }
    }

    /// Renders the template in one pass, so placeholders that appear inside
    /// substituted values are left untouched.
    pub fn format(&self, values: &[(&str, &str)]) -> Result<String, PromptError> {
        if let Some(missing) = self
            .variables
            .iter()
            .find(|var| !values.iter().any(|(name, _)| *name == var.as_str()))
        {
            return Err(PromptError::MissingVariable(missing.clone()));
        }

        let mut rendered = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substitution = placeholder(after).and_then(|name| {
                values
                    .iter()
                    .find(|(var, _)| *var == name)
                    .map(|(_, value)| (name.len(), *value))
            });

            match substitution {
                Some((len, value)) => {
                    rendered.push_str(value);
                    rest = &after[len + 1..];
                }
                None => {
                    rendered.push('{');
                    rest = after;
                }
            }
        }
        rendered.push_str(rest);

        Ok(rendered)
    }
}

/// The identifier between an opening brace (already consumed) and the next
/// closing brace, if that is what follows.
fn placeholder(after_open: &str) -> Option<&str> {
    let close = after_open.find('}')?;
    let name = &after_open[..close];
    let is_identifier =
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_identifier.then_some(name)
}

fn find_variables(template: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rest = &rest[open + 1..];
        if let Some(name) = placeholder(rest) {
            if !variables.iter().any(|v| v == name) {
                variables.push(name.to_string());
            }
            rest = &rest[name.len() + 1..];
        }
    }

    variables
}

use crate::llm::semantic_search::Retriever;
use crate::providers::traits::CompletionProvider;
use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

const DEFAULT_MAX_ITERATIONS: usize = 5;
const PDF_TOOL_RESULTS: usize = 3;

/// Something the agent can call with a text argument.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    async fn call(&self, input: &str) -> Result<String>;
}

/// Looks up the indexed document and returns the best matching passages.
pub struct PdfSearchTool {
    retriever: Retriever,
}

impl PdfSearchTool {
    pub fn new(retriever: Retriever) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Tool for PdfSearchTool {
    fn name(&self) -> &str {
        "query_pdf"
    }

    fn description(&self) -> &str {
        "Query the local PDF for relevant information."
    }

    async fn call(&self, input: &str) -> Result<String> {
        let docs = self.retriever.invoke(input).await?;
        Ok(docs
            .iter()
            .take(PDF_TOOL_RESULTS)
            .map(|d| d.page_content.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[derive(Debug, Clone)]
pub struct AgentStep {
    pub tool: String,
    pub tool_input: String,
    pub observation: String,
}

#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub output: String,
    pub steps: Vec<AgentStep>,
    /// False when the iteration cap stopped the loop.
    pub finished: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Decision {
    Final(String),
    Act { tool: String, input: String },
}

/// A ReAct-style loop: the model either names a tool and its input, or gives
/// a final answer.
pub struct Agent {
    llm: Arc<dyn CompletionProvider>,
    tools: Vec<Box<dyn Tool>>,
    max_iterations: usize,
}

impl Agent {
    pub fn new(llm: Arc<dyn CompletionProvider>, tools: Vec<Box<dyn Tool>>) -> Self {
        Self {
            llm,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub async fn run(&self, input: &str) -> Result<AgentOutcome> {
        let mut steps: Vec<AgentStep> = Vec::new();

        for iteration in 0..self.max_iterations {
            let prompt = self.render_prompt(input, &steps);
            let generation = self.llm.complete(&prompt).await?;
            debug!("Agent iteration {}: {:?}", iteration, generation);

            match parse_decision(&generation) {
                Decision::Final(output) => {
                    info!("Agent finished after {} tool call(s)", steps.len());
                    return Ok(AgentOutcome {
                        output,
                        steps,
                        finished: true,
                    });
                }
                Decision::Act { tool, input: tool_input } => {
                    let observation = self.run_tool(&tool, &tool_input).await;
                    steps.push(AgentStep {
                        tool,
                        tool_input,
                        observation,
                    });
                }
            }
        }

        warn!("Agent stopped after {} iterations", self.max_iterations);
        let output = steps
            .last()
            .map(|s| s.observation.clone())
            .unwrap_or_default();
        Ok(AgentOutcome {
            output,
            steps,
            finished: false,
        })
    }

    async fn run_tool(&self, name: &str, input: &str) -> String {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            return format!(
                "{} is not a valid tool, try one of [{}].",
                name,
                self.tool_names().join(", ")
            );
        };

        match tool.call(input).await {
            Ok(observation) => observation,
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                format!("Tool {} failed: {}", name, e)
            }
        }
    }

    fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    fn render_prompt(&self, input: &str, steps: &[AgentStep]) -> String {
        let tools = self
            .tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n");

        let mut prompt = format!(
            "Answer the following question as best you can. You have access to the following tools:\n\n\
             {}\n\n\
             Use the following format:\n\n\
             Question: the input question you must answer\n\
             Thought: you should always think about what to do\n\
             Action: the action to take, should be one of [{}]\n\
             Action Input: the input to the action\n\
             Observation: the result of the action\n\
             ... (this Thought/Action/Action Input/Observation can repeat N times)\n\
             Thought: I now know the final answer\n\
             Final Answer: the final answer to the original input question\n\n\
             Begin!\n\n\
             Question: {}\n",
            tools,
            self.tool_names().join(", "),
            input
        );

        for step in steps {
            prompt.push_str(&format!(
                "Action: {}\nAction Input: {}\nObservation: {}\n",
                step.tool, step.tool_input, step.observation
            ));
        }
        prompt.push_str("Thought:");
        prompt
    }
}

fn parse_decision(generation: &str) -> Decision {
    if let Some(idx) = generation.find("Final Answer:") {
        let answer = generation[idx + "Final Answer:".len()..].trim();
        return Decision::Final(answer.to_string());
    }

    let field = |label: &str| {
        generation
            .lines()
            .find_map(|line| line.trim().strip_prefix(label))
            .map(|rest| rest.trim().trim_matches('"').to_string())
    };

    match (field("Action:"), field("Action Input:")) {
        (Some(tool), Some(input)) if !tool.is_empty() => Decision::Act { tool, input },
        // small seq2seq models often answer directly
        _ => Decision::Final(generation.trim().to_string()),
    }
}

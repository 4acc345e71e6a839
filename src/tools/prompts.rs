//! Reusable prompt templates exposed through `prompts/list` and `prompts/get`.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    #[serde(skip)]
    pub default: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

pub fn templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate {
            name: "code_review",
            description: "Generate a code review prompt template.",
            arguments: vec![
                PromptArgument {
                    name: "language",
                    description: "Programming language of the code under review",
                    required: false,
                    default: "Python",
                },
                PromptArgument {
                    name: "focus",
                    description: "Aspect to focus the review on",
                    required: false,
                    default: "general",
                },
            ],
        },
        PromptTemplate {
            name: "reasoning_task",
            description: "Generate a reasoning task prompt template.",
            arguments: vec![PromptArgument {
                name: "task_type",
                description: "Kind of task that needs careful reasoning",
                required: false,
                default: "analysis",
            }],
        },
    ]
}

fn arg<'a>(args: &'a Map<String, Value>, template: &PromptTemplate, name: &str) -> &'a str {
    args.get(name).and_then(Value::as_str).unwrap_or_else(|| {
        template
            .arguments
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.default)
            .unwrap_or_default()
    })
}

/// Render the named template. Missing arguments take their defaults;
/// unknown template names yield `None`.
pub fn render(name: &str, args: &Map<String, Value>) -> Option<String> {
    let template = templates().into_iter().find(|t| t.name == name)?;
    let text = match name {
        "code_review" => {
            let language = arg(args, &template, "language");
            let focus = arg(args, &template, "focus");
            format!(
                "You are an expert {language} code reviewer. Please review the provided code with a focus on {focus}.\n\
                 \n\
                 Consider:\n\
                 1. Code quality and readability\n\
                 2. Performance implications\n\
                 3. Security concerns\n\
                 4. Best practices\n\
                 5. Potential bugs or edge cases\n\
                 \n\
                 Provide constructive feedback with specific suggestions for improvement."
            )
        }
        "reasoning_task" => {
            let task_type = arg(args, &template, "task_type");
            format!(
                "You are tasked with a {task_type} that requires careful reasoning.\n\
                 \n\
                 Please:\n\
                 1. Break down the problem into clear components\n\
                 2. Consider multiple perspectives or approaches\n\
                 3. Apply logical reasoning step by step\n\
                 4. Identify any assumptions being made\n\
                 5. Provide a well-reasoned conclusion\n\
                 \n\
                 Be thorough and explain your reasoning process clearly."
            )
        }
        _ => return None,
    };
    Some(text)
}

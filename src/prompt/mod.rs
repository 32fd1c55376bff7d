//! Every prompt and instruction string sent to the model.

pub fn system_prompt_plan() -> String {
r#"You are Fresh, the orchestrator. Your job is to split a project description into concrete, step-by-step subtasks.
Each subtask must name the language to use ("python", "nodejs" or "rust"), the name of the file to generate (a path relative to the project root), and a short description of what that file must contain.
Respond ONLY with a JSON list of objects, no prose and no markdown. For example:
[{"language": "python", "filename": "main.py", "description": "Main script that manages ..."}, {"language": "nodejs", "filename": "server.js", "description": "Express server that ..."}]"#
        .to_string()
}

pub fn user_prompt_plan(project: &str) -> String {
    format!("Project description: {project}\nGenerate the task plan.")
}

pub const CONTENT_INSTRUCTIONS: &str = "Generate the content without any extra delimiters.";

pub fn user_prompt_content(expertise: &str, code_kind: &str, filename: &str, project: &str, task: &str) -> String {
    format!(
        "You are an expert in {expertise}. Generate the content of the file '{filename}' for a project with the following description: {project}. \
         The purpose of this file is: {task}. \
         The content must be working, well-commented {code_kind} code. Respond only with the content of the file."
    )
}

pub const IMPROVE_INSTRUCTIONS: &str = "Generate the improved code without any extra delimiters.";

pub fn user_prompt_improve(label: &str, original: &str) -> String {
    format!(
        "You are an expert in {label} development. Improve and optimize the following code, \
         adding explanatory comments and fixing possible bugs. \
         Return only the improved code without delimiters.\n\n{original}"
    )
}

pub fn placeholder(filename: &str, description: &str) -> String {
    format!("// Content for {filename}: {description}")
}

use colored::Colorize;

use crate::errors::FreshError;
use crate::fence::strip_fences;
use crate::gateway::Gateway;
use crate::prompt;
use crate::wire::Subtask;

const TARGET: &str = "orchestrator";

pub struct Planner<'a> {
    gw: &'a Gateway,
}

impl<'a> Planner<'a> {
    pub fn new(gw: &'a Gateway) -> Self {
        Self { gw }
    }

    /// Ordered subtasks for `project`, or an empty plan when the model call or
    /// the parse fails. The failure is recorded in the history.
    pub async fn plan(&self, project: &str) -> Vec<Subtask> {
        match self.try_plan(project).await {
            Ok(tasks) => tasks,
            Err(e) => {
                let msg = format!("Error in orchestrator: {e}");
                tracing::warn!(kind = %e.kind(), "{msg}");
                self.gw.memory().record(&msg);
                println!("{} {msg}", "✗".red());
                Vec::new()
            }
        }
    }

    pub async fn try_plan(&self, project: &str) -> Result<Vec<Subtask>, FreshError> {
        let user = prompt::user_prompt_plan(project);
        let memory = self.gw.memory();
        memory.record(&format!("Orchestrator - Prompt:\n{user}"));

        let raw = self.gw.generate(TARGET, &user, &prompt::system_prompt_plan()).await?;
        memory.record(&format!("Orchestrator - Response:\n{raw}"));

        parse_plan(&raw)
    }
}

pub fn parse_plan(raw: &str) -> Result<Vec<Subtask>, FreshError> {
    let cleaned = strip_fences(raw.trim());
    serde_json::from_str(&cleaned).map_err(|e| FreshError::parse(TARGET, e))
}

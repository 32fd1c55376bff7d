use crate::errors::FreshError;
use crate::fence::strip_fences;
use crate::gateway::Gateway;
use crate::prompt;
use crate::wire::Language;

/// What the content prompt needs to know about a target language.
#[derive(Debug)]
pub struct LanguageProfile {
    pub language: Language,
    /// Display name used in history records, e.g. "Node.js".
    pub name: &'static str,
    pub expertise: &'static str,
    pub code_kind: &'static str,
}

pub static PROFILES: [LanguageProfile; 3] = [
    LanguageProfile {
        language: Language::Python,
        name: "Python",
        expertise: "Python development",
        code_kind: "Python",
    },
    LanguageProfile {
        language: Language::NodeJs,
        name: "Node.js",
        expertise: "web development with Node.js",
        code_kind: "JavaScript/Node.js",
    },
    LanguageProfile {
        language: Language::Rust,
        name: "Rust",
        expertise: "Rust development",
        code_kind: "Rust",
    },
];

/// `None` for languages without a generator; callers write a placeholder instead.
pub fn profile_for(lang: &Language) -> Option<&'static LanguageProfile> {
    PROFILES.iter().find(|p| &p.language == lang)
}

/// Language label for files the updater rewrites, keyed on extension.
pub fn label_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "py" => Some("Python"),
        "js" | "jsx" => Some("Node.js"),
        "rs" => Some("Rust"),
        _ => None,
    }
}

/// Per-file model calls. Every prompt and cleaned response goes into the
/// history; failures are recorded there too before being handed back.
pub struct ContentGenerator<'a> {
    gw: &'a Gateway,
}

impl<'a> ContentGenerator<'a> {
    pub fn new(gw: &'a Gateway) -> Self {
        Self { gw }
    }

    pub fn gateway(&self) -> &Gateway {
        self.gw
    }

    /// Contents for a new file. The caller decides what to write on `Err`;
    /// the error has already been recorded.
    pub async fn generate_content(
        &self,
        profile: &LanguageProfile,
        filename: &str,
        task: &str,
        project: &str,
    ) -> Result<String, FreshError> {
        let user = prompt::user_prompt_content(profile.expertise, profile.code_kind, filename, project, task);
        let memory = self.gw.memory();
        memory.record(&format!("{} agent - Prompt for {filename}:\n{user}", profile.name));

        match self.gw.generate(filename, &user, prompt::CONTENT_INSTRUCTIONS).await {
            Ok(raw) => {
                let content = strip_fences(raw.trim());
                memory.record(&format!("{} agent - Response for {filename}:\n{content}", profile.name));
                Ok(content)
            }
            Err(e) => {
                let msg = format!("Error generating content for {filename} in {}: {e}", profile.name);
                tracing::warn!(file = filename, language = profile.name, kind = %e.kind(), "{msg}");
                memory.record(&msg);
                Err(e)
            }
        }
    }

    /// Improved, commented version of `original`. `path` is only used for
    /// attribution in the history.
    pub async fn improve(&self, label: &str, path: &str, original: &str) -> Result<String, FreshError> {
        let user = prompt::user_prompt_improve(label, original);
        let memory = self.gw.memory();
        memory.record(&format!("Updater agent - Prompt for {path}:\n{user}"));

        match self.gw.generate(path, &user, prompt::IMPROVE_INSTRUCTIONS).await {
            Ok(raw) => {
                let improved = strip_fences(raw.trim());
                memory.record(&format!("Updater agent - Response for {path}:\n{improved}"));
                Ok(improved)
            }
            Err(e) => {
                let msg = format!("Error updating {path} in {label}: {e}");
                tracing::warn!(file = path, language = label, kind = %e.kind(), "{msg}");
                memory.record(&msg);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::provider::mock::MockProvider;
    use fs_err as fs;

    #[test]
    fn profiles_cover_the_three_languages() {
        assert_eq!(profile_for(&Language::Python).unwrap().name, "Python");
        assert_eq!(profile_for(&Language::from("NodeJS")).unwrap().code_kind, "JavaScript/Node.js");
        assert_eq!(profile_for(&Language::Rust).unwrap().name, "Rust");
        assert!(profile_for(&Language::from("cobol")).is_none());
    }

    #[test]
    fn extension_labels() {
        assert_eq!(label_for_extension("py"), Some("Python"));
        assert_eq!(label_for_extension("JSX"), Some("Node.js"));
        assert_eq!(label_for_extension("js"), Some("Node.js"));
        assert_eq!(label_for_extension("rs"), Some("Rust"));
        assert_eq!(label_for_extension("ts"), None);
    }

    #[tokio::test]
    async fn content_is_cleaned_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::isolated(dir.path());
        let mock = MockProvider::new().reply("```python\nprint('hi')\n```\n");
        let gw = Gateway::new(Box::new(mock.clone()), &cfg);
        let gen = ContentGenerator::new(&gw);

        let out = gen
            .generate_content(profile_for(&Language::Python).unwrap(), "main.py", "entry point", "a CLI calculator")
            .await
            .unwrap();
        assert_eq!(out, "print('hi')");

        let req = &mock.requests()[0];
        assert_eq!(req.instructions, prompt::CONTENT_INSTRUCTIONS);
        assert!(req.input.contains("'main.py'"));
        assert!(req.input.contains("a CLI calculator"));

        let history = fs::read_to_string(&cfg.history_path).unwrap();
        assert!(history.contains("Python agent - Prompt for main.py:"));
        assert!(history.contains("Python agent - Response for main.py:\nprint('hi')"));
    }

    #[tokio::test]
    async fn failure_is_recorded_and_returned() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::isolated(dir.path());
        let gw = Gateway::new(Box::new(MockProvider::new().fail("connection reset")), &cfg);
        let gen = ContentGenerator::new(&gw);

        let err = gen
            .generate_content(profile_for(&Language::NodeJs).unwrap(), "server.js", "api", "shop")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Transport);

        let history = fs::read_to_string(&cfg.history_path).unwrap();
        assert!(history.contains("Error generating content for server.js in Node.js:"));
        assert!(history.contains("connection reset"));
    }

    #[tokio::test]
    async fn improve_strips_fences() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::isolated(dir.path());
        let mock = MockProvider::new().reply("```rust\nfn main() { println!(\"hi\"); }\n```");
        let gw = Gateway::new(Box::new(mock.clone()), &cfg);

        let out = ContentGenerator::new(&gw).improve("Rust", "src/main.rs", "fn main(){}").await.unwrap();
        assert_eq!(out, "fn main() { println!(\"hi\"); }");
        assert_eq!(mock.requests()[0].instructions, prompt::IMPROVE_INSTRUCTIONS);
        assert!(mock.requests()[0].input.ends_with("fn main(){}"));
    }
}

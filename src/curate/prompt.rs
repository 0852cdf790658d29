// src/curate/prompt.rs
//! Persona/instruction template, kept outside the code so it can be versioned
//! and swapped per deployment.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_PROMPT_PATH: &str = "DIGEST_PROMPT_PATH";
pub const DEFAULT_PROMPT_PATH: &str = "config/prompt.toml";

/// Replaced by the serialized candidate block in `user`.
pub const PAPERS_PLACEHOLDER: &str = "{papers}";

const DEFAULT_SYSTEM: &str = "\
You are a senior researcher working at the intersection of spatial perception \
(SLAM, 3D scene graphs, certifiable estimation) and embodied AI.
You read new arXiv listings every morning and brief a colleague who works on \
robot perception.

Selection criteria:
- Mathematical rigor: clear problem formulation, guarantees or careful error analysis.
- Practical embodied AI: results that would change how a real robot perceives or acts.
- Prefer papers with real-world experiments over purely simulated ones.

Output structure:
1. Pick the 3 most important papers from the list, ranked.
2. For each: title, link, a two-sentence summary, why it matters, and one honest critique.
3. End with one line naming any paper you skipped that deserves a second look.

Terminology: keep technical terms (SLAM, NeRF, scene graph, VLM, ...) in English. \
Do not invent papers or links that are not in the list.";

const DEFAULT_USER: &str = "Here are today's candidate papers:\n\n{papers}";

const DEFAULT_FOLLOW_UP: &str = "\
Based on the papers you just selected, write exactly one research question that \
connects them and that would be worth an afternoon of thought. Output only the question.";

const DEFAULT_SEPARATOR: &str = "---------- Insight question ----------";

fn default_user() -> String {
    DEFAULT_USER.to_string()
}
fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptTemplate {
    /// Persona + selection criteria + required output structure.
    pub system: String,
    /// User message; `{papers}` marks where the candidate block goes.
    #[serde(default = "default_user")]
    pub user: String,
    /// Second request asking for one distilled question. `None` skips it.
    #[serde(default)]
    pub follow_up: Option<String>,
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM.to_string(),
            user: default_user(),
            follow_up: Some(DEFAULT_FOLLOW_UP.to_string()),
            separator: default_separator(),
        }
    }
}

impl PromptTemplate {
    /// Fill the user template. Without a placeholder the block is appended.
    pub fn render_user(&self, papers_block: &str) -> String {
        if self.user.contains(PAPERS_PLACEHOLDER) {
            self.user.replace(PAPERS_PLACEHOLDER, papers_block)
        } else if self.user.trim().is_empty() {
            papers_block.to_string()
        } else {
            format!("{}\n\n{}", self.user.trim_end(), papers_block)
        }
    }

    /// Follow-up prompt, if configured and non-blank.
    pub fn follow_up(&self) -> Option<&str> {
        self.follow_up
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

pub fn load_prompt_from(path: &Path) -> Result<PromptTemplate> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading prompt template from {}", path.display()))?;
    let tpl: PromptTemplate = toml::from_str(&content)
        .with_context(|| format!("parsing prompt template {}", path.display()))?;
    if tpl.system.trim().is_empty() {
        return Err(anyhow!("prompt template {} has an empty `system`", path.display()));
    }
    Ok(tpl)
}

/// Load using env var + fallbacks:
/// 1) $DIGEST_PROMPT_PATH
/// 2) config/prompt.toml
/// 3) built-in persona
pub fn load_prompt_default() -> Result<PromptTemplate> {
    if let Ok(p) = std::env::var(ENV_PROMPT_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_prompt_from(&pb);
        }
        return Err(anyhow!("{ENV_PROMPT_PATH} points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_PROMPT_PATH);
    if default.exists() {
        return load_prompt_from(&default);
    }
    Ok(PromptTemplate::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn placeholder_is_replaced() {
        let tpl = PromptTemplate::default();
        let out = tpl.render_user("Title: A");
        assert!(out.ends_with("Title: A"));
        assert!(!out.contains(PAPERS_PLACEHOLDER));
    }

    #[test]
    fn missing_placeholder_appends_block() {
        let tpl = PromptTemplate {
            user: "Rank these:".into(),
            ..PromptTemplate::default()
        };
        assert_eq!(tpl.render_user("Title: A"), "Rank these:\n\nTitle: A");
    }

    #[test]
    fn blank_follow_up_is_skipped() {
        let tpl = PromptTemplate {
            follow_up: Some("   ".into()),
            ..PromptTemplate::default()
        };
        assert!(tpl.follow_up().is_none());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_PROMPT_PATH);

        assert_eq!(load_prompt_default().unwrap(), PromptTemplate::default());

        let p = tmp.path().join("persona.toml");
        fs::write(&p, "system = \"You are terse.\"\n").unwrap();
        env::set_var(ENV_PROMPT_PATH, p.display().to_string());
        let tpl = load_prompt_default().unwrap();
        assert_eq!(tpl.system, "You are terse.");
        assert!(tpl.follow_up.is_none());
        assert_eq!(tpl.user, DEFAULT_USER);

        env::set_var(ENV_PROMPT_PATH, tmp.path().join("nope.toml").display().to_string());
        assert!(load_prompt_default().is_err());
        env::remove_var(ENV_PROMPT_PATH);

        env::set_current_dir(&old).unwrap();
    }
}

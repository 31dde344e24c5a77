//! Strength-tag trigger table and task tokenization.
//!
//! [`STRENGTH_TRIGGERS`] is the single authoritative mapping from free text to
//! capability. A strength tag matches a task when at least one of its trigger
//! keywords appears as a whole token in the task text. Matching is exact and
//! case-insensitive; inflected forms that should match are listed explicitly.
//!
//! | Strength tag | Trigger keywords |
//! |---|---|
//! | `search-grounding` | research, search, web, latest, current, browse, lookup, news |
//! | `real-time-data` | realtime, live, today, current, trending |
//! | `git-integration` | git, commit, commits, refactor, repository, repo, branch, merge, rebase |
//! | `diff-handling` | diff, diffs, patch, patches |
//! | `code-editing` | edit, edits, modify, rename, rewrite |
//! | `repo-mapping` | codebase, repomap, structure, navigate |
//! | `architect-mode` | architect, blueprint |
//! | `deep-reasoning` | design, architecture, algorithm, complex, reason, reasoning, analyze, tradeoff, prove |
//! | `coding` | code, program, implement, debug, function, class |
//! | `long-context` | long, document, documents, transcript |
//! | `structured-output` | json, schema, structured, yaml |
//! | `file-operations` | file, files, directory, folder |
//! | `multi-step-planning` | plan, planning, roadmap, steps |
//! | `quick-focused-edits` | quick, small, typo, tweak, oneliner |
//! | `sandboxed-execution` | sandbox, safe, isolated, autonomous, untrusted |
//! | `natural-language-parsing` | parse, translate, natural |
//! | `fast-turnaround` | fast, quickly, asap, urgent |
//! | `image-generation` | image, images, picture, logo, illustration, diagram |
//! | `massive-context-1m+` | massive, huge, entire, monorepo |
//! | `web-development` | frontend, html, css, website, react, ui |
//! | `multimodal` | multimodal, video, audio, screenshot, photo |
//! | `autonomous-operation` | autonomous, unattended, automate, automation |
//! | `autonomous-workflow` | autonomous, workflow, automate, pipeline, deploy |
//! | `multi-step-workflows` | workflow, workflows, pipeline, multistep, orchestrate, ci, cd |
//! | `recipe-automation` | recipe, recipes, playbook |
//! | `toolkit-extensibility` | toolkit, extension, plugin, integrate |
//! | `error-recovery` | recover, recovery, retry, resilient, flaky |
//! | `research` | research, investigate, competitor, market, survey, study |
//! | `data-collection` | collect, scrape, gather, crawl, dataset |
//! | `web-reading` | read, article, articles, page, pages |
//! | `small-apps` | app, prototype, mvp |
//! | `synthesis` | synthesize, summarize, summary, compare, report |

use serde::Serialize;
use std::collections::BTreeSet;

/// One row of the trigger table: a strength tag and the keywords that select it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrengthTrigger {
    /// Normalized strength tag.
    pub tag: &'static str,
    /// Lower-case single-token keywords.
    pub keywords: &'static [&'static str],
}

/// The strength trigger table. Keep the module docs in sync when editing.
pub const STRENGTH_TRIGGERS: &[StrengthTrigger] = &[
    StrengthTrigger {
        tag: "search-grounding",
        keywords: &["research", "search", "web", "latest", "current", "browse", "lookup", "news"],
    },
    StrengthTrigger {
        tag: "real-time-data",
        keywords: &["realtime", "live", "today", "current", "trending"],
    },
    StrengthTrigger {
        tag: "git-integration",
        keywords: &[
            "git", "commit", "commits", "refactor", "repository", "repo", "branch", "merge",
            "rebase",
        ],
    },
    StrengthTrigger { tag: "diff-handling", keywords: &["diff", "diffs", "patch", "patches"] },
    StrengthTrigger {
        tag: "code-editing",
        keywords: &["edit", "edits", "modify", "rename", "rewrite"],
    },
    StrengthTrigger {
        tag: "repo-mapping",
        keywords: &["codebase", "repomap", "structure", "navigate"],
    },
    StrengthTrigger { tag: "architect-mode", keywords: &["architect", "blueprint"] },
    StrengthTrigger {
        tag: "deep-reasoning",
        keywords: &[
            "design",
            "architecture",
            "algorithm",
            "complex",
            "reason",
            "reasoning",
            "analyze",
            "tradeoff",
            "prove",
        ],
    },
    StrengthTrigger {
        tag: "coding",
        keywords: &["code", "program", "implement", "debug", "function", "class"],
    },
    StrengthTrigger {
        tag: "long-context",
        keywords: &["long", "document", "documents", "transcript"],
    },
    StrengthTrigger {
        tag: "structured-output",
        keywords: &["json", "schema", "structured", "yaml"],
    },
    StrengthTrigger {
        tag: "file-operations",
        keywords: &["file", "files", "directory", "folder"],
    },
    StrengthTrigger {
        tag: "multi-step-planning",
        keywords: &["plan", "planning", "roadmap", "steps"],
    },
    StrengthTrigger {
        tag: "quick-focused-edits",
        keywords: &["quick", "small", "typo", "tweak", "oneliner"],
    },
    StrengthTrigger {
        tag: "sandboxed-execution",
        keywords: &["sandbox", "safe", "isolated", "autonomous", "untrusted"],
    },
    StrengthTrigger {
        tag: "natural-language-parsing",
        keywords: &["parse", "translate", "natural"],
    },
    StrengthTrigger {
        tag: "fast-turnaround",
        keywords: &["fast", "quickly", "asap", "urgent"],
    },
    StrengthTrigger {
        tag: "image-generation",
        keywords: &["image", "images", "picture", "logo", "illustration", "diagram"],
    },
    StrengthTrigger {
        tag: "massive-context-1m+",
        keywords: &["massive", "huge", "entire", "monorepo"],
    },
    StrengthTrigger {
        tag: "web-development",
        keywords: &["frontend", "html", "css", "website", "react", "ui"],
    },
    StrengthTrigger {
        tag: "multimodal",
        keywords: &["multimodal", "video", "audio", "screenshot", "photo"],
    },
    StrengthTrigger {
        tag: "autonomous-operation",
        keywords: &["autonomous", "unattended", "automate", "automation"],
    },
    StrengthTrigger {
        tag: "autonomous-workflow",
        keywords: &["autonomous", "workflow", "automate", "pipeline", "deploy"],
    },
    StrengthTrigger {
        tag: "multi-step-workflows",
        keywords: &["workflow", "workflows", "pipeline", "multistep", "orchestrate", "ci", "cd"],
    },
    StrengthTrigger { tag: "recipe-automation", keywords: &["recipe", "recipes", "playbook"] },
    StrengthTrigger {
        tag: "toolkit-extensibility",
        keywords: &["toolkit", "extension", "plugin", "integrate"],
    },
    StrengthTrigger {
        tag: "error-recovery",
        keywords: &["recover", "recovery", "retry", "resilient", "flaky"],
    },
    StrengthTrigger {
        tag: "research",
        keywords: &["research", "investigate", "competitor", "market", "survey", "study"],
    },
    StrengthTrigger {
        tag: "data-collection",
        keywords: &["collect", "scrape", "gather", "crawl", "dataset"],
    },
    StrengthTrigger {
        tag: "web-reading",
        keywords: &["read", "article", "articles", "page", "pages"],
    },
    StrengthTrigger { tag: "small-apps", keywords: &["app", "prototype", "mvp"] },
    StrengthTrigger {
        tag: "synthesis",
        keywords: &["synthesize", "summarize", "summary", "compare", "report"],
    },
];

/// Returns the trigger keywords for a strength tag, if the tag is known.
pub fn triggers_for(tag: &str) -> Option<&'static [&'static str]> {
    let tag = tag.trim().to_lowercase();
    STRENGTH_TRIGGERS.iter().find(|t| t.tag == tag).map(|t| t.keywords)
}

/// Whether the tag has an entry in [`STRENGTH_TRIGGERS`].
pub fn is_known_tag(tag: &str) -> bool {
    triggers_for(tag).is_some()
}

/// Case-insensitive set of whole-word tokens taken from a task description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    /// Normalizes free text into its token set.
    pub fn from_text(text: &str) -> Self {
        Self(tokenize(text).collect())
    }

    /// Builds a token set from already-normalized keywords.
    pub fn from_keywords(keywords: &[&str]) -> Self {
        Self(keywords.iter().map(|k| (*k).to_string()).collect())
    }

    /// Whether the token is present.
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// Adds every token of `other`.
    pub fn extend(&mut self, other: &TokenSet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Whether any of the keywords is present.
    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.contains(k))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }
}

/// Splits text into lower-case alphanumeric tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()).map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tokenize_lowercases_and_splits_punctuation() {
        let tokens: Vec<String> = tokenize("Find LATEST Python 3.13 features!").collect();
        assert_eq!(tokens, vec!["find", "latest", "python", "3", "13", "features"]);
    }

    #[test]
    fn test_token_set_is_whole_word() {
        let tokens = TokenSet::from_text("Research the web");
        assert!(tokens.contains("research"));
        assert!(tokens.contains("web"));
        assert!(!tokens.contains("search"));
    }

    #[test]
    fn test_table_tags_are_unique() {
        let mut seen = HashSet::new();
        for trigger in STRENGTH_TRIGGERS {
            assert!(seen.insert(trigger.tag), "duplicate tag {}", trigger.tag);
        }
    }

    #[test]
    fn test_table_keywords_are_single_lowercase_tokens() {
        for trigger in STRENGTH_TRIGGERS {
            assert!(!trigger.keywords.is_empty(), "{} has no keywords", trigger.tag);
            for keyword in trigger.keywords {
                let tokens: Vec<String> = tokenize(keyword).collect();
                assert_eq!(tokens, vec![(*keyword).to_string()], "bad keyword {keyword:?}");
            }
        }
    }

    #[test]
    fn test_tags_are_normalized() {
        for trigger in STRENGTH_TRIGGERS {
            assert_eq!(trigger.tag, trigger.tag.trim().to_lowercase());
        }
    }

    #[test]
    fn test_documented_core_mappings() {
        let search = triggers_for("search-grounding").unwrap();
        for kw in ["research", "search", "web", "latest", "current", "browse"] {
            assert!(search.contains(&kw));
        }
        let git = triggers_for("git-integration").unwrap();
        for kw in ["git", "commit", "refactor", "repository"] {
            assert!(git.contains(&kw));
        }
        let reasoning = triggers_for("deep-reasoning").unwrap();
        for kw in ["design", "architecture", "algorithm", "complex"] {
            assert!(reasoning.contains(&kw));
        }
        let sandbox = triggers_for("sandboxed-execution").unwrap();
        for kw in ["sandbox", "safe", "isolated", "autonomous"] {
            assert!(sandbox.contains(&kw));
        }
    }

    #[test]
    fn test_triggers_for_is_case_insensitive() {
        assert!(triggers_for("Git-Integration").is_some());
        assert!(!is_known_tag("teleportation"));
    }
}

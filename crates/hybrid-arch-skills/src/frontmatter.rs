//! Front matter parser for `SKILL.md` files.
//!
//! Only a restricted YAML subset is understood: `key: value` scalars for
//! `name`, `description`, `version` and `author`, and `- item` lists under
//! `tags:` and `allowed-tools:`. Every other line is dropped. Parsing never
//! fails; malformed input degrades to empty metadata.

use once_cell::sync::Lazy;
use regex::Regex;

static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-\s+(.*)$").unwrap());
static KEY_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z0-9_-]+)\s*:\s*(.*?)\s*$").unwrap());

const DELIMITER: &str = "---";

/// Parsed skill front matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillFrontmatter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
    pub allowed_tools: Option<Vec<String>>,
}

#[derive(Clone, Copy)]
enum ListKey {
    Tags,
    AllowedTools,
}

impl SkillFrontmatter {
    fn list_mut(&mut self, key: ListKey) -> &mut Vec<String> {
        let slot = match key {
            ListKey::Tags => &mut self.tags,
            ListKey::AllowedTools => &mut self.allowed_tools,
        };
        slot.get_or_insert_with(Vec::new)
    }
}

/// Split a skill file into `(frontmatter, body)`.
///
/// Without an opening `---`, or without a closing line-leading `---`, the
/// whole text is returned as body with empty metadata.
pub fn parse_skill_file(content: &str) -> (SkillFrontmatter, String) {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);

    if !text.starts_with(DELIMITER) {
        return (SkillFrontmatter::default(), text.to_string());
    }

    let Some(end) = text[DELIMITER.len()..]
        .find("\n---")
        .map(|i| i + DELIMITER.len())
    else {
        return (SkillFrontmatter::default(), text.to_string());
    };

    let header = text[DELIMITER.len()..end].trim();
    let body = text[end + "\n---".len()..].trim_start().to_string();
    (parse_header(header), body)
}

fn parse_header(header: &str) -> SkillFrontmatter {
    let mut fm = SkillFrontmatter::default();
    let mut current_list: Option<ListKey> = None;

    for line in header.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(key) = current_list {
            if let Some(caps) = LIST_ITEM.captures(line) {
                let item = caps[1].trim();
                if !item.is_empty() {
                    fm.list_mut(key).push(item.to_string());
                }
                continue;
            }
        }

        let Some(caps) = KEY_VALUE.captures(line) else {
            continue;
        };
        let value = caps[2].trim();
        current_list = None;

        match &caps[1] {
            "tags" | "allowed-tools" => {
                let key = if &caps[1] == "tags" {
                    ListKey::Tags
                } else {
                    ListKey::AllowedTools
                };
                let list = fm.list_mut(key);
                list.clear();
                if !value.is_empty() && value != "[]" {
                    list.push(value.to_string());
                }
                current_list = Some(key);
            }
            "name" => fm.name = Some(value.to_string()),
            "description" => fm.description = Some(value.to_string()),
            "version" => fm.version = Some(value.to_string()),
            "author" => fm.author = Some(value.to_string()),
            _ => {}
        }
    }

    fm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_tag_list() {
        let (fm, body) = parse_skill_file("---\nname: x\ntags:\n  - p\n  - q\n---\nBODY");
        assert_eq!(fm.name.as_deref(), Some("x"));
        assert_eq!(fm.tags, Some(vec!["p".to_string(), "q".to_string()]));
        assert_eq!(body, "BODY");
    }

    #[test]
    fn test_parse_full_manifest() {
        let content = r#"---
name: review-pr
version: 2.1.0
description: Review a GitHub pull request: diff, tests, risk
author: someone
allowed-tools:
  - bash
  - read
---

# Review PR

Analyze the PR changes.
"#;
        let (fm, body) = parse_skill_file(content);
        assert_eq!(fm.name.as_deref(), Some("review-pr"));
        assert_eq!(fm.version.as_deref(), Some("2.1.0"));
        assert_eq!(
            fm.description.as_deref(),
            Some("Review a GitHub pull request: diff, tests, risk")
        );
        assert_eq!(fm.author.as_deref(), Some("someone"));
        assert_eq!(
            fm.allowed_tools,
            Some(vec!["bash".to_string(), "read".to_string()])
        );
        assert!(fm.tags.is_none());
        assert!(body.starts_with("# Review PR"));
    }

    #[test]
    fn test_without_frontmatter() {
        let content = "# Just some markdown\n\nNo frontmatter here.";
        let (fm, body) = parse_skill_file(content);
        assert_eq!(fm, SkillFrontmatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unterminated_frontmatter_is_body() {
        let content = "---\nname: x\nno closing delimiter";
        let (fm, body) = parse_skill_file(content);
        assert!(fm.name.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_inline_value_seeds_list() {
        let (fm, _) = parse_skill_file("---\ntags: solo\n  - more\nallowed-tools: []\n---\n");
        assert_eq!(fm.tags, Some(vec!["solo".to_string(), "more".to_string()]));
        assert_eq!(fm.allowed_tools, Some(vec![]));
    }

    #[test]
    fn test_unknown_and_malformed_lines_are_dropped() {
        let content = "---\nname: x\nlicense: MIT\n  - stray item\n!!garbage\ndescription: hello world\n---\nbody";
        let (fm, body) = parse_skill_file(content);
        assert_eq!(fm.name.as_deref(), Some("x"));
        assert_eq!(fm.description.as_deref(), Some("hello world"));
        assert!(fm.tags.is_none());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_bom_and_crlf() {
        let (fm, body) = parse_skill_file("\u{feff}---\r\nname: x\r\n---\r\n\r\nBody\r\n");
        assert_eq!(fm.name.as_deref(), Some("x"));
        assert_eq!(body, "Body\r\n");
    }
}

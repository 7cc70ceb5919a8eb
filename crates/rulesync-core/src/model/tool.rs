use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An AI coding assistant whose files rulesync can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    ClaudeCode,
    CodexCli,
    Copilot,
    Cursor,
    Roo,
}

impl ToolId {
    pub const ALL: [ToolId; 5] = [
        ToolId::ClaudeCode,
        ToolId::CodexCli,
        ToolId::Copilot,
        ToolId::Cursor,
        ToolId::Roo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClaudeCode => "claudecode",
            Self::CodexCli => "codexcli",
            Self::Copilot => "copilot",
            Self::Cursor => "cursor",
            Self::Roo => "roo",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownTool(s.to_string()))
    }
}

/// One entry of a canonical record's `targets` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Target {
    /// `*`: every tool.
    Wildcard,
    Tool(ToolId),
}

impl Target {
    pub const WILDCARD: &'static str = "*";

    pub fn matches(&self, tool: ToolId) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Tool(t) => *t == tool,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str(Self::WILDCARD),
            Self::Tool(t) => t.fmt(f),
        }
    }
}

impl FromStr for Target {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::WILDCARD {
            Ok(Self::Wildcard)
        } else {
            s.parse().map(Self::Tool)
        }
    }
}

impl TryFrom<String> for Target {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Target> for String {
    fn from(t: Target) -> Self {
        t.to_string()
    }
}

/// The kind of file being synchronized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Rules,
    Commands,
    Subagents,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 3] = [
        FeatureKind::Rules,
        FeatureKind::Commands,
        FeatureKind::Subagents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Commands => "commands",
            Self::Subagents => "subagents",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::UnknownFeature(s.to_string()))
    }
}

/// A `features` entry in the config file: `*` or a single kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FeatureSelector {
    All,
    Only(FeatureKind),
}

impl FeatureSelector {
    /// Expand a selector list into the distinct kinds it enables, in
    /// canonical order.
    pub fn expand(selectors: &[FeatureSelector]) -> Vec<FeatureKind> {
        FeatureKind::ALL
            .into_iter()
            .filter(|kind| {
                selectors
                    .iter()
                    .any(|s| matches!(s, Self::All) || *s == Self::Only(*kind))
            })
            .collect()
    }
}

impl FromStr for FeatureSelector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl TryFrom<String> for FeatureSelector {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FeatureSelector> for String {
    fn from(s: FeatureSelector) -> Self {
        match s {
            FeatureSelector::All => "*".to_string(),
            FeatureSelector::Only(kind) => kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_id_parse_and_display() {
        for tool in ToolId::ALL {
            assert_eq!(tool.to_string().parse::<ToolId>().unwrap(), tool);
        }
        assert!(matches!(
            "vim".parse::<ToolId>(),
            Err(CoreError::UnknownTool(name)) if name == "vim"
        ));
    }

    #[test]
    fn test_target_serde() {
        let targets: Vec<Target> = serde_json::from_str(r#"["*", "cursor"]"#).unwrap();
        assert_eq!(targets, vec![Target::Wildcard, Target::Tool(ToolId::Cursor)]);
        assert_eq!(
            serde_json::to_string(&targets).unwrap(),
            r#"["*","cursor"]"#
        );
        assert!(serde_json::from_str::<Vec<Target>>(r#"["emacs"]"#).is_err());
    }

    #[test]
    fn test_target_matches() {
        assert!(Target::Wildcard.matches(ToolId::Roo));
        assert!(Target::Tool(ToolId::Roo).matches(ToolId::Roo));
        assert!(!Target::Tool(ToolId::Roo).matches(ToolId::Cursor));
    }

    #[test]
    fn test_feature_selector_expand() {
        assert_eq!(
            FeatureSelector::expand(&[FeatureSelector::All]),
            FeatureKind::ALL.to_vec()
        );
        assert_eq!(
            FeatureSelector::expand(&[
                FeatureSelector::Only(FeatureKind::Subagents),
                FeatureSelector::Only(FeatureKind::Rules),
                FeatureSelector::Only(FeatureKind::Rules),
            ]),
            vec![FeatureKind::Rules, FeatureKind::Subagents]
        );
        assert!(FeatureSelector::expand(&[]).is_empty());
    }
}

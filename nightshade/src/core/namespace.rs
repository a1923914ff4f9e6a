//! The read-only virtual namespace browsed by the interpreter.
//!
//! The tree is compiled in and built once by [`build`]; nothing mutates it
//! afterwards. Nodes are a tagged variant so a document can never carry
//! children.

use std::collections::BTreeMap;

/// Directory whose first visit starts the mission.
pub const MISSIONS_DIR: &str = "missions";
/// Directory holding the intel document.
pub const INTEL_DIR: &str = "intel";
/// The only directory where the device can be armed.
pub const BOMB_MODULE_DIR: &str = "bomb_module";
/// Directory holding the system log.
pub const LOGS_DIR: &str = "logs";
/// Document whose first read marks the intel as acquired.
pub const INTEL_DOCUMENT: &str = "classified.txt";

const ROOT_NAME: &str = "";

/// A directory or a leaf document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceNode {
    Directory {
        name: String,
        children: BTreeMap<String, NamespaceNode>,
    },
    Document {
        name: String,
        content: String,
    },
}

impl NamespaceNode {
    /// Build a directory keyed by each child's name.
    pub fn directory(name: &str, children: Vec<NamespaceNode>) -> Self {
        let children = children
            .into_iter()
            .map(|child| (child.name().to_string(), child))
            .collect();
        Self::Directory {
            name: name.to_string(),
            children,
        }
    }

    pub fn document(name: &str, content: &str) -> Self {
        Self::Document {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::Document { name, .. } => name,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    /// Children of a directory; `None` for documents.
    pub fn children(&self) -> Option<&BTreeMap<String, NamespaceNode>> {
        match self {
            Self::Directory { children, .. } => Some(children),
            Self::Document { .. } => None,
        }
    }

    /// Look up a direct child by name. Documents have no children.
    pub fn child(&self, name: &str) -> Option<&NamespaceNode> {
        self.children().and_then(|children| children.get(name))
    }

    /// Document text; `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Document { content, .. } => Some(content),
            Self::Directory { .. } => None,
        }
    }
}

/// Construct the fixed namespace and return its root.
pub fn build() -> NamespaceNode {
    NamespaceNode::directory(
        ROOT_NAME,
        vec![
            NamespaceNode::directory(
                MISSIONS_DIR,
                vec![NamespaceNode::document("brief.txt", BRIEF)],
            ),
            NamespaceNode::directory(
                INTEL_DIR,
                vec![NamespaceNode::document(INTEL_DOCUMENT, CLASSIFIED)],
            ),
            NamespaceNode::directory(
                BOMB_MODULE_DIR,
                vec![NamespaceNode::document("instructions.txt", INSTRUCTIONS)],
            ),
            NamespaceNode::directory(
                LOGS_DIR,
                vec![NamespaceNode::document("system.log", SYSTEM_LOG)],
            ),
        ],
    )
}

/// Check structural rules the constructors cannot enforce on their own:
/// - Directory keys equal each child's name
/// - Names are non-empty, contain no `/` and are not `..`
/// - The designated directories and the intel document exist
pub fn validate_namespace(root: &NamespaceNode) -> Vec<String> {
    let mut errors = Vec::new();
    if !root.is_directory() {
        errors.push("root must be a directory".to_string());
        return errors;
    }
    if let Some(children) = root.children() {
        for (key, child) in children {
            validate_node(key, child, "", &mut errors);
        }
    }

    for dir in [MISSIONS_DIR, INTEL_DIR, BOMB_MODULE_DIR] {
        if !root.child(dir).is_some_and(NamespaceNode::is_directory) {
            errors.push(format!("missing directory /{dir}"));
        }
    }
    let intel_doc = root
        .child(INTEL_DIR)
        .and_then(|intel| intel.child(INTEL_DOCUMENT));
    if !intel_doc.is_some_and(|node| !node.is_directory()) {
        errors.push(format!("missing document /{INTEL_DIR}/{INTEL_DOCUMENT}"));
    }
    errors
}

fn validate_node(key: &str, node: &NamespaceNode, parent: &str, errors: &mut Vec<String>) {
    let path = format!("{}/{}", parent, key);
    if key != node.name() {
        errors.push(format!("{}: key does not match node name '{}'", path, node.name()));
    }
    if key.is_empty() {
        errors.push(format!("{}: empty name", parent_or_root(parent)));
    }
    if key.contains('/') {
        errors.push(format!("{}: name must not contain '/'", path));
    }
    if key == ".." {
        errors.push(format!("{}: '..' is reserved", path));
    }
    if let Some(children) = node.children() {
        for (child_key, child) in children {
            validate_node(child_key, child, &path, errors);
        }
    }
}

fn parent_or_root(parent: &str) -> &str {
    if parent.is_empty() { "/" } else { parent }
}

const BRIEF: &str = "\
Agent,

Welcome to Operation NIGHTSHADE. Your objective is twofold:
  1. Retrieve the classified intel hidden deep within the digital archives.
  2. Defuse the enemy's ticking device before it detonates.

Instructions:
  - Navigate with 'cd' to enter directories and 'ls' to list files.
  - Read files with 'cat' to gather clues. For example, 'cat brief.txt'.
  - The intel is stored in the 'intel' directory. Find and read 'classified.txt'.
  - After acquiring intel, enter 'bomb_module', arm the device with 'arm', then defuse it with 'defuse <code>'.

Time is of the essence, Agent. Trust no one and watch your back.
Good luck.";

const CLASSIFIED: &str = "\
TOP SECRET

The enemy's plan is underway. The disarm code is concealed within the command history.
Remember: Clues can be found in the errors and logs...
You might want to review everything with 'history' and 'grep'.

Hint: The code format is digit-digit-digit, where the digits sum to 6.
Hint: Look closely, Agent...";

const INSTRUCTIONS: &str = "\
WARNING: Device ACTIVE

This module contains the device set to obliterate our network.
To proceed, arm the device with the command 'arm'.
Immediately after, decipher the clues and enter the code with 'defuse <code>'.

Clue: The code is hidden in plain sight. Trust the intel.";

const SYSTEM_LOG: &str = "\
[00:01] Intrusion detected at perimeter.
[00:05] Agent access granted; mission initiated.
[00:10] Bomb module engaged, threat level critical.
[00:15] Classified intel retrieved from secure server.";

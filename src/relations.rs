//! Platform inheritance relationships.
//!
//! Declaration fragments do not always spell out the platform's
//! inheritance graph (interface augmentation can land members on a name
//! whose `extends` clause lives elsewhere), so the resolver consults a
//! bundled table of known relationships: one parent and zero or more
//! mixins per name. A JSON file can replace the bundled table wholesale.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

/// One parent plus mixins for a known platform name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relation {
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub mixins: Vec<String>,
}

/// Lookup table of known platform inheritance relationships.
#[derive(Debug, Default)]
pub struct RelationTable {
    map: HashMap<String, Relation>,
}

/// The bundled relationships: (name, parent, mixins). Kept small on
/// purpose; a full platform snapshot comes in through `--relations`.
const BUNDLED: &[(&str, &str, &[&str])] = &[
    ("AbortSignal", "EventTarget", &[]),
    ("Animation", "EventTarget", &[]),
    ("AudioContext", "BaseAudioContext", &[]),
    ("BaseAudioContext", "EventTarget", &[]),
    ("CharacterData", "Node", &["ChildNode", "NonDocumentTypeChildNode"]),
    ("Comment", "CharacterData", &[]),
    (
        "Document",
        "Node",
        &["DocumentOrShadowRoot", "NonElementParentNode", "ParentNode", "XPathEvaluatorBase"],
    ),
    (
        "DocumentFragment",
        "Node",
        &["NonElementParentNode", "ParentNode"],
    ),
    (
        "Element",
        "Node",
        &[
            "ARIAMixin",
            "Animatable",
            "ChildNode",
            "NonDocumentTypeChildNode",
            "ParentNode",
            "Slottable",
        ],
    ),
    ("ErrorEvent", "Event", &[]),
    ("EventSource", "EventTarget", &[]),
    ("FileReader", "EventTarget", &[]),
    (
        "HTMLElement",
        "Element",
        &[
            "ElementCSSInlineStyle",
            "ElementContentEditable",
            "GlobalEventHandlers",
            "HTMLOrSVGElement",
        ],
    ),
    ("IDBDatabase", "EventTarget", &[]),
    ("MessagePort", "EventTarget", &[]),
    ("Node", "EventTarget", &[]),
    ("Notification", "EventTarget", &[]),
    ("OffscreenCanvas", "EventTarget", &[]),
    ("Performance", "EventTarget", &[]),
    ("ProgressEvent", "Event", &[]),
    ("SVGElement", "Element", &["ElementCSSInlineStyle", "GlobalEventHandlers", "HTMLOrSVGElement"]),
    ("ServiceWorker", "EventTarget", &[]),
    ("ShadowRoot", "DocumentFragment", &["DocumentOrShadowRoot"]),
    ("Text", "CharacterData", &["Slottable"]),
    ("WebSocket", "EventTarget", &[]),
    (
        "Window",
        "EventTarget",
        &[
            "AnimationFrameProvider",
            "GlobalEventHandlers",
            "WindowEventHandlers",
            "WindowLocalStorage",
            "WindowOrWorkerGlobalScope",
            "WindowSessionStorage",
        ],
    ),
    ("Worker", "EventTarget", &["AbstractWorker"]),
    (
        "WorkerGlobalScope",
        "EventTarget",
        &["WindowOrWorkerGlobalScope"],
    ),
    ("XMLHttpRequest", "XMLHttpRequestEventTarget", &[]),
    ("XMLHttpRequestEventTarget", "EventTarget", &[]),
];

impl RelationTable {
    /// The table bundled with the tool.
    pub fn bundled() -> Self {
        let map = BUNDLED
            .iter()
            .map(|(name, parent, mixins)| {
                (
                    name.to_string(),
                    Relation {
                        parent: Some(parent.to_string()),
                        mixins: mixins.iter().map(|m| m.to_string()).collect(),
                    },
                )
            })
            .collect();
        Self { map }
    }

    /// Load a replacement table from a JSON file:
    /// `{"Name": {"parent": "P", "mixins": ["M"]}, ...}`.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let map: HashMap<String, Relation> = serde_json::from_str(&text)?;
        Ok(Self { map })
    }

    pub fn lookup(&self, name: &str) -> Option<&Relation> {
        self.map.get(name)
    }

    /// All inheritance-source names for `name`, parent first.
    pub fn sources(&self, name: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(rel) = self.lookup(name) {
            if let Some(parent) = &rel.parent {
                out.push(parent.clone());
            }
            out.extend(rel.mixins.iter().cloned());
        }
        out
    }
}

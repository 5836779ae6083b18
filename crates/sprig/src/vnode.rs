// File: src/vnode.rs
// Purpose: View node hand-off shape between resolution and rendering

use sprig_router::Params;

/// A renderable view node.
///
/// This is the value handed to render callbacks, not a diffing virtual DOM:
/// the rendering engine proper lives outside this crate. Attribute order is
/// preserved as given.
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<VNode>,
    },
    Text(String),
}

impl VNode {
    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text(content.into())
    }

    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Inert container carrying params as attributes.
    ///
    /// Used as the rendering fallback when a route resolves without a
    /// component; it always succeeds.
    pub fn container(params: &Params) -> Self {
        VNode::Element {
            tag: "div".to_string(),
            attrs: params
                .iter()
                .map(|(k, v)| (k.clone(), v.to_param_string()))
                .collect(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { attrs, .. } = &mut self {
            attrs.push((name.into(), value.into()));
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            VNode::Text(_) => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            VNode::Text(_) => None,
        }
    }

    /// Serializes the node to an HTML string with escaped text and attributes.
    pub fn render_to_string(&self) -> String {
        match self {
            VNode::Text(text) => escape(text),
            VNode::Element {
                tag,
                attrs,
                children,
            } => {
                let mut out = String::new();
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value));
                    out.push('"');
                }
                out.push('>');
                for child in children {
                    out.push_str(&child.render_to_string());
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                out
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

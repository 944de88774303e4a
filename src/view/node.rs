//! Declarative UI tree
//!
//! The view builds a tree of `Node`s. Nodes carry the class names the host
//! styles by and the intent (`Msg`) a click on them produces. The host
//! never inspects classes to decide what a click means.

use crate::dispatch::Action;

/// Intent attached to a clickable node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Forward straight to the reducer
    Dispatch(Action),
    OpenFile(String),
    NewFile,
    DeleteFile(String),
    LoadChallenge(usize),
    NextChallenge,
    FollowLink(String),
    /// Expand or collapse the dropdown / popout with this id
    Toggle(String),
    /// Start editing a `contenteditable` node
    Edit,
}

/// Builds the action sent when an editable node loses focus
pub type BlurHandler = fn(String) -> Action;

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: &'static str,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(&'static str, String)>,
    pub text: String,
    pub children: Vec<Node>,
    pub on_click: Option<Msg>,
    pub on_blur: Option<BlurHandler>,
    /// Clicks inside stop here and never reach an ancestor's handler
    pub click_sink: bool,
}

impl Node {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            on_click: None,
            on_blur: None,
            click_sink: false,
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn link(href: impl Into<String>) -> Self {
        let href = href.into();
        Self::new("a")
            .attr("href", href.clone())
            .on_click(Msg::FollowLink(href))
    }

    /// Add a class; empty names are skipped
    pub fn class(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.classes.push(name);
        }
        self
    }

    pub fn class_if(self, cond: bool, name: &str) -> Self {
        if cond {
            self.class(name)
        } else {
            self
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn maybe_child(mut self, child: Option<Node>) -> Self {
        self.children.extend(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn on_click(mut self, msg: Msg) -> Self {
        self.on_click = Some(msg);
        self
    }

    pub fn on_blur(mut self, handler: BlurHandler) -> Self {
        self.on_blur = Some(handler);
        self
    }

    pub fn click_sink(mut self) -> Self {
        self.click_sink = true;
        self
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    /// Space-joined class list, as it would appear in markup
    #[cfg(test)]
    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// First node (depth-first, self included) with this class
    pub fn find_class(&self, name: &str) -> Option<&Node> {
        if self.has_class(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_class(name))
    }

    /// First node (depth-first, self included) with this id
    pub fn find_id(&self, id: &str) -> Option<&Node> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_id(id))
    }

    /// Own text followed by the children's, trimmed and space-joined
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text(&self, parts: &mut Vec<String>) {
        let own = self.text.trim();
        if !own.is_empty() {
            parts.push(own.to_string());
        }
        for child in &self.children {
            child.collect_text(parts);
        }
    }
}

//! Headless document model the widgets read and mutate.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`ElementId`]. Only the state the widgets touch is modeled: attributes,
//! classes, inline style, text, and the form-control properties `value`,
//! `checked` and `disabled`.
//!
//! Queries accept a small CSS subset (see [`Selector`]).

use std::collections::BTreeMap;

use thiserror::Error;

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    text: String,
    value: String,
    checked: bool,
    disabled: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Declarative element description used to build documents.
///
/// ```
/// use storefront_widgets::dom::{Document, Node};
///
/// let mut doc = Document::new();
/// let body = doc.body();
/// doc.append(body, Node::new("div").id("floatingWidget").class("promo"));
/// assert!(doc.get_element_by_id("floatingWidget").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    text: String,
    value: Option<String>,
    checked: bool,
    disabled: bool,
    children: Vec<Node>,
}

impl Node {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Adds one or more space-separated classes.
    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_owned));
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_owned();
        self
    }

    /// Initial control value. For `<select>` this is the selected option's
    /// value.
    #[must_use]
    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_owned());
        self
    }

    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

/// An in-memory page: `<html>` with `<head>` and `<body>`.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    scroll_top: f64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            elements: vec![Element {
                tag: "html".to_owned(),
                ..Element::default()
            }],
            root: ElementId(0),
            head: ElementId(0),
            body: ElementId(0),
            scroll_top: 0.0,
        };
        doc.head = doc.append(doc.root, Node::new("head"));
        doc.body = doc.append(doc.root, Node::new("body"));
        doc
    }

    /// The `<html>` element.
    #[must_use]
    pub fn document_element(&self) -> ElementId {
        self.root
    }

    #[must_use]
    pub fn head(&self) -> ElementId {
        self.head
    }

    #[must_use]
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// The `lang` attribute of `<html>`, if declared and non-empty.
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.attribute(self.root, "lang").filter(|l| !l.is_empty())
    }

    /// `scrollTop` of the document element.
    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top;
    }

    /// Builds `node` (and its subtree) as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, node: Node) -> ElementId {
        let id = ElementId(self.elements.len());
        let Node {
            tag,
            attributes,
            classes,
            text,
            value,
            checked,
            disabled,
            children,
        } = node;

        let mut element = Element {
            tag,
            text,
            checked,
            disabled,
            parent: Some(parent),
            ..Element::default()
        };
        for (name, val) in attributes {
            if name == "class" {
                element.classes.extend(val.split_whitespace().map(str::to_owned));
            } else {
                element.attributes.insert(name, val);
            }
        }
        for class in classes {
            if !element.classes.contains(&class) {
                element.classes.push(class);
            }
        }
        element.value = value
            .or_else(|| element.attributes.get("value").cloned())
            .unwrap_or_default();

        self.elements.push(element);
        self.elements[parent.0].children.push(id);
        for child in children {
            self.append(id, child);
        }
        id
    }

    fn el(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    fn el_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    #[must_use]
    pub fn tag(&self, id: ElementId) -> &str {
        &self.el(id).tag
    }

    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.el(id).parent
    }

    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.el(id).children
    }

    // -- attributes ---------------------------------------------------------

    #[must_use]
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.el(id).attributes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.el(id).attributes.contains_key(name)
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if name == "class" {
            self.el_mut(id).classes = value.split_whitespace().map(str::to_owned).collect();
            return;
        }
        self.el_mut(id)
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        self.el_mut(id).attributes.remove(name);
    }

    // -- classes -------------------------------------------------------------

    #[must_use]
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.el(id).classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if !self.has_class(id, class) {
            self.el_mut(id).classes.push(class.to_owned());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.el_mut(id).classes.retain(|c| c != class);
    }

    // -- inline style -------------------------------------------------------

    #[must_use]
    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.el(id).style.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) {
        self.el_mut(id)
            .style
            .insert(property.to_owned(), value.to_owned());
    }

    // -- content & form state -----------------------------------------------

    #[must_use]
    pub fn text(&self, id: ElementId) -> &str {
        &self.el(id).text
    }

    /// Replaces the element's content with `text`, verbatim.
    pub fn set_text(&mut self, id: ElementId, text: &str) {
        text.clone_into(&mut self.el_mut(id).text);
    }

    #[must_use]
    pub fn value(&self, id: ElementId) -> &str {
        &self.el(id).value
    }

    pub fn set_value(&mut self, id: ElementId, value: &str) {
        value.clone_into(&mut self.el_mut(id).value);
    }

    #[must_use]
    pub fn checked(&self, id: ElementId) -> bool {
        self.el(id).checked
    }

    pub fn set_checked(&mut self, id: ElementId, checked: bool) {
        self.el_mut(id).checked = checked;
    }

    #[must_use]
    pub fn disabled(&self, id: ElementId) -> bool {
        self.el(id).disabled
    }

    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        self.el_mut(id).disabled = disabled;
    }

    // -- queries --------------------------------------------------------------

    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(self.root)
            .find(|e| self.attribute(*e, "id") == Some(id))
    }

    /// Descendants of `scope` in document order, excluding `scope`.
    pub fn descendants(&self, scope: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let mut stack: Vec<ElementId> = self.el(scope).children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.el(next).children.iter().rev().copied());
            Some(next)
        })
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    #[must_use]
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = self.parent(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Descendants of `scope` matching `selector`, in document order.
    #[must_use]
    pub fn select_all(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(scope)
            .filter(|e| selector.matches(self, *e))
            .collect()
    }

    #[must_use]
    pub fn select_first(&self, scope: ElementId, selector: &Selector) -> Option<ElementId> {
        self.descendants(scope).find(|e| selector.matches(self, *e))
    }

    /// [`Document::select_all`] with a selector string. An invalid selector
    /// is logged and matches nothing.
    #[must_use]
    pub fn query_all(&self, scope: ElementId, css: &str) -> Vec<ElementId> {
        Selector::parse_or_warn(css).map_or_else(Vec::new, |s| self.select_all(scope, &s))
    }

    /// [`Document::select_first`] with a selector string.
    #[must_use]
    pub fn query(&self, scope: ElementId, css: &str) -> Option<ElementId> {
        Selector::parse_or_warn(css).and_then(|s| self.select_first(scope, &s))
    }

    /// `id` itself or its nearest ancestor matching `css`.
    #[must_use]
    pub fn closest(&self, id: ElementId, css: &str) -> Option<ElementId> {
        let selector = Selector::parse_or_warn(css)?;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if selector.matches(self, current) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Name/value pairs a native form submission of `form` would send.
    ///
    /// Named, enabled `input`/`select`/`textarea` descendants contribute
    /// their value; checkboxes and radios only when checked; buttons and
    /// file inputs never.
    #[must_use]
    pub fn form_fields(&self, form: ElementId) -> Vec<(String, String)> {
        self.descendants(form)
            .filter(|e| matches!(self.tag(*e), "input" | "select" | "textarea"))
            .filter(|e| !self.disabled(*e))
            .filter_map(|e| {
                let name = self.attribute(e, "name").filter(|n| !n.is_empty())?;
                let kind = self.attribute(e, "type").unwrap_or("text");
                match kind {
                    "checkbox" | "radio" if !self.checked(e) => None,
                    "submit" | "button" | "reset" | "image" | "file" => None,
                    _ => Some((name.to_owned(), self.value(e).to_owned())),
                }
            })
            .collect()
    }
}

/// Error for selector strings outside the supported subset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector \"{selector}\": {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrTest {
    Present,
    Equals(String),
    Contains(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, AttrTest)>,
}

impl Compound {
    fn matches(&self, doc: &Document, e: ElementId) -> bool {
        if self.tag.as_deref().is_some_and(|t| t != doc.tag(e)) {
            return false;
        }
        if self
            .id
            .as_deref()
            .is_some_and(|id| doc.attribute(e, "id") != Some(id))
        {
            return false;
        }
        if !self.classes.iter().all(|c| doc.has_class(e, c)) {
            return false;
        }
        self.attributes.iter().all(|(name, test)| {
            let Some(actual) = doc.attribute(e, name) else {
                return false;
            };
            match test {
                AttrTest::Present => true,
                AttrTest::Equals(v) => actual == v,
                AttrTest::Contains(v) => !v.is_empty() && actual.contains(v.as_str()),
            }
        })
    }

    fn parse(raw: &str, full: &str) -> Result<Self, SelectorError> {
        let err = |reason| SelectorError {
            selector: full.to_owned(),
            reason,
        };
        let mut compound = Self::default();
        let mut rest = raw;

        let ident_end = |s: &str| {
            s.find(|c: char| matches!(c, '.' | '#' | '['))
                .unwrap_or(s.len())
        };

        let tag_len = ident_end(rest);
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if tag != "*" {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
            rest = &rest[tag_len..];
        }

        while let Some(first) = rest.chars().next() {
            match first {
                '.' | '#' => {
                    let body = &rest[1..];
                    let len = ident_end(body);
                    if len == 0 {
                        return Err(err("empty class or id"));
                    }
                    let name = body[..len].to_owned();
                    if first == '.' {
                        compound.classes.push(name);
                    } else {
                        compound.id = Some(name);
                    }
                    rest = &body[len..];
                }
                '[' => {
                    let close = rest.find(']').ok_or_else(|| err("unclosed attribute"))?;
                    let inner = &rest[1..close];
                    let unquote = |v: &str| v.trim().trim_matches(|c| c == '"' || c == '\'').to_owned();
                    let test = if let Some((name, value)) = inner.split_once("*=") {
                        (name.trim().to_owned(), AttrTest::Contains(unquote(value)))
                    } else if let Some((name, value)) = inner.split_once('=') {
                        (name.trim().to_owned(), AttrTest::Equals(unquote(value)))
                    } else {
                        (inner.trim().to_owned(), AttrTest::Present)
                    };
                    if test.0.is_empty() {
                        return Err(err("empty attribute name"));
                    }
                    compound.attributes.push(test);
                    rest = &rest[close + 1..];
                }
                _ => return Err(err("unsupported syntax")),
            }
        }

        Ok(compound)
    }
}

/// A selector in the supported CSS subset: comma-separated lists of
/// descendant chains (`a b c`) of compounds built from a tag, `#id`,
/// `.class`, `[attr]`, `[attr=value]` and `[attr*=value]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    /// Parses a selector string.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] for empty selectors or syntax outside the
    /// supported subset (combinators other than descendant, pseudo-classes).
    pub fn parse(css: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        for part in css.split(',') {
            let chain = part
                .split_whitespace()
                .map(|raw| Compound::parse(raw, css))
                .collect::<Result<Vec<_>, _>>()?;
            if chain.is_empty() {
                return Err(SelectorError {
                    selector: css.to_owned(),
                    reason: "empty selector",
                });
            }
            alternatives.push(chain);
        }
        Ok(Self { alternatives })
    }

    fn parse_or_warn(css: &str) -> Option<Self> {
        match Self::parse(css) {
            Ok(selector) => Some(selector),
            Err(error) => {
                tracing::warn!(%error, "selector matches nothing");
                None
            }
        }
    }

    /// Returns `true` if `e` matches any alternative.
    #[must_use]
    pub fn matches(&self, doc: &Document, e: ElementId) -> bool {
        self.alternatives
            .iter()
            .any(|chain| chain_matches(chain, doc, e))
    }
}

fn chain_matches(chain: &[Compound], doc: &Document, e: ElementId) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !last.matches(doc, e) {
        return false;
    }
    let mut cursor = doc.parent(e);
    for compound in ancestors.iter().rev() {
        loop {
            let Some(current) = cursor else {
                return false;
            };
            cursor = doc.parent(current);
            if compound.matches(doc, current) {
                break;
            }
        }
    }
    true
}

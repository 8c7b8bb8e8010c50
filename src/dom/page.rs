use crate::model::DomError;
use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{ElementRef, Html, Node, Selector};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use tokio::sync::mpsc;

/// The page lives on the single content-script thread.
pub type SharedPage = Rc<RefCell<Page>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Input,
    Change,
    Blur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    pub bubbles: bool,
}

/// A childList change somewhere under the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added: usize,
    pub removed: usize,
}

#[derive(Debug, Default)]
struct Overlay {
    added_classes: BTreeSet<String>,
    removed_classes: BTreeSet<String>,
    value: Option<String>,
    events: Vec<DomEvent>,
}

/// A host page: the parsed document plus the state scripts change at runtime
/// (classes, values, focus, dispatched events, injected styles).
pub struct Page {
    html: Html,
    overlays: HashMap<NodeId, Overlay>,
    styles: Vec<(String, String)>,
    focused: Option<NodeId>,
    observers: Vec<mpsc::UnboundedSender<MutationRecord>>,
}

impl Page {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            overlays: HashMap::new(),
            styles: Vec::new(),
            focused: None,
            observers: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedPage {
        Rc::new(RefCell::new(self))
    }

    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.html.select(selector).map(|el| el.id()).collect()
    }

    /// Descendants of `scope` matching `selector`, excluding `scope` itself.
    pub fn select_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        match self.element(scope) {
            Some(el) => el.select(selector).map(|e| e.id()).collect(),
            None => Vec::new(),
        }
    }

    /// Element ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        match self.html.tree.get(id) {
            Some(node) => node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .map(|el| el.id())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.value().name())
    }

    pub fn text_content(&self, id: NodeId) -> String {
        self.element(id)
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default()
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.value().attr(name))
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        if let Some(overlay) = self.overlays.get(&id) {
            if overlay.removed_classes.contains(class) {
                return false;
            }
            if overlay.added_classes.contains(class) {
                return true;
            }
        }
        self.element(id)
            .is_some_and(|el| el.value().classes().any(|c| c == class))
    }

    pub fn class_list(&self, id: NodeId) -> Vec<String> {
        let Some(el) = self.element(id) else {
            return Vec::new();
        };
        let overlay = self.overlays.get(&id);
        let mut classes: Vec<String> = el
            .value()
            .classes()
            .filter(|c| overlay.is_none_or(|o| !o.removed_classes.contains(*c)))
            .map(str::to_string)
            .collect();
        if let Some(overlay) = overlay {
            for class in &overlay.added_classes {
                if !classes.contains(class) {
                    classes.push(class.clone());
                }
            }
        }
        classes
    }

    /// Returns true when the class list actually changed.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.element(id).is_none() || self.has_class(id, class) {
            return false;
        }
        let overlay = self.overlays.entry(id).or_default();
        if !overlay.removed_classes.remove(class) {
            overlay.added_classes.insert(class.to_string());
        }
        true
    }

    /// Returns true when the class list actually changed.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        if !self.has_class(id, class) {
            return false;
        }
        let overlay = self.overlays.entry(id).or_default();
        if !overlay.added_classes.remove(class) {
            overlay.removed_classes.insert(class.to_string());
        }
        true
    }

    /// Current value of a form control: the live value if a script set one,
    /// otherwise the `value` attribute (or the text of a textarea).
    pub fn value(&self, id: NodeId) -> String {
        if let Some(value) = self.overlays.get(&id).and_then(|o| o.value.as_ref()) {
            return value.clone();
        }
        match self.tag_name(id) {
            Some("textarea") => self.text_content(id),
            _ => self.attr(id, "value").unwrap_or_default().to_string(),
        }
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        if self.element(id).is_some() {
            self.overlays.entry(id).or_default().value = Some(value.to_string());
        }
    }

    pub fn focus(&mut self, id: NodeId) {
        if self.element(id).is_some() {
            self.focused = Some(id);
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Records a synthetic, bubbling event on the element.
    pub fn dispatch_event(&mut self, id: NodeId, kind: EventKind) {
        if self.element(id).is_some() {
            self.overlays
                .entry(id)
                .or_default()
                .events
                .push(DomEvent { kind, bubbles: true });
        }
    }

    pub fn events(&self, id: NodeId) -> &[DomEvent] {
        self.overlays
            .get(&id)
            .map(|o| o.events.as_slice())
            .unwrap_or(&[])
    }

    /// Injects a stylesheet unless one with the same id is already present.
    pub fn ensure_style(&mut self, style_id: &str, css: &str) -> bool {
        let in_document = Selector::parse(&format!("style#{}", style_id))
            .map(|sel| self.html.select(&sel).next().is_some())
            .unwrap_or(false);
        if in_document || self.styles.iter().any(|(id, _)| id == style_id) {
            return false;
        }
        self.styles.push((style_id.to_string(), css.to_string()));
        true
    }

    pub fn injected_styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.styles.iter().map(|(id, css)| (id.as_str(), css.as_str()))
    }

    /// Subscribes to childList mutations over the whole document.
    pub fn observe(&mut self) -> mpsc::UnboundedReceiver<MutationRecord> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    /// Appends parsed markup as the last children of the first element
    /// matching `target`. Returns the number of top-level nodes added.
    pub fn append_html(&mut self, target: &str, fragment: &str) -> Result<usize, DomError> {
        let selector = Selector::parse(target)
            .map_err(|e| DomError::InvalidSelector(format!("{}: {}", target, e)))?;
        let target_id = self
            .html
            .select(&selector)
            .next()
            .map(|el| el.id())
            .ok_or_else(|| DomError::TargetNotFound(target.to_string()))?;

        let fragment = Html::parse_fragment(fragment);
        let mut added = 0;
        for child in fragment.root_element().children() {
            graft(&mut self.html.tree, target_id, child);
            added += 1;
        }

        self.notify(MutationRecord { target: target_id, added, removed: 0 });
        Ok(added)
    }

    /// Detaches the element and its subtree from the document.
    pub fn remove_element(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.html.tree.get(id).and_then(|n| n.parent()).map(|p| p.id()) else {
            return false;
        };
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.notify(MutationRecord { target: parent, added: 0, removed: 1 });
        true
    }

    fn notify(&mut self, record: MutationRecord) {
        self.observers.retain(|tx| tx.send(record.clone()).is_ok());
    }
}

fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) {
    let Some(mut parent_node) = tree.get_mut(parent) else {
        return;
    };
    let id = parent_node.append(source.value().clone()).id();
    for child in source.children() {
        graft(tree, id, child);
    }
}

//! The render tree: tree-scoped state plus the top-down render walk.
//!
//! A [`RenderTree`] owns everything that outlives a single pass (visibility
//! store, search query, carousel instances and registry, the handler table
//! of the last pass). [`RenderTree::render`] walks the blocks once, threading
//! merged data and item context down, and returns the rendered nodes.

use std::{collections::HashSet, fmt, mem, sync::Arc, time::Duration};

use parking_lot::Mutex;
use schema::{Block, BlockKind, CarouselOptions, EngineSettings, Map, Value, load_blocks_from_str};
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::{
    Result,
    binding::{display, resolve},
    carousel::CarouselHandle,
    condition,
    control::CarouselControl,
    diagnostics::{Diagnostic, DiagnosticKind, Diagnostics},
    dispatch::{Handler, UiEvent},
    element,
    host::Host,
    instances::{Instances, MountCx},
    marquee,
    node::{Element, HandlerId, Node},
    progress,
    registry::CarouselRegistry,
    repeater,
    scope::{DRAWER_KEY, Scope, child_path, merge_data},
    search::SearchState,
    slider,
    ticker::Ticker,
    visibility::VisibilityStore,
    wrapper_cache::WrapperCache,
};

/// State shared by every pass of one tree and by the handlers it wires.
pub(crate) struct Shared {
    /// Engine settings.
    pub(crate) settings: EngineSettings,
    /// Host callbacks.
    pub(crate) host: Arc<dyn Host>,
    /// Drawer/accordion visibility.
    pub(crate) visibility: VisibilityStore,
    /// Search query and debounce timer.
    pub(crate) search: SearchState,
    /// Named carousel lookup.
    pub(crate) registry: Arc<CarouselRegistry>,
    /// Mounted carousels.
    pub(crate) instances: Instances,
    /// Autoplay timers.
    pub(crate) ticker: Ticker,
    /// Parsed wrapper strings.
    pub(crate) wrappers: WrapperCache,
    /// Handlers wired by the last completed pass, indexed by [`HandlerId`].
    handlers: Mutex<Vec<Handler>>,
    /// Viewport width for carousel breakpoints.
    viewport: Mutex<Option<u32>>,
}

impl Shared {
    /// Viewport width, when the host supplied one.
    pub(crate) fn viewport(&self) -> Option<u32> {
        *self.viewport.lock()
    }
}

/// What block renderers need from the pass they run in.
pub(crate) trait RenderCx {
    /// Tree-scoped state.
    fn shared(&self) -> &Shared;

    /// Render one block: merge its data, evaluate its condition, dispatch on its kind.
    fn render_block(&mut self, block: &Block, scope: Scope<'_>) -> Option<Node>;

    /// Register a handler for this pass.
    fn wire(&mut self, handler: Handler) -> HandlerId;

    /// Record a diagnostic.
    fn diag(&mut self, kind: DiagnosticKind, message: String);

    /// Mount or refresh a carousel instance.
    fn mount_carousel(
        &mut self,
        key: &str,
        options: &CarouselOptions,
        slides: usize,
        section: Option<&str>,
    ) -> CarouselHandle;

    /// True the first time it is called in a pass.
    fn first_keyframes(&mut self) -> bool;

    /// A progress indicator could not find its carousel.
    fn progress_unresolved(&mut self);

    /// Render `children` in order, keying each rendered node.
    fn render_children(&mut self, children: &[Block], scope: Scope<'_>) -> Vec<Node> {
        let mut out = Vec::with_capacity(children.len());
        for (index, child) in children.iter().enumerate() {
            let path = child_path(scope.path, index);
            if let Some(mut node) = self.render_block(child, scope.at(&path)) {
                set_key(&mut node, child_key(child, index));
                out.push(node);
            }
        }
        out
    }
}

/// Set the sibling key of an element node. Other nodes carry no key.
pub(crate) fn set_key(node: &mut Node, key: String) {
    if let Some(el) = node.as_element_mut() {
        el.key = Some(key);
    }
}

/// Sibling key of a child block: its id, else its wrapper id, else its kind and position.
pub(crate) fn child_key(block: &Block, index: usize) -> String {
    block.declared_id().unwrap_or_else(|| {
        let kind = block.type_name.as_deref().unwrap_or("element");
        format!("block-{kind}-{index}")
    })
}

/// One top-down walk.
struct Pass<'s> {
    /// Tree state.
    shared: &'s Shared,
    /// Diagnostics of this pass.
    diag: Diagnostics,
    /// Handlers wired so far.
    handlers: Vec<Handler>,
    /// Carousel instance keys rendered so far.
    seen: HashSet<String>,
    /// The marquee stylesheet was emitted.
    keyframes_emitted: bool,
    /// A progress indicator rendered without its carousel.
    unresolved_progress: bool,
    /// A carousel instance was created.
    mounted_new: bool,
}

impl<'s> Pass<'s> {
    /// Fresh pass over `shared`.
    fn new(shared: &'s Shared) -> Self {
        Self {
            shared,
            diag: Diagnostics::new(shared.settings.diagnostics),
            handlers: Vec::new(),
            seen: HashSet::new(),
            keyframes_emitted: false,
            unresolved_progress: false,
            mounted_new: false,
        }
    }

    /// Unmount carousels this pass did not render, publish its handlers,
    /// and hand back its output.
    fn finish(self, nodes: Vec<Node>) -> RenderOutput {
        let shared = self.shared;
        shared
            .instances
            .retain(&self.seen, &shared.registry, &shared.ticker);
        trace!(handlers = self.handlers.len(), "handlers_published");
        *shared.handlers.lock() = self.handlers;
        RenderOutput {
            nodes,
            diagnostics: self.diag.into_items(),
        }
    }
}

impl RenderCx for Pass<'_> {
    fn shared(&self) -> &Shared {
        self.shared
    }

    fn render_block(&mut self, block: &Block, scope: Scope<'_>) -> Option<Node> {
        let merged;
        let scope = if block.data.is_empty() {
            scope
        } else {
            merged = merge_data(scope.data, &block.data);
            scope.with_data(&merged)
        };
        if let Some(cond) = &block.condition
            && !condition::evaluate(cond, scope.data, scope.context, &mut self.diag)
        {
            trace!(block = block.kind.name(), field = %cond.field, "condition_false");
            return None;
        }
        match &block.kind {
            BlockKind::Plain => element::render(self, block, scope),
            BlockKind::Icon => Some(element::render_icon(self, block, &scope)),
            BlockKind::Repeater(spec) => repeater::render(self, spec, scope),
            BlockKind::Carousel(config) => slider::render(self, block, config, scope),
            BlockKind::Marquee(animation) => Some(marquee::render(self, block, animation, scope)),
            BlockKind::ProgressBar => Some(progress::render(self, block, &scope)),
        }
    }

    fn wire(&mut self, handler: Handler) -> HandlerId {
        let id = HandlerId(u32::try_from(self.handlers.len()).unwrap_or(u32::MAX));
        self.handlers.push(handler);
        id
    }

    fn diag(&mut self, kind: DiagnosticKind, message: String) {
        self.diag.push(kind, message);
    }

    fn mount_carousel(
        &mut self,
        key: &str,
        options: &CarouselOptions,
        slides: usize,
        section: Option<&str>,
    ) -> CarouselHandle {
        let shared = self.shared;
        let (handle, created) = shared.instances.mount(
            key,
            options,
            slides,
            section,
            MountCx {
                registry: &shared.registry,
                ticker: &shared.ticker,
                host: &shared.host,
                diag: &mut self.diag,
            },
        );
        self.seen.insert(key.to_string());
        self.mounted_new |= created;
        handle
    }

    fn first_keyframes(&mut self) -> bool {
        !mem::replace(&mut self.keyframes_emitted, true)
    }

    fn progress_unresolved(&mut self) {
        self.unresolved_progress = true;
    }
}

/// Result of one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    /// Rendered roots, in order.
    pub nodes: Vec<Node>,
    /// Diagnostics collected during the pass (empty unless enabled).
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderOutput {
    /// HTML of every root, concatenated.
    pub fn to_html(&self) -> String {
        self.nodes.iter().map(Node::to_html).collect()
    }

    /// Every element in document order.
    pub fn elements(&self) -> Vec<&Element> {
        self.nodes.iter().flat_map(Node::elements).collect()
    }

    /// First element with `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.nodes.iter().find_map(|n| n.find_by_id(id))
    }

    /// Every element carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.nodes
            .iter()
            .flat_map(|n| n.find_by_class(class))
            .collect()
    }

    /// Concatenated text of every root.
    pub fn text_content(&self) -> String {
        self.nodes.iter().map(Node::text_content).collect()
    }
}

/// A block tree bound to a host, rendered on demand.
///
/// ```
/// use std::sync::Arc;
/// use storefront_engine::{NoopHost, RenderTree};
///
/// let tree = RenderTree::from_json(
///     r#"{"wrapper": "p.greeting", "bind_content": "user.name"}"#,
///     Arc::new(NoopHost),
/// )
/// .unwrap();
/// let data = serde_json::json!({"user": {"name": "Ada"}});
/// let out = tree.render(data.as_object().unwrap());
/// assert_eq!(out.to_html(), r#"<p class="greeting">Ada</p>"#);
/// ```
pub struct RenderTree {
    /// Root blocks.
    roots: Vec<Block>,
    /// State shared with wired handlers.
    shared: Shared,
}

impl fmt::Debug for RenderTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTree")
            .field("roots", &self.roots.len())
            .field("settings", &self.shared.settings)
            .field("carousels", &self.shared.instances.len())
            .field("cached_wrappers", &self.shared.wrappers.len())
            .finish_non_exhaustive()
    }
}

impl RenderTree {
    /// Tree with a single root and default settings.
    pub fn new(root: Block, host: Arc<dyn Host>) -> Self {
        Self::from_blocks(vec![root], host)
    }

    /// Tree over several roots sharing one visibility store.
    pub fn from_blocks(roots: Vec<Block>, host: Arc<dyn Host>) -> Self {
        Self::with_options(roots, host, EngineSettings::default(), Handle::try_current().ok())
    }

    /// Tree parsed from JSON text: one block object or a list of them.
    pub fn from_json(text: &str, host: Arc<dyn Host>) -> Result<Self> {
        Ok(Self::from_blocks(load_blocks_from_str(text)?, host))
    }

    /// Fully specified tree. Timers are spawned on `runtime`; without one,
    /// autoplay and debounced search are not scheduled.
    pub fn with_options(
        roots: Vec<Block>,
        host: Arc<dyn Host>,
        settings: EngineSettings,
        runtime: Option<Handle>,
    ) -> Self {
        let window = Duration::from_millis(settings.debounce_ms);
        let shared = Shared {
            host,
            visibility: VisibilityStore::new(),
            search: SearchState::new(window, runtime.clone()),
            registry: Arc::new(CarouselRegistry::new()),
            instances: Instances::default(),
            ticker: Ticker::new(runtime),
            wrappers: WrapperCache::with_capacity(settings.wrapper_cache_size),
            handlers: Mutex::new(Vec::new()),
            viewport: Mutex::new(None),
            settings,
        };
        debug!(roots = roots.len(), "render_tree_created");
        Self { roots, shared }
    }

    /// Render every root against `data`.
    ///
    /// The first pass seeds the visibility store from declared states. When a
    /// progress indicator renders before the carousel it tracks is created,
    /// the pass runs once more so the indicator can find it.
    pub fn render(&self, data: &Map) -> RenderOutput {
        self.seed_visibility(data);
        let mut root = data.clone();
        root.insert(
            DRAWER_KEY.to_string(),
            Value::Object(self.shared.visibility.snapshot()),
        );
        let context = Map::new();

        let (mut pass, mut nodes) = self.run_pass(&root, &context);
        if pass.unresolved_progress && pass.mounted_new {
            debug!("render_repeated_for_progress");
            (pass, nodes) = self.run_pass(&root, &context);
        }
        let out = pass.finish(nodes);
        debug!(
            nodes = out.nodes.len(),
            diagnostics = out.diagnostics.len(),
            "render_complete"
        );
        out
    }

    /// One walk over the roots.
    fn run_pass(&self, data: &Map, context: &Map) -> (Pass<'_>, Vec<Node>) {
        let mut pass = Pass::new(&self.shared);
        let nodes = pass.render_children(&self.roots, Scope::root(data, context));
        (pass, nodes)
    }

    /// Seed the visibility store from declared `state.visible` values, once.
    ///
    /// Subtrees whose condition is false are skipped.
    fn seed_visibility(&self, data: &Map) {
        if self.shared.visibility.is_seeded() {
            return;
        }
        let mut entries = Vec::new();
        let mut quiet = Diagnostics::new(false);
        let context = Map::new();
        for root in &self.roots {
            self.collect_states(root, data, &context, &mut quiet, &mut entries);
        }
        self.shared.visibility.seed(entries);
    }

    /// Declared states of `block` and its descendants.
    fn collect_states(
        &self,
        block: &Block,
        data: &Map,
        context: &Map,
        diag: &mut Diagnostics,
        out: &mut Vec<(String, bool)>,
    ) {
        let merged;
        let data = if block.data.is_empty() {
            data
        } else {
            merged = merge_data(data, &block.data);
            &merged
        };
        if let Some(cond) = &block.condition
            && !condition::evaluate(cond, data, context, diag)
        {
            return;
        }
        if let Some(visible) = block.declared_visibility() {
            let wrapper_id = block
                .wrapper
                .as_deref()
                .and_then(|w| self.shared.wrappers.get_or_parse(w).id.clone());
            let id = block
                .bind_id
                .as_deref()
                .and_then(|path| resolve(path, data, context))
                .and_then(display)
                .or(wrapper_id)
                .or_else(|| block.declared_id());
            if let Some(id) = id {
                out.push((id, visible));
            }
        }
        for child in &block.children {
            self.collect_states(child, data, context, diag, out);
        }
        if let BlockKind::Repeater(spec) = &block.kind
            && let Some(template) = &spec.template
        {
            self.collect_states(template, data, context, diag, out);
        }
    }

    /// Run the handler `id` from the last pass. Returns `false` for an unknown id.
    pub fn fire(&self, id: HandlerId, event: UiEvent) -> bool {
        let handler = self
            .shared
            .handlers
            .lock()
            .get(id.0 as usize)
            .cloned();
        match handler {
            Some(handler) => {
                handler.run(&self.shared, &event);
                true
            }
            None => {
                debug!(%id, "handler_not_found");
                false
            }
        }
    }

    /// Number of handlers wired by the last pass.
    pub fn handler_count(&self) -> usize {
        self.shared.handlers.lock().len()
    }

    /// Root blocks.
    pub fn roots(&self) -> &[Block] {
        &self.roots
    }

    /// Engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.shared.settings
    }

    /// The tree's visibility store.
    pub fn visibility(&self) -> &VisibilityStore {
        &self.shared.visibility
    }

    /// The tree's search state.
    pub fn search(&self) -> &SearchState {
        &self.shared.search
    }

    /// The tree's carousel registry.
    pub fn registry(&self) -> &Arc<CarouselRegistry> {
        &self.shared.registry
    }

    /// Carousel registered under exactly `name`.
    pub fn carousel(&self, name: &str) -> Option<CarouselHandle> {
        self.shared.registry.get(name)
    }

    /// Control surface over this tree's carousels, for host scripts.
    pub fn control(&self) -> CarouselControl {
        CarouselControl::new(
            Arc::clone(&self.shared.registry),
            Arc::clone(&self.shared.host),
        )
    }

    /// Set the viewport width used to resolve carousel breakpoints.
    pub fn set_viewport(&self, width: Option<u32>) {
        *self.shared.viewport.lock() = width;
    }

    /// Stop timers, cancel a pending search and unmount every carousel.
    pub fn shutdown(&self) {
        self.shared.ticker.clear();
        self.shared.search.cancel_pending();
        self.shared
            .instances
            .clear(&self.shared.registry, &self.shared.ticker);
    }

    /// Like [`Self::shutdown`], waiting briefly for timer tasks to finish.
    pub async fn shutdown_async(&self) {
        self.shared.ticker.clear_async().await;
        self.shared.search.cancel_pending();
        self.shared
            .instances
            .clear(&self.shared.registry, &self.shared.ticker);
    }
}

impl Drop for RenderTree {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::host::NoopHost;

    fn tree(v: Value) -> RenderTree {
        let roots = vec![serde_json::from_value(v).unwrap()];
        RenderTree::with_options(roots, Arc::new(NoopHost), EngineSettings::default(), None)
    }

    fn map(v: Value) -> Map {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn child_keys() {
        let with_id: Block = serde_json::from_value(json!({"id": "a"})).unwrap();
        let with_wrapper: Block = serde_json::from_value(json!({"wrapper": "div#w"})).unwrap();
        let icon: Block = serde_json::from_value(json!({"type": "icon", "icon": "x"})).unwrap();
        assert_eq!(child_key(&with_id, 0), "a");
        assert_eq!(child_key(&with_wrapper, 1), "w");
        assert_eq!(child_key(&icon, 2), "block-icon-2");
    }

    #[test]
    fn false_condition_renders_nothing_and_wires_nothing() {
        let t = tree(json!({
            "wrapper": "div",
            "blocks": [{
                "wrapper": "button",
                "condition": {"field": "flag", "op": "equals", "value": true},
                "events": {"on_click": {"action": "toggle_theme"}}
            }]
        }));
        let out = t.render(&map(json!({"flag": false})));
        assert_eq!(out.to_html(), "<div></div>");
        assert_eq!(t.handler_count(), 0);

        let out = t.render(&map(json!({"flag": true})));
        assert!(out.to_html().contains("<button"));
        assert_eq!(t.handler_count(), 1);
    }

    #[test]
    fn drawer_state_is_visible_to_conditions() {
        let t = tree(json!({
            "wrapper": "div",
            "blocks": [
                {"wrapper": "div#cart", "state": {"visible": false}, "content": "cart"},
                {
                    "wrapper": "span",
                    "condition": {"field": "_drawer.cart", "op": "equals", "value": true},
                    "content": "open"
                }
            ]
        }));
        let empty = Map::new();
        let out = t.render(&empty);
        assert_eq!(out.find_by_id("cart").unwrap().style.get("display"), Some("none"));
        assert!(!out.text_content().contains("open"));

        t.visibility().toggle("cart");
        let out = t.render(&empty);
        assert_eq!(out.find_by_id("cart").unwrap().style.get("display"), None);
        assert!(out.text_content().contains("open"));
    }

    #[test]
    fn unknown_handler_is_rejected() {
        let t = tree(json!({"wrapper": "div"}));
        t.render(&Map::new());
        assert!(!t.fire(HandlerId(9), UiEvent::Click));
    }
}

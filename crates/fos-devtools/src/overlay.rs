//! Inspector overlay
//!
//! Owns the injected stylesheet and panel, the session state and the
//! page's log interceptor. Every interaction ends in a re-render of the
//! panel from [`render`](crate::render::render).
//!
//! User actions never fail loudly: inactive state, missing selection and
//! unknown tags are no-ops traced at `debug`.

use std::fmt;

use fos_css::{CssParser, StyleResolver};
use fos_dom::serialize::inner_html;
use fos_dom::{DomError, NodeId};

use crate::config::DevToolsConfig;
use crate::console::LogInterceptor;
use crate::elements::ElementSnapshot;
use crate::inspector::{EditField, InspectorSession, PanelPosition, SpecialAction};
use crate::page::Page;
use crate::paint::Painter;
use crate::render::{render, RenderInput};
use crate::script::ScriptEvaluator;
use crate::view::View;
use crate::DevToolsError;

/// Input events the overlay listens for
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Right-click on `target` at viewport coordinates
    ContextMenu { target: NodeId, x: i32, y: i32 },
    KeyDown { key: String },
    Click { target: NodeId },
    /// An input or textarea committed a new value
    Change { target: NodeId, value: String },
}

/// Whether the overlay consumed an event. For a context menu, `Handled`
/// means the host should suppress its native menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Handled,
    Ignored,
}

pub struct Overlay {
    config: DevToolsConfig,
    painter: Painter,
    page: Page,
    session: InspectorSession,
    console: LogInterceptor,
    evaluator: Box<dyn ScriptEvaluator>,
    resolver: StyleResolver,
    style_element: NodeId,
    panel: NodeId,
    view: View,
}

impl Overlay {
    /// Install with the default evaluator: QuickJS wired to the page's
    /// console and storage, or a disabled one without the `quickjs` feature
    pub fn install(page: Page, console: LogInterceptor, config: DevToolsConfig) -> Result<Self, DevToolsError> {
        #[cfg(feature = "quickjs")]
        let evaluator: Box<dyn ScriptEvaluator> = Box::new(
            crate::script::QuickJsEvaluator::new(console.clone())?
                .with_storage(page.local_storage(), page.session_storage())?,
        );
        #[cfg(not(feature = "quickjs"))]
        let evaluator: Box<dyn ScriptEvaluator> = Box::new(crate::script::DisabledEvaluator);

        Self::install_with_evaluator(page, console, evaluator, config)
    }

    /// Inject the stylesheet into `<head>` and the hidden panel into `<body>`
    pub fn install_with_evaluator(
        mut page: Page,
        console: LogInterceptor,
        evaluator: Box<dyn ScriptEvaluator>,
        config: DevToolsConfig,
    ) -> Result<Self, DevToolsError> {
        let painter = Painter::new(&config.resolve_namespace()?);
        let css = painter.stylesheet(&config);
        let rules = CssParser::new().rule_count(&css)?;

        let doc = &mut page.document;
        let head = doc.head();
        if !head.is_valid() {
            return Err(DevToolsError::MissingHead);
        }
        let body = doc.body();
        if !body.is_valid() {
            return Err(DevToolsError::MissingBody);
        }
        if doc.get_element_by_id(&painter.panel_id()).is_some() {
            return Err(DevToolsError::NamespaceTaken(painter.namespace().to_string()));
        }

        let tree = doc.tree_mut();
        let style_element = tree.create_element("style");
        tree.set_attribute(style_element, "id", &painter.style_id())?;
        let text = tree.create_text(&css);
        tree.append_child(style_element, text)?;
        tree.append_child(head, style_element)?;

        let panel = tree.create_element("div");
        tree.set_attribute(panel, "id", &painter.panel_id())?;
        tree.set_attribute(panel, "hidden", "")?;
        tree.append_child(body, panel)?;

        tracing::info!("Installed inspector overlay {} ({} style rules)", painter.namespace(), rules);

        let mut overlay = Self {
            session: InspectorSession::new(&config),
            config,
            painter,
            page,
            console,
            evaluator,
            resolver: StyleResolver::new(),
            style_element,
            panel,
            view: View::Empty,
        };
        overlay.refresh()?;
        Ok(overlay)
    }

    /// Flip inspect mode; returns whether the overlay is now active
    pub fn toggle(&mut self) -> bool {
        let active = self.session.toggle();
        tracing::info!("Inspector {}", if active { "activated" } else { "deactivated" });

        let outcome = self.sync_markers().map_err(DevToolsError::from);
        let outcome = outcome.and_then(|()| if active { self.refresh() } else { Ok(()) });
        report("toggle", outcome);
        active
    }

    /// Select `node` and show the panel at `(x, y)`. No-op while inactive.
    pub fn inspect_element(&mut self, node: NodeId, x: i32, y: i32) -> bool {
        if !self.session.active {
            tracing::debug!("Inspect of {:?} ignored: overlay inactive", node);
            return false;
        }
        let Some(element) = self.element_for(node) else {
            tracing::debug!("Inspect of {:?} ignored: no element", node);
            return false;
        };
        if self.is_overlay_node(element) {
            return false;
        }

        self.session.select(element, PanelPosition { x, y });
        let outcome = self.position_panel().map_err(DevToolsError::from);
        let outcome = outcome.and_then(|()| self.refresh());
        report("inspect", outcome);
        true
    }

    /// Overwrite a property of the selected element (or the script draft)
    /// with `value`, as typed, then re-render. No-op while inactive.
    pub fn change(&mut self, field: EditField, value: &str) -> bool {
        if !self.session.active {
            tracing::debug!("Edit of {} ignored: overlay inactive", field.as_str());
            return false;
        }
        let result = match (field, self.session.selected) {
            (EditField::Script, _) => {
                self.session.script_draft = value.to_string();
                Ok(())
            }
            (_, None) => {
                tracing::debug!("Edit of {} ignored: nothing selected", field.as_str());
                return false;
            }
            (EditField::Id, Some(node)) => self.page.document.set_element_id(node, value),
            (EditField::ClassName, Some(node)) => self.page.document.set_class_name(node, value),
            (EditField::InnerHtml, Some(node)) => {
                fos_html::set_inner_html(self.page.document.tree_mut(), node, value)
            }
        };

        let outcome = result.map_err(DevToolsError::from).and_then(|()| self.refresh());
        report("change", outcome)
    }

    /// Run one special action, then re-render. No-op while inactive.
    pub fn special(&mut self, action: SpecialAction) -> bool {
        if !self.session.active {
            tracing::debug!("Action {} ignored: overlay inactive", action.tag());
            return false;
        }
        let outcome = match action {
            SpecialAction::SwitchTab(tab) => {
                self.session.current_tab = tab;
                Ok(())
            }
            SpecialAction::ToggleSide => {
                self.session.side_mode = !self.session.side_mode;
                self.sync_markers().map_err(DevToolsError::from)
            }
            SpecialAction::RunScript => {
                self.run_script();
                Ok(())
            }
            SpecialAction::Mark => {
                self.start_measure();
                Ok(())
            }
            SpecialAction::Stamp => self.stop_measure(),
        };

        let outcome = outcome.and_then(|()| self.refresh());
        report(&action.tag(), outcome)
    }

    /// Run the special action named by `tag`; unknown tags are no-ops
    pub fn dispatch(&mut self, tag: &str) -> bool {
        match SpecialAction::parse(tag) {
            Some(action) => self.special(action),
            None => {
                tracing::debug!("Unknown action tag {:?}", tag);
                false
            }
        }
    }

    pub fn handle_event(&mut self, event: PageEvent) -> EventResult {
        match event {
            PageEvent::ContextMenu { target, x, y } => {
                if !self.session.active || self.is_overlay_node(target) {
                    return EventResult::Ignored;
                }
                self.inspect_element(target, x, y);
                EventResult::Handled
            }
            PageEvent::KeyDown { key } => {
                if key == "Escape" && self.session.active {
                    self.toggle();
                    EventResult::Handled
                } else {
                    EventResult::Ignored
                }
            }
            PageEvent::Click { target } => match self.panel_attribute(target, &self.painter.action_attr()) {
                Some(tag) => {
                    self.dispatch(&tag);
                    EventResult::Handled
                }
                None => EventResult::Ignored,
            },
            PageEvent::Change { target, value } => {
                let field = self.panel_attribute(target, &self.painter.field_attr())
                    .and_then(|name| EditField::parse(&name));
                match field {
                    Some(field) => {
                        self.change(field, &value);
                        EventResult::Handled
                    }
                    None => EventResult::Ignored,
                }
            }
        }
    }

    /// Re-render the panel from the current state
    pub fn refresh(&mut self) -> Result<(), DevToolsError> {
        self.ensure_attached()?;

        let hidden = [self.style_element, self.panel];
        let element = self.session.selected.and_then(|node| {
            ElementSnapshot::capture(&self.page.document, &self.resolver, node, &hidden)
        });
        let storage = self.page.storage_snapshot();
        let view = {
            let log = self.console.book().entries();
            render(&RenderInput {
                tab: self.session.current_tab,
                element: element.as_ref(),
                log: &*log,
                storage: &storage,
                measuring: self.session.measuring,
                side_mode: self.session.side_mode,
                script_draft: &self.session.script_draft,
            })
        };

        let html = self.painter.paint(&view);
        fos_html::set_inner_html(self.page.document.tree_mut(), self.panel, &html)?;
        self.view = view;
        Ok(())
    }

    fn sync_markers(&mut self) -> Result<(), DomError> {
        let active = self.session.active;
        let side = active && self.session.side_mode;
        let root = self.page.document.document_element();
        let body = self.page.document.body();

        let tree = self.page.document.tree_mut();
        if root.is_valid() {
            tree.toggle_attribute(root, &self.painter.inspect_attr(), Some(active))?;
        }
        if body.is_valid() {
            tree.toggle_attribute(body, &self.painter.side_attr(), Some(side))?;
        }
        tree.toggle_attribute(self.panel, "hidden", Some(!active))?;
        Ok(())
    }

    fn position_panel(&mut self) -> Result<(), DomError> {
        let PanelPosition { x, y } = self.session.position;
        self.page.document.tree_mut()
            .set_attribute(self.panel, "style", &format!("left:{}px;top:{}px", x, y))
    }

    /// Put the overlay's nodes back if an inner-HTML edit detached them
    fn ensure_attached(&mut self) -> Result<(), DomError> {
        let doc = &mut self.page.document;
        let root = doc.document_element();
        let head = if doc.tree().is_connected(doc.head()) { doc.head() } else { root };
        let body = if doc.tree().is_connected(doc.body()) { doc.body() } else { root };

        let tree = doc.tree_mut();
        if !tree.is_connected(self.style_element) {
            tracing::debug!("Re-attaching overlay stylesheet");
            tree.append_child(head, self.style_element)?;
        }
        if !tree.is_connected(self.panel) {
            tracing::debug!("Re-attaching overlay panel");
            tree.append_child(body, self.panel)?;
        }
        Ok(())
    }

    fn run_script(&mut self) {
        let source = std::mem::take(&mut self.session.script_draft);
        if source.trim().is_empty() {
            tracing::debug!("Run ignored: empty script");
            return;
        }
        tracing::debug!("Evaluating {} bytes of console script", source.len());
        match self.evaluator.evaluate(&source) {
            Ok(value) => self.console.info(value),
            Err(err) => self.console.uncaught_error(err.to_console_value()),
        }
    }

    fn mark_name(&self, suffix: &str) -> String {
        format!("{}-{}", self.painter.namespace(), suffix)
    }

    fn start_measure(&mut self) {
        let start = self.mark_name("start");
        self.page.performance.mark(&start);
        self.session.measuring = true;
    }

    fn stop_measure(&mut self) -> Result<(), DevToolsError> {
        let start = self.mark_name("start");
        if !self.page.performance.has_mark(&start) {
            tracing::debug!("Stamp ignored: no start mark");
            return Ok(());
        }
        let stop = self.mark_name("stop");
        let name = self.mark_name("measure");
        self.page.performance.mark(&stop);
        let measure = self.page.performance.measure(&name, &start, Some(stop.as_str()));

        self.page.performance.clear_marks(None);
        self.page.performance.clear_measures(None);
        self.session.measuring = false;

        let measure = measure?;
        tracing::debug!("Measured {:.3}ms", measure.duration);
        self.console.info(measure.to_console_value());
        Ok(())
    }

    /// The nearest element at or above `node`
    fn element_for(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.page.document.tree();
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|&n| tree.tag_name(n).is_some())
    }

    fn is_overlay_node(&self, node: NodeId) -> bool {
        let tree = self.page.document.tree();
        tree.contains(self.panel, node) || tree.contains(self.style_element, node)
    }

    /// `name` on `target` or its nearest ancestor inside the panel
    fn panel_attribute(&self, target: NodeId, name: &str) -> Option<String> {
        let tree = self.page.document.tree();
        if target == self.panel || !tree.contains(self.panel, target) {
            return None;
        }
        std::iter::once(target)
            .chain(tree.ancestors(target))
            .take_while(|&n| n != self.panel)
            .find_map(|n| tree.get_attribute(n, name).map(str::to_string))
    }

    pub fn session(&self) -> &InspectorSession {
        &self.session
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Page access for host-side mutations; call [`refresh`](Self::refresh)
    /// afterwards to show them
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn console(&self) -> &LogInterceptor {
        &self.console
    }

    pub fn config(&self) -> &DevToolsConfig {
        &self.config
    }

    pub fn namespace(&self) -> &str {
        self.painter.namespace()
    }

    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    pub fn panel(&self) -> NodeId {
        self.panel
    }

    pub fn style_element(&self) -> NodeId {
        self.style_element
    }

    /// The view painted by the last render
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Current markup of the panel
    pub fn panel_html(&self) -> String {
        inner_html(self.page.document.tree(), self.panel)
    }

    pub fn is_visible(&self) -> bool {
        !self.page.document.tree().has_attribute(self.panel, "hidden")
    }
}

fn report(action: &str, outcome: Result<(), DevToolsError>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Inspector {} failed: {}", action, e);
            false
        }
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("namespace", &self.painter.namespace())
            .field("session", &self.session)
            .field("panel", &self.panel)
            .finish()
    }
}

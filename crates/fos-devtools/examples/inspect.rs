//! Example: drive the inspector overlay over a small page
//!
//! Run with `RUST_LOG=debug` to see the overlay's own tracing.

use std::rc::Rc;

use fos_devtools::{
    Clock, DevToolsConfig, EditField, LogInterceptor, MonotonicClock, Overlay, Page, PageEvent,
};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Demo</title></head>
<body>
  <main id="app" class="shell" style="padding: 4px">
    <h1 id="title">Hello</h1>
    <p>Right-click anything.</p>
  </main>
</body>
</html>"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let clock: Rc<dyn Clock> = Rc::new(MonotonicClock::new());
    let console = LogInterceptor::with_tracing(Rc::clone(&clock));
    let mut page = Page::from_html(PAGE, "demo://inspect", clock);
    page.local_storage().borrow_mut().set_item("theme", "dark");
    page.cookies.set_cookie("visited=1; path=/");

    let mut overlay = Overlay::install(page, console, DevToolsConfig::default())?;
    println!("Overlay namespace: {}", overlay.namespace());

    overlay.console().info("page loaded");
    overlay.toggle();

    let title = overlay
        .page()
        .document
        .get_element_by_id("title")
        .ok_or_else(|| anyhow::anyhow!("demo page has no #title"))?;
    overlay.handle_event(PageEvent::ContextMenu { target: title, x: 40, y: 60 });
    overlay.change(EditField::Id, "headline");
    overlay.change(EditField::InnerHtml, "Hello <em>inspector</em>");

    println!("--- display ---");
    for line in overlay.view().lines() {
        println!("{}", line);
    }

    overlay.change(EditField::Script, "console.warn('from the console tab'); [1, 2, 3].length");
    overlay.dispatch("run");
    overlay.dispatch("mark");
    overlay.dispatch("stamp");
    overlay.dispatch("tab:console");

    println!("--- console ---");
    for line in overlay.view().lines() {
        println!("{}", line);
    }

    overlay.dispatch("tab:storage");
    println!("--- storage ---");
    for line in overlay.view().lines() {
        println!("{}", line);
    }

    overlay.handle_event(PageEvent::KeyDown { key: "Escape".to_string() });
    println!("Active after Escape: {}", overlay.session().active);
    Ok(())
}

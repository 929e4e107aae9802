//! Panel rendering
//!
//! `render` is pure: the same input always yields the same view, so
//! switching tabs away and back reproduces the panel exactly.

use crate::console::LogEntry;
use crate::elements::ElementSnapshot;
use crate::inspector::{EditField, SpecialAction, Tab};
use crate::storage::StorageSnapshot;
use crate::view::View;

/// Everything the panel depends on
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub tab: Tab,
    pub element: Option<&'a ElementSnapshot>,
    pub log: &'a [LogEntry],
    pub storage: &'a StorageSnapshot,
    pub measuring: bool,
    pub side_mode: bool,
    pub script_draft: &'a str,
}

pub fn render(input: &RenderInput<'_>) -> View {
    View::container("panel", vec![toolbar(input), render_tab(input)])
}

/// The sub-view of the current tab alone
pub fn render_tab(input: &RenderInput<'_>) -> View {
    match input.tab {
        Tab::Display => display(input.element),
        Tab::Console => console(input.log, input.script_draft),
        Tab::Storage => storage(input.storage),
        Tab::Performance => performance(input.measuring),
    }
}

fn toolbar(input: &RenderInput<'_>) -> View {
    let mut buttons: Vec<View> = Tab::ALL
        .into_iter()
        .map(|tab| View::Button {
            label: tab.label().to_string(),
            action: SpecialAction::SwitchTab(tab),
            pressed: tab == input.tab,
        })
        .collect();
    buttons.push(View::Button {
        label: if input.side_mode { "Float" } else { "Dock" }.to_string(),
        action: SpecialAction::ToggleSide,
        pressed: input.side_mode,
    });
    View::container("tabs", buttons)
}

fn display(element: Option<&ElementSnapshot>) -> View {
    let Some(el) = element else {
        return View::container("display", vec![
            View::Text("Right-click an element to inspect it".to_string()),
        ]);
    };

    let mut children = vec![View::Heading(el.node_name.clone())];
    if !el.connected {
        children.push(View::Text("(detached)".to_string()));
    }
    children.extend([
        View::Field { label: "ID", field: EditField::Id, value: el.id.clone(), multiline: false },
        View::Field { label: "Class", field: EditField::ClassName, value: el.class_name.clone(), multiline: false },
        View::Field { label: "HTML", field: EditField::InnerHtml, value: el.inner_html.clone(), multiline: true },
        View::Heading("Computed style".to_string()),
        View::Table(el.computed_style.clone()),
    ]);
    View::container("display", children)
}

fn console(log: &[LogEntry], draft: &str) -> View {
    let lines = log.iter().map(|entry| View::LogLine {
        timestamp: entry.timestamp,
        level: entry.level,
        text: entry.payload.to_string(),
    });
    let mut children: Vec<View> = vec![View::container("log", lines.collect())];
    children.push(View::Field {
        label: "Script",
        field: EditField::Script,
        value: draft.to_string(),
        multiline: true,
    });
    children.push(View::Button {
        label: "Run".to_string(),
        action: SpecialAction::RunScript,
        pressed: false,
    });
    View::container("console", children)
}

fn storage(snapshot: &StorageSnapshot) -> View {
    View::container("storage", vec![
        View::Heading("Local storage".to_string()),
        View::Table(snapshot.local.clone()),
        View::Heading("Session storage".to_string()),
        View::Table(snapshot.session.clone()),
        View::Heading("Cookies".to_string()),
        View::Text(snapshot.cookie.clone()),
    ])
}

fn performance(measuring: bool) -> View {
    let status = if measuring { "Measuring, stamp to stop" } else { "Idle" };
    View::container("performance", vec![
        View::Text(status.to_string()),
        View::Button { label: "Mark".to_string(), action: SpecialAction::Mark, pressed: measuring },
        View::Button { label: "Stamp".to_string(), action: SpecialAction::Stamp, pressed: false },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{ConsoleValue, LogLevel};
    use fos_dom::NodeId;

    fn snapshot() -> ElementSnapshot {
        ElementSnapshot {
            node: NodeId::ROOT,
            node_name: "DIV".into(),
            id: "foo".into(),
            class_name: "card".into(),
            inner_html: "<b>x</b>".into(),
            computed_style: vec![("display".into(), "block".into())],
            connected: true,
        }
    }

    fn input<'a>(tab: Tab, el: Option<&'a ElementSnapshot>, log: &'a [LogEntry], storage: &'a StorageSnapshot) -> RenderInput<'a> {
        RenderInput { tab, element: el, log, storage, measuring: false, side_mode: false, script_draft: "" }
    }

    #[test]
    fn test_display_tab() {
        let el = snapshot();
        let storage = StorageSnapshot::default();
        let view = render_tab(&input(Tab::Display, Some(&el), &[], &storage));

        assert_eq!(view.field_value(EditField::Id), Some("foo"));
        assert_eq!(view.field_value(EditField::InnerHtml), Some("<b>x</b>"));
        let lines = view.lines();
        assert_eq!(lines[0], "DIV");
        assert!(lines.contains(&"ID: foo".to_string()));
        assert!(lines.contains(&"display: block".to_string()));
    }

    #[test]
    fn test_display_without_selection() {
        let storage = StorageSnapshot::default();
        let view = render_tab(&input(Tab::Display, None, &[], &storage));
        assert_eq!(view.field_value(EditField::Id), None);
        assert_eq!(view.lines().len(), 1);
    }

    #[test]
    fn test_console_tab_lists_entries() {
        let log = vec![
            LogEntry { timestamp: 1.0, level: LogLevel::Info, payload: ConsoleValue::from("a") },
            LogEntry { timestamp: 2.0, level: LogLevel::Error, payload: ConsoleValue::error("Error", "b") },
        ];
        let storage = StorageSnapshot::default();
        let view = render_tab(&input(Tab::Console, None, &log, &storage));
        let lines = view.lines();
        assert_eq!(lines[0], "1.0ms a");
        assert_eq!(lines[1], "2.0ms Error: b");
        assert_eq!(view.actions(), vec![SpecialAction::RunScript]);
    }

    #[test]
    fn test_storage_tab() {
        let storage = StorageSnapshot {
            local: vec![("k".into(), "v".into())],
            session: vec![],
            cookie: "a=1".into(),
        };
        let lines = render_tab(&input(Tab::Storage, None, &[], &storage)).lines();
        assert!(lines.contains(&"k: v".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("a=1"));
    }

    #[test]
    fn test_render_is_pure() {
        let el = snapshot();
        let storage = StorageSnapshot::default();
        let a = render(&input(Tab::Display, Some(&el), &[], &storage));
        for tab in Tab::ALL {
            render(&input(tab, Some(&el), &[], &storage));
        }
        let b = render(&input(Tab::Display, Some(&el), &[], &storage));
        assert_eq!(a, b);
    }

    #[test]
    fn test_toolbar_marks_current_tab() {
        let storage = StorageSnapshot::default();
        let view = render(&input(Tab::Performance, None, &[], &storage));
        let View::Container { children, .. } = &view else { panic!("expected container") };
        let View::Container { children: buttons, .. } = &children[0] else { panic!("expected toolbar") };
        let pressed: Vec<_> = buttons.iter()
            .filter_map(|b| match b {
                View::Button { action, pressed: true, .. } => Some(*action),
                _ => None,
            })
            .collect();
        assert_eq!(pressed, vec![SpecialAction::SwitchTab(Tab::Performance)]);
    }
}

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;
use crate::export::ExportKind;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    // Modal overlays swallow the key that closes them
    if app.alert.is_some() {
        app.dismiss_alert();
        return;
    }
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.editing {
        handle_input_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // Session control
        KeyCode::Char('s') | KeyCode::Enter => app.start(),
        KeyCode::Char('x') => app.stop(),

        // Inputs
        KeyCode::Tab | KeyCode::BackTab => app.focus_next(),
        KeyCode::Char('e') | KeyCode::Char('i') => app.start_editing(),

        // Export
        KeyCode::Char('p') => {
            app.export(ExportKind::Image);
        }
        KeyCode::Char('c') => {
            app.export(ExportKind::Table);
        }

        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle key input while an input field is being edited
fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.finish_editing(),
        KeyCode::Tab | KeyCode::BackTab => app.focus_next(),
        KeyCode::Backspace => app.input_pop(),
        KeyCode::Char(c) => app.input_push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Field;
    use crate::config::Settings;
    use crate::data::Series;
    use crate::probe::{ProbeError, Prober};
    use crate::sampler::{Sampler, SamplerOptions};
    use crate::ui::Theme;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::runtime::Handle;

    #[derive(Debug)]
    struct AlwaysUp;

    #[async_trait]
    impl Prober for AlwaysUp {
        async fn measure(&self, _target: &str) -> Result<f64, ProbeError> {
            Ok(1.0)
        }
    }

    fn app() -> App {
        let settings = Settings::default();
        let (sampler, events) = Sampler::new(
            Arc::new(AlwaysUp),
            Series::new(),
            SamplerOptions::from(&settings),
            Handle::current(),
        );
        App::new(sampler, events, &settings, Theme::dark())
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_edit_target_and_start() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        assert!(app.editing);
        for _ in 0..app.target_input.len() {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "1.1.1.1".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert!(!app.editing);
        assert_eq!(app.target_input, "1.1.1.1");

        press(&mut app, KeyCode::Char('s'));
        assert!(app.session().enabled);
        assert_eq!(app.session().target, "1.1.1.1");

        press(&mut app, KeyCode::Char('x'));
        assert!(!app.session().enabled);
    }

    #[tokio::test]
    async fn test_keys_typed_while_editing_are_not_commands() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Field::Interval);
        press(&mut app, KeyCode::Char('i'));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        assert_eq!(app.interval_input, "2q");
    }

    #[tokio::test]
    async fn test_alert_is_dismissed_by_any_key() {
        let mut app = app();
        app.alert = Some("3 consecutive ping failures.".to_string());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.alert.is_none());
        assert!(app.running);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_and_stops_sampling() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(!app.running);
        assert!(!app.session().enabled);
    }
}

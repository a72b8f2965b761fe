use std::future::Future;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::executor::block_on;
use tracing::debug;

use crate::{
    form::{FormSession, FormValues, SubmitOutcome, SubmitReply},
    presentation::FormView,
    ui::{self, UiContext},
};

use super::{focus::FocusCursor, options::UiOptions, status::StatusLine, terminal::TerminalGuard};

const HELP_TEXT: &str =
    "Tab/↑/↓ move • PgUp/PgDn section • ←/→ change • Ctrl+S save • Ctrl+Q/Esc close";

/// Terminal host for one [`FormSession`]. `submit` is called for every save
/// attempt that passes validation; a failed attempt keeps the form open so
/// the user can try again.
pub struct FormApp<S> {
    session: FormSession,
    options: UiOptions,
    submit: S,
    focus: FocusCursor,
    status: StatusLine,
    exit_armed: bool,
    should_quit: bool,
    reset_terminal: bool,
    result: Option<FormValues>,
}

impl<S, Fut, R> FormApp<S>
where
    S: FnMut(FormValues, Option<String>) -> Fut,
    Fut: Future<Output = R>,
    R: SubmitReply,
{
    pub fn new(session: FormSession, options: UiOptions, submit: S) -> Self {
        let focus = FocusCursor::first(session.definition());
        Self {
            session,
            options,
            submit,
            focus,
            status: StatusLine::new(),
            exit_armed: false,
            should_quit: false,
            reset_terminal: false,
            result: None,
        }
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub fn focus(&self) -> FocusCursor {
        self.focus
    }

    pub fn status(&self) -> &str {
        self.status.message()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Values handed to the submit function by the successful attempt, if
    /// any. `None` after the user closed the form.
    pub fn take_result(&mut self) -> Option<FormValues> {
        self.result.take()
    }

    pub fn run(&mut self) -> Result<Option<FormValues>> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(_, _) => {}
                Event::Mouse(_) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
            if std::mem::take(&mut self.reset_terminal) {
                terminal.resume()?;
            }
        }
        Ok(self.result.take())
    }

    pub fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let help = if self.options.show_help {
            Some(HELP_TEXT)
        } else {
            None
        };
        let state = self.session.state();
        ui::draw(
            frame,
            UiContext {
                view: FormView::of_session(
                    &self.session,
                    &self.options.registry,
                    &self.options.palette,
                ),
                section_index: self.focus.section,
                field_index: self.focus.field,
                status_message: self.status.message(),
                dirty: state.is_dirty(),
                submitting: state.is_submitting(),
                error_count: state.errors().len(),
                help,
            },
        );
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S') => {
                    self.exit_armed = false;
                    self.on_save();
                    return;
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Char('c') | KeyCode::Char('C') => {
                    self.on_exit();
                    return;
                }
                _ => {}
            }
        }

        let definition = self.session.definition();
        match key.code {
            KeyCode::Esc => {
                self.on_exit();
                return;
            }
            KeyCode::Tab | KeyCode::Down => self.focus.next_field(definition),
            KeyCode::BackTab | KeyCode::Up => self.focus.prev_field(definition),
            KeyCode::PageDown => self.focus.next_section(definition),
            KeyCode::PageUp => self.focus.prev_section(definition),
            _ => {
                self.on_field_key(&key);
                return;
            }
        }
        self.exit_armed = false;
    }

    fn on_field_key(&mut self, key: &KeyEvent) {
        let update = {
            let view = FormView::of_session(
                &self.session,
                &self.options.registry,
                &self.options.palette,
            );
            let Some(field) = self.focus.field(view.definition()) else {
                return;
            };
            view.handle_key(field, key)
                .map(|value| (field.name.clone(), field.label.clone(), value))
        };
        let Some((name, label, value)) = update else {
            return;
        };
        self.exit_armed = false;
        match self.session.set_field(&name, value) {
            Ok(()) => self.status.editing(&label),
            Err(err) => self.status.set_raw(err.to_string()),
        }
    }

    fn on_save(&mut self) {
        if !self.session.state().is_dirty() {
            self.status.nothing_to_save();
            return;
        }
        let submit = &mut self.submit;
        let mut submitted = None;
        let outcome = block_on(self.session.submit(|values, entity_id| {
            submitted = Some(values.clone());
            submit(values, entity_id)
        }));
        debug!(?outcome, "save attempt finished");
        match outcome {
            SubmitOutcome::Submitted => {
                self.status.submitted();
                self.result = submitted;
                self.should_quit = true;
            }
            SubmitOutcome::Invalid {
                field,
                message,
                issues,
            } => {
                self.focus.focus_name(self.session.definition(), &field);
                self.status.invalid(issues, &message);
            }
            SubmitOutcome::Failed { reason } => {
                self.status.submit_failed(&reason);
                self.reset_terminal = true;
            }
            SubmitOutcome::Busy => self.status.busy(),
        }
    }

    /// First press on a dirty form arms the prompt; the second one confirms.
    fn on_exit(&mut self) {
        let confirmed = self.exit_armed || !self.options.confirm_exit;
        let closed = block_on(self.session.request_close(|| async move { confirmed }));
        if closed {
            self.should_quit = true;
            self.result = None;
        } else if self.session.state().is_submitting() {
            self.status.busy();
        } else {
            self.exit_armed = true;
            self.status.pending_exit();
        }
    }
}

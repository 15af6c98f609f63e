//! Swatch client state and key handling.
//!
//! Everything here is synchronous; the event loop turns [`Action`]s into
//! network requests and clipboard writes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use super::api::ClientError;
use crate::palette::Palette;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    /// Prompt input is active.
    Editing,
    /// A request is in flight; input is disabled.
    Loading,
    Showing(Palette),
    Failed(String),
}

/// Side effect requested by a key or mouse event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Submit(String),
    Copy(String),
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub input: String,
    pub state: ClientState,
    /// Index of the highlighted swatch while showing a palette
    pub selected: usize,
    /// Swatch whose CSS string was last copied
    pub copied: Option<usize>,
    pub tick: u64,
    pub should_quit: bool,
    /// Screen areas of the rendered swatches, refreshed on every draw
    pub swatch_areas: Vec<Rect>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            state: ClientState::Editing,
            selected: 0,
            copied: None,
            tick: 0,
            should_quit: false,
            swatch_areas: Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == ClientState::Loading
    }

    pub fn palette(&self) -> Option<&Palette> {
        match &self.state {
            ClientState::Showing(palette) => Some(palette),
            _ => None,
        }
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return Action::Quit;
        }

        if self.is_loading() {
            return Action::None;
        }

        if self.palette().is_some() {
            match key.code {
                KeyCode::Left => {
                    self.select(self.selected.saturating_sub(1));
                    return Action::None;
                }
                KeyCode::Right => {
                    self.select(self.selected + 1);
                    return Action::None;
                }
                KeyCode::Enter | KeyCode::Char('c') => return self.copy_action(self.selected),
                _ => {}
            }
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) => {
                self.edit();
                self.input.push(c);
                Action::None
            }
            KeyCode::Backspace => {
                self.edit();
                self.input.pop();
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Action {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.palette().is_none() {
            return Action::None;
        }
        let position = Position::new(mouse.column, mouse.row);
        match self.swatch_areas.iter().position(|area| area.contains(position)) {
            Some(index) => {
                self.select(index);
                self.copy_action(index)
            }
            None => Action::None,
        }
    }

    /// Move into `Loading` and hand back the prompt to send.
    /// A blank prompt or a request already in flight yields [`Action::None`].
    pub fn submit(&mut self) -> Action {
        if self.is_loading() || self.input.trim().is_empty() {
            return Action::None;
        }
        self.state = ClientState::Loading;
        self.copied = None;
        Action::Submit(self.input.trim().to_string())
    }

    pub fn finish_request(&mut self, result: Result<Palette, ClientError>) {
        self.selected = 0;
        self.copied = None;
        self.state = match result {
            Ok(palette) => ClientState::Showing(palette),
            Err(e) => ClientState::Failed(e.to_string()),
        };
    }

    pub fn mark_copied(&mut self, index: usize) {
        self.copied = Some(index);
    }

    fn select(&mut self, index: usize) {
        if let Some(palette) = self.palette() {
            let last = palette.len().saturating_sub(1);
            self.selected = index.min(last);
        }
    }

    fn copy_action(&self, index: usize) -> Action {
        self.palette()
            .and_then(|p| p.colors().get(index))
            .map(|color| Action::Copy(color.to_css()))
            .unwrap_or(Action::None)
    }

    /// Typing after a result clears it.
    fn edit(&mut self) {
        if self.state != ClientState::Editing {
            self.state = ClientState::Editing;
            self.copied = None;
            self.swatch_areas.clear();
        }
    }
}

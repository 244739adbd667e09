//! Keyboard-driven application state wrapped around the [`RefreshController`].

use crate::{
    controller::{RefreshController, TickOutcome},
    refresh::{RefreshSpeed, TickSchedule},
    render::{ChartStore, Viewport},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tracing::info;

/// Bars moved per pan key press.
const PAN_STEP: usize = 5;

/// Longest accepted ticker input.
const MAX_TICKER_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Editing a new ticker; holds the text typed so far.
    Ticker(String),
}

pub struct App {
    controller: RefreshController<ChartStore>,
    schedule: TickSchedule,
    input: InputMode,
    table_rows: usize,
    /// Bars that fit across the price chart, updated on every draw.
    chart_fit: usize,
    refresh_requested: bool,
    quit: bool,
}

impl App {
    pub fn new(
        controller: RefreshController<ChartStore>,
        speed: RefreshSpeed,
        table_rows: usize,
    ) -> Self {
        Self {
            controller,
            schedule: TickSchedule::new(speed),
            input: InputMode::Normal,
            table_rows,
            chart_fit: usize::MAX,
            refresh_requested: false,
            quit: false,
        }
    }

    /// Load `ticker` and request an immediate tick.
    pub fn submit_ticker(&mut self, ticker: &str) {
        self.controller.submit_ticker(ticker);
        self.refresh_requested = true;
    }

    /// Run a tick if one was requested or the schedule says one is due.
    pub async fn poll_tick(&mut self, now: Instant) -> Option<TickOutcome> {
        if !(self.refresh_requested || self.schedule.is_due(now)) {
            return None;
        }
        self.refresh_requested = false;
        let outcome = self.controller.tick().await;
        self.schedule.mark(now);
        Some(outcome)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        match &mut self.input {
            InputMode::Ticker(buffer) => match key.code {
                KeyCode::Enter => {
                    let ticker = std::mem::take(buffer);
                    self.input = InputMode::Normal;
                    self.submit_ticker(&ticker);
                }
                KeyCode::Esc => self.input = InputMode::Normal,
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) if is_ticker_char(c) && buffer.len() < MAX_TICKER_LEN => {
                    buffer.push(c.to_ascii_uppercase());
                }
                _ => {}
            },
            InputMode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        let fit = self.chart_fit;

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('/') => self.input = InputMode::Ticker(String::new()),
            KeyCode::Char('r') => self.refresh_requested = true,
            KeyCode::Char('+') | KeyCode::Char('=') => self.set_speed(self.speed().faster()),
            KeyCode::Char('-') => self.set_speed(self.speed().slower()),
            KeyCode::Left => self.viewport_mut().pan_back(PAN_STEP),
            KeyCode::Right => self.viewport_mut().pan_forward(PAN_STEP),
            KeyCode::Char('[') => self.viewport_mut().zoom_in(fit),
            KeyCode::Char(']') => self.viewport_mut().zoom_out(fit),
            KeyCode::Char('0') => self.viewport_mut().reset(),
            _ => {}
        }
    }

    fn viewport_mut(&mut self) -> &mut Viewport {
        self.controller.renderer_mut().viewport_mut()
    }

    fn set_speed(&mut self, speed: RefreshSpeed) {
        if speed != self.schedule.speed() {
            info!(from = %self.schedule.speed(), to = %speed, "refresh speed changed");
            self.schedule.set_speed(speed);
        }
    }

    pub fn controller(&self) -> &RefreshController<ChartStore> {
        &self.controller
    }

    pub fn speed(&self) -> RefreshSpeed {
        self.schedule.speed()
    }

    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    pub fn input(&self) -> &InputMode {
        &self.input
    }

    pub fn table_rows(&self) -> usize {
        self.table_rows
    }

    pub fn set_chart_fit(&mut self, fit: usize) {
        self.chart_fit = fit.max(1);
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}

fn is_ticker_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')
}

//! Interactive terminal prompts.
//!
//! This module provides the four prompts the wizard needs:
//! - confirm: a yes/no question answered with a single key
//! - input: a free-text line, trimmed, empty meaning the default
//! - select: one option from a fixed list
//! - multi-select: any number of options from a fixed list
//!
//! Each prompt has a `*_with` variant taking an injected [`EventSource`] (and a
//! ratatui backend where it draws) so tests can script key presses.
use std::io::{self, Write};

use colored::*;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use ratatui::{
    Frame, Terminal, TerminalOptions, Viewport,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// Trait representing an event source (so tests can inject fake events).
pub trait EventSource {
    fn read_event(&mut self) -> anyhow::Result<Event>;
}

/// Real event source that delegates to `crossterm::event::read`.
struct CrosstermEventSource;

impl EventSource for CrosstermEventSource {
    fn read_event(&mut self) -> anyhow::Result<Event> {
        Ok(event::read()?)
    }
}

/// What a key press means to a prompt loop.
enum KeyAction {
    Key(KeyCode),
    Interrupt,
    Ignore,
}

fn next_key<E: EventSource>(events: &mut E) -> anyhow::Result<KeyAction> {
    match events.read_event()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
                Ok(KeyAction::Interrupt)
            } else {
                Ok(KeyAction::Key(key.code))
            }
        }
        _ => Ok(KeyAction::Ignore),
    }
}

/// Enable raw mode for the duration of `f`, restoring the terminal in all cases.
fn with_raw_mode<T>(f: impl FnOnce() -> anyhow::Result<T>) -> anyhow::Result<T> {
    terminal::enable_raw_mode()?;
    let res = f();
    terminal::disable_raw_mode()?;
    res
}

/// Run a drawing prompt in an inline viewport of `height` rows on stderr.
fn with_inline_terminal<T>(
    height: u16,
    f: impl FnOnce(&mut Terminal<CrosstermBackend<io::Stderr>>, &mut CrosstermEventSource) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    with_raw_mode(|| {
        let backend = CrosstermBackend::new(io::stderr());
        let mut terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(height),
            },
        )?;
        let mut events = CrosstermEventSource;
        let res = f(&mut terminal, &mut events);
        terminal.clear()?;
        res
    })
}

fn question_prefix() -> ColoredString {
    "?".green().bold()
}

/// Print the final answer line after a prompt closes.
fn echo_answer(message: &str, answer: &str) -> io::Result<()> {
    let mut stderr = io::stderr();
    writeln!(stderr, "{} {} {}", question_prefix(), message.bold(), answer.cyan())
}

/// Ask a yes/no question on the terminal.
pub fn confirm(message: &str, default: bool, help: &str) -> anyhow::Result<bool> {
    let mut stderr = io::stderr();
    let mut events = CrosstermEventSource;
    with_raw_mode(|| confirm_with(&mut stderr, &mut events, message, default, help))
}

/// Confirm with an injected writer and event source.
///
/// `y`/`n` answer directly, Enter and Esc take the default, `?` shows the help text.
pub fn confirm_with<W: Write, E: EventSource>(
    out: &mut W,
    events: &mut E,
    message: &str,
    default: bool,
    help: &str,
) -> anyhow::Result<bool> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    let help_hint = if help.is_empty() { "" } else { " [? for help]" };
    write!(
        out,
        "{} {} {}{} ",
        question_prefix(),
        message.bold(),
        hint.dimmed(),
        help_hint.dimmed()
    )?;
    out.flush()?;

    let answer = loop {
        match next_key(events)? {
            KeyAction::Interrupt => {
                write!(out, "\r\n")?;
                anyhow::bail!("interrupted");
            }
            KeyAction::Key(KeyCode::Char('y') | KeyCode::Char('Y')) => break true,
            KeyAction::Key(KeyCode::Char('n') | KeyCode::Char('N')) => break false,
            KeyAction::Key(KeyCode::Enter | KeyCode::Esc) => break default,
            KeyAction::Key(KeyCode::Char('?')) if !help.is_empty() => {
                write!(out, "\r\n{}\r\n", help.cyan())?;
                write!(out, "{} {} {} ", question_prefix(), message.bold(), hint.dimmed())?;
                out.flush()?;
            }
            _ => {}
        }
    };

    let label = if answer { "Yes" } else { "No" };
    write!(out, "{}\r\n", label.cyan())?;
    out.flush()?;
    Ok(answer)
}

/// Ask for a line of text on the terminal.
pub fn input(message: &str, default: &str, help: &str) -> anyhow::Result<String> {
    let height = if help.is_empty() { 3 } else { 4 };
    let value = with_inline_terminal(height, |terminal, events| {
        input_with(terminal, events, message, default, help)
    })?;
    echo_answer(message, &value)?;
    Ok(value)
}

/// Text input with injected backend and event source.
///
/// The answer is trimmed; an empty answer takes the default.
pub fn input_with<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    events: &mut E,
    message: &str,
    default: &str,
    help: &str,
) -> anyhow::Result<String> {
    let mut current = String::new();

    loop {
        terminal.draw(|frame| render_input_ui(frame, message, &current, default, help))?;

        match next_key(events)? {
            KeyAction::Interrupt => anyhow::bail!("interrupted"),
            KeyAction::Key(KeyCode::Enter) => break,
            KeyAction::Key(KeyCode::Esc) => anyhow::bail!("Prompt cancelled"),
            KeyAction::Key(KeyCode::Backspace) => {
                current.pop();
            }
            KeyAction::Key(KeyCode::Char(c)) => current.push(c),
            _ => {}
        }
    }

    let trimmed = current.trim();
    if trimmed.is_empty() {
        Ok(default.trim().to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn render_input_ui(f: &mut Frame, message: &str, current: &str, default: &str, help: &str) {
    let chunks = Layout::default()
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(f.size());

    let content = if current.is_empty() && !default.is_empty() {
        Line::from(vec![
            Span::styled(default, Style::default().fg(Color::DarkGray)),
            Span::raw("│"),
        ])
    } else {
        Line::from(vec![Span::raw(current), Span::raw("│")])
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            message,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(content).block(block), chunks[0]);

    if !help.is_empty() {
        f.render_widget(
            Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
    }
}

fn list_height(options: usize, help: &str) -> u16 {
    let rows = options.min(10) as u16 + 2;
    if help.is_empty() { rows + 1 } else { rows + 2 }
}

/// Pick one option on the terminal.
pub fn select(message: &str, options: &[String], default: &str, help: &str) -> anyhow::Result<String> {
    let value = with_inline_terminal(list_height(options.len(), help), |terminal, events| {
        select_with(terminal, events, message, options, default, help)
    })?;
    echo_answer(message, &value)?;
    Ok(value)
}

/// Single selection with injected backend and event source.
///
/// The cursor starts on `default` (or the first option if it is not listed).
pub fn select_with<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    events: &mut E,
    message: &str,
    options: &[String],
    default: &str,
    help: &str,
) -> anyhow::Result<String> {
    if options.is_empty() {
        anyhow::bail!("No options to select from");
    }

    let mut list_state = ListState::default();
    let start = options.iter().position(|o| o == default).unwrap_or(0);
    list_state.select(Some(start));

    loop {
        terminal.draw(|frame| {
            render_list_ui(frame, message, options, None, help, &mut list_state);
        })?;

        match next_key(events)? {
            KeyAction::Interrupt => anyhow::bail!("interrupted"),
            KeyAction::Key(KeyCode::Up) => {
                if let Some(idx) = list_state.selected()
                    && idx > 0
                {
                    list_state.select(Some(idx - 1));
                }
            }
            KeyAction::Key(KeyCode::Down) => {
                if let Some(idx) = list_state.selected()
                    && idx + 1 < options.len()
                {
                    list_state.select(Some(idx + 1));
                }
            }
            KeyAction::Key(KeyCode::Enter) => break,
            KeyAction::Key(KeyCode::Esc) => anyhow::bail!("Selection cancelled"),
            _ => {}
        }
    }

    let idx = list_state.selected().unwrap_or(start);
    Ok(options[idx].clone())
}

/// Pick any number of options on the terminal.
pub fn multi_select(
    message: &str,
    options: &[String],
    defaults: &[String],
    help: &str,
) -> anyhow::Result<Vec<String>> {
    let values = with_inline_terminal(list_height(options.len(), help), |terminal, events| {
        multi_select_with(terminal, events, message, options, defaults, help)
    })?;
    echo_answer(message, &values.join(", "))?;
    Ok(values)
}

/// Multiple selection with injected backend and event source.
///
/// Space toggles the option under the cursor, Right selects all, Left clears.
/// Options listed in `defaults` start checked. The result keeps option order.
pub fn multi_select_with<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    events: &mut E,
    message: &str,
    options: &[String],
    defaults: &[String],
    help: &str,
) -> anyhow::Result<Vec<String>> {
    let mut selected: Vec<bool> = options.iter().map(|o| defaults.contains(o)).collect();
    let mut list_state = ListState::default();
    if !options.is_empty() {
        list_state.select(Some(0));
    }

    loop {
        terminal.draw(|frame| {
            render_list_ui(frame, message, options, Some(selected.as_slice()), help, &mut list_state);
        })?;

        match next_key(events)? {
            KeyAction::Interrupt => anyhow::bail!("interrupted"),
            KeyAction::Key(KeyCode::Up) => {
                if let Some(idx) = list_state.selected()
                    && idx > 0
                {
                    list_state.select(Some(idx - 1));
                }
            }
            KeyAction::Key(KeyCode::Down) => {
                if let Some(idx) = list_state.selected()
                    && idx + 1 < options.len()
                {
                    list_state.select(Some(idx + 1));
                }
            }
            KeyAction::Key(KeyCode::Char(' ')) => {
                if let Some(idx) = list_state.selected() {
                    selected[idx] = !selected[idx];
                }
            }
            KeyAction::Key(KeyCode::Right) => selected.iter_mut().for_each(|s| *s = true),
            KeyAction::Key(KeyCode::Left) => selected.iter_mut().for_each(|s| *s = false),
            KeyAction::Key(KeyCode::Enter) => break,
            KeyAction::Key(KeyCode::Esc) => anyhow::bail!("Selection cancelled"),
            _ => {}
        }
    }

    Ok(options
        .iter()
        .zip(&selected)
        .filter(|(_, checked)| **checked)
        .map(|(option, _)| option.clone())
        .collect())
}

/// Render a select or multi-select list. `checked` is `Some` for multi-select.
fn render_list_ui(
    f: &mut Frame,
    message: &str,
    options: &[String],
    checked: Option<&[bool]>,
    help: &str,
    list_state: &mut ListState,
) {
    let size = f.size();
    let footer_height = if help.is_empty() { 1 } else { 2 };
    let chunks = Layout::default()
        .constraints([
            Constraint::Min(3),
            Constraint::Length(footer_height),
        ])
        .split(size);

    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, option)| match checked {
            Some(checked) => {
                let checkbox = if checked[i] { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}", checkbox, option))
            }
            None => ListItem::new(option.as_str()),
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    message,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], &mut *list_state);

    let instructions = if checked.is_some() {
        "↑/↓: navigate | Space: toggle | →: all | ←: none | Enter: confirm"
    } else {
        "↑/↓: navigate | Enter: confirm"
    };
    let mut lines = vec![Line::from(Span::styled(
        instructions,
        Style::default().fg(Color::DarkGray),
    ))];
    if !help.is_empty() {
        lines.push(Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))));
    }
    f.render_widget(Paragraph::new(lines), chunks[1]);
}

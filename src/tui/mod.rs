pub mod app;

use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use self::app::{App, Panel};
use wfconsole::config::Config;
use wfconsole::model::{AttemptStatus, TaskState};

/// Run the interactive console on one attempt
pub fn run(data_dir: PathBuf, attempt_id: &str) -> Result<()> {
    let config = Config::load(&data_dir)?;

    // Restore the terminal before a panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = ratatui::init();
    let mut app = App::new(data_dir, attempt_id, config);

    let result = run_event_loop(&mut terminal, &mut app);

    ratatui::restore();

    result
}

fn run_event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(app.poll_interval)? {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                if app.show_help {
                    if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                        app.show_help = false;
                    }
                } else {
                    handle_key(app, key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab | KeyCode::BackTab => app.next_panel(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate(),
        KeyCode::Char('s') => app.cycle_status_filter(),
        KeyCode::Char('r') => app.reload(),
        _ => {}
    }
}

fn draw(frame: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),         // attempt panels
            Constraint::Percentage(30), // sessions
            Constraint::Length(1),      // status bar
        ])
        .split(frame.area());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer[0]);

    draw_timeline(frame, app, panels[0]);
    draw_tasks(frame, app, panels[1]);
    draw_sessions(frame, app, outer[1]);
    draw_status_bar(frame, app, outer[2]);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

fn draw_timeline(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel_block(" Timeline ".to_string(), app.panel == Panel::Timeline);

    if let Some(ref error) = app.load_error {
        let content = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", error), Style::default().fg(Color::Red))),
        ])
        .block(block);
        frame.render_widget(content, area);
        return;
    }

    let indent = app.config.display.indent_width;
    let items: Vec<ListItem> = app
        .timeline
        .iter()
        .map(|row| {
            let mut spans = vec![
                Span::raw(" ".repeat(row.depth * indent)),
                Span::styled(format!("{} ", row.marker()), Style::default().fg(Color::DarkGray)),
                Span::styled(row.label.clone(), Style::default().fg(Color::White)),
                Span::raw(" "),
                Span::styled(row.state_label(), Style::default().fg(task_state_color(row.state))),
            ];
            if app.config.display.show_times
                && let Some(d) = row.duration()
            {
                spans.push(Span::styled(
                    format!(" {}", wfconsole::view::format_duration(d.num_seconds())),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    render_list(frame, area, block, items, app.timeline_selected, app.panel == Panel::Timeline);
}

fn draw_tasks(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel_block(" Tasks ".to_string(), app.panel == Panel::Tasks);
    let indent = app.config.display.indent_width;
    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .map(|row| {
            ListItem::new(Line::from(vec![
                Span::raw(" ".repeat(row.depth * indent)),
                Span::styled(row.label.clone(), Style::default().fg(Color::White)),
                Span::raw(" "),
                Span::styled(row.state_label(), Style::default().fg(task_state_color(row.state))),
            ]))
        })
        .collect();

    render_list(frame, area, block, items, app.tasks_selected, app.panel == Panel::Tasks);
}

fn draw_sessions(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Sessions (Status: {}) ", app.status_filter);
    let block = panel_block(title, app.panel == Panel::Sessions);
    let items: Vec<ListItem> = app
        .visible_sessions()
        .iter()
        .map(|s| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<5}", s.id), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<16}", s.project_name), Style::default().fg(Color::White)),
                Span::styled(format!("{:<24}", s.workflow_name), Style::default().fg(Color::White)),
                Span::styled(format!("{:<38}", s.session_uuid), Style::default().fg(Color::DarkGray)),
                Span::styled(s.status.label(), Style::default().fg(attempt_status_color(s.status))),
            ]))
        })
        .collect();

    render_list(frame, area, block, items, app.sessions_selected, app.panel == Panel::Sessions);
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    block: Block<'static>,
    items: Vec<ListItem>,
    selected: usize,
    focused: bool,
) {
    let empty = items.is_empty();
    let highlight = if focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    let mut state = ListState::default();
    if !empty {
        state.select(Some(selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(
            app.title(),
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.key_hints(), Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(bar, area);
}

fn draw_help_overlay(frame: &mut Frame) {
    let area = centered_rect(50, 50, frame.area());
    let lines = vec![
        Line::from(""),
        Line::from("  Tab        switch panel"),
        Line::from("  j / k      move selection"),
        Line::from("  Enter      fold/unfold timeline node, open session"),
        Line::from("  s          cycle session status filter"),
        Line::from("  r          reload snapshot"),
        Line::from("  q / Esc    quit"),
        Line::from("  ?          close this help"),
    ];
    let help = Paragraph::new(lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn task_state_color(state: Option<TaskState>) -> Color {
    match state {
        None => Color::DarkGray,
        Some(TaskState::Success) => Color::Green,
        Some(TaskState::Error | TaskState::GroupError) => Color::Red,
        Some(TaskState::Running) => Color::Yellow,
        Some(TaskState::RetryWaiting | TaskState::GroupRetryWaiting) => Color::Magenta,
        Some(TaskState::Canceled) => Color::Gray,
        Some(TaskState::Blocked | TaskState::Ready | TaskState::Planned) => Color::Blue,
    }
}

fn attempt_status_color(status: AttemptStatus) -> Color {
    match status {
        AttemptStatus::Success => Color::Green,
        AttemptStatus::Failure => Color::Red,
        AttemptStatus::Running => Color::Yellow,
        AttemptStatus::Canceling | AttemptStatus::Canceled => Color::Gray,
        AttemptStatus::Pending => Color::Blue,
    }
}

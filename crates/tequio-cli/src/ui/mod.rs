//! TUI rendering — orchestrates all panes.

pub mod form;
pub mod table;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, EntityKind, Modal};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  table::draw(f, rows[1], app);
  draw_status(f, rows[2], app);

  if app.modal.is_some() {
    form::draw_modal(f, area, app);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

/// One tab per entity screen, the active one highlighted.
fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let mut spans = vec![Span::styled(
    " tequio ",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )];
  for (idx, kind) in EntityKind::ALL.iter().enumerate() {
    let label = format!(" {} {} ", idx + 1, kind.title());
    let style = if *kind == app.screen {
      Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(label, style));
  }

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let hints = match &app.modal {
    Some(Modal::ConfirmDelete { .. }) => "[y] delete  [n] keep",
    Some(Modal::Project(_)) => {
      "[Tab] next field  [←/→] choose  [↑/↓] pick student  [Enter] save  [Esc] cancel"
    }
    Some(_) => "[Tab] next field  [←/→] choose  [Enter] save  [Esc] cancel",
    None if app.filter_active => "[Enter] apply filter  [Esc] clear",
    None => {
      "[1-7] screen  [/] filter  [n] new  [e] edit  [d] delete  [r] refresh  [q] quit"
    }
  };

  let left = if app.filter_active || !app.filter.is_empty() {
    Span::styled(
      format!(" /{}", app.filter),
      Style::default().fg(Color::Yellow),
    )
  } else {
    Span::styled(
      format!(" {}", app.status_msg),
      Style::default().fg(Color::Yellow),
    )
  };
  let right = Span::styled(
    format!("{hints} "),
    Style::default().fg(Color::DarkGray),
  );

  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);
  f.render_widget(Paragraph::new(line), area);
}

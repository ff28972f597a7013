//! Entity table pane.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = app.filtered_rows();

  let header = Row::new(
    app
      .screen
      .columns()
      .iter()
      .map(|c| Cell::from(*c))
      .collect::<Vec<_>>(),
  )
  .style(
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let body = rows
    .iter()
    .map(|row| Row::new(row.cells.iter().map(|c| Cell::from(c.as_str()))))
    .collect::<Vec<_>>();

  let widths = vec![Constraint::Fill(1); app.screen.columns().len()];

  let title = format!(" {} ({}) ", app.screen.title(), rows.len());
  let table = Table::new(body, widths)
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL))
    .row_highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    );

  let mut state = TableState::default();
  if !rows.is_empty() {
    state.select(Some(app.cursor.min(rows.len() - 1)));
  }
  f.render_stateful_widget(table, area, &mut state);
}

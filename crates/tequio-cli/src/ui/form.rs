//! Modal rendering: the two composite forms, the generic field form, and
//! the delete confirmation dialog.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
  app::{
    App, I_DEPARTMENT, I_DISTRICT, I_EMAIL, I_KIND, I_MUNICIPALITY, I_NAME,
    I_NUMBER, I_PHONE, I_STREET, InstitutionModal, Modal, P_COORDINATOR,
    P_DESCRIPTION, P_END, P_INSTITUTION, P_NAME, P_START, P_STATUS, P_STUDENT,
    ProjectModal,
  },
  forms::FieldModal,
};

// ─── Dispatch ─────────────────────────────────────────────────────────────────

pub fn draw_modal(f: &mut Frame, area: Rect, app: &App) {
  match &app.modal {
    Some(Modal::Institution(m)) => draw_institution(f, area, m),
    Some(Modal::Project(m)) => draw_project(f, area, m),
    Some(Modal::Fields(m)) => draw_fields(f, area, m),
    Some(Modal::ConfirmDelete { label, kind, .. }) => {
      draw_confirm(f, area, kind.singular(), label)
    }
    None => {}
  }
}

// ─── Layout helpers ───────────────────────────────────────────────────────────

/// A centered box of `width` × `height`, clamped to the frame.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x:      area.x + (area.width - width) / 2,
    y:      area.y + (area.height - height) / 2,
    width,
    height,
  }
}

fn field_line<'a>(
  label: &'a str,
  value: String,
  focused: bool,
  enabled: bool,
) -> Line<'a> {
  let marker = if focused { "▌ " } else { "  " };
  let label_style = if !enabled {
    Style::default().fg(Color::DarkGray)
  } else if focused {
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  let value_style = if !enabled {
    Style::default().fg(Color::DarkGray)
  } else if focused {
    Style::default().add_modifier(Modifier::BOLD)
  } else {
    Style::default()
  };
  Line::from(vec![
    Span::styled(marker, Style::default().fg(Color::Yellow)),
    Span::styled(format!("{label:<14}"), label_style),
    Span::styled(value, value_style),
  ])
}

fn hint_line(text: &str) -> Line<'static> {
  Line::from(Span::styled(
    text.to_owned(),
    Style::default().fg(Color::DarkGray),
  ))
}

fn render_box(f: &mut Frame, area: Rect, title: String, lines: Vec<Line>) {
  let height = lines.len() as u16 + 2;
  let rect = centered(area, 64, height);
  f.render_widget(Clear, rect);
  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL);
  let inner = block.inner(rect);
  f.render_widget(block, rect);
  f.render_widget(Paragraph::new(lines), inner);
}

// ─── Institution ──────────────────────────────────────────────────────────────

fn draw_institution(f: &mut Frame, area: Rect, m: &InstitutionModal) {
  let form = &m.form;
  let selection = &form.selection;

  let department = selection
    .department
    .and_then(|id| form.departments.iter().find(|d| d.id == id))
    .map(|d| d.name.clone())
    .unwrap_or_default();
  let municipality = selection
    .municipality
    .and_then(|id| form.municipalities.iter().find(|x| x.id == id))
    .map(|x| x.name.clone())
    .unwrap_or_default();
  let district = selection
    .district
    .and_then(|id| form.districts.iter().find(|x| x.id == id))
    .map(|x| x.name.clone())
    .unwrap_or_default();
  let kind = form
    .draft
    .kind
    .map(|k| k.label().to_owned())
    .unwrap_or_default();

  let select = |v: String| format!("‹ {v} ›");

  let lines = vec![
    field_line("Name", form.draft.name.clone(), m.focus == I_NAME, true),
    field_line("Phone", form.draft.phone.clone(), m.focus == I_PHONE, true),
    field_line("Email", form.draft.email.clone(), m.focus == I_EMAIL, true),
    field_line("Type", select(kind), m.focus == I_KIND, true),
    field_line(
      "Department",
      select(department),
      m.focus == I_DEPARTMENT,
      true,
    ),
    // Lower levels are disabled, not hidden, until their parent is chosen.
    field_line(
      "Municipality",
      select(municipality),
      m.focus == I_MUNICIPALITY,
      selection.municipality_enabled(),
    ),
    field_line(
      "District",
      select(district),
      m.focus == I_DISTRICT,
      selection.district_enabled(),
    ),
    field_line(
      "Street",
      form.draft.street_name.clone(),
      m.focus == I_STREET,
      true,
    ),
    field_line(
      "Number",
      form.draft.street_number.clone(),
      m.focus == I_NUMBER,
      true,
    ),
    hint_line("Tab next · ←/→ choose · Enter save · Esc cancel"),
  ];

  let title = if form.draft.id.is_some() {
    "Edit institution"
  } else {
    "New institution"
  };
  render_box(f, area, title.to_owned(), lines);
}

// ─── Project ──────────────────────────────────────────────────────────────────

fn draw_project(f: &mut Frame, area: Rect, m: &ProjectModal) {
  let form = &m.form;

  let coordinator = form
    .draft
    .coordinator_id
    .and_then(|id| form.coordinators.iter().find(|c| c.id == id))
    .map(|c| c.display_name())
    .unwrap_or_default();
  let institution = form
    .draft
    .institution_id
    .and_then(|id| form.institutions.iter().find(|i| i.id == id))
    .map(|i| i.name.clone())
    .unwrap_or_default();

  let select = |v: String| format!("‹ {v} ›");

  let student_value = if form.draft.student_id.is_some() {
    format!("{} ✓", form.search.query())
  } else {
    form.search.query().to_owned()
  };

  let mut lines = vec![
    field_line("Name", form.draft.name.clone(), m.focus == P_NAME, true),
    field_line(
      "Description",
      form.draft.description.clone(),
      m.focus == P_DESCRIPTION,
      true,
    ),
    field_line(
      "Status",
      select(form.draft.status.label().to_owned()),
      m.focus == P_STATUS,
      true,
    ),
    field_line("Student", student_value, m.focus == P_STUDENT, true),
  ];

  // Search results drop down under the student field while it is focused.
  if m.focus == P_STUDENT {
    let results = form.search.results();
    if results.is_empty() && form.search.query().chars().count() >= 2 {
      lines.push(Line::from(Span::styled(
        "    no students found",
        Style::default().fg(Color::Red),
      )));
    }
    for (idx, hit) in results.iter().enumerate() {
      let style = if idx == m.hit_cursor {
        Style::default()
          .fg(Color::Black)
          .bg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(Color::Gray)
      };
      lines.push(Line::from(Span::styled(
        format!("    {} ", hit.display_name()),
        style,
      )));
    }
  }

  lines.extend([
    field_line(
      "Coordinator",
      select(coordinator),
      m.focus == P_COORDINATOR,
      true,
    ),
    field_line(
      "Institution",
      select(institution),
      m.focus == P_INSTITUTION,
      true,
    ),
    field_line("Start date", m.start_text.clone(), m.focus == P_START, true),
    field_line("End date", m.end_text.clone(), m.focus == P_END, true),
    hint_line("Tab next · type to search · ↑/↓ pick · Enter save · Esc cancel"),
  ]);

  let title = if form.draft.id.is_some() {
    "Edit project"
  } else {
    "New project"
  };
  render_box(f, area, title.to_owned(), lines);
}

// ─── Generic fields ───────────────────────────────────────────────────────────

fn draw_fields(f: &mut Frame, area: Rect, m: &FieldModal) {
  let mut lines: Vec<Line> = m
    .fields
    .iter()
    .enumerate()
    .map(|(idx, field)| {
      let value = match &field.widget {
        crate::forms::Widget::Select { .. } => format!("‹ {} ›", field.display()),
        crate::forms::Widget::Text { .. } => field.display(),
      };
      field_line(field.label, value, idx == m.focus, true)
    })
    .collect();
  lines.push(hint_line("Tab next · ←/→ choose · Enter save · Esc cancel"));

  render_box(f, area, m.title(), lines);
}

// ─── Delete confirmation ──────────────────────────────────────────────────────

fn draw_confirm(f: &mut Frame, area: Rect, noun: &str, label: &str) {
  let lines = vec![
    Line::from(format!("Delete {noun} \"{label}\"?")),
    Line::from(""),
    hint_line("This cannot be undone · y delete · n keep"),
  ];
  render_box(f, area, "Confirm".to_owned(), lines);
}

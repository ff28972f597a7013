//! Generic labelled-field modal used by the flat entities (coordinations,
//! coordinators, degrees, students, users).
//!
//! The composite institution and project forms have dedicated session types
//! in `tequio-forms`; everything else is a list of text and select fields
//! built here and converted back into a typed payload on submit.

use tequio_core::{
  id::{CoordinationId, DegreeId, UserId},
  record::{
    Coordination, Coordinator, Degree, NewCoordination, NewCoordinator,
    NewDegree, NewStudent, NewUser, Student, User,
  },
};

use crate::app::EntityKind;

// ─── Widgets ─────────────────────────────────────────────────────────────────

/// One option of a select field. `id` is `None` for choices that are not
/// backed by a record (role names, the "(none)" entry of optional links).
#[derive(Debug, Clone)]
pub struct Choice {
  pub id:    Option<i64>,
  pub label: String,
}

#[derive(Debug)]
pub enum Widget {
  Text {
    value:  String,
    masked: bool,
  },
  Select {
    options:  Vec<Choice>,
    selected: Option<usize>,
  },
}

#[derive(Debug)]
pub struct FormField {
  pub label:  &'static str,
  pub widget: Widget,
}

impl FormField {
  fn text(label: &'static str, value: &str) -> Self {
    Self {
      label,
      widget: Widget::Text {
        value:  value.to_owned(),
        masked: false,
      },
    }
  }

  fn masked(label: &'static str) -> Self {
    Self {
      label,
      widget: Widget::Text {
        value:  String::new(),
        masked: true,
      },
    }
  }

  fn select(
    label: &'static str,
    options: Vec<Choice>,
    selected_id: Option<i64>,
  ) -> Self {
    let selected =
      selected_id.and_then(|id| options.iter().position(|c| c.id == Some(id)));
    Self {
      label,
      widget: Widget::Select { options, selected },
    }
  }

  fn select_by_label(
    label: &'static str,
    options: Vec<Choice>,
    selected_label: Option<&str>,
  ) -> Self {
    let selected = selected_label
      .and_then(|wanted| options.iter().position(|c| c.label == wanted));
    Self {
      label,
      widget: Widget::Select { options, selected },
    }
  }

  /// Human-readable current value, for rendering.
  pub fn display(&self) -> String {
    match &self.widget {
      Widget::Text { value, masked: false } => value.clone(),
      Widget::Text { value, masked: true } => "•".repeat(value.chars().count()),
      Widget::Select { options, selected } => selected
        .and_then(|i| options.get(i))
        .map(|c| c.label.clone())
        .unwrap_or_default(),
    }
  }
}

// ─── Modal ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct FieldModal {
  pub kind:   EntityKind,
  /// Id of the record being edited; `None` when creating.
  pub id:     Option<i64>,
  pub fields: Vec<FormField>,
  pub focus:  usize,
}

impl FieldModal {
  pub fn title(&self) -> String {
    let verb = if self.id.is_some() { "Edit" } else { "New" };
    format!("{verb} {}", self.kind.singular())
  }

  pub fn next_focus(&mut self) {
    self.focus = (self.focus + 1) % self.fields.len();
  }

  pub fn prev_focus(&mut self) {
    self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
  }

  pub fn push_char(&mut self, c: char) {
    if let Widget::Text { value, .. } = &mut self.fields[self.focus].widget {
      value.push(c);
    }
  }

  pub fn pop_char(&mut self) {
    if let Widget::Text { value, .. } = &mut self.fields[self.focus].widget {
      value.pop();
    }
  }

  /// Step the focused select forward or backward, wrapping.
  pub fn cycle(&mut self, forward: bool) {
    if let Widget::Select { options, selected } =
      &mut self.fields[self.focus].widget
    {
      if options.is_empty() {
        return;
      }
      let len = options.len();
      *selected = Some(match (*selected, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
      });
    }
  }

  // ── Extraction ────────────────────────────────────────────────────────

  fn text_at(&self, idx: usize) -> String {
    match &self.fields[idx].widget {
      Widget::Text { value, .. } => value.trim().to_owned(),
      Widget::Select { .. } => String::new(),
    }
  }

  fn required_text(&self, idx: usize) -> Result<String, String> {
    let value = self.text_at(idx);
    if value.is_empty() {
      Err(format!("{} is required", self.fields[idx].label))
    } else {
      Ok(value)
    }
  }

  fn choice_at(&self, idx: usize) -> Option<&Choice> {
    match &self.fields[idx].widget {
      Widget::Select { options, selected } => {
        selected.and_then(|i| options.get(i))
      }
      Widget::Text { .. } => None,
    }
  }

  fn select_id_at(&self, idx: usize) -> Option<i64> {
    self.choice_at(idx).and_then(|c| c.id)
  }

  fn required_select(&self, idx: usize) -> Result<i64, String> {
    self
      .select_id_at(idx)
      .ok_or_else(|| format!("choose a {}", self.fields[idx].label))
  }
}

// ─── Builders ────────────────────────────────────────────────────────────────

fn none_choice() -> Choice {
  Choice {
    id:    None,
    label: "(none)".into(),
  }
}

fn coordination_choices(coordinations: &[Coordination]) -> Vec<Choice> {
  coordinations
    .iter()
    .map(|c| Choice {
      id:    Some(c.id.0),
      label: c.name.clone(),
    })
    .collect()
}

fn user_choices(users: &[User]) -> Vec<Choice> {
  let mut choices = vec![none_choice()];
  choices.extend(users.iter().map(|u| Choice {
    id:    Some(u.id.0),
    label: format!("{} <{}>", u.name, u.email),
  }));
  choices
}

pub fn coordination_fields(existing: Option<&Coordination>) -> FieldModal {
  FieldModal {
    kind:   EntityKind::Coordinations,
    id:     existing.map(|c| c.id.0),
    fields: vec![FormField::text(
      "Name",
      existing.map(|c| c.name.as_str()).unwrap_or(""),
    )],
    focus:  0,
  }
}

pub fn degree_fields(
  existing: Option<&Degree>,
  coordinations: &[Coordination],
) -> FieldModal {
  FieldModal {
    kind:   EntityKind::Degrees,
    id:     existing.map(|d| d.id.0),
    fields: vec![
      FormField::text("Name", existing.map(|d| d.name.as_str()).unwrap_or("")),
      FormField::select(
        "Coordination",
        coordination_choices(coordinations),
        existing.and_then(|d| d.coordination_id).map(|id| id.0),
      ),
    ],
    focus:  0,
  }
}

pub fn coordinator_fields(
  existing: Option<&Coordinator>,
  coordinations: &[Coordination],
  users: &[User],
) -> FieldModal {
  FieldModal {
    kind:   EntityKind::Coordinators,
    id:     existing.map(|c| c.id.0),
    fields: vec![
      FormField::text(
        "First name",
        existing.map(|c| c.first_name.as_str()).unwrap_or(""),
      ),
      FormField::text(
        "Last name",
        existing.map(|c| c.last_name.as_str()).unwrap_or(""),
      ),
      FormField::text("Email", existing.map(|c| c.email.as_str()).unwrap_or("")),
      FormField::text("Phone", existing.map(|c| c.phone.as_str()).unwrap_or("")),
      FormField::select(
        "Coordination",
        coordination_choices(coordinations),
        existing.and_then(|c| c.coordination_id).map(|id| id.0),
      ),
      FormField::select(
        "User account",
        user_choices(users),
        existing.and_then(|c| c.user_id).map(|id| id.0),
      ),
    ],
    focus:  0,
  }
}

pub fn student_fields(
  existing: Option<&Student>,
  degrees: &[Degree],
  users: &[User],
) -> FieldModal {
  let degree_choices = degrees
    .iter()
    .map(|d| Choice {
      id:    Some(d.id.0),
      label: d.name.clone(),
    })
    .collect();
  FieldModal {
    kind:   EntityKind::Students,
    id:     existing.map(|s| s.id.0),
    fields: vec![
      FormField::text(
        "First name",
        existing.map(|s| s.first_name.as_str()).unwrap_or(""),
      ),
      FormField::text(
        "Last name",
        existing.map(|s| s.last_name.as_str()).unwrap_or(""),
      ),
      FormField::text(
        "Card number",
        existing.map(|s| s.card_number.as_str()).unwrap_or(""),
      ),
      FormField::text("Email", existing.map(|s| s.email.as_str()).unwrap_or("")),
      FormField::text("Phone", existing.map(|s| s.phone.as_str()).unwrap_or("")),
      FormField::select(
        "Degree",
        degree_choices,
        existing.and_then(|s| s.degree_id).map(|id| id.0),
      ),
      FormField::select(
        "User account",
        user_choices(users),
        existing.and_then(|s| s.user_id).map(|id| id.0),
      ),
    ],
    focus:  0,
  }
}

pub fn user_fields(existing: Option<&User>, roles: &[String]) -> FieldModal {
  let role_choices = roles
    .iter()
    .map(|r| Choice {
      id:    None,
      label: r.clone(),
    })
    .collect();
  FieldModal {
    kind:   EntityKind::Users,
    id:     existing.map(|u| u.id.0),
    fields: vec![
      FormField::text("Name", existing.map(|u| u.name.as_str()).unwrap_or("")),
      FormField::text("Email", existing.map(|u| u.email.as_str()).unwrap_or("")),
      // Left empty on edit: an empty password means "leave unchanged".
      FormField::masked("Password"),
      FormField::select_by_label(
        "Role",
        role_choices,
        existing.and_then(|u| u.role.as_deref()),
      ),
    ],
    focus:  0,
  }
}

// ─── Conversion back to payloads ─────────────────────────────────────────────

pub fn to_new_coordination(m: &FieldModal) -> Result<NewCoordination, String> {
  Ok(NewCoordination {
    name: m.required_text(0)?,
  })
}

pub fn to_new_degree(m: &FieldModal) -> Result<NewDegree, String> {
  Ok(NewDegree {
    name:            m.required_text(0)?,
    coordination_id: Some(CoordinationId(m.required_select(1)?)),
  })
}

pub fn to_new_coordinator(m: &FieldModal) -> Result<NewCoordinator, String> {
  Ok(NewCoordinator {
    first_name:      m.required_text(0)?,
    last_name:       m.required_text(1)?,
    email:           m.required_text(2)?,
    phone:           m.required_text(3)?,
    coordination_id: Some(CoordinationId(m.required_select(4)?)),
    user_id:         m.select_id_at(5).map(UserId),
  })
}

pub fn to_new_student(m: &FieldModal) -> Result<NewStudent, String> {
  Ok(NewStudent {
    first_name:  m.required_text(0)?,
    last_name:   m.required_text(1)?,
    card_number: m.required_text(2)?,
    email:       m.required_text(3)?,
    phone:       m.required_text(4)?,
    degree_id:   Some(DegreeId(m.required_select(5)?)),
    user_id:     m.select_id_at(6).map(UserId),
  })
}

pub fn to_new_user(m: &FieldModal) -> Result<NewUser, String> {
  let password = m.text_at(2);
  let password = if password.is_empty() {
    if m.id.is_none() {
      return Err("a password is required for a new user".into());
    }
    None
  } else {
    Some(password)
  };
  Ok(NewUser {
    name: m.required_text(0)?,
    email: m.required_text(1)?,
    password,
    role: m
      .choice_at(3)
      .map(|c| c.label.clone())
      .ok_or_else(|| "choose a role".to_owned())?,
  })
}

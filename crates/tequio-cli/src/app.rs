//! Application state machine and event dispatcher.

use std::time::Instant;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use tequio_client::RestDirectory;
use tequio_core::{
  directory::Directory,
  id::{
    CoordinationId, CoordinatorId, DegreeId, DistrictId, InstitutionId,
    ProjectId, StudentId,
  },
  record::{
    Address, Coordination, Coordinator, Degree, Department, District,
    Institution, Municipality, Project, Student, User,
  },
};
use tequio_forms::session::{InstitutionForm, ProjectForm};
use tracing::warn;

use crate::forms::{self, FieldModal};

// ─── Entities ─────────────────────────────────────────────────────────────────

/// The seven entity screens, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
  Coordinations,
  Coordinators,
  Institutions,
  Degrees,
  Projects,
  Students,
  Users,
}

impl EntityKind {
  pub const ALL: [EntityKind; 7] = [
    Self::Coordinations,
    Self::Coordinators,
    Self::Institutions,
    Self::Degrees,
    Self::Projects,
    Self::Students,
    Self::Users,
  ];

  pub fn title(self) -> &'static str {
    match self {
      Self::Coordinations => "Coordinations",
      Self::Coordinators => "Coordinators",
      Self::Institutions => "Institutions",
      Self::Degrees => "Degrees",
      Self::Projects => "Projects",
      Self::Students => "Students",
      Self::Users => "Users",
    }
  }

  pub fn singular(self) -> &'static str {
    match self {
      Self::Coordinations => "coordination",
      Self::Coordinators => "coordinator",
      Self::Institutions => "institution",
      Self::Degrees => "degree",
      Self::Projects => "project",
      Self::Students => "student",
      Self::Users => "user",
    }
  }

  pub fn columns(self) -> &'static [&'static str] {
    match self {
      Self::Coordinations => &["Name"],
      Self::Coordinators => &["Name", "Email", "Phone", "Coordination"],
      Self::Institutions => &["Name", "Phone", "Email", "Type", "Address"],
      Self::Degrees => &["Name", "Coordination"],
      Self::Projects => &[
        "Name",
        "Description",
        "Status",
        "Student",
        "Coordinator",
        "Institution",
        "Start",
        "End",
      ],
      Self::Students => &["Name", "Card", "Email", "Phone", "Degree"],
      Self::Users => &["Name", "Email", "Role"],
    }
  }
}

// ─── Modals ───────────────────────────────────────────────────────────────────

// Field order of the institution modal.
pub const I_NAME: usize = 0;
pub const I_PHONE: usize = 1;
pub const I_EMAIL: usize = 2;
pub const I_KIND: usize = 3;
pub const I_DEPARTMENT: usize = 4;
pub const I_MUNICIPALITY: usize = 5;
pub const I_DISTRICT: usize = 6;
pub const I_STREET: usize = 7;
pub const I_NUMBER: usize = 8;
pub const INSTITUTION_FIELDS: usize = 9;

// Field order of the project modal.
pub const P_NAME: usize = 0;
pub const P_DESCRIPTION: usize = 1;
pub const P_STATUS: usize = 2;
pub const P_STUDENT: usize = 3;
pub const P_COORDINATOR: usize = 4;
pub const P_INSTITUTION: usize = 5;
pub const P_START: usize = 6;
pub const P_END: usize = 7;
pub const PROJECT_FIELDS: usize = 8;

pub struct InstitutionModal {
  pub form:  InstitutionForm,
  pub focus: usize,
}

pub struct ProjectModal {
  pub form:       ProjectForm,
  pub focus:      usize,
  /// Cursor within the search result list while the student field is
  /// focused.
  pub hit_cursor: usize,
  /// Date fields are edited as text and parsed once, on submit.
  pub start_text: String,
  pub end_text:   String,
}

pub enum Modal {
  Institution(InstitutionModal),
  Project(ProjectModal),
  Fields(FieldModal),
  ConfirmDelete {
    kind:  EntityKind,
    id:    i64,
    label: String,
  },
}

// ─── Data ─────────────────────────────────────────────────────────────────────

/// All fetched collections. A failed fetch leaves its collection empty; the
/// status bar reports it and `r` refetches.
#[derive(Default)]
pub struct Data {
  pub departments:    Vec<Department>,
  pub municipalities: Vec<Municipality>,
  pub districts:      Vec<District>,
  pub coordinations:  Vec<Coordination>,
  pub coordinators:   Vec<Coordinator>,
  pub institutions:   Vec<Institution>,
  pub degrees:        Vec<Degree>,
  pub projects:       Vec<Project>,
  pub students:       Vec<Student>,
  pub users:          Vec<User>,
}

/// One table row: the record's id plus its rendered cells.
pub struct TableRow {
  pub id:    i64,
  pub cells: Vec<String>,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub directory: RestDirectory,

  /// Entity screen currently shown.
  pub screen: EntityKind,

  pub data: Data,

  /// Current fuzzy-filter string (applies to the active screen only).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* row list.
  pub cursor: usize,

  /// The open modal, if any. Form state lives inside it and is dropped
  /// wholesale when the modal closes.
  pub modal: Option<Modal>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(directory: RestDirectory) -> Self {
    Self {
      directory,
      screen: EntityKind::Coordinations,
      data: Data::default(),
      filter: String::new(),
      filter_active: false,
      cursor: 0,
      modal: None,
      status_msg: String::new(),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────

  /// Fetch every collection. Failures leave the collection empty and are
  /// summarised in the status bar; details go to the log.
  pub async fn load_all(&mut self) {
    let mut failed = 0usize;

    macro_rules! fetch {
      ($field:ident, $call:expr) => {
        match $call.await {
          Ok(records) => self.data.$field = records,
          Err(e) => {
            warn!(collection = stringify!($field), "fetch failed: {e}");
            self.data.$field = Vec::new();
            failed += 1;
          }
        }
      };
    }

    fetch!(departments, self.directory.departments());
    fetch!(municipalities, self.directory.municipalities());
    fetch!(districts, self.directory.districts());
    fetch!(coordinations, self.directory.coordinations());
    fetch!(coordinators, self.directory.coordinators());
    fetch!(institutions, self.directory.institutions());
    fetch!(degrees, self.directory.degrees());
    fetch!(projects, self.directory.projects());
    fetch!(students, self.directory.students());
    fetch!(users, self.directory.users());

    self.status_msg = if failed == 0 {
      String::new()
    } else {
      format!("{failed} collection(s) failed to load — press r to retry")
    };
  }

  /// Refetch the collection behind one screen.
  pub async fn reload(&mut self, kind: EntityKind) {
    let result = match kind {
      EntityKind::Coordinations => self
        .directory
        .coordinations()
        .await
        .map(|v| self.data.coordinations = v),
      EntityKind::Coordinators => self
        .directory
        .coordinators()
        .await
        .map(|v| self.data.coordinators = v),
      EntityKind::Institutions => self
        .directory
        .institutions()
        .await
        .map(|v| self.data.institutions = v),
      EntityKind::Degrees => {
        self.directory.degrees().await.map(|v| self.data.degrees = v)
      }
      EntityKind::Projects => self
        .directory
        .projects()
        .await
        .map(|v| self.data.projects = v),
      EntityKind::Students => self
        .directory
        .students()
        .await
        .map(|v| self.data.students = v),
      EntityKind::Users => {
        self.directory.users().await.map(|v| self.data.users = v)
      }
    };
    if let Err(e) = result {
      self.status_msg = format!("refresh failed: {e}");
    }
    let len = self.filtered_rows().len();
    if self.cursor >= len {
      self.cursor = len.saturating_sub(1);
    }
  }

  // ── Display helpers ───────────────────────────────────────────────────

  fn coordination_name(&self, id: Option<CoordinationId>) -> String {
    id.and_then(|id| self.data.coordinations.iter().find(|c| c.id == id))
      .map(|c| c.name.clone())
      .unwrap_or_else(|| "N/A".into())
  }

  fn degree_name(&self, id: Option<DegreeId>) -> String {
    id.and_then(|id| self.data.degrees.iter().find(|d| d.id == id))
      .map(|d| d.name.clone())
      .unwrap_or_else(|| "N/A".into())
  }

  /// "Street number, district, municipality, department" with `N/A` for
  /// any level that cannot be resolved against the fetched collections.
  fn address_display(&self, address: Option<&Address>) -> String {
    let Some(address) = address else {
      return "no address".into();
    };
    let district = self
      .data
      .districts
      .iter()
      .find(|d| d.id == address.district_id);
    let municipality = district.and_then(|d| {
      self
        .data
        .municipalities
        .iter()
        .find(|m| m.id == d.municipality_id)
    });
    let department = municipality.and_then(|m| {
      self
        .data
        .departments
        .iter()
        .find(|dep| dep.id == m.department_id)
    });
    let number = address.street_number.as_deref().unwrap_or("");
    format!(
      "{} {}, {}, {}, {}",
      address.street_name,
      number,
      district.map(|d| d.name.as_str()).unwrap_or("N/A"),
      municipality.map(|m| m.name.as_str()).unwrap_or("N/A"),
      department.map(|d| d.name.as_str()).unwrap_or("N/A"),
    )
  }

  fn date_display(date: Option<NaiveDate>) -> String {
    date
      .map(|d| d.format("%d/%m/%Y").to_string())
      .unwrap_or_else(|| "N/A".into())
  }

  fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
      text.to_owned()
    } else {
      let cut: String = text.chars().take(max).collect();
      format!("{cut}…")
    }
  }

  // ── Rows ──────────────────────────────────────────────────────────────

  fn rows(&self) -> Vec<TableRow> {
    match self.screen {
      EntityKind::Coordinations => self
        .data
        .coordinations
        .iter()
        .map(|c| TableRow {
          id:    c.id.0,
          cells: vec![c.name.clone()],
        })
        .collect(),
      EntityKind::Coordinators => self
        .data
        .coordinators
        .iter()
        .map(|c| TableRow {
          id:    c.id.0,
          cells: vec![
            c.display_name(),
            c.email.clone(),
            c.phone.clone(),
            self.coordination_name(c.coordination_id),
          ],
        })
        .collect(),
      EntityKind::Institutions => self
        .data
        .institutions
        .iter()
        .map(|i| TableRow {
          id:    i.id.0,
          cells: vec![
            i.name.clone(),
            i.phone.clone(),
            i.email.clone(),
            i.kind.label().to_owned(),
            self.address_display(i.address.as_ref()),
          ],
        })
        .collect(),
      EntityKind::Degrees => self
        .data
        .degrees
        .iter()
        .map(|d| TableRow {
          id:    d.id.0,
          cells: vec![
            d.name.clone(),
            self.coordination_name(d.coordination_id),
          ],
        })
        .collect(),
      EntityKind::Projects => self
        .data
        .projects
        .iter()
        .map(|p| TableRow {
          id:    p.id.0,
          cells: vec![
            p.name.clone(),
            Self::truncate(&p.description, 50),
            p.status.label().to_owned(),
            p.student_display().unwrap_or_else(|| "N/A".into()),
            p.coordinator
              .as_ref()
              .map(|c| c.name.clone())
              .unwrap_or_else(|| "N/A".into()),
            p.institution
              .as_ref()
              .map(|i| i.name.clone())
              .unwrap_or_else(|| "N/A".into()),
            Self::date_display(p.start_date),
            Self::date_display(p.end_date),
          ],
        })
        .collect(),
      EntityKind::Students => self
        .data
        .students
        .iter()
        .map(|s| TableRow {
          id:    s.id.0,
          cells: vec![
            format!("{} {}", s.first_name, s.last_name),
            s.card_number.clone(),
            s.email.clone(),
            s.phone.clone(),
            self.degree_name(s.degree_id),
          ],
        })
        .collect(),
      EntityKind::Users => self
        .data
        .users
        .iter()
        .map(|u| TableRow {
          id:    u.id.0,
          cells: vec![
            u.name.clone(),
            u.email.clone(),
            u.role.clone().unwrap_or_else(|| "N/A".into()),
          ],
        })
        .collect(),
    }
  }

  /// Rows of the active screen that match the current filter.
  pub fn filtered_rows(&self) -> Vec<TableRow> {
    let rows = self.rows();
    if self.filter.is_empty() {
      return rows;
    }
    let matcher = SkimMatcherV2::default();
    rows
      .into_iter()
      .filter(|row| {
        let haystack = row.cells.join(" ");
        matcher.fuzzy_match(&haystack, &self.filter).is_some()
      })
      .collect()
  }

  fn cursor_id(&self) -> Option<i64> {
    self.filtered_rows().get(self.cursor).map(|row| row.id)
  }

  // ── Key handling ──────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.modal.is_some() {
      self.handle_modal_key(key).await;
      return Ok(true);
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return Ok(true);
    }

    self.handle_list_key(key).await
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.cursor = 0;
      }
      _ => {}
    }
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Screen switching
      KeyCode::Tab => self.switch_screen(1),
      KeyCode::BackTab => self.switch_screen(-1),
      KeyCode::Char(c @ '1'..='7') => {
        let idx = (c as usize) - ('1' as usize);
        self.set_screen(EntityKind::ALL[idx]);
      }

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_rows().len();
        if len > 0 && self.cursor + 1 < len {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.cursor > 0 {
          self.cursor -= 1;
        }
      }

      // Filter
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.cursor = 0;
      }

      // Refresh
      KeyCode::Char('r') => {
        self.load_all().await;
      }

      // CRUD
      KeyCode::Char('n') => self.open_editor(None).await,
      KeyCode::Char('e') | KeyCode::Enter => {
        if let Some(id) = self.cursor_id() {
          self.open_editor(Some(id)).await;
        }
      }
      KeyCode::Char('d') => self.request_delete(),
      KeyCode::Char('m') => self.send_email().await,

      _ => {}
    }
    Ok(true)
  }

  fn set_screen(&mut self, kind: EntityKind) {
    self.screen = kind;
    self.cursor = 0;
    self.filter.clear();
    self.filter_active = false;
  }

  fn switch_screen(&mut self, step: isize) {
    let len = EntityKind::ALL.len() as isize;
    let current = EntityKind::ALL
      .iter()
      .position(|k| *k == self.screen)
      .unwrap_or(0) as isize;
    let next = (current + step + len) % len;
    self.set_screen(EntityKind::ALL[next as usize]);
  }

  // ── Opening modals ────────────────────────────────────────────────────

  /// Open the editor for the active screen — the dedicated session forms
  /// for institutions and projects, the generic field modal otherwise.
  async fn open_editor(&mut self, id: Option<i64>) {
    self.status_msg.clear();
    match self.screen {
      EntityKind::Institutions => {
        let existing = id.and_then(|id| {
          self
            .data
            .institutions
            .iter()
            .find(|i| i.id == InstitutionId(id))
            .cloned()
        });
        let (form, failure) =
          InstitutionForm::open(&self.directory, existing.as_ref()).await;
        if let Some(e) = failure {
          self.status_msg = format!("some collections failed to load: {e}");
        }
        self.modal = Some(Modal::Institution(InstitutionModal { form, focus: 0 }));
      }
      EntityKind::Projects => {
        let existing = id.and_then(|id| {
          self
            .data
            .projects
            .iter()
            .find(|p| p.id == ProjectId(id))
            .cloned()
        });
        let (form, failure) =
          ProjectForm::open(&self.directory, existing.as_ref()).await;
        if let Some(e) = failure {
          self.status_msg = format!("some collections failed to load: {e}");
        }
        let start_text = form
          .draft
          .start_date
          .map(|d| d.format("%Y-%m-%d").to_string())
          .unwrap_or_default();
        let end_text = form
          .draft
          .end_date
          .map(|d| d.format("%Y-%m-%d").to_string())
          .unwrap_or_default();
        self.modal = Some(Modal::Project(ProjectModal {
          form,
          focus: 0,
          hit_cursor: 0,
          start_text,
          end_text,
        }));
      }
      EntityKind::Coordinations => {
        let existing = id.and_then(|id| {
          self
            .data
            .coordinations
            .iter()
            .find(|c| c.id == CoordinationId(id))
        });
        self.modal = Some(Modal::Fields(forms::coordination_fields(existing)));
      }
      EntityKind::Degrees => {
        let existing = id
          .and_then(|id| self.data.degrees.iter().find(|d| d.id == DegreeId(id)));
        self.modal = Some(Modal::Fields(forms::degree_fields(
          existing,
          &self.data.coordinations,
        )));
      }
      EntityKind::Coordinators => {
        let existing = id.and_then(|id| {
          self
            .data
            .coordinators
            .iter()
            .find(|c| c.id == CoordinatorId(id))
        });
        self.modal = Some(Modal::Fields(forms::coordinator_fields(
          existing,
          &self.data.coordinations,
          &self.data.users,
        )));
      }
      EntityKind::Students => {
        let existing = id.and_then(|id| {
          self.data.students.iter().find(|s| s.id == StudentId(id))
        });
        self.modal = Some(Modal::Fields(forms::student_fields(
          existing,
          &self.data.degrees,
          &self.data.users,
        )));
      }
      EntityKind::Users => {
        let roles = match self.directory.roles().await {
          Ok(roles) => roles,
          Err(e) => {
            self.status_msg = format!("roles failed to load: {e}");
            Vec::new()
          }
        };
        let existing = id.and_then(|id| {
          self
            .data
            .users
            .iter()
            .find(|u| u.id == tequio_core::id::UserId(id))
        });
        self.modal = Some(Modal::Fields(forms::user_fields(existing, &roles)));
      }
    }
  }

  fn request_delete(&mut self) {
    if self.screen == EntityKind::Users {
      self.status_msg = "the API does not expose user deletion".into();
      return;
    }
    let Some(row) = self.filtered_rows().into_iter().nth(self.cursor) else {
      return;
    };
    let label = row.cells.first().cloned().unwrap_or_default();
    self.modal = Some(Modal::ConfirmDelete {
      kind: self.screen,
      id: row.id,
      label,
    });
  }

  async fn send_email(&mut self) {
    let Some(id) = self.cursor_id() else { return };
    let result = match self.screen {
      EntityKind::Students => {
        self.directory.send_student_email(StudentId(id)).await
      }
      EntityKind::Coordinators => {
        self
          .directory
          .send_coordinator_email(CoordinatorId(id))
          .await
      }
      _ => return,
    };
    self.status_msg = match result {
      Ok(()) => "Email sent".into(),
      Err(e) => format!("email failed: {e}"),
    };
  }

  // ── Modal key handling ────────────────────────────────────────────────

  async fn handle_modal_key(&mut self, key: KeyEvent) {
    let Some(modal) = self.modal.take() else { return };

    // Esc always closes and discards the session (which cancels any
    // pending search).
    if key.code == KeyCode::Esc {
      self.status_msg.clear();
      return;
    }

    match modal {
      Modal::Institution(mut m) => {
        if key.code == KeyCode::Enter {
          match m.form.submit(&self.directory).await {
            Ok(()) => {
              self.status_msg = "Institution saved".into();
              self.reload(EntityKind::Institutions).await;
            }
            Err(e) => {
              self.status_msg = e.to_string();
              self.modal = Some(Modal::Institution(m));
            }
          }
        } else {
          Self::institution_input(&mut m, key);
          self.modal = Some(Modal::Institution(m));
        }
      }

      Modal::Project(mut m) => {
        // Enter on the student field picks the highlighted hit; anywhere
        // else it submits.
        let choosing = m.focus == P_STUDENT && !m.form.search.results().is_empty();
        if key.code == KeyCode::Enter && choosing {
          if let Some(hit) = m.form.search.results().get(m.hit_cursor).cloned() {
            m.form.choose_student(hit);
          }
          self.modal = Some(Modal::Project(m));
        } else if key.code == KeyCode::Enter {
          match Self::apply_dates(&mut m) {
            Ok(()) => match m.form.submit(&self.directory).await {
              Ok(_) => {
                self.status_msg = "Project saved".into();
                self.reload(EntityKind::Projects).await;
              }
              Err(e) => {
                self.status_msg = e.to_string();
                self.modal = Some(Modal::Project(m));
              }
            },
            Err(msg) => {
              self.status_msg = msg;
              self.modal = Some(Modal::Project(m));
            }
          }
        } else {
          Self::project_input(&mut m, key);
          self.modal = Some(Modal::Project(m));
        }
      }

      Modal::Fields(mut m) => {
        if key.code == KeyCode::Enter {
          match self.submit_fields(&m).await {
            Ok(()) => {
              self.status_msg = format!("{} saved", m.kind.title());
              self.reload(m.kind).await;
            }
            Err(msg) => {
              self.status_msg = msg;
              self.modal = Some(Modal::Fields(m));
            }
          }
        } else {
          match key.code {
            KeyCode::Tab | KeyCode::Down => m.next_focus(),
            KeyCode::BackTab | KeyCode::Up => m.prev_focus(),
            KeyCode::Left => m.cycle(false),
            KeyCode::Right => m.cycle(true),
            KeyCode::Backspace => m.pop_char(),
            KeyCode::Char(c) => m.push_char(c),
            _ => {}
          }
          self.modal = Some(Modal::Fields(m));
        }
      }

      Modal::ConfirmDelete { kind, id, label } => match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
          self.perform_delete(kind, id, &label).await;
        }
        KeyCode::Char('n') => {
          self.status_msg.clear();
        }
        _ => {
          self.modal = Some(Modal::ConfirmDelete { kind, id, label });
        }
      },
    }
  }

  // ── Institution modal input ───────────────────────────────────────────

  fn institution_input(m: &mut InstitutionModal, key: KeyEvent) {
    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        m.focus = (m.focus + 1) % INSTITUTION_FIELDS;
      }
      KeyCode::BackTab | KeyCode::Up => {
        m.focus = (m.focus + INSTITUTION_FIELDS - 1) % INSTITUTION_FIELDS;
      }
      KeyCode::Char(c) => {
        if let Some(buffer) = Self::institution_text_field(m, m.focus) {
          buffer.push(c);
        }
      }
      KeyCode::Backspace => {
        if let Some(buffer) = Self::institution_text_field(m, m.focus) {
          buffer.pop();
        }
      }
      KeyCode::Left | KeyCode::Right => {
        Self::institution_cycle(m, key.code == KeyCode::Right);
      }
      _ => {}
    }
  }

  fn institution_text_field<'a>(
    m: &'a mut InstitutionModal,
    focus: usize,
  ) -> Option<&'a mut String> {
    let draft = &mut m.form.draft;
    match focus {
      I_NAME => Some(&mut draft.name),
      I_PHONE => Some(&mut draft.phone),
      I_EMAIL => Some(&mut draft.email),
      I_STREET => Some(&mut draft.street_name),
      I_NUMBER => Some(&mut draft.street_number),
      _ => None,
    }
  }

  fn institution_cycle(m: &mut InstitutionModal, forward: bool) {
    use tequio_core::record::InstitutionKind;

    match m.focus {
      I_KIND => {
        let all = InstitutionKind::ALL;
        let current = m.form.draft.kind.and_then(|k| all.iter().position(|x| *x == k));
        m.form.draft.kind = Some(all[Self::step(current, all.len(), forward)]);
      }
      I_DEPARTMENT => {
        let ids: Vec<_> = m.form.departments.iter().map(|d| d.id).collect();
        if ids.is_empty() {
          return;
        }
        let current = m
          .form
          .selection
          .department
          .and_then(|id| ids.iter().position(|x| *x == id));
        let next = ids[Self::step(current, ids.len(), forward)];
        m.form.selection.select_department(Some(next));
      }
      I_MUNICIPALITY => {
        // Disabled until a department is chosen.
        if !m.form.selection.municipality_enabled() {
          return;
        }
        let ids: Vec<_> = m
          .form
          .selection
          .municipality_candidates(&m.form.municipalities)
          .iter()
          .map(|x| x.id)
          .collect();
        if ids.is_empty() {
          return;
        }
        let current = m
          .form
          .selection
          .municipality
          .and_then(|id| ids.iter().position(|x| *x == id));
        let next = ids[Self::step(current, ids.len(), forward)];
        m.form.selection.select_municipality(Some(next));
      }
      I_DISTRICT => {
        // Disabled until a municipality is chosen.
        if !m.form.selection.district_enabled() {
          return;
        }
        let ids: Vec<DistrictId> = m
          .form
          .selection
          .district_candidates(&m.form.districts)
          .iter()
          .map(|x| x.id)
          .collect();
        if ids.is_empty() {
          return;
        }
        let current = m
          .form
          .selection
          .district
          .and_then(|id| ids.iter().position(|x| *x == id));
        let next = ids[Self::step(current, ids.len(), forward)];
        m.form.selection.select_district(Some(next));
      }
      _ => {}
    }
  }

  // ── Project modal input ───────────────────────────────────────────────

  fn project_input(m: &mut ProjectModal, key: KeyEvent) {
    match key.code {
      KeyCode::Tab => {
        m.focus = (m.focus + 1) % PROJECT_FIELDS;
      }
      KeyCode::BackTab => {
        m.focus = (m.focus + PROJECT_FIELDS - 1) % PROJECT_FIELDS;
      }
      KeyCode::Down if m.focus == P_STUDENT => {
        let len = m.form.search.results().len();
        if len > 0 && m.hit_cursor + 1 < len {
          m.hit_cursor += 1;
        }
      }
      KeyCode::Up if m.focus == P_STUDENT => {
        m.hit_cursor = m.hit_cursor.saturating_sub(1);
      }
      KeyCode::Down => m.focus = (m.focus + 1) % PROJECT_FIELDS,
      KeyCode::Up => m.focus = (m.focus + PROJECT_FIELDS - 1) % PROJECT_FIELDS,
      KeyCode::Delete if m.focus == P_STUDENT => {
        m.form.clear_student();
        m.hit_cursor = 0;
      }
      KeyCode::Char(c) => {
        if m.focus == P_STUDENT {
          let mut query = m.form.search.query().to_owned();
          query.push(c);
          m.form.search.input(&query, Instant::now());
          m.hit_cursor = 0;
        } else if let Some(buffer) = Self::project_text_field(m, m.focus) {
          buffer.push(c);
        }
      }
      KeyCode::Backspace => {
        if m.focus == P_STUDENT {
          let mut query = m.form.search.query().to_owned();
          query.pop();
          m.form.search.input(&query, Instant::now());
          m.hit_cursor = 0;
        } else if let Some(buffer) = Self::project_text_field(m, m.focus) {
          buffer.pop();
        }
      }
      KeyCode::Left | KeyCode::Right => {
        Self::project_cycle(m, key.code == KeyCode::Right);
      }
      _ => {}
    }
  }

  fn project_text_field<'a>(
    m: &'a mut ProjectModal,
    focus: usize,
  ) -> Option<&'a mut String> {
    match focus {
      P_NAME => Some(&mut m.form.draft.name),
      P_DESCRIPTION => Some(&mut m.form.draft.description),
      P_START => Some(&mut m.start_text),
      P_END => Some(&mut m.end_text),
      _ => None,
    }
  }

  fn project_cycle(m: &mut ProjectModal, forward: bool) {
    use tequio_core::record::ProjectStatus;

    match m.focus {
      P_STATUS => {
        let all = ProjectStatus::ALL;
        let current = all.iter().position(|s| *s == m.form.draft.status);
        m.form.draft.status = all[Self::step(current, all.len(), forward)];
      }
      P_COORDINATOR => {
        let ids: Vec<_> = m.form.coordinators.iter().map(|c| c.id).collect();
        if ids.is_empty() {
          return;
        }
        let current = m
          .form
          .draft
          .coordinator_id
          .and_then(|id| ids.iter().position(|x| *x == id));
        m.form.draft.coordinator_id =
          Some(ids[Self::step(current, ids.len(), forward)]);
      }
      P_INSTITUTION => {
        let ids: Vec<_> = m.form.institutions.iter().map(|i| i.id).collect();
        if ids.is_empty() {
          return;
        }
        let current = m
          .form
          .draft
          .institution_id
          .and_then(|id| ids.iter().position(|x| *x == id));
        m.form.draft.institution_id =
          Some(ids[Self::step(current, ids.len(), forward)]);
      }
      _ => {}
    }
  }

  fn step(current: Option<usize>, len: usize, forward: bool) -> usize {
    match (current, forward) {
      (None, true) => 0,
      (None, false) => len - 1,
      (Some(i), true) => (i + 1) % len,
      (Some(i), false) => (i + len - 1) % len,
    }
  }

  /// Parse the date text buffers into the draft. Runs on submit, before
  /// validation — past this point dates are typed values.
  fn apply_dates(m: &mut ProjectModal) -> Result<(), String> {
    m.form.draft.start_date = Self::parse_date("start date", &m.start_text)?;
    m.form.draft.end_date = Self::parse_date("end date", &m.end_text)?;
    Ok(())
  }

  fn parse_date(label: &str, text: &str) -> Result<Option<NaiveDate>, String> {
    let text = text.trim();
    if text.is_empty() {
      return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
      .map(Some)
      .map_err(|_| format!("invalid {label} (use YYYY-MM-DD)"))
  }

  // ── Field-modal submission ────────────────────────────────────────────

  async fn submit_fields(&self, m: &FieldModal) -> Result<(), String> {
    let map_err = |e: tequio_client::Error| format!("could not save: {e}");
    match m.kind {
      EntityKind::Coordinations => {
        let input = forms::to_new_coordination(m)?;
        match m.id {
          Some(id) => self
            .directory
            .update_coordination(CoordinationId(id), input)
            .await
            .map_err(map_err),
          None => self
            .directory
            .create_coordination(input)
            .await
            .map_err(map_err),
        }
      }
      EntityKind::Degrees => {
        let input = forms::to_new_degree(m)?;
        match m.id {
          Some(id) => self
            .directory
            .update_degree(DegreeId(id), input)
            .await
            .map_err(map_err),
          None => self.directory.create_degree(input).await.map_err(map_err),
        }
      }
      EntityKind::Coordinators => {
        let input = forms::to_new_coordinator(m)?;
        match m.id {
          Some(id) => self
            .directory
            .update_coordinator(CoordinatorId(id), input)
            .await
            .map_err(map_err),
          None => self
            .directory
            .create_coordinator(input)
            .await
            .map_err(map_err),
        }
      }
      EntityKind::Students => {
        let input = forms::to_new_student(m)?;
        match m.id {
          Some(id) => self
            .directory
            .update_student(StudentId(id), input)
            .await
            .map_err(map_err),
          None => self.directory.create_student(input).await.map_err(map_err),
        }
      }
      EntityKind::Users => {
        let input = forms::to_new_user(m)?;
        match m.id {
          Some(id) => self
            .directory
            .update_user(tequio_core::id::UserId(id), input)
            .await
            .map_err(map_err),
          None => self.directory.create_user(input).await.map_err(map_err),
        }
      }
      EntityKind::Institutions | EntityKind::Projects => {
        // These screens use their dedicated session modals.
        Err("internal: field modal on a composite screen".into())
      }
    }
  }

  async fn perform_delete(&mut self, kind: EntityKind, id: i64, label: &str) {
    let result = match kind {
      EntityKind::Coordinations => {
        self.directory.delete_coordination(CoordinationId(id)).await
      }
      EntityKind::Coordinators => {
        self.directory.delete_coordinator(CoordinatorId(id)).await
      }
      EntityKind::Institutions => {
        self.directory.delete_institution(InstitutionId(id)).await
      }
      EntityKind::Degrees => self.directory.delete_degree(DegreeId(id)).await,
      EntityKind::Projects => self.directory.delete_project(ProjectId(id)).await,
      EntityKind::Students => self.directory.delete_student(StudentId(id)).await,
      EntityKind::Users => return,
    };
    match result {
      Ok(()) => {
        self.status_msg = format!("Deleted \"{label}\"");
        self.reload(kind).await;
      }
      Err(e) => {
        self.status_msg = format!("delete failed: {e}");
      }
    }
  }

  // ── Debounce clock ────────────────────────────────────────────────────

  /// Advance the search debounce clock. Called on every event-loop pass;
  /// when a query has settled, the lookup runs and its results are only
  /// installed if their generation is still current.
  pub async fn tick(&mut self, now: Instant) {
    let directory = self.directory.clone();
    if let Some(Modal::Project(m)) = &mut self.modal {
      if let Some(lookup) = m.form.search.due(now) {
        match directory.search_students(&lookup.query).await {
          Ok(hits) => {
            if m.form.search.accept(lookup.generation, hits) {
              m.hit_cursor = 0;
            }
          }
          Err(e) => {
            // The failed lookup clears the result set, as a settled empty
            // response would.
            m.form.search.accept(lookup.generation, Vec::new());
            self.status_msg = format!("student search failed: {e}");
          }
        }
      }
    }
  }
}

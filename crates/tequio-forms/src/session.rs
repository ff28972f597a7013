//! Exclusively-owned form sessions.
//!
//! A session is created when a modal opens and dropped when it closes. It
//! owns everything the form needs — the fetched collections, the selection
//! or draft being edited, the search state — so no form state outlives the
//! modal and no two forms share state.
//!
//! Opening a session fetches its prerequisite collections jointly and only
//! derives candidate sets once every fetch has settled; partial collections
//! are never used. A transport failure is not an error here: the affected
//! collections stay empty (so candidate sets are empty) and the failure is
//! handed back for display, with no automatic retry — the operator recovers
//! by reopening the form.

use tequio_core::{
  directory::Directory,
  id::{AddressId, InstitutionId},
  record::{
    Coordinator, Department, District, Institution, InstitutionKind,
    Municipality, NewAddress, NewInstitution, Project, ProjectDraft,
    StudentHit,
  },
};
use thiserror::Error;
use tracing::warn;

use crate::{
  address::AddressSelection,
  project::{ValidationError, validate},
  search::SearchDebouncer,
};

// ─── Submission failures ─────────────────────────────────────────────────────

/// Why a form submission did not go through: a local validation failure
/// (the form stays open, nothing was sent) or a transport failure from the
/// directory. Either way the draft is left intact for correction.
#[derive(Debug, Error)]
pub enum SubmitError<E: std::error::Error> {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("{0}")]
  Incomplete(&'static str),

  #[error("could not save: {0}")]
  Transport(E),
}

// ─── Institution form ────────────────────────────────────────────────────────

/// Flat fields of the institution form. `id`/`address_id` are `None` for a
/// new record; street fields are kept as typed text until submission.
#[derive(Debug, Clone, Default)]
pub struct InstitutionDraft {
  pub id:            Option<InstitutionId>,
  pub address_id:    Option<AddressId>,
  pub name:          String,
  pub phone:         String,
  pub email:         String,
  pub kind:          Option<InstitutionKind>,
  pub street_name:   String,
  pub street_number: String,
}

impl From<&Institution> for InstitutionDraft {
  fn from(i: &Institution) -> Self {
    Self {
      id:            Some(i.id),
      address_id:    i.address.as_ref().map(|a| a.id),
      name:          i.name.clone(),
      phone:         i.phone.clone(),
      email:         i.email.clone(),
      kind:          Some(i.kind),
      street_name:   i
        .address
        .as_ref()
        .map(|a| a.street_name.clone())
        .unwrap_or_default(),
      street_number: i
        .address
        .as_ref()
        .and_then(|a| a.street_number.clone())
        .unwrap_or_default(),
    }
  }
}

/// Session state of the institution modal: the geography collections, the
/// cascading address selection, and the flat draft.
#[derive(Debug, Default)]
pub struct InstitutionForm {
  pub departments:    Vec<Department>,
  pub municipalities: Vec<Municipality>,
  pub districts:      Vec<District>,
  pub selection:      AddressSelection,
  pub draft:          InstitutionDraft,
}

impl InstitutionForm {
  /// Fetch the geography collections jointly and open the form over
  /// `existing` (or blank). The existing district is reverse-resolved to
  /// its municipality and department. On a transport failure the
  /// collections stay empty and the error is returned alongside the form.
  pub async fn open<D: Directory>(
    directory: &D,
    existing: Option<&Institution>,
  ) -> (Self, Option<D::Error>) {
    let draft = existing.map(InstitutionDraft::from).unwrap_or_default();

    let (departments, municipalities, districts, failure) = match tokio::try_join!(
      directory.departments(),
      directory.municipalities(),
      directory.districts(),
    ) {
      Ok((departments, municipalities, districts)) => {
        (departments, municipalities, districts, None)
      }
      Err(e) => {
        warn!("institution form opened without geography collections: {e}");
        (Vec::new(), Vec::new(), Vec::new(), Some(e))
      }
    };

    let district = existing
      .and_then(|i| i.address.as_ref())
      .map(|a| a.district_id);
    let selection =
      AddressSelection::from_district(district, &districts, &municipalities);

    (
      Self {
        departments,
        municipalities,
        districts,
        selection,
        draft,
      },
      failure,
    )
  }

  /// Persist the form: the address first, then the institution pointing at
  /// it. Editing updates the existing address in place; everything else
  /// creates a fresh one. Nothing is sent while a required field is
  /// missing.
  pub async fn submit<D: Directory>(
    &self,
    directory: &D,
  ) -> Result<(), SubmitError<D::Error>> {
    if self.draft.name.trim().is_empty() {
      return Err(SubmitError::Incomplete("the institution name is required"));
    }
    if self.draft.phone.trim().is_empty() {
      return Err(SubmitError::Incomplete("the phone number is required"));
    }
    if self.draft.email.trim().is_empty() {
      return Err(SubmitError::Incomplete("the email address is required"));
    }
    let Some(kind) = self.draft.kind else {
      return Err(SubmitError::Incomplete("choose the institution type"));
    };
    let Some(district_id) = self.selection.district else {
      return Err(SubmitError::Incomplete(
        "select a department, municipality and district",
      ));
    };
    if self.draft.street_name.trim().is_empty() {
      return Err(SubmitError::Incomplete("the street name is required"));
    }

    let street_number = match self.draft.street_number.trim() {
      "" => None,
      n => Some(n.to_owned()),
    };
    let address = NewAddress {
      street_name: self.draft.street_name.trim().to_owned(),
      street_number,
      district_id,
    };

    let address_id = match (self.draft.id, self.draft.address_id) {
      (Some(_), Some(address_id)) => {
        directory
          .update_address(address_id, address)
          .await
          .map_err(SubmitError::Transport)?;
        address_id
      }
      _ => directory
        .create_address(address)
        .await
        .map_err(SubmitError::Transport)?
        .id,
    };

    let input = NewInstitution {
      name: self.draft.name.trim().to_owned(),
      phone: self.draft.phone.trim().to_owned(),
      email: self.draft.email.trim().to_owned(),
      kind,
      address_id,
    };
    match self.draft.id {
      Some(id) => directory.update_institution(id, input).await,
      None => directory.create_institution(input).await,
    }
    .map_err(SubmitError::Transport)
  }
}

// ─── Project form ────────────────────────────────────────────────────────────

/// Session state of the project modal: the collections the selects and the
/// uniqueness check need, the draft, and the debounced student search.
#[derive(Debug, Default)]
pub struct ProjectForm {
  pub projects:     Vec<Project>,
  pub coordinators: Vec<Coordinator>,
  pub institutions: Vec<Institution>,
  pub draft:        ProjectDraft,
  pub search:       SearchDebouncer,
}

impl ProjectForm {
  /// Fetch the project, coordinator and institution collections jointly
  /// and open the form over `existing` (or blank). When editing, the
  /// search box is seeded with the current student so the selection is
  /// visible without a lookup.
  pub async fn open<D: Directory>(
    directory: &D,
    existing: Option<&Project>,
  ) -> (Self, Option<D::Error>) {
    let draft = existing.map(ProjectDraft::from).unwrap_or_default();

    let (projects, coordinators, institutions, failure) = match tokio::try_join!(
      directory.projects(),
      directory.coordinators(),
      directory.institutions(),
    ) {
      Ok((projects, coordinators, institutions)) => {
        (projects, coordinators, institutions, None)
      }
      Err(e) => {
        warn!("project form opened without collections: {e}");
        (Vec::new(), Vec::new(), Vec::new(), Some(e))
      }
    };

    let mut search = SearchDebouncer::new();
    if let Some(project) = existing {
      if let (Some(student_id), Some(student)) =
        (project.student_id, project.student.as_ref())
      {
        let hit = StudentHit {
          id:         student_id,
          first_name: student.first_name.clone(),
          last_name:  student.last_name.clone(),
        };
        search.seed(&hit.display_name(), vec![hit]);
      }
    }

    (
      Self {
        projects,
        coordinators,
        institutions,
        draft,
        search,
      },
      failure,
    )
  }

  /// Pick a search hit as the project's student. The result set collapses
  /// to the chosen hit, as a settled single-entry query would leave it.
  pub fn choose_student(&mut self, hit: StudentHit) {
    self.draft.student_id = Some(hit.id);
    self.search.seed(&hit.display_name(), vec![hit]);
  }

  /// Drop the chosen student (the cleared search box shows no results).
  pub fn clear_student(&mut self) {
    self.draft.student_id = None;
    self.search.seed("", Vec::new());
  }

  /// Validate, then create or update. No network call happens when a
  /// check fails; the draft is left untouched for correction.
  pub async fn submit<D: Directory>(
    &self,
    directory: &D,
  ) -> Result<Project, SubmitError<D::Error>> {
    validate(&self.draft, &self.projects)?;
    match self.draft.id {
      Some(id) => directory.update_project(id, self.draft.clone()).await,
      None => directory.create_project(self.draft.clone()).await,
    }
    .map_err(SubmitError::Transport)
  }
}

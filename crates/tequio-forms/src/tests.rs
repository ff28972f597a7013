//! Session-level tests against an in-memory [`Directory`].

use std::sync::atomic::{AtomicUsize, Ordering};

use tequio_core::{
  directory::Directory,
  id::{
    AddressId, CoordinationId, CoordinatorId, DegreeId, DepartmentId,
    DistrictId, InstitutionId, MunicipalityId, ProjectId, StudentId, UserId,
  },
  record::{
    Address, Coordination, Coordinator, Degree, Department, District,
    Institution, InstitutionKind, Municipality, NewAddress, NewCoordination,
    NewCoordinator, NewDegree, NewInstitution, NewStudent, NewUser, Project,
    ProjectDraft, ProjectStatus, Student, StudentHit, StudentRef, User,
  },
};
use thiserror::Error;

use crate::{
  project::ValidationError,
  session::{InstitutionForm, ProjectForm, SubmitError},
};

// ─── In-memory directory ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("transport unavailable")]
struct Unavailable;

/// Serves canned collections; `fail` makes every call error. Mutation
/// counters let tests assert which network calls happened.
#[derive(Default)]
struct StubDirectory {
  fail:           bool,
  departments:    Vec<Department>,
  municipalities: Vec<Municipality>,
  districts:      Vec<District>,
  institutions:   Vec<Institution>,
  projects:       Vec<Project>,
  coordinators:   Vec<Coordinator>,
  students:       Vec<StudentHit>,

  created_addresses:    AtomicUsize,
  updated_addresses:    AtomicUsize,
  created_institutions: AtomicUsize,
  updated_institutions: AtomicUsize,
  submitted_projects:   AtomicUsize,
}

impl StubDirectory {
  fn check(&self) -> Result<(), Unavailable> {
    if self.fail { Err(Unavailable) } else { Ok(()) }
  }
}

impl Directory for StubDirectory {
  type Error = Unavailable;

  async fn departments(&self) -> Result<Vec<Department>, Unavailable> {
    self.check()?;
    Ok(self.departments.clone())
  }

  async fn municipalities(&self) -> Result<Vec<Municipality>, Unavailable> {
    self.check()?;
    Ok(self.municipalities.clone())
  }

  async fn districts(&self) -> Result<Vec<District>, Unavailable> {
    self.check()?;
    Ok(self.districts.clone())
  }

  async fn create_address(
    &self,
    input: NewAddress,
  ) -> Result<Address, Unavailable> {
    self.check()?;
    self.created_addresses.fetch_add(1, Ordering::SeqCst);
    Ok(Address {
      id:            AddressId(900),
      street_name:   input.street_name,
      street_number: input.street_number,
      district_id:   input.district_id,
    })
  }

  async fn update_address(
    &self,
    _id: AddressId,
    _input: NewAddress,
  ) -> Result<(), Unavailable> {
    self.check()?;
    self.updated_addresses.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }

  async fn institutions(&self) -> Result<Vec<Institution>, Unavailable> {
    self.check()?;
    Ok(self.institutions.clone())
  }

  async fn create_institution(
    &self,
    _input: NewInstitution,
  ) -> Result<(), Unavailable> {
    self.check()?;
    self.created_institutions.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }

  async fn update_institution(
    &self,
    _id: InstitutionId,
    _input: NewInstitution,
  ) -> Result<(), Unavailable> {
    self.check()?;
    self.updated_institutions.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }

  async fn delete_institution(
    &self,
    _id: InstitutionId,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn projects(&self) -> Result<Vec<Project>, Unavailable> {
    self.check()?;
    Ok(self.projects.clone())
  }

  async fn create_project(
    &self,
    draft: ProjectDraft,
  ) -> Result<Project, Unavailable> {
    self.check()?;
    self.submitted_projects.fetch_add(1, Ordering::SeqCst);
    Ok(project_from_draft(ProjectId(999), &draft))
  }

  async fn update_project(
    &self,
    id: ProjectId,
    draft: ProjectDraft,
  ) -> Result<Project, Unavailable> {
    self.check()?;
    self.submitted_projects.fetch_add(1, Ordering::SeqCst);
    Ok(project_from_draft(id, &draft))
  }

  async fn delete_project(&self, _id: ProjectId) -> Result<(), Unavailable> {
    self.check()
  }

  async fn students(&self) -> Result<Vec<Student>, Unavailable> {
    self.check()?;
    Ok(Vec::new())
  }

  async fn search_students(
    &self,
    query: &str,
  ) -> Result<Vec<StudentHit>, Unavailable> {
    self.check()?;
    let needle = query.to_lowercase();
    Ok(
      self
        .students
        .iter()
        .filter(|s| s.display_name().to_lowercase().contains(&needle))
        .cloned()
        .collect(),
    )
  }

  async fn create_student(&self, _input: NewStudent) -> Result<(), Unavailable> {
    self.check()
  }

  async fn update_student(
    &self,
    _id: StudentId,
    _input: NewStudent,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn delete_student(&self, _id: StudentId) -> Result<(), Unavailable> {
    self.check()
  }

  async fn send_student_email(
    &self,
    _id: StudentId,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn degrees(&self) -> Result<Vec<Degree>, Unavailable> {
    self.check()?;
    Ok(Vec::new())
  }

  async fn create_degree(&self, _input: NewDegree) -> Result<(), Unavailable> {
    self.check()
  }

  async fn update_degree(
    &self,
    _id: DegreeId,
    _input: NewDegree,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn delete_degree(&self, _id: DegreeId) -> Result<(), Unavailable> {
    self.check()
  }

  async fn coordinations(&self) -> Result<Vec<Coordination>, Unavailable> {
    self.check()?;
    Ok(Vec::new())
  }

  async fn create_coordination(
    &self,
    _input: NewCoordination,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn update_coordination(
    &self,
    _id: CoordinationId,
    _input: NewCoordination,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn delete_coordination(
    &self,
    _id: CoordinationId,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn coordinators(&self) -> Result<Vec<Coordinator>, Unavailable> {
    self.check()?;
    Ok(self.coordinators.clone())
  }

  async fn create_coordinator(
    &self,
    _input: NewCoordinator,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn update_coordinator(
    &self,
    _id: CoordinatorId,
    _input: NewCoordinator,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn delete_coordinator(
    &self,
    _id: CoordinatorId,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn send_coordinator_email(
    &self,
    _id: CoordinatorId,
  ) -> Result<(), Unavailable> {
    self.check()
  }

  async fn users(&self) -> Result<Vec<User>, Unavailable> {
    self.check()?;
    Ok(Vec::new())
  }

  async fn roles(&self) -> Result<Vec<String>, Unavailable> {
    self.check()?;
    Ok(Vec::new())
  }

  async fn create_user(&self, _input: NewUser) -> Result<(), Unavailable> {
    self.check()
  }

  async fn update_user(
    &self,
    _id: UserId,
    _input: NewUser,
  ) -> Result<(), Unavailable> {
    self.check()
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn project_from_draft(id: ProjectId, draft: &ProjectDraft) -> Project {
  Project {
    id,
    name: draft.name.clone(),
    description: draft.description.clone(),
    status: draft.status,
    coordinator_id: draft.coordinator_id,
    institution_id: draft.institution_id,
    student_id: draft.student_id,
    start_date: draft.start_date,
    end_date: draft.end_date,
    student: None,
    coordinator: None,
    institution: None,
  }
}

fn geography() -> StubDirectory {
  StubDirectory {
    departments: vec![Department {
      id:   DepartmentId(1),
      name: "San Salvador".into(),
    }],
    municipalities: vec![Municipality {
      id:            MunicipalityId(10),
      name:          "San Salvador Centro".into(),
      department_id: DepartmentId(1),
    }],
    districts: vec![District {
      id:              DistrictId(100),
      name:            "Mejicanos".into(),
      municipality_id: MunicipalityId(10),
    }],
    ..StubDirectory::default()
  }
}

fn institution_with_address() -> Institution {
  Institution {
    id:      InstitutionId(3),
    name:    "Casa de la Cultura".into(),
    phone:   "2222-0000".into(),
    email:   "casa@example.com".into(),
    kind:    InstitutionKind::Public,
    address: Some(Address {
      id:            AddressId(5),
      street_name:   "Calle Oriente".into(),
      street_number: Some("12".into()),
      district_id:   DistrictId(100),
    }),
  }
}

fn existing_project() -> Project {
  Project {
    id: ProjectId(1),
    name: "Alfabetización".into(),
    description: "Tutorías".into(),
    status: ProjectStatus::InProgress,
    coordinator_id: Some(CoordinatorId(2)),
    institution_id: Some(InstitutionId(3)),
    student_id: Some(StudentId(7)),
    start_date: None,
    end_date: None,
    student: Some(StudentRef {
      first_name: "Ana".into(),
      last_name:  "Pérez".into(),
    }),
    coordinator: None,
    institution: None,
  }
}

// ─── Institution form ────────────────────────────────────────────────────────

#[tokio::test]
async fn opening_on_a_leaf_district_selects_the_whole_chain() {
  let directory = geography();
  let existing = institution_with_address();

  let (form, failure) = InstitutionForm::open(&directory, Some(&existing)).await;
  assert!(failure.is_none());

  assert_eq!(form.selection.department, Some(DepartmentId(1)));
  assert_eq!(form.selection.municipality, Some(MunicipalityId(10)));
  assert_eq!(form.selection.district, Some(DistrictId(100)));

  let munis = form.selection.municipality_candidates(&form.municipalities);
  assert_eq!(munis.iter().map(|m| m.id).collect::<Vec<_>>(), [
    MunicipalityId(10)
  ]);
  let dists = form.selection.district_candidates(&form.districts);
  assert_eq!(dists.iter().map(|d| d.id).collect::<Vec<_>>(), [DistrictId(
    100
  )]);

  assert_eq!(form.draft.street_name, "Calle Oriente");
  assert_eq!(form.draft.street_number, "12");
}

#[tokio::test]
async fn transport_failure_opens_the_form_with_empty_collections() {
  let directory = StubDirectory {
    fail: true,
    ..geography()
  };

  let (form, failure) = InstitutionForm::open(&directory, None).await;
  assert!(failure.is_some());
  assert!(form.departments.is_empty());
  assert!(
    form
      .selection
      .municipality_candidates(&form.municipalities)
      .is_empty()
  );
}

#[tokio::test]
async fn creating_an_institution_persists_the_address_first() {
  let directory = geography();
  let (mut form, _) = InstitutionForm::open(&directory, None).await;

  form.draft.name = "Biblioteca Municipal".into();
  form.draft.phone = "2222-1111".into();
  form.draft.email = "biblio@example.com".into();
  form.draft.kind = Some(InstitutionKind::Public);
  form.draft.street_name = "Avenida Norte".into();
  form.selection.select_department(Some(DepartmentId(1)));
  form.selection.select_municipality(Some(MunicipalityId(10)));
  form.selection.select_district(Some(DistrictId(100)));

  form.submit(&directory).await.unwrap();

  assert_eq!(directory.created_addresses.load(Ordering::SeqCst), 1);
  assert_eq!(directory.created_institutions.load(Ordering::SeqCst), 1);
  assert_eq!(directory.updated_addresses.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn editing_an_institution_updates_its_address_in_place() {
  let directory = geography();
  let existing = institution_with_address();
  let (form, _) = InstitutionForm::open(&directory, Some(&existing)).await;

  form.submit(&directory).await.unwrap();

  assert_eq!(directory.updated_addresses.load(Ordering::SeqCst), 1);
  assert_eq!(directory.updated_institutions.load(Ordering::SeqCst), 1);
  assert_eq!(directory.created_addresses.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn incomplete_address_blocks_submission() {
  let directory = geography();
  let (mut form, _) = InstitutionForm::open(&directory, None).await;

  form.draft.name = "Biblioteca".into();
  form.draft.phone = "2222".into();
  form.draft.email = "b@example.com".into();
  form.draft.kind = Some(InstitutionKind::Ngo);
  form.draft.street_name = "Avenida Norte".into();
  form.selection.select_department(Some(DepartmentId(1)));
  // Municipality and district never chosen.

  let err = form.submit(&directory).await.unwrap_err();
  assert!(matches!(err, SubmitError::Incomplete(_)));
  assert_eq!(directory.created_addresses.load(Ordering::SeqCst), 0);
  assert_eq!(directory.created_institutions.load(Ordering::SeqCst), 0);
}

// ─── Project form ────────────────────────────────────────────────────────────

#[tokio::test]
async fn opening_an_existing_project_seeds_the_search_box() {
  let directory = StubDirectory {
    projects: vec![existing_project()],
    ..StubDirectory::default()
  };
  let existing = existing_project();

  let (form, failure) = ProjectForm::open(&directory, Some(&existing)).await;
  assert!(failure.is_none());
  assert_eq!(form.draft.student_id, Some(StudentId(7)));
  assert_eq!(form.search.query(), "Ana Pérez");
  assert_eq!(form.search.results().len(), 1);
}

#[tokio::test]
async fn duplicate_student_blocks_submission_and_names_the_conflict() {
  let directory = StubDirectory {
    projects: vec![existing_project()],
    ..StubDirectory::default()
  };

  let (mut form, _) = ProjectForm::open(&directory, None).await;
  form.draft.name = "Nuevo proyecto".into();
  form.draft.student_id = Some(StudentId(7));

  let err = form.submit(&directory).await.unwrap_err();
  assert!(matches!(
    err,
    SubmitError::Validation(ValidationError::DuplicateStudentAssignment { ref project })
      if project == "Alfabetización"
  ));
  // The rejected draft never reached the network.
  assert_eq!(directory.submitted_projects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn editing_a_project_keeps_its_own_student() {
  let directory = StubDirectory {
    projects: vec![existing_project()],
    ..StubDirectory::default()
  };
  let existing = existing_project();

  let (form, _) = ProjectForm::open(&directory, Some(&existing)).await;
  let saved = form.submit(&directory).await.unwrap();
  assert_eq!(saved.id, ProjectId(1));
  assert_eq!(directory.submitted_projects.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn choosing_and_clearing_a_student_updates_draft_and_results() {
  let directory = StubDirectory::default();
  let (mut form, _) = ProjectForm::open(&directory, None).await;

  let hit = StudentHit {
    id:         StudentId(7),
    first_name: "Ana".into(),
    last_name:  "Pérez".into(),
  };
  form.choose_student(hit.clone());
  assert_eq!(form.draft.student_id, Some(StudentId(7)));
  assert_eq!(form.search.results(), [hit]);

  form.clear_student();
  assert_eq!(form.draft.student_id, None);
  assert!(form.search.results().is_empty());
}

#[tokio::test]
async fn missing_student_blocks_submission_before_anything_else() {
  let directory = StubDirectory::default();
  let (mut form, _) = ProjectForm::open(&directory, None).await;
  form.draft.name = "Proyecto".into();

  let err = form.submit(&directory).await.unwrap_err();
  assert!(matches!(
    err,
    SubmitError::Validation(ValidationError::MissingStudent)
  ));
  assert_eq!(directory.submitted_projects.load(Ordering::SeqCst), 0);
}

//! The `Directory` trait — the program's remote collections as an
//! abstraction.
//!
//! Implemented by transport backends (e.g. `tequio-client` over HTTP).
//! The form layer depends on this trait, not on any concrete transport, so
//! sessions can be exercised against an in-memory directory in tests.
//!
//! Failure semantics for consumers: a transport error means "collection
//! unavailable". Form sessions treat it as an empty collection (and so
//! empty candidate sets) with no automatic retry — the operator recovers by
//! reopening the form. Nothing here is fatal.
//!
//! All methods return `Send` futures so the trait can be used from a
//! multi-threaded async runtime.

use std::future::Future;

use crate::{
  id::{
    AddressId, CoordinationId, CoordinatorId, DegreeId, InstitutionId,
    ProjectId, StudentId, UserId,
  },
  record::{
    Address, Coordination, Coordinator, Degree, Department, District,
    Institution, Municipality, NewAddress, NewCoordination, NewCoordinator,
    NewDegree, NewInstitution, NewStudent, NewUser, Project, ProjectDraft,
    Student, StudentHit, User,
  },
};

pub trait Directory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Geography ─────────────────────────────────────────────────────────

  fn departments(
    &self,
  ) -> impl Future<Output = Result<Vec<Department>, Self::Error>> + Send + '_;

  fn municipalities(
    &self,
  ) -> impl Future<Output = Result<Vec<Municipality>, Self::Error>> + Send + '_;

  fn districts(
    &self,
  ) -> impl Future<Output = Result<Vec<District>, Self::Error>> + Send + '_;

  // ── Addresses ─────────────────────────────────────────────────────────

  /// Persist a new address and return it (the institution create flow
  /// needs the fresh id).
  fn create_address(
    &self,
    input: NewAddress,
  ) -> impl Future<Output = Result<Address, Self::Error>> + Send + '_;

  fn update_address(
    &self,
    id: AddressId,
    input: NewAddress,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Institutions ──────────────────────────────────────────────────────

  fn institutions(
    &self,
  ) -> impl Future<Output = Result<Vec<Institution>, Self::Error>> + Send + '_;

  fn create_institution(
    &self,
    input: NewInstitution,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_institution(
    &self,
    id: InstitutionId,
    input: NewInstitution,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_institution(
    &self,
    id: InstitutionId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Projects ──────────────────────────────────────────────────────────

  fn projects(
    &self,
  ) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send + '_;

  /// Persist a new project. Callers run the pre-submission validation
  /// first; a draft that failed it must never reach this method.
  fn create_project(
    &self,
    draft: ProjectDraft,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  fn update_project(
    &self,
    id: ProjectId,
    draft: ProjectDraft,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  fn delete_project(
    &self,
    id: ProjectId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Students ──────────────────────────────────────────────────────────

  fn students(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Remote substring search over students. Callers must not invoke this
  /// for queries shorter than two characters; the search debouncer
  /// enforces that guard.
  fn search_students<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<StudentHit>, Self::Error>> + Send + 'a;

  fn create_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_student(
    &self,
    id: StudentId,
    input: NewStudent,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_student(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Ask the server to send the student their notification email.
  fn send_student_email(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Degrees ───────────────────────────────────────────────────────────

  fn degrees(
    &self,
  ) -> impl Future<Output = Result<Vec<Degree>, Self::Error>> + Send + '_;

  fn create_degree(
    &self,
    input: NewDegree,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_degree(
    &self,
    id: DegreeId,
    input: NewDegree,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_degree(
    &self,
    id: DegreeId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Coordinations ─────────────────────────────────────────────────────

  fn coordinations(
    &self,
  ) -> impl Future<Output = Result<Vec<Coordination>, Self::Error>> + Send + '_;

  fn create_coordination(
    &self,
    input: NewCoordination,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_coordination(
    &self,
    id: CoordinationId,
    input: NewCoordination,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_coordination(
    &self,
    id: CoordinationId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Coordinators ──────────────────────────────────────────────────────

  fn coordinators(
    &self,
  ) -> impl Future<Output = Result<Vec<Coordinator>, Self::Error>> + Send + '_;

  fn create_coordinator(
    &self,
    input: NewCoordinator,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_coordinator(
    &self,
    id: CoordinatorId,
    input: NewCoordinator,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_coordinator(
    &self,
    id: CoordinatorId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Ask the server to send the coordinator their notification email.
  fn send_coordinator_email(
    &self,
    id: CoordinatorId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  fn users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// The assignable role names.
  fn roles(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn update_user(
    &self,
    id: UserId,
    input: NewUser,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

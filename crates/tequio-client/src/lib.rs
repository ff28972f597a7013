//! `reqwest` implementation of [`Directory`] against the program's REST
//! API.
//!
//! Paths and payload shapes follow the upstream service exactly, including
//! its irregular corners: users are created via `/users/create-user` and
//! updated via `/users/update-user/{id}`, role names live at `/users/role`,
//! the student search hangs off `/proyectos/estudiantes/search`, and a
//! created address comes back wrapped in a `{ "direccion": … }` envelope.

pub mod error;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tequio_core::{
  directory::Directory,
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
use tracing::debug;

pub use crate::error::{Error, Result};

/// Connection settings for the API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Base URL without the `/api` suffix, e.g. `http://localhost:8000`.
  pub base_url: String,
  /// Pre-issued bearer token; `None` for an unauthenticated API.
  pub token:    Option<String>,
}

/// REST-backed [`Directory`].
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RestDirectory {
  client: Client,
  config: ApiConfig,
}

/// `POST /direcciones` wraps the created record.
#[derive(Deserialize)]
struct AddressEnvelope {
  direccion: Address,
}

impl RestDirectory {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    match &self.config.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  // ── Request helpers ───────────────────────────────────────────────────

  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let resp = self.auth(self.client.get(self.url(path))).send().await?;
    decode("GET", path, resp).await
  }

  async fn post_json<B: Serialize, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T> {
    let resp = self
      .auth(self.client.post(self.url(path)))
      .json(body)
      .send()
      .await?;
    decode("POST", path, resp).await
  }

  async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
    let resp = self
      .auth(self.client.post(self.url(path)))
      .json(body)
      .send()
      .await?;
    check("POST", path, &resp)
  }

  async fn put_json<B: Serialize, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T> {
    let resp = self
      .auth(self.client.put(self.url(path)))
      .json(body)
      .send()
      .await?;
    decode("PUT", path, resp).await
  }

  async fn put_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
    let resp = self
      .auth(self.client.put(self.url(path)))
      .json(body)
      .send()
      .await?;
    check("PUT", path, &resp)
  }

  async fn delete(&self, path: &str) -> Result<()> {
    let resp = self.auth(self.client.delete(self.url(path))).send().await?;
    check("DELETE", path, &resp)
  }

  async fn get_unit(&self, path: &str) -> Result<()> {
    let resp = self.auth(self.client.get(self.url(path))).send().await?;
    check("GET", path, &resp)
  }
}

fn check(method: &'static str, path: &str, resp: &Response) -> Result<()> {
  if !resp.status().is_success() {
    return Err(Error::Status {
      method,
      path: path.to_owned(),
      status: resp.status(),
    });
  }
  Ok(())
}

async fn decode<T: DeserializeOwned>(
  method: &'static str,
  path: &str,
  resp: Response,
) -> Result<T> {
  check(method, path, &resp)?;
  resp.json().await.map_err(|source| Error::Decode {
    path: path.to_owned(),
    source,
  })
}

impl Directory for RestDirectory {
  type Error = Error;

  // ── Geography ─────────────────────────────────────────────────────────

  async fn departments(&self) -> Result<Vec<Department>> {
    self.get_json("/departamentos").await
  }

  async fn municipalities(&self) -> Result<Vec<Municipality>> {
    self.get_json("/municipios").await
  }

  async fn districts(&self) -> Result<Vec<District>> {
    self.get_json("/distritos").await
  }

  // ── Addresses ─────────────────────────────────────────────────────────

  async fn create_address(&self, input: NewAddress) -> Result<Address> {
    let envelope: AddressEnvelope =
      self.post_json("/direcciones", &input).await?;
    Ok(envelope.direccion)
  }

  async fn update_address(
    &self,
    id: AddressId,
    input: NewAddress,
  ) -> Result<()> {
    self.put_unit(&format!("/direcciones/{id}"), &input).await
  }

  // ── Institutions ──────────────────────────────────────────────────────

  async fn institutions(&self) -> Result<Vec<Institution>> {
    self.get_json("/instituciones").await
  }

  async fn create_institution(&self, input: NewInstitution) -> Result<()> {
    self.post_unit("/instituciones", &input).await
  }

  async fn update_institution(
    &self,
    id: InstitutionId,
    input: NewInstitution,
  ) -> Result<()> {
    self.put_unit(&format!("/instituciones/{id}"), &input).await
  }

  async fn delete_institution(&self, id: InstitutionId) -> Result<()> {
    self.delete(&format!("/instituciones/{id}")).await
  }

  // ── Projects ──────────────────────────────────────────────────────────

  async fn projects(&self) -> Result<Vec<Project>> {
    self.get_json("/proyectos").await
  }

  async fn create_project(&self, draft: ProjectDraft) -> Result<Project> {
    self.post_json("/proyectos", &draft).await
  }

  async fn update_project(
    &self,
    id: ProjectId,
    draft: ProjectDraft,
  ) -> Result<Project> {
    self.put_json(&format!("/proyectos/{id}"), &draft).await
  }

  async fn delete_project(&self, id: ProjectId) -> Result<()> {
    self.delete(&format!("/proyectos/{id}")).await
  }

  // ── Students ──────────────────────────────────────────────────────────

  async fn students(&self) -> Result<Vec<Student>> {
    self.get_json("/estudiantes").await
  }

  async fn search_students(&self, query: &str) -> Result<Vec<StudentHit>> {
    let path = "/proyectos/estudiantes/search";
    debug!(query, "searching students");
    let resp = self
      .auth(self.client.get(self.url(path)))
      .query(&[("q", query)])
      .send()
      .await?;
    decode("GET", path, resp).await
  }

  async fn create_student(&self, input: NewStudent) -> Result<()> {
    self.post_unit("/estudiantes", &input).await
  }

  async fn update_student(
    &self,
    id: StudentId,
    input: NewStudent,
  ) -> Result<()> {
    self.put_unit(&format!("/estudiantes/{id}"), &input).await
  }

  async fn delete_student(&self, id: StudentId) -> Result<()> {
    self.delete(&format!("/estudiantes/{id}")).await
  }

  async fn send_student_email(&self, id: StudentId) -> Result<()> {
    self.get_unit(&format!("/estudiantes/{id}/send-email")).await
  }

  // ── Degrees ───────────────────────────────────────────────────────────

  async fn degrees(&self) -> Result<Vec<Degree>> {
    self.get_json("/carreras").await
  }

  async fn create_degree(&self, input: NewDegree) -> Result<()> {
    self.post_unit("/carreras", &input).await
  }

  async fn update_degree(&self, id: DegreeId, input: NewDegree) -> Result<()> {
    self.put_unit(&format!("/carreras/{id}"), &input).await
  }

  async fn delete_degree(&self, id: DegreeId) -> Result<()> {
    self.delete(&format!("/carreras/{id}")).await
  }

  // ── Coordinations ─────────────────────────────────────────────────────

  async fn coordinations(&self) -> Result<Vec<Coordination>> {
    self.get_json("/coordinaciones").await
  }

  async fn create_coordination(&self, input: NewCoordination) -> Result<()> {
    self.post_unit("/coordinaciones", &input).await
  }

  async fn update_coordination(
    &self,
    id: CoordinationId,
    input: NewCoordination,
  ) -> Result<()> {
    self.put_unit(&format!("/coordinaciones/{id}"), &input).await
  }

  async fn delete_coordination(&self, id: CoordinationId) -> Result<()> {
    self.delete(&format!("/coordinaciones/{id}")).await
  }

  // ── Coordinators ──────────────────────────────────────────────────────

  async fn coordinators(&self) -> Result<Vec<Coordinator>> {
    self.get_json("/coordinadores").await
  }

  async fn create_coordinator(&self, input: NewCoordinator) -> Result<()> {
    self.post_unit("/coordinadores", &input).await
  }

  async fn update_coordinator(
    &self,
    id: CoordinatorId,
    input: NewCoordinator,
  ) -> Result<()> {
    self.put_unit(&format!("/coordinadores/{id}"), &input).await
  }

  async fn delete_coordinator(&self, id: CoordinatorId) -> Result<()> {
    self.delete(&format!("/coordinadores/{id}")).await
  }

  async fn send_coordinator_email(&self, id: CoordinatorId) -> Result<()> {
    self
      .get_unit(&format!("/coordinadores/{id}/send-email"))
      .await
  }

  // ── Users ─────────────────────────────────────────────────────────────

  async fn users(&self) -> Result<Vec<User>> {
    self.get_json("/users").await
  }

  async fn roles(&self) -> Result<Vec<String>> {
    self.get_json("/users/role").await
  }

  async fn create_user(&self, input: NewUser) -> Result<()> {
    self.post_unit("/users/create-user", &input).await
  }

  async fn update_user(&self, id: UserId, input: NewUser) -> Result<()> {
    self.put_unit(&format!("/users/update-user/{id}"), &input).await
  }
}

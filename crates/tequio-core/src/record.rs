//! Domain records, as served by the social-service program's REST API.
//!
//! Wire field names are the API's Spanish identifiers; they are mapped to
//! English exactly once here so nothing downstream ever touches the wire
//! vocabulary. Optional relations and dates default at this boundary —
//! record fields are typed (`Option<NaiveDate>`, enums) and are never
//! re-parsed or re-coerced at use sites.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{
  AddressId, CoordinationId, CoordinatorId, DegreeId, DepartmentId,
  DistrictId, InstitutionId, MunicipalityId, ProjectId, StudentId, UserId,
};

// ─── Geography ───────────────────────────────────────────────────────────────

/// Top level of the address hierarchy. Immutable during a form session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
  pub id:   DepartmentId,
  #[serde(rename = "nombre_departamento")]
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
  pub id:            MunicipalityId,
  #[serde(rename = "nombre_municipio")]
  pub name:          String,
  #[serde(rename = "departamento_id")]
  pub department_id: DepartmentId,
}

/// Leaf level; an [`Address`] points at one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
  pub id:              DistrictId,
  #[serde(rename = "nombre_distrito")]
  pub name:            String,
  #[serde(rename = "municipio_id")]
  pub municipality_id: MunicipalityId,
}

// ─── Addresses ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
  pub id:            AddressId,
  #[serde(rename = "nombre_calle")]
  pub street_name:   String,
  /// Not required by the upstream schema.
  #[serde(rename = "numero_calle", default)]
  pub street_number: Option<String>,
  #[serde(rename = "distrito_id")]
  pub district_id:   DistrictId,
}

/// Create/update payload for an address. The institution form persists this
/// first, then the institution referencing the returned id.
#[derive(Debug, Clone, Serialize)]
pub struct NewAddress {
  #[serde(rename = "nombre_calle")]
  pub street_name:   String,
  #[serde(rename = "numero_calle")]
  pub street_number: Option<String>,
  #[serde(rename = "distrito_id")]
  pub district_id:   DistrictId,
}

// ─── Institutions ────────────────────────────────────────────────────────────

/// The institution's sector. Wire values are the API's display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstitutionKind {
  #[serde(rename = "Pública")]
  Public,
  #[serde(rename = "Privada")]
  Private,
  #[serde(rename = "ONG")]
  Ngo,
}

impl InstitutionKind {
  pub const ALL: [InstitutionKind; 3] = [Self::Public, Self::Private, Self::Ngo];

  /// The wire/display string ("Pública", "Privada", "ONG").
  pub fn label(self) -> &'static str {
    match self {
      Self::Public => "Pública",
      Self::Private => "Privada",
      Self::Ngo => "ONG",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
  pub id:      InstitutionId,
  #[serde(rename = "nombre_institucion")]
  pub name:    String,
  #[serde(rename = "telefono_institucion")]
  pub phone:   String,
  #[serde(rename = "correo_institucion")]
  pub email:   String,
  #[serde(rename = "tipo_institucion")]
  pub kind:    InstitutionKind,
  #[serde(rename = "direccion", default)]
  pub address: Option<Address>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewInstitution {
  #[serde(rename = "nombre_institucion")]
  pub name:       String,
  #[serde(rename = "telefono_institucion")]
  pub phone:      String,
  #[serde(rename = "correo_institucion")]
  pub email:      String,
  #[serde(rename = "tipo_institucion")]
  pub kind:       InstitutionKind,
  #[serde(rename = "direccion_id")]
  pub address_id: AddressId,
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
  #[serde(rename = "En proceso")]
  InProgress,
  #[serde(rename = "Finalizado")]
  Finished,
}

impl ProjectStatus {
  pub const ALL: [ProjectStatus; 2] = [Self::InProgress, Self::Finished];

  pub fn label(self) -> &'static str {
    match self {
      Self::InProgress => "En proceso",
      Self::Finished => "Finalizado",
    }
  }
}

/// Display-only embedded student on a project row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRef {
  #[serde(rename = "nombre_estudiante")]
  pub first_name: String,
  #[serde(rename = "apellido_estudiante")]
  pub last_name:  String,
}

/// Display-only embedded coordinator on a project row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorRef {
  #[serde(rename = "nombre_coordinador")]
  pub name: String,
}

/// Display-only embedded institution on a project row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionRef {
  #[serde(rename = "nombre_institucion")]
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  pub id:             ProjectId,
  #[serde(rename = "nombre_proyecto")]
  pub name:           String,
  #[serde(rename = "descripcion")]
  pub description:    String,
  #[serde(rename = "estado")]
  pub status:         ProjectStatus,
  #[serde(rename = "coordinador_id", default)]
  pub coordinator_id: Option<CoordinatorId>,
  #[serde(rename = "institucion_id", default)]
  pub institution_id: Option<InstitutionId>,
  #[serde(rename = "estudiante_id", default)]
  pub student_id:     Option<StudentId>,
  #[serde(rename = "fecha_inicio", default)]
  pub start_date:     Option<NaiveDate>,
  #[serde(rename = "fecha_fin", default)]
  pub end_date:       Option<NaiveDate>,
  #[serde(rename = "estudiante", default)]
  pub student:        Option<StudentRef>,
  #[serde(rename = "coordinador", default)]
  pub coordinator:    Option<CoordinatorRef>,
  #[serde(rename = "institucion", default)]
  pub institution:    Option<InstitutionRef>,
}

impl Project {
  /// "First Last" of the embedded student, if the API sent one.
  pub fn student_display(&self) -> Option<String> {
    self
      .student
      .as_ref()
      .map(|s| format!("{} {}", s.first_name, s.last_name))
  }
}

/// Editable state of the project form and the submit payload.
/// `id` is `None` for a new record and never crosses the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDraft {
  #[serde(skip)]
  pub id:             Option<ProjectId>,
  #[serde(rename = "nombre_proyecto")]
  pub name:           String,
  #[serde(rename = "descripcion")]
  pub description:    String,
  #[serde(rename = "estado")]
  pub status:         ProjectStatus,
  #[serde(rename = "coordinador_id")]
  pub coordinator_id: Option<CoordinatorId>,
  #[serde(rename = "institucion_id")]
  pub institution_id: Option<InstitutionId>,
  #[serde(rename = "estudiante_id")]
  pub student_id:     Option<StudentId>,
  #[serde(rename = "fecha_inicio")]
  pub start_date:     Option<NaiveDate>,
  #[serde(rename = "fecha_fin")]
  pub end_date:       Option<NaiveDate>,
}

impl Default for ProjectDraft {
  fn default() -> Self {
    Self {
      id: None,
      name: String::new(),
      description: String::new(),
      status: ProjectStatus::InProgress,
      coordinator_id: None,
      institution_id: None,
      student_id: None,
      start_date: None,
      end_date: None,
    }
  }
}

impl From<&Project> for ProjectDraft {
  fn from(p: &Project) -> Self {
    Self {
      id: Some(p.id),
      name: p.name.clone(),
      description: p.description.clone(),
      status: p.status,
      coordinator_id: p.coordinator_id,
      institution_id: p.institution_id,
      student_id: p.student_id,
      start_date: p.start_date,
      end_date: p.end_date,
    }
  }
}

// ─── Students ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
  pub id:          StudentId,
  #[serde(rename = "nombre_estudiante")]
  pub first_name:  String,
  #[serde(rename = "apellido_estudiante")]
  pub last_name:   String,
  #[serde(rename = "carnet")]
  pub card_number: String,
  #[serde(rename = "correo_estudiante")]
  pub email:       String,
  #[serde(rename = "telefono_estudiante")]
  pub phone:       String,
  #[serde(rename = "carrera_id", default)]
  pub degree_id:   Option<DegreeId>,
  #[serde(rename = "user_id", default)]
  pub user_id:     Option<UserId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewStudent {
  #[serde(rename = "nombre_estudiante")]
  pub first_name:  String,
  #[serde(rename = "apellido_estudiante")]
  pub last_name:   String,
  #[serde(rename = "carnet")]
  pub card_number: String,
  #[serde(rename = "correo_estudiante")]
  pub email:       String,
  #[serde(rename = "telefono_estudiante")]
  pub phone:       String,
  #[serde(rename = "carrera_id")]
  pub degree_id:   Option<DegreeId>,
  #[serde(rename = "user_id")]
  pub user_id:     Option<UserId>,
}

/// A narrowed view of the student collection returned by the remote search.
/// The set is valid only for the lifetime of the query that produced it and
/// is always replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentHit {
  pub id:         StudentId,
  #[serde(rename = "nombre_estudiante")]
  pub first_name: String,
  #[serde(rename = "apellido_estudiante")]
  pub last_name:  String,
}

impl StudentHit {
  pub fn display_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

// ─── Degrees ─────────────────────────────────────────────────────────────────

/// A degree programme ("carrera").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degree {
  pub id:              DegreeId,
  #[serde(rename = "nombre_carrera")]
  pub name:            String,
  #[serde(rename = "coordinacion_id", default)]
  pub coordination_id: Option<CoordinationId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDegree {
  #[serde(rename = "nombre_carrera")]
  pub name:            String,
  #[serde(rename = "coordinacion_id")]
  pub coordination_id: Option<CoordinationId>,
}

// ─── Coordinations ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordination {
  pub id:   CoordinationId,
  #[serde(rename = "nombre_coordinacion")]
  pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCoordination {
  #[serde(rename = "nombre_coordinacion")]
  pub name: String,
}

// ─── Coordinators ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinator {
  pub id:              CoordinatorId,
  #[serde(rename = "nombre_coordinador")]
  pub first_name:      String,
  #[serde(rename = "apellido_coordinador")]
  pub last_name:       String,
  #[serde(rename = "correo_coordinador")]
  pub email:           String,
  #[serde(rename = "telefono_coordinador")]
  pub phone:           String,
  #[serde(rename = "coordinacion_id", default)]
  pub coordination_id: Option<CoordinationId>,
  #[serde(rename = "user_id", default)]
  pub user_id:         Option<UserId>,
}

impl Coordinator {
  pub fn display_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCoordinator {
  #[serde(rename = "nombre_coordinador")]
  pub first_name:      String,
  #[serde(rename = "apellido_coordinador")]
  pub last_name:       String,
  #[serde(rename = "correo_coordinador")]
  pub email:           String,
  #[serde(rename = "telefono_coordinador")]
  pub phone:           String,
  #[serde(rename = "coordinacion_id")]
  pub coordination_id: Option<CoordinationId>,
  #[serde(rename = "user_id")]
  pub user_id:         Option<UserId>,
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id:    UserId,
  pub name:  String,
  pub email: String,
  #[serde(default)]
  pub role:  Option<String>,
}

/// Create/update payload for a user. The password is only sent when the
/// operator typed one; an empty field on update leaves it unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
  pub name:     String,
  pub email:    String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
  pub role:     String,
}

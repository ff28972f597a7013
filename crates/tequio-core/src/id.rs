//! Canonical entity ids.
//!
//! The upstream API issues integer ids, so ids are `i64` end to end —
//! selections hold `Option<…Id>`, never sentinel strings, and equality is
//! ordinary integer equality. One newtype per entity keeps a `DistrictId`
//! from ever being passed where a `MunicipalityId` is expected.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
  ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
    $(
      $(#[$meta])*
      #[derive(
        Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
        Serialize, Deserialize,
      )]
      #[serde(transparent)]
      pub struct $name(pub i64);

      impl std::fmt::Display for $name {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
          self.0.fmt(f)
        }
      }
    )+
  };
}

entity_id! {
  /// Root of the geographic hierarchy.
  DepartmentId,
  MunicipalityId,
  DistrictId,
  AddressId,
  InstitutionId,
  ProjectId,
  StudentId,
  /// A degree programme (the API calls these "carreras").
  DegreeId,
  CoordinationId,
  CoordinatorId,
  UserId,
}

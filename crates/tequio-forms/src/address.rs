//! Cascading selection over the Department → Municipality → District
//! hierarchy.
//!
//! The three levels form a strict tree. A selection is only ever presented
//! in a consistent state: changing an ancestor always clears its
//! descendants, and candidate options are filtered to the selected parent's
//! subtree. Everything here is pure over collections that have already been
//! fetched; no operation can fail.

use tequio_core::{
  id::{DepartmentId, DistrictId, MunicipalityId},
  record::{District, Municipality},
};

/// Form-local selection state for the three-level address hierarchy.
///
/// Invariant: whenever `district` is set it belongs to `municipality`'s
/// subtree, and `municipality` to `department`'s. Every transition below
/// preserves this, so the form can never show a geographically inconsistent
/// triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressSelection {
  pub department:   Option<DepartmentId>,
  pub municipality: Option<MunicipalityId>,
  pub district:     Option<DistrictId>,
}

impl AddressSelection {
  /// Rebuild the full ancestor chain from a leaf district, walking
  /// District → Municipality → Department over the fetched collections.
  ///
  /// An id that is missing from its collection resolves the levels above
  /// it to `None`. That is a presentational default, not an error — the
  /// operator simply re-picks from the top.
  pub fn from_district(
    district: Option<DistrictId>,
    districts: &[District],
    municipalities: &[Municipality],
  ) -> Self {
    let Some(district_id) = district else {
      return Self::default();
    };
    let municipality = districts
      .iter()
      .find(|d| d.id == district_id)
      .map(|d| d.municipality_id);
    let department = municipality.and_then(|municipality_id| {
      municipalities
        .iter()
        .find(|m| m.id == municipality_id)
        .map(|m| m.department_id)
    });
    Self {
      department,
      municipality,
      district: Some(district_id),
    }
  }

  // ── Transitions ───────────────────────────────────────────────────────

  /// Choosing a department invalidates everything below it.
  pub fn select_department(&mut self, department: Option<DepartmentId>) {
    self.department = department;
    self.municipality = None;
    self.district = None;
  }

  /// Choosing a municipality invalidates the district below it.
  pub fn select_municipality(&mut self, municipality: Option<MunicipalityId>) {
    self.municipality = municipality;
    self.district = None;
  }

  /// The district is the terminal level; ancestors are untouched.
  pub fn select_district(&mut self, district: Option<DistrictId>) {
    self.district = district;
  }

  // ── Candidates ────────────────────────────────────────────────────────

  /// Municipalities inside the selected department's subtree.
  /// Empty while no department is selected.
  pub fn municipality_candidates<'a>(
    &self,
    municipalities: &'a [Municipality],
  ) -> Vec<&'a Municipality> {
    match self.department {
      Some(department_id) => municipalities
        .iter()
        .filter(|m| m.department_id == department_id)
        .collect(),
      None => Vec::new(),
    }
  }

  /// Districts inside the selected municipality's subtree.
  /// Empty while no municipality is selected.
  pub fn district_candidates<'a>(
    &self,
    districts: &'a [District],
  ) -> Vec<&'a District> {
    match self.municipality {
      Some(municipality_id) => districts
        .iter()
        .filter(|d| d.municipality_id == municipality_id)
        .collect(),
      None => Vec::new(),
    }
  }

  // ── Selector state ────────────────────────────────────────────────────

  // The lower selectors stay visible but non-interactive until their
  // parent is chosen, so the dependency order is always apparent.

  pub fn municipality_enabled(&self) -> bool {
    self.department.is_some()
  }

  pub fn district_enabled(&self) -> bool {
    self.municipality.is_some()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn municipalities() -> Vec<Municipality> {
    vec![
      Municipality {
        id:            MunicipalityId(10),
        name:          "M1".into(),
        department_id: DepartmentId(1),
      },
      Municipality {
        id:            MunicipalityId(11),
        name:          "M2".into(),
        department_id: DepartmentId(2),
      },
    ]
  }

  fn districts() -> Vec<District> {
    vec![
      District {
        id:              DistrictId(100),
        name:            "D1".into(),
        municipality_id: MunicipalityId(10),
      },
      District {
        id:              DistrictId(101),
        name:            "D2".into(),
        municipality_id: MunicipalityId(11),
      },
    ]
  }

  // ── Reverse resolution ────────────────────────────────────────────────

  #[test]
  fn reverse_resolution_walks_to_the_root() {
    let sel = AddressSelection::from_district(
      Some(DistrictId(100)),
      &districts(),
      &municipalities(),
    );
    assert_eq!(sel.department, Some(DepartmentId(1)));
    assert_eq!(sel.municipality, Some(MunicipalityId(10)));
    assert_eq!(sel.district, Some(DistrictId(100)));
  }

  #[test]
  fn unknown_district_resolves_ancestors_to_none() {
    let sel = AddressSelection::from_district(
      Some(DistrictId(999)),
      &districts(),
      &municipalities(),
    );
    assert_eq!(sel.department, None);
    assert_eq!(sel.municipality, None);
    assert_eq!(sel.district, Some(DistrictId(999)));
  }

  #[test]
  fn district_with_orphan_municipality_resolves_department_to_none() {
    let orphan = vec![District {
      id:              DistrictId(100),
      name:            "D1".into(),
      municipality_id: MunicipalityId(77),
    }];
    let sel = AddressSelection::from_district(
      Some(DistrictId(100)),
      &orphan,
      &municipalities(),
    );
    assert_eq!(sel.municipality, Some(MunicipalityId(77)));
    assert_eq!(sel.department, None);
  }

  #[test]
  fn no_district_yields_empty_selection() {
    let sel =
      AddressSelection::from_district(None, &districts(), &municipalities());
    assert_eq!(sel, AddressSelection::default());
  }

  // ── Cascades ──────────────────────────────────────────────────────────

  #[test]
  fn changing_department_clears_descendants() {
    let mut sel = AddressSelection::from_district(
      Some(DistrictId(100)),
      &districts(),
      &municipalities(),
    );
    sel.select_department(Some(DepartmentId(2)));
    assert_eq!(sel.department, Some(DepartmentId(2)));
    assert_eq!(sel.municipality, None);
    assert_eq!(sel.district, None);
  }

  #[test]
  fn changing_municipality_clears_district_only() {
    let mut sel = AddressSelection::from_district(
      Some(DistrictId(100)),
      &districts(),
      &municipalities(),
    );
    sel.select_municipality(Some(MunicipalityId(11)));
    assert_eq!(sel.department, Some(DepartmentId(1)));
    assert_eq!(sel.municipality, Some(MunicipalityId(11)));
    assert_eq!(sel.district, None);
  }

  #[test]
  fn changing_district_leaves_ancestors_untouched() {
    let mut sel = AddressSelection::from_district(
      Some(DistrictId(100)),
      &districts(),
      &municipalities(),
    );
    sel.select_district(Some(DistrictId(101)));
    assert_eq!(sel.department, Some(DepartmentId(1)));
    assert_eq!(sel.municipality, Some(MunicipalityId(10)));
  }

  // ── Candidates and enabled-ness ───────────────────────────────────────

  #[test]
  fn candidates_follow_the_selected_parent() {
    let mut sel = AddressSelection::default();
    assert!(sel.municipality_candidates(&municipalities()).is_empty());
    assert!(!sel.municipality_enabled());

    sel.select_department(Some(DepartmentId(1)));
    let all_munis = municipalities();
    let munis = sel.municipality_candidates(&all_munis);
    assert_eq!(
      munis.iter().map(|m| m.id).collect::<Vec<_>>(),
      [MunicipalityId(10)]
    );
    assert!(sel.district_candidates(&districts()).is_empty());
    assert!(!sel.district_enabled());

    sel.select_municipality(Some(MunicipalityId(10)));
    let all_dists = districts();
    let dists = sel.district_candidates(&all_dists);
    assert_eq!(
      dists.iter().map(|d| d.id).collect::<Vec<_>>(),
      [DistrictId(100)]
    );
    assert!(sel.district_enabled());
  }

  // One department, one municipality, one district: opening on the leaf
  // selects the whole chain and each candidate list has exactly that entry.
  #[test]
  fn single_chain_scenario() {
    let munis = vec![Municipality {
      id:            MunicipalityId(10),
      name:          "M1".into(),
      department_id: DepartmentId(1),
    }];
    let dists = vec![District {
      id:              DistrictId(100),
      name:            "D1".into(),
      municipality_id: MunicipalityId(10),
    }];
    let sel =
      AddressSelection::from_district(Some(DistrictId(100)), &dists, &munis);
    assert_eq!(sel.department, Some(DepartmentId(1)));
    assert_eq!(sel.municipality, Some(MunicipalityId(10)));
    assert_eq!(sel.district, Some(DistrictId(100)));
    assert_eq!(sel.municipality_candidates(&munis).len(), 1);
    assert_eq!(sel.district_candidates(&dists).len(), 1);
  }
}

//! Registry of standard design models.
//!
//! Well-known IDs name design models that ship with conforming applications
//! rather than being created by users. A well-known ID that is well-formed
//! but missing from this registry is still legal; newer producers may know
//! models this crate does not.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::model::id::parse_well_known;

/// The engineering design process model, version 1.
pub const ENGINEERING_DESIGN: &str = "well-known:edu.washington.hcde.engineering-design@1";

/// A registered standard design model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownModel {
    pub id: &'static str,
    pub name: &'static str,
}

lazy_static! {
    static ref REGISTRY: FxHashMap<&'static str, WellKnownModel> = {
        let mut m = FxHashMap::default();
        for model in [WellKnownModel {
            id: ENGINEERING_DESIGN,
            name: "Engineering Design Process",
        }] {
            m.insert(model.id, model);
        }
        m
    };
}

/// Looks up a registered standard model by its full well-known ID.
pub fn lookup(id: &str) -> Option<&'static WellKnownModel> {
    REGISTRY.get(id)
}

/// Returns every registered version of the model named by `token`
/// (the part between the prefix and `@`).
pub fn versions(token: &str) -> Vec<u64> {
    let mut versions: Vec<u64> = REGISTRY
        .keys()
        .filter_map(|id| parse_well_known(id))
        .filter(|(t, _)| *t == token)
        .filter_map(|(_, v)| v)
        .collect();
    versions.sort_unstable();
    versions
}

//! Permission tags.
//!
//! A permission gates one action on one resource kind. The wire form is
//! `<action>:<resource>`, e.g. `create:treatment`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of capability tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "create:treatment")]
    CreateTreatment,
    #[serde(rename = "read:treatment")]
    ReadTreatment,
    #[serde(rename = "update:treatment")]
    UpdateTreatment,
    #[serde(rename = "delete:treatment")]
    DeleteTreatment,

    #[serde(rename = "create:treatment_option")]
    CreateTreatmentOption,
    #[serde(rename = "read:treatment_option")]
    ReadTreatmentOption,
    #[serde(rename = "update:treatment_option")]
    UpdateTreatmentOption,
    #[serde(rename = "delete:treatment_option")]
    DeleteTreatmentOption,

    #[serde(rename = "create:medication")]
    CreateMedication,
    #[serde(rename = "read:medication")]
    ReadMedication,
    #[serde(rename = "update:medication")]
    UpdateMedication,
    #[serde(rename = "delete:medication")]
    DeleteMedication,

    #[serde(rename = "create:patient")]
    CreatePatient,
    #[serde(rename = "read:patient")]
    ReadPatient,
    #[serde(rename = "update:patient")]
    UpdatePatient,
    #[serde(rename = "delete:patient")]
    DeletePatient,

    #[serde(rename = "create:user")]
    CreateUser,
    #[serde(rename = "read:user")]
    ReadUser,
    #[serde(rename = "update:user")]
    UpdateUser,
    #[serde(rename = "delete:user")]
    DeleteUser,

    /// Admin view over medications, soft-deleted ones included.
    #[serde(rename = "read:all_medications")]
    ReadAllMedications,
}

impl Permission {
    /// Every declared permission. Adding a variant means adding it here.
    pub const ALL: [Permission; 21] = [
        Permission::CreateTreatment,
        Permission::ReadTreatment,
        Permission::UpdateTreatment,
        Permission::DeleteTreatment,
        Permission::CreateTreatmentOption,
        Permission::ReadTreatmentOption,
        Permission::UpdateTreatmentOption,
        Permission::DeleteTreatmentOption,
        Permission::CreateMedication,
        Permission::ReadMedication,
        Permission::UpdateMedication,
        Permission::DeleteMedication,
        Permission::CreatePatient,
        Permission::ReadPatient,
        Permission::UpdatePatient,
        Permission::DeletePatient,
        Permission::CreateUser,
        Permission::ReadUser,
        Permission::UpdateUser,
        Permission::DeleteUser,
        Permission::ReadAllMedications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateTreatment => "create:treatment",
            Permission::ReadTreatment => "read:treatment",
            Permission::UpdateTreatment => "update:treatment",
            Permission::DeleteTreatment => "delete:treatment",
            Permission::CreateTreatmentOption => "create:treatment_option",
            Permission::ReadTreatmentOption => "read:treatment_option",
            Permission::UpdateTreatmentOption => "update:treatment_option",
            Permission::DeleteTreatmentOption => "delete:treatment_option",
            Permission::CreateMedication => "create:medication",
            Permission::ReadMedication => "read:medication",
            Permission::UpdateMedication => "update:medication",
            Permission::DeleteMedication => "delete:medication",
            Permission::CreatePatient => "create:patient",
            Permission::ReadPatient => "read:patient",
            Permission::UpdatePatient => "update:patient",
            Permission::DeletePatient => "delete:patient",
            Permission::CreateUser => "create:user",
            Permission::ReadUser => "read:user",
            Permission::UpdateUser => "update:user",
            Permission::DeleteUser => "delete:user",
            Permission::ReadAllMedications => "read:all_medications",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

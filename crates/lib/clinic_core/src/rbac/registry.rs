//! Role → permission table.

use std::collections::{HashMap, HashSet};

use super::{Permission, Role};

const DOCTOR: &[Permission] = &[
    Permission::CreateTreatment,
    Permission::ReadTreatment,
    Permission::UpdateTreatment,
    Permission::ReadTreatmentOption,
    Permission::ReadMedication,
    Permission::CreatePatient,
    Permission::ReadPatient,
    Permission::UpdatePatient,
];

const NURSE: &[Permission] = &[
    Permission::ReadTreatment,
    Permission::ReadTreatmentOption,
    Permission::ReadMedication,
    Permission::ReadPatient,
];

const STAFF: &[Permission] = &[
    Permission::ReadTreatment,
    Permission::ReadTreatmentOption,
    Permission::ReadMedication,
    Permission::ReadPatient,
];

/// Read-only permission table, built once at startup and shared by reference.
///
/// The mapping is total: every [`Role`] has an entry. ADMIN holds the union of
/// all declared permissions, so a new [`Permission`] variant is granted to it
/// without touching this table.
#[derive(Debug, Clone)]
pub struct PermissionRegistry {
    grants: HashMap<Role, HashSet<Permission>>,
}

impl PermissionRegistry {
    /// Build the standard clinic table.
    pub fn new() -> Self {
        let grants = Role::ALL
            .into_iter()
            .map(|role| {
                let perms: HashSet<Permission> = match role {
                    Role::Admin => Permission::ALL.into_iter().collect(),
                    Role::Doctor => DOCTOR.iter().copied().collect(),
                    Role::Nurse => NURSE.iter().copied().collect(),
                    Role::Staff => STAFF.iter().copied().collect(),
                };
                (role, perms)
            })
            .collect();
        Self { grants }
    }

    /// Permission set held by `role`.
    pub fn permissions_for(&self, role: Role) -> &HashSet<Permission> {
        // Every role is inserted by `new`.
        &self.grants[&role]
    }

    pub fn has(&self, role: Role, permission: Permission) -> bool {
        self.permissions_for(role).contains(&permission)
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Declarative operation → required-permission table.
//!
//! Each protected endpoint names one [`Operation`]; the authorization guard
//! looks the operation up here before dispatch.

use super::Permission;

/// A protected operation exposed by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    WhoAmI,

    CreateTreatment,
    ListTreatments,
    GetTreatment,
    ListPatientTreatments,
    UpdateTreatment,
    DeleteTreatment,

    CreateTreatmentOption,
    ListTreatmentOptions,
    UpdateTreatmentOption,
    DeleteTreatmentOption,

    CreateMedication,
    ListMedications,
    SearchMedications,
    ListActiveMedications,
    ListAllMedications,
    GetMedication,
    UpdateMedication,
    DeleteMedication,

    CreatePatient,
    ListPatients,
    GetPatient,
    UpdatePatient,
    DeletePatient,

    CreateUser,
    ListUsers,
    GetUser,
    UpdateUser,
    DeleteUser,
}

impl Operation {
    pub const ALL: [Operation; 29] = [
        Operation::WhoAmI,
        Operation::CreateTreatment,
        Operation::ListTreatments,
        Operation::GetTreatment,
        Operation::ListPatientTreatments,
        Operation::UpdateTreatment,
        Operation::DeleteTreatment,
        Operation::CreateTreatmentOption,
        Operation::ListTreatmentOptions,
        Operation::UpdateTreatmentOption,
        Operation::DeleteTreatmentOption,
        Operation::CreateMedication,
        Operation::ListMedications,
        Operation::SearchMedications,
        Operation::ListActiveMedications,
        Operation::ListAllMedications,
        Operation::GetMedication,
        Operation::UpdateMedication,
        Operation::DeleteMedication,
        Operation::CreatePatient,
        Operation::ListPatients,
        Operation::GetPatient,
        Operation::UpdatePatient,
        Operation::DeletePatient,
        Operation::CreateUser,
        Operation::ListUsers,
        Operation::GetUser,
        Operation::UpdateUser,
        Operation::DeleteUser,
    ];

    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::WhoAmI => "whoami",
            Operation::CreateTreatment => "treatments.create",
            Operation::ListTreatments => "treatments.list",
            Operation::GetTreatment => "treatments.get",
            Operation::ListPatientTreatments => "treatments.list_for_patient",
            Operation::UpdateTreatment => "treatments.update",
            Operation::DeleteTreatment => "treatments.delete",
            Operation::CreateTreatmentOption => "treatment_options.create",
            Operation::ListTreatmentOptions => "treatment_options.list",
            Operation::UpdateTreatmentOption => "treatment_options.update",
            Operation::DeleteTreatmentOption => "treatment_options.delete",
            Operation::CreateMedication => "medications.create",
            Operation::ListMedications => "medications.list",
            Operation::SearchMedications => "medications.search",
            Operation::ListActiveMedications => "medications.active",
            Operation::ListAllMedications => "medications.all",
            Operation::GetMedication => "medications.get",
            Operation::UpdateMedication => "medications.update",
            Operation::DeleteMedication => "medications.delete",
            Operation::CreatePatient => "patients.create",
            Operation::ListPatients => "patients.list",
            Operation::GetPatient => "patients.get",
            Operation::UpdatePatient => "patients.update",
            Operation::DeletePatient => "patients.delete",
            Operation::CreateUser => "users.create",
            Operation::ListUsers => "users.list",
            Operation::GetUser => "users.get",
            Operation::UpdateUser => "users.update",
            Operation::DeleteUser => "users.delete",
        }
    }

    /// Permissions a caller must hold, jointly, to run this operation.
    /// An empty slice admits any authenticated caller.
    pub fn required_permissions(&self) -> &'static [Permission] {
        use Permission as P;
        match self {
            Operation::WhoAmI => &[],

            Operation::CreateTreatment => &[P::CreateTreatment],
            Operation::ListTreatments
            | Operation::GetTreatment
            | Operation::ListPatientTreatments => &[P::ReadTreatment],
            Operation::UpdateTreatment => &[P::UpdateTreatment],
            Operation::DeleteTreatment => &[P::DeleteTreatment],

            Operation::CreateTreatmentOption => &[P::CreateTreatmentOption],
            Operation::ListTreatmentOptions => &[P::ReadTreatmentOption],
            Operation::UpdateTreatmentOption => &[P::UpdateTreatmentOption],
            Operation::DeleteTreatmentOption => &[P::DeleteTreatmentOption],

            Operation::CreateMedication => &[P::CreateMedication],
            Operation::ListMedications
            | Operation::SearchMedications
            | Operation::ListActiveMedications
            | Operation::GetMedication => &[P::ReadMedication],
            Operation::ListAllMedications => &[P::ReadAllMedications],
            Operation::UpdateMedication => &[P::UpdateMedication],
            Operation::DeleteMedication => &[P::DeleteMedication],

            Operation::CreatePatient => &[P::CreatePatient],
            Operation::ListPatients | Operation::GetPatient => &[P::ReadPatient],
            Operation::UpdatePatient => &[P::UpdatePatient],
            Operation::DeletePatient => &[P::DeletePatient],

            Operation::CreateUser => &[P::CreateUser],
            Operation::ListUsers | Operation::GetUser => &[P::ReadUser],
            Operation::UpdateUser => &[P::UpdateUser],
            Operation::DeleteUser => &[P::DeleteUser],
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn only_whoami_is_open() {
        for op in Operation::ALL {
            let open = op.required_permissions().is_empty();
            assert_eq!(open, op == Operation::WhoAmI, "{op}");
        }
    }

    #[test]
    fn every_permission_gates_some_operation() {
        let used: HashSet<Permission> = Operation::ALL
            .iter()
            .flat_map(|op| op.required_permissions().iter().copied())
            .collect();
        for p in Permission::ALL {
            assert!(used.contains(&p), "{p} gates nothing");
        }
    }
}

//! Route paths.

pub const GET_HEALTH: &str = "/health";

pub const POST_AUTH_REGISTER: &str = "/auth/register";
pub const POST_AUTH_LOGIN: &str = "/auth/login";
pub const GET_AUTH_ME: &str = "/auth/me";

pub const TREATMENTS: &str = "/treatments";
pub const TREATMENTS_ID: &str = "/treatments/{id}";
pub const TREATMENTS_PATIENT_ID: &str = "/treatments/patient/{patient_id}";

pub const TREATMENT_OPTIONS: &str = "/treatments/options";
pub const TREATMENT_OPTIONS_ID: &str = "/treatments/options/{id}";

pub const TREATMENT_MEDICATIONS: &str = "/treatments/medications";
pub const TREATMENT_MEDICATIONS_ID: &str = "/treatments/medications/{id}";

pub const MEDICATIONS: &str = "/medications";
pub const MEDICATIONS_SEARCH: &str = "/medications/search";
pub const MEDICATIONS_ACTIVE: &str = "/medications/active";
pub const MEDICATIONS_ALL: &str = "/medications/all";
pub const MEDICATIONS_ID: &str = "/medications/{id}";

pub const PATIENTS: &str = "/patients";
pub const PATIENTS_ID: &str = "/patients/{id}";

pub const USERS: &str = "/users";
pub const USERS_ID: &str = "/users/{id}";

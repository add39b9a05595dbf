//! Data access for companies, jobs and users, built on the safe SQL fragments.

mod company;
mod db;
mod job;
mod user;
mod validation;

pub use company::{CompanyService, COMPANY_FILTERS};
pub use job::{JobService, JOB_FILTERS};
pub use user::UserService;
pub use validation::{FieldType, Format, RequestSchema, RequestValidator, ValidationRule};

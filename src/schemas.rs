//! Request shapes accepted by each endpoint.

use crate::service::{Format, RequestSchema, ValidationRule as Rule};

/// Upper bound of a Postgres `INTEGER` column.
const PG_INT_MAX: f64 = i32::MAX as f64;

pub const COMPANY_NEW: RequestSchema = RequestSchema {
    name: "companyNew",
    rules: &[
        Rule::string("handle").required().length(1, 25).lowercase(),
        Rule::string("name").required().length(1, 100),
        Rule::string("description").required(),
        Rule::integer("numEmployees").minimum(0.0).maximum(PG_INT_MAX).nullable(),
        Rule::string("logoUrl").format(Format::Url).nullable(),
    ],
};

pub const COMPANY_UPDATE: RequestSchema = RequestSchema {
    name: "companyUpdate",
    rules: &[
        Rule::string("name").length(1, 100),
        Rule::string("description"),
        Rule::integer("numEmployees").minimum(0.0).maximum(PG_INT_MAX).nullable(),
        Rule::string("logoUrl").format(Format::Url).nullable(),
    ],
};

pub const COMPANY_SEARCH: RequestSchema = RequestSchema {
    name: "companySearch",
    rules: &[
        Rule::string("nameLike").min_length(1),
        Rule::integer("minEmployees").minimum(0.0),
        Rule::integer("maxEmployees").minimum(0.0),
    ],
};

pub const JOB_NEW: RequestSchema = RequestSchema {
    name: "jobNew",
    rules: &[
        Rule::string("title").required().min_length(1),
        Rule::integer("salary").minimum(0.0).maximum(PG_INT_MAX).nullable(),
        Rule::number("equity").minimum(0.0).maximum(1.0).nullable(),
        Rule::string("companyHandle").required().length(1, 25),
    ],
};

pub const JOB_UPDATE: RequestSchema = RequestSchema {
    name: "jobUpdate",
    rules: &[
        Rule::string("title").min_length(1),
        Rule::integer("salary").minimum(0.0).maximum(PG_INT_MAX).nullable(),
        Rule::number("equity").minimum(0.0).maximum(1.0).nullable(),
    ],
};

pub const JOB_SEARCH: RequestSchema = RequestSchema {
    name: "jobSearch",
    rules: &[
        Rule::string("title").min_length(1),
        Rule::integer("minSalary").minimum(0.0),
        Rule::boolean("hasEquity"),
    ],
};

pub const USER_NEW: RequestSchema = RequestSchema {
    name: "userNew",
    rules: &[
        Rule::string("username").required().length(1, 25),
        Rule::string("password").required().length(5, 20),
        Rule::string("firstName").required().length(1, 30),
        Rule::string("lastName").required().length(1, 30),
        Rule::string("email").required().length(6, 60).format(Format::Email),
        Rule::boolean("isAdmin"),
    ],
};

pub const USER_REGISTER: RequestSchema = RequestSchema {
    name: "userRegister",
    rules: &[
        Rule::string("username").required().length(1, 25),
        Rule::string("password").required().length(5, 20),
        Rule::string("firstName").required().length(1, 30),
        Rule::string("lastName").required().length(1, 30),
        Rule::string("email").required().length(6, 60).format(Format::Email),
    ],
};

pub const USER_UPDATE: RequestSchema = RequestSchema {
    name: "userUpdate",
    rules: &[
        Rule::string("password").length(5, 20),
        Rule::string("firstName").length(1, 30),
        Rule::string("lastName").length(1, 30),
        Rule::string("email").length(6, 60).format(Format::Email),
    ],
};

pub const USER_AUTH: RequestSchema = RequestSchema {
    name: "userAuth",
    rules: &[
        Rule::string("username").required().min_length(1),
        Rule::string("password").required().min_length(1),
    ],
};

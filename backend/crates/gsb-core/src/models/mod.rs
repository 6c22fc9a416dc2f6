pub mod business;
pub mod business_fields;
pub mod identity;

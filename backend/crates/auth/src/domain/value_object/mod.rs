//! Value Object Module

pub mod confirmation_code;
pub mod email;
pub mod user_name;
pub mod user_role;

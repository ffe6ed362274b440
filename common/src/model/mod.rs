pub mod activity;
pub mod checksheet;
pub mod form;
pub mod role;
pub mod user;

pub mod category;
pub mod contract;
pub mod employee;
pub mod entry;
pub mod num_last_proposal;
pub mod person;
pub mod proposal;
pub mod user;
pub mod work;

pub mod create_admin;
pub mod generate;
pub mod rebuild;

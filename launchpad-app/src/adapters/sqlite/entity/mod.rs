//! `SeaORM` entities for the Launchpad tables.

pub mod domain;
pub mod domain_deployment;
pub mod landing_page;

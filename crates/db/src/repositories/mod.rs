//! Repository layer.
//!
//! Each repository is a zero-sized struct. Read paths take `&PgPool`; write
//! paths take the `&mut PgConnection` of a
//! [`UnitOfWork`](crate::unit_of_work::UnitOfWork) so their changes commit
//! together.

pub mod member_repo;
pub mod photo_repo;

pub use member_repo::MemberRepo;
pub use photo_repo::PhotoRepo;

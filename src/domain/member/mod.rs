// Member domain module

#![allow(clippy::module_inception)]

pub mod member;

pub use member::{Member, MemberWithTeam};

#![allow(clippy::needless_pass_by_value)]

pub mod check;
pub mod entry;
pub mod init;
pub mod prep;

#![cfg(feature = "rusqlite")]
#![allow(dead_code)]

mod rusqlite;
pub use rusqlite::*;

//! Common library exports shared between the search client and its consumers.

extern crate serde;


pub mod search_query;
pub mod search_result;
pub mod search_const;

//! End-to-end engine tests over files on disk.

mod collaborators;
mod determinism_json;
mod policy;
mod scenarios;

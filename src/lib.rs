// Library root
// -----------
// The binary (`main.rs`) wires these modules together; the library keeps
// the request logic testable without a terminal.
//
// Module responsibilities:
// - `models`: request fields, their wire strings and the result type.
// - `credential`: the API key file (read it, or prompt once and store it).
// - `api`: the multipart POST to the image endpoint and response mapping.
// - `config`: endpoint, key file and output directory from the environment.
// - `ui`: interactive menu and generation form.
// - `cli`: flags for one-shot runs.
pub mod api;
pub mod cli;
pub mod config;
pub mod credential;
pub mod models;
pub mod ui;

#[cfg(test)]
mod test_support;

//! Composable validation and transformation actions for command-line
//! argument values.
//!
//! An [`Action`](action::Action) checks or rewrites the value of one flag.
//! Actions compose into a [`Pipeline`](pipeline::Pipeline), are named in a
//! [`Catalog`](catalog::Catalog), and are bound to flags through an
//! [`ArgumentSet`](registry::ArgumentSet) that plugs into clap.

pub mod action;
pub mod catalog;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod error;
pub mod literal;
pub mod pipeline;
pub mod registry;
pub mod tracing;
pub mod value;

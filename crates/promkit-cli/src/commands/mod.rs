pub mod ast;
pub mod check;
pub mod codegen;
pub mod migrate;
pub mod query_loader;
pub mod run_common;

#[cfg(test)]
mod migrate_tests;
#[cfg(test)]
mod query_loader_tests;

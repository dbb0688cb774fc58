mod common;

mod scope_tests;
mod statement_lowering_tests;

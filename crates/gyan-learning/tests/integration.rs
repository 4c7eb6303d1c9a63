// Single integration test binary that includes all test modules

mod common;

mod recommendation_tests;

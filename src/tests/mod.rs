pub mod support;

mod api_tests;
mod cache_tests;
mod dataset_tests;

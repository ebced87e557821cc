//! Integration tests for the tree picker engine

mod concurrency;
mod failure;
mod navigation;
mod selection;
mod support;

// Engine tests
mod engine;

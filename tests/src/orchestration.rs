mod integration;
mod reporting;

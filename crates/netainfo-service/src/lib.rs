//! Aggregation, caching and chart building behind the netainfo dashboard.
//!
//! The [`DashboardService`](service::DashboardService) owns the candidate [`Dataset`](dataset::Dataset)
//! loaded at startup together with the [`AggregationCache`](cache::AggregationCache), and turns a
//! set of dashboard filters into the three bar chart figures.

#[macro_use]
pub mod metrics;

pub mod aggregation;
pub mod cache;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod service;

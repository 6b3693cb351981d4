//! Delivery of position reports to the collector.

mod client;

pub use client::{DeliveryClient, LocationSink, LOCATIONS_PATH, STORE_LOCATION_PATH};

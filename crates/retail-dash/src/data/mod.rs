pub mod calendar;
pub mod campaigns;
pub mod catalog;
pub mod dimensions;
pub mod export;
pub mod generator;
pub mod hr;
pub mod model;
pub mod prior_year;
pub mod records;
pub mod rng;
pub mod stores;

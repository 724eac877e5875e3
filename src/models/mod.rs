pub mod activity;
pub mod day;
pub mod destination;
pub mod generation;
pub mod itinerary;
pub mod user;
